//! Single-use action links

use tracing::debug;
use url::Url;

use crate::error::EmailError;

/// Set `token` as the only query parameter of `base_url`
///
/// Any existing query string on the base URL is dropped.
pub fn add_token_to_url(base_url: &str, token: &str) -> Result<String, EmailError> {
    debug!(%base_url, "add_token_to_url: called");
    if token.is_empty() {
        return Err(EmailError::missing_field("token"));
    }

    let mut url = parse(base_url)?;
    url.set_query(None);
    url.query_pairs_mut().append_pair("token", token);

    Ok(url.into())
}

/// Parse a caller-supplied link and return its serialized form
///
/// Characters that are not allowed in a URL come back percent-encoded.
pub fn normalize_url(url: &str) -> Result<String, EmailError> {
    debug!(%url, "normalize_url: called");
    Ok(parse(url)?.into())
}

fn parse(url: &str) -> Result<Url, EmailError> {
    Url::parse(url).map_err(|source| EmailError::Url {
        url: url.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_add_token_to_url() {
        let cases = [
            ("valid token", "https://example.com/verify", "validtoken", Some("https://example.com/verify?token=validtoken")),
            ("existing query replaced", "https://example.com/verify?next=/home&token=old", "new", Some("https://example.com/verify?token=new")),
            ("empty token", "https://example.com/verify", "", None),
            ("invalid base URL", "://invalid-url", "validtoken", None),
        ];

        for (name, base, token, expected) in cases {
            let result = add_token_to_url(base, token);
            match expected {
                Some(url) => assert_eq!(result.unwrap(), url, "{}", name),
                None => assert!(result.is_err(), "{}", name),
            }
        }
    }

    #[test]
    fn test_empty_token_is_missing_field() {
        let err = add_token_to_url("https://example.com/verify", "").unwrap_err();
        assert_eq!(err.missing_field_name(), Some("token"));
    }

    #[test]
    fn test_invalid_base_is_url_error() {
        let err = add_token_to_url("://invalid", "abc").unwrap_err();
        assert!(matches!(err, EmailError::Url { ref url, .. } if url == "://invalid"));
    }

    #[test]
    fn test_normalize_url() {
        assert_eq!(normalize_url("https://trust.example.com").unwrap(), "https://trust.example.com/");
        assert_eq!(
            normalize_url("https://trust.example.com/a\"b c").unwrap(),
            "https://trust.example.com/a%22b%20c"
        );
        assert!(matches!(
            normalize_url("https://t.example\" onmouseover=\"alert(1)"),
            Err(EmailError::Url { .. })
        ));
        assert!(matches!(normalize_url("not a url"), Err(EmailError::Url { .. })));
    }

    #[test]
    fn test_token_is_encoded() {
        let url = add_token_to_url("https://example.com/reset", "a b+c").unwrap();
        assert_eq!(url, "https://example.com/reset?token=a+b%2Bc");
    }

    proptest! {
        #[test]
        fn prop_token_is_sole_query(
            host in "[a-z]{1,12}\\.(com|io|test)",
            path in "(/[a-z0-9]{1,8}){0,3}",
            query in "([a-z]{1,5}=[a-z0-9]{1,5})?",
            token in "[A-Za-z0-9_-]{1,64}",
        ) {
            let base = if query.is_empty() {
                format!("https://{}{}", host, path)
            } else {
                format!("https://{}{}?{}", host, path, query)
            };
            let input = Url::parse(&base).unwrap();

            let out = Url::parse(&add_token_to_url(&base, &token).unwrap()).unwrap();
            let expected = format!("token={}", token);

            prop_assert_eq!(out.query(), Some(expected.as_str()));
            prop_assert_eq!(out.scheme(), input.scheme());
            prop_assert_eq!(out.host_str(), input.host_str());
            prop_assert_eq!(out.path(), input.path());
        }

        #[test]
        fn prop_empty_token_always_fails(base in "\\PC{0,40}") {
            let err = add_token_to_url(&base, "").unwrap_err();
            prop_assert_eq!(err.missing_field_name(), Some("token"));
        }

        #[test]
        fn prop_invalid_base_fails_for_any_token(token in "[A-Za-z0-9]{1,32}") {
            let result = add_token_to_url("://invalid", &token);
            prop_assert!(
                matches!(result, Err(EmailError::Url { .. })),
                "expected URL error"
            );
        }
    }
}
