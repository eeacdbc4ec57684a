//! Compiled-in default templates
//!
//! These are embedded into the binary and form the default template source.
//! Operator overrides replace entries by file name.

/// A template file compiled into the binary
#[derive(Debug, Clone, Copy)]
pub struct EmbeddedFile {
    /// File name, e.g. `welcome.html`
    pub name: &'static str,
    pub content: &'static str,
}

macro_rules! embed {
    ($name:literal) => {
        EmbeddedFile {
            name: $name,
            content: include_str!(concat!("../../templates/", $name)),
        }
    };
}

/// Virtual root reported in errors and paths for the embedded source
pub const EMBEDDED_ROOT: &str = "templates";

/// Top-level templates, one `.txt` and one `.html` per logical name
pub const TEMPLATES: &[EmbeddedFile] = &[
    embed!("billing_email_changed.html"),
    embed!("billing_email_changed.txt"),
    embed!("invite.html"),
    embed!("invite.txt"),
    embed!("invite_joined.html"),
    embed!("invite_joined.txt"),
    embed!("password_reset_request.html"),
    embed!("password_reset_request.txt"),
    embed!("password_reset_success.html"),
    embed!("password_reset_success.txt"),
    embed!("questionnaire_auth.html"),
    embed!("questionnaire_auth.txt"),
    embed!("subscribe.html"),
    embed!("subscribe.txt"),
    embed!("trust_center_auth.html"),
    embed!("trust_center_auth.txt"),
    embed!("trust_center_nda_request.html"),
    embed!("trust_center_nda_request.txt"),
    embed!("trust_center_nda_signed.html"),
    embed!("trust_center_nda_signed.txt"),
    embed!("verify_billing.html"),
    embed!("verify_billing.txt"),
    embed!("verify_email.html"),
    embed!("verify_email.txt"),
    embed!("welcome.html"),
    embed!("welcome.txt"),
];

/// Fragments shared by every top-level template of the same format
pub const PARTIALS: &[EmbeddedFile] = &[
    embed!("partials/footer.html"),
    embed!("partials/footer.txt"),
    embed!("partials/greeting.html"),
    embed!("partials/greeting.txt"),
    embed!("partials/header.html"),
];

/// Get an embedded top-level template by file name
#[cfg(test)]
pub(crate) fn get_embedded(name: &str) -> Option<&'static str> {
    TEMPLATES.iter().find(|f| f.name == name).map(|f| f.content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EmailKind;

    #[test]
    fn test_every_kind_has_both_formats() {
        for kind in EmailKind::ALL {
            for ext in ["txt", "html"] {
                let name = format!("{}.{}", kind.template_name(), ext);
                assert!(get_embedded(&name).is_some(), "Missing embedded template: {}", name);
            }
        }
    }

    #[test]
    fn test_no_unknown_templates() {
        assert_eq!(TEMPLATES.len(), EmailKind::ALL.len() * 2);
    }

    #[test]
    fn test_get_embedded_unknown() {
        assert!(get_embedded("unknown.txt").is_none());
    }

    #[test]
    fn test_partials_live_under_partials_dir() {
        for partial in PARTIALS {
            assert!(partial.name.starts_with("partials/"), "{}", partial.name);
            assert!(!partial.content.is_empty());
        }
    }
}
