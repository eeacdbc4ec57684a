//! Text helpers available to every template
//!
//! The set is fixed: `upper`, `lower` and `upper_camel`.

use handlebars::{Handlebars, handlebars_helper};

handlebars_helper!(upper: |s: str| s.to_uppercase());
handlebars_helper!(lower: |s: str| s.to_lowercase());
handlebars_helper!(upper_camel: |s: str| to_upper_camel(s));

pub(super) fn register(hbs: &mut Handlebars<'static>) {
    hbs.register_helper("upper", Box::new(upper));
    hbs.register_helper("lower", Box::new(lower));
    hbs.register_helper("upper_camel", Box::new(upper_camel));
}

/// `org_admin`, `org-admin` and `ORG ADMIN` all become `OrgAdmin`
pub(crate) fn to_upper_camel(s: &str) -> String {
    s.split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect()
}
