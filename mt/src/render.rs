//! Paired text/HTML rendering

use serde::Serialize;
use tracing::debug;

use crate::error::TemplateError;
use crate::templates::{TemplateFormat, TemplateRegistry};

/// Both bodies of one email
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedEmail {
    pub text: String,
    pub html: String,
}

/// Render `<name>.txt` and `<name>.html` against the same payload
///
/// Either both bodies are returned or an error is; an email is never sent
/// with only one representation.
pub fn render<T: Serialize>(registry: &TemplateRegistry, name: &str, data: &T) -> Result<RenderedEmail, TemplateError> {
    debug!(%name, "render: called");
    let text_template = registry.lookup(&TemplateFormat::Text.file_name(name))?;
    let html_template = registry.lookup(&TemplateFormat::Html.file_name(name))?;

    let text = text_template.render(data)?;
    let html = html_template.render(data)?;

    Ok(RenderedEmail { text, html })
}
