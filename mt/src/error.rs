//! Error types for template loading, rendering and message assembly

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while discovering, parsing or executing templates
///
/// Variants carry rendered reasons rather than the underlying error values so
/// the outcome of a one-time override load can be cloned to every caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("could not read template files from {path}: {reason}")]
    Discovery { path: PathBuf, reason: String },

    #[error("could not parse template {name}: {reason}")]
    Parse { name: String, reason: String },

    #[error("missing email template: {name} not found in templates")]
    MissingTemplate { name: String },

    #[error("could not render template {name}: {reason}")]
    Render { name: String, reason: String },
}

impl TemplateError {
    /// True when a lookup found nothing registered, as opposed to a broken template
    pub fn is_missing_template(&self) -> bool {
        matches!(self, Self::MissingTemplate { .. })
    }
}

/// Errors returned while configuring the mailer or building an email
#[derive(Debug, Error)]
pub enum EmailError {
    #[error("{message}")]
    Configuration {
        message: String,
        #[source]
        source: Option<TemplateError>,
    },

    #[error("{field} is required")]
    MissingRequiredField { field: &'static str },

    #[error("could not parse url {url}: {source}")]
    Url {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error(transparent)]
    Template(#[from] TemplateError),
}

impl EmailError {
    pub(crate) fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
            source: None,
        }
    }

    pub(crate) fn missing_field(field: &'static str) -> Self {
        Self::MissingRequiredField { field }
    }

    /// Name of the missing field, if this is a missing-field error
    pub fn missing_field_name(&self) -> Option<&'static str> {
        match self {
            Self::MissingRequiredField { field } => Some(field),
            _ => None,
        }
    }
}
