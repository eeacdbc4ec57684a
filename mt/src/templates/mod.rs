//! Email Template System
//!
//! Loads the text/HTML template pairs used by every email kind.
//!
//! Template loading chain:
//! 1. Embedded defaults compiled into the binary
//! 2. Operator override directory (`templates-path`), loaded at most once
//!
//! A source is a flat directory of `<name>.txt` and `<name>.html` files plus
//! an optional `partials/` directory. Partials are registered by file stem
//! (`{{> footer}}`) into every top-level template of the same format.
//!
//! Templates use Handlebars syntax and are rendered in strict mode.

pub mod embedded;
mod helpers;
mod partials;
mod registry;

use std::fmt;
use std::path::{Path, PathBuf};

pub use partials::{PARTIALS_DIR, Partial, PartialSet, load_partials};
pub use registry::{Template, TemplateOrigin, TemplateRegistry};

/// Output format of a template, keyed by file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateFormat {
    Text,
    Html,
}

impl TemplateFormat {
    pub const ALL: [TemplateFormat; 2] = [TemplateFormat::Text, TemplateFormat::Html];

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Text => "txt",
            Self::Html => "html",
        }
    }

    /// Format for a file path, `None` for anything that is not a template
    pub fn from_path(path: impl AsRef<Path>) -> Option<Self> {
        match path.as_ref().extension()?.to_str()? {
            "txt" => Some(Self::Text),
            "html" => Some(Self::Html),
            _ => None,
        }
    }

    /// Registry key for a logical name in this format, e.g. `welcome.html`
    pub fn file_name(&self, logical_name: &str) -> String {
        format!("{}.{}", logical_name, self.extension())
    }
}

impl fmt::Display for TemplateFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.extension())
    }
}

/// Where a set of templates comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateSource {
    /// Templates compiled into the binary
    Embedded,
    /// An operator-supplied directory
    Directory(PathBuf),
}

impl fmt::Display for TemplateSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Embedded => write!(f, "embedded"),
            Self::Directory(path) => write!(f, "{}", path.display()),
        }
    }
}
