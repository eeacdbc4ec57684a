//! Partial discovery
//!
//! Partials are optional: a source without a `partials/` directory yields an
//! empty set.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use super::{TemplateFormat, TemplateSource, embedded};
use crate::error::TemplateError;

/// Conventional fragment directory inside a template source
pub const PARTIALS_DIR: &str = "partials";

/// A reusable fragment, registered under its file stem
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partial {
    pub name: String,
    pub format: TemplateFormat,
    pub path: PathBuf,
    pub content: String,
}

impl Partial {
    /// Pre-parse the fragment so syntax errors surface at load time
    fn parse(name: String, format: TemplateFormat, path: PathBuf, content: String) -> Result<Self, TemplateError> {
        handlebars::Template::compile(&content).map_err(|e| TemplateError::Parse {
            name: path.display().to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            name,
            format,
            path,
            content,
        })
    }
}

/// Ordered fragments for one template source
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartialSet {
    partials: Vec<Partial>,
}

impl PartialSet {
    pub fn is_empty(&self) -> bool {
        self.partials.is_empty()
    }

    pub fn len(&self) -> usize {
        self.partials.len()
    }

    /// Fragments matching a template format
    pub fn for_format(&self, format: TemplateFormat) -> impl Iterator<Item = &Partial> {
        self.partials.iter().filter(move |p| p.format == format)
    }

    /// Fragment file paths for a template format
    #[cfg(test)]
    pub(crate) fn paths(&self, format: TemplateFormat) -> Vec<&Path> {
        self.for_format(format).map(|p| p.path.as_path()).collect()
    }

    /// Layer `overlay` on top of this set; same name and format replaces
    pub fn layered(&self, overlay: &PartialSet) -> PartialSet {
        let mut partials: Vec<Partial> = self
            .partials
            .iter()
            .filter(|base| {
                !overlay
                    .partials
                    .iter()
                    .any(|p| p.name == base.name && p.format == base.format)
            })
            .cloned()
            .collect();
        partials.extend(overlay.partials.iter().cloned());
        PartialSet { partials }
    }
}

/// Discover and pre-parse the partials of a template source
pub fn load_partials(source: &TemplateSource) -> Result<PartialSet, TemplateError> {
    debug!(%source, "load_partials: called");
    let mut partials = Vec::new();

    match source {
        TemplateSource::Embedded => {
            for file in embedded::PARTIALS {
                let path = Path::new(embedded::EMBEDDED_ROOT).join(file.name);
                let Some(format) = TemplateFormat::from_path(&path) else {
                    continue;
                };
                partials.push(Partial::parse(stem(&path), format, path, file.content.to_string())?);
            }
        }
        TemplateSource::Directory(root) => {
            // Root must be readable even though the partials directory is optional
            fs::read_dir(root).map_err(|e| discovery_error(root, &e))?;

            let dir = root.join(PARTIALS_DIR);
            if !dir.is_dir() {
                debug!(?dir, "load_partials: no partials directory, skipping");
                return Ok(PartialSet::default());
            }

            for path in discover(&dir)? {
                let Some(format) = TemplateFormat::from_path(&path) else {
                    continue;
                };
                let content = fs::read_to_string(&path).map_err(|e| discovery_error(&path, &e))?;
                partials.push(Partial::parse(stem(&path), format, path, content)?);
            }
        }
    }

    info!(%source, count = partials.len(), "Loaded partials");
    Ok(PartialSet { partials })
}

/// Template files directly inside `dir`, sorted by name
///
/// Subdirectories are skipped; files without a `.txt` or `.html` extension
/// are skipped with a warning.
pub(super) fn discover(dir: &Path) -> Result<Vec<PathBuf>, TemplateError> {
    debug!(?dir, "discover: called");
    let entries = fs::read_dir(dir).map_err(|e| discovery_error(dir, &e))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| discovery_error(dir, &e))?;
        let path = entry.path();
        if path.is_dir() {
            continue;
        }
        if TemplateFormat::from_path(&path).is_none() {
            warn!(?path, "Skipping non-template file");
            continue;
        }
        files.push(path);
    }

    files.sort();
    Ok(files)
}

pub(super) fn discovery_error(path: &Path, err: &std::io::Error) -> TemplateError {
    TemplateError::Discovery {
        path: path.to_path_buf(),
        reason: err.to_string(),
    }
}

fn stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}
