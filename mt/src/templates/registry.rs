//! Template Registry
//!
//! Holds every parsed template keyed by file name (`welcome.html`).
//!
//! Each top-level file is parsed into its own Handlebars instance together
//! with the partials of its format and the helper set. Two templates can then
//! declare inline partials with the same name without one overwriting the
//! other.
//!
//! The default set is parsed on construction. An override directory can be
//! applied once; the outcome of that first attempt is returned to every
//! later or concurrent caller.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use handlebars::Handlebars;
use serde::Serialize;
use tracing::{debug, info, warn};

use super::partials::{discover, discovery_error};
use super::{PartialSet, TemplateFormat, TemplateSource, embedded, helpers, load_partials};
use crate::error::TemplateError;

/// Where a registered template was loaded from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateOrigin {
    Embedded,
    Override(PathBuf),
}

/// A parsed top-level template
#[derive(Debug)]
pub struct Template {
    name: String,
    format: TemplateFormat,
    origin: TemplateOrigin,
    hbs: Handlebars<'static>,
}

impl Template {
    fn parse(
        name: &str,
        format: TemplateFormat,
        origin: TemplateOrigin,
        content: &str,
        partials: &PartialSet,
    ) -> Result<Self, TemplateError> {
        debug!(%name, %format, "Template::parse: called");
        let mut hbs = Handlebars::new();
        hbs.set_strict_mode(true);
        if format == TemplateFormat::Text {
            hbs.register_escape_fn(handlebars::no_escape);
        }
        helpers::register(&mut hbs);

        for partial in partials.for_format(format) {
            hbs.register_partial(&partial.name, &partial.content)
                .map_err(|e| TemplateError::Parse {
                    name: partial.path.display().to_string(),
                    reason: e.to_string(),
                })?;
        }

        hbs.register_template_string(name, content)
            .map_err(|e| TemplateError::Parse {
                name: name.to_string(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            name: name.to_string(),
            format,
            origin,
            hbs,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn format(&self) -> TemplateFormat {
        self.format
    }

    pub fn origin(&self) -> &TemplateOrigin {
        &self.origin
    }

    /// Execute the template against a payload
    pub fn render<T: Serialize>(&self, data: &T) -> Result<String, TemplateError> {
        self.hbs.render(&self.name, data).map_err(|e| TemplateError::Render {
            name: self.name.clone(),
            reason: e.to_string(),
        })
    }
}

/// Name-keyed store of parsed templates
#[derive(Debug)]
pub struct TemplateRegistry {
    templates: RwLock<HashMap<String, Arc<Template>>>,
    /// Default partials, layered under any override partials
    partials: PartialSet,
    overrides: OnceLock<Result<PathBuf, TemplateError>>,
}

impl TemplateRegistry {
    /// Parse the compiled-in template set
    ///
    /// The embedded set is part of the build. An error here means the binary
    /// was built with a broken template and must not serve email.
    pub fn load_defaults() -> Result<Self, TemplateError> {
        debug!("TemplateRegistry::load_defaults: called");
        let partials = load_partials(&TemplateSource::Embedded)?;

        let mut templates = HashMap::new();
        for file in embedded::TEMPLATES {
            let Some(format) = TemplateFormat::from_path(file.name) else {
                continue;
            };
            let template = Template::parse(file.name, format, TemplateOrigin::Embedded, file.content, &partials)?;
            templates.insert(file.name.to_string(), Arc::new(template));
        }

        info!(count = templates.len(), "Loaded default templates");
        Ok(Self {
            templates: RwLock::new(templates),
            partials,
            overrides: OnceLock::new(),
        })
    }

    /// Replace defaults with the templates found in `path`
    ///
    /// Only the first call does any work. Later calls, including concurrent
    /// ones, get the first outcome; a different path is ignored with a warning.
    pub fn load_overrides(&self, path: impl AsRef<Path>) -> Result<(), TemplateError> {
        let path = path.as_ref();
        debug!(?path, "TemplateRegistry::load_overrides: called");

        match self.overrides.get_or_init(|| self.apply_overrides(path)) {
            Ok(loaded) => {
                if loaded != path {
                    warn!(requested = ?path, loaded = ?loaded, "Template overrides already loaded, ignoring");
                }
                Ok(())
            }
            Err(e) => Err(e.clone()),
        }
    }

    /// Directory the overrides were loaded from, if that succeeded
    pub fn override_path(&self) -> Option<&Path> {
        self.overrides
            .get()
            .and_then(|outcome| outcome.as_ref().ok())
            .map(PathBuf::as_path)
    }

    /// Look up a template by exact file name
    pub fn lookup(&self, name: &str) -> Result<Arc<Template>, TemplateError> {
        self.read()
            .get(name)
            .cloned()
            .ok_or_else(|| TemplateError::MissingTemplate { name: name.to_string() })
    }

    #[cfg(test)]
    pub(crate) fn contains(&self, name: &str) -> bool {
        self.read().contains_key(name)
    }

    /// All registered templates, sorted by name
    pub fn templates(&self) -> Vec<Arc<Template>> {
        let mut templates: Vec<_> = self.read().values().cloned().collect();
        templates.sort_by(|a, b| a.name.cmp(&b.name));
        templates
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Parse the whole override set, then swap it in under one write lock
    fn apply_overrides(&self, root: &Path) -> Result<PathBuf, TemplateError> {
        info!(?root, "Loading template overrides");
        let overlay = load_partials(&TemplateSource::Directory(root.to_path_buf()))?;
        let partials = self.partials.layered(&overlay);

        let mut parsed = Vec::new();
        for path in discover(root)? {
            let Some(format) = TemplateFormat::from_path(&path) else {
                continue;
            };
            let Some(name) = path.file_name().map(|n| n.to_string_lossy().into_owned()) else {
                continue;
            };
            let content = fs::read_to_string(&path).map_err(|e| discovery_error(&path, &e))?;
            parsed.push(Template::parse(
                &name,
                format,
                TemplateOrigin::Override(path.clone()),
                &content,
                &partials,
            )?);
        }

        let count = parsed.len();
        let mut templates = self.write();
        for template in parsed {
            if templates.contains_key(&template.name) {
                debug!(name = %template.name, "apply_overrides: replacing default");
            }
            templates.insert(template.name.clone(), Arc::new(template));
        }

        info!(?root, count, "Loaded template overrides");
        Ok(root.to_path_buf())
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, Arc<Template>>> {
        self.templates.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, Arc<Template>>> {
        self.templates.write().unwrap_or_else(PoisonError::into_inner)
    }
}
