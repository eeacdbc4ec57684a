//! Mailer configuration types and loading

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use eyre::{Result, WrapErr};
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::EmailError;

const CONFIG_FILE: &str = "mailtemplates.yml";

static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("sender email pattern is a valid regex")
});

/// Settings shared by every email builder
///
/// Serialized flattened into each template payload, so templates refer to
/// `{{company_name}}`, `{{urls.product}}` and so on directly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Company name shown in subjects and bodies
    #[serde(alias = "company-name")]
    pub company_name: String,

    /// Postal address for the email footer
    #[serde(alias = "company-address")]
    pub company_address: String,

    /// Legal corporation name for the footer
    pub corporation: String,

    /// Sender address for outgoing emails
    #[serde(alias = "from-email")]
    pub from_email: String,

    /// Support contact shown in email bodies
    #[serde(alias = "support-email")]
    pub support_email: String,

    /// Sender address for questionnaire emails, falls back to `from_email`
    #[serde(alias = "questionnaire-email")]
    pub questionnaire_email: String,

    /// Logo shown in the HTML header
    #[serde(alias = "logo-url")]
    pub logo_url: String,

    /// Links used in templates and token URLs
    pub urls: UrlConfig,

    /// Directory with operator-supplied templates that replace the defaults
    #[serde(alias = "templates-path", skip_serializing)]
    pub templates_path: Option<PathBuf>,
}

/// URLs used in the email templates
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UrlConfig {
    pub root: String,
    pub product: String,
    pub docs: String,
    pub verify: String,
    pub invite: String,
    #[serde(alias = "password-reset")]
    pub password_reset: String,
    #[serde(alias = "verify-subscriber")]
    pub verify_subscriber: String,
    #[serde(alias = "verify-billing")]
    pub verify_billing: String,
    pub questionnaire: String,
}

impl Config {
    pub fn with_company_name(mut self, name: impl Into<String>) -> Self {
        self.company_name = name.into();
        self
    }

    pub fn with_company_address(mut self, address: impl Into<String>) -> Self {
        self.company_address = address.into();
        self
    }

    pub fn with_corporation(mut self, corporation: impl Into<String>) -> Self {
        self.corporation = corporation.into();
        self
    }

    pub fn with_from_email(mut self, email: impl Into<String>) -> Self {
        self.from_email = email.into();
        self
    }

    pub fn with_support_email(mut self, email: impl Into<String>) -> Self {
        self.support_email = email.into();
        self
    }

    pub fn with_questionnaire_email(mut self, email: impl Into<String>) -> Self {
        self.questionnaire_email = email.into();
        self
    }

    pub fn with_logo_url(mut self, url: impl Into<String>) -> Self {
        self.logo_url = url.into();
        self
    }

    pub fn with_root_domain(mut self, url: impl Into<String>) -> Self {
        self.urls.root = url.into();
        self
    }

    pub fn with_product_domain(mut self, url: impl Into<String>) -> Self {
        self.urls.product = url.into();
        self
    }

    pub fn with_docs_domain(mut self, url: impl Into<String>) -> Self {
        self.urls.docs = url.into();
        self
    }

    pub fn with_verify_url(mut self, url: impl Into<String>) -> Self {
        self.urls.verify = url.into();
        self
    }

    pub fn with_invite_url(mut self, url: impl Into<String>) -> Self {
        self.urls.invite = url.into();
        self
    }

    pub fn with_reset_url(mut self, url: impl Into<String>) -> Self {
        self.urls.password_reset = url.into();
        self
    }

    pub fn with_verify_subscriber_url(mut self, url: impl Into<String>) -> Self {
        self.urls.verify_subscriber = url.into();
        self
    }

    pub fn with_verify_billing_url(mut self, url: impl Into<String>) -> Self {
        self.urls.verify_billing = url.into();
        self
    }

    pub fn with_questionnaire_url(mut self, url: impl Into<String>) -> Self {
        self.urls.questionnaire = url.into();
        self
    }

    pub fn with_templates_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.templates_path = Some(path.into());
        self
    }

    /// Validate the settings every email depends on
    ///
    /// Call before building any email; `Mailer::new` does this for you.
    pub fn validate(&self) -> std::result::Result<(), EmailError> {
        debug!(company = %self.company_name, "Config::validate: called");
        if let Some(path) = &self.templates_path
            && path.as_os_str().is_empty()
        {
            return Err(EmailError::configuration("please provide your templates path"));
        }

        if self.company_name.trim().is_empty() {
            return Err(EmailError::configuration("please provide your company's name"));
        }

        if self.company_address.trim().is_empty() {
            return Err(EmailError::configuration("please provide your company's address"));
        }

        if self.from_email.trim().is_empty() {
            return Err(EmailError::configuration("please provide your sender email"));
        }

        if !is_valid_email(&self.from_email) {
            return Err(EmailError::configuration(
                "please provide a valid sender email ( from email )",
            ));
        }

        if !self.questionnaire_email.is_empty() && !is_valid_email(&self.questionnaire_email) {
            return Err(EmailError::configuration(
                "please provide a valid questionnaire sender email",
            ));
        }

        Ok(())
    }

    /// Sender for questionnaire emails
    pub fn questionnaire_sender(&self) -> &str {
        if self.questionnaire_email.is_empty() {
            &self.from_email
        } else {
            &self.questionnaire_email
        }
    }

    /// Load configuration from `config_path`, or from the first readable
    /// file in [`Config::search_paths`], or fall back to defaults
    ///
    /// An explicit path must load. Implicit locations that fail to parse are
    /// skipped with a warning.
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        if let Some(path) = config_path {
            return Self::load_from_file(path).wrap_err_with(|| format!("Failed to load config from {}", path.display()));
        }

        let found = Self::search_paths()
            .into_iter()
            .filter(|path| path.is_file())
            .find_map(|path| match Self::load_from_file(&path) {
                Ok(config) => Some(config),
                Err(e) => {
                    warn!(?path, error = %e, "Skipping unusable config file");
                    None
                }
            });

        Ok(found.unwrap_or_else(|| {
            info!("No config file found, using defaults");
            Self::default()
        }))
    }

    /// Implicit config locations, most specific first
    pub fn search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(CONFIG_FILE)];
        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("mailtemplates").join(CONFIG_FILE));
        }
        paths
    }

    fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).wrap_err("Failed to read config file")?;
        let config = serde_yaml::from_str(&content).wrap_err("Failed to parse config file")?;

        info!(?path, "Loaded config");
        Ok(config)
    }
}

/// Syntactic check for a single mailbox address
///
/// Surrounding whitespace makes an address invalid.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_REGEX.is_match(email)
}
