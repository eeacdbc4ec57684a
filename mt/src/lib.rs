//! mailtemplates - Transactional email templates
//!
//! Renders the emails a SaaS backend sends on account and organization
//! events (verification, invites, password resets, trust center access and
//! so on) from paired text/HTML Handlebars templates, and assembles them
//! into messages ready for a mail transport.
//!
//! # Core Concepts
//!
//! - **Embedded Defaults**: Every template ships inside the binary
//! - **Operator Overrides**: A templates directory replaces defaults by name, loaded once
//! - **Paired Bodies**: Each email renders both `<name>.txt` and `<name>.html` or fails
//! - **Single-use Links**: Tokens become the only query parameter of a base URL
//!
//! # Modules
//!
//! - [`templates`] - Template registry, partials and embedded defaults
//! - [`render`] - Paired text/HTML rendering
//! - [`payload`] - Shared and per-kind template data
//! - [`mailer`] - Per-kind email builders
//! - [`config`] - Configuration types and loading
//! - [`cli`] - Command-line interface

pub mod cli;
pub mod config;
pub mod error;
pub mod kind;
pub mod links;
pub mod mailer;
pub mod message;
pub mod payload;
pub mod render;
pub mod templates;

// Re-export commonly used types
pub use config::{Config, UrlConfig};
pub use error::{EmailError, TemplateError};
pub use kind::EmailKind;
pub use links::add_token_to_url;
pub use mailer::Mailer;
pub use message::{Attachment, EmailMessage};
pub use payload::{EmailData, EmailPayload, Recipient};
pub use render::{RenderedEmail, render};
pub use templates::{Template, TemplateFormat, TemplateOrigin, TemplateRegistry, TemplateSource};
