//! CLI command definitions and subcommands

use std::path::PathBuf;

use chrono::Utc;
use clap::{Parser, Subcommand};
use tracing::debug;

use crate::config::Config;
use crate::error::EmailError;
use crate::kind::EmailKind;
use crate::mailer::Mailer;
use crate::message::EmailMessage;
use crate::payload::Recipient;

/// mt - transactional email template tool
#[derive(Parser)]
#[command(
    name = "mt",
    about = "Inspect, check and preview transactional email templates",
    version
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(
        short = 'l',
        long = "log-level",
        global = true,
        help = "Log level (TRACE, DEBUG, INFO, WARN, ERROR)"
    )]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// List registered templates and where each was loaded from
    List {
        /// Override directory, instead of the configured templates-path
        #[arg(short, long)]
        templates: Option<PathBuf>,
    },

    /// Load an override directory and report any template that fails to parse
    Check {
        /// Directory of override templates
        #[arg(required = true)]
        dir: PathBuf,
    },

    /// Build one email from sample inputs and print it
    Preview(PreviewArgs),
}

/// Inputs for `mt preview`
#[derive(Debug, Clone, clap::Args)]
pub struct PreviewArgs {
    /// Email kind, e.g. welcome or password-reset-request
    #[arg(required = true)]
    pub kind: EmailKind,

    /// Recipient address
    #[arg(long, required = true)]
    pub to: String,

    /// Recipient first name
    #[arg(long)]
    pub first_name: Option<String>,

    /// Organization name
    #[arg(long, default_value = "Acme")]
    pub organization: String,

    /// Inviter shown in invite emails
    #[arg(long, default_value = "Jane Doe")]
    pub inviter: String,

    /// Role granted by an invite
    #[arg(long, default_value = "member")]
    pub role: String,

    /// Token added to action links
    #[arg(long, default_value = "preview-token")]
    pub token: String,

    /// Assessment name for questionnaire emails
    #[arg(long, default_value = "Security Review")]
    pub assessment: String,

    /// Trust center base URL
    #[arg(long, default_value = "https://trust.example.com")]
    pub trust_center_url: String,

    /// Which parts of the message to print
    #[arg(short, long, default_value = "all")]
    pub format: PreviewFormat,
}

/// Output format for `mt preview`
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum PreviewFormat {
    #[default]
    All,
    Text,
    Html,
    Json,
}

impl std::str::FromStr for PreviewFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        debug!(%s, "PreviewFormat::from_str: called");
        match s.to_lowercase().as_str() {
            "all" => Ok(Self::All),
            "text" | "txt" => Ok(Self::Text),
            "html" => Ok(Self::Html),
            "json" => Ok(Self::Json),
            _ => Err(format!("Unknown format: {}. Use: all, text, html, or json", s)),
        }
    }
}

impl std::fmt::Display for PreviewFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::All => write!(f, "all"),
            Self::Text => write!(f, "text"),
            Self::Html => write!(f, "html"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// Fill unset link bases so previews can build token URLs
///
/// Company and sender settings are left alone and still validated.
pub fn preview_config(mut config: Config) -> Config {
    let urls = &mut config.urls;
    let fallbacks = [
        (&mut urls.root, "https://example.com"),
        (&mut urls.product, "https://console.example.com"),
        (&mut urls.docs, "https://docs.example.com"),
        (&mut urls.verify, "https://console.example.com/verify"),
        (&mut urls.invite, "https://console.example.com/invite"),
        (&mut urls.password_reset, "https://console.example.com/password-reset"),
        (&mut urls.verify_subscriber, "https://example.com/subscribe/verify"),
        (&mut urls.verify_billing, "https://console.example.com/billing/verify"),
        (&mut urls.questionnaire, "https://console.example.com/questionnaire"),
    ];

    for (field, fallback) in fallbacks {
        if field.is_empty() {
            *field = fallback.to_string();
        }
    }
    config
}

/// Build the message `mt preview` prints
pub fn preview_message(mailer: &Mailer, args: &PreviewArgs) -> Result<EmailMessage, EmailError> {
    debug!(kind = %args.kind, to = %args.to, "preview_message: called");
    let mut recipient = Recipient::new(&args.to);
    recipient.first_name = args.first_name.clone();

    let org = args.organization.as_str();
    match args.kind {
        EmailKind::VerifyEmail => mailer.verify_email(recipient, &args.token),
        EmailKind::Welcome => mailer.welcome(recipient, org),
        EmailKind::Invite => mailer.invite(recipient, &args.inviter, org, &args.role, &args.token),
        EmailKind::InviteJoined => mailer.invite_joined(recipient, &args.inviter, org, &args.role),
        EmailKind::PasswordResetRequest => mailer.password_reset_request(recipient, &args.token),
        EmailKind::PasswordResetSuccess => mailer.password_reset_success(recipient),
        EmailKind::Subscribe => mailer.subscribe(recipient, org, &args.token),
        EmailKind::VerifyBilling => mailer.verify_billing(recipient, org, &args.token),
        EmailKind::TrustCenterNdaRequest => {
            mailer.trust_center_nda_request(recipient, org, &args.trust_center_url, &args.token)
        }
        EmailKind::TrustCenterNdaSigned => mailer.trust_center_nda_signed(
            recipient,
            org,
            &args.trust_center_url,
            "nda.pdf",
            b"%PDF-1.7 preview",
        ),
        EmailKind::TrustCenterAuth => mailer.trust_center_auth(recipient, org, &args.trust_center_url, &args.token),
        EmailKind::QuestionnaireAuth => mailer.questionnaire_auth(recipient, &args.assessment, &args.token),
        EmailKind::BillingEmailChanged => {
            let old = format!("billing@{}.example.com", org.to_lowercase().replace(' ', "-"));
            mailer.billing_email_changed(recipient, org, &old, &args.to, Utc::now())
        }
    }
}
