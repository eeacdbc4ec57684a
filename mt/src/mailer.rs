//! Email builders
//!
//! [`Mailer`] owns the validated configuration and a shared template
//! registry. Each builder method fills the kind's payload, renders it, sets
//! the subject and assembles the message.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::config::Config;
use crate::error::EmailError;
use crate::kind::EmailKind;
use crate::links::{add_token_to_url, normalize_url};
use crate::message::{Attachment, EmailMessage};
use crate::payload::*;
use crate::render::render;
use crate::templates::TemplateRegistry;

/// Builds transactional emails from configuration and templates
#[derive(Debug, Clone)]
pub struct Mailer {
    config: Config,
    registry: Arc<TemplateRegistry>,
}

impl Mailer {
    /// Validate `config`, parse the default templates and apply any override
    /// directory named in the configuration
    pub fn new(config: Config) -> Result<Self, EmailError> {
        debug!("Mailer::new: called");
        let registry = TemplateRegistry::load_defaults()?;
        Self::with_registry(config, Arc::new(registry))
    }

    /// Use an already loaded registry, e.g. one shared between mailers
    ///
    /// The override directory from `config` is applied to the registry if no
    /// override has been loaded into it yet.
    pub fn with_registry(config: Config, registry: Arc<TemplateRegistry>) -> Result<Self, EmailError> {
        config.validate()?;

        if let Some(path) = &config.templates_path {
            registry
                .load_overrides(path)
                .map_err(|e| EmailError::Configuration {
                    message: format!("could not load templates from {}", path.display()),
                    source: Some(e),
                })?;
            info!(?path, "Template overrides active");
        }

        Ok(Self { config, registry })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn registry(&self) -> &Arc<TemplateRegistry> {
        &self.registry
    }

    /// Shared payload base for `recipient`, filled from this mailer's config
    pub fn email_data(&self, recipient: Recipient) -> EmailData {
        EmailData::new(self.config.clone(), recipient)
    }

    /// Render the kind's templates against `data`, set the subject and
    /// assemble the message
    ///
    /// The per-kind methods call this with the payload they fill. Callers
    /// whose override templates need extra fields can build their own payload
    /// and pass it here.
    pub fn build<T: EmailPayload>(&self, kind: EmailKind, mut data: T, subject: String) -> Result<EmailMessage, EmailError> {
        debug!(%kind, to = %data.email().recipient.email, "Mailer::build: called");
        let rendered = render(&self.registry, kind.template_name(), &data)?;

        data.email_mut().subject = subject;

        data.email().build(rendered.text, rendered.html)
    }

    /// Ask a new user to confirm their email address
    pub fn verify_email(&self, recipient: Recipient, token: &str) -> Result<EmailMessage, EmailError> {
        let data = VerifyEmailData {
            verify_url: add_token_to_url(&self.config.urls.verify, token)?,
            email: self.email_data(recipient),
        };
        let subject = format!("Please verify your email address to login to {}", self.config.company_name);
        self.build(EmailKind::VerifyEmail, data, subject)
    }

    pub fn welcome(&self, recipient: Recipient, organization: &str) -> Result<EmailMessage, EmailError> {
        let data = WelcomeData {
            email: self.email_data(recipient),
            organization: organization.to_string(),
        };
        let subject = format!("Welcome to {}!", self.config.company_name);
        self.build(EmailKind::Welcome, data, subject)
    }

    /// Invite a user to join an organization
    pub fn invite(
        &self,
        recipient: Recipient,
        inviter_name: &str,
        organization_name: &str,
        role: &str,
        token: &str,
    ) -> Result<EmailMessage, EmailError> {
        let data = InviteData {
            invite_url: add_token_to_url(&self.config.urls.invite, token)?,
            email: self.email_data(recipient),
            inviter_name: inviter_name.to_string(),
            organization_name: organization_name.to_string(),
            role: role.to_string(),
        };
        let subject = format!("Join Your Teammate {} on {}!", inviter_name, self.config.company_name);
        self.build(EmailKind::Invite, data, subject)
    }

    /// Tell a user their invite was accepted and they joined the organization
    pub fn invite_joined(
        &self,
        recipient: Recipient,
        inviter_name: &str,
        organization_name: &str,
        role: &str,
    ) -> Result<EmailMessage, EmailError> {
        let data = InviteData {
            email: self.email_data(recipient),
            inviter_name: inviter_name.to_string(),
            organization_name: organization_name.to_string(),
            role: role.to_string(),
            invite_url: String::new(),
        };
        let subject = format!("You've been added to an Organization on {}", self.config.company_name);
        self.build(EmailKind::InviteJoined, data, subject)
    }

    pub fn password_reset_request(&self, recipient: Recipient, token: &str) -> Result<EmailMessage, EmailError> {
        let data = PasswordResetRequestData {
            reset_url: add_token_to_url(&self.config.urls.password_reset, token)?,
            email: self.email_data(recipient),
        };
        let subject = format!("{} Password Reset - Action Required", self.config.company_name);
        self.build(EmailKind::PasswordResetRequest, data, subject)
    }

    pub fn password_reset_success(&self, recipient: Recipient) -> Result<EmailMessage, EmailError> {
        let data = PasswordResetSuccessData {
            email: self.email_data(recipient),
        };
        let subject = format!("{} Password Reset Confirmation", self.config.company_name);
        self.build(EmailKind::PasswordResetSuccess, data, subject)
    }

    /// Confirm a subscription to an organization's updates
    pub fn subscribe(&self, recipient: Recipient, organization_name: &str, token: &str) -> Result<EmailMessage, EmailError> {
        let data = SubscriberData {
            verify_subscriber_url: add_token_to_url(&self.config.urls.verify_subscriber, token)?,
            email: self.email_data(recipient),
            organization_name: organization_name.to_string(),
        };
        let subject = format!("You've been subscribed to {}", organization_name);
        self.build(EmailKind::Subscribe, data, subject)
    }

    pub fn verify_billing(
        &self,
        recipient: Recipient,
        organization_name: &str,
        token: &str,
    ) -> Result<EmailMessage, EmailError> {
        let data = VerifyBillingData {
            verify_billing_url: add_token_to_url(&self.config.urls.verify_billing, token)?,
            email: self.email_data(recipient),
            organization_name: organization_name.to_string(),
        };
        let subject = format!("Please verify your billing email for {}", self.config.company_name);
        self.build(EmailKind::VerifyBilling, data, subject)
    }

    /// Ask a trust center visitor to sign the organization's NDA
    ///
    /// Trust centers live on per-organization domains, so the caller supplies
    /// the base URL the token is added to.
    pub fn trust_center_nda_request(
        &self,
        recipient: Recipient,
        organization_name: &str,
        trust_center_url: &str,
        token: &str,
    ) -> Result<EmailMessage, EmailError> {
        let data = TrustCenterNdaRequestData {
            nda_url: add_token_to_url(trust_center_url, token)?,
            email: self.email_data(recipient),
            organization_name: organization_name.to_string(),
        };
        let subject = format!("{} - Non-Disclosure Agreement Request", organization_name);
        self.build(EmailKind::TrustCenterNdaRequest, data, subject)
    }

    /// Send the signed NDA back to the signer as an attachment
    pub fn trust_center_nda_signed(
        &self,
        recipient: Recipient,
        organization_name: &str,
        trust_center_url: &str,
        filename: &str,
        content: &[u8],
    ) -> Result<EmailMessage, EmailError> {
        if filename.is_empty() {
            return Err(EmailError::missing_field("filename"));
        }

        let data = TrustCenterNdaSignedData {
            trust_center_url: normalize_url(trust_center_url)?,
            email: self.email_data(recipient),
            organization_name: organization_name.to_string(),
        };
        let subject = format!("Your signed {} Non-Disclosure Agreement", organization_name);

        let mut message = self.build(EmailKind::TrustCenterNdaSigned, data, subject)?;
        message.add_attachment(Attachment::new(filename, content));
        Ok(message)
    }

    pub fn trust_center_auth(
        &self,
        recipient: Recipient,
        organization_name: &str,
        trust_center_url: &str,
        token: &str,
    ) -> Result<EmailMessage, EmailError> {
        let data = TrustCenterAuthData {
            auth_url: add_token_to_url(trust_center_url, token)?,
            email: self.email_data(recipient),
            organization_name: organization_name.to_string(),
        };
        let subject = format!("Access the {} Trust Center", organization_name);
        self.build(EmailKind::TrustCenterAuth, data, subject)
    }

    /// Give an external respondent access to a questionnaire
    ///
    /// Sent from the questionnaire address when one is configured.
    pub fn questionnaire_auth(
        &self,
        recipient: Recipient,
        assessment_name: &str,
        token: &str,
    ) -> Result<EmailMessage, EmailError> {
        let data = QuestionnaireAuthData {
            auth_url: add_token_to_url(&self.config.urls.questionnaire, token)?,
            email: self.email_data(recipient),
            assessment_name: assessment_name.to_string(),
        };
        let subject = format!(
            "Complete the {} Questionnaire on {}",
            assessment_name, self.config.company_name
        );

        let mut message = self.build(EmailKind::QuestionnaireAuth, data, subject)?;
        message.from = self.config.questionnaire_sender().to_string();
        Ok(message)
    }

    /// Notify that an organization's billing email was changed
    pub fn billing_email_changed(
        &self,
        recipient: Recipient,
        organization_name: &str,
        old_billing_email: &str,
        new_billing_email: &str,
        changed_at: DateTime<Utc>,
    ) -> Result<EmailMessage, EmailError> {
        let data = BillingEmailChangedData {
            email: self.email_data(recipient),
            organization_name: organization_name.to_string(),
            old_billing_email: old_billing_email.to_string(),
            new_billing_email: new_billing_email.to_string(),
            changed_at: changed_at.format("%B %-d, %Y at %H:%M UTC").to_string(),
        };
        let subject = format!("Billing email changed for {} on {}", organization_name, self.config.company_name);
        self.build(EmailKind::BillingEmailChanged, data, subject)
    }
}
