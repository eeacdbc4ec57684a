//! Template payloads
//!
//! Every kind-specific payload holds the shared [`EmailData`] in an `email`
//! field. The base is serialized flattened, so templates see the shared
//! settings and recipient next to the kind's own fields.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::Config;
use crate::error::EmailError;
use crate::message::EmailMessage;

/// Who an email is sent to
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipient {
    pub email: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

impl Recipient {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            first_name: None,
            last_name: None,
        }
    }

    pub fn with_name(mut self, first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        self.first_name = Some(first_name.into());
        self.last_name = Some(last_name.into());
        self
    }
}

/// Fields common to every email
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EmailData {
    #[serde(flatten)]
    pub config: Config,
    /// Set after rendering, from the kind's subject line
    pub subject: String,
    pub recipient: Recipient,
}

impl EmailData {
    pub fn new(config: Config, recipient: Recipient) -> Self {
        Self {
            config,
            subject: String::new(),
            recipient,
        }
    }

    /// Check that everything needed for a sendable email is present
    pub fn validate(&self) -> Result<(), EmailError> {
        if self.subject.is_empty() {
            return Err(EmailError::missing_field("subject"));
        }
        if self.recipient.email.is_empty() {
            return Err(EmailError::missing_field("email"));
        }
        Ok(())
    }

    /// Assemble the outgoing message from pre-rendered bodies
    pub fn build(&self, text: String, html: String) -> Result<EmailMessage, EmailError> {
        debug!(subject = %self.subject, to = %self.recipient.email, "EmailData::build: called");
        self.validate()?;

        Ok(EmailMessage {
            to: vec![self.recipient.email.clone()],
            from: self.config.from_email.clone(),
            subject: self.subject.clone(),
            html,
            text,
            attachments: Vec::new(),
        })
    }
}

/// A payload that can be rendered and turned into a message
pub trait EmailPayload: Serialize {
    fn email(&self) -> &EmailData;
    fn email_mut(&mut self) -> &mut EmailData;
}

impl EmailPayload for EmailData {
    fn email(&self) -> &EmailData {
        self
    }

    fn email_mut(&mut self) -> &mut EmailData {
        self
    }
}

macro_rules! email_payload {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl EmailPayload for $ty {
                fn email(&self) -> &EmailData {
                    &self.email
                }

                fn email_mut(&mut self) -> &mut EmailData {
                    &mut self.email
                }
            }
        )+
    };
}

email_payload!(
    VerifyEmailData,
    WelcomeData,
    InviteData,
    PasswordResetRequestData,
    PasswordResetSuccessData,
    SubscriberData,
    VerifyBillingData,
    TrustCenterNdaRequestData,
    TrustCenterNdaSignedData,
    TrustCenterAuthData,
    QuestionnaireAuthData,
    BillingEmailChangedData,
);

#[derive(Debug, Clone, Serialize)]
pub struct VerifyEmailData {
    #[serde(flatten)]
    pub email: EmailData,
    pub verify_url: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct WelcomeData {
    #[serde(flatten)]
    pub email: EmailData,
    pub organization: String,
}

/// Used for both the invitation and the "invite accepted" notice
#[derive(Debug, Clone, Serialize)]
pub struct InviteData {
    #[serde(flatten)]
    pub email: EmailData,
    pub inviter_name: String,
    pub organization_name: String,
    pub role: String,
    /// Empty for the "invite accepted" notice
    pub invite_url: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PasswordResetRequestData {
    #[serde(flatten)]
    pub email: EmailData,
    pub reset_url: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PasswordResetSuccessData {
    #[serde(flatten)]
    pub email: EmailData,
}

#[derive(Debug, Clone, Serialize)]
pub struct SubscriberData {
    #[serde(flatten)]
    pub email: EmailData,
    pub organization_name: String,
    pub verify_subscriber_url: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct VerifyBillingData {
    #[serde(flatten)]
    pub email: EmailData,
    pub organization_name: String,
    pub verify_billing_url: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TrustCenterNdaRequestData {
    #[serde(flatten)]
    pub email: EmailData,
    pub organization_name: String,
    pub nda_url: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TrustCenterNdaSignedData {
    #[serde(flatten)]
    pub email: EmailData,
    pub organization_name: String,
    pub trust_center_url: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TrustCenterAuthData {
    #[serde(flatten)]
    pub email: EmailData,
    pub organization_name: String,
    pub auth_url: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuestionnaireAuthData {
    #[serde(flatten)]
    pub email: EmailData,
    pub assessment_name: String,
    pub auth_url: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct BillingEmailChangedData {
    #[serde(flatten)]
    pub email: EmailData,
    pub organization_name: String,
    pub old_billing_email: String,
    pub new_billing_email: String,
    /// Human-readable time of the change
    pub changed_at: String,
}
