//! Email kinds and their logical template names

use std::fmt;
use std::str::FromStr;

/// Every transactional email this crate can build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EmailKind {
    VerifyEmail,
    Welcome,
    Invite,
    InviteJoined,
    PasswordResetRequest,
    PasswordResetSuccess,
    Subscribe,
    VerifyBilling,
    TrustCenterNdaRequest,
    TrustCenterNdaSigned,
    TrustCenterAuth,
    QuestionnaireAuth,
    BillingEmailChanged,
}

impl EmailKind {
    pub const ALL: [EmailKind; 13] = [
        Self::VerifyEmail,
        Self::Welcome,
        Self::Invite,
        Self::InviteJoined,
        Self::PasswordResetRequest,
        Self::PasswordResetSuccess,
        Self::Subscribe,
        Self::VerifyBilling,
        Self::TrustCenterNdaRequest,
        Self::TrustCenterNdaSigned,
        Self::TrustCenterAuth,
        Self::QuestionnaireAuth,
        Self::BillingEmailChanged,
    ];

    /// Base file name shared by the `.txt` and `.html` templates
    pub fn template_name(&self) -> &'static str {
        match self {
            Self::VerifyEmail => "verify_email",
            Self::Welcome => "welcome",
            Self::Invite => "invite",
            Self::InviteJoined => "invite_joined",
            Self::PasswordResetRequest => "password_reset_request",
            Self::PasswordResetSuccess => "password_reset_success",
            Self::Subscribe => "subscribe",
            Self::VerifyBilling => "verify_billing",
            Self::TrustCenterNdaRequest => "trust_center_nda_request",
            Self::TrustCenterNdaSigned => "trust_center_nda_signed",
            Self::TrustCenterAuth => "trust_center_auth",
            Self::QuestionnaireAuth => "questionnaire_auth",
            Self::BillingEmailChanged => "billing_email_changed",
        }
    }
}

impl fmt::Display for EmailKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.template_name())
    }
}

impl FromStr for EmailKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|kind| kind.template_name() == normalized)
            .ok_or_else(|| format!("unknown email kind: {}", s))
    }
}
