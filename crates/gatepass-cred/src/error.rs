use std::fmt;
use thiserror::Error;

/// Error type for the credential engine.
/// Display implementations never leak key material or storage internals.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CredError {
    #[error("invalid ticket state: {0}")]
    InvalidTicketState(String),

    #[error("signing failed")]
    SigningFailed,

    #[error("encoding failed")]
    EncodingFailed,

    #[error("decoding failed")]
    DecodingFailed,

    #[error("credential not found")]
    CredentialNotFound,

    #[error("status transition denied: {0}")]
    StatusTransitionDenied(String),

    #[error("storage failure")]
    StorageFailure,
}

/// Structured error with a CredError variant and a safe message.
#[derive(Debug, Clone)]
pub struct CredErrorDetail {
    pub kind: CredError,
    pub message: String,
    pub credential_id: Option<String>,
}

impl fmt::Display for CredErrorDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        if let Some(ref id) = self.credential_id {
            write!(f, " (credential: {})", id)?;
        }
        Ok(())
    }
}

impl std::error::Error for CredErrorDetail {}

impl CredErrorDetail {
    pub fn new(kind: CredError, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            credential_id: None,
        }
    }

    pub fn with_credential_id(mut self, id: impl Into<String>) -> Self {
        self.credential_id = Some(id.into());
        self
    }
}

impl From<CredError> for CredErrorDetail {
    fn from(kind: CredError) -> Self {
        let message = kind.to_string();
        Self {
            kind,
            message,
            credential_id: None,
        }
    }
}

impl From<gatepass_core::GatepassError> for CredErrorDetail {
    fn from(_err: gatepass_core::GatepassError) -> Self {
        // Never expose backend error details through the credential engine
        Self {
            kind: CredError::StorageFailure,
            message: "storage operation failed".to_string(),
            credential_id: None,
        }
    }
}

pub type CredResult<T> = Result<T, CredErrorDetail>;
