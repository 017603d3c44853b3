use gatepass_cred::CredentialStatus;
use thiserror::Error;

// ---------------------------------------------------------------------------
// ScanError — a beacon payload that could not be bound
//
// All variants are recoverable: the attempt stays in AwaitingVenueScan and
// the holder may simply scan again.
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScanError {
    #[error("beacon payload is not valid JSON")]
    MalformedPayload,
    #[error("beacon kind {0:?} is not a venue beacon")]
    WrongKind(String),
    #[error("beacon has no venue id")]
    MissingVenueId,
}

// ---------------------------------------------------------------------------
// SessionError — failures of the check-in attempt itself
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error(transparent)]
    Scan(#[from] ScanError),
    /// The credential cannot back a presentation right now. Recoverable by
    /// re-fetching credential state, never by retrying the same call.
    #[error("credential is not eligible for presentation (status: {status})")]
    CredentialNotValid { status: CredentialStatus },
    #[error("holder device signing failed")]
    SigningFailed,
    #[error("presentation payload could not be encoded")]
    EncodingFailed,
    #[error("presentation payload could not be decoded")]
    DecodingFailed,
}

pub type SessionResult<T> = Result<T, SessionError>;
