use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// RejectReason — why a gate turned a presentation away
//
// Rejections are decisions, not errors. Every race loser gets an explicit
// reason; nothing is swallowed inside the consumption critical section.
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    /// No credential exists for the presented ticket.
    UnknownTicket,
    /// The credential is not currently valid (consumed, revoked, or expired;
    /// also what a loser of the consumption race observes).
    CredentialNotValid,
    /// The artifact's validity window has passed.
    ArtifactExpired,
    /// The artifact was minted for a different venue than this gate.
    VenueMismatch,
    /// Issuer or holder signature failed verification.
    SignatureInvalid,
    /// This (credential, nonce) pair was already presented.
    NonceReused,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::UnknownTicket => write!(f, "unknown_ticket"),
            RejectReason::CredentialNotValid => write!(f, "credential_not_valid"),
            RejectReason::ArtifactExpired => write!(f, "artifact_expired"),
            RejectReason::VenueMismatch => write!(f, "venue_mismatch"),
            RejectReason::SignatureInvalid => write!(f, "signature_invalid"),
            RejectReason::NonceReused => write!(f, "nonce_reused"),
        }
    }
}

/// The gate's verdict on one presented artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "decision", content = "reason", rename_all = "snake_case")]
pub enum Decision {
    Accepted,
    Rejected(RejectReason),
}

impl Decision {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Decision::Accepted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decision_serde_shape() {
        let json = serde_json::to_string(&Decision::Rejected(RejectReason::VenueMismatch)).unwrap();
        assert_eq!(json, r#"{"decision":"rejected","reason":"venue_mismatch"}"#);

        let json = serde_json::to_string(&Decision::Accepted).unwrap();
        assert_eq!(json, r#"{"decision":"accepted"}"#);
    }

    #[test]
    fn test_is_accepted() {
        assert!(Decision::Accepted.is_accepted());
        assert!(!Decision::Rejected(RejectReason::NonceReused).is_accepted());
    }
}
