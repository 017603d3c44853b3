//! Credential status machine.
//!
//! States: Valid, Consumed, Revoked, Expired.
//! Valid transitions:
//!   Valid -> Consumed (atomic, via the redemption path only)
//!   Valid -> Revoked  (explicit external trigger)
//!   Valid -> Expired  (time-triggered)
//! Consumed, Revoked, and Expired are terminal.

use crate::error::{CredError, CredErrorDetail, CredResult};
use crate::types::CredentialStatus;

/// Check whether a status transition is valid.
pub fn is_valid_transition(from: CredentialStatus, to: CredentialStatus) -> bool {
    matches!(
        (from, to),
        (CredentialStatus::Valid, CredentialStatus::Consumed)
            | (CredentialStatus::Valid, CredentialStatus::Revoked)
            | (CredentialStatus::Valid, CredentialStatus::Expired)
    )
}

/// Attempt a status transition, returning the new status or an error.
pub fn transition(from: CredentialStatus, to: CredentialStatus) -> CredResult<CredentialStatus> {
    if is_valid_transition(from, to) {
        Ok(to)
    } else {
        Err(CredErrorDetail::new(
            CredError::StatusTransitionDenied(format!("{} -> {}", from, to)),
            format!("transition from {} to {} is not allowed", from, to),
        ))
    }
}

/// Check if a credential may back a presentation (must be Valid).
pub fn can_present(status: CredentialStatus) -> bool {
    status == CredentialStatus::Valid
}

/// Transition to Consumed; only the redemption validator's atomic path
/// should call this.
pub fn transition_to_consumed(current: CredentialStatus) -> CredResult<CredentialStatus> {
    transition(current, CredentialStatus::Consumed)
}

/// Transition to Revoked. Revocation is an explicit external trigger, never
/// inferred from expiry.
pub fn transition_to_revoked(current: CredentialStatus) -> CredResult<CredentialStatus> {
    transition(current, CredentialStatus::Revoked)
}

/// Transition to Expired once wall-clock time has passed the credential's
/// expiry.
pub fn transition_to_expired(current: CredentialStatus) -> CredResult<CredentialStatus> {
    transition(current, CredentialStatus::Expired)
}
