//! Gatepass Credential Engine
//!
//! Converts booking-system tickets into signed, time-bounded entry
//! credentials and governs their status lifecycle.
//!
//! A credential is the claim "holder H holds ticket T, issued by I, valid
//! until E". Issuance copies the ticket's display fields into an immutable
//! subject snapshot, so what was true at issuance stays auditable even if
//! the ticket record later changes.
//!
//! All signing is delegated via the `Signer` trait; the engine never touches
//! raw key material. Issuance is pure with respect to storage — persisting
//! the credential is the caller's job, so a failed store write can be
//! retried without minting a new credential identity.

pub mod error;
pub mod issuance;
pub mod status;
pub mod types;

pub use error::{CredError, CredErrorDetail, CredResult};
pub use issuance::{issue_credential, verify_credential_signature, IssuancePolicy};
pub use status::{can_present, is_valid_transition, transition};
pub use types::*;
