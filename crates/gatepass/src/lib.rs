//! Gatepass
//!
//! Ticket-credential and venue check-in protocol stack. This crate is the
//! holder-side facade: it ties the credential engine, the credential store,
//! and the venue session protocol together behind a `Wallet`, and re-exports
//! the pieces a host application needs.
//!
//! The flow end to end: a booking-system ticket is claimed into a signed,
//! time-bounded credential; the credential is stored durably; at the venue
//! the holder scans a gate beacon and the wallet mints a short-lived, signed
//! presentation artifact; the gate's redemption validator checks it and
//! consumes the credential exactly once.

pub mod error;
pub mod wallet;

pub use error::{WalletError, WalletResult};
pub use wallet::{Wallet, WalletConfig};

pub use gatepass_core::{
    CredentialId, DeviceKey, HolderId, Nonce, Signer, StorageBackend, TicketId, Timestamp, VenueId,
};
pub use gatepass_cred::{
    Credential, CredentialStatus, IssuancePolicy, SubjectSnapshot, Ticket, TicketCategory,
    TicketStatus,
};
pub use gatepass_gate::{Decision, GateConfig, RedemptionValidator, RejectReason};
pub use gatepass_session::{
    AttemptState, CheckinAttempt, PresentationArtifact, ScanError, SessionError, SessionPolicy,
};
pub use gatepass_store::{CredentialStore, MemoryBackend, SqliteBackend};
