//! Gatepass Core
//!
//! Shared foundation for the Gatepass ticketing credential stack: typed
//! identifiers, the canonical `Timestamp` and `Nonce` types, device keys,
//! and the `Signer`/`StorageBackend` traits every other crate builds on.
//!
//! Nothing in this crate knows about tickets, credentials, or venues; it is
//! the vocabulary the protocol crates share.

pub mod crypto;
pub mod error;
pub mod traits;
pub mod types;

pub use crypto::{holder_id_from_pubkey, verify_ed25519, verify_holder_id, DeviceKey};
pub use error::{GatepassError, GatepassResult};
pub use traits::{Signer, StorageBackend};
pub use types::{CredentialId, HolderId, Nonce, RecordId, TicketId, Timestamp, VenueId};
