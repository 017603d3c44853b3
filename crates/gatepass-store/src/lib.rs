//! Gatepass Credential Store
//!
//! Durable keyed storage of issued credentials, addressable by credential ID
//! and by ticket ID. The store owns the keying conventions and the
//! read-modify-write discipline; byte-level persistence is delegated to a
//! `StorageBackend` (SQLite in production, in-memory for tests).
//!
//! Status flips (valid -> consumed, valid -> revoked) go through a single
//! compare-and-swap path so that concurrent gates can never both win.

pub mod memory_backend;
pub mod sqlite_backend;
pub mod store;

pub use memory_backend::MemoryBackend;
pub use sqlite_backend::SqliteBackend;
pub use store::{CredentialStore, StatusSwap};
