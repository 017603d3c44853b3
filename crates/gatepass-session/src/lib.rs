//! Gatepass Venue Session Protocol
//!
//! The holder-side half of the two-phase check-in exchange: decode a venue
//! beacon, bind the attempt to that venue, and mint a short-lived, signed
//! presentation artifact for the gate to read.
//!
//! The protocol is single-device sequential; there is no background timer.
//! Expiry is a pure time comparison evaluated when someone asks, and every
//! restart of an attempt means a fresh scan and a fresh nonce.

pub mod attempt;
pub mod beacon;
pub mod error;
pub mod presentation;

pub use attempt::{AttemptState, CheckinAttempt, ScanOutcome};
pub use beacon::{parse_venue_beacon, VenueBeacon};
pub use error::{ScanError, SessionError, SessionResult};
pub use presentation::{
    issue_presentation, verify_artifact_signature, PresentationArtifact, SessionPolicy,
};
