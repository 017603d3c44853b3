//! Gatepass Redemption Validator
//!
//! The gate-side half of the check-in exchange. A validator serves one venue,
//! shared across that venue's gate readers, and decides accept/reject for
//! each presented artifact: credential lookup, status, artifact window, venue
//! binding, both signatures, nonce replay, and finally the atomic
//! consumption that guarantees a credential admits exactly once.

pub mod decision;
pub mod replay;
pub mod validator;

pub use decision::{Decision, RejectReason};
pub use replay::ReplaySet;
pub use validator::{GateConfig, RedemptionValidator};
