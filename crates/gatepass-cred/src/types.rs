use gatepass_core::types::hex_bytes;
use gatepass_core::{CredentialId, HolderId, TicketId, Timestamp};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

// ---------------------------------------------------------------------------
// Ticket — the booking-system record (external, read-only to this stack)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TicketCategory {
    Concert,
    Movie,
    Sports,
    Exhibition,
    Other,
}

impl fmt::Display for TicketCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TicketCategory::Concert => write!(f, "concert"),
            TicketCategory::Movie => write!(f, "movie"),
            TicketCategory::Sports => write!(f, "sports"),
            TicketCategory::Exhibition => write!(f, "exhibition"),
            TicketCategory::Other => write!(f, "other"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TicketStatus {
    Active,
    Used,
    Expired,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    pub id: TicketId,
    pub title: String,
    pub event_date: String,
    pub location: String,
    pub seat: String,
    pub issuer_name: String,
    pub category: TicketCategory,
    pub status: TicketStatus,
}

// ---------------------------------------------------------------------------
// SubjectSnapshot — the ticket display fields frozen at issuance time
// ---------------------------------------------------------------------------

/// Immutable copy of what the ticket looked like when the credential was
/// minted. Never re-derived from the (possibly changed) ticket afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectSnapshot {
    pub title: String,
    pub event_date: String,
    pub location: String,
    pub seat: String,
    pub category: TicketCategory,
}

impl SubjectSnapshot {
    pub fn from_ticket(ticket: &Ticket) -> Self {
        Self {
            title: ticket.title.clone(),
            event_date: ticket.event_date.clone(),
            location: ticket.location.clone(),
            seat: ticket.seat.clone(),
            category: ticket.category,
        }
    }

    /// SHA-256 digest of the canonical snapshot encoding, bound into the
    /// credential signature.
    pub fn digest(&self) -> String {
        let canonical = format!(
            "{}|{}|{}|{}|{}",
            self.title, self.event_date, self.location, self.seat, self.category
        );
        hex::encode(Sha256::digest(canonical.as_bytes()))
    }
}

// ---------------------------------------------------------------------------
// CredentialStatus — four-state lifecycle
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CredentialStatus {
    Valid,
    Consumed,
    Revoked,
    Expired,
}

impl fmt::Display for CredentialStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialStatus::Valid => write!(f, "valid"),
            CredentialStatus::Consumed => write!(f, "consumed"),
            CredentialStatus::Revoked => write!(f, "revoked"),
            CredentialStatus::Expired => write!(f, "expired"),
        }
    }
}

// ---------------------------------------------------------------------------
// Credential — "holder H holds ticket T, issued by I, valid until E"
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    pub credential_id: CredentialId,
    pub ticket_id: TicketId,
    pub holder_id: HolderId,
    /// Ed25519 public key of the holder's device, bound at issuance so the
    /// gate can verify presentation signatures.
    #[serde(with = "hex_bytes")]
    pub holder_pubkey: [u8; 32],
    pub issuer: String,
    pub issued_at: Timestamp,
    pub expires_at: Option<Timestamp>,
    pub status: CredentialStatus,
    pub subject_snapshot: SubjectSnapshot,
    /// Issuer Ed25519 signature over `signing_payload()`, base64url.
    pub signature: String,
}

impl Credential {
    /// Canonical byte string the issuer signs. Covers the immutable identity
    /// fields and the snapshot digest; status is deliberately excluded since
    /// it mutates after issuance.
    pub fn signing_payload(&self) -> String {
        let expires = self
            .expires_at
            .map(|t| t.seconds_since_epoch.to_string())
            .unwrap_or_else(|| "never".to_string());
        format!(
            "gatepass-cred|{}|{}|{}|{}|{}|{}|{}|{}",
            self.credential_id,
            self.ticket_id,
            self.holder_id,
            hex::encode(self.holder_pubkey),
            self.issuer,
            self.issued_at.seconds_since_epoch,
            expires,
            self.subject_snapshot.digest(),
        )
    }

    /// Lazy expiry check; the authoritative answer is a time comparison, not
    /// a stored flag.
    pub fn is_expired(&self, now: Timestamp) -> bool {
        match self.expires_at {
            Some(expiry) => now > expiry,
            None => false,
        }
    }
}
