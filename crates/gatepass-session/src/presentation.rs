//! Presentation artifacts.
//!
//! A presentation artifact is the short-lived, single-use proof the holder's
//! device derives for one redemption attempt at one venue. It binds ticket,
//! venue, a fresh nonce, and a time window, and carries the holder device's
//! Ed25519 signature over the canonical payload.
//!
//! Expiry is authoritative only as a time comparison (`is_expired`); any
//! on-screen countdown is a derived, cosmetic view.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use serde::{Deserialize, Serialize};

use gatepass_core::{Nonce, Signer, TicketId, Timestamp, VenueId};
use gatepass_cred::{can_present, Credential};

use crate::error::{SessionError, SessionResult};

/// Policy knobs for the check-in session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionPolicy {
    /// Artifact lifetime in seconds from minting.
    #[serde(default = "default_validity_window_seconds")]
    pub validity_window_seconds: u64,
}

fn default_validity_window_seconds() -> u64 {
    180
}

impl Default for SessionPolicy {
    fn default() -> Self {
        Self {
            validity_window_seconds: default_validity_window_seconds(),
        }
    }
}

/// Short-lived proof derived from a credential for one venue attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresentationArtifact {
    pub kind: String,
    pub ticket_id: TicketId,
    pub venue_id: VenueId,
    pub issued_at: Timestamp,
    pub nonce: Nonce,
    pub expires_at: Timestamp,
    /// Holder device Ed25519 signature over `signing_payload()`, base64url.
    pub signature: String,
}

impl PresentationArtifact {
    /// Canonical byte string the holder device signs.
    pub fn signing_payload(&self) -> String {
        format!(
            "gatepass-presentation|{}|{}|{}|{}|{}",
            self.ticket_id,
            self.venue_id,
            self.issued_at.seconds_since_epoch,
            self.expires_at.seconds_since_epoch,
            self.nonce.to_hex(),
        )
    }

    pub fn is_expired(&self, now: Timestamp) -> bool {
        now > self.expires_at
    }

    /// JSON form handed to the rendering collaborator for QR display.
    pub fn to_qr_string(&self) -> SessionResult<String> {
        serde_json::to_string(self).map_err(|_| SessionError::EncodingFailed)
    }

    /// Parse the wire form a gate reader scanned.
    pub fn from_qr_string(payload: &str) -> SessionResult<Self> {
        let artifact: Self =
            serde_json::from_str(payload).map_err(|_| SessionError::DecodingFailed)?;
        if artifact.kind != "presentation" {
            return Err(SessionError::DecodingFailed);
        }
        Ok(artifact)
    }
}

/// Mint a signed presentation artifact for `venue_id`.
///
/// Requires `credential.status == Valid` at this instant; otherwise no
/// artifact is produced. The nonce is fresh per call — artifacts are never
/// refreshed in place, a new attempt mints a new one.
pub fn issue_presentation(
    credential: &Credential,
    venue_id: &VenueId,
    policy: &SessionPolicy,
    signer: &dyn Signer,
    now: Timestamp,
) -> SessionResult<PresentationArtifact> {
    if !can_present(credential.status) {
        return Err(SessionError::CredentialNotValid {
            status: credential.status,
        });
    }

    let mut artifact = PresentationArtifact {
        kind: "presentation".to_string(),
        ticket_id: credential.ticket_id.clone(),
        venue_id: venue_id.clone(),
        issued_at: now,
        nonce: Nonce::generate(),
        expires_at: now.plus_seconds(policy.validity_window_seconds),
        signature: String::new(),
    };

    let signature = signer
        .sign_ed25519(artifact.signing_payload().as_bytes())
        .map_err(|_| SessionError::SigningFailed)?;
    artifact.signature = URL_SAFE_NO_PAD.encode(signature);

    Ok(artifact)
}

/// Verify the holder signature on an artifact against the device public key
/// bound into the credential.
pub fn verify_artifact_signature(artifact: &PresentationArtifact, holder_pubkey: &[u8; 32]) -> bool {
    let Ok(sig_bytes) = URL_SAFE_NO_PAD.decode(&artifact.signature) else {
        return false;
    };
    let sig: [u8; 64] = match sig_bytes.try_into() {
        Ok(sig) => sig,
        Err(_) => return false,
    };
    gatepass_core::verify_ed25519(holder_pubkey, artifact.signing_payload().as_bytes(), &sig)
}
