//! The redemption validator.
//!
//! Shared across all gate readers at one venue. Checks a presented artifact
//! in a fixed order and, on success, flips the credential to consumed through
//! the store's compare-and-swap path, so at most one `Accepted` can ever be
//! produced per credential no matter how many readers race.

use serde::{Deserialize, Serialize};

use gatepass_core::{types::hex_bytes, GatepassResult, Timestamp, VenueId};
use gatepass_cred::{verify_credential_signature, CredentialStatus};
use gatepass_session::{verify_artifact_signature, PresentationArtifact};
use gatepass_store::{CredentialStore, StatusSwap};

use crate::decision::{Decision, RejectReason};
use crate::replay::ReplaySet;

/// Identity of the gate this validator serves.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateConfig {
    /// The venue this gate belongs to; artifacts minted for any other venue
    /// are rejected.
    pub venue_id: VenueId,
    /// Ed25519 public key of the trusted credential issuer.
    #[serde(with = "hex_bytes")]
    pub issuer_pubkey: [u8; 32],
}

pub struct RedemptionValidator {
    config: GateConfig,
    store: CredentialStore,
    replay: ReplaySet,
}

impl RedemptionValidator {
    pub fn new(config: GateConfig, store: CredentialStore) -> Self {
        Self {
            config,
            store,
            replay: ReplaySet::new(),
        }
    }

    /// Decide on one presented artifact.
    ///
    /// Protocol rejections come back as `Decision::Rejected`; only
    /// infrastructure failures (storage, poisoned locks) are `Err`.
    pub fn validate(
        &self,
        artifact: &PresentationArtifact,
        now: Timestamp,
    ) -> GatepassResult<Decision> {
        let Some(credential) = self.store.get_by_ticket_id(&artifact.ticket_id)? else {
            return Ok(self.reject(artifact, RejectReason::UnknownTicket));
        };

        if credential.status != CredentialStatus::Valid || credential.is_expired(now) {
            return Ok(self.reject(artifact, RejectReason::CredentialNotValid));
        }

        if artifact.is_expired(now) {
            return Ok(self.reject(artifact, RejectReason::ArtifactExpired));
        }

        if artifact.venue_id != self.config.venue_id {
            return Ok(self.reject(artifact, RejectReason::VenueMismatch));
        }

        // Both signatures must hold: the issuer's over the credential and the
        // holder device's over the artifact.
        if !verify_credential_signature(&credential, &self.config.issuer_pubkey)
            || !verify_artifact_signature(artifact, &credential.holder_pubkey)
        {
            return Ok(self.reject(artifact, RejectReason::SignatureInvalid));
        }

        let nonce_hex = artifact.nonce.to_hex();
        if self.replay.seen(&credential.credential_id, &nonce_hex)? {
            return Ok(self.reject(artifact, RejectReason::NonceReused));
        }

        // Critical section: exactly one winner per credential.
        match self.store.consume(&credential.credential_id)? {
            StatusSwap::Applied(consumed) => {
                self.replay
                    .record(&consumed.credential_id, &nonce_hex, artifact.expires_at)?;
                tracing::info!(
                    credential_id = %consumed.credential_id,
                    ticket_id = %artifact.ticket_id,
                    venue_id = %self.config.venue_id,
                    "credential consumed"
                );
                Ok(Decision::Accepted)
            }
            // Race loser: an honest re-derivation of state, not a distinct
            // error class.
            StatusSwap::Denied { .. } => {
                Ok(self.reject(artifact, RejectReason::CredentialNotValid))
            }
            StatusSwap::NotFound => Ok(self.reject(artifact, RejectReason::UnknownTicket)),
        }
    }

    /// Drop replay entries whose artifacts have expired. Periodic
    /// maintenance; safe to call at any time.
    pub fn cleanup_replay(&self, now: Timestamp) -> GatepassResult<usize> {
        self.replay.cleanup_expired(now)
    }

    pub fn venue_id(&self) -> &VenueId {
        &self.config.venue_id
    }

    fn reject(&self, artifact: &PresentationArtifact, reason: RejectReason) -> Decision {
        tracing::debug!(
            ticket_id = %artifact.ticket_id,
            venue_id = %self.config.venue_id,
            %reason,
            "presentation rejected"
        );
        Decision::Rejected(reason)
    }
}
