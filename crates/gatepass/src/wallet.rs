//! The holder-side wallet.
//!
//! Orchestrates the full holder flow: claim a credential for a ticket,
//! persist it, and run check-in attempts against venue gates. The wallet
//! owns the device key and acts as the holder's `Signer`; the issuing
//! service's signer is injected per claim.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use gatepass_core::{DeviceKey, HolderId, Signer, StorageBackend, TicketId, Timestamp};
use gatepass_cred::{issue_credential, Credential, IssuancePolicy, Ticket};
use gatepass_gate::Decision;
use gatepass_session::{CheckinAttempt, ScanOutcome, SessionPolicy};
use gatepass_store::CredentialStore;

use crate::error::{WalletError, WalletResult};

/// Wallet configuration; every section defaults sensibly when absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WalletConfig {
    #[serde(default)]
    pub issuance: IssuancePolicy,
    #[serde(default)]
    pub session: SessionPolicy,
}

pub struct Wallet {
    store: CredentialStore,
    device: DeviceKey,
    config: WalletConfig,
}

impl Wallet {
    pub fn new(backend: Arc<dyn StorageBackend>, device: DeviceKey, config: WalletConfig) -> Self {
        Self {
            store: CredentialStore::new(backend),
            device,
            config,
        }
    }

    pub fn holder_id(&self) -> HolderId {
        self.device.holder_id()
    }

    pub fn device_pubkey(&self) -> [u8; 32] {
        self.device.public_key_ed25519()
    }

    pub fn store(&self) -> &CredentialStore {
        &self.store
    }

    /// Claim a credential for a ticket: issue through the given issuer signer
    /// and persist. If persistence fails the credential is treated as never
    /// issued; the caller may retry the whole claim.
    pub fn claim_ticket(&self, ticket: &Ticket, issuer: &dyn Signer) -> WalletResult<Credential> {
        let credential = issue_credential(
            ticket,
            self.device.holder_id(),
            self.device.public_key_ed25519(),
            &self.config.issuance,
            issuer,
        )?;
        self.store.put(&credential)?;
        tracing::info!(
            credential_id = %credential.credential_id,
            ticket_id = %ticket.id,
            "credential claimed"
        );
        Ok(credential)
    }

    pub fn credentials(&self) -> WalletResult<Vec<Credential>> {
        Ok(self.store.get_all()?)
    }

    pub fn credential_for(&self, ticket_id: &TicketId) -> WalletResult<Option<Credential>> {
        Ok(self.store.get_by_ticket_id(ticket_id)?)
    }

    /// Start a fresh check-in attempt for a ticket's current credential.
    pub fn begin_checkin(&self, ticket_id: &TicketId) -> WalletResult<CheckinAttempt> {
        let credential = self
            .store
            .get_by_ticket_id(ticket_id)?
            .ok_or_else(|| WalletError::NoCredential(ticket_id.clone()))?;
        Ok(CheckinAttempt::new(credential, self.config.session.clone()))
    }

    /// Feed a decoded scanner payload into an attempt. On a successful venue
    /// binding, returns the artifact's QR string for the rendering
    /// collaborator; an ignored scan returns `None`.
    pub fn scan(
        &self,
        attempt: &mut CheckinAttempt,
        payload: &str,
        now: Timestamp,
    ) -> WalletResult<Option<String>> {
        match attempt.handle_scan(payload, &self.device, now)? {
            ScanOutcome::PresentationReady => {
                let artifact = attempt
                    .artifact()
                    .ok_or(gatepass_session::SessionError::EncodingFailed)?;
                Ok(Some(artifact.to_qr_string()?))
            }
            ScanOutcome::Ignored => Ok(None),
        }
    }

    /// Fold a gate decision back into the attempt's state.
    pub fn record_decision(&self, attempt: &mut CheckinAttempt, decision: &Decision) {
        match decision {
            Decision::Accepted => attempt.mark_consumed(),
            Decision::Rejected(reason) => {
                tracing::debug!(%reason, "check-in rejected by gate");
                attempt.mark_rejected();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gatepass_cred::{CredentialStatus, TicketCategory, TicketStatus};
    use gatepass_session::AttemptState;
    use gatepass_store::MemoryBackend;

    fn active_ticket(id: &str) -> Ticket {
        Ticket {
            id: TicketId::new(id),
            title: "Midnight Orchestra".into(),
            event_date: "2026-09-14T19:30:00Z".into(),
            location: "Riverside Hall".into(),
            seat: "B-12".into(),
            issuer_name: "Riverside Box Office".into(),
            category: TicketCategory::Concert,
            status: TicketStatus::Active,
        }
    }

    fn wallet() -> Wallet {
        Wallet::new(
            Arc::new(MemoryBackend::new()),
            DeviceKey::from_seed(&[0x21; 32]),
            WalletConfig::default(),
        )
    }

    #[test]
    fn test_claim_persists_credential() {
        let wallet = wallet();
        let issuer = DeviceKey::from_seed(&[0x42; 32]);
        let ticket = active_ticket("1");

        let credential = wallet.claim_ticket(&ticket, &issuer).unwrap();
        assert_eq!(credential.status, CredentialStatus::Valid);
        assert_eq!(credential.holder_id, wallet.holder_id());

        let stored = wallet.credential_for(&ticket.id).unwrap().unwrap();
        assert_eq!(stored, credential);
    }

    #[test]
    fn test_reclaim_supersedes() {
        let wallet = wallet();
        let issuer = DeviceKey::from_seed(&[0x42; 32]);
        let ticket = active_ticket("1");

        let first = wallet.claim_ticket(&ticket, &issuer).unwrap();
        let second = wallet.claim_ticket(&ticket, &issuer).unwrap();
        assert_ne!(first.credential_id, second.credential_id);

        let all = wallet.credentials().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].credential_id, second.credential_id);
    }

    #[test]
    fn test_claim_rejects_used_ticket() {
        let wallet = wallet();
        let issuer = DeviceKey::from_seed(&[0x42; 32]);
        let mut ticket = active_ticket("1");
        ticket.status = TicketStatus::Used;

        let err = wallet.claim_ticket(&ticket, &issuer).unwrap_err();
        assert!(matches!(err, WalletError::Cred(_)));
        assert!(wallet.credential_for(&ticket.id).unwrap().is_none());
    }

    #[test]
    fn test_begin_checkin_without_credential() {
        let wallet = wallet();
        let err = wallet.begin_checkin(&TicketId::new("missing")).unwrap_err();
        assert!(matches!(err, WalletError::NoCredential(_)));
    }

    #[test]
    fn test_scan_produces_qr_string() {
        let wallet = wallet();
        let issuer = DeviceKey::from_seed(&[0x42; 32]);
        let ticket = active_ticket("1");
        wallet.claim_ticket(&ticket, &issuer).unwrap();

        let mut attempt = wallet.begin_checkin(&ticket.id).unwrap();
        let qr = wallet
            .scan(
                &mut attempt,
                r#"{"kind":"venue","venueId":"gate-7"}"#,
                Timestamp::now(),
            )
            .unwrap()
            .unwrap();
        assert!(qr.contains("\"kind\":\"presentation\""));
        assert_eq!(attempt.state(), AttemptState::PresentationIssued);

        // Second scan ignored, no new QR.
        let again = wallet
            .scan(
                &mut attempt,
                r#"{"kind":"venue","venueId":"gate-9"}"#,
                Timestamp::now(),
            )
            .unwrap();
        assert!(again.is_none());
    }

    #[test]
    fn test_config_deserializes_with_defaults() {
        let config: WalletConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.issuance.ttl_seconds, 30 * 24 * 60 * 60);
        assert_eq!(config.session.validity_window_seconds, 180);
    }
}
