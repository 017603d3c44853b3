//! Credential issuance.
//!
//! Builds a signed credential from an active ticket and a holder identity.
//! Signing is delegated to the injected `Signer`; persistence is the
//! caller's responsibility.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use serde::{Deserialize, Serialize};

use crate::error::{CredError, CredErrorDetail, CredResult};
use crate::types::{Credential, CredentialStatus, SubjectSnapshot, Ticket, TicketStatus};
use gatepass_core::{CredentialId, HolderId, Signer, Timestamp};

/// Policy knobs for issuance.
///
/// Loaded from configuration; every field has a default so a missing config
/// section behaves sensibly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssuancePolicy {
    /// Credential lifetime in seconds from the moment of issuance.
    #[serde(default = "default_ttl_seconds")]
    pub ttl_seconds: u64,
}

fn default_ttl_seconds() -> u64 {
    30 * 24 * 60 * 60
}

impl Default for IssuancePolicy {
    fn default() -> Self {
        Self {
            ttl_seconds: default_ttl_seconds(),
        }
    }
}

/// Generate a credential ID unique per call: ticket id plus a random hex
/// suffix. Uniqueness matters more than format.
fn generate_credential_id(ticket: &Ticket) -> CredentialId {
    use rand::RngCore;
    let mut suffix = [0u8; 8];
    rand::rngs::OsRng.fill_bytes(&mut suffix);
    CredentialId::new(format!("vc-{}-{}", ticket.id, hex::encode(suffix)))
}

/// Issue a signed credential binding `ticket` to `holder_id`.
///
/// Requires `ticket.status == Active`. The surrounding system should not
/// invoke issuance for non-active tickets; if it does, this fails with
/// `InvalidTicketState` rather than minting a malformed credential.
pub fn issue_credential(
    ticket: &Ticket,
    holder_id: HolderId,
    holder_pubkey: [u8; 32],
    policy: &IssuancePolicy,
    signer: &dyn Signer,
) -> CredResult<Credential> {
    if ticket.status != TicketStatus::Active {
        return Err(CredErrorDetail::new(
            CredError::InvalidTicketState(format!("{:?}", ticket.status)),
            format!("ticket {} is not active", ticket.id),
        ));
    }

    let now = Timestamp::now();
    let mut credential = Credential {
        credential_id: generate_credential_id(ticket),
        ticket_id: ticket.id.clone(),
        holder_id,
        holder_pubkey,
        issuer: ticket.issuer_name.clone(),
        issued_at: now,
        expires_at: Some(now.plus_seconds(policy.ttl_seconds)),
        status: CredentialStatus::Valid,
        subject_snapshot: SubjectSnapshot::from_ticket(ticket),
        signature: String::new(),
    };

    let signature = signer
        .sign_ed25519(credential.signing_payload().as_bytes())
        .map_err(|_| {
            CredErrorDetail::new(CredError::SigningFailed, "issuer signing failed")
                .with_credential_id(credential.credential_id.as_str())
        })?;
    credential.signature = URL_SAFE_NO_PAD.encode(signature);

    Ok(credential)
}

/// Verify the issuer signature on a credential.
pub fn verify_credential_signature(credential: &Credential, issuer_pubkey: &[u8; 32]) -> bool {
    let Ok(sig_bytes) = URL_SAFE_NO_PAD.decode(&credential.signature) else {
        return false;
    };
    let sig: [u8; 64] = match sig_bytes.try_into() {
        Ok(sig) => sig,
        Err(_) => return false,
    };
    gatepass_core::verify_ed25519(
        issuer_pubkey,
        credential.signing_payload().as_bytes(),
        &sig,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{TicketCategory, TicketStatus};
    use gatepass_core::{DeviceKey, TicketId};

    fn active_ticket() -> Ticket {
        Ticket {
            id: TicketId::new("1"),
            title: "Midnight Orchestra".into(),
            event_date: "2026-09-14T19:30:00Z".into(),
            location: "Riverside Hall".into(),
            seat: "B-12".into(),
            issuer_name: "Riverside Box Office".into(),
            category: TicketCategory::Concert,
            status: TicketStatus::Active,
        }
    }

    fn holder() -> (DeviceKey, HolderId, [u8; 32]) {
        let key = DeviceKey::from_seed(&[0x21; 32]);
        let id = key.holder_id();
        let pubkey = key.public_key_ed25519();
        (key, id, pubkey)
    }

    #[test]
    fn test_issue_active_ticket() {
        let ticket = active_ticket();
        let (_, holder_id, holder_pubkey) = holder();
        let issuer = DeviceKey::from_seed(&[0x42; 32]);

        let cred = issue_credential(
            &ticket,
            holder_id.clone(),
            holder_pubkey,
            &IssuancePolicy::default(),
            &issuer,
        )
        .unwrap();

        assert_eq!(cred.status, CredentialStatus::Valid);
        assert_eq!(cred.ticket_id, ticket.id);
        assert_eq!(cred.holder_id, holder_id);
        assert_eq!(cred.issuer, "Riverside Box Office");
        assert_eq!(cred.subject_snapshot, SubjectSnapshot::from_ticket(&ticket));
        assert!(!cred.signature.is_empty());
    }

    #[test]
    fn test_issue_sets_thirty_day_expiry_by_default() {
        let ticket = active_ticket();
        let (_, holder_id, holder_pubkey) = holder();
        let issuer = DeviceKey::from_seed(&[0x42; 32]);

        let cred = issue_credential(
            &ticket,
            holder_id,
            holder_pubkey,
            &IssuancePolicy::default(),
            &issuer,
        )
        .unwrap();

        let expires = cred.expires_at.unwrap();
        assert_eq!(
            expires.seconds_since_epoch - cred.issued_at.seconds_since_epoch,
            30 * 24 * 60 * 60
        );
    }

    #[test]
    fn test_issue_rejects_used_ticket() {
        let mut ticket = active_ticket();
        ticket.status = TicketStatus::Used;
        let (_, holder_id, holder_pubkey) = holder();
        let issuer = DeviceKey::from_seed(&[0x42; 32]);

        let err = issue_credential(
            &ticket,
            holder_id,
            holder_pubkey,
            &IssuancePolicy::default(),
            &issuer,
        )
        .unwrap_err();
        assert!(matches!(err.kind, CredError::InvalidTicketState(_)));
    }

    #[test]
    fn test_issue_rejects_expired_ticket() {
        let mut ticket = active_ticket();
        ticket.status = TicketStatus::Expired;
        let (_, holder_id, holder_pubkey) = holder();
        let issuer = DeviceKey::from_seed(&[0x42; 32]);

        let result = issue_credential(
            &ticket,
            holder_id,
            holder_pubkey,
            &IssuancePolicy::default(),
            &issuer,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_credential_ids_unique_per_call() {
        let ticket = active_ticket();
        let (_, holder_id, holder_pubkey) = holder();
        let issuer = DeviceKey::from_seed(&[0x42; 32]);
        let policy = IssuancePolicy::default();

        let c1 =
            issue_credential(&ticket, holder_id.clone(), holder_pubkey, &policy, &issuer).unwrap();
        let c2 = issue_credential(&ticket, holder_id, holder_pubkey, &policy, &issuer).unwrap();
        assert_ne!(c1.credential_id, c2.credential_id);
        assert!(c1.credential_id.as_str().starts_with("vc-1-"));
    }

    #[test]
    fn test_signature_verifies_against_issuer_key() {
        let ticket = active_ticket();
        let (_, holder_id, holder_pubkey) = holder();
        let issuer = DeviceKey::from_seed(&[0x42; 32]);

        let cred = issue_credential(
            &ticket,
            holder_id,
            holder_pubkey,
            &IssuancePolicy::default(),
            &issuer,
        )
        .unwrap();

        assert!(verify_credential_signature(
            &cred,
            &issuer.public_key_ed25519()
        ));
        let wrong_key = DeviceKey::from_seed(&[0x43; 32]);
        assert!(!verify_credential_signature(
            &cred,
            &wrong_key.public_key_ed25519()
        ));
    }

    #[test]
    fn test_tampered_snapshot_breaks_signature() {
        let ticket = active_ticket();
        let (_, holder_id, holder_pubkey) = holder();
        let issuer = DeviceKey::from_seed(&[0x42; 32]);

        let mut cred = issue_credential(
            &ticket,
            holder_id,
            holder_pubkey,
            &IssuancePolicy::default(),
            &issuer,
        )
        .unwrap();
        cred.subject_snapshot.seat = "A-1".into();
        assert!(!verify_credential_signature(
            &cred,
            &issuer.public_key_ed25519()
        ));
    }

    #[test]
    fn test_policy_deserializes_with_defaults() {
        let policy: IssuancePolicy = serde_json::from_str("{}").unwrap();
        assert_eq!(policy.ttl_seconds, 30 * 24 * 60 * 60);

        let policy: IssuancePolicy = serde_json::from_str(r#"{"ttl_seconds": 60}"#).unwrap();
        assert_eq!(policy.ttl_seconds, 60);
    }
}
