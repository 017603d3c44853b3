use crate::error::{GatepassError, GatepassResult};
use crate::traits::Signer;
use crate::types::HolderId;
use ed25519_dalek::{Signature, Signer as DalekSigner, SigningKey, Verifier, VerifyingKey};
use sha2::{Digest, Sha256};

/// Derive a HolderId from an Ed25519 public key.
///
/// Formula: Base58(SHA-256(pubkey)[0:20])
///
/// Self-certifying: the wallet proves control of the key, no registry needed.
pub fn holder_id_from_pubkey(pubkey: &[u8; 32]) -> HolderId {
    let hash = Sha256::digest(pubkey);
    let truncated = &hash[..20];
    HolderId(bs58::encode(truncated).into_string())
}

/// Verify that a HolderId matches a given Ed25519 public key.
pub fn verify_holder_id(id: &HolderId, pubkey: &[u8; 32]) -> bool {
    holder_id_from_pubkey(pubkey) == *id
}

/// Verify an Ed25519 signature over a message.
///
/// Returns false for malformed keys as well as bad signatures; callers treat
/// both the same way (the artifact or credential is not trusted).
pub fn verify_ed25519(pubkey: &[u8; 32], message: &[u8], signature: &[u8; 64]) -> bool {
    let Ok(key) = VerifyingKey::from_bytes(pubkey) else {
        return false;
    };
    let sig = Signature::from_bytes(signature);
    key.verify(message, &sig).is_ok()
}

// ---------------------------------------------------------------------------
// DeviceKey — an Ed25519 keypair held by a wallet or issuing service
// ---------------------------------------------------------------------------

pub struct DeviceKey {
    signing_key: SigningKey,
}

impl DeviceKey {
    /// Generate a fresh keypair from the OS RNG.
    pub fn generate() -> Self {
        let mut rng = rand::rngs::OsRng;
        Self {
            signing_key: SigningKey::generate(&mut rng),
        }
    }

    /// Reconstruct a keypair from a stored 32-byte seed.
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(seed),
        }
    }

    /// The holder fingerprint for this key.
    pub fn holder_id(&self) -> HolderId {
        holder_id_from_pubkey(&self.public_key_ed25519())
    }
}

impl Signer for DeviceKey {
    fn sign_ed25519(&self, message: &[u8]) -> GatepassResult<[u8; 64]> {
        let sig = self
            .signing_key
            .try_sign(message)
            .map_err(|e| GatepassError::Crypto(format!("signing failed: {}", e)))?;
        Ok(sig.to_bytes())
    }

    fn public_key_ed25519(&self) -> [u8; 32] {
        self.signing_key.verifying_key().to_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_holder_id_deterministic() {
        let pubkey = [0x42u8; 32];
        assert_eq!(holder_id_from_pubkey(&pubkey), holder_id_from_pubkey(&pubkey));
    }

    #[test]
    fn test_holder_id_different_keys() {
        let id1 = holder_id_from_pubkey(&[0x01u8; 32]);
        let id2 = holder_id_from_pubkey(&[0x02u8; 32]);
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_holder_id_is_base58() {
        let id = holder_id_from_pubkey(&[0xABu8; 32]);
        assert!(id.as_str().chars().all(|c| {
            matches!(c, '1'..='9' | 'A'..='H' | 'J'..='N' | 'P'..='Z' | 'a'..='k' | 'm'..='z')
        }));
    }

    #[test]
    fn test_verify_holder_id() {
        let pubkey = [0x55u8; 32];
        let id = holder_id_from_pubkey(&pubkey);
        assert!(verify_holder_id(&id, &pubkey));
        assert!(!verify_holder_id(&id, &[0x66u8; 32]));
    }

    #[test]
    fn test_sign_and_verify() {
        let key = DeviceKey::generate();
        let msg = b"presentation|t-1|gate-7";
        let sig = key.sign_ed25519(msg).unwrap();
        assert!(verify_ed25519(&key.public_key_ed25519(), msg, &sig));
    }

    #[test]
    fn test_verify_rejects_tampered_message() {
        let key = DeviceKey::generate();
        let sig = key.sign_ed25519(b"original").unwrap();
        assert!(!verify_ed25519(&key.public_key_ed25519(), b"tampered", &sig));
    }

    #[test]
    fn test_verify_rejects_wrong_key() {
        let key = DeviceKey::generate();
        let other = DeviceKey::generate();
        let sig = key.sign_ed25519(b"msg").unwrap();
        assert!(!verify_ed25519(&other.public_key_ed25519(), b"msg", &sig));
    }

    #[test]
    fn test_from_seed_roundtrip() {
        let seed = [0x07u8; 32];
        let k1 = DeviceKey::from_seed(&seed);
        let k2 = DeviceKey::from_seed(&seed);
        assert_eq!(k1.public_key_ed25519(), k2.public_key_ed25519());
        assert_eq!(k1.holder_id(), k2.holder_id());
    }
}
