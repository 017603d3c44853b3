use crate::error::GatepassResult;
use crate::types::RecordId;

// ---------------------------------------------------------------------------
// Signer — Ed25519 signing capability
//
// Issuance and presentation code never touch raw key material; they receive
// a Signer and delegate. Production holders use a DeviceKey, the issuing
// service uses whatever key custody it has.
// ---------------------------------------------------------------------------

pub trait Signer: Send + Sync {
    fn sign_ed25519(&self, message: &[u8]) -> GatepassResult<[u8; 64]>;
    fn public_key_ed25519(&self) -> [u8; 32];
}

// ---------------------------------------------------------------------------
// StorageBackend — durable key-value store interface
//
// The backend stores opaque record IDs and serialized payloads; all keying
// conventions live in the credential store on top of it.
// ---------------------------------------------------------------------------

pub trait StorageBackend: Send + Sync {
    fn get(&self, record_id: &RecordId) -> GatepassResult<Option<Vec<u8>>>;
    fn put(&self, record_id: &RecordId, payload: &[u8]) -> GatepassResult<()>;
    fn delete(&self, record_id: &RecordId) -> GatepassResult<bool>;

    /// Atomic compare-and-swap, the primitive behind one-time credential
    /// consumption. Returns true if the swap succeeded (old value matched
    /// expected).
    fn compare_and_swap(
        &self,
        record_id: &RecordId,
        expected: Option<&[u8]>,
        new_value: &[u8],
    ) -> GatepassResult<bool>;

    fn exists(&self, record_id: &RecordId) -> GatepassResult<bool>;
}
