//! Nonce replay tracking.
//!
//! The gate records every accepted `(credential_id, nonce)` pair for at least
//! the artifact's validity window. A nonce cannot be replayed after its
//! artifact expires, so entries are garbage-collectable once their recorded
//! expiry has passed.

use std::collections::HashMap;
use std::sync::Mutex;

use gatepass_core::{CredentialId, GatepassError, GatepassResult, Timestamp};

pub struct ReplaySet {
    // (credential_id, nonce hex) -> artifact expiry
    seen: Mutex<HashMap<(String, String), Timestamp>>,
}

impl ReplaySet {
    pub fn new() -> Self {
        Self {
            seen: Mutex::new(HashMap::new()),
        }
    }

    fn lock(&self) -> GatepassResult<std::sync::MutexGuard<'_, HashMap<(String, String), Timestamp>>> {
        self.seen
            .lock()
            .map_err(|e| GatepassError::Internal(format!("replay set lock poisoned: {}", e)))
    }

    /// Whether this pair has been presented before.
    pub fn seen(&self, credential_id: &CredentialId, nonce_hex: &str) -> GatepassResult<bool> {
        let seen = self.lock()?;
        Ok(seen.contains_key(&(credential_id.as_str().to_string(), nonce_hex.to_string())))
    }

    /// Record an accepted pair, remembered until `artifact_expires_at`.
    pub fn record(
        &self,
        credential_id: &CredentialId,
        nonce_hex: &str,
        artifact_expires_at: Timestamp,
    ) -> GatepassResult<()> {
        let mut seen = self.lock()?;
        seen.insert(
            (credential_id.as_str().to_string(), nonce_hex.to_string()),
            artifact_expires_at,
        );
        Ok(())
    }

    /// Drop entries whose artifact expiry has passed.
    ///
    /// Returns the number of entries cleaned up.
    pub fn cleanup_expired(&self, now: Timestamp) -> GatepassResult<usize> {
        let mut seen = self.lock()?;
        let before = seen.len();
        seen.retain(|_, expiry| now <= *expiry);
        let cleaned = before - seen.len();
        if cleaned > 0 {
            tracing::debug!(cleaned, "cleaned up expired replay entries");
        }
        Ok(cleaned)
    }

    pub fn len(&self) -> GatepassResult<usize> {
        Ok(self.lock()?.len())
    }

    pub fn is_empty(&self) -> GatepassResult<bool> {
        Ok(self.lock()?.is_empty())
    }
}

impl Default for ReplaySet {
    fn default() -> Self {
        Self::new()
    }
}
