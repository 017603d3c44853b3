//! The CredentialStore contract: insert-or-update by credential ID,
//! lookup by ticket ID, and the single compare-and-swap path that flips a
//! credential out of `Valid`.

use std::sync::{Arc, Mutex, MutexGuard};

use gatepass_core::{CredentialId, GatepassError, GatepassResult, RecordId, StorageBackend, TicketId};
use gatepass_cred::{status, Credential, CredentialStatus};

/// Storage key prefix for credential records.
const RECORD_KEY_PREFIX: &str = "cred:record:";

/// Storage key prefix for the ticket-id -> credential-id index.
const TICKET_KEY_PREFIX: &str = "cred:ticket:";

/// Storage key holding the list of all credential IDs.
const INDEX_KEY: &str = "cred:index";

fn record_key(credential_id: &CredentialId) -> RecordId {
    RecordId::new(format!("{}{}", RECORD_KEY_PREFIX, credential_id.as_str()))
}

fn ticket_key(ticket_id: &TicketId) -> RecordId {
    RecordId::new(format!("{}{}", TICKET_KEY_PREFIX, ticket_id.as_str()))
}

fn encode_credential(credential: &Credential) -> GatepassResult<Vec<u8>> {
    serde_json::to_vec(credential)
        .map_err(|e| GatepassError::Serialization(format!("credential encode failed: {}", e)))
}

fn decode_credential(data: &[u8]) -> GatepassResult<Credential> {
    serde_json::from_slice(data)
        .map_err(|e| GatepassError::Serialization(format!("credential decode failed: {}", e)))
}

/// Outcome of a CAS status swap.
#[derive(Debug)]
pub enum StatusSwap {
    /// The swap won; the returned credential carries the new status.
    Applied(Credential),
    /// The credential was not in a state the transition allows. Losers of a
    /// consumption race land here with the winner's terminal status.
    Denied { current: CredentialStatus },
    /// No credential with that ID exists.
    NotFound,
}

/// Durable credential storage.
///
/// Writes are serialized by an internal mutex (read-modify-write of the
/// index); reads go straight to the backend and observe every completed
/// write. Clone is cheap and shares the backend.
#[derive(Clone)]
pub struct CredentialStore {
    backend: Arc<dyn StorageBackend>,
    write_lock: Arc<Mutex<()>>,
}

impl CredentialStore {
    pub fn new(backend: Arc<dyn StorageBackend>) -> Self {
        Self {
            backend,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    fn lock_writes(&self) -> GatepassResult<MutexGuard<'_, ()>> {
        self.write_lock
            .lock()
            .map_err(|e| GatepassError::Storage(format!("write lock poisoned: {}", e)))
    }

    fn read_index(&self) -> GatepassResult<Vec<String>> {
        match self.backend.get(&RecordId::new(INDEX_KEY))? {
            Some(data) => serde_json::from_slice(&data)
                .map_err(|e| GatepassError::Serialization(format!("index decode failed: {}", e))),
            None => Ok(Vec::new()),
        }
    }

    fn write_index(&self, index: &[String]) -> GatepassResult<()> {
        let data = serde_json::to_vec(index)
            .map_err(|e| GatepassError::Serialization(format!("index encode failed: {}", e)))?;
        self.backend.put(&RecordId::new(INDEX_KEY), &data)
    }

    /// Insert or update a credential.
    ///
    /// A known `credential_id` is overwritten in place. A new credential for
    /// a ticket that already has one supersedes it: the old record is
    /// removed, so each ticket keeps exactly one current credential.
    pub fn put(&self, credential: &Credential) -> GatepassResult<()> {
        let _guard = self.lock_writes()?;
        let data = encode_credential(credential)?;
        let rid = record_key(&credential.credential_id);

        if self.backend.exists(&rid)? {
            // Update of an existing record; ticket binding is immutable.
            return self.backend.put(&rid, &data);
        }

        let mut index = self.read_index()?;

        // Supersede any prior credential for the same ticket.
        let tkey = ticket_key(&credential.ticket_id);
        if let Some(old) = self.backend.get(&tkey)? {
            let old_id = String::from_utf8(old).map_err(|_| {
                GatepassError::Serialization("ticket index entry is not utf-8".into())
            })?;
            tracing::debug!(
                ticket_id = %credential.ticket_id,
                superseded = %old_id,
                "superseding prior credential for ticket"
            );
            self.backend
                .delete(&record_key(&CredentialId::new(old_id.clone())))?;
            index.retain(|id| id != &old_id);
        }

        self.backend.put(&rid, &data)?;
        self.backend
            .put(&tkey, credential.credential_id.as_str().as_bytes())?;
        index.push(credential.credential_id.as_str().to_string());
        self.write_index(&index)
    }

    /// Fetch a credential by its ID.
    pub fn get(&self, credential_id: &CredentialId) -> GatepassResult<Option<Credential>> {
        match self.backend.get(&record_key(credential_id))? {
            Some(data) => Ok(Some(decode_credential(&data)?)),
            None => Ok(None),
        }
    }

    /// All stored credentials, in insertion order.
    pub fn get_all(&self) -> GatepassResult<Vec<Credential>> {
        let index = self.read_index()?;
        let mut credentials = Vec::with_capacity(index.len());
        for id in index {
            match self.backend.get(&record_key(&CredentialId::new(id.clone())))? {
                Some(data) => credentials.push(decode_credential(&data)?),
                None => {
                    tracing::warn!(credential_id = %id, "index entry without a record");
                }
            }
        }
        Ok(credentials)
    }

    /// The current credential for a ticket, if any.
    pub fn get_by_ticket_id(&self, ticket_id: &TicketId) -> GatepassResult<Option<Credential>> {
        match self.backend.get(&ticket_key(ticket_id))? {
            Some(raw) => {
                let id = String::from_utf8(raw).map_err(|_| {
                    GatepassError::Serialization("ticket index entry is not utf-8".into())
                })?;
                self.get(&CredentialId::new(id))
            }
            None => Ok(None),
        }
    }

    /// Whether a ticket currently has a credential.
    pub fn exists(&self, ticket_id: &TicketId) -> GatepassResult<bool> {
        self.backend.exists(&ticket_key(ticket_id))
    }

    /// Remove one credential. No-op (not an error) if absent.
    pub fn delete(&self, credential_id: &CredentialId) -> GatepassResult<()> {
        let _guard = self.lock_writes()?;
        let rid = record_key(credential_id);
        let Some(data) = self.backend.get(&rid)? else {
            return Ok(());
        };
        let credential = decode_credential(&data)?;

        self.backend.delete(&rid)?;
        self.backend.delete(&ticket_key(&credential.ticket_id))?;
        let mut index = self.read_index()?;
        index.retain(|id| id != credential_id.as_str());
        self.write_index(&index)
    }

    /// Administrative wipe; diagnostic tooling only, never a production flow.
    pub fn clear(&self) -> GatepassResult<()> {
        let _guard = self.lock_writes()?;
        for id in self.read_index()? {
            let cid = CredentialId::new(id);
            if let Some(data) = self.backend.get(&record_key(&cid))? {
                if let Ok(credential) = decode_credential(&data) {
                    self.backend.delete(&ticket_key(&credential.ticket_id))?;
                }
            }
            self.backend.delete(&record_key(&cid))?;
        }
        self.backend.delete(&RecordId::new(INDEX_KEY))?;
        Ok(())
    }

    /// Atomically flip a credential from Valid to Consumed.
    ///
    /// Exactly one caller can win per credential; losers observe the
    /// then-current state via `StatusSwap::Denied`.
    pub fn consume(&self, credential_id: &CredentialId) -> GatepassResult<StatusSwap> {
        self.swap_status(credential_id, CredentialStatus::Consumed)
    }

    /// Atomically flip a credential from Valid to Revoked (explicit external
    /// trigger).
    pub fn revoke(&self, credential_id: &CredentialId) -> GatepassResult<StatusSwap> {
        self.swap_status(credential_id, CredentialStatus::Revoked)
    }

    /// Atomically flip a credential from Valid to Expired (time-triggered,
    /// applied when the expiry is observed).
    pub fn expire(&self, credential_id: &CredentialId) -> GatepassResult<StatusSwap> {
        self.swap_status(credential_id, CredentialStatus::Expired)
    }

    fn swap_status(
        &self,
        credential_id: &CredentialId,
        to: CredentialStatus,
    ) -> GatepassResult<StatusSwap> {
        let rid = record_key(credential_id);
        let Some(old_bytes) = self.backend.get(&rid)? else {
            return Ok(StatusSwap::NotFound);
        };
        let mut credential = decode_credential(&old_bytes)?;

        if status::transition(credential.status, to).is_err() {
            return Ok(StatusSwap::Denied {
                current: credential.status,
            });
        }

        credential.status = to;
        let new_bytes = encode_credential(&credential)?;
        let swapped = self
            .backend
            .compare_and_swap(&rid, Some(&old_bytes), &new_bytes)?;

        if swapped {
            Ok(StatusSwap::Applied(credential))
        } else {
            // Someone else changed the record between read and swap; report
            // the honest current state rather than a generic failure.
            match self.backend.get(&rid)? {
                Some(current_bytes) => {
                    let current = decode_credential(&current_bytes)?;
                    Ok(StatusSwap::Denied {
                        current: current.status,
                    })
                }
                None => Ok(StatusSwap::NotFound),
            }
        }
    }
}
