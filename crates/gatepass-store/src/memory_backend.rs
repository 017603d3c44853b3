use gatepass_core::{GatepassError, GatepassResult, RecordId, StorageBackend};
use std::collections::HashMap;
use std::sync::Mutex;
use subtle::ConstantTimeEq;

/// In-memory storage backend implementing StorageBackend.
///
/// Used in tests and for scenarios where persistence isn't needed.
pub struct MemoryBackend {
    data: Mutex<HashMap<String, Vec<u8>>>,
}

fn lock_data(
    mutex: &Mutex<HashMap<String, Vec<u8>>>,
) -> GatepassResult<std::sync::MutexGuard<'_, HashMap<String, Vec<u8>>>> {
    mutex
        .lock()
        .map_err(|e| GatepassError::Storage(format!("lock poisoned: {}", e)))
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self {
            data: Mutex::new(HashMap::new()),
        }
    }

    /// Number of stored records (for testing/inspection).
    pub fn count(&self) -> usize {
        lock_data(&self.data).map(|d| d.len()).unwrap_or(0)
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl StorageBackend for MemoryBackend {
    fn get(&self, record_id: &RecordId) -> GatepassResult<Option<Vec<u8>>> {
        let data = lock_data(&self.data)?;
        Ok(data.get(record_id.as_str()).cloned())
    }

    fn put(&self, record_id: &RecordId, payload: &[u8]) -> GatepassResult<()> {
        let mut data = lock_data(&self.data)?;
        data.insert(record_id.as_str().to_string(), payload.to_vec());
        Ok(())
    }

    fn delete(&self, record_id: &RecordId) -> GatepassResult<bool> {
        let mut data = lock_data(&self.data)?;
        Ok(data.remove(record_id.as_str()).is_some())
    }

    fn compare_and_swap(
        &self,
        record_id: &RecordId,
        expected: Option<&[u8]>,
        new_value: &[u8],
    ) -> GatepassResult<bool> {
        let mut data = lock_data(&self.data)?;
        let current = data.get(record_id.as_str());
        let matches = match (current, expected) {
            (None, None) => true,
            (Some(c), Some(e)) => c.as_slice().ct_eq(e).into(),
            _ => false,
        };
        if matches {
            data.insert(record_id.as_str().to_string(), new_value.to_vec());
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn exists(&self, record_id: &RecordId) -> GatepassResult<bool> {
        let data = lock_data(&self.data)?;
        Ok(data.contains_key(record_id.as_str()))
    }
}
