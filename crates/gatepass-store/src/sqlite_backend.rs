use gatepass_core::{GatepassError, GatepassResult, RecordId, StorageBackend};
use rusqlite::{params, Connection};
use std::sync::Mutex;
use subtle::ConstantTimeEq;

/// SQLite storage backend.
///
/// Stores opaque record IDs and serialized payloads; durability of every
/// mutating call comes from SQLite committing before the call returns.
pub struct SqliteBackend {
    conn: Mutex<Connection>,
}

impl SqliteBackend {
    /// Open or create a SQLite database at the given path.
    pub fn open(path: &str) -> GatepassResult<Self> {
        let conn = Connection::open(path)
            .map_err(|e| GatepassError::Storage(format!("failed to open database: {}", e)))?;

        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS wallet_records (
                record_id TEXT PRIMARY KEY NOT NULL,
                payload BLOB NOT NULL,
                created_at TEXT DEFAULT (datetime('now')),
                updated_at TEXT DEFAULT (datetime('now'))
            );",
        )
        .map_err(|e| GatepassError::Storage(format!("failed to create tables: {}", e)))?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory database (for testing).
    pub fn in_memory() -> GatepassResult<Self> {
        Self::open(":memory:")
    }
}

impl StorageBackend for SqliteBackend {
    fn get(&self, record_id: &RecordId) -> GatepassResult<Option<Vec<u8>>> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| GatepassError::Storage(format!("lock poisoned: {}", e)))?;

        let result: Result<Vec<u8>, _> = conn.query_row(
            "SELECT payload FROM wallet_records WHERE record_id = ?1",
            params![record_id.as_str()],
            |row| row.get(0),
        );

        match result {
            Ok(data) => Ok(Some(data)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(GatepassError::Storage(format!("query failed: {}", e))),
        }
    }

    fn put(&self, record_id: &RecordId, payload: &[u8]) -> GatepassResult<()> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| GatepassError::Storage(format!("lock poisoned: {}", e)))?;

        conn.execute(
            "INSERT OR REPLACE INTO wallet_records (record_id, payload, updated_at) VALUES (?1, ?2, datetime('now'))",
            params![record_id.as_str(), payload],
        )
        .map_err(|e| GatepassError::Storage(format!("insert failed: {}", e)))?;

        Ok(())
    }

    fn delete(&self, record_id: &RecordId) -> GatepassResult<bool> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| GatepassError::Storage(format!("lock poisoned: {}", e)))?;

        let rows = conn
            .execute(
                "DELETE FROM wallet_records WHERE record_id = ?1",
                params![record_id.as_str()],
            )
            .map_err(|e| GatepassError::Storage(format!("delete failed: {}", e)))?;

        Ok(rows > 0)
    }

    fn compare_and_swap(
        &self,
        record_id: &RecordId,
        expected: Option<&[u8]>,
        new_value: &[u8],
    ) -> GatepassResult<bool> {
        // The connection mutex makes the read + conditional write atomic
        // with respect to other callers of this backend.
        let conn = self
            .conn
            .lock()
            .map_err(|e| GatepassError::Storage(format!("lock poisoned: {}", e)))?;

        let current: Option<Vec<u8>> = conn
            .query_row(
                "SELECT payload FROM wallet_records WHERE record_id = ?1",
                params![record_id.as_str()],
                |row| row.get(0),
            )
            .ok();

        let matches = match (&current, expected) {
            (None, None) => true,
            (Some(curr), Some(exp)) => curr.as_slice().ct_eq(exp).into(),
            _ => false,
        };

        if matches {
            conn.execute(
                "INSERT OR REPLACE INTO wallet_records (record_id, payload, updated_at) VALUES (?1, ?2, datetime('now'))",
                params![record_id.as_str(), new_value],
            )
            .map_err(|e| GatepassError::Storage(format!("CAS insert failed: {}", e)))?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn exists(&self, record_id: &RecordId) -> GatepassResult<bool> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| GatepassError::Storage(format!("lock poisoned: {}", e)))?;

        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM wallet_records WHERE record_id = ?1",
                params![record_id.as_str()],
                |row| row.get(0),
            )
            .map_err(|e| GatepassError::Storage(format!("exists query failed: {}", e)))?;

        Ok(count > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_backend() -> SqliteBackend {
        SqliteBackend::in_memory().unwrap()
    }

    #[test]
    fn test_get_nonexistent() {
        let backend = test_backend();
        assert!(backend.get(&RecordId::new("nonexistent")).unwrap().is_none());
    }

    #[test]
    fn test_put_and_get() {
        let backend = test_backend();
        let id = RecordId::new("test-record");
        backend.put(&id, b"payload").unwrap();
        assert_eq!(backend.get(&id).unwrap().unwrap(), b"payload");
    }

    #[test]
    fn test_put_overwrite() {
        let backend = test_backend();
        let id = RecordId::new("test-record");
        backend.put(&id, b"v1").unwrap();
        backend.put(&id, b"v2").unwrap();
        assert_eq!(backend.get(&id).unwrap().unwrap(), b"v2");
    }

    #[test]
    fn test_delete() {
        let backend = test_backend();
        let id = RecordId::new("test-record");
        backend.put(&id, b"payload").unwrap();
        assert!(backend.delete(&id).unwrap());
        assert!(backend.get(&id).unwrap().is_none());
        assert!(!backend.delete(&id).unwrap());
    }

    #[test]
    fn test_exists() {
        let backend = test_backend();
        let id = RecordId::new("test-record");
        assert!(!backend.exists(&id).unwrap());
        backend.put(&id, b"payload").unwrap();
        assert!(backend.exists(&id).unwrap());
    }

    #[test]
    fn test_compare_and_swap_insert() {
        let backend = test_backend();
        let id = RecordId::new("test-record");
        assert!(backend.compare_and_swap(&id, None, b"fresh").unwrap());
        assert_eq!(backend.get(&id).unwrap().unwrap(), b"fresh");
    }

    #[test]
    fn test_compare_and_swap_update_and_conflict() {
        let backend = test_backend();
        let id = RecordId::new("test-record");
        backend.put(&id, b"old").unwrap();

        assert!(backend.compare_and_swap(&id, Some(b"old"), b"new").unwrap());
        assert!(!backend.compare_and_swap(&id, Some(b"old"), b"newer").unwrap());
        assert_eq!(backend.get(&id).unwrap().unwrap(), b"new");
    }

    #[test]
    fn test_binary_payload() {
        let backend = test_backend();
        let id = RecordId::new("binary");
        let data: Vec<u8> = (0..=255).collect();
        backend.put(&id, &data).unwrap();
        assert_eq!(backend.get(&id).unwrap().unwrap(), data);
    }
}
