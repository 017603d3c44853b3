use serde::{Deserialize, Serialize};
use std::fmt;
use zeroize::Zeroize;

// ---------------------------------------------------------------------------
// Timestamp — canonical time representation (seconds + nanoseconds)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp {
    pub seconds_since_epoch: u64,
    pub nanoseconds: u32,
}

impl Timestamp {
    pub fn now() -> Self {
        let now = chrono::Utc::now();
        Self {
            seconds_since_epoch: now.timestamp() as u64,
            nanoseconds: now.timestamp_subsec_nanos(),
        }
    }

    pub fn from_seconds(seconds: u64) -> Self {
        Self {
            seconds_since_epoch: seconds,
            nanoseconds: 0,
        }
    }

    /// Shift forward by whole seconds, preserving the sub-second part.
    pub fn plus_seconds(&self, seconds: u64) -> Self {
        Self {
            seconds_since_epoch: self.seconds_since_epoch.saturating_add(seconds),
            nanoseconds: self.nanoseconds,
        }
    }

    pub fn to_rfc3339(&self) -> String {
        let dt =
            chrono::DateTime::from_timestamp(self.seconds_since_epoch as i64, self.nanoseconds);
        dt.map(|d| d.to_rfc3339())
            .unwrap_or_else(|| "invalid".to_string())
    }
}

impl From<chrono::DateTime<chrono::Utc>> for Timestamp {
    fn from(dt: chrono::DateTime<chrono::Utc>) -> Self {
        Self {
            seconds_since_epoch: dt.timestamp() as u64,
            nanoseconds: dt.timestamp_subsec_nanos(),
        }
    }
}

// ---------------------------------------------------------------------------
// Nonce — 32-byte single-use random value
// ---------------------------------------------------------------------------

#[derive(Clone, Serialize, Deserialize)]
pub struct Nonce(#[serde(with = "hex_bytes")] pub [u8; 32]);

impl Nonce {
    pub fn generate() -> Self {
        use rand::RngCore;
        let mut bytes = [0u8; 32];
        rand::rngs::OsRng.fill_bytes(&mut bytes);
        Self(bytes)
    }

    /// Hex form, used as the replay-set key on the gate side.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl PartialEq for Nonce {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl Eq for Nonce {}

impl fmt::Debug for Nonce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Nonce({})", hex::encode(&self.0[..8]))
    }
}

impl Drop for Nonce {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

// ---------------------------------------------------------------------------
// Typed identifiers — prevent stringly-typed confusion
// ---------------------------------------------------------------------------

macro_rules! define_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }
    };
}

define_id!(TicketId, "Unique identifier for a booking-system ticket.");
define_id!(CredentialId, "Unique identifier for an issued credential.");
define_id!(VenueId, "Identifier of a physical venue gate.");
define_id!(HolderId, "Fingerprint identifier of a credential holder.");
define_id!(RecordId, "Backend storage record identifier.");

// ---------------------------------------------------------------------------
// Hex serialization helper for fixed-size byte arrays
// ---------------------------------------------------------------------------

pub mod hex_bytes {
    use serde::{self, Deserialize, Deserializer, Serializer};

    pub fn serialize<S, const N: usize>(bytes: &[u8; N], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&hex::encode(bytes))
    }

    pub fn deserialize<'de, D, const N: usize>(deserializer: D) -> Result<[u8; N], D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let bytes = hex::decode(&s).map_err(serde::de::Error::custom)?;
        bytes
            .try_into()
            .map_err(|_| serde::de::Error::custom(format!("expected {} bytes", N)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_ordering() {
        let t1 = Timestamp::from_seconds(100);
        let t2 = Timestamp::from_seconds(200);
        assert!(t1 < t2);
    }

    #[test]
    fn test_timestamp_plus_seconds() {
        let t = Timestamp::from_seconds(1_000);
        let later = t.plus_seconds(180);
        assert_eq!(later.seconds_since_epoch, 1_180);
        assert!(t < later);
    }

    #[test]
    fn test_timestamp_rfc3339() {
        let t = Timestamp::from_seconds(1_700_000_000);
        let s = t.to_rfc3339();
        assert!(s.contains("2023"));
    }

    #[test]
    fn test_nonce_generation_unique() {
        let n1 = Nonce::generate();
        let n2 = Nonce::generate();
        assert_ne!(n1, n2);
    }

    #[test]
    fn test_nonce_hex_roundtrip() {
        let n = Nonce([0xAB; 32]);
        let json = serde_json::to_string(&n).unwrap();
        assert!(json.contains("abab"));
        let restored: Nonce = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, n);
    }

    #[test]
    fn test_nonce_debug_truncated() {
        let n = Nonce([0x11; 32]);
        let s = format!("{:?}", n);
        assert_eq!(s, "Nonce(1111111111111111)");
    }

    #[test]
    fn test_typed_ids_distinct() {
        let ticket = TicketId::new("t-1");
        let venue = VenueId::new("gate-7");
        assert_ne!(ticket.as_str(), venue.as_str());
        assert_eq!(format!("{}", venue), "gate-7");
    }
}
