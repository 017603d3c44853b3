//! Venue beacon parsing.
//!
//! A venue emits a QR beacon; the holder's scanner collaborator hands this
//! module the decoded string. Anything that is not JSON with
//! `kind == "venue"` and a non-empty venue id is a recoverable parse error,
//! never a crash.

use gatepass_core::VenueId;
use serde::{Deserialize, Serialize};

use crate::error::ScanError;

/// Ephemeral venue-emitted payload. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VenueBeacon {
    pub kind: String,
    pub venue_id: VenueId,
}

/// Loose view of whatever the scanner decoded. Extra fields are tolerated;
/// missing ones are diagnosed individually.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawBeacon {
    #[serde(default)]
    kind: Option<String>,
    #[serde(default)]
    venue_id: Option<String>,
}

/// Parse a decoded scanner payload into a `VenueBeacon`.
pub fn parse_venue_beacon(payload: &str) -> Result<VenueBeacon, ScanError> {
    let raw: RawBeacon =
        serde_json::from_str(payload).map_err(|_| ScanError::MalformedPayload)?;

    let kind = raw.kind.unwrap_or_default();
    if kind != "venue" {
        return Err(ScanError::WrongKind(kind));
    }

    match raw.venue_id {
        Some(id) if !id.is_empty() => Ok(VenueBeacon {
            kind,
            venue_id: VenueId::new(id),
        }),
        _ => Err(ScanError::MissingVenueId),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_beacon() {
        let beacon = parse_venue_beacon(r#"{"kind":"venue","venueId":"gate-7"}"#).unwrap();
        assert_eq!(beacon.kind, "venue");
        assert_eq!(beacon.venue_id, VenueId::new("gate-7"));
    }

    #[test]
    fn test_parse_tolerates_extra_fields() {
        let beacon =
            parse_venue_beacon(r#"{"kind":"venue","venueId":"gate-7","hall":"east"}"#).unwrap();
        assert_eq!(beacon.venue_id.as_str(), "gate-7");
    }

    #[test]
    fn test_parse_rejects_non_json() {
        assert_eq!(
            parse_venue_beacon("not-json").unwrap_err(),
            ScanError::MalformedPayload
        );
    }

    #[test]
    fn test_parse_rejects_wrong_kind() {
        assert_eq!(
            parse_venue_beacon(r#"{"kind":"presentation","venueId":"gate-7"}"#).unwrap_err(),
            ScanError::WrongKind("presentation".to_string())
        );
    }

    #[test]
    fn test_parse_rejects_missing_kind() {
        assert_eq!(
            parse_venue_beacon(r#"{"venueId":"gate-7"}"#).unwrap_err(),
            ScanError::WrongKind(String::new())
        );
    }

    #[test]
    fn test_parse_rejects_empty_venue_id() {
        assert_eq!(
            parse_venue_beacon(r#"{"kind":"venue","venueId":""}"#).unwrap_err(),
            ScanError::MissingVenueId
        );
        assert_eq!(
            parse_venue_beacon(r#"{"kind":"venue"}"#).unwrap_err(),
            ScanError::MissingVenueId
        );
    }
}
