//! Probe request sighting model.

use serde::{Deserialize, Serialize};
use shared::pagination::{has_more, SortOrder};
use validator::Validate;

/// A single captured probe request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Sighting {
    pub id: i64,
    #[validate(custom(function = "shared::validation::validate_utc_timestamp"))]
    pub timestamp: String,
    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub mac: String,
    /// Raw RSSI as reported by the radio.
    pub rssi: String,
    pub dbm: i32,
    pub ssid: Option<String>,
    pub oui: Option<String>,
}

/// One page of sightings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct SightingsResponse {
    #[validate(nested)]
    pub sightings: Vec<Sighting>,
    pub total: u64,
    pub limit: u64,
    pub offset: u64,
}

impl SightingsResponse {
    pub fn has_more(&self) -> bool {
        has_more(self.offset, self.sightings.len(), self.total)
    }
}

/// Filters and window for the sightings listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SightingsQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mac: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<SortOrder>,
}

impl SightingsQuery {
    pub fn for_device(mac: impl Into<String>) -> Self {
        Self {
            mac: Some(mac.into()),
            ..Default::default()
        }
    }
}

/// Query for the most recent sightings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RecentQuery {
    pub limit: u32,
}

impl RecentQuery {
    /// Backend default page size for recent sightings.
    pub const DEFAULT_LIMIT: u32 = 50;
}

impl Default for RecentQuery {
    fn default() -> Self {
        Self {
            limit: Self::DEFAULT_LIMIT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sighting_json(id: i64) -> serde_json::Value {
        json!({
            "id": id,
            "timestamp": "2024-01-15 10:30:00",
            "mac": "aa:bb:cc:dd:ee:ff",
            "rssi": "-67",
            "dbm": -67,
            "ssid": "HomeNet",
            "oui": null
        })
    }

    #[test]
    fn test_sighting_deserialize() {
        let sighting: Sighting = serde_json::from_value(sighting_json(7)).unwrap();
        assert_eq!(sighting.id, 7);
        assert_eq!(sighting.rssi, "-67");
        assert_eq!(sighting.dbm, -67);
        assert_eq!(sighting.ssid.as_deref(), Some("HomeNet"));
        assert!(sighting.validate().is_ok());
    }

    #[test]
    fn test_sightings_response_validates_nested() {
        let mut bad = sighting_json(2);
        bad["timestamp"] = json!("not a time");

        let response: SightingsResponse = serde_json::from_value(json!({
            "sightings": [sighting_json(1), bad],
            "total": 2,
            "limit": 100,
            "offset": 0
        }))
        .unwrap();

        assert!(response.validate().is_err());
    }

    #[test]
    fn test_sightings_response_has_more() {
        let response: SightingsResponse = serde_json::from_value(json!({
            "sightings": [sighting_json(1), sighting_json(2)],
            "total": 5,
            "limit": 2,
            "offset": 0
        }))
        .unwrap();
        assert!(response.has_more());

        let last = SightingsResponse {
            offset: 4,
            total: 6,
            ..response
        };
        assert!(!last.has_more());
    }

    #[test]
    fn test_sightings_query_omits_absent_fields() {
        assert_eq!(
            serde_json::to_value(SightingsQuery::default()).unwrap(),
            json!({})
        );

        let query = SightingsQuery {
            limit: Some(10),
            order: Some(SortOrder::Asc),
            ..SightingsQuery::for_device("aa:bb:cc:dd:ee:ff")
        };
        assert_eq!(
            serde_json::to_value(query).unwrap(),
            json!({ "mac": "aa:bb:cc:dd:ee:ff", "limit": 10, "order": "ASC" })
        );
    }

    #[test]
    fn test_recent_query_default() {
        assert_eq!(RecentQuery::default().limit, 50);
    }
}
