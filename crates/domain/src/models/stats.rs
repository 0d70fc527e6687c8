//! Dashboard overview statistics.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Device with the most sightings today.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MostActiveDevice {
    pub mac: String,
    pub name: Option<String>,
    pub sightings: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManufacturerCount {
    pub oui: String,
    pub count: i64,
}

/// Read-only snapshot computed by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct OverviewStats {
    pub total_devices: i64,
    pub new_today: i64,
    pub new_this_week: i64,
    pub trusted_count: i64,
    pub unknown_count: i64,
    pub most_active_today: Option<MostActiveDevice>,
    #[serde(default)]
    pub top_manufacturers: Vec<ManufacturerCount>,
    /// Probe counts for each of the last 24 hours.
    #[validate(
        length(equal = 24, message = "probes_by_hour must contain 24 buckets"),
        custom(function = "shared::validation::validate_counts")
    )]
    pub probes_by_hour: Vec<i64>,
}

/// Backend liveness report from `/health`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct HealthStatus {
    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub status: String,
    #[serde(default)]
    pub database: Option<String>,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.status.eq_ignore_ascii_case("healthy")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_overview_deserialize() {
        let stats: OverviewStats = serde_json::from_value(json!({
            "total_devices": 120,
            "new_today": 4,
            "new_this_week": 19,
            "trusted_count": 8,
            "unknown_count": 112,
            "most_active_today": { "mac": "aa:bb:cc:dd:ee:ff", "name": null, "sightings": 311 },
            "top_manufacturers": [{ "oui": "Apple, Inc.", "count": 40 }],
            "probes_by_hour": vec![3; 24]
        }))
        .unwrap();

        assert!(stats.validate().is_ok());
        assert_eq!(stats.most_active_today.unwrap().sightings, 311);
        assert_eq!(stats.top_manufacturers[0].oui, "Apple, Inc.");
    }

    #[test]
    fn test_overview_without_active_device() {
        let stats: OverviewStats = serde_json::from_value(json!({
            "total_devices": 0,
            "new_today": 0,
            "new_this_week": 0,
            "trusted_count": 0,
            "unknown_count": 0,
            "most_active_today": null,
            "probes_by_hour": vec![0; 24]
        }))
        .unwrap();

        assert!(stats.most_active_today.is_none());
        assert!(stats.top_manufacturers.is_empty());
    }

    #[test]
    fn test_overview_rejects_short_histogram() {
        let stats: OverviewStats = serde_json::from_value(json!({
            "total_devices": 1,
            "new_today": 0,
            "new_this_week": 0,
            "trusted_count": 0,
            "unknown_count": 1,
            "most_active_today": null,
            "top_manufacturers": [],
            "probes_by_hour": [1, 2, 3]
        }))
        .unwrap();

        assert!(stats.validate().is_err());
    }

    #[test]
    fn test_health_status() {
        let health: HealthStatus =
            serde_json::from_value(json!({ "status": "healthy", "database": "connected" }))
                .unwrap();
        assert!(health.is_healthy());

        let degraded: HealthStatus = serde_json::from_value(json!({ "status": "degraded" })).unwrap();
        assert!(!degraded.is_healthy());
        assert!(degraded.database.is_none());
    }
}
