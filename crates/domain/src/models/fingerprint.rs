//! Probe fingerprint model.

use serde::{Deserialize, Serialize};
use shared::pagination::has_more;
use validator::Validate;

/// A derived identifier grouping sightings from the same physical radio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Fingerprint {
    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub fingerprint_id: String,
    /// Owning identity, `None` while unlinked.
    pub identity_id: Option<String>,
    /// Information elements as an opaque JSON string.
    #[serde(default)]
    pub ie_data: Option<String>,
    #[validate(custom(function = "shared::validation::validate_utc_timestamp"))]
    pub first_seen: String,
    #[validate(custom(function = "shared::validation::validate_utc_timestamp"))]
    pub last_seen: String,
    #[serde(default)]
    pub sighting_count: i64,
}

impl Fingerprint {
    pub fn is_linked(&self) -> bool {
        self.identity_id.is_some()
    }

    /// Decodes `ie_data` when present and well-formed.
    pub fn ie_fields(&self) -> Option<serde_json::Value> {
        self.ie_data
            .as_deref()
            .and_then(|raw| serde_json::from_str(raw).ok())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct FingerprintWithDetails {
    #[serde(flatten)]
    #[validate(nested)]
    pub fingerprint: Fingerprint,
    #[serde(default)]
    pub ssid_signature: Vec<String>,
    #[serde(default)]
    pub unique_mac_count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct FingerprintsResponse {
    #[validate(nested)]
    pub fingerprints: Vec<Fingerprint>,
    pub total: u64,
    pub limit: u64,
    pub offset: u64,
}

impl FingerprintsResponse {
    pub fn has_more(&self) -> bool {
        has_more(self.offset, self.fingerprints.len(), self.total)
    }
}
