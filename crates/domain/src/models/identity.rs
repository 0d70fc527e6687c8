//! Device identity model.
//!
//! An identity is a user-curated grouping of fingerprints that represents one
//! physical device across MAC randomization.

use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct DeviceIdentity {
    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub identity_id: String,
    pub alias: Option<String>,
    #[serde(default)]
    pub alias_set_at: Option<String>,
    #[serde(default)]
    pub ssid_signature: Option<String>,
    #[validate(custom(function = "shared::validation::validate_utc_timestamp"))]
    pub first_seen: String,
    #[validate(custom(function = "shared::validation::validate_utc_timestamp"))]
    pub last_seen: String,
    #[serde(default)]
    pub total_sightings: i64,
}

impl DeviceIdentity {
    pub fn label(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.identity_id)
    }
}

/// Body for creating an identity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateIdentity {
    pub identity_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fingerprint_ids: Option<Vec<String>>,
}

impl CreateIdentity {
    pub fn new(identity_id: impl Into<String>) -> Self {
        Self {
            identity_id: identity_id.into(),
            alias: None,
            fingerprint_ids: None,
        }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn with_fingerprints<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fingerprint_ids = Some(ids.into_iter().map(Into::into).collect());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpdateAlias {
    pub alias: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinkFingerprint {
    pub fingerprint_id: String,
}

/// Acknowledgement returned when a fingerprint is linked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct LinkFingerprintResponse {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_identity_deserialize() {
        let identity: DeviceIdentity = serde_json::from_value(json!({
            "identity_id": "id-7f3a",
            "alias": null,
            "alias_set_at": null,
            "ssid_signature": "HomeNet,Work",
            "first_seen": "2024-01-15 10:30:00",
            "last_seen": "2024-02-01 09:00:00",
            "total_sightings": 880
        }))
        .unwrap();

        assert!(identity.validate().is_ok());
        assert_eq!(identity.label(), "id-7f3a");
    }

    #[test]
    fn test_identity_label_prefers_alias() {
        let identity: DeviceIdentity = serde_json::from_value(json!({
            "identity_id": "id-7f3a",
            "alias": "Dad's phone",
            "first_seen": "2024-01-15 10:30:00",
            "last_seen": "2024-02-01 09:00:00"
        }))
        .unwrap();

        assert_eq!(identity.label(), "Dad's phone");
        assert_eq!(identity.total_sightings, 0);
    }

    #[test]
    fn test_create_identity_body() {
        let minimal = CreateIdentity::new("id-1");
        assert_eq!(
            serde_json::to_value(&minimal).unwrap(),
            json!({ "identity_id": "id-1" })
        );

        let full = CreateIdentity::new("id-2")
            .with_alias("Laptop")
            .with_fingerprints(["fp-a", "fp-b"]);
        assert_eq!(
            serde_json::to_value(&full).unwrap(),
            json!({
                "identity_id": "id-2",
                "alias": "Laptop",
                "fingerprint_ids": ["fp-a", "fp-b"]
            })
        );
    }
}
