//! Device domain model.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// A wireless device observed by the sniffer, keyed by MAC address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Device {
    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub mac: String,
    pub name: Option<String>,
    #[validate(custom(function = "shared::validation::validate_utc_timestamp"))]
    pub first_seen: String,
    #[validate(custom(function = "shared::validation::validate_utc_timestamp"))]
    pub last_seen: String,
    #[serde(default)]
    pub is_trusted: bool,
    /// Manufacturer resolved from the most recent OUI lookup.
    #[serde(default)]
    pub oui: Option<String>,
    /// Distinct SSIDs this device has probed for.
    #[serde(default)]
    pub ssids: Vec<String>,
    #[serde(default)]
    pub total_sightings: i64,
}

impl Device {
    /// Name to show in lists: the friendly name, or the MAC when unnamed.
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(&self.mac)
    }

    /// Case-insensitive match of `needle` against MAC, name, OUI and SSIDs.
    ///
    /// `needle` must already be lowercase.
    pub fn matches_search(&self, needle: &str) -> bool {
        if needle.is_empty() {
            return true;
        }

        let contains = |haystack: &str| haystack.to_lowercase().contains(needle);
        contains(&self.mac)
            || self.name.as_deref().is_some_and(contains)
            || self.oui.as_deref().is_some_and(contains)
            || self.ssids.iter().any(|s| contains(s))
    }
}

/// Device detail with signal statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct DeviceWithStats {
    #[serde(flatten)]
    #[validate(nested)]
    pub device: Device,
    pub avg_signal_dbm: Option<f64>,
}

impl DeviceWithStats {
    pub fn mac(&self) -> &str {
        &self.device.mac
    }
}

/// Partial update for a device. Unset fields are not sent.
///
/// `name: Some(None)` serializes as `"name": null`, clearing the name.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DeviceUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_trusted: Option<bool>,
}

impl DeviceUpdate {
    pub fn rename(name: impl Into<String>) -> Self {
        Self {
            name: Some(Some(name.into())),
            ..Default::default()
        }
    }

    pub fn clear_name() -> Self {
        Self {
            name: Some(None),
            ..Default::default()
        }
    }

    pub fn trusted(is_trusted: bool) -> Self {
        Self {
            is_trusted: Some(is_trusted),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.is_trusted.is_none()
    }
}

/// Query for the device list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DeviceQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_trusted: Option<bool>,
}
