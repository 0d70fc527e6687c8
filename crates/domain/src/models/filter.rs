//! Dashboard device filter.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::device::{Device, DeviceQuery};

/// Tri-state trust filter for the device list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceFilter {
    All,
    Trusted,
    #[default]
    Untrusted,
}

impl DeviceFilter {
    /// The backend `is_trusted` filter for this selection.
    pub fn is_trusted(&self) -> Option<bool> {
        match self {
            DeviceFilter::All => None,
            DeviceFilter::Trusted => Some(true),
            DeviceFilter::Untrusted => Some(false),
        }
    }

    pub fn to_query(&self) -> DeviceQuery {
        DeviceQuery {
            is_trusted: self.is_trusted(),
        }
    }

    pub fn admits(&self, device: &Device) -> bool {
        self.is_trusted()
            .map_or(true, |trusted| device.is_trusted == trusted)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceFilter::All => "all",
            DeviceFilter::Trusted => "trusted",
            DeviceFilter::Untrusted => "untrusted",
        }
    }
}

impl fmt::Display for DeviceFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeviceFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" => Ok(DeviceFilter::All),
            "trusted" => Ok(DeviceFilter::Trusted),
            "untrusted" => Ok(DeviceFilter::Untrusted),
            other => Err(format!("Unknown device filter: {}", other)),
        }
    }
}
