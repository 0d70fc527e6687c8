//! Per-device activity histograms.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Sighting counts for one device, bucketed three ways.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct DeviceActivity {
    /// Counts per hour of day, index 0 is midnight UTC.
    #[validate(
        length(equal = 24, message = "by_hour must contain 24 buckets"),
        custom(function = "shared::validation::validate_counts")
    )]
    pub by_hour: Vec<i64>,
    /// Counts per weekday.
    #[validate(
        length(equal = 7, message = "by_day_of_week must contain 7 buckets"),
        custom(function = "shared::validation::validate_counts")
    )]
    pub by_day_of_week: Vec<i64>,
    /// Counts per `YYYY-MM-DD` date over the last 30 days.
    pub by_date: BTreeMap<String, i64>,
}

impl DeviceActivity {
    /// Hour of day with the most sightings, ties resolved to the earliest hour.
    pub fn peak_hour(&self) -> Option<usize> {
        self.by_hour
            .iter()
            .enumerate()
            .filter(|(_, count)| **count > 0)
            .max_by(|(ia, a), (ib, b)| a.cmp(b).then(ib.cmp(ia)))
            .map(|(hour, _)| hour)
    }

    pub fn total(&self) -> i64 {
        self.by_hour.iter().sum()
    }
}
