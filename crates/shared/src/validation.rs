//! Validation helpers applied to backend responses at the deserialization
//! boundary.

use validator::ValidationError;

use crate::time::parse_utc_timestamp;

/// Validates that a backend timestamp can be parsed as UTC.
pub fn validate_utc_timestamp(timestamp: &str) -> Result<(), ValidationError> {
    match parse_utc_timestamp(timestamp) {
        Ok(_) => Ok(()),
        Err(e) => {
            let mut err = ValidationError::new("timestamp_format");
            err.message = Some(e.to_string().into());
            Err(err)
        }
    }
}

/// Validates that an identifier is not empty or whitespace.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("Identifier must not be blank".into());
        Err(err)
    } else {
        Ok(())
    }
}

/// Validates that every bucket of a histogram is non-negative.
pub fn validate_counts(counts: &[i64]) -> Result<(), ValidationError> {
    if counts.iter().all(|c| *c >= 0) {
        Ok(())
    } else {
        let mut err = ValidationError::new("negative_count");
        err.message = Some("Counts must be non-negative".into());
        Err(err)
    }
}
