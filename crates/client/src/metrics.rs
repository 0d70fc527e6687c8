//! Backend request metrics.
//!
//! Recorded through the `metrics` facade; an embedding application installs
//! whichever recorder it wants. Without one these calls are no-ops.

use metrics::{counter, histogram};
use std::time::Instant;

/// Times one backend request and records its outcome.
///
/// Usage:
/// ```ignore
/// let timer = RequestTimer::new("get_devices");
/// let result = self.send(...).await;
/// timer.finish(outcome_of(&result));
/// ```
pub struct RequestTimer {
    endpoint: &'static str,
    start: Instant,
}

impl RequestTimer {
    pub fn new(endpoint: &'static str) -> Self {
        Self {
            endpoint,
            start: Instant::now(),
        }
    }

    /// Records `backend_requests_total` and `backend_request_duration_seconds`.
    pub fn finish(self, outcome: &'static str) {
        let duration = self.start.elapsed().as_secs_f64();

        counter!(
            "backend_requests_total",
            "endpoint" => self.endpoint,
            "outcome" => outcome
        )
        .increment(1);

        histogram!(
            "backend_request_duration_seconds",
            "endpoint" => self.endpoint
        )
        .record(duration);
    }
}

/// Record a live feed poll and how many new sightings it delivered.
pub fn record_live_poll(delivered: usize) {
    counter!("live_feed_polls_total").increment(1);
    counter!("live_feed_sightings_total").increment(delivered as u64);
}

/// Record a poll that may have skipped sightings between batches.
pub fn record_live_gap() {
    counter!("live_feed_gaps_total").increment(1);
}
