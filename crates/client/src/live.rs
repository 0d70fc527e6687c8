//! Live probe delivery.
//!
//! The backend exposes no push channel, so the live feed is fed by polling
//! `GET /sightings/recent`. The poller remembers the highest sighting id it
//! has delivered and forwards only newer ones, oldest first, so the feed
//! stays newest-first.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use domain::models::Sighting;
use state::LiveFeedState;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::client::SnifferClient;
use crate::config::LiveFeedConfig;
use crate::error::ClientError;
use crate::metrics::{record_live_gap, record_live_poll};

/// Source of recent sightings, newest first.
#[async_trait]
pub trait SightingSource: Send + Sync {
    async fn recent(&self, limit: u32) -> Result<Vec<Sighting>, ClientError>;
}

#[async_trait]
impl SightingSource for SnifferClient {
    async fn recent(&self, limit: u32) -> Result<Vec<Sighting>, ClientError> {
        self.get_recent_sightings(limit).await
    }
}

pub struct LiveFeedPoller<S> {
    source: Arc<S>,
    live: LiveFeedState,
    config: LiveFeedConfig,
    watermark: Option<i64>,
    primed: bool,
    failures: u32,
    gaps: u64,
}

impl<S: SightingSource + 'static> LiveFeedPoller<S> {
    pub fn new(source: Arc<S>, live: LiveFeedState, config: LiveFeedConfig) -> Self {
        Self {
            source,
            live,
            config,
            watermark: None,
            primed: false,
            failures: 0,
            gaps: 0,
        }
    }

    /// Starts polling from `id`; only sightings with a greater id are
    /// delivered.
    pub fn with_watermark(mut self, id: i64) -> Self {
        self.watermark = Some(id);
        self.primed = true;
        self
    }

    pub fn watermark(&self) -> Option<i64> {
        self.watermark
    }

    /// Polls whose batch was full and entirely past the watermark, meaning
    /// sightings in between may never have been delivered.
    pub fn gaps(&self) -> u64 {
        self.gaps
    }

    /// Fetches one batch and forwards the unseen sightings. Returns how many
    /// were added to the feed.
    pub async fn poll_once(&mut self) -> Result<usize, ClientError> {
        let batch = match self.source.recent(self.config.batch_limit).await {
            Ok(batch) => batch,
            Err(e) => {
                self.failures = self.failures.saturating_add(1);
                self.set_connected(false);
                return Err(e);
            }
        };
        self.failures = 0;
        self.set_connected(true);

        let skip = !self.primed && !self.config.backfill_on_start;
        self.primed = true;

        let watermark = self.watermark;
        let batch_len = batch.len();
        let mut fresh: Vec<Sighting> = batch
            .into_iter()
            .filter(|s| watermark.map_or(true, |w| s.id > w))
            .collect();
        if let Some(max) = fresh.iter().map(|s| s.id).max() {
            self.watermark = Some(max);
        }

        if watermark.is_some()
            && batch_len > 0
            && batch_len >= self.config.batch_limit as usize
            && fresh.len() == batch_len
        {
            self.gaps += 1;
            warn!(
                previous_watermark = ?watermark,
                watermark = ?self.watermark,
                batch_limit = self.config.batch_limit,
                "Live feed batch entirely new; sightings may have been skipped"
            );
            record_live_gap();
        }

        if skip {
            debug!(watermark = ?self.watermark, "Live feed primed without backfill");
            record_live_poll(0);
            return Ok(0);
        }

        fresh.sort_by_key(|s| s.id);
        let delivered = fresh.len();
        for sighting in fresh {
            self.live.add_probe(sighting);
        }

        record_live_poll(delivered);
        Ok(delivered)
    }

    /// Delay before the next poll: the poll interval, doubled for every
    /// consecutive failure and capped at `max_backoff_ms`.
    pub fn next_delay(&self) -> Duration {
        let base = self.config.poll_interval_ms;
        let factor = 1u64.checked_shl(self.failures).unwrap_or(u64::MAX);
        let millis = base
            .saturating_mul(factor)
            .min(self.config.max_backoff_ms.max(base));
        Duration::from_millis(millis)
    }

    /// Polls until `shutdown_rx` carries `true` or its sender is dropped.
    pub async fn run(mut self, mut shutdown_rx: watch::Receiver<bool>) {
        info!(
            interval_ms = self.config.poll_interval_ms,
            batch_limit = self.config.batch_limit,
            "Live feed poller started"
        );

        loop {
            tokio::select! {
                result = self.poll_once() => match result {
                    Ok(delivered) if delivered > 0 => {
                        debug!(delivered, watermark = ?self.watermark, "Live feed updated");
                    }
                    Ok(_) => {}
                    Err(e) => {
                        warn!(
                            error = %e,
                            failures = self.failures,
                            "Live feed poll failed"
                        );
                    }
                },
                changed = shutdown_rx.changed() => {
                    if changed.is_err() || *shutdown_rx.borrow() {
                        break;
                    }
                }
            }

            tokio::select! {
                _ = tokio::time::sleep(self.next_delay()) => {}
                changed = shutdown_rx.changed() => {
                    if changed.is_err() || *shutdown_rx.borrow() {
                        break;
                    }
                }
            }
        }

        self.set_connected(false);
        info!("Live feed poller stopped");
    }

    /// Runs the poller on a background task.
    pub fn spawn(self) -> LiveFeedHandle {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let handle = tokio::spawn(self.run(shutdown_rx));
        LiveFeedHandle {
            shutdown_tx,
            handle,
        }
    }

    fn set_connected(&self, connected: bool) {
        if self.live.connected.get() != connected {
            self.live.connected.set(connected);
        }
    }
}

/// Handle to a spawned [`LiveFeedPoller`]. Dropping it stops the poller.
pub struct LiveFeedHandle {
    shutdown_tx: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl LiveFeedHandle {
    /// Signals the poller to stop. Returns immediately.
    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(true);
    }

    /// Signals shutdown and waits for the poller task to finish.
    pub async fn wait_for_shutdown(self, timeout: Duration) {
        self.shutdown();

        match tokio::time::timeout(timeout, self.handle).await {
            Ok(Ok(())) => info!("Live feed poller shut down"),
            Ok(Err(e)) => warn!("Live feed task panicked: {}", e),
            Err(_) => warn!("Live feed shutdown timed out after {:?}", timeout),
        }
    }
}
