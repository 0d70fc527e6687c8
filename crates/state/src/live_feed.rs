//! Live probe feed state.
//!
//! The feed is a bounded, newest-first list. Appends never deduplicate:
//! repeated or out-of-order deliveries are kept as received.

use std::collections::BTreeSet;

use domain::models::Sighting;
use tracing::debug;

use crate::store::Store;

/// Maximum number of sightings retained in the live feed.
pub const LIVE_FEED_CAPACITY: usize = 100;

#[derive(Clone)]
pub struct LiveFeedState {
    /// Most recent sightings, newest first.
    pub live_probes: Store<Vec<Sighting>>,
    /// Hide sightings from trusted devices in the feed view.
    pub hide_trusted: Store<bool>,
    /// Whether the live delivery channel is currently healthy.
    pub connected: Store<bool>,
    /// MACs known to be trusted, used by [`LiveFeedState::visible_probes`].
    pub trusted_macs: Store<BTreeSet<String>>,
}

impl Default for LiveFeedState {
    fn default() -> Self {
        Self {
            live_probes: Store::default(),
            hide_trusted: Store::new(true),
            connected: Store::new(false),
            trusted_macs: Store::default(),
        }
    }
}

impl LiveFeedState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepends a sighting and truncates the feed to [`LIVE_FEED_CAPACITY`].
    pub fn add_probe(&self, probe: Sighting) {
        self.live_probes.update(|probes| {
            probes.insert(0, probe);
            probes.truncate(LIVE_FEED_CAPACITY);
        });
    }

    /// Replaces the whole feed in a single write. `probes` must be newest
    /// first; anything past [`LIVE_FEED_CAPACITY`] is dropped.
    pub fn replace_probes(&self, mut probes: Vec<Sighting>) {
        probes.truncate(LIVE_FEED_CAPACITY);
        self.live_probes.set(probes);
    }

    pub fn clear_probes(&self) {
        debug!("Clearing live feed");
        self.live_probes.set(Vec::new());
    }

    /// Whether `probe` is kept out of the feed view: hide-trusted is on and
    /// its MAC is trusted.
    pub fn is_hidden(&self, probe: &Sighting) -> bool {
        self.hide_trusted.get()
            && self
                .trusted_macs
                .read(|trusted| trusted.contains(&probe.mac))
    }

    /// Feed contents as displayed, honoring the hide-trusted toggle.
    pub fn visible_probes(&self) -> Vec<Sighting> {
        self.live_probes
            .get()
            .into_iter()
            .filter(|p| !self.is_hidden(p))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.live_probes.read(Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
