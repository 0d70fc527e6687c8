//! Dashboard state containers.
//!
//! State is held in explicitly constructed [`Store`]s grouped by view. A
//! [`DashboardState`] is created once by the embedding application and
//! handed to whatever needs it; there are no process-wide singletons.

pub mod devices;
pub mod live_feed;
pub mod store;

pub use devices::DeviceState;
pub use live_feed::{LiveFeedState, LIVE_FEED_CAPACITY};
pub use store::{Store, Subscription};

/// All dashboard state, cheap to clone.
#[derive(Clone, Default)]
pub struct DashboardState {
    pub devices: DeviceState,
    pub live: LiveFeedState,
}

impl DashboardState {
    pub fn new() -> Self {
        Self::default()
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use test_support::sighting;

    #[test]
    fn test_instances_are_independent() {
        let first = DashboardState::new();
        let second = DashboardState::new();

        first.live.add_probe(sighting(1, "aa:aa:aa:aa:aa:01"));

        assert_eq!(first.live.len(), 1);
        assert!(second.live.is_empty());
    }

    #[test]
    fn test_clones_share_state() {
        let state = DashboardState::new();
        let handle = state.clone();

        handle.live.connected.set(true);
        assert!(state.live.connected.get());
    }
}
