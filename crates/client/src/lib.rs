pub mod client;
pub mod config;
pub mod error;
pub mod live;
pub mod logging;
pub mod metrics;
pub mod sync;

pub use client::SnifferClient;
pub use error::ClientError;
pub use live::{LiveFeedHandle, LiveFeedPoller, SightingSource};
pub use sync::DashboardSync;
