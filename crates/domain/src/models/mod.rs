//! Domain models mirrored from the sniffer backend's JSON.

pub mod activity;
pub mod device;
pub mod filter;
pub mod fingerprint;
pub mod identity;
pub mod sighting;
pub mod stats;

pub use activity::DeviceActivity;
pub use device::{Device, DeviceQuery, DeviceUpdate, DeviceWithStats};
pub use filter::DeviceFilter;
pub use fingerprint::{Fingerprint, FingerprintWithDetails, FingerprintsResponse};
pub use identity::{
    CreateIdentity, DeviceIdentity, LinkFingerprint, LinkFingerprintResponse, UpdateAlias,
};
pub use sighting::{RecentQuery, Sighting, SightingsQuery, SightingsResponse};
pub use stats::{HealthStatus, ManufacturerCount, MostActiveDevice, OverviewStats};
