//! Keeps dashboard state in step with the backend.
//!
//! Each operation performs its request first and only writes into the state
//! containers once the request succeeded. A failed call leaves every
//! container untouched and returns the error to the caller.

use std::collections::BTreeSet;

use domain::models::{Device, DeviceFilter, DeviceUpdate, DeviceWithStats, Sighting};
use state::{DashboardState, LIVE_FEED_CAPACITY};
use tracing::{debug, info};

use crate::client::SnifferClient;
use crate::error::ClientError;

#[derive(Clone)]
pub struct DashboardSync {
    client: SnifferClient,
    state: DashboardState,
}

impl DashboardSync {
    pub fn new(client: SnifferClient, state: DashboardState) -> Self {
        Self { client, state }
    }

    pub fn client(&self) -> &SnifferClient {
        &self.client
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    /// Reloads the device list for the current filter.
    pub async fn refresh_devices(&self) -> Result<Vec<Device>, ClientError> {
        let filter = self.state.devices.device_filter.get();
        let devices = self.client.get_devices(filter.to_query()).await?;

        info!(filter = %filter, count = devices.len(), "Loaded devices");
        self.state.devices.devices.set(devices.clone());
        Ok(devices)
    }

    /// Switches the filter and reloads. The filter is only changed if the
    /// reload succeeds.
    pub async fn set_filter(&self, filter: DeviceFilter) -> Result<Vec<Device>, ClientError> {
        let devices = self.client.get_devices(filter.to_query()).await?;

        self.state.devices.device_filter.set(filter);
        self.state.devices.devices.set(devices.clone());
        Ok(devices)
    }

    /// Loads a device with its signal statistics and selects it.
    pub async fn select_device(&self, mac: &str) -> Result<DeviceWithStats, ClientError> {
        let detail = self.client.get_device(mac).await?;

        debug!(mac = %mac, "Selected device");
        self.state.devices.select(detail.clone());
        Ok(detail)
    }

    pub fn clear_selection(&self) {
        self.state.devices.clear_selection();
    }

    pub async fn set_trusted(&self, mac: &str, is_trusted: bool) -> Result<Device, ClientError> {
        let updated = self
            .client
            .update_device(mac, &DeviceUpdate::trusted(is_trusted))
            .await?;

        self.apply(&updated);
        self.state.live.trusted_macs.update(|macs| {
            if updated.is_trusted {
                macs.insert(updated.mac.clone());
            } else {
                macs.remove(&updated.mac);
            }
        });
        Ok(updated)
    }

    /// Renames a device. `None` clears its name.
    pub async fn rename_device(
        &self,
        mac: &str,
        name: Option<String>,
    ) -> Result<Device, ClientError> {
        let update = match name {
            Some(name) => DeviceUpdate::rename(name),
            None => DeviceUpdate::clear_name(),
        };
        let updated = self.client.update_device(mac, &update).await?;

        self.apply(&updated);
        Ok(updated)
    }

    /// Replaces the live feed with the backend's most recent sightings in a
    /// single write.
    pub async fn load_recent(&self, limit: u32) -> Result<usize, ClientError> {
        let recent = self.client.get_recent_sightings(limit).await?;
        let count = recent.len().min(LIVE_FEED_CAPACITY);

        // The backend answers newest first, which is the feed's order.
        self.state.live.replace_probes(recent);

        debug!(count, "Seeded live feed");
        Ok(count)
    }

    /// Reloads the set of trusted MACs used to hide trusted probes.
    pub async fn refresh_trusted_macs(&self) -> Result<usize, ClientError> {
        let trusted = self
            .client
            .get_devices(DeviceFilter::Trusted.to_query())
            .await?;
        let macs: BTreeSet<String> = trusted.into_iter().map(|d| d.mac).collect();
        let count = macs.len();

        self.state.live.trusted_macs.set(macs);
        Ok(count)
    }

    /// Sightings currently shown in the live feed.
    pub fn visible_probes(&self) -> Vec<Sighting> {
        self.state.live.visible_probes()
    }

    fn apply(&self, updated: &Device) {
        if !self.state.devices.apply_device_edit(updated) {
            debug!(mac = %updated.mac, "Updated device not present in state");
        }
    }
}
