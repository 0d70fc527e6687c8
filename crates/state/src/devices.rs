//! Device list, selection and filter state.

use domain::models::{Device, DeviceFilter, DeviceWithStats};
use tracing::debug;

use crate::store::Store;

/// Containers backing the device views.
#[derive(Clone, Default)]
pub struct DeviceState {
    pub devices: Store<Vec<Device>>,
    pub selected_device: Store<Option<DeviceWithStats>>,
    pub device_filter: Store<DeviceFilter>,
    pub search_query: Store<String>,
}

impl DeviceState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_filter(filter: DeviceFilter) -> Self {
        let state = Self::default();
        state.device_filter.set(filter);
        state
    }

    /// Devices admitted by the current filter and matching the search query.
    pub fn visible_devices(&self) -> Vec<Device> {
        let filter = self.device_filter.get();
        let needle = self.search_query.read(|q| q.trim().to_lowercase());

        self.devices.read(|devices| {
            devices
                .iter()
                .filter(|d| filter.admits(d) && d.matches_search(&needle))
                .cloned()
                .collect()
        })
    }

    /// Applies the editable fields of a freshly updated device to the list
    /// entry and the selection with the same MAC. Returns whether anything
    /// matched.
    pub fn apply_device_edit(&self, updated: &Device) -> bool {
        let mut matched = false;

        self.devices.update(|devices| {
            if let Some(entry) = devices.iter_mut().find(|d| d.mac == updated.mac) {
                entry.name = updated.name.clone();
                entry.is_trusted = updated.is_trusted;
                matched = true;
            }
        });

        let selected = self
            .selected_device
            .read(|s| s.as_ref().is_some_and(|d| d.mac() == updated.mac));
        if selected {
            self.selected_device.update(|s| {
                if let Some(detail) = s.as_mut() {
                    detail.device.name = updated.name.clone();
                    detail.device.is_trusted = updated.is_trusted;
                }
            });
            matched = true;
        }

        debug!(mac = %updated.mac, matched, "Applied device edit");
        matched
    }

    pub fn select(&self, device: DeviceWithStats) {
        self.selected_device.set(Some(device));
    }

    pub fn clear_selection(&self) {
        self.selected_device.set(None);
    }
}
