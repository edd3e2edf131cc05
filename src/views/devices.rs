use super::contains_ignore_case;
use crate::model::{Device, DeviceStatus, DeviceType};
use serde::Deserialize;

/// Device list filter; absent fields match everything
#[derive(Clone, Debug, Default, Deserialize)]
pub struct DeviceFilter {
    /// Matched against device name and location
    pub search: Option<String>,
    pub status: Option<DeviceStatus>,
    #[serde(rename = "type")]
    pub device_type: Option<DeviceType>,
}

impl DeviceFilter {
    pub fn matches(&self, device: &Device) -> bool {
        if let Some(ref search) = self.search {
            if !contains_ignore_case(&device.name, search)
                && !contains_ignore_case(&device.location, search)
            {
                return false;
            }
        }

        self.status.map_or(true, |s| device.status == s)
            && self.device_type.map_or(true, |t| device.device_type == t)
    }

    /// Number of non-search filters in effect
    pub fn active_count(&self) -> usize {
        usize::from(self.status.is_some()) + usize::from(self.device_type.is_some())
    }
}

pub fn filter_devices(devices: &[Device], filter: &DeviceFilter) -> Vec<Device> {
    devices
        .iter()
        .filter(|device| filter.matches(device))
        .cloned()
        .collect()
}
