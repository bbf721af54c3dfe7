//! Human-readable names for raw hardware identifiers.
//!
//! Device ids arrive as `vendor/device` hex pairs (e.g. `0x10de/0x1234`).
//! A [`DeviceNames`] table knows full device names for some of them and
//! vendor names for most.

use ahash::AHashMap;
use anyhow::Context;
use serde::Deserialize;
use std::path::Path;

/// Maps raw category identifiers to display names.
pub trait NameLookup {
    fn device_name(&self, raw: &str) -> String;
}

/// Identity lookup: every id is its own name.
#[derive(Debug, Clone, Copy, Default)]
pub struct RawNames;

impl NameLookup for RawNames {
    fn device_name(&self, raw: &str) -> String {
        raw.to_string()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeviceNames {
    #[serde(default)]
    devices: AHashMap<String, String>,
    #[serde(default)]
    vendors: AHashMap<String, String>,
}

impl DeviceNames {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_device(mut self, id: impl Into<String>, name: impl Into<String>) -> Self {
        self.devices.insert(id.into(), name.into());
        self
    }

    pub fn with_vendor(mut self, id: impl Into<String>, name: impl Into<String>) -> Self {
        self.vendors.insert(id.into(), name.into());
        self
    }

    /// Load a `{ "devices": {..}, "vendors": {..} }` table.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read name table {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parse name table {}", path.display()))
    }

    /// Vendor display name; unknown vendors keep their raw code.
    pub fn vendor_name<'a>(&'a self, vendor: &'a str) -> &'a str {
        self.vendors.get(vendor).map(String::as_str).unwrap_or(vendor)
    }
}

impl NameLookup for DeviceNames {
    fn device_name(&self, raw: &str) -> String {
        if let Some(name) = self.devices.get(raw) {
            return name.clone();
        }
        let parts: Vec<&str> = raw.split('/').collect();
        if let [vendor, device] = parts.as_slice() {
            return format!("{} {}", self.vendor_name(vendor), device);
        }
        raw.to_string()
    }
}
