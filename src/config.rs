use anyhow::Context;
use serde::Deserialize;
use std::{
    fmt::Display,
    net::IpAddr,
    path::{Path, PathBuf},
};

use crate::domain::device::{Device, DeviceId, DeviceKind};

#[derive(Debug, Deserialize)]
pub struct Config {
    pub version: u32,
    #[serde(default)]
    pub devices: Vec<DeviceConfig>,
}

impl Config {
    pub fn load(path: &Path) -> anyhow::Result<Config> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        toml::from_str(&contents).with_context(|| "Failed to parse config TOML")
    }

    pub fn device(&self, id: DeviceId) -> Option<&DeviceConfig> {
        self.devices.iter().find(|device| device.id == id)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct DeviceConfig {
    pub id: DeviceId,
    pub name: String,
    pub kind: DeviceKind,
    pub ip: IpAddr,
    #[serde(default)]
    pub slots: Slots,
}

impl DeviceConfig {
    pub fn device(&self) -> Device {
        Device {
            id: self.id,
            name: self.name.clone(),
            kind: self.kind,
            ip: self.ip,
        }
    }
}

/// Where the media of a device's removable slots is mounted on this host
#[derive(Debug, Deserialize, Clone, Default)]
pub struct Slots {
    pub usb: Option<Location>,
    pub sd: Option<Location>,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Location {
    File {
        path: PathBuf,
    },
    /// Removable volume found by its label, `path` is relative to its root
    Usb {
        label: String,
        #[serde(default)]
        path: PathBuf,
    },
}

impl Location {
    pub fn from_path<P: AsRef<Path>>(p: P) -> Self {
        Self::File {
            path: p.as_ref().to_path_buf(),
        }
    }
}

impl Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Location::File { path } => write!(f, "{}", path.display()),
            Location::Usb { label, path } if path.as_os_str().is_empty() => {
                write!(f, "volume '{label}'")
            }
            Location::Usb { label, path } => write!(f, "volume '{label}' at {}", path.display()),
        }
    }
}
