//! Serves artwork files of device media that is mounted on this host,
//! e.g. a USB stick moved from a player to the laptop.

use std::{
    collections::HashMap,
    io::ErrorKind,
    path::{Component, Path, PathBuf},
    sync::Arc,
};

use anyhow::Context;
use async_trait::async_trait;
use log::{debug, warn};

use crate::{
    artwork::{FetchFileRequest, FileFetcher, FileSlot, LocalDatabase},
    config::{DeviceConfig, Location},
    domain::device::DeviceId,
    storage::{error::MountError, usb::find_mount_by_label},
};

/// Handle to the mounted root directory of one device slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountHandle {
    pub root: PathBuf,
}

#[derive(Debug, Default)]
pub struct MountedMedia {
    mounts: HashMap<(DeviceId, FileSlot), Location>,
}

impl MountedMedia {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(devices: &[DeviceConfig]) -> Self {
        let mut media = Self::new();
        for device in devices {
            if let Some(usb) = &device.slots.usb {
                media.mount(device.id, FileSlot::Usb, usb.clone());
            }
            if let Some(sd) = &device.slots.sd {
                media.mount(device.id, FileSlot::Sd, sd.clone());
            }
        }
        media
    }

    pub fn mount(&mut self, device: DeviceId, slot: FileSlot, location: Location) {
        self.mounts.insert((device, slot), location);
    }

    pub fn location(&self, device: DeviceId, slot: FileSlot) -> Option<&Location> {
        self.mounts.get(&(device, slot))
    }

    /// Resolves the root directory of a slot, if it is currently present.
    pub async fn root(&self, device: DeviceId, slot: FileSlot) -> Option<PathBuf> {
        let location = self.location(device, slot)?;

        let root = match resolve_root(device, slot, location).await {
            Ok(root) => root,
            Err(e) => {
                debug!("{e:#}");
                return None;
            }
        };

        match tokio::fs::metadata(&root).await {
            Ok(meta) if meta.is_dir() => Some(root),
            Ok(_) => {
                warn!("{slot} media root of device {device} is not a directory: {location}");
                None
            }
            Err(e) => {
                debug!("{slot} media of device {device} unavailable at {location}: {e}");
                None
            }
        }
    }
}

async fn resolve_root(
    device: DeviceId,
    slot: FileSlot,
    location: &Location,
) -> anyhow::Result<PathBuf> {
    match location {
        Location::File { path } => Ok(path.clone()),
        Location::Usb { label, path } => {
            let volume = find_mount_by_label(label).await.with_context(|| {
                format!("{slot} media of device {device}: volume '{label}' not found")
            })?;
            Ok(volume.join(path))
        }
    }
}

/// Maps an absolute path on device media to a path below `root`.
pub fn media_path(root: &Path, path: &str) -> Result<PathBuf, MountError> {
    let relative = Path::new(path.trim_start_matches('/'));

    let mut resolved = root.to_path_buf();
    let mut depth = 0;
    for component in relative.components() {
        match component {
            Component::Normal(part) => {
                resolved.push(part);
                depth += 1;
            }
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(MountError::InvalidPath(path.to_string()));
            }
        }
    }

    if depth == 0 {
        return Err(MountError::InvalidPath(path.to_string()));
    }

    Ok(resolved)
}

#[async_trait]
impl LocalDatabase for MountedMedia {
    type Connection = MountHandle;

    async fn get(&self, device_id: DeviceId, slot: FileSlot) -> Option<Arc<MountHandle>> {
        let root = self.root(device_id, slot).await?;
        Some(Arc::new(MountHandle { root }))
    }
}

#[async_trait]
impl FileFetcher for MountedMedia {
    type Error = MountError;

    async fn fetch_file(&self, request: FetchFileRequest<'_>) -> Result<Option<Vec<u8>>, MountError> {
        let FetchFileRequest { device, slot, path } = request;

        let root = self
            .root(device.id, slot)
            .await
            .ok_or(MountError::NotMounted {
                device: device.id,
                slot,
            })?;
        let file = media_path(&root, path)?;

        match tokio::fs::read(&file).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("{} not found on {slot} media of device {}", path, device.id);
                Ok(None)
            }
            Err(e) => Err(MountError::Io(e)),
        }
    }
}
