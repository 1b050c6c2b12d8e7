//! Artwork lookup by reading image files straight off removable media.

use std::{fmt::Display, sync::Arc};

use async_trait::async_trait;
use tracing::{Instrument, debug};

use crate::{
    artwork::{
        error::{InvalidSlot, LocalFetchError},
        request::ArtworkOptions,
    },
    domain::device::{Device, DeviceId, MediaSlot},
};

/// Slots whose media can be read as a filesystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FileSlot {
    Usb,
    Sd,
}

impl TryFrom<MediaSlot> for FileSlot {
    type Error = InvalidSlot;

    fn try_from(slot: MediaSlot) -> Result<Self, Self::Error> {
        match slot {
            MediaSlot::Usb => Ok(FileSlot::Usb),
            MediaSlot::Sd => Ok(FileSlot::Sd),
            other => Err(InvalidSlot(other)),
        }
    }
}

impl From<FileSlot> for MediaSlot {
    fn from(slot: FileSlot) -> Self {
        match slot {
            FileSlot::Usb => MediaSlot::Usb,
            FileSlot::Sd => MediaSlot::Sd,
        }
    }
}

impl Display for FileSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&MediaSlot::from(*self), f)
    }
}

/// Hands out handles to the media database of a device slot.
#[async_trait]
pub trait LocalDatabase: Send + Sync {
    type Connection: Send + Sync;

    async fn get(&self, device_id: DeviceId, slot: FileSlot) -> Option<Arc<Self::Connection>>;
}

#[derive(Debug, Clone, Copy)]
pub struct FetchFileRequest<'a> {
    pub device: &'a Device,
    pub slot: FileSlot,
    /// Absolute path on the media, e.g. `/PIONEER/USBANLZ/...`
    pub path: &'a str,
}

#[async_trait]
pub trait FileFetcher: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    async fn fetch_file(&self, request: FetchFileRequest<'_>) -> Result<Option<Vec<u8>>, Self::Error>;
}

/// Retrieves artwork bytes by reading the image file the track points at.
///
/// Fails with [`InvalidSlot`] before anything else when the track is not on
/// USB or SD media. Returns `Ok(None)` when the slot has no connection, or
/// the track has no artwork file.
pub async fn via_local<L, F>(
    local: &L,
    files: &F,
    device: &Device,
    opts: &ArtworkOptions,
) -> Result<Option<Vec<u8>>, LocalFetchError<F::Error>>
where
    L: LocalDatabase,
    F: FileFetcher,
{
    let ArtworkOptions {
        device_id,
        track_slot,
        track,
        span,
        ..
    } = opts;

    let slot = FileSlot::try_from(*track_slot)?;

    let Some(_conn) = local.get(*device_id, slot).instrument(span.clone()).await else {
        span.in_scope(|| debug!("no local database for device {device_id} slot {slot}"));
        return Ok(None);
    };

    let Some(path) = track.artwork.as_ref().and_then(|a| a.path.as_deref()) else {
        span.in_scope(|| debug!("track {} has no artwork file", track.id));
        return Ok(None);
    };

    span.in_scope(|| debug!("fetching {path} from device {device_id} slot {slot}"));

    files
        .fetch_file(FetchFileRequest { device, slot, path })
        .instrument(span.clone())
        .await
        .map_err(LocalFetchError::Fetch)
}
