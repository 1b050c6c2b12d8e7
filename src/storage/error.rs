use thiserror::Error;

use crate::{artwork::FileSlot, domain::device::DeviceId};

#[derive(Debug, Error)]
pub enum MountError {
    #[error("device {device} has no {slot} media mounted")]
    NotMounted { device: DeviceId, slot: FileSlot },

    #[error("path {0} escapes the media root")]
    InvalidPath(String),

    #[error("filesystem error: {0}")]
    Io(#[from] std::io::Error),
}
