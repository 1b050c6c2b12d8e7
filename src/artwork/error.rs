use thiserror::Error;

use crate::domain::device::MediaSlot;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RequestError {
    #[error("artwork request has no tracing span")]
    MissingSpan,
}

/// Files can only be read off removable media.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("expected USB or SD slot for file artwork, got {0}")]
pub struct InvalidSlot(pub MediaSlot);

#[derive(Debug, Error)]
pub enum LocalFetchError<E> {
    #[error(transparent)]
    InvalidSlot(#[from] InvalidSlot),

    /// Error returned by the file fetcher, untouched.
    #[error(transparent)]
    Fetch(E),
}

impl<E> LocalFetchError<E> {
    pub fn is_invalid_slot(&self) -> bool {
        matches!(self, LocalFetchError::InvalidSlot(_))
    }
}
