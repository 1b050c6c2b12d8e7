//! Artwork retrieval for tracks on networked players.
//!
//! Two independent strategies share [`request::ArtworkOptions`]:
//! [`remote::via_remote`] asks the device database for the image, while
//! [`local::via_local`] reads the image file off USB or SD media. The caller
//! picks one based on what the device supports.

pub mod error;
pub mod local;
pub mod remote;
pub mod request;

pub use error::{InvalidSlot, LocalFetchError, RequestError};
pub use local::{FetchFileRequest, FileFetcher, FileSlot, LocalDatabase, via_local};
pub use remote::{
    ArtworkArgs, MenuTarget, Query, QueryDescriptor, RemoteConnection, RemoteDatabase,
    RemoteQuery, via_remote,
};
pub use request::{ArtworkOptions, ArtworkRequest};
