//! Artwork lookup over the remote database protocol of a player.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{Instrument, Span, debug};

use crate::{
    artwork::request::ArtworkOptions,
    domain::device::{DeviceId, MediaSlot, TrackType},
};

/// Menu context a remote query is routed through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MenuTarget {
    Main = 0x01,
}

/// Remote query kinds issued by this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum Query {
    GetArtwork = 0x2003,
}

/// Addresses a remote query to the slot and collection the track lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryDescriptor {
    pub track_slot: MediaSlot,
    pub track_type: TrackType,
    pub menu_target: MenuTarget,
}

impl QueryDescriptor {
    pub fn main_menu(track_slot: MediaSlot, track_type: TrackType) -> Self {
        Self {
            track_slot,
            track_type,
            menu_target: MenuTarget::Main,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArtworkArgs {
    pub artwork_id: u32,
}

#[derive(Debug, Clone, Copy)]
pub struct RemoteQuery<'a> {
    pub descriptor: QueryDescriptor,
    pub query: Query,
    pub args: ArtworkArgs,
    pub span: &'a Span,
}

/// An established remote database connection to one device.
#[async_trait]
pub trait RemoteConnection: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Resolves to the raw response payload, if the device had one.
    async fn query(&self, query: RemoteQuery<'_>) -> Result<Option<Vec<u8>>, Self::Error>;
}

/// Hands out connections managed elsewhere; never opens one on demand.
#[async_trait]
pub trait RemoteDatabase: Send + Sync {
    type Connection: RemoteConnection;

    async fn get(&self, device_id: DeviceId) -> Option<Arc<Self::Connection>>;
}

pub type RemoteError<R> = <<R as RemoteDatabase>::Connection as RemoteConnection>::Error;

/// Retrieves artwork bytes by querying the device's database.
///
/// Returns `Ok(None)` when the device has no connection or the track has no
/// artwork; in both cases nothing is sent. Query errors are returned as is.
pub async fn via_remote<R>(
    remote: &R,
    opts: &ArtworkOptions,
) -> Result<Option<Vec<u8>>, RemoteError<R>>
where
    R: RemoteDatabase,
{
    let ArtworkOptions {
        device_id,
        track_slot,
        track_type,
        track,
        span,
    } = opts;

    let Some(conn) = remote.get(*device_id).instrument(span.clone()).await else {
        span.in_scope(|| debug!("no remote database connection for device {device_id}"));
        return Ok(None);
    };

    let Some(artwork) = &track.artwork else {
        span.in_scope(|| debug!("track {} has no artwork", track.id));
        return Ok(None);
    };

    span.in_scope(|| {
        debug!(
            "querying artwork {} from device {device_id} ({track_slot})",
            artwork.id
        )
    });

    conn.query(RemoteQuery {
        descriptor: QueryDescriptor::main_menu(*track_slot, *track_type),
        query: Query::GetArtwork,
        args: ArtworkArgs {
            artwork_id: artwork.id,
        },
        span,
    })
    .instrument(span.clone())
    .await
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    };

    use thiserror::Error;

    use super::*;
    use crate::{
        artwork::request::ArtworkRequest,
        domain::track::{Artwork, Track},
    };

    #[derive(Debug, Error, Clone, PartialEq, Eq)]
    #[error("remote database connection reset by device {0}")]
    struct ConnectionReset(u8);

    #[derive(Debug, Clone, PartialEq)]
    struct SentQuery {
        descriptor: QueryDescriptor,
        query: Query,
        args: ArtworkArgs,
        span_id: Option<tracing::Id>,
    }

    struct FakeConnection {
        response: Result<Option<Vec<u8>>, ConnectionReset>,
        sent: Mutex<Vec<SentQuery>>,
    }

    #[async_trait]
    impl RemoteConnection for FakeConnection {
        type Error = ConnectionReset;

        async fn query(&self, query: RemoteQuery<'_>) -> Result<Option<Vec<u8>>, Self::Error> {
            self.sent.lock().unwrap().push(SentQuery {
                descriptor: query.descriptor,
                query: query.query,
                args: query.args,
                span_id: query.span.id(),
            });
            self.response.clone()
        }
    }

    struct FakeRemote {
        device: DeviceId,
        conn: Arc<FakeConnection>,
        lookups: AtomicUsize,
    }

    impl FakeRemote {
        fn connected(device: DeviceId, response: Result<Option<Vec<u8>>, ConnectionReset>) -> Self {
            Self {
                device,
                conn: Arc::new(FakeConnection {
                    response,
                    sent: Mutex::new(Vec::new()),
                }),
                lookups: AtomicUsize::new(0),
            }
        }

        fn sent(&self) -> Vec<SentQuery> {
            self.conn.sent.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl RemoteDatabase for FakeRemote {
        type Connection = FakeConnection;

        async fn get(&self, device_id: DeviceId) -> Option<Arc<Self::Connection>> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            (device_id == self.device).then(|| Arc::clone(&self.conn))
        }
    }

    fn options(device: u8, artwork: Option<Artwork>) -> ArtworkOptions {
        let mut track = Track::new(1, "Can You Feel It");
        track.artwork = artwork;
        ArtworkRequest::new(DeviceId(device), MediaSlot::Usb, TrackType::Rekordbox, track)
            .with_span(tracing::info_span!("test"))
    }

    #[tokio::test]
    async fn returns_none_without_connection() {
        let remote = FakeRemote::connected(DeviceId(2), Ok(Some(vec![1, 2, 3])));
        let opts = options(3, Some(Artwork::database_only(42)));

        let result = via_remote(&remote, &opts).await.unwrap();

        assert_eq!(result, None);
        assert_eq!(remote.lookups.load(Ordering::SeqCst), 1);
        assert!(remote.sent().is_empty());
    }

    #[tokio::test]
    async fn returns_none_without_artwork() {
        let remote = FakeRemote::connected(DeviceId(2), Ok(Some(vec![1, 2, 3])));
        let opts = options(2, None);

        let result = via_remote(&remote, &opts).await.unwrap();

        assert_eq!(result, None);
        assert!(remote.sent().is_empty());
    }

    #[tokio::test]
    async fn queries_artwork_through_main_menu() {
        let _guard = tracing::subscriber::set_default(tracing_subscriber::registry());
        let jpeg = vec![0xFF, 0xD8, 0xFF, 0xE0];
        let remote = FakeRemote::connected(DeviceId(2), Ok(Some(jpeg.clone())));
        let opts = options(2, Some(Artwork::database_only(42)));

        let result = via_remote(&remote, &opts).await.unwrap();

        assert_eq!(result, Some(jpeg));
        assert!(opts.span.id().is_some());
        assert_eq!(
            remote.sent(),
            vec![SentQuery {
                descriptor: QueryDescriptor {
                    track_slot: MediaSlot::Usb,
                    track_type: TrackType::Rekordbox,
                    menu_target: MenuTarget::Main,
                },
                query: Query::GetArtwork,
                args: ArtworkArgs { artwork_id: 42 },
                span_id: opts.span.id(),
            }]
        );
    }

    #[tokio::test]
    async fn queries_even_when_artwork_has_a_path() {
        let remote = FakeRemote::connected(DeviceId(2), Ok(None));
        let opts = options(2, Some(Artwork::with_path(9, "/PIONEER/ART/00009.jpg")));

        let result = via_remote(&remote, &opts).await.unwrap();

        assert_eq!(result, None);
        assert_eq!(remote.sent().len(), 1);
        assert_eq!(remote.sent()[0].args.artwork_id, 9);
    }

    #[tokio::test]
    async fn query_errors_propagate_unchanged() {
        let remote = FakeRemote::connected(DeviceId(2), Err(ConnectionReset(2)));
        let opts = options(2, Some(Artwork::database_only(42)));

        let err = via_remote(&remote, &opts).await.unwrap_err();

        assert_eq!(err, ConnectionReset(2));
        assert_eq!(
            err.to_string(),
            "remote database connection reset by device 2"
        );
        assert_eq!(remote.sent().len(), 1);
    }
}
