use tracing::Span;

use crate::{
    artwork::error::RequestError,
    domain::{
        device::{DeviceId, MediaSlot, TrackType},
        track::Track,
    },
};

/// Artwork lookup as assembled by a caller, possibly without a span yet.
#[derive(Debug, Clone)]
pub struct ArtworkRequest {
    /// The device to query the track artwork off of
    pub device_id: DeviceId,
    /// The media slot the track is present in
    pub track_slot: MediaSlot,
    pub track_type: TrackType,
    pub track: Track,
    pub span: Option<Span>,
}

/// Artwork lookup with every field present, accepted by the fetch operations.
#[derive(Debug, Clone)]
pub struct ArtworkOptions {
    pub device_id: DeviceId,
    pub track_slot: MediaSlot,
    pub track_type: TrackType,
    pub track: Track,
    pub span: Span,
}

impl ArtworkRequest {
    pub fn new(
        device_id: DeviceId,
        track_slot: MediaSlot,
        track_type: TrackType,
        track: Track,
    ) -> Self {
        Self {
            device_id,
            track_slot,
            track_type,
            track,
            span: None,
        }
    }

    pub fn with_span(self, span: Span) -> ArtworkOptions {
        ArtworkOptions {
            device_id: self.device_id,
            track_slot: self.track_slot,
            track_type: self.track_type,
            track: self.track,
            span,
        }
    }

    /// Keeps the caller's span, or opens a new root span for the lookup.
    pub fn traced(mut self) -> ArtworkOptions {
        let span = match self.span.take() {
            Some(span) => span,
            None => tracing::info_span!(
                "get_artwork",
                device = self.device_id.0,
                slot = %self.track_slot,
                track = self.track.id
            ),
        };
        self.with_span(span)
    }
}

impl TryFrom<ArtworkRequest> for ArtworkOptions {
    type Error = RequestError;

    fn try_from(mut request: ArtworkRequest) -> Result<Self, Self::Error> {
        let span = request.span.take().ok_or(RequestError::MissingSpan)?;
        Ok(request.with_span(span))
    }
}
