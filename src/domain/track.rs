/// Represent a track stored on device media
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    pub id: u32,
    pub title: String,
    pub artist: Option<String>,
    pub artwork: Option<Artwork>,
}

impl Track {
    pub fn new(id: u32, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            artist: None,
            artwork: None,
        }
    }

    pub fn with_artwork(mut self, artwork: Artwork) -> Self {
        self.artwork = Some(artwork);
        self
    }
}

/// Reference to a track's cover art.
///
/// Artwork only known to the device database has no `path`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artwork {
    pub id: u32,
    pub path: Option<String>,
}

impl Artwork {
    pub fn database_only(id: u32) -> Self {
        Self { id, path: None }
    }

    pub fn with_path(id: u32, path: impl Into<String>) -> Self {
        Self {
            id,
            path: Some(path.into()),
        }
    }
}
