use serde::Deserialize;

use super::Rendition;

/// Track record as returned by the resolve endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct Track {
    pub id: u64,
    #[serde(default)]
    pub kind: Option<String>,
    pub title: String,
    pub user: Uploader,
    #[serde(default)]
    pub downloadable: bool,
    #[serde(default)]
    pub has_downloads_left: bool,
    #[serde(default)]
    pub permalink_url: Option<String>,
    /// Forwarded on the finalization hop when the API hands one out.
    #[serde(default)]
    pub track_authorization: Option<String>,
    #[serde(default)]
    media: Media,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Uploader {
    pub username: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct Media {
    #[serde(default)]
    transcodings: Vec<Rendition>,
}

impl Track {
    pub fn renditions(&self) -> &[Rendition] {
        &self.media.transcodings
    }

    pub fn uploader(&self) -> &str {
        &self.user.username
    }

    /// Whether the uploader's own file can be fetched instead of a transcoding.
    pub fn offers_native_download(&self) -> bool {
        self.downloadable && self.has_downloads_left
    }

    /// `kind` is absent on some older records; only an explicit non-track kind rejects.
    pub fn is_track(&self) -> bool {
        self.kind.as_deref().map_or(true, |k| k == "track")
    }
}
