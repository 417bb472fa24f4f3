use super::{parse_json, ApiClient};
use crate::credential::Credential;
use crate::error::DownloadError;
use crate::model::Track;

impl ApiClient {
    /// Resolves a user-facing page URL to its track record.
    pub fn resolve(&self, page_url: &str, credential: &Credential) -> Result<Track, DownloadError> {
        let endpoint = format!("{}/resolve", self.api_base);
        let resp = self
            .authed_get(&endpoint, credential, &[("url", page_url)])
            .map_err(|reason| DownloadError::resolution(page_url, None, reason))?;

        if !resp.is_success() {
            return Err(DownloadError::resolution(
                page_url,
                Some(resp.status),
                "non-success status",
            ));
        }

        let track: Track = parse_json(&resp).map_err(|e| {
            DownloadError::resolution(
                page_url,
                Some(resp.status),
                format!("unexpected record shape: {}", e),
            )
        })?;
        if !track.is_track() {
            return Err(DownloadError::resolution(
                page_url,
                Some(resp.status),
                format!(
                    "resolved to a {}, not a track",
                    track.kind.as_deref().unwrap_or("?")
                ),
            ));
        }

        tracing::debug!(
            "resolved {} to track {} ({} rendition(s))",
            page_url,
            track.id,
            track.renditions().len()
        );
        Ok(track)
    }
}
