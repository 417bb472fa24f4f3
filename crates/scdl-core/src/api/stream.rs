use serde::Deserialize;

use super::{parse_json, ApiClient};
use crate::credential::Credential;
use crate::error::DownloadError;
use crate::model::{Rendition, Track};

#[derive(Deserialize)]
struct StreamLocation {
    url: String,
}

impl ApiClient {
    /// Turns a rendition's indirect URL into the URL that serves the bytes.
    pub fn finalize(
        &self,
        track: &Track,
        rendition: &Rendition,
        credential: &Credential,
    ) -> Result<String, DownloadError> {
        let mut extra: Vec<(&str, &str)> = Vec::new();
        if let Some(auth) = track.track_authorization.as_deref() {
            extra.push(("track_authorization", auth));
        }
        let url = rendition.url.as_str();
        let resp = self
            .authed_get(url, credential, &extra)
            .map_err(|reason| DownloadError::fetch(url, None, reason))?;

        if !resp.is_success() {
            return Err(DownloadError::fetch(url, Some(resp.status), "non-success status"));
        }
        let loc: StreamLocation = parse_json(&resp).map_err(|e| {
            DownloadError::fetch(
                url,
                Some(resp.status),
                format!("unexpected stream document: {}", e),
            )
        })?;
        Ok(loc.url)
    }
}
