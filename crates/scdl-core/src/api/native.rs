use serde::Deserialize;

use super::{parse_json, ApiClient};
use crate::credential::Credential;
use crate::error::DownloadError;

#[derive(Deserialize)]
struct DownloadLocation {
    #[serde(rename = "redirectUri")]
    redirect_uri: String,
}

impl ApiClient {
    /// URL of the uploader's original file, for tracks that offer a download.
    pub fn native_download_url(
        &self,
        track_id: u64,
        credential: &Credential,
    ) -> Result<String, DownloadError> {
        let endpoint = format!("{}/tracks/{}/download", self.api_base, track_id);
        let resp = self
            .authed_get(&endpoint, credential, &[])
            .map_err(|reason| DownloadError::fetch(&endpoint, None, reason))?;

        if !resp.is_success() {
            return Err(DownloadError::fetch(&endpoint, Some(resp.status), "non-success status"));
        }
        let loc: DownloadLocation = parse_json(&resp).map_err(|e| {
            DownloadError::fetch(
                &endpoint,
                Some(resp.status),
                format!("unexpected download document: {}", e),
            )
        })?;
        Ok(loc.redirect_uri)
    }
}
