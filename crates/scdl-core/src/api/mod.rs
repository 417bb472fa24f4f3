//! Client for the three API calls a download needs.
//!
//! - [`ApiClient::resolve`]: page URL to [`Track`](crate::model::Track)
//! - [`ApiClient::finalize`]: rendition URL to the media URL
//! - [`ApiClient::native_download_url`]: track id to the uploader's file URL
//!
//! Every call carries the client id as a query parameter and, when the
//! credential has a session, an `Authorization: OAuth ...` header.

mod native;
mod resolve;
mod stream;

use serde::de::DeserializeOwned;
use std::collections::HashMap;

use crate::credential::Credential;
use crate::http::{self, HttpOptions, HttpResponse};

pub const DEFAULT_API_BASE: &str = "https://api-v2.soundcloud.com";

#[derive(Debug, Clone)]
pub struct ApiClient {
    api_base: String,
    http: HttpOptions,
}

impl ApiClient {
    pub fn new(api_base: impl Into<String>, http: HttpOptions) -> Self {
        let api_base = api_base.into().trim_end_matches('/').to_string();
        Self { api_base, http }
    }

    pub fn http_options(&self) -> &HttpOptions {
        &self.http
    }

    /// GET `url` with the credential applied. Query pairs in `extra` are appended.
    ///
    /// Errors are transport-level only (bad URL, connect, timeout) and come back
    /// as a reason string; status checks belong to the caller.
    fn authed_get(
        &self,
        url: &str,
        credential: &Credential,
        extra: &[(&str, &str)],
    ) -> Result<HttpResponse, String> {
        let full = with_query(url, credential, extra).map_err(|e| format!("invalid URL: {}", e))?;
        let mut headers = HashMap::new();
        headers.insert("Accept".to_string(), "application/json".to_string());
        if let Some(auth) = credential.authorization() {
            headers.insert("Authorization".to_string(), auth);
        }
        tracing::debug!("GET {}", http::redact(&full));
        http::get(&full, &headers, &self.http).map_err(|e| e.to_string())
    }
}

/// Appends `client_id` and `extra` to the URL's existing query.
fn with_query(
    url: &str,
    credential: &Credential,
    extra: &[(&str, &str)],
) -> Result<String, url::ParseError> {
    let mut u = url::Url::parse(url)?;
    {
        let mut q = u.query_pairs_mut();
        for (k, v) in extra {
            q.append_pair(k, v);
        }
        q.append_pair("client_id", credential.client_id.as_str());
    }
    Ok(u.to_string())
}

fn parse_json<T: DeserializeOwned>(resp: &HttpResponse) -> Result<T, serde_json::Error> {
    serde_json::from_slice(&resp.body)
}
