//! One download action: resolve, select, finalize, fetch, save.
//!
//! A [`Downloader`] is built once per session (it owns the scraped client id)
//! and can run any number of independent actions. Actions share no mutable
//! state; each reads the high-quality preference and the session cookie at
//! its own start.

mod state;

use anyhow::Context;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use crate::api::ApiClient;
use crate::checksum;
use crate::credential::{ClientId, CookieJar, Credential};
use crate::error::DownloadError;
use crate::filename::{self, MediaHints};
use crate::http;
use crate::model::Track;
use crate::save::SaveSink;
use crate::select::{self, Selection, SelectionKind};

pub use state::{DownloadObserver, DownloadState, NoopObserver};
use state::StateTracker;

/// Input of one download action.
#[derive(Debug, Clone)]
pub struct DownloadRequest {
    pub page_url: String,
    /// Snapshot of the preference; changing the config later does not affect
    /// an action already built.
    pub high_quality: bool,
    /// Also compute a SHA-256 of the saved bytes.
    pub checksum: bool,
}

impl DownloadRequest {
    pub fn new(page_url: impl Into<String>, high_quality: bool) -> Self {
        Self {
            page_url: page_url.into(),
            high_quality,
            checksum: false,
        }
    }
}

/// Outcome of a successful action.
#[derive(Debug, Clone)]
pub struct SavedTrack {
    pub track_id: u64,
    pub title: String,
    pub uploader: String,
    pub selection: SelectionKind,
    pub filename: String,
    pub path: PathBuf,
    pub bytes: usize,
    pub sha256: Option<String>,
}

pub struct Downloader {
    api: ApiClient,
    client_id: ClientId,
    sink: Box<dyn SaveSink>,
    cookie_jar: Option<CookieJar>,
}

impl Downloader {
    pub fn new(api: ApiClient, client_id: ClientId, sink: impl SaveSink + 'static) -> Self {
        Self {
            api,
            client_id,
            sink: Box::new(sink),
            cookie_jar: None,
        }
    }

    pub fn with_cookie_jar(mut self, jar: CookieJar) -> Self {
        self.cookie_jar = Some(jar);
        self
    }

    /// Credential for one action. The cookie jar is only read when high
    /// quality is requested, and re-read every time.
    pub fn credential_for(&self, high_quality: bool) -> Credential {
        if !high_quality {
            return Credential::anonymous(self.client_id.clone());
        }
        let token = match &self.cookie_jar {
            Some(jar) => jar.session_token(),
            None => {
                tracing::warn!("high quality requested but no cookie file configured");
                None
            }
        };
        match token {
            Some(t) => Credential::with_session(self.client_id.clone(), t),
            None => Credential::anonymous(self.client_id.clone()),
        }
    }

    /// Resolve only; used to preview what an action would fetch.
    pub fn inspect(&self, page_url: &str, high_quality: bool) -> Result<Track, DownloadError> {
        self.api.resolve(page_url, &self.credential_for(high_quality))
    }

    /// Runs one action to completion or failure. Nothing is retried.
    pub fn download(
        &self,
        request: &DownloadRequest,
        observer: &dyn DownloadObserver,
    ) -> Result<SavedTrack, DownloadError> {
        let mut tracker = StateTracker::new(&request.page_url, observer);
        let result = self.run(request, &mut tracker);
        match &result {
            Ok(saved) => {
                tracker.advance(DownloadState::Saved);
                tracing::info!(
                    "{} saved as {} ({})",
                    request.page_url,
                    saved.path.display(),
                    saved.selection
                );
            }
            Err(e) => {
                tracker.advance(DownloadState::Failed(e.kind()));
                tracing::warn!("{} failed: {}", request.page_url, e);
            }
        }
        result
    }

    fn run(
        &self,
        request: &DownloadRequest,
        tracker: &mut StateTracker<'_>,
    ) -> Result<SavedTrack, DownloadError> {
        let credential = self.credential_for(request.high_quality);

        tracker.advance(DownloadState::Resolving);
        let track = self.api.resolve(&request.page_url, &credential)?;

        tracker.advance(DownloadState::SelectingRendition);
        let selection = select::select_rendition(&track)?;
        tracing::debug!("track {}: selected {}", track.id, selection.describe());

        tracker.advance(DownloadState::Fetching);
        let (final_url, mime_type) = match selection {
            Selection::Native => (self.api.native_download_url(track.id, &credential)?, None),
            Selection::Rendition(r) => (
                self.api.finalize(&track, r, &credential)?,
                r.mime_type.as_deref(),
            ),
        };
        let media = fetch_media(&final_url, self.api.http_options())?;

        let served_from = media.effective_url.as_deref().unwrap_or(final_url.as_str());
        let hints = MediaHints::new(served_from, mime_type).with_head(&media.head);
        let name = filename::derive_filename(&track.title, track.uploader(), track.id, &hints);
        let bytes = media.body;
        let path = self.sink.save(&name, &bytes)?;

        Ok(SavedTrack {
            track_id: track.id,
            title: track.title.clone(),
            uploader: track.uploader().to_string(),
            selection: selection.describe(),
            filename: name,
            path,
            bytes: bytes.len(),
            sha256: request.checksum.then(|| checksum::sha256_bytes(&bytes)),
        })
    }
}

/// The single GET of the byte-serving URL. No credential is attached.
///
/// The whole response is kept: its headers and post-redirect URL name the
/// file when the URL alone does not.
fn fetch_media(url: &str, opts: &http::HttpOptions) -> Result<http::HttpResponse, DownloadError> {
    let shown = http::redact(url);
    let resp = http::get(url, &HashMap::new(), opts)
        .map_err(|e| DownloadError::fetch(&shown, None, e.to_string()))?;
    if !resp.is_success() {
        return Err(DownloadError::fetch(&shown, Some(resp.status), "non-success status"));
    }
    tracing::debug!(
        "fetched {} bytes from {}",
        resp.body.len(),
        resp.effective_url.as_deref().map(http::redact).unwrap_or(shown)
    );
    Ok(resp)
}

/// Runs one action on the blocking pool; curl transfers block.
pub async fn run_download(
    downloader: Arc<Downloader>,
    request: DownloadRequest,
    observer: Arc<dyn DownloadObserver>,
) -> anyhow::Result<SavedTrack> {
    let saved = tokio::task::spawn_blocking(move || {
        downloader.download(&request, observer.as_ref())
    })
    .await
    .context("download task join")??;
    Ok(saved)
}
