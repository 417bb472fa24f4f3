//! Page adapter: the fragile, site-shaped half of client-id acquisition.
//!
//! The pipeline only depends on [`PageAdapter`]; [`WebPage`] is the live
//! implementation that fetches the site's HTML and bundled scripts.

mod client_id;
mod scripts;

use std::collections::HashMap;

use crate::error::DownloadError;
use crate::http::{self, HttpOptions};

pub use client_id::{acquire_client_id, extract_client_id};
pub use scripts::script_urls_from_html;

/// Page whose bundled scripts carry the client id.
pub const DEFAULT_WEB_BASE: &str = "https://soundcloud.com/";

/// Source of the scripts a page loads.
pub trait PageAdapter {
    /// External script URLs in document order, absolute.
    fn script_urls(&self) -> Result<Vec<String>, DownloadError>;

    fn script_source(&self, url: &str) -> Result<String, DownloadError>;
}

/// The live site, fetched over HTTP.
#[derive(Debug, Clone)]
pub struct WebPage {
    page_url: String,
    http: HttpOptions,
}

impl WebPage {
    pub fn new(page_url: impl Into<String>, http: HttpOptions) -> Self {
        Self {
            page_url: page_url.into(),
            http,
        }
    }

    fn fetch_text(&self, url: &str) -> Result<String, DownloadError> {
        let resp = http::get(url, &HashMap::new(), &self.http)
            .map_err(|e| DownloadError::fetch(url, None, e.to_string()))?;
        if !resp.is_success() {
            return Err(DownloadError::fetch(url, Some(resp.status), "non-success status"));
        }
        Ok(resp.text())
    }
}

impl PageAdapter for WebPage {
    fn script_urls(&self) -> Result<Vec<String>, DownloadError> {
        let html = self.fetch_text(&self.page_url)?;
        let urls = script_urls_from_html(&html, &self.page_url);
        tracing::debug!("page {} references {} script(s)", self.page_url, urls.len());
        Ok(urls)
    }

    fn script_source(&self, url: &str) -> Result<String, DownloadError> {
        self.fetch_text(url)
    }
}
