//! Client-id extraction from script bundles.

use regex::Regex;
use std::sync::OnceLock;

use super::PageAdapter;
use crate::credential::ClientId;
use crate::error::DownloadError;

/// `client_id:"<32 alnum>"`, also `clientId`, `=` instead of `:`, quoted keys.
fn client_id_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"["']?(?:client_id|clientId)["']?\s*[:=]\s*["']([a-zA-Z0-9]{32})["']"#)
            .expect("static client id regex")
    })
}

/// First client id embedded in `source`, if any.
pub fn extract_client_id(source: &str) -> Option<ClientId> {
    client_id_regex()
        .captures(source)
        .and_then(|c| c.get(1))
        .map(|m| ClientId::new(m.as_str()))
}

/// Walks the page's scripts in order and returns the first client id found.
///
/// A script that fails to download is skipped; failing to list the scripts at
/// all counts as zero scripts checked.
pub fn acquire_client_id(page: &dyn PageAdapter) -> Result<ClientId, DownloadError> {
    let urls = match page.script_urls() {
        Ok(u) => u,
        Err(e) => {
            tracing::warn!("cannot list page scripts: {}", e);
            Vec::new()
        }
    };

    let mut checked = 0usize;
    for url in &urls {
        checked += 1;
        let source = match page.script_source(url) {
            Ok(s) => s,
            Err(e) => {
                tracing::debug!("skipping script {}: {}", url, e);
                continue;
            }
        };
        if let Some(id) = extract_client_id(&source) {
            tracing::info!("client id found in script {} of {}", checked, urls.len());
            return Ok(id);
        }
    }

    Err(DownloadError::CredentialNotFound {
        scripts_checked: checked,
    })
}
