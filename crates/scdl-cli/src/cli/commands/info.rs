//! `scdl info` – resolve a track and preview the download without fetching.

use anyhow::{Context, Result};
use scdl_core::config::ScdlConfig;
use scdl_core::filename;
use scdl_core::model::Track;
use scdl_core::select::{self, Selection};
use std::sync::Arc;

use crate::cli::session;
use crate::cli::SessionArgs;

pub async fn run_info(cfg: &ScdlConfig, args: &SessionArgs, url: &str) -> Result<()> {
    let high_quality = session::high_quality(cfg, args);
    // The sink is never written by `info`.
    let dl = Arc::new(session::downloader(cfg, args, std::env::temp_dir(), false).await?);
    let page_url = url.to_string();
    let track = tokio::task::spawn_blocking(move || dl.inspect(&page_url, high_quality))
        .await
        .context("resolve task join")??;
    print!("{}", describe(&track));
    Ok(())
}

fn describe(track: &Track) -> String {
    let mut out = String::new();
    out.push_str(&format!("id:          {}\n", track.id));
    out.push_str(&format!("title:       {}\n", track.title));
    out.push_str(&format!("uploader:    {}\n", track.uploader()));
    out.push_str(&format!(
        "download:    {}\n",
        if track.offers_native_download() {
            "native file offered"
        } else if track.downloadable {
            "native file offered, quota exhausted"
        } else {
            "not offered"
        }
    ));
    out.push_str("renditions:\n");
    if track.renditions().is_empty() {
        out.push_str("  (none)\n");
    }
    for r in track.renditions() {
        out.push_str(&format!(
            "  {:<14} {:<3} {:<28} {}{}\n",
            r.protocol.to_string(),
            r.quality.to_string(),
            r.mime_type.as_deref().unwrap_or("-"),
            r.preset.as_deref().unwrap_or("-"),
            if r.snipped { " (preview)" } else { "" }
        ));
    }
    match select::select_rendition(track) {
        Ok(selection) => {
            let mime = match selection {
                Selection::Native => None,
                Selection::Rendition(r) => r.mime_type.as_deref(),
            };
            // The final URL and media headers are unknown until fetch; the
            // extension comes from the rendition MIME type or the default.
            let hints = filename::MediaHints::new("", mime);
            let name = filename::derive_filename(&track.title, track.uploader(), track.id, &hints);
            out.push_str(&format!("selection:   {}\n", selection.describe()));
            out.push_str(&format!("filename:    {}\n", name));
        }
        Err(e) => out.push_str(&format!("selection:   none ({})\n", e)),
    }
    out
}
