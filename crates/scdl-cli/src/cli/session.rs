//! Per-invocation setup: client id, API client, sink and cookie jar.

use anyhow::{Context, Result};
use scdl_core::api::ApiClient;
use scdl_core::config::ScdlConfig;
use scdl_core::credential::{ClientId, CookieJar};
use scdl_core::page::{acquire_client_id, WebPage};
use scdl_core::pipeline::Downloader;
use scdl_core::save::DirectorySink;
use std::path::PathBuf;

use super::SessionArgs;

/// `--hq` / `--no-hq` win over the config value.
pub fn high_quality(cfg: &ScdlConfig, args: &SessionArgs) -> bool {
    if args.hq {
        true
    } else if args.no_hq {
        false
    } else {
        cfg.high_quality
    }
}

/// Flag, then config, then a fresh scrape of the site's scripts.
pub async fn client_id(cfg: &ScdlConfig, args: &SessionArgs) -> Result<ClientId> {
    if let Some(id) = args.client_id.as_deref().or(cfg.client_id.as_deref()) {
        tracing::debug!("using configured client id");
        return Ok(ClientId::new(id));
    }
    scrape_client_id(cfg).await
}

pub async fn scrape_client_id(cfg: &ScdlConfig) -> Result<ClientId> {
    let page = WebPage::new(cfg.endpoints().web_base, cfg.http_options());
    let id = tokio::task::spawn_blocking(move || acquire_client_id(&page))
        .await
        .context("client id task join")??;
    Ok(id)
}

pub fn cookie_jar(cfg: &ScdlConfig, args: &SessionArgs) -> Option<CookieJar> {
    args.cookies
        .clone()
        .or_else(|| cfg.cookie_file.clone())
        .map(CookieJar::new)
}

pub async fn downloader(
    cfg: &ScdlConfig,
    args: &SessionArgs,
    output_dir: PathBuf,
    overwrite: bool,
) -> Result<Downloader> {
    let client_id = client_id(cfg, args).await?;
    let api = ApiClient::new(cfg.endpoints().api_base, cfg.http_options());
    let sink = DirectorySink::new(output_dir, overwrite);
    let dl = Downloader::new(api, client_id, sink);
    Ok(match cookie_jar(cfg, args) {
        Some(jar) => dl.with_cookie_jar(jar),
        None => dl,
    })
}

/// `--output-dir`, then config `download_dir`, then the current directory.
pub fn output_dir(cfg: &ScdlConfig, flag: Option<PathBuf>) -> Result<PathBuf> {
    match flag.or_else(|| cfg.download_dir.clone()) {
        Some(dir) => Ok(dir),
        None => Ok(std::env::current_dir()?),
    }
}
