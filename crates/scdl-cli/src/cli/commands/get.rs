//! `scdl get` – download tracks, one concurrent action per URL.
//!
//! Actions share the client id and nothing else; one failing does not stop
//! the others. The command fails if any action failed.

use anyhow::{bail, Result};
use scdl_core::config::ScdlConfig;
use scdl_core::pipeline::{run_download, DownloadObserver, DownloadRequest};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::task::JoinSet;

use crate::cli::progress::ConsoleProgress;
use crate::cli::session;
use crate::cli::SessionArgs;

/// `get`-only flags.
#[derive(Debug, Clone, Default)]
pub struct GetOptions {
    pub output_dir: Option<PathBuf>,
    pub overwrite: bool,
    pub checksum: bool,
}

pub async fn run_get(
    cfg: &ScdlConfig,
    args: &SessionArgs,
    opts: &GetOptions,
    urls: Vec<String>,
) -> Result<()> {
    let dir = session::output_dir(cfg, opts.output_dir.clone())?;
    let overwrite = opts.overwrite || cfg.overwrite;
    let high_quality = session::high_quality(cfg, args);
    let downloader = Arc::new(session::downloader(cfg, args, dir, overwrite).await?);
    let observer: Arc<dyn DownloadObserver> = Arc::new(ConsoleProgress);

    let total = urls.len();
    let mut set = JoinSet::new();
    for url in urls {
        let mut request = DownloadRequest::new(url.clone(), high_quality);
        request.checksum = opts.checksum;
        let fut = run_download(Arc::clone(&downloader), request, Arc::clone(&observer));
        set.spawn(async move { (url, fut.await) });
    }

    let mut failed = 0usize;
    while let Some(joined) = set.join_next().await {
        let (url, result) = match joined {
            Ok(r) => r,
            Err(e) => {
                failed += 1;
                eprintln!("download task aborted: {}", e);
                continue;
            }
        };
        match result {
            Ok(saved) => {
                println!("{} -> {} ({})", url, saved.path.display(), saved.selection);
                if let Some(digest) = saved.sha256 {
                    println!("{}  {}", digest, saved.path.display());
                }
            }
            Err(e) => {
                failed += 1;
                eprintln!("{}: {:#}", url, e);
            }
        }
    }

    if failed > 0 {
        bail!("{} of {} download(s) failed", failed, total);
    }
    Ok(())
}
