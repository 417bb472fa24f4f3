//! `scdl client-id` – scrape and print a client id.

use anyhow::Result;
use scdl_core::config::ScdlConfig;

use crate::cli::session;

pub async fn run_client_id(cfg: &ScdlConfig) -> Result<()> {
    let id = session::scrape_client_id(cfg).await?;
    println!("{}", id);
    Ok(())
}
