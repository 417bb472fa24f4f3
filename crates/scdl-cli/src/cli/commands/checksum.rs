//! `scdl checksum` – SHA-256 of a saved file.

use anyhow::Result;
use scdl_core::checksum;
use std::path::Path;

/// Prints `<hex>  <path>`, the `sha256sum` layout.
pub async fn run_checksum(path: &Path) -> Result<()> {
    let digest = checksum::sha256_path(path)?;
    println!("{}  {}", digest, path.display());
    Ok(())
}
