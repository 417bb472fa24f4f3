//! Save into a local directory via a temp file and an atomic rename.
//!
//! Without `overwrite` the final name is claimed with `create_new` before the
//! rename, so concurrent saves of the same title never replace each other.

use std::fs::{File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use super::SaveSink;
use crate::error::DownloadError;
use crate::filename::NAME_MAX;

/// Highest ` (n)` suffix tried before giving up on a free name.
const MAX_SUFFIX: u32 = 999;

static TEMP_SEQ: AtomicU64 = AtomicU64::new(0);

#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
    overwrite: bool,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>, overwrite: bool) -> Self {
        Self {
            dir: dir.into(),
            overwrite,
        }
    }

    /// Target path for `filename`: as-is with `overwrite`, otherwise the first
    /// free one of `name.ext`, `name (1).ext`, `name (2).ext`, ..., reserved by
    /// creating an empty placeholder.
    fn claim(&self, filename: &str) -> Result<PathBuf, DownloadError> {
        if self.overwrite {
            return Ok(self.dir.join(filename));
        }
        for candidate in candidates(filename) {
            let path = self.dir.join(candidate);
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(_) => return Ok(path),
                Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                Err(source) => return Err(DownloadError::SaveFailed { path, source }),
            }
        }
        Err(exhausted(self.dir.join(filename)))
    }
}

impl SaveSink for DirectorySink {
    fn save(&self, filename: &str, bytes: &[u8]) -> Result<PathBuf, DownloadError> {
        let temp_path = self.dir.join(format!(
            ".scdl-{}-{}.part",
            std::process::id(),
            TEMP_SEQ.fetch_add(1, Ordering::Relaxed)
        ));
        write_synced(&temp_path, bytes).map_err(|source| {
            let _ = std::fs::remove_file(&temp_path);
            DownloadError::SaveFailed {
                path: temp_path.clone(),
                source,
            }
        })?;

        let final_path = match self.claim(filename) {
            Ok(p) => p,
            Err(e) => {
                let _ = std::fs::remove_file(&temp_path);
                return Err(e);
            }
        };
        std::fs::rename(&temp_path, &final_path).map_err(|source| {
            let _ = std::fs::remove_file(&temp_path);
            if !self.overwrite {
                let _ = std::fs::remove_file(&final_path);
            }
            DownloadError::SaveFailed {
                path: final_path.clone(),
                source,
            }
        })?;

        tracing::info!("saved {} bytes to {}", bytes.len(), final_path.display());
        Ok(final_path)
    }
}

/// `filename`, then `stem (1).ext` up to `stem (MAX_SUFFIX).ext`. The stem
/// is shortened as needed so each candidate stays within NAME_MAX.
fn candidates(filename: &str) -> impl Iterator<Item = String> + '_ {
    let (stem, ext) = match filename.rsplit_once('.') {
        Some((s, e)) if !s.is_empty() => (s, Some(e)),
        _ => (filename, None),
    };
    std::iter::once(filename.to_string()).chain((1..=MAX_SUFFIX).map(move |n| {
        let tail = match ext {
            Some(e) => format!(" ({}).{}", n, e),
            None => format!(" ({})", n),
        };
        format!("{}{}", truncate_stem(stem, NAME_MAX.saturating_sub(tail.len())), tail)
    }))
}

/// Longest prefix of `stem` within `max` bytes, cut on a char boundary.
fn truncate_stem(stem: &str, max: usize) -> &str {
    if stem.len() <= max {
        return stem;
    }
    let mut end = max;
    while !stem.is_char_boundary(end) {
        end -= 1;
    }
    stem[..end].trim_end()
}

fn exhausted(path: PathBuf) -> DownloadError {
    DownloadError::SaveFailed {
        path,
        source: std::io::Error::new(ErrorKind::AlreadyExists, "no free filename suffix left"),
    }
}

fn write_synced(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut f = File::create(path)?;
    f.write_all(bytes)?;
    f.sync_all()
}
