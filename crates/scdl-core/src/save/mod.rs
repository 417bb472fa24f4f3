//! Output collaborator: where fetched bytes end up.

mod directory;

use std::path::PathBuf;

use crate::error::DownloadError;

pub use directory::DirectorySink;

/// Stores one fetched buffer under a suggested filename.
///
/// Implementations must not retry; a failure is returned as-is.
pub trait SaveSink: Send + Sync {
    /// Returns where the bytes were stored.
    fn save(&self, filename: &str, bytes: &[u8]) -> Result<PathBuf, DownloadError>;
}
