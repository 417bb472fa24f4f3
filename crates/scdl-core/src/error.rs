//! Failure taxonomy for a download action.
//!
//! Every variant aborts the action that produced it. Nothing here is retried;
//! the caller decides how to present the failure.

use std::fmt;
use std::path::PathBuf;

/// Error raised by client-id acquisition or by one download action.
#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    /// No page script carried a client id.
    #[error("no client id found in {scripts_checked} page script(s)")]
    CredentialNotFound { scripts_checked: usize },

    /// The page URL could not be resolved to a track record.
    #[error("resolve {url} failed{}: {reason}", status_suffix(.status))]
    ResolutionFailed {
        url: String,
        status: Option<u32>,
        reason: String,
    },

    /// The track has no rendition this client can fetch as a single file.
    #[error("track {track_id} has no direct-file rendition")]
    NoEligibleRendition { track_id: u64 },

    /// Either the finalization hop or the media GET failed.
    #[error("fetch {url} failed{}: {reason}", status_suffix(.status))]
    FetchFailed {
        url: String,
        status: Option<u32>,
        reason: String,
    },

    /// The output collaborator could not store the bytes.
    #[error("save to {} failed: {source}", .path.display())]
    SaveFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Payload-free tag of a [`DownloadError`], carried by the `Failed` state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    CredentialNotFound,
    ResolutionFailed,
    NoEligibleRendition,
    FetchFailed,
    SaveFailed,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FailureKind::CredentialNotFound => "credential not found",
            FailureKind::ResolutionFailed => "resolution failed",
            FailureKind::NoEligibleRendition => "no eligible rendition",
            FailureKind::FetchFailed => "fetch failed",
            FailureKind::SaveFailed => "save failed",
        };
        f.write_str(s)
    }
}

impl DownloadError {
    pub fn kind(&self) -> FailureKind {
        match self {
            DownloadError::CredentialNotFound { .. } => FailureKind::CredentialNotFound,
            DownloadError::ResolutionFailed { .. } => FailureKind::ResolutionFailed,
            DownloadError::NoEligibleRendition { .. } => FailureKind::NoEligibleRendition,
            DownloadError::FetchFailed { .. } => FailureKind::FetchFailed,
            DownloadError::SaveFailed { .. } => FailureKind::SaveFailed,
        }
    }

    /// HTTP status attached to the failure, if the server answered at all.
    pub fn status(&self) -> Option<u32> {
        match self {
            DownloadError::ResolutionFailed { status, .. }
            | DownloadError::FetchFailed { status, .. } => *status,
            _ => None,
        }
    }

    pub(crate) fn resolution(url: &str, status: Option<u32>, reason: impl Into<String>) -> Self {
        DownloadError::ResolutionFailed {
            url: url.to_string(),
            status,
            reason: reason.into(),
        }
    }

    pub(crate) fn fetch(url: &str, status: Option<u32>, reason: impl Into<String>) -> Self {
        DownloadError::FetchFailed {
            url: url.to_string(),
            status,
            reason: reason.into(),
        }
    }
}

fn status_suffix(status: &Option<u32>) -> String {
    match status {
        Some(code) => format!(" (HTTP {})", code),
        None => String::new(),
    }
}
