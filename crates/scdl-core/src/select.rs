//! Rendition selection policy.
//!
//! Native download wins whenever the uploader allows it and quota remains.
//! Otherwise only progressive (single-file) renditions qualify, high quality
//! first. Segmented streams are never chosen: there is no playlist reassembly.

use std::fmt;

use crate::error::DownloadError;
use crate::model::{Quality, Rendition, Track};

/// What a download action will fetch.
#[derive(Debug, Clone, Copy)]
pub enum Selection<'a> {
    /// The uploader's own file via the download endpoint.
    Native,
    Rendition(&'a Rendition),
}

impl Selection<'_> {
    pub fn describe(&self) -> SelectionKind {
        match self {
            Selection::Native => SelectionKind::Native,
            Selection::Rendition(r) => SelectionKind::Rendition(r.quality),
        }
    }
}

/// Owned summary of a [`Selection`], kept after the track is dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionKind {
    Native,
    Rendition(Quality),
}

impl fmt::Display for SelectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectionKind::Native => f.write_str("native download"),
            SelectionKind::Rendition(q) => write!(f, "progressive {}", q),
        }
    }
}

pub fn select_rendition(track: &Track) -> Result<Selection<'_>, DownloadError> {
    if track.offers_native_download() {
        return Ok(Selection::Native);
    }

    let direct = || track.renditions().iter().filter(|r| r.is_direct_file());
    direct()
        .find(|r| r.quality == Quality::Hq)
        .or_else(|| direct().next())
        .map(Selection::Rendition)
        .ok_or(DownloadError::NoEligibleRendition { track_id: track.id })
}
