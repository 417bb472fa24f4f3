//! Filename derivation for saved tracks.
//!
//! The stem is `"<uploader> - <title>"` unless the title already carries the
//! `" - "` separator, in which case the uploader likely put the artist there
//! and the title is used as-is. Titles that contain the separator for other
//! reasons get misattributed; that is accepted.

mod disposition;
mod extension;
mod sanitize;

pub use disposition::disposition_filename;
pub use extension::{extension_for, extension_from_mime, extension_from_url_path, MediaHints};
pub use sanitize::{sanitize_stem, NAME_MAX};

/// Marks an "artist - track" title.
pub const SEPARATOR: &str = " - ";

/// Extension used when no URL, header or MIME type tells us anything.
pub const DEFAULT_EXTENSION: &str = "mp3";

/// Human-readable stem, before sanitizing.
pub fn display_stem(title: &str, uploader: &str) -> String {
    if title.contains(SEPARATOR) {
        title.to_string()
    } else {
        format!("{}{}{}", uploader, SEPARATOR, title)
    }
}

/// Derives the filename saved for a track.
///
/// The extension comes from `hints` (see [`extension_for`]). `track_id` names
/// the file when the stem has no alphanumeric character left after sanitizing.
pub fn derive_filename(
    title: &str,
    uploader: &str,
    track_id: u64,
    hints: &MediaHints<'_>,
) -> String {
    let ext = extension_for(hints);
    let stem = sanitize_stem(&display_stem(title, uploader), ext.len() + 1);
    let stem = if !stem.chars().any(char::is_alphanumeric) {
        format!("track-{}", track_id)
    } else {
        stem
    };
    format!("{}.{}", stem, ext)
}
