//! File extension from what is known about the fetched media.

use super::disposition::disposition_filename;
use super::DEFAULT_EXTENSION;
use crate::http::ResponseHead;

/// Evidence about the saved bytes' container.
#[derive(Debug, Clone, Copy, Default)]
pub struct MediaHints<'a> {
    /// URL the bytes came from, after redirects when known.
    pub final_url: &'a str,
    /// `Content-Disposition` of the media response.
    pub content_disposition: Option<&'a str>,
    /// MIME type advertised by the chosen rendition (none for native files).
    pub rendition_mime: Option<&'a str>,
    /// `Content-Type` of the media response.
    pub content_type: Option<&'a str>,
}

impl<'a> MediaHints<'a> {
    pub fn new(final_url: &'a str, rendition_mime: Option<&'a str>) -> Self {
        Self {
            final_url,
            rendition_mime,
            ..Self::default()
        }
    }

    /// Adds the media response's headers.
    pub fn with_head(mut self, head: &'a ResponseHead) -> Self {
        self.content_disposition = head.content_disposition();
        self.content_type = head.content_type();
        self
    }
}

/// URL path suffix, then the `Content-Disposition` filename, then the
/// rendition MIME type, then the response `Content-Type`, then `mp3`.
pub fn extension_for(hints: &MediaHints<'_>) -> String {
    extension_from_url_path(hints.final_url)
        .or_else(|| {
            hints
                .content_disposition
                .and_then(disposition_filename)
                .and_then(|name| extension_of_name(&name))
        })
        .or_else(|| mime_extension(hints.rendition_mime))
        .or_else(|| mime_extension(hints.content_type))
        .unwrap_or_else(|| DEFAULT_EXTENSION.to_string())
}

fn mime_extension(mime: Option<&str>) -> Option<String> {
    mime.and_then(extension_from_mime).map(str::to_string)
}

/// Suffix of the last path segment when it looks like a real extension,
/// lowercased.
pub fn extension_from_url_path(url: &str) -> Option<String> {
    let parsed = url::Url::parse(url).ok()?;
    let segment = parsed.path().split('/').filter(|s| !s.is_empty()).last()?;
    extension_of_name(segment)
}

/// Extension of a bare file name: 1 to 5 ASCII alphanumerics after the last
/// dot, with a non-empty stem before it.
fn extension_of_name(name: &str) -> Option<String> {
    let (stem, ext) = name.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() || ext.len() > 5 {
        return None;
    }
    if !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

/// Container extension for an audio MIME type; parameters are ignored.
pub fn extension_from_mime(mime: &str) -> Option<&'static str> {
    let essence = mime.split(';').next()?.trim().to_ascii_lowercase();
    match essence.as_str() {
        "audio/mpeg" | "audio/mp3" => Some("mp3"),
        "audio/mp4" | "audio/x-m4a" | "audio/m4a" => Some("m4a"),
        "audio/ogg" => Some("ogg"),
        "audio/opus" => Some("opus"),
        "audio/wav" | "audio/x-wav" | "audio/wave" => Some("wav"),
        "audio/flac" | "audio/x-flac" => Some("flac"),
        "audio/aac" => Some("aac"),
        _ => None,
    }
}
