use serde::{Deserialize, Deserializer};
use std::fmt;

/// One encoded variant of a track ("transcoding" in API terms).
#[derive(Debug, Clone, Deserialize)]
#[serde(from = "RawRendition")]
pub struct Rendition {
    /// Indirect URL; GET it (with the client id) to learn the media URL.
    pub url: String,
    pub protocol: Protocol,
    pub quality: Quality,
    pub mime_type: Option<String>,
    pub preset: Option<String>,
    /// Preview clip rather than the full track.
    pub snipped: bool,
}

impl Rendition {
    /// Servable as one complete file.
    pub fn is_direct_file(&self) -> bool {
        self.protocol == Protocol::Progressive
    }
}

/// Transport packaging of a rendition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Protocol {
    /// Single file over plain HTTP.
    Progressive,
    Hls,
    EncryptedHls,
    Other(String),
}

impl From<&str> for Protocol {
    fn from(s: &str) -> Self {
        match s {
            "progressive" => Protocol::Progressive,
            "hls" => Protocol::Hls,
            "encrypted-hls" | "ctr-encrypted-hls" | "cbc-encrypted-hls" => Protocol::EncryptedHls,
            other => Protocol::Other(other.to_string()),
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Protocol::Progressive => f.write_str("progressive"),
            Protocol::Hls => f.write_str("hls"),
            Protocol::EncryptedHls => f.write_str("encrypted-hls"),
            Protocol::Other(s) => f.write_str(s),
        }
    }
}

/// Quality tier; `Hq` only shows up for signed-in sessions with a subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Quality {
    Sq,
    Hq,
}

impl<'de> Deserialize<'de> for Quality {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let s = Option::<String>::deserialize(d)?;
        Ok(match s.as_deref() {
            Some("hq") => Quality::Hq,
            _ => Quality::Sq,
        })
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Quality::Sq => f.write_str("sq"),
            Quality::Hq => f.write_str("hq"),
        }
    }
}

#[derive(Deserialize)]
struct RawRendition {
    url: String,
    #[serde(default)]
    preset: Option<String>,
    #[serde(default)]
    snipped: bool,
    #[serde(default)]
    format: RawFormat,
    #[serde(default = "default_quality")]
    quality: Quality,
}

#[derive(Default, Deserialize)]
struct RawFormat {
    #[serde(default)]
    protocol: String,
    #[serde(default)]
    mime_type: Option<String>,
}

fn default_quality() -> Quality {
    Quality::Sq
}

impl From<RawRendition> for Rendition {
    fn from(raw: RawRendition) -> Self {
        Rendition {
            url: raw.url,
            protocol: Protocol::from(raw.format.protocol.as_str()),
            quality: raw.quality,
            mime_type: raw.format.mime_type,
            preset: raw.preset,
            snipped: raw.snipped,
        }
    }
}
