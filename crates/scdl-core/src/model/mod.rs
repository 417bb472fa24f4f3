//! API records for tracks and their renditions.

mod rendition;
mod track;

pub use rendition::{Protocol, Quality, Rendition};
pub use track::{Track, Uploader};
