pub mod config;
pub mod logging;

pub mod api;
pub mod checksum;
pub mod credential;
pub mod error;
pub mod filename;
pub mod http;
pub mod model;
pub mod page;
pub mod pipeline;
pub mod save;
pub mod select;

pub use error::{DownloadError, FailureKind};
