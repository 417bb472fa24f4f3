//! CLI command handlers, one file per command.

mod checksum;
mod client_id;
mod completions;
mod get;
mod info;
mod man;

pub use checksum::run_checksum;
pub use client_id::run_client_id;
pub use completions::run_completions;
pub use get::{run_get, GetOptions};
pub use info::run_info;
pub use man::run_man;
