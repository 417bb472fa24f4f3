//! Console observer: one line per state change, prefixed by the page URL.

use scdl_core::pipeline::{DownloadObserver, DownloadState};

#[derive(Debug, Default)]
pub struct ConsoleProgress;

impl DownloadObserver for ConsoleProgress {
    fn on_state(&self, page_url: &str, state: DownloadState) {
        // Outcomes are reported by the command once the action returns.
        if !state.is_terminal() {
            eprintln!("{}: {}", page_url, state);
        }
    }
}
