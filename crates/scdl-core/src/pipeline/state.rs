//! Per-action state machine and its observer.

use std::fmt;

use crate::error::FailureKind;

/// Where a single download action stands.
///
/// `Idle → Resolving → SelectingRendition → Fetching → Saved`; any state may
/// move to `Failed`. `Saved` and `Failed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadState {
    Idle,
    Resolving,
    SelectingRendition,
    Fetching,
    Saved,
    Failed(FailureKind),
}

impl DownloadState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, DownloadState::Saved | DownloadState::Failed(_))
    }

    /// Whether `next` is a legal successor of `self`.
    pub fn can_advance_to(&self, next: DownloadState) -> bool {
        use DownloadState::*;
        match (self, next) {
            (Saved, _) | (Failed(_), _) => false,
            (_, Failed(_)) => true,
            (Idle, Resolving)
            | (Resolving, SelectingRendition)
            | (SelectingRendition, Fetching)
            | (Fetching, Saved) => true,
            _ => false,
        }
    }
}

impl fmt::Display for DownloadState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DownloadState::Idle => f.write_str("idle"),
            DownloadState::Resolving => f.write_str("resolving"),
            DownloadState::SelectingRendition => f.write_str("selecting rendition"),
            DownloadState::Fetching => f.write_str("fetching"),
            DownloadState::Saved => f.write_str("saved"),
            DownloadState::Failed(kind) => write!(f, "failed ({})", kind),
        }
    }
}

/// Receives every state transition of a download action.
pub trait DownloadObserver: Send + Sync {
    fn on_state(&self, page_url: &str, state: DownloadState);
}

/// Observer that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl DownloadObserver for NoopObserver {
    fn on_state(&self, _page_url: &str, _state: DownloadState) {}
}

/// Tracks the current state and forwards legal transitions to the observer.
pub(crate) struct StateTracker<'a> {
    page_url: &'a str,
    current: DownloadState,
    observer: &'a dyn DownloadObserver,
}

impl<'a> StateTracker<'a> {
    pub(crate) fn new(page_url: &'a str, observer: &'a dyn DownloadObserver) -> Self {
        Self {
            page_url,
            current: DownloadState::Idle,
            observer,
        }
    }

    pub(crate) fn advance(&mut self, next: DownloadState) {
        debug_assert!(
            self.current.can_advance_to(next),
            "illegal transition {} -> {}",
            self.current,
            next
        );
        tracing::debug!("{}: {} -> {}", self.page_url, self.current, next);
        self.current = next;
        self.observer.on_state(self.page_url, next);
    }
}
