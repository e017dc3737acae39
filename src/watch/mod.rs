//! File-watch-and-regenerate loop.
//!
//! Watches the ZMK keymap and the keymap-drawer style file and re-runs the
//! drawing pipeline whenever one of them changes.

pub mod filter;
pub mod report;
pub mod watcher;

pub use filter::ChangeFilter;
pub use report::StatusReporter;
pub use watcher::{KeymapWatcher, WatchBackend, WatchSummary};
