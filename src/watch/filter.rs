//! Event filtering and debouncing for the keymap watcher.

use notify::{Event, EventKind};
use std::path::{Component, Path, PathBuf};
use std::time::{Duration, Instant};

/// Decides which file-system events trigger a regeneration.
///
/// Only modify/create events on one of the watched files pass, and at most
/// one event per debounce window is accepted.
#[derive(Debug, Clone)]
pub struct ChangeFilter {
    watched: Vec<PathBuf>,
    debounce: Duration,
    last_accepted: Option<Instant>,
}

impl ChangeFilter {
    /// Creates a filter for `files` with the given debounce window.
    #[must_use]
    pub fn new(files: &[PathBuf], debounce: Duration) -> Self {
        Self {
            watched: files.iter().map(|p| normalize(p)).collect(),
            debounce,
            last_accepted: None,
        }
    }

    /// Watched files, normalized.
    #[must_use]
    pub fn watched(&self) -> &[PathBuf] {
        &self.watched
    }

    /// Returns true if `path` refers to a watched file.
    #[must_use]
    pub fn is_watched(&self, path: &Path) -> bool {
        let candidate = normalize(path);
        self.watched.iter().any(|w| *w == candidate)
    }

    /// Returns true if the event should trigger a regeneration at `now`.
    pub fn accept(&mut self, event: &Event, now: Instant) -> bool {
        if !matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_)) {
            return false;
        }

        if !event.paths.iter().any(|p| self.is_watched(p)) {
            tracing::trace!(paths = ?event.paths, "ignoring event for unwatched path");
            return false;
        }

        if let Some(last) = self.last_accepted {
            if now.saturating_duration_since(last) < self.debounce {
                tracing::debug!(paths = ?event.paths, "debounced change event");
                return false;
            }
        }

        self.last_accepted = Some(now);
        true
    }
}

/// Canonical path when the file exists, lexically cleaned absolute path otherwise.
fn normalize(path: &Path) -> PathBuf {
    if let Ok(canonical) = path.canonicalize() {
        return canonical;
    }

    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map(|cwd| cwd.join(path))
            .unwrap_or_else(|_| path.to_path_buf())
    };

    let mut cleaned = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                cleaned.pop();
            }
            other => cleaned.push(other),
        }
    }
    cleaned
}
