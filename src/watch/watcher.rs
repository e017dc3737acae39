//! File-watch-and-regenerate loop.
//!
//! The watcher regenerates once at startup, then blocks on file-system
//! events for the keymap and the draw config. Every accepted change re-runs
//! the keymap-drawer pipeline synchronously. Failures are printed and the
//! loop simply waits for the next edit.

use crate::config::Config;
use crate::drawer::KeymapDrawer;
use crate::watch::filter::ChangeFilter;
use crate::watch::report::StatusReporter;
use anyhow::{Context, Result};
use notify::{PollWatcher, RecommendedWatcher, RecursiveMode, Watcher};
use std::collections::BTreeSet;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{channel, RecvTimeoutError};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// How often the loop checks the stop flag while idle.
const STOP_CHECK_INTERVAL: Duration = Duration::from_millis(100);

/// File-system notification backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchBackend {
    /// Native OS notifications (inotify, FSEvents, ReadDirectoryChangesW)
    Native,
    /// Portable mtime polling at the given interval
    Poll(Duration),
}

impl WatchBackend {
    /// Picks the backend from the watch configuration.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        if config.watch.poll {
            Self::Poll(Duration::from_millis(config.watch.poll_interval_ms))
        } else {
            Self::Native
        }
    }
}

/// Counters returned when the watcher stops.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WatchSummary {
    /// Pipeline runs, including the initial one
    pub regenerations: usize,
    /// Runs that failed
    pub failures: usize,
}

/// Watches the keymap inputs and regenerates the SVG on change.
pub struct KeymapWatcher<W: Write> {
    project_root: PathBuf,
    drawer: KeymapDrawer,
    files: Vec<PathBuf>,
    filter: ChangeFilter,
    backend: WatchBackend,
    reporter: StatusReporter<W>,
}

impl<W: Write> KeymapWatcher<W> {
    /// Creates a watcher for the project described by `config`.
    pub fn new(config: &Config, project_root: &Path, reporter: StatusReporter<W>) -> Self {
        let files = config.watched_files(project_root);
        let filter = ChangeFilter::new(&files, Duration::from_millis(config.watch.debounce_ms));

        Self {
            project_root: project_root.to_path_buf(),
            drawer: KeymapDrawer::new(config, project_root),
            files,
            filter,
            backend: WatchBackend::from_config(config),
            reporter,
        }
    }

    /// Overrides the notification backend.
    #[must_use]
    pub fn with_backend(mut self, backend: WatchBackend) -> Self {
        self.backend = backend;
        self
    }

    /// Directories that must be watched to see every watched file.
    ///
    /// Parents are watched instead of the files themselves so editors that
    /// save through a temp file and rename are still noticed.
    #[must_use]
    pub fn watch_dirs(&self) -> Vec<PathBuf> {
        let dirs: BTreeSet<PathBuf> = self
            .files
            .iter()
            .map(|f| {
                f.parent()
                    .filter(|p| !p.as_os_str().is_empty())
                    .map_or_else(|| PathBuf::from("."), Path::to_path_buf)
            })
            .collect();
        dirs.into_iter().collect()
    }

    fn regenerate(&mut self, summary: &mut WatchSummary) -> Result<()> {
        let outcome = self.drawer.regenerate();
        summary.regenerations += 1;
        if !outcome.is_success() {
            summary.failures += 1;
        }
        self.reporter
            .outcome(&outcome)
            .context("Failed to write status output")
    }

    /// Runs until `stop` is set or the notification channel closes.
    pub fn run(mut self, stop: &Arc<AtomicBool>) -> Result<WatchSummary> {
        let mut summary = WatchSummary::default();

        self.reporter
            .banner()
            .and_then(|()| self.reporter.initial_generation())
            .and_then(|()| self.reporter.change_detected())
            .context("Failed to write status output")?;
        self.regenerate(&mut summary)?;

        let (tx, rx) = channel::<notify::Result<notify::Event>>();
        let mut watcher: Box<dyn Watcher> = match self.backend {
            WatchBackend::Native => Box::new(
                RecommendedWatcher::new(tx, notify::Config::default())
                    .context("Failed to create file watcher")?,
            ),
            WatchBackend::Poll(interval) => Box::new(
                PollWatcher::new(tx, notify::Config::default().with_poll_interval(interval))
                    .context("Failed to create polling file watcher")?,
            ),
        };

        for dir in self.watch_dirs() {
            watcher
                .watch(&dir, RecursiveMode::NonRecursive)
                .context(format!("Failed to watch directory: {}", dir.display()))?;
            tracing::debug!(dir = %dir.display(), backend = ?self.backend, "watching directory");
        }

        self.reporter
            .watching(&self.project_root, &self.files)
            .context("Failed to write status output")?;

        while !stop.load(Ordering::SeqCst) {
            match rx.recv_timeout(STOP_CHECK_INTERVAL) {
                Ok(Ok(event)) => {
                    if self.filter.accept(&event, Instant::now()) {
                        self.reporter
                            .change_detected()
                            .context("Failed to write status output")?;
                        self.regenerate(&mut summary)?;
                    }
                }
                Ok(Err(e)) => {
                    tracing::warn!(error = %e, "file watcher error");
                }
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => {
                    tracing::warn!("file watcher channel closed");
                    break;
                }
            }
        }

        self.reporter
            .stopping()
            .context("Failed to write status output")?;

        Ok(summary)
    }
}
