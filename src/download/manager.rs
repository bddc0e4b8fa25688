//! Download manager: validates requests and runs each download as its own task.
//!
//! # Per-request states
//!
//! ```text
//! Received -> Rejected                       (validation failed, reported synchronously)
//! Received -> Validated -> Connecting -> Active -> Streaming -> Released -> Done
//! ```
//!
//! [`DownloadManager::submit`] never waits for a download. Each accepted URL is
//! spawned onto the runtime; the task issues the GET on the shared
//! [`Session`], enters the [`DownloadCounter`], streams the body to disk and
//! releases the counter. Failures are logged per task and never retried.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use interactive_downloader::{ConsoleReporter, DownloadManager, DownloaderConfig, ExitPolicy};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut manager = DownloadManager::open(DownloaderConfig::default(), Arc::new(ConsoleReporter))?;
//! manager.submit("https://example.com/paper.pdf");
//! manager.shutdown(ExitPolicy::Drain).await;
//! # Ok(())
//! # }
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures_util::StreamExt;
use tokio::task::JoinHandle;
use tracing::{Instrument, debug, info, info_span, warn};

use super::counter::DownloadCounter;
use super::error::DownloadError;
use super::filename::{NamingMode, resolve_name};
use super::session::Session;
use super::status::{StatusEvent, StatusReporter};
use super::writer::{WrittenFile, write_to_destination};
use crate::config::{DownloaderConfig, ExitPolicy};
use crate::parser::is_valid_http_url;

/// Result of handing a line of input to [`DownloadManager::submit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submission {
    /// The input was not a valid HTTP(S) URL; nothing was scheduled.
    Rejected,
    /// A download task was scheduled.
    Scheduled,
}

/// Coordinates concurrent downloads over one shared session.
///
/// The manager knows how many downloads are in flight (through its counter),
/// not which ones. Task handles are kept only so that
/// [`ExitPolicy::Drain`] can wait for them.
#[derive(Debug)]
pub struct DownloadManager {
    session: Session,
    counter: Arc<DownloadCounter>,
    reporter: Arc<dyn StatusReporter>,
    output_dir: PathBuf,
    naming: NamingMode,
    tasks: Vec<JoinHandle<()>>,
}

impl DownloadManager {
    /// Opens the shared session and creates a manager with a zero count.
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError::Client`] if the session cannot be opened.
    pub fn open(
        config: DownloaderConfig,
        reporter: Arc<dyn StatusReporter>,
    ) -> Result<Self, DownloadError> {
        let session = Session::open()?;
        Ok(Self::with_session(session, config, reporter))
    }

    /// Creates a manager around an already opened session.
    #[must_use]
    pub fn with_session(
        session: Session,
        config: DownloaderConfig,
        reporter: Arc<dyn StatusReporter>,
    ) -> Self {
        debug!(
            output_dir = %config.output_dir.display(),
            naming = ?config.naming,
            "creating download manager"
        );
        Self {
            session,
            counter: Arc::new(DownloadCounter::new(Arc::clone(&reporter))),
            reporter,
            output_dir: config.output_dir,
            naming: config.naming,
            tasks: Vec::new(),
        }
    }

    /// Returns true if `url` is a valid HTTP(S) URL.
    #[must_use]
    pub fn validate(&self, url: &str) -> bool {
        is_valid_http_url(url)
    }

    /// Number of downloads between start and finish right now.
    #[must_use]
    pub fn active_downloads(&self) -> usize {
        self.counter.active()
    }

    /// Validates `url` and, if valid, schedules its download without waiting.
    ///
    /// Invalid input is reported as [`StatusEvent::Rejected`] before this
    /// returns. Must be called from within a Tokio runtime.
    pub fn submit(&mut self, url: &str) -> Submission {
        if !self.validate(url) {
            debug!(input = %url, "rejected input");
            self.reporter.report(&StatusEvent::Rejected {
                input: url.to_string(),
            });
            return Submission::Rejected;
        }

        self.tasks.retain(|task| !task.is_finished());

        let session = self.session.clone();
        let counter = Arc::clone(&self.counter);
        let output_dir = self.output_dir.clone();
        let naming = self.naming;
        let url = url.to_string();
        let span = info_span!("download", url = %url);

        self.tasks.push(tokio::spawn(
            async move {
                match run_download(&session, &counter, &url, &output_dir, naming).await {
                    Ok(written) => {
                        info!(
                            path = %written.path.display(),
                            bytes = written.bytes,
                            "download completed"
                        );
                    }
                    Err(e) if e.is_transport() => {
                        warn!(url = %url, error = %e, "download request failed");
                    }
                    Err(e) => {
                        warn!(url = %url, error = %e, "download failed");
                    }
                }
            }
            .instrument(span),
        ));
        debug!(scheduled = self.tasks.len(), "download scheduled");

        Submission::Scheduled
    }

    /// Ends the manager and closes the session.
    ///
    /// With [`ExitPolicy::Detach`] this returns immediately and in-flight
    /// downloads keep running until the runtime shuts down; they no longer
    /// report status, and one dropped with the runtime removes its partial
    /// file. With [`ExitPolicy::Drain`] every scheduled download is awaited
    /// first.
    pub async fn shutdown(self, policy: ExitPolicy) {
        match policy {
            ExitPolicy::Detach => {
                debug!(
                    active = self.counter.active(),
                    "closing session without waiting for downloads"
                );
            }
            ExitPolicy::Drain => {
                debug!(
                    task_count = self.tasks.len(),
                    "waiting for downloads to complete"
                );
                for task in self.tasks {
                    // Ignore JoinError - task panics are logged but don't fail shutdown
                    if let Err(e) = task.await {
                        warn!(error = %e, "download task panicked");
                    }
                }
            }
        }
        self.counter.close();
        self.session.close();
    }
}

/// Runs one download: GET, enter the counter, stream to disk, release.
///
/// The counter is entered only after the response headers arrived, so a
/// failed request never shows up in the count. Once entered, the slot is
/// released on every path.
///
/// # Errors
///
/// Returns transport errors from the session and write errors from the
/// chunked writer.
pub async fn run_download(
    session: &Session,
    counter: &DownloadCounter,
    url: &str,
    output_dir: &Path,
    naming: NamingMode,
) -> Result<WrittenFile, DownloadError> {
    if !is_valid_http_url(url) {
        return Err(DownloadError::invalid_url(url));
    }

    let response = session.get(url).await?;
    let active = counter.enter(url);

    let name = resolve_name(url, naming);
    let body = response
        .bytes_stream()
        .map(|chunk| chunk.map_err(|e| DownloadError::network(url, e)));
    let written = write_to_destination(body, output_dir, &name).await?;

    active.finish();
    Ok(written)
}
