//! Status events and where they are reported.
//!
//! Events are emitted by the [`DownloadCounter`](super::DownloadCounter) while
//! it holds its lock, so a reporter sees them in the same order the count
//! changed. Reporters must not call back into the counter.

use std::fmt;
use std::io::Write;
use std::sync::{Mutex, PoisonError};

use tracing::debug;

/// A user-visible status notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusEvent {
    /// Input was not a valid HTTP(S) URL.
    Rejected {
        /// The rejected input line.
        input: String,
    },
    /// A download entered the active set.
    Started {
        /// Source URL.
        url: String,
    },
    /// Number of downloads now active (never zero).
    Downloading {
        /// Active download count.
        active: usize,
    },
    /// A download left the active set after writing its file.
    Finished {
        /// Source URL.
        url: String,
    },
    /// A download left the active set because it failed.
    Failed {
        /// Source URL.
        url: String,
    },
    /// The last active download left the active set.
    AllDownloaded,
}

impl fmt::Display for StatusEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rejected { .. } => write!(f, "Invalid http url"),
            Self::Started { url } => write!(f, "Started downloading a file from {url}"),
            Self::Downloading { active } => write!(f, "Downloading {active} files"),
            Self::Finished { url } => write!(f, "Finished downloading a file from {url}"),
            Self::Failed { url } => write!(f, "Failed downloading a file from {url}"),
            Self::AllDownloaded => write!(f, "All files downloaded"),
        }
    }
}

/// Sink for status events.
pub trait StatusReporter: Send + Sync + fmt::Debug {
    /// Reports one event. Called with the counter lock held for count changes.
    fn report(&self, event: &StatusEvent);
}

/// Writes status lines to stdout using the prompt protocol.
///
/// Asynchronous lines overwrite the current prompt and redraw it:
/// `\r    <text>\n> `. Rejections are written as a plain line.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleReporter;

impl ConsoleReporter {
    /// Renders `event` exactly as it is written to the terminal.
    #[must_use]
    pub fn render(event: &StatusEvent) -> String {
        match event {
            StatusEvent::Rejected { .. } => format!("{event}\n"),
            _ => format!("\r    {event}\n> "),
        }
    }
}

impl StatusReporter for ConsoleReporter {
    fn report(&self, event: &StatusEvent) {
        let mut stdout = std::io::stdout().lock();
        let written = stdout
            .write_all(Self::render(event).as_bytes())
            .and_then(|()| stdout.flush());
        if let Err(e) = written {
            debug!(error = %e, "failed to write status line");
        }
    }
}

/// Records events in memory, in report order.
#[derive(Debug, Default)]
pub struct MemoryReporter {
    events: Mutex<Vec<StatusEvent>>,
}

impl MemoryReporter {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of every event reported so far.
    #[must_use]
    pub fn events(&self) -> Vec<StatusEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl StatusReporter for MemoryReporter {
    fn report(&self, event: &StatusEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event.clone());
    }
}
