//! Active download counter.
//!
//! The count and its status report change together inside one critical
//! section: no two downloads can interleave their (mutate, report) pairs, and
//! a reporter never sees a stale count.
//!
//! Entering returns an [`ActiveDownload`] guard. Dropping the guard without
//! calling [`ActiveDownload::finish`] releases the slot as failed, so the count
//! returns to zero on every exit path of a download.
//!
//! Once the session has ended ([`DownloadCounter::close`]) releases still
//! update the count but report nothing: a download abandoned at exit neither
//! finished nor failed.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, trace, warn};

use super::status::{StatusEvent, StatusReporter};

/// How an active download left the active set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Finished,
    Failed,
}

#[derive(Debug, Default)]
struct CounterState {
    active: usize,
    closed: bool,
}

/// Shared count of in-flight downloads.
#[derive(Debug)]
pub struct DownloadCounter {
    state: Mutex<CounterState>,
    reporter: Arc<dyn StatusReporter>,
}

impl DownloadCounter {
    /// Creates a counter at zero that reports transitions to `reporter`.
    #[must_use]
    pub fn new(reporter: Arc<dyn StatusReporter>) -> Self {
        Self {
            state: Mutex::new(CounterState::default()),
            reporter,
        }
    }

    /// Returns the number of downloads currently active.
    #[must_use]
    pub fn active(&self) -> usize {
        self.lock().active
    }

    /// Stops reporting: later enters and releases only change the count.
    ///
    /// Called when the session ends without waiting for its downloads.
    pub fn close(&self) {
        let mut state = self.lock();
        state.closed = true;
        debug!(active = state.active, "counter closed");
    }

    fn lock(&self) -> MutexGuard<'_, CounterState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Marks a download from `url` as active.
    ///
    /// Reports `Started` followed by the new count.
    #[must_use = "dropping the guard immediately releases the download as failed"]
    pub fn enter(&self, url: &str) -> ActiveDownload<'_> {
        {
            let mut state = self.lock();
            state.active += 1;
            trace!(active = state.active, url, "download entered");
            if !state.closed {
                self.reporter.report(&StatusEvent::Started {
                    url: url.to_string(),
                });
                self.reporter.report(&StatusEvent::Downloading {
                    active: state.active,
                });
            }
        }

        ActiveDownload {
            counter: self,
            url: url.to_string(),
            released: false,
        }
    }

    fn leave(&self, url: &str, outcome: Outcome) {
        let mut state = self.lock();
        let Some(remaining) = state.active.checked_sub(1) else {
            warn!(url, "download left with no active downloads");
            return;
        };
        state.active = remaining;
        trace!(active = remaining, url, ?outcome, "download left");
        if state.closed {
            debug!(url, active = remaining, "download abandoned after session close");
            return;
        }

        let url = url.to_string();
        self.reporter.report(&match outcome {
            Outcome::Finished => StatusEvent::Finished { url },
            Outcome::Failed => StatusEvent::Failed { url },
        });
        if remaining == 0 {
            self.reporter.report(&StatusEvent::AllDownloaded);
        } else {
            self.reporter
                .report(&StatusEvent::Downloading { active: remaining });
        }
    }
}

/// Slot held by one active download; see [`DownloadCounter::enter`].
#[derive(Debug)]
pub struct ActiveDownload<'a> {
    counter: &'a DownloadCounter,
    url: String,
    released: bool,
}

impl ActiveDownload<'_> {
    /// Releases the slot after a successful download.
    ///
    /// Reports `Finished` followed by the remaining count, or
    /// `AllDownloaded` when this was the last active download.
    pub fn finish(mut self) {
        self.released = true;
        self.counter.leave(&self.url, Outcome::Finished);
    }
}

impl Drop for ActiveDownload<'_> {
    fn drop(&mut self) {
        if !self.released {
            self.counter.leave(&self.url, Outcome::Failed);
        }
    }
}
