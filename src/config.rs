//! Resolved runtime configuration.
//!
//! The defaults reproduce the plain `downloader` invocation: files go to the
//! current directory, named after the URL, and `exit` does not wait for
//! in-flight downloads.

use std::path::PathBuf;

use crate::download::NamingMode;

/// What `exit` does with downloads that are still running.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExitPolicy {
    /// Close the session immediately; in-flight downloads are abandoned when
    /// the process ends.
    #[default]
    Detach,
    /// Wait for every scheduled download before closing the session.
    Drain,
}

/// Configuration consumed by [`DownloadManager`](crate::DownloadManager).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloaderConfig {
    /// Directory receiving downloaded files.
    pub output_dir: PathBuf,
    /// How output file names are derived.
    pub naming: NamingMode,
    /// Behaviour of the `exit` command.
    pub exit_policy: ExitPolicy,
}

impl Default for DownloaderConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            naming: NamingMode::UrlPath,
            exit_policy: ExitPolicy::Detach,
        }
    }
}
