//! Concurrent HTTP downloads streamed to disk.
//!
//! This module holds the core of the prompt: the shared [`Session`], the
//! [`DownloadManager`] that schedules one task per accepted URL, the
//! [`DownloadCounter`] that tracks and reports how many downloads are active,
//! and the naming and chunked writing used by each task.
//!
//! # Features
//!
//! - One connection pool shared by every download
//! - Fire-and-forget scheduling (the prompt never waits for a download)
//! - Bounded memory: bodies are written in chunks of [`CHUNK_SIZE`] bytes
//! - Counter slots released on every exit path, including failures
//! - Exclusive file creation with numeric suffixes on name collisions
//!
//! No retries, timeouts, cancellation or resumption are performed.

mod constants;
mod counter;
mod error;
mod filename;
mod manager;
mod session;
mod status;
mod writer;

pub use constants::{CHUNK_SIZE, MAX_NAME_ATTEMPTS};
pub use counter::{ActiveDownload, DownloadCounter};
pub use error::DownloadError;
pub use filename::{NamingMode, resolve_name, timestamp_name};
pub use manager::{DownloadManager, Submission, run_download};
pub use session::Session;
pub use status::{ConsoleReporter, MemoryReporter, StatusEvent, StatusReporter};
pub use writer::{WrittenFile, claim_destination, write_chunked, write_to_destination};
