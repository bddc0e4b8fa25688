//! Interactive Downloader Library
//!
//! This library provides the core of the `downloader` prompt: a user types
//! HTTP(S) URLs, each one is validated and then downloaded concurrently into
//! the output directory while a live count of in-flight downloads is reported.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`parser`] - HTTP URL validation
//! - [`download`] - Session, download manager, counter, naming and chunked writing
//! - [`app`] - The line-oriented command loop
//! - [`config`] - Resolved runtime configuration

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod app;
pub mod config;
pub mod download;
pub mod parser;
mod user_agent;

// Re-export commonly used types
pub use app::{LoopExit, run_command_loop};
pub use config::{DownloaderConfig, ExitPolicy};
pub use download::{
    CHUNK_SIZE, ConsoleReporter, DownloadCounter, DownloadError, DownloadManager, MemoryReporter,
    NamingMode, Session, StatusEvent, StatusReporter, Submission, resolve_name,
};
pub use parser::is_valid_http_url;
