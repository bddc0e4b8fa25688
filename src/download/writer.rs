//! Chunked streaming of response bodies to disk.
//!
//! The body is never buffered whole: each frame from the transport is written
//! out in slices of at most [`CHUNK_SIZE`] bytes as it arrives, so memory use
//! stays bounded regardless of content length.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use futures_util::{Stream, StreamExt};
use tokio::fs::{File, OpenOptions};
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, trace, warn};

use super::constants::{CHUNK_SIZE, MAX_NAME_ATTEMPTS};
use super::error::DownloadError;
use super::filename::{timestamp_name, with_numeric_suffix};

/// A file written by [`write_to_destination`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenFile {
    /// Final output path (may carry a numeric suffix).
    pub path: PathBuf,
    /// Number of body bytes written.
    pub bytes: u64,
}

/// Removes a claimed destination unless the download completed.
///
/// Removal runs in `Drop`, so it also covers a task that is dropped
/// mid-stream when the runtime shuts down.
#[derive(Debug)]
struct PartialFile {
    path: PathBuf,
    complete: bool,
}

impl PartialFile {
    fn new(path: PathBuf) -> Self {
        Self {
            path,
            complete: false,
        }
    }

    fn keep(mut self) -> PathBuf {
        self.complete = true;
        std::mem::take(&mut self.path)
    }
}

impl Drop for PartialFile {
    fn drop(&mut self) {
        if self.complete {
            return;
        }
        debug!(path = %self.path.display(), "removing partial file");
        if let Err(e) = std::fs::remove_file(&self.path) {
            warn!(path = %self.path.display(), error = %e, "could not remove partial file");
        }
    }
}

/// Claims a fresh file named after `name` inside `output_dir`.
///
/// An empty `name` is replaced by a timestamp name. If the name is taken,
/// `_2`, `_3`, ... is inserted before the extension until a free name is found.
///
/// # Errors
///
/// Returns [`DownloadError::Io`] if creation fails for any reason other than
/// the name being taken, or if [`MAX_NAME_ATTEMPTS`] names are all taken.
pub async fn claim_destination(
    output_dir: &Path,
    name: &str,
) -> Result<(File, PathBuf), DownloadError> {
    let base = if name.is_empty() {
        let fallback = timestamp_name();
        debug!(fallback = %fallback, "empty file name, using timestamp name");
        fallback
    } else {
        name.to_string()
    };

    let mut candidate = output_dir.join(&base);
    for attempt in 2..=MAX_NAME_ATTEMPTS + 1 {
        match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&candidate)
            .await
        {
            Ok(file) => return Ok((file, candidate)),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                trace!(path = %candidate.display(), "name taken, trying next suffix");
                candidate = output_dir.join(with_numeric_suffix(&base, attempt));
            }
            Err(e) => return Err(DownloadError::io(candidate, e)),
        }
    }

    Err(DownloadError::io(
        output_dir.join(&base),
        std::io::Error::new(
            ErrorKind::AlreadyExists,
            format!("no free name after {MAX_NAME_ATTEMPTS} attempts"),
        ),
    ))
}

/// Streams `body` into `file` in chunks of at most [`CHUNK_SIZE`] bytes.
///
/// Chunks are appended in arrival order until the stream ends. Returns the
/// number of bytes written. `path` is only used for error context.
///
/// # Errors
///
/// Propagates the first error yielded by `body`, or [`DownloadError::Io`] if
/// a write or the final flush fails.
pub async fn write_chunked<S, B>(body: S, file: File, path: &Path) -> Result<u64, DownloadError>
where
    S: Stream<Item = Result<B, DownloadError>>,
    B: AsRef<[u8]>,
{
    let mut body = std::pin::pin!(body);
    let mut writer = BufWriter::new(file);
    let mut bytes_written: u64 = 0;

    while let Some(frame) = body.next().await {
        let frame = frame?;
        for chunk in frame.as_ref().chunks(CHUNK_SIZE) {
            writer
                .write_all(chunk)
                .await
                .map_err(|e| DownloadError::io(path, e))?;
            bytes_written += chunk.len() as u64;
        }
    }

    // Ensure all data is flushed to disk
    writer
        .flush()
        .await
        .map_err(|e| DownloadError::io(path, e))?;

    Ok(bytes_written)
}

/// Claims a destination in `output_dir` and streams `body` into it.
///
/// The file handle is closed on every exit path. If streaming fails or the
/// future is dropped before completion, the partial file is removed (best
/// effort).
///
/// # Errors
///
/// Returns the errors of [`claim_destination`] and [`write_chunked`].
pub async fn write_to_destination<S, B>(
    body: S,
    output_dir: &Path,
    name: &str,
) -> Result<WrittenFile, DownloadError>
where
    S: Stream<Item = Result<B, DownloadError>>,
    B: AsRef<[u8]>,
{
    let (file, path) = claim_destination(output_dir, name).await?;
    debug!(path = %path.display(), "destination claimed");
    let partial = PartialFile::new(path);

    let bytes = write_chunked(body, file, &partial.path).await?;
    Ok(WrittenFile {
        path: partial.keep(),
        bytes,
    })
}
