//! Output file naming for downloads.
//!
//! Names are derived from the URL alone (no filesystem access). Collision
//! handling happens when the destination is claimed, see
//! [`writer`](super::writer).

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

const NANOS_PER_SEC: u64 = 1_000_000_000;

/// Last timestamp handed out by [`timestamp_name`], in nanoseconds.
static LAST_TIMESTAMP_NANOS: AtomicU64 = AtomicU64::new(0);

/// How output file names are derived.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NamingMode {
    /// Final path segment of the URL.
    #[default]
    UrlPath,
    /// Unique high-resolution timestamp, ignoring the URL.
    Timestamp,
}

/// Derives an output file name for `url`.
///
/// In [`NamingMode::UrlPath`] this is the substring after the last `/`, so a
/// URL ending in `/` yields an empty string. In [`NamingMode::Timestamp`] a
/// unique timestamp name is returned instead.
///
/// # Examples
///
/// ```
/// use interactive_downloader::{NamingMode, resolve_name};
///
/// assert_eq!(resolve_name("https://a.com/dir/file.zip", NamingMode::UrlPath), "file.zip");
/// assert_eq!(resolve_name("https://a.com/dir/", NamingMode::UrlPath), "");
/// ```
#[must_use]
pub fn resolve_name(url: &str, mode: NamingMode) -> String {
    match mode {
        NamingMode::UrlPath => url.rsplit('/').next().unwrap_or_default().to_string(),
        NamingMode::Timestamp => timestamp_name(),
    }
}

/// Returns `<seconds>.<nanoseconds>` since the Unix epoch.
///
/// Successive calls within the process are strictly increasing, even when the
/// clock has not advanced between them.
#[must_use]
pub fn timestamp_name() -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| u64::try_from(d.as_nanos()).unwrap_or(u64::MAX));
    let next = |last: u64| now.max(last.saturating_add(1));

    let advance = |last: u64| Some(next(last));
    let previous = LAST_TIMESTAMP_NANOS
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, advance)
        .unwrap_or_else(|previous| previous);
    let stamp = next(previous);

    format!("{}.{:09}", stamp / NANOS_PER_SEC, stamp % NANOS_PER_SEC)
}

/// Inserts `_{n}` before the extension: `file.zip` -> `file_2.zip`.
///
/// Names without an extension (or dot-files like `.hidden`) get the suffix
/// appended at the end.
pub(crate) fn with_numeric_suffix(name: &str, n: u32) -> String {
    match name.rfind('.') {
        Some(dot) if dot > 0 => format!("{}_{n}{}", &name[..dot], &name[dot..]),
        _ => format!("{name}_{n}"),
    }
}
