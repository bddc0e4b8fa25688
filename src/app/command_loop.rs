//! Line-oriented prompt driving the download manager.
//!
//! Protocol: `> ` is written before each read; `exit` ends the loop; any
//! other line is handed to [`DownloadManager::submit`]. Status lines from
//! running downloads are written by the manager's reporter, interleaved with
//! prompts on a best-effort basis.

use std::borrow::Cow;
use std::io::Write;
use std::sync::Arc;

use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, info};

use crate::config::DownloaderConfig;
use crate::download::{DownloadError, DownloadManager, StatusReporter, Submission};

/// Prompt written before each input line.
pub const PROMPT: &str = "> ";

/// Input line that closes the session and ends the loop.
pub const EXIT_COMMAND: &str = "exit";

/// Why the command loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopExit {
    /// The user typed `exit`.
    Command,
    /// Input reached end-of-file.
    EndOfInput,
}

/// Errors that end an interactive session.
#[derive(Debug, Error)]
pub enum AppError {
    /// The shared session could not be opened.
    #[error("could not start downloader: {0}")]
    Session(#[from] DownloadError),

    /// Reading input or writing the prompt failed.
    #[error("terminal I/O error: {0}")]
    Terminal(#[from] std::io::Error),
}

/// Reads lines from `input` and submits them to `manager` until `exit` or EOF.
///
/// The trailing newline (`\n` or `\r\n`) is stripped; nothing else is
/// trimmed, so ` exit` is treated as a URL candidate. Bytes that are not
/// valid UTF-8 are replaced, which leaves the line to be rejected as a URL.
///
/// # Errors
///
/// Returns an I/O error if reading `input` or writing `prompt_out` fails.
pub async fn run_command_loop<R, W>(
    mut input: R,
    prompt_out: &mut W,
    manager: &mut DownloadManager,
) -> Result<LoopExit, std::io::Error>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut buf = Vec::new();

    loop {
        prompt_out.write_all(PROMPT.as_bytes())?;
        prompt_out.flush()?;

        buf.clear();
        if input.read_until(b'\n', &mut buf).await? == 0 {
            debug!("end of input");
            return Ok(LoopExit::EndOfInput);
        }
        let line = decode_line(&buf);

        if line == EXIT_COMMAND {
            debug!("exit command received");
            return Ok(LoopExit::Command);
        }

        if manager.submit(&line) == Submission::Scheduled {
            debug!(url = %line, active = manager.active_downloads(), "accepted URL");
        }
    }
}

fn decode_line(raw: &[u8]) -> Cow<'_, str> {
    let raw = raw.strip_suffix(b"\n").unwrap_or(raw);
    let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
    String::from_utf8_lossy(raw)
}

/// Runs a whole interactive session.
///
/// Opens the session, runs the command loop over `input`, then shuts the
/// manager down according to `config.exit_policy`. The session is closed
/// exactly once, after the loop has ended.
///
/// # Errors
///
/// Returns [`AppError::Session`] if the session cannot be opened and
/// [`AppError::Terminal`] on input/prompt I/O failure.
pub async fn run_session<R, W>(
    config: DownloaderConfig,
    reporter: Arc<dyn StatusReporter>,
    input: R,
    prompt_out: &mut W,
) -> Result<LoopExit, AppError>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let exit_policy = config.exit_policy;
    let mut manager = DownloadManager::open(config, reporter)?;
    info!("session opened, accepting URLs");

    let outcome = run_command_loop(input, prompt_out, &mut manager).await;

    manager.shutdown(exit_policy).await;
    info!("session closed");

    outcome.map_err(AppError::from)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::download::{MemoryReporter, StatusEvent};

    fn config(dir: &TempDir) -> DownloaderConfig {
        DownloaderConfig {
            output_dir: dir.path().to_path_buf(),
            ..DownloaderConfig::default()
        }
    }

    #[tokio::test]
    async fn test_exit_with_no_downloads_prints_only_prompt() {
        let dir = TempDir::new().unwrap();
        let reporter = Arc::new(MemoryReporter::new());
        let mut out = Vec::new();

        let exit = run_session(config(&dir), reporter.clone(), &b"exit\n"[..], &mut out)
            .await
            .unwrap();

        assert_eq!(exit, LoopExit::Command);
        assert_eq!(out, b"> ");
        assert!(reporter.events().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_input_is_rejected_and_loop_continues() {
        let dir = TempDir::new().unwrap();
        let reporter = Arc::new(MemoryReporter::new());
        let mut out = Vec::new();

        let exit = run_session(
            config(&dir),
            reporter.clone(),
            &b"hello\nexit\n"[..],
            &mut out,
        )
        .await
        .unwrap();

        assert_eq!(exit, LoopExit::Command);
        assert_eq!(out, b"> > ");
        assert_eq!(
            reporter.events(),
            vec![StatusEvent::Rejected {
                input: "hello".into()
            }]
        );
    }

    #[tokio::test]
    async fn test_end_of_input_ends_loop() {
        let dir = TempDir::new().unwrap();
        let reporter = Arc::new(MemoryReporter::new());
        let mut out = Vec::new();

        let exit = run_session(config(&dir), reporter, &b""[..], &mut out)
            .await
            .unwrap();

        assert_eq!(exit, LoopExit::EndOfInput);
    }

    #[tokio::test]
    async fn test_crlf_exit_is_recognised() {
        let dir = TempDir::new().unwrap();
        let reporter = Arc::new(MemoryReporter::new());
        let mut out = Vec::new();

        let exit = run_session(config(&dir), reporter, &b"exit\r\n"[..], &mut out)
            .await
            .unwrap();

        assert_eq!(exit, LoopExit::Command);
    }

    #[tokio::test]
    async fn test_exit_must_match_exactly() {
        let dir = TempDir::new().unwrap();
        let reporter = Arc::new(MemoryReporter::new());
        let mut out = Vec::new();

        let exit = run_session(
            config(&dir),
            reporter.clone(),
            &b"EXIT\n exit\n"[..],
            &mut out,
        )
        .await
        .unwrap();

        assert_eq!(exit, LoopExit::EndOfInput);
        assert_eq!(reporter.events().len(), 2);
    }

    #[tokio::test]
    async fn test_non_utf8_line_is_rejected_and_loop_continues() {
        let dir = TempDir::new().unwrap();
        let reporter = Arc::new(MemoryReporter::new());
        let mut out = Vec::new();

        let exit = run_session(
            config(&dir),
            reporter.clone(),
            &b"\xff\xfehttp\r\nexit\n"[..],
            &mut out,
        )
        .await
        .unwrap();

        assert_eq!(exit, LoopExit::Command);
        assert_eq!(out, b"> > ");
        assert_eq!(
            reporter.events(),
            vec![StatusEvent::Rejected {
                input: "\u{fffd}\u{fffd}http".into()
            }]
        );
    }

    #[test]
    fn test_decode_line_strips_only_line_ending() {
        assert_eq!(decode_line(b"exit\r\n"), "exit");
        assert_eq!(decode_line(b" exit \n"), " exit ");
        assert_eq!(decode_line(b"exit"), "exit");
    }

    #[tokio::test]
    async fn test_lines_after_exit_are_not_read() {
        let dir = TempDir::new().unwrap();
        let reporter = Arc::new(MemoryReporter::new());
        let mut out = Vec::new();

        run_session(
            config(&dir),
            reporter.clone(),
            &b"exit\nhello\n"[..],
            &mut out,
        )
        .await
        .unwrap();

        assert!(reporter.events().is_empty());
    }
}
