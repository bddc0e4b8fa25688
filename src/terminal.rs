//! Diagnostic logging for the binary.
//!
//! stdout carries the prompt protocol, so every log line goes to stderr.

use std::ffi::OsStr;

use tracing_subscriber::EnvFilter;

use crate::cli::Args;

/// Installs the global tracing subscriber for `args`.
///
/// `RUST_LOG` takes priority over the level chosen by `-q` / `-v`. ANSI
/// colour is dropped for `--no-color`, a non-empty `NO_COLOR` or `TERM=dumb`.
pub fn setup(args: &Args) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(args.log_level()));
    let plain = plain_output(
        args.no_color,
        std::env::var_os("NO_COLOR").as_deref(),
        std::env::var_os("TERM").as_deref(),
    );
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_ansi(!plain)
        .with_env_filter(filter)
        .try_init();
}

fn plain_output(no_color_flag: bool, no_color: Option<&OsStr>, term: Option<&OsStr>) -> bool {
    no_color_flag
        || no_color.is_some_and(|value| !value.is_empty())
        || term.is_some_and(|value| value.eq_ignore_ascii_case("dumb"))
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[test]
    fn test_plain_output_sources() {
        assert!(!plain_output(false, None, Some(OsStr::new("xterm-256color"))));
        assert!(plain_output(true, None, None));
        assert!(plain_output(false, Some(OsStr::new("1")), None));
        assert!(plain_output(false, None, Some(OsStr::new("DUMB"))));
    }

    #[test]
    fn test_empty_no_color_keeps_colour() {
        assert!(!plain_output(false, Some(OsStr::new("")), None));
    }

    #[test]
    fn test_setup_twice_does_not_panic() {
        let args = Args::try_parse_from(["downloader", "--no-color"]).unwrap();
        setup(&args);
        setup(&args);
    }
}
