//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::Parser;

use interactive_downloader::{DownloaderConfig, ExitPolicy, NamingMode};

/// Interactive prompt that downloads HTTP(S) URLs concurrently.
///
/// Type a URL and press enter to start downloading it in the background;
/// type `exit` to quit.
#[derive(Parser, Debug)]
#[command(name = "downloader")]
#[command(author, version, about)]
pub struct Args {
    /// Increase diagnostic verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only report errors on stderr
    #[arg(short, long)]
    pub quiet: bool,

    /// Disable ANSI colour in diagnostics
    #[arg(long)]
    pub no_color: bool,

    /// Directory receiving downloaded files
    #[arg(short, long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Name files by timestamp instead of by URL
    #[arg(long)]
    pub debug_names: bool,

    /// Wait for running downloads when `exit` is typed
    #[arg(long)]
    pub wait_on_exit: bool,
}

impl Args {
    /// Default log filter: `-q` wins over `-v`, and plain runs log warnings
    /// only so failures show up next to the prompt.
    pub fn log_level(&self) -> &'static str {
        if self.quiet {
            return "error";
        }
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }

    /// Resolves the flags into the library configuration.
    pub fn to_config(&self) -> DownloaderConfig {
        DownloaderConfig {
            output_dir: self.output_dir.clone(),
            naming: if self.debug_names {
                NamingMode::Timestamp
            } else {
                NamingMode::UrlPath
            },
            exit_policy: if self.wait_on_exit {
                ExitPolicy::Drain
            } else {
                ExitPolicy::Detach
            },
        }
    }
}
