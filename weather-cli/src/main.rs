//! Binary crate for the `weather` command-line tool.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Interactive configuration
//! - Human-friendly output formatting

use clap::Parser;
use log::{LevelFilter, warn};
use std::process;

mod cli;
mod render;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cmd = match cli::Cli::try_parse() {
        Ok(cmd) => cmd,
        Err(err) => process::exit(report_usage(&err)),
    };
    init_logging(cmd.verbose);
    cmd.run().await
}

/// Print clap's usage, help or version text and pick the exit code. Usage
/// errors exit with 1 like request errors; help and version exit with 0.
fn report_usage(err: &clap::Error) -> i32 {
    if let Err(print_err) = err.print() {
        init_logging(0);
        warn!("failed to print usage: {print_err}");
    }

    usage_exit_code(err)
}

fn usage_exit_code(err: &clap::Error) -> i32 {
    if err.use_stderr() { 1 } else { 0 }
}

/// Logs go to stderr so stdout only carries the report. `RUST_LOG` wins over `-v`.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    env_logger::Builder::new().filter_level(level).parse_default_env().init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usage_errors_exit_with_one() {
        let err = cli::Cli::try_parse_from(["weather", "current", "city"]).unwrap_err();
        assert_eq!(usage_exit_code(&err), 1);

        let err = cli::Cli::try_parse_from(["weather", "forecast", "--bogus"]).unwrap_err();
        assert_eq!(usage_exit_code(&err), 1);
    }

    #[test]
    fn help_and_version_exit_with_zero() {
        let err = cli::Cli::try_parse_from(["weather", "--help"]).unwrap_err();
        assert_eq!(usage_exit_code(&err), 0);

        let err = cli::Cli::try_parse_from(["weather", "--version"]).unwrap_err();
        assert_eq!(usage_exit_code(&err), 0);
    }
}
