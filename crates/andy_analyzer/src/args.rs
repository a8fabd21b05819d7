//! the args for running andy-analyzer

use clap::{value_parser, ArgAction};
use std::path::PathBuf;
use tracing::level_filters::LevelFilter;

/// The args struct
#[derive(Debug, clap::Parser)]
#[clap(
    author,
    version,
    about = "Reports the tokens, lint warnings and declarations of andy source files as JSON"
)]
pub struct Args {
    #[command(flatten)]
    logging: LoggingArgs,

    /// Read `<input-file>` and `<temp-file>` line pairs from stdin until it closes
    #[clap(long, conflicts_with_all = ["input", "temp"])]
    server: bool,
    /// The file to analyze, as named in the report
    #[clap(
        required_unless_present = "server",
        value_name = "input-file",
        value_hint = clap::ValueHint::FilePath
    )]
    input: Option<PathBuf>,
    /// Where to read the current text of the input file from, defaults to the input file
    #[clap(value_name = "temp-file", value_hint = clap::ValueHint::FilePath)]
    temp: Option<PathBuf>,
}

/// What the analyzer was asked to do
#[derive(Debug, PartialEq, Eq)]
pub enum Mode {
    /// Answer a single request
    OneShot { input: PathBuf, temp: PathBuf },
    /// Answer requests from stdin
    Server,
}

impl Args {
    pub fn mode(&self) -> Mode {
        match &self.input {
            Some(input) if !self.server => Mode::OneShot {
                input: input.clone(),
                temp: self.temp.clone().unwrap_or_else(|| input.clone()),
            },
            _ => Mode::Server,
        }
    }

    pub fn logging(&self) -> &LoggingArgs {
        &self.logging
    }
}

/// Common way to set logging levels
#[derive(Debug, Clone, Copy, clap::Args)]
pub struct LoggingArgs {
    #[clap(short = 'v', value_parser = value_parser!(u8).range(0..=2), action = ArgAction::Count, conflicts_with = "quiet")]
    verbose: u8,
    #[clap(short = 'q', value_parser = value_parser!(u8).range(0..=2), action = ArgAction::Count, conflicts_with = "verbose")]
    quiet: u8,
}

impl LoggingArgs {
    /// Gets the logging level based on whether `-v[v]` or `-q[q]` has been used
    pub fn log_level_filter(&self) -> LevelFilter {
        match self.verbose as i8 - self.quiet as i8 {
            i8::MIN..=-2 => LevelFilter::OFF,
            -1 => LevelFilter::ERROR,
            0 => LevelFilter::INFO,
            1 => LevelFilter::DEBUG,
            _ => LevelFilter::TRACE,
        }
    }
}
