#![doc = include_str!("../README.md")]

use andy_ast_parsing::SourceFile;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

pub mod lint;
pub mod report;

pub use report::{analyze, Report};

/// An error that stops a request from being answered
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("input file '{}' does not exist", .0.display())]
    MissingInput(PathBuf),
    #[error("input file '{}' is not a regular file", .0.display())]
    NotAFile(PathBuf),
    #[error("no temp file given after input file {0:?}")]
    IncompleteRequest(String),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Loads the text of `temp` as the source file `input`.
///
/// `input` has to be an existing regular file and is reported by its absolute path.
pub fn load(input: &Path, temp: &Path) -> Result<SourceFile, RequestError> {
    if !input.exists() {
        return Err(RequestError::MissingInput(input.to_path_buf()));
    }
    if !input.is_file() {
        return Err(RequestError::NotAFile(input.to_path_buf()));
    }
    let input = input.canonicalize()?;
    debug!("reading {} from {}", input.display(), temp.display());
    Ok(SourceFile::read_from(input, temp)?)
}

/// Answers a single request, writing the report as one line of JSON
pub fn run_request(input: &Path, temp: &Path, mut out: impl Write) -> Result<(), RequestError> {
    let file = load(input, temp)?;
    let report = analyze(&file);
    info!(
        "analyzed {} in {}: {} tokens, {} warnings, {} errors",
        file.path().display(),
        report.elapsed,
        report.tokens.len(),
        report.linter.len(),
        report.errors.len()
    );
    serde_json::to_writer(&mut out, &report)?;
    writeln!(out)?;
    out.flush()?;
    Ok(())
}

/// Answers `<input-file>\n<temp-file>\n` requests until `requests` runs out, returning how many
/// were answered
pub fn serve(requests: impl BufRead, mut out: impl Write) -> Result<usize, RequestError> {
    let mut lines = requests.lines();
    let mut answered = 0;
    while let Some(input) = lines.next() {
        let input = input?;
        let Some(temp) = lines.next().transpose()? else {
            return Err(RequestError::IncompleteRequest(input));
        };
        run_request(Path::new(&input), Path::new(&temp), &mut out)?;
        answered += 1;
    }
    Ok(answered)
}
