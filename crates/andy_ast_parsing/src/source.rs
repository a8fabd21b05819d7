//! Source files

use crate::lexer::Lexer;
use std::io;
use std::path::{Path, PathBuf};

/// The text of a source file, kept together with its path so tokens can borrow both
#[derive(Debug, Clone)]
pub struct SourceFile {
    path: PathBuf,
    text: String,
}

impl SourceFile {
    pub fn new(path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            text: text.into(),
        }
    }

    /// Reads the file at `path`
    pub fn read(path: impl AsRef<Path>) -> io::Result<Self> {
        Self::read_from(path.as_ref(), path.as_ref())
    }

    /// Reads the text at `contents` while reporting it as `path`, for editors that save
    /// unsaved buffers to a temporary file
    pub fn read_from(path: impl AsRef<Path>, contents: impl AsRef<Path>) -> io::Result<Self> {
        let text = std::fs::read_to_string(contents)?;
        Ok(Self::new(path.as_ref(), text))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// A lexer over this file, not yet tokenized
    pub fn lexer(&self) -> Lexer<'_> {
        Lexer::new(&self.path, &self.text)
    }
}
