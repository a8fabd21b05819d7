//! Positions within a source file

use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// A position within a source file.
///
/// `line` and `column` are both 0-based, with `column` counting characters since the
/// last line feed. `offset` is the byte offset from the start of the source.
#[derive(Debug, Copy, Clone, Default, Ord, PartialOrd, Eq, PartialEq, Hash)]
pub struct TokenPosition {
    pub line: usize,
    pub column: usize,
    pub offset: usize,
}

impl TokenPosition {
    /// Creates a new position
    pub const fn new(line: usize, column: usize, offset: usize) -> Self {
        Self {
            line,
            column,
            offset,
        }
    }

    /// Moves this position past the given character.
    ///
    /// A line feed is accounted to the line it ends, so the position after it is column 0 of
    /// the next line.
    pub fn advance(&mut self, c: char) {
        self.offset += c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.column = 0;
        } else {
            self.column += 1;
        }
    }

    /// Moves this position past every character of `s`
    pub fn advance_str(&mut self, s: &str) {
        for c in s.chars() {
            self.advance(c);
        }
    }

    /// The 1-based line number shown to users
    pub const fn human_line(&self) -> usize {
        self.line + 1
    }

    /// The 1-based column number shown to users
    pub const fn human_column(&self) -> usize {
        self.column + 1
    }
}

impl Display for TokenPosition {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.human_line(), self.human_column())
    }
}

/// A position along with the file it is in
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Location {
    file: PathBuf,
    position: TokenPosition,
}

impl Location {
    /// Creates a new location
    pub fn new(file: impl AsRef<Path>, position: TokenPosition) -> Self {
        Self {
            file: file.as_ref().to_path_buf(),
            position,
        }
    }

    /// The file of this location
    pub fn file(&self) -> &Path {
        &self.file
    }

    /// The position within the file
    pub fn position(&self) -> TokenPosition {
        self.position
    }
}

impl Display for Location {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.file.display(), self.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_columns() {
        let mut position = TokenPosition::default();
        position.advance_str("abc");
        assert_eq!(position, TokenPosition::new(0, 3, 3));
    }

    #[test]
    fn test_line_feed_starts_next_line() {
        let mut position = TokenPosition::default();
        position.advance_str("ab\n");
        assert_eq!(position, TokenPosition::new(1, 0, 3));
        position.advance('c');
        assert_eq!(position, TokenPosition::new(1, 1, 4));
    }

    #[test]
    fn test_offset_counts_bytes() {
        let mut position = TokenPosition::default();
        position.advance('é');
        assert_eq!(position.column, 1);
        assert_eq!(position.offset, 2);
    }

    #[test]
    fn test_human_display_is_one_based() {
        let location = Location::new("main.andy", TokenPosition::new(0, 4, 4));
        assert_eq!(location.to_string(), "main.andy:1:5");
    }
}
