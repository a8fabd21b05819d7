use crate::lexer::BufferError;
use andy_tokens::spanned::Location;
use andy_tokens::token::Token;
use andy_tokens::SpannedError;
use std::fmt::{Display, Formatter};

/// Represents an error occurring during parsing
#[derive(Debug, thiserror::Error)]
pub struct SyntaxError {
    pub kind: SpannedError<ErrorKind>,
    pub non_terminal_stack: Vec<&'static str>,
}

impl SyntaxError {
    /// Creates a new error
    pub fn new(
        kind: ErrorKind,
        location: impl Into<Option<Location>>,
        non_terminals: Vec<&'static str>,
    ) -> Self {
        Self {
            kind: SpannedError::new(kind, location),
            non_terminal_stack: non_terminals,
        }
    }

    pub fn kind(&self) -> &ErrorKind {
        self.kind.error()
    }

    pub fn location(&self) -> Option<&Location> {
        self.kind.location()
    }
}

impl Display for SyntaxError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "syntax error: {}", self.kind)?;
        if !self.non_terminal_stack.is_empty() {
            writeln!(f, "non terminal stack:")?;
            for (idx, non_terminal) in self.non_terminal_stack.iter().enumerate() {
                writeln!(f, "  {idx}: {non_terminal}")?;
            }
        }
        Ok(())
    }
}

/// [SyntaxError] kind
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum ErrorKind {
    #[error("expected {}, found {found}", .expected.join(" or "))]
    ExpectedToken { expected: Vec<String>, found: String },
    #[error("unexpected end of input, expected {}", .expected.join(" or "))]
    UnexpectedEof { expected: Vec<String> },
    #[error("unexpected {0}")]
    UnexpectedToken(String),
    #[error("token buffer misuse: {0}")]
    Buffer(#[from] BufferError),
}

impl ErrorKind {
    /// The error for finding `found` where one of `expected` should have been
    pub fn expected_token(
        expected: impl IntoIterator<Item = impl AsRef<str>>,
        found: &Token<'_>,
    ) -> Self {
        let expected = expected
            .into_iter()
            .map(|s| s.as_ref().to_string())
            .collect();
        if found.is_eof() {
            Self::UnexpectedEof { expected }
        } else {
            Self::ExpectedToken {
                expected,
                found: describe(found),
            }
        }
    }

    pub fn unexpected_token(found: &Token<'_>) -> Self {
        Self::UnexpectedToken(describe(found))
    }
}

/// `keyword 'else'`, `identifier 'x'`, ...
fn describe(token: &Token<'_>) -> String {
    if token.is_eof() {
        "end of input".to_string()
    } else {
        format!("{} '{}'", token.human_type(), token.content())
    }
}

pub type SyntaxResult<T = ()> = std::result::Result<T, super::Err<SyntaxError>>;

#[cfg(test)]
mod tests {
    use super::*;
    use andy_tokens::spanned::TokenPosition;
    use andy_tokens::token::TokenType;
    use std::path::Path;

    #[test]
    fn test_expected_token_message() {
        let token = Token::new(
            Path::new("test.andy"),
            TokenPosition::default(),
            TokenPosition::new(0, 4, 4),
            "else",
            TokenType::Keyword,
        );
        let kind = ErrorKind::expected_token(["')'", "','"], &token);
        assert_eq!(kind.to_string(), "expected ')' or ',', found keyword 'else'");
    }

    #[test]
    fn test_expected_token_at_eof() {
        let eof = Token::eof(Path::new("test.andy"), TokenPosition::new(0, 7, 7));
        let kind = ErrorKind::expected_token(["identifier"], &eof);
        assert_eq!(
            kind,
            ErrorKind::UnexpectedEof {
                expected: vec!["identifier".to_string()]
            }
        );
        assert_eq!(
            kind.to_string(),
            "unexpected end of input, expected identifier"
        );
    }

    #[test]
    fn test_display_includes_location_and_stack() {
        let error = SyntaxError::new(
            ErrorKind::UnexpectedToken("operator '*'".to_string()),
            Location::new("test.andy", TokenPosition::new(2, 0, 20)),
            vec!["unit", "value"],
        );
        assert_eq!(
            error.to_string(),
            "syntax error: unexpected operator '*'\n  -> test.andy:3:1\nnon terminal stack:\n  0: unit\n  1: value\n"
        );
    }
}
