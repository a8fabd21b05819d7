#![doc = include_str!("../README.md")]

use crate::lexer::LexingError;
use crate::parser::{Parser, SyntaxError};
use andy_ast::Node;

pub mod lexer;
pub mod parser;
pub mod source;

pub use source::SourceFile;

/// An error from either stage of turning source text into a tree
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Lex(#[from] LexingError),
    #[error(transparent)]
    Syntax(#[from] parser::Err<SyntaxError>),
}

/// Tokenizes and parses a source file.
///
/// No preprocessing happens in between, so preprocessor directives end up as `expansion` nodes.
pub fn parse_source(file: &SourceFile) -> Result<Node<'_>, Error> {
    let mut lexer = file.lexer();
    lexer.tokenize()?;
    let unit = Parser::new().parse_all(&mut lexer)?;
    Ok(unit)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_source() {
        let file = SourceFile::new("main.andy", "class A {}");
        let unit = parse_source(&file).unwrap();
        assert_eq!(unit.children().len(), 1);
    }

    #[test]
    fn test_parse_source_lex_error() {
        let file = SourceFile::new("main.andy", "var s = 'open");
        assert!(matches!(parse_source(&file), Err(Error::Lex(_))));
    }
}
