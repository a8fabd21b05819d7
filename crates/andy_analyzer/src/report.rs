//! The report produced for a single source file

use crate::lint::{self, Warning};
use andy_ast::views::ClassDeclaration;
use andy_ast::{Node, NodeKind};
use andy_ast_parsing::parser::Parser;
use andy_ast_parsing::SourceFile;
use andy_tokens::spanned::{Location, TokenPosition};
use andy_tokens::token::{Token, TokenType};
use serde::Serialize;
use std::path::Path;
use std::time::Instant;
use tracing::debug;

/// Everything reported about a source file
#[derive(Debug, Serialize)]
pub struct Report {
    pub tokens: Vec<TokenEntry>,
    pub linter: Vec<Warning>,
    pub declarations: Vec<Declaration>,
    pub errors: Vec<Diagnostic>,
    /// Time spent analyzing, `<n>ms`
    pub elapsed: String,
}

/// A position in a file, 0-based
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Position {
    pub file: String,
    pub line: usize,
    pub column: usize,
    pub offset: usize,
}

impl Position {
    pub fn new(file: &Path, position: TokenPosition) -> Self {
        Self {
            file: file.display().to_string(),
            line: position.line,
            column: position.column,
            offset: position.offset,
        }
    }
}

impl From<&Location> for Position {
    fn from(location: &Location) -> Self {
        Self::new(location.file(), location.position())
    }
}

impl From<&Token<'_>> for Position {
    fn from(token: &Token<'_>) -> Self {
        Self::new(token.file(), token.start())
    }
}

/// A [Position] along with how many bytes follow it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Span {
    #[serde(flatten)]
    pub position: Position,
    pub length: usize,
}

impl Span {
    pub fn new(position: Position, length: usize) -> Self {
        Self { position, length }
    }
}

impl From<&Token<'_>> for Span {
    fn from(token: &Token<'_>) -> Self {
        Self::new(Position::from(token), token.len())
    }
}

#[derive(Debug, Serialize)]
pub struct TokenEntry {
    pub location: Span,
    #[serde(rename = "type")]
    pub token_type: &'static str,
}

impl From<&Token<'_>> for TokenEntry {
    fn from(token: &Token<'_>) -> Self {
        Self {
            location: Span::from(token),
            token_type: token.human_type(),
        }
    }
}

/// A top level declaration and every token referring to it
#[derive(Debug, Serialize)]
pub struct Declaration {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub name: String,
    pub location: Position,
    pub references: Vec<Position>,
}

/// An error that cut the analysis short
#[derive(Debug, Serialize)]
pub struct Diagnostic {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Position>,
}

impl Diagnostic {
    fn new(message: impl ToString, location: Option<&Location>) -> Self {
        Self {
            message: message.to_string(),
            location: location.map(Position::from),
        }
    }
}

/// Analyzes a source file.
///
/// Errors never stop the analysis. Whatever was tokenized and parsed before an error is still
/// reported, and the error itself is added to [Report::errors].
pub fn analyze(file: &SourceFile) -> Report {
    let start = Instant::now();
    let mut errors = vec![];

    let mut lexer = file.lexer();
    if let Err(error) = lexer.tokenize() {
        debug!("could not tokenize {}: {error}", file.path().display());
        errors.push(Diagnostic::new(error.error(), error.location()));
    }
    let tokens = lexer.tokens().iter().map(TokenEntry::from).collect();
    let mut linter = lint::lint_tokens(file.text(), lexer.tokens());

    let (unit, error) = Parser::new().parse_all_partial(&mut lexer);
    if let Some(error) = error {
        debug!("could not parse {}: {error}", file.path().display());
        let error = error.into_inner();
        errors.push(Diagnostic::new(error.kind(), error.location()));
    }
    linter.extend(lint::lint_tree(&unit));
    let declarations = declarations(&unit, lexer.tokens());

    Report {
        tokens,
        linter,
        declarations,
        errors,
        elapsed: format!("{}ms", start.elapsed().as_millis()),
    }
}

/// Classes declared at the top level
fn declarations(unit: &Node<'_>, tokens: &[Token<'_>]) -> Vec<Declaration> {
    unit.children_of_kind(NodeKind::ClassDeclaration)
        .filter_map(|node| match ClassDeclaration::try_from(node) {
            Ok(class) => Some(class),
            Err(e) => {
                debug!("skipping malformed class: {e}");
                None
            }
        })
        .map(|class| {
            let name = class.name.content();
            let references = tokens
                .iter()
                .filter(|token| token.is(TokenType::Identifier, name))
                .map(Position::from)
                .collect();
            Declaration {
                kind: "class",
                name: name.to_string(),
                location: Position::from(class.name),
                references,
            }
        })
        .collect()
}
