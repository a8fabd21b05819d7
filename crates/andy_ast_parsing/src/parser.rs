//! The recursive descent parser.
//!
//! [Parser::parse_node] looks at the classification of the next token and hands off to the
//! routine for it. Declarations are parsed in [declarations], values in [values].

use crate::lexer::{BufferError, Lexer};
use andy_ast::{Node, NodeKind};
use andy_tokens::token::{Token, TokenType};
use std::error::Error;
use std::fmt::{Display, Formatter};
use tracing::{debug, trace};

pub use error::*;

mod declarations;
mod error;
mod values;

/// An error produced while parsing
#[derive(Debug)]
pub enum Err<E> {
    /// the input is malformed, the tree built so far can still be used
    Error(E),
    /// the parser was used incorrectly
    Failure(E),
}

impl<E> Err<E> {
    pub fn cut(self) -> Self {
        match self {
            Err::Error(e) => Err::Failure(e),
            e @ Err::Failure(_) => e,
        }
    }

    pub fn convert<E2>(self) -> Err<E2>
    where
        E: Into<E2>,
    {
        match self {
            Err::Error(e) => Err::Error(e.into()),
            Err::Failure(e) => Err::Failure(e.into()),
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Err::Failure(_))
    }

    pub fn inner(&self) -> &E {
        match self {
            Err::Error(e) | Err::Failure(e) => e,
        }
    }

    pub fn into_inner(self) -> E {
        match self {
            Err::Error(e) | Err::Failure(e) => e,
        }
    }
}

impl<E: Error> Display for Err<E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Err::Error(e) => {
                write!(f, "recoverable error: {e}")
            }
            Err::Failure(e) => {
                write!(f, "unrecoverable error: {e}")
            }
        }
    }
}

impl<E: Error> Error for Err<E> {}

impl From<SyntaxError> for Err<SyntaxError> {
    fn from(value: SyntaxError) -> Self {
        Err::Error(value)
    }
}

/// Parses the token buffer of a [Lexer] into a tree
#[derive(Debug, Default)]
pub struct Parser {
    non_terminals: Vec<&'static str>,
}

impl Parser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses every node up to the end of file into a `unit` node
    pub fn parse_all<'s>(&mut self, lexer: &mut Lexer<'s>) -> SyntaxResult<Node<'s>> {
        match self.parse_all_partial(lexer) {
            (unit, None) => Ok(unit),
            (_, Some(error)) => Result::Err(error),
        }
    }

    /// Parses every node up to the end of file into a `unit` node, stopping at the first error.
    ///
    /// The unit holds every node that was completely parsed before the error.
    pub fn parse_all_partial<'s>(
        &mut self,
        lexer: &mut Lexer<'s>,
    ) -> (Node<'s>, Option<Err<SyntaxError>>) {
        let mut unit = Node::new(NodeKind::Unit);
        let error = loop {
            match self.at_end(lexer) {
                Ok(true) => break None,
                Ok(false) => {}
                Result::Err(e) => break Some(e),
            }
            match self.parse_node(lexer) {
                Ok(node) => unit.add_child(node),
                Result::Err(e) => break Some(e),
            }
        };
        match &error {
            None => debug!("parsed {} top level nodes", unit.children().len()),
            Some(e) => debug!(
                "parsing stopped after {} top level nodes: {e}",
                unit.children().len()
            ),
        }
        (unit, error)
    }

    /// Parses the node starting at the next token
    pub fn parse_node<'s>(&mut self, lexer: &mut Lexer<'s>) -> SyntaxResult<Node<'s>> {
        let Some(token) = lexer.peek().cloned() else {
            return Result::Err(self.buffer_exhausted(lexer));
        };
        match token.token_type() {
            TokenType::Comment => self.parse_comment(lexer),
            TokenType::Keyword => self.parse_keyword(lexer),
            TokenType::Identifier => self.parse_identifier(lexer),
            TokenType::Literal => self.parse_literal(lexer),
            TokenType::Delimiter => self.parse_delimiter(lexer),
            TokenType::Operator => self.parse_operator(lexer),
            TokenType::Preprocessor => self.parse_preprocessor(lexer),
            TokenType::Eof => self.parse_eof(lexer),
            TokenType::Undefined => {
                Result::Err(self.error(ErrorKind::unexpected_token(&token), &token))
            }
        }
    }

    fn parse_comment<'s>(&mut self, lexer: &mut Lexer<'s>) -> SyntaxResult<Node<'s>> {
        self.consume(lexer)?;
        trace!("skipping comment {:?}", lexer.previous_token());
        self.parse_node(lexer)
    }

    fn parse_delimiter<'s>(&mut self, lexer: &mut Lexer<'s>) -> SyntaxResult<Node<'s>> {
        let token = self.peek(lexer)?;
        match token.content() {
            "{" => self.parse_block(lexer),
            "[" | "(" => self.parse_value(lexer),
            ";" => {
                self.advance(lexer)?;
                self.parse_node(lexer)
            }
            _ => Result::Err(self.error(ErrorKind::unexpected_token(&token), &token)),
        }
    }

    fn parse_preprocessor<'s>(&mut self, lexer: &mut Lexer<'s>) -> SyntaxResult<Node<'s>> {
        let directive = self.advance(lexer)?;
        Ok(Node::with_token(NodeKind::Expansion, directive))
    }

    fn parse_eof<'s>(&mut self, lexer: &mut Lexer<'s>) -> SyntaxResult<Node<'s>> {
        let eof = self.peek(lexer)?;
        Result::Err(self.error(
            ErrorKind::expected_token(["a declaration or value"], &eof),
            &eof,
        ))
    }

    /// Runs `f` with `name` on top of the non-terminal stack
    fn non_terminal<'s, O>(
        &mut self,
        name: &'static str,
        lexer: &mut Lexer<'s>,
        f: impl FnOnce(&mut Self, &mut Lexer<'s>) -> SyntaxResult<O>,
    ) -> SyntaxResult<O> {
        self.non_terminals.push(name);
        trace!("entering {name} at {:?}", lexer.peek());
        let result = f(self, lexer);
        if let Result::Err(e) = &result {
            trace!("{name} failed: {}", e.inner().kind());
        }
        self.non_terminals.pop();
        result
    }

    /// Whether only comments and `;` remain before the end of the buffer. When they do, they are
    /// consumed and the cursor is left on the end of file token.
    fn at_end(&mut self, lexer: &mut Lexer<'_>) -> SyntaxResult<bool> {
        let at_end = Self::statement_lookahead(lexer).map_or(true, Token::is_eof);
        if at_end {
            self.skip_trivia(lexer)?;
        }
        Ok(at_end)
    }

    /// The next token that isn't a comment or `;`
    fn statement_lookahead<'l, 's>(lexer: &'l Lexer<'s>) -> Option<&'l Token<'s>> {
        lexer.tokens()[lexer.cursor().min(lexer.tokens().len())..]
            .iter()
            .find(|token| !is_trivia(token))
    }

    fn skip_trivia(&mut self, lexer: &mut Lexer<'_>) -> SyntaxResult<()> {
        while lexer.peek().is_some_and(is_trivia) {
            self.consume(lexer)?;
        }
        Ok(())
    }

    fn skip_comments(&mut self, lexer: &mut Lexer<'_>) -> SyntaxResult<()> {
        while lexer
            .peek()
            .is_some_and(|token| token.token_type() == TokenType::Comment)
        {
            self.consume(lexer)?;
        }
        Ok(())
    }

    fn consume(&mut self, lexer: &mut Lexer<'_>) -> SyntaxResult<()> {
        lexer
            .consume()
            .map_err(|e| self.failure(e, lexer.tokens().last()))
    }

    /// The next token that isn't a comment
    fn peek<'s>(&mut self, lexer: &mut Lexer<'s>) -> SyntaxResult<Token<'s>> {
        self.skip_comments(lexer)?;
        lexer
            .peek()
            .cloned()
            .ok_or_else(|| self.buffer_exhausted(lexer))
    }

    /// Takes the next token that isn't a comment
    fn advance<'s>(&mut self, lexer: &mut Lexer<'s>) -> SyntaxResult<Token<'s>> {
        let token = self.peek(lexer)?;
        self.consume(lexer)?;
        Ok(token)
    }

    fn check(
        &mut self,
        lexer: &mut Lexer<'_>,
        token_type: TokenType,
        content: &str,
    ) -> SyntaxResult<bool> {
        Ok(self.peek(lexer)?.is(token_type, content))
    }

    /// Takes the next token if it has the given type and content
    fn eat<'s>(
        &mut self,
        lexer: &mut Lexer<'s>,
        token_type: TokenType,
        content: &str,
    ) -> SyntaxResult<Option<Token<'s>>> {
        if self.check(lexer, token_type, content)? {
            self.advance(lexer).map(Some)
        } else {
            Ok(None)
        }
    }

    /// Takes the next token, which must have the given type and content
    fn expect<'s>(
        &mut self,
        lexer: &mut Lexer<'s>,
        token_type: TokenType,
        content: &str,
    ) -> SyntaxResult<Token<'s>> {
        let token = self.peek(lexer)?;
        if !token.is(token_type, content) {
            return Result::Err(self.error(
                ErrorKind::expected_token([format!("'{content}'")], &token),
                &token,
            ));
        }
        self.advance(lexer)
    }

    fn expect_identifier<'s>(&mut self, lexer: &mut Lexer<'s>) -> SyntaxResult<Token<'s>> {
        let token = self.peek(lexer)?;
        if token.token_type() != TokenType::Identifier {
            return Result::Err(self.error(
                ErrorKind::expected_token(["identifier"], &token),
                &token,
            ));
        }
        self.advance(lexer)
    }

    /// A recoverable error at the given token
    fn error(&self, kind: ErrorKind, token: &Token<'_>) -> Err<SyntaxError> {
        Err::Error(SyntaxError::new(
            kind,
            token.location(),
            self.non_terminals.clone(),
        ))
    }

    fn failure(&self, error: BufferError, near: Option<&Token<'_>>) -> Err<SyntaxError> {
        Err::Failure(SyntaxError::new(
            error.into(),
            near.map(Token::location),
            self.non_terminals.clone(),
        ))
    }

    /// The buffer ran out without an end of file token
    fn buffer_exhausted(&self, lexer: &Lexer<'_>) -> Err<SyntaxError> {
        self.failure(BufferError::CursorAtEnd, lexer.tokens().last())
    }
}

fn is_trivia(token: &Token<'_>) -> bool {
    token.token_type() == TokenType::Comment || token.is(TokenType::Delimiter, ";")
}
