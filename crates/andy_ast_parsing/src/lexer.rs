//! The lexer, which scans source text into a token buffer.
//!
//! The buffer has a cursor and can be edited in place, so a preprocessor can splice tokens into
//! it before it is handed to the [Parser](crate::parser::Parser).

use andy_tokens::spanned::{Location, TokenPosition};
use andy_tokens::token::{Literal, Token, TokenType};
use andy_tokens::SpannedError;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, trace};

use token_parsing::Symbol;

mod strings;
pub mod token_parsing;

/// Words that are always keywords
pub const KEYWORDS: &[&str] = &[
    "class", "extends", "fn", "var", "const", "for", "in", "if", "else", "return",
];

/// The kind of a [LexingError]
#[derive(Debug, Error, PartialEq)]
pub enum LexErrorKind {
    #[error("invalid character {0:?}")]
    InvalidChar(char),
    #[error("unterminated string")]
    UnterminatedString,
    #[error("unterminated block comment")]
    UnterminatedComment,
    #[error("invalid number literal {0:?}")]
    InvalidNumber(String),
}

/// A lexical error, along with where it happened
pub type LexingError = SpannedError<LexErrorKind>;

/// Misuse of the token buffer
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BufferError {
    #[error("cannot roll back before the first token")]
    RollbackAtStart,
    #[error("cannot move past the last token")]
    CursorAtEnd,
    #[error("cannot erase {requested} tokens when only {available} remain after the cursor")]
    EraseOutOfRange { requested: usize, available: usize },
}

/// Scans a source file into a buffer of tokens
#[derive(Debug)]
pub struct Lexer<'s> {
    file: &'s Path,
    source: &'s str,
    remaining: &'s str,
    /// where the token being scanned starts
    start: TokenPosition,
    position: TokenPosition,
    tokens: Vec<Token<'s>>,
    cursor: usize,
}

impl<'s> Lexer<'s> {
    /// Creates a lexer over `source`, which was read from `file`
    pub fn new(file: &'s Path, source: &'s str) -> Self {
        Self {
            file,
            source,
            remaining: source,
            start: TokenPosition::default(),
            position: TokenPosition::default(),
            tokens: vec![],
            cursor: 0,
        }
    }

    pub fn file(&self) -> &'s Path {
        self.file
    }

    pub fn source(&self) -> &'s str {
        self.source
    }

    /// Scans the whole source into the token buffer, replacing its contents.
    ///
    /// The buffer always ends with exactly one end of file token, even when scanning fails, in
    /// which case it holds every token scanned before the error.
    pub fn tokenize(&mut self) -> Result<(), LexingError> {
        self.tokens.clear();
        self.cursor = 0;
        self.remaining = self.source;
        self.start = TokenPosition::default();
        self.position = TokenPosition::default();

        let result = self.scan();
        let eof = Token::eof(self.file, self.position);
        self.tokens.push(eof);
        match &result {
            Ok(()) => debug!(
                "tokenized {} into {} tokens",
                self.file.display(),
                self.tokens.len()
            ),
            Err(e) => debug!("tokenizing {} failed: {e}", self.file.display()),
        }
        result
    }

    fn scan(&mut self) -> Result<(), LexingError> {
        loop {
            self.discard_whitespace();
            let Some(c) = self.peek_char() else {
                return Ok(());
            };
            self.read_next_token(c)?;
        }
    }

    fn read_next_token(&mut self, c: char) -> Result<(), LexingError> {
        match c {
            c if c.is_ascii_alphabetic() || c == '_' => self.read_word(),
            c if c.is_ascii_digit() => self.read_number(),
            '"' | '\'' => self.extract_and_push_string(c),
            '/' if self.remaining.starts_with("//") => {
                self.read_with(token_parsing::parse_line_comment, TokenType::Comment)
            }
            '/' if self.remaining.starts_with("/*") => {
                if token_parsing::parse_block_comment(self.remaining).is_err() {
                    return Err(self.error(LexErrorKind::UnterminatedComment));
                }
                self.read_with(token_parsing::parse_block_comment, TokenType::Comment)
            }
            '#' => self.read_with(
                token_parsing::parse_preprocessor_directive,
                TokenType::Preprocessor,
            ),
            c => self.read_symbol(c),
        }
    }

    fn read_word(&mut self) -> Result<(), LexingError> {
        let Ok((_, word)) = token_parsing::recognize_identifier(self.remaining) else {
            return Err(self.invalid_char());
        };
        self.read_len(word.len());
        match word {
            "true" => self.push_literal(Literal::Boolean(true)),
            "false" => self.push_literal(Literal::Boolean(false)),
            "null" => self.push_literal(Literal::Null),
            word if KEYWORDS.contains(&word) => self.push_token(TokenType::Keyword),
            _ => self.push_token(TokenType::Identifier),
        }
        Ok(())
    }

    fn read_number(&mut self) -> Result<(), LexingError> {
        let Ok((_, lexeme)) = token_parsing::recognize_number(self.remaining) else {
            return Err(self.invalid_char());
        };
        let literal = token_parsing::decode_number(lexeme).map_err(|kind| self.error(kind))?;
        self.read_len(lexeme.len());
        self.push_literal(literal);
        Ok(())
    }

    fn read_symbol(&mut self, c: char) -> Result<(), LexingError> {
        let Ok((_, (lexeme, symbol))) = token_parsing::parse_symbol(self.remaining) else {
            return Err(self.error(LexErrorKind::InvalidChar(c)));
        };
        self.read_len(lexeme.len());
        match symbol {
            Symbol::Operator(operator) => {
                let token = self.take_token(TokenType::Operator).with_operator(operator);
                self.emit(token);
            }
            Symbol::Delimiter => self.push_token(TokenType::Delimiter),
        }
        Ok(())
    }

    /// Reads whatever `recognizer` matches as a token of the given type
    fn read_with(
        &mut self,
        recognizer: impl Fn(&'s str) -> nom::IResult<&'s str, &'s str>,
        token_type: TokenType,
    ) -> Result<(), LexingError> {
        let Ok((_, lexeme)) = recognizer(self.remaining) else {
            return Err(self.invalid_char());
        };
        self.read_len(lexeme.len());
        self.push_token(token_type);
        Ok(())
    }

    fn peek_char(&self) -> Option<char> {
        self.remaining.chars().next()
    }

    /// Moves past the next character, keeping it in the token being scanned
    fn read(&mut self) -> Option<char> {
        let c = self.peek_char()?;
        self.remaining = &self.remaining[c.len_utf8()..];
        self.position.advance(c);
        Some(c)
    }

    /// Reads `len` bytes worth of characters
    fn read_len(&mut self, len: usize) {
        let (read, rest) = self.remaining.split_at(len);
        self.position.advance_str(read);
        self.remaining = rest;
    }

    /// Moves past the next character without keeping it
    fn discard(&mut self) -> Option<char> {
        let c = self.read()?;
        self.start = self.position;
        Some(c)
    }

    fn discard_whitespace(&mut self) {
        while self.peek_char().is_some_and(char::is_whitespace) {
            self.discard();
        }
    }

    /// The text of the token being scanned
    fn buffer(&self) -> &'s str {
        &self.source[self.start.offset..self.position.offset]
    }

    fn take_token(&mut self, token_type: TokenType) -> Token<'s> {
        let token = Token::new(
            self.file,
            self.start,
            self.position,
            self.buffer(),
            token_type,
        );
        self.start = self.position;
        token
    }

    fn push_token(&mut self, token_type: TokenType) {
        let token = self.take_token(token_type);
        self.emit(token);
    }

    fn push_literal(&mut self, literal: Literal) {
        let token = self.take_token(TokenType::Literal).with_literal(literal);
        self.emit(token);
    }

    fn emit(&mut self, token: Token<'s>) {
        trace!("scanned {token:?}");
        self.tokens.push(token);
    }

    /// An error at the start of the token being scanned
    fn error(&self, kind: LexErrorKind) -> LexingError {
        SpannedError::new(kind, Location::new(self.file, self.start))
    }

    fn invalid_char(&self) -> LexingError {
        let c = self.source[self.start.offset..].chars().next().unwrap_or('\0');
        self.error(LexErrorKind::InvalidChar(c))
    }

    /// The index of the next token
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Moves the cursor back to the first token
    pub fn reset(&mut self) {
        self.cursor = 0;
    }

    pub fn has_next(&self) -> bool {
        self.cursor < self.tokens.len()
    }

    /// The next token, without moving the cursor
    pub fn peek(&self) -> Option<&Token<'s>> {
        self.tokens.get(self.cursor)
    }

    /// The token `n` places after the next token, without moving the cursor
    pub fn peek_nth(&self, n: usize) -> Option<&Token<'s>> {
        self.cursor
            .checked_add(n)
            .and_then(|index| self.tokens.get(index))
    }

    /// Returns the next token and moves the cursor past it
    pub fn next_token(&mut self) -> Option<&Token<'s>> {
        let token = self.tokens.get(self.cursor)?;
        self.cursor += 1;
        Some(token)
    }

    /// The token most recently returned by [Lexer::next_token]
    pub fn previous_token(&self) -> Option<&Token<'s>> {
        self.tokens.get(self.cursor.checked_sub(1)?)
    }

    /// Moves the cursor past the next token
    pub fn consume(&mut self) -> Result<(), BufferError> {
        if !self.has_next() {
            return Err(BufferError::CursorAtEnd);
        }
        self.cursor += 1;
        Ok(())
    }

    /// Moves the cursor back by one token
    pub fn rollback(&mut self) -> Result<(), BufferError> {
        self.cursor = self
            .cursor
            .checked_sub(1)
            .ok_or(BufferError::RollbackAtStart)?;
        Ok(())
    }

    /// Inserts tokens at the cursor. The cursor ends up after the inserted tokens, on the
    /// token it pointed at before.
    pub fn insert<I>(&mut self, tokens: I)
    where
        I: IntoIterator<Item = Token<'s>>,
    {
        let before = self.tokens.len();
        self.tokens.splice(self.cursor..self.cursor, tokens);
        let inserted = self.tokens.len() - before;
        trace!("inserted {inserted} tokens at {}", self.cursor);
        self.cursor += inserted;
    }

    /// Removes `count` tokens starting at the cursor. The cursor is not moved.
    pub fn erase(&mut self, count: usize) -> Result<(), BufferError> {
        let available = self.tokens.len().saturating_sub(self.cursor);
        if count > available {
            return Err(BufferError::EraseOutOfRange {
                requested: count,
                available,
            });
        }
        self.tokens.drain(self.cursor..self.cursor + count);
        trace!("erased {count} tokens at {}", self.cursor);
        Ok(())
    }

    /// Removes the trailing end of file token, returning whether there was one
    pub fn erase_eof(&mut self) -> bool {
        if !self.tokens.last().is_some_and(Token::is_eof) {
            return false;
        }
        self.tokens.pop();
        self.cursor = self.cursor.min(self.tokens.len());
        true
    }

    /// Appends an end of file token where the last token ends, unless the buffer already ends
    /// with one
    pub fn push_eof(&mut self) {
        match self.tokens.last() {
            Some(last) if last.is_eof() => {}
            Some(last) => {
                let eof = Token::eof(last.file().to_path_buf(), last.end());
                self.tokens.push(eof);
            }
            None => self.tokens.push(Token::eof(self.file, self.position)),
        }
    }

    /// The whole buffer
    pub fn tokens(&self) -> &[Token<'s>] {
        &self.tokens
    }

    pub fn into_tokens(self) -> Vec<Token<'s>> {
        self.tokens
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use andy_tokens::token::OperatorKind;
    use test_log::test;

    fn tokenize(source: &str) -> Lexer<'_> {
        let mut lexer = Lexer::new(Path::new("test.andy"), source);
        lexer.tokenize().expect("could not tokenize");
        lexer
    }

    fn kinds<'a>(lexer: &'a Lexer<'_>) -> Vec<(TokenType, &'a str)> {
        lexer
            .tokens()
            .iter()
            .map(|t| (t.token_type(), t.content()))
            .collect()
    }

    #[test]
    fn test_single_trailing_eof() {
        let source = "var x = 1  \n";
        let lexer = tokenize(source);
        let eofs = lexer.tokens().iter().filter(|t| t.is_eof()).count();
        assert_eq!(eofs, 1);
        let last = lexer.tokens().last().unwrap();
        assert!(last.is_eof());
        assert_eq!(last.start().offset, source.len());
        assert_eq!(last.start().line, 1);
    }

    #[test]
    fn test_empty_source() {
        let lexer = tokenize("");
        assert_eq!(kinds(&lexer), vec![(TokenType::Eof, "")]);
    }

    #[test]
    fn test_classification() {
        let lexer = tokenize("class Foo extends Bar { var x = true; } // done\n#define X");
        assert_eq!(
            kinds(&lexer),
            vec![
                (TokenType::Keyword, "class"),
                (TokenType::Identifier, "Foo"),
                (TokenType::Keyword, "extends"),
                (TokenType::Identifier, "Bar"),
                (TokenType::Delimiter, "{"),
                (TokenType::Keyword, "var"),
                (TokenType::Identifier, "x"),
                (TokenType::Delimiter, "="),
                (TokenType::Literal, "true"),
                (TokenType::Delimiter, ";"),
                (TokenType::Delimiter, "}"),
                (TokenType::Comment, "// done"),
                (TokenType::Preprocessor, "#define X"),
                (TokenType::Eof, ""),
            ]
        );
        assert_eq!(lexer.tokens()[8].literal(), Some(&Literal::Boolean(true)));
    }

    #[test]
    fn test_maximal_munch() {
        let lexer = tokenize("a==b**c");
        assert_eq!(
            kinds(&lexer),
            vec![
                (TokenType::Identifier, "a"),
                (TokenType::Operator, "=="),
                (TokenType::Identifier, "b"),
                (TokenType::Operator, "**"),
                (TokenType::Identifier, "c"),
                (TokenType::Eof, ""),
            ]
        );
        assert_eq!(lexer.tokens()[1].operator(), OperatorKind::Equal);
        assert_eq!(lexer.tokens()[3].operator(), OperatorKind::Power);
    }

    #[test]
    fn test_numbers() {
        let lexer = tokenize("12 0x1F 1.5 2f 1_000");
        let literals: Vec<_> = lexer.tokens().iter().filter_map(Token::literal).collect();
        assert_eq!(
            literals,
            vec![
                &Literal::Integer(12),
                &Literal::Integer(31),
                &Literal::Double(1.5),
                &Literal::Float(2.0),
                &Literal::Integer(1000),
            ]
        );
    }

    #[test]
    fn test_positions() {
        let lexer = tokenize("a\n  bc");
        let bc = &lexer.tokens()[1];
        assert_eq!(bc.start(), TokenPosition::new(1, 2, 4));
        assert_eq!(bc.end(), TokenPosition::new(1, 4, 6));
    }

    #[test]
    fn test_block_comment_spans_lines() {
        let lexer = tokenize("/* a\nb */ x");
        assert_eq!(lexer.tokens()[0].content(), "/* a\nb */");
        assert_eq!(lexer.tokens()[1].start(), TokenPosition::new(1, 5, 10));
    }

    #[test]
    fn test_invalid_char() {
        let mut lexer = Lexer::new(Path::new("test.andy"), "a @ b");
        let error = lexer.tokenize().unwrap_err();
        assert_eq!(error.error(), &LexErrorKind::InvalidChar('@'));
        assert_eq!(
            error.location().map(|l| l.position()),
            Some(TokenPosition::new(0, 2, 2))
        );
        assert_eq!(
            kinds(&lexer),
            vec![(TokenType::Identifier, "a"), (TokenType::Eof, "")]
        );
    }

    #[test]
    fn test_unterminated_comment() {
        let mut lexer = Lexer::new(Path::new("test.andy"), "x /* never");
        let error = lexer.tokenize().unwrap_err();
        assert_eq!(error.error(), &LexErrorKind::UnterminatedComment);
        assert_eq!(error.location().unwrap().position().column, 2);
    }

    #[test]
    fn test_tokenize_twice_is_identical() {
        let mut lexer = tokenize("fn f(a, b) { return a ** b }");
        let first = lexer.tokens().to_vec();
        lexer.next_token();
        lexer.tokenize().unwrap();
        assert_eq!(lexer.tokens(), first.as_slice());
        assert_eq!(lexer.cursor(), 0);
    }

    #[test]
    fn test_cursor_movement() {
        let mut lexer = tokenize("a b");
        assert!(lexer.previous_token().is_none());
        assert_eq!(lexer.rollback(), Err(BufferError::RollbackAtStart));
        assert_eq!(lexer.next_token().map(Token::content), Some("a"));
        assert_eq!(lexer.peek().map(Token::content), Some("b"));
        assert_eq!(lexer.previous_token().map(Token::content), Some("a"));
        lexer.consume().unwrap();
        assert!(lexer.peek().unwrap().is_eof());
        lexer.consume().unwrap();
        assert!(!lexer.has_next());
        assert_eq!(lexer.consume(), Err(BufferError::CursorAtEnd));
        assert!(lexer.next_token().is_none());
        lexer.rollback().unwrap();
        assert!(lexer.peek().unwrap().is_eof());
        lexer.reset();
        assert_eq!(lexer.cursor(), 0);
    }

    #[test]
    fn test_peek_nth() {
        let mut lexer = tokenize("a b");
        lexer.consume().unwrap();
        assert_eq!(lexer.peek_nth(0).map(Token::content), Some("b"));
        assert!(lexer.peek_nth(1).unwrap().is_eof());
        assert!(lexer.peek_nth(2).is_none());
        assert!(lexer.peek_nth(usize::MAX).is_none());
    }

    #[test]
    fn test_erase_then_insert() {
        let mut lexer = tokenize("A B C");
        let mut splice = tokenize("X Y");
        splice.erase_eof();
        lexer.consume().unwrap();
        assert_eq!(lexer.peek().map(Token::content), Some("B"));

        lexer.erase(1).unwrap();
        assert_eq!(
            kinds(&lexer),
            vec![
                (TokenType::Identifier, "A"),
                (TokenType::Identifier, "C"),
                (TokenType::Eof, ""),
            ]
        );
        assert_eq!(lexer.peek().map(Token::content), Some("C"));

        lexer.insert(splice.into_tokens());
        assert_eq!(
            kinds(&lexer),
            vec![
                (TokenType::Identifier, "A"),
                (TokenType::Identifier, "X"),
                (TokenType::Identifier, "Y"),
                (TokenType::Identifier, "C"),
                (TokenType::Eof, ""),
            ]
        );
        assert_eq!(lexer.cursor(), 3);
        assert_eq!(lexer.peek().map(Token::content), Some("C"));
    }

    #[test]
    fn test_erase_out_of_range() {
        let mut lexer = tokenize("A B");
        lexer.consume().unwrap();
        assert_eq!(
            lexer.erase(3),
            Err(BufferError::EraseOutOfRange {
                requested: 3,
                available: 2
            })
        );
        assert_eq!(lexer.tokens().len(), 3);
    }

    #[test]
    fn test_erase_and_push_eof() {
        let mut lexer = tokenize("A B  ");
        assert!(lexer.erase_eof());
        assert!(!lexer.erase_eof());
        assert_eq!(lexer.tokens().len(), 2);
        lexer.push_eof();
        lexer.push_eof();
        let eof = lexer.tokens().last().unwrap();
        assert!(eof.is_eof());
        assert_eq!(eof.start().offset, 3);
        assert_eq!(lexer.tokens().len(), 3);
    }
}
