//! A lexical token from a source file

use crate::spanned::{Location, TokenPosition};
use std::borrow::Cow;
use std::fmt::{Debug, Display, Formatter};
use std::path::Path;

/// A lexical token from a source file
#[derive(Clone, PartialEq)]
pub struct Token<'s> {
    start: TokenPosition,
    end: TokenPosition,
    content: Cow<'s, str>,
    token_type: TokenType,
    literal: Option<Literal>,
    operator: OperatorKind,
    file: Cow<'s, Path>,
}

impl<'s> Token<'s> {
    /// Creates a new token
    pub fn new(
        file: impl Into<Cow<'s, Path>>,
        start: TokenPosition,
        end: TokenPosition,
        content: impl Into<Cow<'s, str>>,
        token_type: TokenType,
    ) -> Self {
        Self {
            start,
            end,
            content: content.into(),
            token_type,
            literal: None,
            operator: OperatorKind::None,
            file: file.into(),
        }
    }

    /// Creates the end of file token at the given position
    pub fn eof(file: impl Into<Cow<'s, Path>>, position: TokenPosition) -> Self {
        Self::new(file, position, position, "", TokenType::Eof)
    }

    /// Sets the decoded literal value of this token, making it a literal
    pub fn with_literal(mut self, literal: Literal) -> Self {
        self.token_type = TokenType::Literal;
        self.literal = Some(literal);
        self
    }

    /// Sets the operator of this token, making it an operator
    pub fn with_operator(mut self, operator: OperatorKind) -> Self {
        self.token_type = TokenType::Operator;
        self.operator = operator;
        self
    }

    /// The raw lexeme of this token.
    ///
    /// String literals keep their quotes and escapes here, see [Token::literal] for the decoded
    /// value.
    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn token_type(&self) -> TokenType {
        self.token_type
    }

    /// The decoded value, only present for literals
    pub fn literal(&self) -> Option<&Literal> {
        self.literal.as_ref()
    }

    pub fn literal_kind(&self) -> Option<LiteralKind> {
        self.literal.as_ref().map(Literal::kind)
    }

    /// The operator of this token, [OperatorKind::None] when this isn't an operator
    pub fn operator(&self) -> OperatorKind {
        self.operator
    }

    pub fn start(&self) -> TokenPosition {
        self.start
    }

    pub fn end(&self) -> TokenPosition {
        self.end
    }

    /// The file this token originates from
    pub fn file(&self) -> &Path {
        &self.file
    }

    /// The location of the start of this token
    pub fn location(&self) -> Location {
        Location::new(&self.file, self.start)
    }

    /// The number of source bytes this token covers
    pub fn len(&self) -> usize {
        self.end.offset - self.start.offset
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_eof(&self) -> bool {
        self.token_type == TokenType::Eof
    }

    /// Checks if this token has the given type and content
    pub fn is(&self, token_type: TokenType, content: &str) -> bool {
        self.token_type == token_type && self.content == content
    }

    /// The name used when presenting the type of this token to users
    pub fn human_type(&self) -> &'static str {
        self.token_type.into()
    }

    /// Extends this token so that it ends where `other` ends.
    ///
    /// The start, type, literal and operator of this token are kept while the content of
    /// `other` is appended to this token's content.
    pub fn merge(&mut self, other: &Token<'_>) {
        let mut content = std::mem::take(&mut self.content).into_owned();
        content.push_str(other.content());
        self.content = Cow::Owned(content);
        self.end = other.end;
    }

    /// The `file:line:column` this token starts at, 1-based
    pub fn human_start_position(&self) -> String {
        format!("{}:{}", self.file.display(), self.start)
    }

    /// A message reporting `what` at the position of this token
    pub fn error_message_at_current_position(&self, what: impl Display) -> String {
        format!("{}: error: {what}", self.human_start_position())
    }

    /// A message reporting that the input ended at this token
    pub fn unexpected_eof_message(&self) -> String {
        self.error_message_at_current_position("unexpected end of input")
    }

    /// Detaches this token from the source it was scanned from
    pub fn into_owned(self) -> Token<'static> {
        Token {
            start: self.start,
            end: self.end,
            content: Cow::Owned(self.content.into_owned()),
            token_type: self.token_type,
            literal: self.literal,
            operator: self.operator,
            file: Cow::Owned(self.file.into_owned()),
        }
    }
}

impl Debug for Token<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}({:?})@{}",
            self.human_type(),
            self.content,
            self.start
        )
    }
}

impl Display for Token<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.content)
    }
}

/// The lexical classification of a token
#[derive(
    Debug,
    Copy,
    Clone,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum TokenType {
    Undefined,
    Comment,
    Keyword,
    Identifier,
    Literal,
    Delimiter,
    Operator,
    Preprocessor,
    /// Only ever the last token of a buffer
    Eof,
}

/// The kind of a literal
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, strum::Display, strum::IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum LiteralKind {
    Null,
    Boolean,
    Integer,
    /// 32-bit float
    Float,
    /// 64-bit float
    Double,
    String,
}

/// A decoded literal value
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Null,
    Boolean(bool),
    Integer(i64),
    Float(f32),
    Double(f64),
    String(String),
}

impl Literal {
    pub fn kind(&self) -> LiteralKind {
        match self {
            Literal::Null => LiteralKind::Null,
            Literal::Boolean(_) => LiteralKind::Boolean,
            Literal::Integer(_) => LiteralKind::Integer,
            Literal::Float(_) => LiteralKind::Float,
            Literal::Double(_) => LiteralKind::Double,
            Literal::String(_) => LiteralKind::String,
        }
    }

    /// The decoded string, if this is a string literal
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Literal::String(s) => Some(s),
            _ => None,
        }
    }
}

/// Operators, along with their symbols
#[derive(
    Debug,
    Copy,
    Clone,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
pub enum OperatorKind {
    #[strum(serialize = "+")]
    Plus,
    #[strum(serialize = "-")]
    Minus,
    #[strum(serialize = "*")]
    Multiply,
    #[strum(serialize = "/")]
    Divide,
    #[strum(serialize = "%")]
    Modulo,
    #[strum(serialize = "**")]
    Power,
    #[strum(serialize = "&&")]
    And,
    #[strum(serialize = "||")]
    Or,
    #[strum(serialize = "!")]
    Not,
    #[strum(serialize = "==")]
    Equal,
    #[strum(serialize = "!=")]
    NotEqual,
    #[strum(serialize = "<")]
    Less,
    #[strum(serialize = "<=")]
    LessEqual,
    #[strum(serialize = ">")]
    Greater,
    #[strum(serialize = ">=")]
    GreaterEqual,
    #[strum(serialize = "++")]
    Increment,
    #[strum(serialize = "--")]
    Decrement,
    #[default]
    #[strum(serialize = "none")]
    None,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn token<'s>(content: &'s str, start: usize, token_type: TokenType) -> Token<'s> {
        let start = TokenPosition::new(0, start, start);
        let mut end = start;
        end.advance_str(content);
        Token::new(Path::new("test.andy"), start, end, content, token_type)
    }

    #[test]
    fn test_merge_keeps_start_and_type() {
        let mut id = token("object", 0, TokenType::Identifier);
        let dot = token(".", 6, TokenType::Delimiter);
        let field = token("field", 7, TokenType::Identifier);
        id.merge(&dot);
        id.merge(&field);
        assert_eq!(id.content(), "object.field");
        assert_eq!(id.token_type(), TokenType::Identifier);
        assert_eq!(id.start(), TokenPosition::new(0, 0, 0));
        assert_eq!(id.end(), TokenPosition::new(0, 12, 12));
        assert_eq!(id.len(), 12);
    }

    #[test]
    fn test_literal_kind() {
        let t = token("1.5f", 0, TokenType::Undefined).with_literal(Literal::Float(1.5));
        assert_eq!(t.token_type(), TokenType::Literal);
        assert_eq!(t.literal_kind(), Some(LiteralKind::Float));
        assert_eq!(t.operator(), OperatorKind::None);
    }

    #[test]
    fn test_operator_symbols() {
        assert_eq!(OperatorKind::from_str("**").unwrap(), OperatorKind::Power);
        assert_eq!(OperatorKind::from_str("<=").unwrap(), OperatorKind::LessEqual);
        assert_eq!(OperatorKind::Increment.to_string(), "++");
        assert!(OperatorKind::from_str("=").is_err());
    }

    #[test]
    fn test_human_type_names() {
        assert_eq!(token("x", 0, TokenType::Identifier).human_type(), "identifier");
        assert_eq!(TokenType::Preprocessor.to_string(), "preprocessor");
        assert_eq!(TokenType::Eof.to_string(), "eof");
    }

    #[test]
    fn test_error_messages() {
        let t = token("oops", 3, TokenType::Identifier);
        assert_eq!(
            t.error_message_at_current_position("expected ')'"),
            "test.andy:1:4: error: expected ')'"
        );
        let eof = Token::eof(Path::new("test.andy"), TokenPosition::new(4, 0, 40));
        assert_eq!(
            eof.unexpected_eof_message(),
            "test.andy:5:1: error: unexpected end of input"
        );
    }

    #[test]
    fn test_into_owned_outlives_source() {
        let owned = {
            let source = String::from("name");
            let t = Token::new(
                Path::new("test.andy"),
                TokenPosition::default(),
                TokenPosition::new(0, 4, 4),
                source.as_str(),
                TokenType::Identifier,
            );
            t.into_owned()
        };
        assert_eq!(owned.content(), "name");
        assert_eq!(owned.file(), Path::new("test.andy"));
    }
}
