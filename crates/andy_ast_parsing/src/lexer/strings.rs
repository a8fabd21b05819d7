//! String literal extraction

use andy_tokens::token::Literal;

use super::token_parsing::parse_escaped_char;
use super::{LexErrorKind, Lexer, LexingError};

impl<'s> Lexer<'s> {
    /// Scans a string literal opened by `quote`.
    ///
    /// The token keeps the raw lexeme while its literal holds the decoded text. Inside `"`
    /// strings, `${ ... }` interpolations are copied verbatim.
    pub(super) fn extract_and_push_string(&mut self, quote: char) -> Result<(), LexingError> {
        self.read();
        let mut decoded = String::new();
        loop {
            match self.peek_char() {
                None => return Err(self.error(LexErrorKind::UnterminatedString)),
                Some(c) if c == quote => {
                    self.read();
                    break;
                }
                Some('\\') => {
                    let c = self.read_escape()?;
                    decoded.push(c);
                }
                Some('$') if quote == '"' && self.remaining.starts_with("${") => {
                    self.copy_interpolation(&mut decoded)?;
                }
                Some(c) => {
                    self.read();
                    decoded.push(c);
                }
            }
        }
        self.push_literal(Literal::String(decoded));
        Ok(())
    }

    /// Decodes an escape sequence. Unknown escapes decode to the escaped character.
    fn read_escape(&mut self) -> Result<char, LexingError> {
        if let Ok((rest, c)) = parse_escaped_char(self.remaining) {
            self.read_len(self.remaining.len() - rest.len());
            return Ok(c);
        }
        self.read();
        self.read()
            .ok_or_else(|| self.error(LexErrorKind::UnterminatedString))
    }

    /// Copies `${ ... }` into `out`, skipping over any string literals nested inside
    fn copy_interpolation(&mut self, out: &mut String) -> Result<(), LexingError> {
        self.copy_char(out);
        self.copy_char(out);
        let mut depth = 1usize;
        while depth > 0 {
            match self.peek_char() {
                None => return Err(self.error(LexErrorKind::UnterminatedString)),
                Some('{') => depth += 1,
                Some('}') => depth -= 1,
                Some(quote @ ('"' | '\'')) => {
                    self.copy_nested_string(quote, out)?;
                    continue;
                }
                Some(_) => {}
            }
            self.copy_char(out);
        }
        Ok(())
    }

    fn copy_nested_string(&mut self, quote: char, out: &mut String) -> Result<(), LexingError> {
        self.copy_char(out);
        loop {
            match self.peek_char() {
                None => return Err(self.error(LexErrorKind::UnterminatedString)),
                Some(c) if c == quote => {
                    self.copy_char(out);
                    return Ok(());
                }
                Some('\\') => {
                    self.copy_char(out);
                    if self.copy_char(out).is_none() {
                        return Err(self.error(LexErrorKind::UnterminatedString));
                    }
                }
                Some('$') if quote == '"' && self.remaining.starts_with("${") => {
                    self.copy_interpolation(out)?;
                }
                Some(_) => {
                    self.copy_char(out);
                }
            }
        }
    }

    fn copy_char(&mut self, out: &mut String) -> Option<char> {
        let c = self.read()?;
        out.push(c);
        Some(c)
    }
}

#[cfg(test)]
mod tests {
    use crate::lexer::{LexErrorKind, Lexer};
    use andy_tokens::spanned::TokenPosition;
    use andy_tokens::token::{Literal, TokenType};
    use std::path::Path;
    use test_log::test;

    fn single_string(source: &str) -> (String, String) {
        let mut lexer = Lexer::new(Path::new("test.andy"), source);
        lexer.tokenize().expect("could not tokenize");
        assert_eq!(lexer.tokens().len(), 2, "{:?}", lexer.tokens());
        let token = &lexer.tokens()[0];
        assert_eq!(token.token_type(), TokenType::Literal);
        let Some(Literal::String(decoded)) = token.literal() else {
            panic!("not a string: {token:?}");
        };
        (token.content().to_string(), decoded.clone())
    }

    #[test]
    fn test_escapes_are_decoded() {
        let (content, decoded) = single_string(r#""a\nb""#);
        assert_eq!(content, r#""a\nb""#);
        assert_eq!(decoded, "a\nb");
        let (_, decoded) = single_string(r#""tab\t\"q\" \u{41} \$""#);
        assert_eq!(decoded, "tab\t\"q\" A $");
    }

    #[test]
    fn test_unknown_escape_keeps_character() {
        let (_, decoded) = single_string(r#""\q""#);
        assert_eq!(decoded, "q");
    }

    #[test]
    fn test_single_quotes() {
        let (content, decoded) = single_string("'it'");
        assert_eq!(content, "'it'");
        assert_eq!(decoded, "it");
        let (_, decoded) = single_string(r"'a\'b'");
        assert_eq!(decoded, "a'b");
    }

    #[test]
    fn test_interpolation_with_nested_string() {
        let source = r#""x${f("}")}y""#;
        let (content, decoded) = single_string(source);
        assert_eq!(content, source);
        assert_eq!(decoded, r#"x${f("}")}y"#);
    }

    #[test]
    fn test_interpolation_with_nested_braces() {
        let (_, decoded) = single_string(r#""${ {a: 1}["a"] } done""#);
        assert_eq!(decoded, r#"${ {a: 1}["a"] } done"#);
    }

    #[test]
    fn test_single_quoted_strings_do_not_interpolate() {
        let (_, decoded) = single_string("'${'");
        assert_eq!(decoded, "${");
    }

    #[test]
    fn test_unterminated_string_reported_at_opening_quote() {
        let mut lexer = Lexer::new(Path::new("test.andy"), "var s =\n  \"abc");
        let error = lexer.tokenize().unwrap_err();
        assert_eq!(error.error(), &LexErrorKind::UnterminatedString);
        assert_eq!(
            error.location().unwrap().position(),
            TokenPosition::new(1, 2, 10)
        );
        assert!(lexer.tokens().last().unwrap().is_eof());
    }

    #[test]
    fn test_unterminated_interpolation() {
        let mut lexer = Lexer::new(Path::new("test.andy"), r#""${ "}" "#);
        let error = lexer.tokenize().unwrap_err();
        assert_eq!(error.error(), &LexErrorKind::UnterminatedString);
    }
}
