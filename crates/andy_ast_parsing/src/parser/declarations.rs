//! Declarations, statements and blocks

use super::{ErrorKind, Parser, SyntaxResult};
use crate::lexer::Lexer;
use andy_ast::{Node, NodeKind};
use andy_tokens::token::TokenType;

impl Parser {
    pub(super) fn parse_keyword<'s>(&mut self, lexer: &mut Lexer<'s>) -> SyntaxResult<Node<'s>> {
        let keyword = self.peek(lexer)?;
        match keyword.content() {
            "class" => self.parse_class(lexer),
            "fn" if lexer
                .peek_nth(1)
                .is_some_and(|next| next.is(TokenType::Delimiter, "(")) =>
            {
                self.parse_value(lexer)
            }
            "fn" => self.parse_function(lexer),
            "var" | "const" => self.parse_variable(lexer),
            "for" => self.parse_for_each(lexer),
            "if" => self.parse_conditional(lexer),
            "return" => self.parse_return(lexer),
            _ => Err(self.error(ErrorKind::unexpected_token(&keyword), &keyword)),
        }
    }

    fn parse_class<'s>(&mut self, lexer: &mut Lexer<'s>) -> SyntaxResult<Node<'s>> {
        self.non_terminal("class", lexer, |parser, lexer| {
            let class = parser.expect(lexer, TokenType::Keyword, "class")?;
            let name = parser.expect_identifier(lexer)?;
            let mut node = Node::with_token(NodeKind::ClassDeclaration, class)
                .child(Node::with_token(NodeKind::NameDeclaration, name));
            if let Some(extends) = parser.eat(lexer, TokenType::Keyword, "extends")? {
                let base = parser.parse_chain(lexer)?;
                node.add_child(
                    Node::with_token(NodeKind::ClassBase, extends)
                        .child(Node::with_token(NodeKind::NameDeclaration, base)),
                );
            }
            node.add_child(parser.parse_block(lexer)?);
            Ok(node)
        })
    }

    fn parse_function<'s>(&mut self, lexer: &mut Lexer<'s>) -> SyntaxResult<Node<'s>> {
        self.non_terminal("function", lexer, |parser, lexer| {
            let keyword = parser.expect(lexer, TokenType::Keyword, "fn")?;
            let name = parser.expect_identifier(lexer)?;
            let mut node = Node::with_token(NodeKind::FunctionDeclaration, keyword)
                .child(Node::with_token(NodeKind::NameDeclaration, name));
            parser.parse_signature(lexer, &mut node)?;
            Ok(node)
        })
    }

    /// `fn (params) { ... }` used as a value
    pub(super) fn parse_function_object<'s>(
        &mut self,
        lexer: &mut Lexer<'s>,
    ) -> SyntaxResult<Node<'s>> {
        self.non_terminal("function object", lexer, |parser, lexer| {
            let keyword = parser.expect(lexer, TokenType::Keyword, "fn")?;
            let mut node = Node::with_token(NodeKind::FunctionObject, keyword);
            parser.parse_signature(lexer, &mut node)?;
            Ok(node)
        })
    }

    /// Parameters, return type and body of a function
    fn parse_signature<'s>(
        &mut self,
        lexer: &mut Lexer<'s>,
        function: &mut Node<'s>,
    ) -> SyntaxResult<()> {
        function.add_child(self.parse_parameters(lexer)?);
        let token = self.peek(lexer)?;
        if token.is(TokenType::Delimiter, ":") || token.is(TokenType::Delimiter, "->") {
            self.advance(lexer)?;
            function.add_child(self.parse_type_annotation(lexer)?);
        }
        function.add_child(self.parse_block(lexer)?);
        Ok(())
    }

    fn parse_parameters<'s>(&mut self, lexer: &mut Lexer<'s>) -> SyntaxResult<Node<'s>> {
        self.non_terminal("parameters", lexer, |parser, lexer| {
            let open = parser.expect(lexer, TokenType::Delimiter, "(")?;
            let mut parameters = Node::with_token(NodeKind::FunctionParameters, open);
            if parser.eat(lexer, TokenType::Delimiter, ")")?.is_some() {
                return Ok(parameters);
            }
            loop {
                let name = parser.expect_identifier(lexer)?;
                let mut parameter = Node::with_token(NodeKind::NameDeclaration, name);
                if parser.eat(lexer, TokenType::Delimiter, ":")?.is_some() {
                    parameter.add_child(parser.parse_type_annotation(lexer)?);
                }
                parameters.add_child(parameter);
                if parser.eat(lexer, TokenType::Delimiter, ",")?.is_none() {
                    break;
                }
            }
            parser.expect(lexer, TokenType::Delimiter, ")")?;
            Ok(parameters)
        })
    }

    /// `Name`, `a.b::Name` or either followed by `[]`
    fn parse_type_annotation<'s>(&mut self, lexer: &mut Lexer<'s>) -> SyntaxResult<Node<'s>> {
        self.non_terminal("type", lexer, |parser, lexer| {
            let mut name = parser.parse_chain(lexer)?;
            let is_array = parser.check(lexer, TokenType::Delimiter, "[")?
                && lexer
                    .peek_nth(1)
                    .is_some_and(|next| next.is(TokenType::Delimiter, "]"));
            if is_array {
                let open = parser.advance(lexer)?;
                let close = parser.advance(lexer)?;
                name.merge(&open);
                name.merge(&close);
            }
            Ok(Node::with_token(NodeKind::TypeAnnotation, name))
        })
    }

    fn parse_variable<'s>(&mut self, lexer: &mut Lexer<'s>) -> SyntaxResult<Node<'s>> {
        self.non_terminal("variable", lexer, |parser, lexer| {
            let keyword = parser.advance(lexer)?;
            let name = parser.expect_identifier(lexer)?;
            let mut node = Node::with_token(NodeKind::VariableDeclaration, keyword)
                .child(Node::with_token(NodeKind::NameDeclaration, name));
            if parser.eat(lexer, TokenType::Delimiter, ":")?.is_some() {
                node.add_child(parser.parse_type_annotation(lexer)?);
            }
            if parser.eat(lexer, TokenType::Delimiter, "=")?.is_some() {
                node.add_child(parser.parse_value(lexer)?);
            }
            Ok(node)
        })
    }

    fn parse_for_each<'s>(&mut self, lexer: &mut Lexer<'s>) -> SyntaxResult<Node<'s>> {
        self.non_terminal("for each", lexer, |parser, lexer| {
            let keyword = parser.expect(lexer, TokenType::Keyword, "for")?;
            let binding = parser.expect_identifier(lexer)?;
            parser.expect(lexer, TokenType::Keyword, "in")?;
            let iterable = parser.parse_value(lexer)?;
            let body = parser.parse_block(lexer)?;
            Ok(Node::with_token(NodeKind::ForEach, keyword)
                .child(Node::with_token(NodeKind::NameDeclaration, binding))
                .child(iterable)
                .child(body))
        })
    }

    fn parse_conditional<'s>(&mut self, lexer: &mut Lexer<'s>) -> SyntaxResult<Node<'s>> {
        self.non_terminal("conditional", lexer, |parser, lexer| {
            let keyword = parser.expect(lexer, TokenType::Keyword, "if")?;
            let condition = parser.parse_value(lexer)?;
            let body = parser.parse_block(lexer)?;
            let mut node = Node::with_token(NodeKind::Conditional, keyword)
                .child(Node::new(NodeKind::Condition).child(condition))
                .child(body);
            if let Some(otherwise) = parser.eat(lexer, TokenType::Keyword, "else")? {
                if parser.check(lexer, TokenType::Keyword, "if")? {
                    node.add_child(parser.parse_conditional(lexer)?);
                } else {
                    let body = parser.parse_block(lexer)?;
                    node.add_child(Node::with_token(NodeKind::Conditional, otherwise).child(body));
                }
            }
            Ok(node)
        })
    }

    fn parse_return<'s>(&mut self, lexer: &mut Lexer<'s>) -> SyntaxResult<Node<'s>> {
        self.non_terminal("return", lexer, |parser, lexer| {
            let keyword = parser.expect(lexer, TokenType::Keyword, "return")?;
            let mut node = Node::with_token(NodeKind::FunctionReturn, keyword);
            let next = parser.peek(lexer)?;
            let has_value = !(next.is_eof()
                || next.is(TokenType::Delimiter, "}")
                || next.is(TokenType::Delimiter, ";"));
            if has_value {
                node.add_child(parser.parse_value(lexer)?);
            }
            Ok(node)
        })
    }

    /// `{ ... }`, consuming the closing brace
    pub(super) fn parse_block<'s>(&mut self, lexer: &mut Lexer<'s>) -> SyntaxResult<Node<'s>> {
        self.non_terminal("block", lexer, |parser, lexer| {
            let open = parser.expect(lexer, TokenType::Delimiter, "{")?;
            let mut block = Node::with_token(NodeKind::Context, open);
            loop {
                match Self::statement_lookahead(lexer).cloned() {
                    Some(next) if next.is(TokenType::Delimiter, "}") => {
                        parser.skip_trivia(lexer)?;
                        parser.advance(lexer)?;
                        return Ok(block);
                    }
                    Some(next) if next.is_eof() => {
                        parser.skip_trivia(lexer)?;
                        return Err(
                            parser.error(ErrorKind::expected_token(["'}'"], &next), &next)
                        );
                    }
                    _ => block.add_child(parser.parse_node(lexer)?),
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::tests::{parse, parse_error};
    use crate::parser::ErrorKind;
    use andy_tokens::spanned::TokenPosition;
    use test_log::test;

    #[test]
    fn test_class_with_method() {
        assert_eq!(
            parse("class Foo { fn bar() { } }").unwrap(),
            r#"(unit (class_declaration "class" (name_declaration "Foo") (context "{" (function_declaration "fn" (name_declaration "bar") (function_parameters "(") (context "{")))))"#
        );
    }

    #[test]
    fn test_class_with_base() {
        assert_eq!(
            parse("class Foo extends lib.Bar {}").unwrap(),
            r#"(unit (class_declaration "class" (name_declaration "Foo") (class_base "extends" (name_declaration "lib.Bar")) (context "{")))"#
        );
    }

    #[test]
    fn test_function_signature() {
        assert_eq!(
            parse("fn add(a: int, b) -> int[] { return a + b }").unwrap(),
            concat!(
                r#"(unit (function_declaration "fn" (name_declaration "add") "#,
                r#"(function_parameters "(" (name_declaration "a" (type_annotation "int")) (name_declaration "b")) "#,
                r#"(type_annotation "int[]") "#,
                r#"(context "{" (function_return "return" (value_declaration "+" (value_declaration "a") (value_declaration "b"))))))"#
            )
        );
    }

    #[test]
    fn test_unclosed_parameters_fail_at_eof() {
        let error = parse_error("fn bar(");
        assert_eq!(
            error.kind(),
            &ErrorKind::UnexpectedEof {
                expected: vec!["identifier".to_string()]
            }
        );
        assert_eq!(
            error.location().unwrap().position(),
            TokenPosition::new(0, 7, 7)
        );
    }

    #[test]
    fn test_variables() {
        assert_eq!(
            parse("var x: string = 'a'\nconst y").unwrap(),
            concat!(
                r#"(unit (variable_declaration "var" (name_declaration "x") (type_annotation "string") (value_declaration "'a'")) "#,
                r#"(variable_declaration "const" (name_declaration "y")))"#
            )
        );
    }

    #[test]
    fn test_for_each() {
        assert_eq!(
            parse("for item in items { print(item) }").unwrap(),
            r#"(unit (for_each "for" (name_declaration "item") (value_declaration "items") (context "{" (function_call "print" (value_declaration "item")))))"#
        );
    }

    #[test]
    fn test_conditional_chain() {
        assert_eq!(
            parse("if a { } else if b { } else { x }").unwrap(),
            concat!(
                r#"(unit (conditional "if" (condition (value_declaration "a")) (context "{") "#,
                r#"(conditional "if" (condition (value_declaration "b")) (context "{") "#,
                r#"(conditional "else" (context "{" (value_declaration "x"))))))"#
            )
        );
    }

    #[test]
    fn test_bare_return() {
        assert_eq!(
            parse("fn f() { return }").unwrap(),
            r#"(unit (function_declaration "fn" (name_declaration "f") (function_parameters "(") (context "{" (function_return "return"))))"#
        );
    }

    #[test]
    fn test_unclosed_block() {
        let error = parse_error("if a { x");
        assert_eq!(
            error.kind(),
            &ErrorKind::UnexpectedEof {
                expected: vec!["'}'".to_string()]
            }
        );
    }

    #[test]
    fn test_misplaced_keyword() {
        let error = parse_error("else { }");
        assert_eq!(
            error.kind(),
            &ErrorKind::UnexpectedToken("keyword 'else'".to_string())
        );
    }

    #[test]
    fn test_class_name_must_be_identifier() {
        let error = parse_error("class 12 {}");
        assert_eq!(
            error.kind(),
            &ErrorKind::ExpectedToken {
                expected: vec!["identifier".to_string()],
                found: "literal '12'".to_string()
            }
        );
    }
}
