//! Values: operators, references, calls and literals

use super::{ErrorKind, Parser, SyntaxResult};
use crate::lexer::Lexer;
use andy_ast::{Node, NodeKind};
use andy_tokens::token::{OperatorKind, Token, TokenType};

const ASSIGNMENTS: &[&str] = &["=", "+=", "-=", "*=", "/=", "%="];
const MEMBER_ACCESS: &[&str] = &[".", "->", "::"];

/// Binding power of binary operators, higher binds tighter
fn binary_precedence(operator: OperatorKind) -> Option<u8> {
    match operator {
        OperatorKind::Or => Some(1),
        OperatorKind::And => Some(2),
        OperatorKind::Equal | OperatorKind::NotEqual => Some(3),
        OperatorKind::Less
        | OperatorKind::LessEqual
        | OperatorKind::Greater
        | OperatorKind::GreaterEqual => Some(4),
        OperatorKind::Plus | OperatorKind::Minus => Some(5),
        OperatorKind::Multiply | OperatorKind::Divide | OperatorKind::Modulo => Some(6),
        OperatorKind::Power => Some(7),
        OperatorKind::Not
        | OperatorKind::Increment
        | OperatorKind::Decrement
        | OperatorKind::None => None,
    }
}

fn is_prefix(operator: OperatorKind) -> bool {
    matches!(
        operator,
        OperatorKind::Not | OperatorKind::Minus | OperatorKind::Increment | OperatorKind::Decrement
    )
}

fn is_postfix(operator: OperatorKind) -> bool {
    matches!(operator, OperatorKind::Increment | OperatorKind::Decrement)
}

fn is_member_access(token: &Token<'_>) -> bool {
    token.token_type() == TokenType::Delimiter && MEMBER_ACCESS.contains(&token.content())
}

fn value<'s>(token: Token<'s>) -> Node<'s> {
    Node::with_token(NodeKind::ValueDeclaration, token)
}

impl Parser {
    /// A statement starting with an identifier: a reference, call or assignment, possibly the
    /// left hand side of a binary operator
    pub(super) fn parse_identifier<'s>(
        &mut self,
        lexer: &mut Lexer<'s>,
    ) -> SyntaxResult<Node<'s>> {
        self.non_terminal("identifier", lexer, |parser, lexer| {
            let name = parser.parse_chain(lexer)?;
            let target = if parser.check(lexer, TokenType::Delimiter, "(")? {
                parser.parse_call(lexer, name.clone())?
            } else {
                value(name.clone())
            };
            let target = parser.parse_postfix(lexer, target)?;

            let next = parser.peek(lexer)?;
            if next.token_type() == TokenType::Delimiter && ASSIGNMENTS.contains(&next.content()) {
                let assignment = parser.advance(lexer)?;
                let is_plain_reference = target.kind() == NodeKind::ValueDeclaration
                    && target.children().is_empty()
                    && target.token() == Some(&name);
                let target = if is_plain_reference {
                    Node::with_token(NodeKind::NameDeclaration, name)
                } else {
                    target
                };
                let assigned = parser.parse_value(lexer)?;
                return Ok(Node::with_token(NodeKind::ValueDeclaration, assignment)
                    .child(target)
                    .child(assigned));
            }
            parser.parse_binary(lexer, 0, target)
        })
    }

    pub(super) fn parse_literal<'s>(&mut self, lexer: &mut Lexer<'s>) -> SyntaxResult<Node<'s>> {
        self.parse_value(lexer)
    }

    pub(super) fn parse_operator<'s>(&mut self, lexer: &mut Lexer<'s>) -> SyntaxResult<Node<'s>> {
        let operator = self.peek(lexer)?;
        if !is_prefix(operator.operator()) {
            return Err(self.error(ErrorKind::unexpected_token(&operator), &operator));
        }
        self.parse_value(lexer)
    }

    /// Parses a complete value expression
    pub(super) fn parse_value<'s>(&mut self, lexer: &mut Lexer<'s>) -> SyntaxResult<Node<'s>> {
        self.non_terminal("value", lexer, |parser, lexer| {
            let lhs = parser.parse_unary(lexer)?;
            parser.parse_binary(lexer, 0, lhs)
        })
    }

    /// Precedence climbing over binary operators binding at least as tight as `min_precedence`
    fn parse_binary<'s>(
        &mut self,
        lexer: &mut Lexer<'s>,
        min_precedence: u8,
        mut lhs: Node<'s>,
    ) -> SyntaxResult<Node<'s>> {
        loop {
            let next = self.peek(lexer)?;
            let Some(precedence) =
                binary_precedence(next.operator()).filter(|precedence| *precedence >= min_precedence)
            else {
                return Ok(lhs);
            };
            let operator = self.advance(lexer)?;
            let next_min = if operator.operator() == OperatorKind::Power {
                precedence
            } else {
                precedence + 1
            };
            let rhs = self.parse_unary(lexer)?;
            let rhs = self.parse_binary(lexer, next_min, rhs)?;
            lhs = Node::with_token(NodeKind::ValueDeclaration, operator)
                .child(lhs)
                .child(rhs);
        }
    }

    fn parse_unary<'s>(&mut self, lexer: &mut Lexer<'s>) -> SyntaxResult<Node<'s>> {
        let next = self.peek(lexer)?;
        if is_prefix(next.operator()) {
            let operator = self.advance(lexer)?;
            let operand = self.parse_unary(lexer)?;
            return Ok(value(operator).child(operand));
        }
        let primary = self.parse_primary(lexer)?;
        self.parse_postfix(lexer, primary)
    }

    /// Postfix `++`/`--`, indexing and member access on a call or index
    fn parse_postfix<'s>(
        &mut self,
        lexer: &mut Lexer<'s>,
        mut node: Node<'s>,
    ) -> SyntaxResult<Node<'s>> {
        loop {
            let next = self.peek(lexer)?;
            if is_postfix(next.operator()) {
                let operator = self.advance(lexer)?;
                node = value(operator).child(node);
            } else if next.is(TokenType::Delimiter, "[") {
                let open = self.advance(lexer)?;
                let index = self.parse_value(lexer)?;
                self.expect(lexer, TokenType::Delimiter, "]")?;
                node = value(open).child(node).child(index);
            } else if is_member_access(&next) {
                let access = self.advance(lexer)?;
                let rest = self.parse_reference(lexer)?;
                node = value(access).child(node).child(rest);
            } else {
                return Ok(node);
            }
        }
    }

    fn parse_primary<'s>(&mut self, lexer: &mut Lexer<'s>) -> SyntaxResult<Node<'s>> {
        let next = self.peek(lexer)?;
        match (next.token_type(), next.content()) {
            (TokenType::Literal, _) => Ok(value(self.advance(lexer)?)),
            (TokenType::Identifier, _) => self.parse_reference(lexer),
            (TokenType::Keyword, "fn") => self.parse_function_object(lexer),
            (TokenType::Delimiter, "[") => self.parse_array(lexer),
            (TokenType::Delimiter, "{") => self.parse_dictionary(lexer),
            (TokenType::Delimiter, "(") => {
                self.advance(lexer)?;
                let inner = self.parse_value(lexer)?;
                self.expect(lexer, TokenType::Delimiter, ")")?;
                Ok(inner)
            }
            _ => Err(self.error(ErrorKind::expected_token(["a value"], &next), &next)),
        }
    }

    /// An identifier chain, optionally called
    fn parse_reference<'s>(&mut self, lexer: &mut Lexer<'s>) -> SyntaxResult<Node<'s>> {
        let name = self.parse_chain(lexer)?;
        if self.check(lexer, TokenType::Delimiter, "(")? {
            self.parse_call(lexer, name)
        } else {
            Ok(value(name))
        }
    }

    /// Merges `a.b->c::d` into a single token. A member that is called is left out, so
    /// `a.b.f()` yields `a.b`.
    pub(super) fn parse_chain<'s>(&mut self, lexer: &mut Lexer<'s>) -> SyntaxResult<Token<'s>> {
        let mut chain = self.expect_identifier(lexer)?;
        loop {
            let next = self.peek(lexer)?;
            let continues = is_member_access(&next)
                && lexer
                    .peek_nth(1)
                    .is_some_and(|member| member.token_type() == TokenType::Identifier)
                && !lexer
                    .peek_nth(2)
                    .is_some_and(|after| after.is(TokenType::Delimiter, "("));
            if !continues {
                return Ok(chain);
            }
            let access = self.advance(lexer)?;
            let member = self.advance(lexer)?;
            chain.merge(&access);
            chain.merge(&member);
        }
    }

    fn parse_call<'s>(&mut self, lexer: &mut Lexer<'s>, name: Token<'s>) -> SyntaxResult<Node<'s>> {
        self.non_terminal("call", lexer, |parser, lexer| {
            parser.expect(lexer, TokenType::Delimiter, "(")?;
            let mut call = Node::with_token(NodeKind::FunctionCall, name.clone());
            parser.parse_call_arguments(lexer, &name, &mut call)?;
            Ok(call)
        })
    }

    /// Comma separated arguments, up to and including the closing `)`. A missing `)` is
    /// reported where the call starts.
    fn parse_call_arguments<'s>(
        &mut self,
        lexer: &mut Lexer<'s>,
        name: &Token<'s>,
        call: &mut Node<'s>,
    ) -> SyntaxResult<()> {
        if self.eat(lexer, TokenType::Delimiter, ")")?.is_some() {
            return Ok(());
        }
        loop {
            let next = self.peek(lexer)?;
            if next.is_eof() {
                let expected: &[&str] = if call.children().is_empty() {
                    &["a value", "')'"]
                } else {
                    &["a value"]
                };
                return Err(self.error(ErrorKind::expected_token(expected, &next), name));
            }
            call.add_child(self.parse_value(lexer)?);
            let next = self.peek(lexer)?;
            if next.is(TokenType::Delimiter, ",") {
                self.advance(lexer)?;
            } else if next.is(TokenType::Delimiter, ")") {
                self.advance(lexer)?;
                return Ok(());
            } else {
                return Err(self.error(ErrorKind::expected_token(["','", "')'"], &next), name));
            }
        }
    }

    fn parse_array<'s>(&mut self, lexer: &mut Lexer<'s>) -> SyntaxResult<Node<'s>> {
        self.non_terminal("array", lexer, |parser, lexer| {
            let open = parser.expect(lexer, TokenType::Delimiter, "[")?;
            let mut array = Node::with_token(NodeKind::ArrayDeclaration, open);
            while parser.eat(lexer, TokenType::Delimiter, "]")?.is_none() {
                array.add_child(parser.parse_value(lexer)?);
                if parser.eat(lexer, TokenType::Delimiter, ",")?.is_none() {
                    parser.expect(lexer, TokenType::Delimiter, "]")?;
                    break;
                }
            }
            Ok(array)
        })
    }

    fn parse_dictionary<'s>(&mut self, lexer: &mut Lexer<'s>) -> SyntaxResult<Node<'s>> {
        self.non_terminal("dictionary", lexer, |parser, lexer| {
            let open = parser.expect(lexer, TokenType::Delimiter, "{")?;
            let mut dictionary = Node::with_token(NodeKind::DictionaryDeclaration, open);
            while parser.eat(lexer, TokenType::Delimiter, "}")?.is_none() {
                let key = parser.parse_value(lexer)?;
                let colon = parser.expect(lexer, TokenType::Delimiter, ":")?;
                let entry = parser.parse_value(lexer)?;
                dictionary.add_child(value(colon).child(key).child(entry));
                if parser.eat(lexer, TokenType::Delimiter, ",")?.is_none() {
                    parser.expect(lexer, TokenType::Delimiter, "}")?;
                    break;
                }
            }
            Ok(dictionary)
        })
    }
}
