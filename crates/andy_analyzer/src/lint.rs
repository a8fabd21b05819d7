//! Lint rules

use crate::report::{Position, Span};
use andy_ast::Node;
use andy_tokens::token::{LiteralKind, Token};
use serde::Serialize;
use tracing::debug;

/// The rule a [Warning] was raised by
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Rule {
    /// Whitespace between the last token of a line and the line feed
    TrailingWhitespace,
    /// A double quoted string that doesn't interpolate anything
    StringDefaultSingleQuotes,
    /// A node with more than one child of a kind it should have only one of
    DuplicateUniqueChild,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Warning {
    #[serde(rename = "type")]
    pub rule: Rule,
    pub message: String,
    pub location: Span,
}

/// Runs the rules that only need the tokens and the text they were scanned from
pub fn lint_tokens(source: &str, tokens: &[Token<'_>]) -> Vec<Warning> {
    tokens
        .iter()
        .flat_map(|token| [trailing_whitespace(source, token), single_quotes(token)])
        .flatten()
        .collect()
}

fn trailing_whitespace(source: &str, token: &Token<'_>) -> Option<Warning> {
    let rest = source.get(token.end().offset..)?;
    let run = rest
        .find(|c: char| c == '\n' || !c.is_whitespace())
        .unwrap_or(rest.len());
    let after = &rest[run..];
    if !(after.is_empty() || after.starts_with('\n')) {
        return None;
    }
    let whitespace = &rest[..run];
    let whitespace = if after.is_empty() {
        whitespace
    } else {
        whitespace.strip_suffix('\r').unwrap_or(whitespace)
    };
    if whitespace.is_empty() {
        return None;
    }
    Some(Warning {
        rule: Rule::TrailingWhitespace,
        message: "Trailing whitespace".to_string(),
        location: Span::new(
            Position::new(token.file(), token.end()),
            whitespace.len(),
        ),
    })
}

fn single_quotes(token: &Token<'_>) -> Option<Warning> {
    let content = token.content();
    let applies = token.literal_kind() == Some(LiteralKind::String)
        && content.starts_with('"')
        && !content.contains("${");
    applies.then(|| Warning {
        rule: Rule::StringDefaultSingleQuotes,
        message: "String literal without interpolation should use single quotes".to_string(),
        location: Span::from(token),
    })
}

/// Runs the rules that need the parsed tree
pub fn lint_tree(unit: &Node<'_>) -> Vec<Warning> {
    unit.anomalies()
        .into_iter()
        .filter_map(|anomaly| {
            let Some(token) = anomaly.token() else {
                debug!("no token to report {anomaly} at");
                return None;
            };
            Some(Warning {
                rule: Rule::DuplicateUniqueChild,
                message: anomaly.to_string(),
                location: Span::from(token),
            })
        })
        .collect()
}
