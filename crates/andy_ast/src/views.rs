//! Typed views over [Node]s.
//!
//! A view is only created when the node has exactly the children its kind allows, so consumers
//! never have to deal with a missing name or a second body.

use crate::node::{Node, NodeKind};
use andy_tokens::token::Token;
use thiserror::Error;

/// The ways a node can fail to match the shape of a view
#[derive(Debug, Error, PartialEq)]
pub enum ShapeError {
    #[error("expected a {expected} node, found {found}")]
    WrongKind { expected: NodeKind, found: NodeKind },
    #[error("{parent} is missing its {child}")]
    MissingChild { parent: NodeKind, child: NodeKind },
    #[error("{parent} has {count} {child} children, expected at most one")]
    DuplicateChild {
        parent: NodeKind,
        child: NodeKind,
        count: usize,
    },
    #[error("{0} node has no token")]
    MissingToken(NodeKind),
}

fn expect_kind(node: &Node<'_>, expected: NodeKind) -> Result<(), ShapeError> {
    if node.kind() == expected {
        Ok(())
    } else {
        Err(ShapeError::WrongKind {
            expected,
            found: node.kind(),
        })
    }
}

fn optional_child<'n, 's>(
    node: &'n Node<'s>,
    child: NodeKind,
) -> Result<Option<&'n Node<'s>>, ShapeError> {
    let mut matching = node.children_of_kind(child);
    let first = matching.next();
    let rest = matching.count();
    if rest > 0 {
        return Err(ShapeError::DuplicateChild {
            parent: node.kind(),
            child,
            count: rest + 1,
        });
    }
    Ok(first)
}

fn required_child<'n, 's>(node: &'n Node<'s>, child: NodeKind) -> Result<&'n Node<'s>, ShapeError> {
    optional_child(node, child)?.ok_or(ShapeError::MissingChild {
        parent: node.kind(),
        child,
    })
}

fn token_of<'n, 's>(node: &'n Node<'s>) -> Result<&'n Token<'s>, ShapeError> {
    node.token().ok_or(ShapeError::MissingToken(node.kind()))
}

/// The children of a node that are not of the given kinds, which are its value expressions
fn values<'n, 's>(
    node: &'n Node<'s>,
    excluded: &'static [NodeKind],
) -> impl Iterator<Item = &'n Node<'s>> {
    node.children()
        .iter()
        .filter(move |child| !excluded.contains(&child.kind()))
}

/// `class Name extends Base { ... }`
#[derive(Debug)]
pub struct ClassDeclaration<'n, 's> {
    pub name: &'n Token<'s>,
    pub base: Option<&'n Token<'s>>,
    pub body: &'n Node<'s>,
}

impl<'n, 's> TryFrom<&'n Node<'s>> for ClassDeclaration<'n, 's> {
    type Error = ShapeError;

    fn try_from(node: &'n Node<'s>) -> Result<Self, Self::Error> {
        expect_kind(node, NodeKind::ClassDeclaration)?;
        let name = token_of(required_child(node, NodeKind::NameDeclaration)?)?;
        let base = optional_child(node, NodeKind::ClassBase)?
            .map(|base| required_child(base, NodeKind::NameDeclaration).and_then(token_of))
            .transpose()?;
        let body = required_child(node, NodeKind::Context)?;
        Ok(Self { name, base, body })
    }
}

/// A parameter of a function, `name: Type`
#[derive(Debug)]
pub struct Parameter<'n, 's> {
    pub name: &'n Token<'s>,
    pub annotation: Option<&'n Token<'s>>,
}

impl<'n, 's> TryFrom<&'n Node<'s>> for Parameter<'n, 's> {
    type Error = ShapeError;

    fn try_from(node: &'n Node<'s>) -> Result<Self, Self::Error> {
        expect_kind(node, NodeKind::NameDeclaration)?;
        Ok(Self {
            name: token_of(node)?,
            annotation: optional_child(node, NodeKind::TypeAnnotation)?
                .map(token_of)
                .transpose()?,
        })
    }
}

fn parameters<'n, 's>(node: &'n Node<'s>) -> Result<Vec<Parameter<'n, 's>>, ShapeError> {
    required_child(node, NodeKind::FunctionParameters)?
        .children()
        .iter()
        .map(Parameter::try_from)
        .collect()
}

/// `fn name(params): Type { ... }`, or an anonymous function object when `name` is absent
#[derive(Debug)]
pub struct FunctionDeclaration<'n, 's> {
    pub name: Option<&'n Token<'s>>,
    pub parameters: Vec<Parameter<'n, 's>>,
    pub return_type: Option<&'n Token<'s>>,
    pub body: &'n Node<'s>,
}

impl<'n, 's> TryFrom<&'n Node<'s>> for FunctionDeclaration<'n, 's> {
    type Error = ShapeError;

    fn try_from(node: &'n Node<'s>) -> Result<Self, Self::Error> {
        let name = if node.kind() == NodeKind::FunctionObject {
            None
        } else {
            expect_kind(node, NodeKind::FunctionDeclaration)?;
            Some(token_of(required_child(node, NodeKind::NameDeclaration)?)?)
        };
        Ok(Self {
            name,
            parameters: parameters(node)?,
            return_type: optional_child(node, NodeKind::TypeAnnotation)?
                .map(token_of)
                .transpose()?,
            body: required_child(node, NodeKind::Context)?,
        })
    }
}

/// `var name: Type = value`
#[derive(Debug)]
pub struct VariableDeclaration<'n, 's> {
    pub name: &'n Token<'s>,
    pub annotation: Option<&'n Token<'s>>,
    pub initializer: Option<&'n Node<'s>>,
}

impl<'n, 's> TryFrom<&'n Node<'s>> for VariableDeclaration<'n, 's> {
    type Error = ShapeError;

    fn try_from(node: &'n Node<'s>) -> Result<Self, Self::Error> {
        expect_kind(node, NodeKind::VariableDeclaration)?;
        let mut initializers =
            values(node, &[NodeKind::NameDeclaration, NodeKind::TypeAnnotation]);
        let initializer = initializers.next();
        let extra = initializers.count();
        if extra > 0 {
            return Err(ShapeError::DuplicateChild {
                parent: node.kind(),
                child: NodeKind::ValueDeclaration,
                count: extra + 1,
            });
        }
        Ok(Self {
            name: token_of(required_child(node, NodeKind::NameDeclaration)?)?,
            annotation: optional_child(node, NodeKind::TypeAnnotation)?
                .map(token_of)
                .transpose()?,
            initializer,
        })
    }
}

/// `for binding in iterable { ... }`
#[derive(Debug)]
pub struct ForEach<'n, 's> {
    pub binding: &'n Token<'s>,
    pub iterable: &'n Node<'s>,
    pub body: &'n Node<'s>,
}

impl<'n, 's> TryFrom<&'n Node<'s>> for ForEach<'n, 's> {
    type Error = ShapeError;

    fn try_from(node: &'n Node<'s>) -> Result<Self, Self::Error> {
        expect_kind(node, NodeKind::ForEach)?;
        let iterable = values(node, &[NodeKind::NameDeclaration, NodeKind::Context])
            .next()
            .ok_or(ShapeError::MissingChild {
                parent: NodeKind::ForEach,
                child: NodeKind::ValueDeclaration,
            })?;
        Ok(Self {
            binding: token_of(required_child(node, NodeKind::NameDeclaration)?)?,
            iterable,
            body: required_child(node, NodeKind::Context)?,
        })
    }
}

/// `if condition { ... } else ...`
///
/// A trailing `else { ... }` is a conditional without a condition.
#[derive(Debug)]
pub struct Conditional<'n, 's> {
    pub condition: Option<&'n Node<'s>>,
    pub body: &'n Node<'s>,
    pub alternative: Option<Box<Conditional<'n, 's>>>,
}

impl<'n, 's> TryFrom<&'n Node<'s>> for Conditional<'n, 's> {
    type Error = ShapeError;

    fn try_from(node: &'n Node<'s>) -> Result<Self, Self::Error> {
        expect_kind(node, NodeKind::Conditional)?;
        let condition = optional_child(node, NodeKind::Condition)?
            .map(|condition| {
                condition.children().first().ok_or(ShapeError::MissingChild {
                    parent: NodeKind::Condition,
                    child: NodeKind::ValueDeclaration,
                })
            })
            .transpose()?;
        Ok(Self {
            condition,
            body: required_child(node, NodeKind::Context)?,
            alternative: optional_child(node, NodeKind::Conditional)?
                .map(|alternative| Conditional::try_from(alternative).map(Box::new))
                .transpose()?,
        })
    }
}
