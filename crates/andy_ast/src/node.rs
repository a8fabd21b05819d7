//! The node of the abstract syntax tree

use andy_tokens::token::Token;
use itertools::Itertools;
use log::debug;
use std::fmt::{Display, Formatter};

/// The kind of a [Node]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, strum::Display, strum::IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum NodeKind {
    /// The root of a parsed source file
    Unit,
    /// A preprocessor directive that was left in the token stream
    Expansion,
    /// A block, `{ ... }`
    Context,
    ClassDeclaration,
    /// The `extends Base` clause of a class
    ClassBase,
    FunctionDeclaration,
    FunctionReturn,
    FunctionCall,
    FunctionParameters,
    /// An anonymous function used as a value
    FunctionObject,
    ValueDeclaration,
    ArrayDeclaration,
    DictionaryDeclaration,
    VariableDeclaration,
    ForEach,
    TypeAnnotation,
    NameDeclaration,
    Conditional,
    Condition,
}

impl NodeKind {
    /// The kinds of children that a node of this kind can have at most one of
    pub fn unique_children(&self) -> &'static [NodeKind] {
        use NodeKind::*;
        match self {
            ClassDeclaration => &[NameDeclaration, ClassBase, Context],
            ClassBase => &[NameDeclaration],
            FunctionDeclaration => &[NameDeclaration, FunctionParameters, TypeAnnotation, Context],
            FunctionObject => &[FunctionParameters, TypeAnnotation, Context],
            VariableDeclaration => &[NameDeclaration, TypeAnnotation],
            ForEach => &[NameDeclaration, Context],
            Conditional => &[Condition, Context, Conditional],
            NameDeclaration => &[TypeAnnotation],
            _ => &[],
        }
    }
}

/// A node within the abstract syntax tree.
///
/// Children are kept in source order.
#[derive(Debug, Clone, PartialEq)]
pub struct Node<'s> {
    kind: NodeKind,
    token: Option<Token<'s>>,
    children: Vec<Node<'s>>,
}

impl<'s> Node<'s> {
    /// Creates a node without a token
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            token: None,
            children: vec![],
        }
    }

    /// Creates a node representing a token
    pub fn with_token(kind: NodeKind, token: Token<'s>) -> Self {
        Self {
            kind,
            token: Some(token),
            children: vec![],
        }
    }

    /// Appends a child to this node
    pub fn add_child(&mut self, child: Node<'s>) {
        self.children.push(child);
    }

    /// Builder version of [Node::add_child]
    pub fn child(mut self, child: Node<'s>) -> Self {
        self.add_child(child);
        self
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn token(&self) -> Option<&Token<'s>> {
        self.token.as_ref()
    }

    pub fn children(&self) -> &[Node<'s>] {
        &self.children
    }

    /// The first child of a given kind
    pub fn child_of_kind(&self, kind: NodeKind) -> Option<&Node<'s>> {
        self.children.iter().find(|child| child.kind == kind)
    }

    /// All children of a given kind
    pub fn children_of_kind(&self, kind: NodeKind) -> impl Iterator<Item = &Node<'s>> {
        self.children.iter().filter(move |child| child.kind == kind)
    }

    /// The content of the token of the first child of the given kind
    pub fn child_content_of_kind(&self, kind: NodeKind) -> Option<&str> {
        self.child_of_kind(kind)
            .and_then(|child| child.token())
            .map(|token| token.content())
    }

    /// The declared name, from the name declaration child
    pub fn name(&self) -> Option<&str> {
        self.child_content_of_kind(NodeKind::NameDeclaration)
    }

    /// The content of the value declaration child
    pub fn value(&self) -> Option<&str> {
        self.child_content_of_kind(NodeKind::ValueDeclaration)
    }

    pub fn condition(&self) -> Option<&Node<'s>> {
        self.child_of_kind(NodeKind::Condition)
    }

    pub fn block(&self) -> Option<&Node<'s>> {
        self.child_of_kind(NodeKind::Context)
    }

    /// Finds every node in this tree that holds more than one child of a kind it can only have
    /// one of.
    pub fn anomalies(&self) -> Vec<Anomaly<'_, 's>> {
        let mut found = vec![];
        self.collect_anomalies(&mut found);
        found
    }

    fn collect_anomalies<'n>(&'n self, found: &mut Vec<Anomaly<'n, 's>>) {
        let unique = self.kind.unique_children();
        for kind in self
            .children
            .iter()
            .map(Node::kind)
            .filter(|kind| unique.contains(kind))
            .duplicates()
        {
            let count = self.children_of_kind(kind).count();
            debug!("{} has {count} {kind} children", self.kind);
            found.push(Anomaly {
                parent: self,
                kind,
                count,
            });
        }
        for child in &self.children {
            child.collect_anomalies(found);
        }
    }

    /// Detaches this tree from the source it was parsed from
    pub fn into_owned(self) -> Node<'static> {
        Node {
            kind: self.kind,
            token: self.token.map(Token::into_owned),
            children: self.children.into_iter().map(Node::into_owned).collect(),
        }
    }
}

/// Writes the tree as an s-expression, `(kind "token" children...)`
impl Display for Node<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}", self.kind)?;
        if let Some(token) = &self.token {
            write!(f, " {:?}", token.content())?;
        }
        for child in &self.children {
            write!(f, " {child}")?;
        }
        write!(f, ")")
    }
}

/// A parent holding more than one child of a kind it should only have one of
#[derive(Debug)]
pub struct Anomaly<'n, 's> {
    pub parent: &'n Node<'s>,
    pub kind: NodeKind,
    pub count: usize,
}

impl Anomaly<'_, '_> {
    /// The token best describing where the anomaly is
    pub fn token(&self) -> Option<&Token<'_>> {
        self.parent
            .children_of_kind(self.kind)
            .nth(1)
            .and_then(|duplicate| duplicate.token())
            .or(self.parent.token())
    }
}

impl Display for Anomaly<'_, '_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} has {} {} children but only the first is used",
            self.parent.kind, self.count, self.kind
        )
    }
}
