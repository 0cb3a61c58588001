use derive_more::Display;
use globset::{Glob, GlobMatcher};

use crate::filesystem::{Node, NodeType};

/// Boolean predicate over a single [`Node`].
///
/// The `Display` output reads back as a fully parenthesized query.
#[derive(Debug, Clone, PartialEq, Display)]
pub enum Expression {
    #[display("-true")]
    Null,
    #[display("-name {_0}")]
    Name(NamePattern),
    #[display("-type {_0}")]
    Type(NodeType),
    #[display("-size {_0}")]
    SizeEq(u64),
    #[display("-size -{_0}")]
    SizeLt(u64),
    #[display("-size +{_0}")]
    SizeGt(u64),
    #[display("! {_0}")]
    Not(Box<Expression>),
    #[display("( {_0} -a {_1} )")]
    And(Box<Expression>, Box<Expression>),
    #[display("( {_0} -o {_1} )")]
    Or(Box<Expression>, Box<Expression>),
}

impl Expression {
    pub fn negate(expression: Expression) -> Self {
        Expression::Not(Box::new(expression))
    }

    pub fn and(left: Expression, right: Expression) -> Self {
        Expression::And(Box::new(left), Box::new(right))
    }

    pub fn or(left: Expression, right: Expression) -> Self {
        Expression::Or(Box::new(left), Box::new(right))
    }

    pub fn evaluate(&self, node: &Node) -> bool {
        match self {
            Expression::Null => true,
            Expression::Name(pattern) => pattern.is_match(node.name()),
            Expression::Type(node_type) => node.node_type() == *node_type,
            Expression::SizeEq(size) => node.size() == *size,
            Expression::SizeLt(size) => node.size() < *size,
            Expression::SizeGt(size) => node.size() > *size,
            Expression::Not(inner) => !inner.evaluate(node),
            Expression::And(left, right) => left.evaluate(node) && right.evaluate(node),
            Expression::Or(left, right) => left.evaluate(node) || right.evaluate(node),
        }
    }
}

/// Shell glob matched against a node's name segment
#[derive(Debug, Clone, Display)]
#[display("{glob}")]
pub struct NamePattern {
    glob: Glob,
    matcher: GlobMatcher,
}

impl NamePattern {
    pub fn new(pattern: &str) -> Result<Self, globset::Error> {
        let glob = Glob::new(pattern)?;
        let matcher = glob.compile_matcher();
        Ok(Self { glob, matcher })
    }

    pub fn as_str(&self) -> &str {
        self.glob.glob()
    }

    pub fn is_match(&self, name: &str) -> bool {
        self.matcher.is_match(name)
    }
}

impl PartialEq for NamePattern {
    fn eq(&self, other: &Self) -> bool {
        self.glob == other.glob
    }
}
