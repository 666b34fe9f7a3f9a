//! Typed expression tree.
//!
//! The parser resolves every node as it builds it, so a tree obtained from
//! [`parse_filter`](super::parse_filter) or
//! [`parse_order_by`](super::parse_order_by) always carries a `result_type` on
//! each node.

use std::fmt;

use rustodata_model::Facets;

use super::literal::EdmLiteral;
use super::operators::{BinaryOperator, Method, UnaryOperator};
use super::types::EdmType;

/// A resolved expression node.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpressionNode {
    /// What the node is.
    pub kind: NodeKind,
    /// The node's resolved type.
    pub result_type: EdmType,
    /// Byte offset of the node in the source expression.
    pub position: usize,
}

/// The node variants.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// A typed literal.
    Literal(EdmLiteral),
    /// A property of the type in scope.
    Property(PropertyRef),
    /// Member access: `path/property`.
    Member {
        /// The structural value being accessed.
        path: Box<ExpressionNode>,
        /// The accessed property (always a [`NodeKind::Property`]).
        property: Box<ExpressionNode>,
    },
    /// `not x` or `-x`.
    Unary {
        /// Operator.
        op: UnaryOperator,
        /// Operand.
        operand: Box<ExpressionNode>,
    },
    /// `left op right`.
    Binary {
        /// Operator.
        op: BinaryOperator,
        /// Left-hand operand.
        left: Box<ExpressionNode>,
        /// Right-hand operand.
        right: Box<ExpressionNode>,
    },
    /// `method(args...)`.
    MethodCall {
        /// Method.
        method: Method,
        /// Arguments.
        args: Vec<ExpressionNode>,
    },
}

impl NodeKind {
    /// Short name of the variant, for diagnostics.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Literal(_) => "literal",
            Self::Property(_) => "property",
            Self::Member { .. } => "member",
            Self::Unary { .. } => "unary",
            Self::Binary { .. } => "binary",
            Self::MethodCall { .. } => "method call",
        }
    }
}

/// A property reference resolved against the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyRef {
    /// Protocol-visible name.
    pub name: String,
    /// Name used in generated queries.
    pub internal_name: String,
    /// Facets of a structural property; default for navigation properties.
    pub facets: Facets,
}

/// Sort direction of an `$orderby` item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    /// `asc` (default).
    #[default]
    Ascending,
    /// `desc`.
    Descending,
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ascending => f.write_str("ASC"),
            Self::Descending => f.write_str("DESC"),
        }
    }
}

/// One `$orderby` item.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderByItem {
    /// Sort key.
    pub expression: ExpressionNode,
    /// Direction.
    pub order: SortOrder,
}
