//! `$filter` / `$orderby` expression compilation.
//!
//! The pipeline is:
//!
//! 1. [`tokenize`] the raw string into a position-tagged [`TokenStream`],
//!    typing literals by the narrowest-fit rule.
//! 2. Parse it with [`Parser`] (or [`parse_filter`] / [`parse_order_by`]) into
//!    an [`ExpressionNode`] tree, resolving every node's type through the
//!    process-wide [`OperatorTable`].
//! 3. [`translate`] the tree into a JPQL fragment for a given alias.

mod ast;
mod error;
mod literal;
mod operators;
mod parser;
mod tokenizer;
mod translator;
mod types;

pub use ast::{ExpressionNode, NodeKind, OrderByItem, PropertyRef, SortOrder};
pub use error::ExpressionError;
pub use literal::{EdmLiteral, LiteralValue};
pub use operators::{
    BinaryOperator, Method, OperatorCategory, OperatorDescriptor, OperatorId, OperatorTable,
    OperatorTableBuilder, OperatorTableError, ParameterSet, Signatures, UNARY_PRECEDENCE,
    UnaryOperator, operator_table, standard_table,
};
pub use parser::{Parser, parse_expression, parse_filter, parse_order_by};
pub use tokenizer::{Token, TokenKind, TokenStream, tokenize};
pub use translator::translate;
pub use types::{EdmType, accepts};
