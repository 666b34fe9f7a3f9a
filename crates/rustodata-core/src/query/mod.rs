//! Request-to-statement compilation.
//!
//! A [`QueryRequest`](rustodata_model::QueryRequest) flows through three
//! stages:
//!
//! 1. [`resolve`] binds names against the model and types every expression.
//! 2. [`build`] assigns aliases and renders the pieces into a [`QueryContext`].
//! 3. [`assemble`] joins the pieces into a [`QueryStatement`].

mod builder;
mod context;
mod resolve;
mod statement;

pub use builder::{build, key_predicate_condition, select_expression};
pub use context::{AliasGenerator, ContextShape, JoinClause, QueryContext};
pub use resolve::{ResolvedHop, ResolvedKey, ResolvedRequest, resolve, resolve_keys};
pub use statement::{QueryStatement, assemble};
