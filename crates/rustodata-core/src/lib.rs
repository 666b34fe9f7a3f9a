//! OData V2 query-expression compiler.
//!
//! Compiles a [`QueryRequest`](rustodata_model::QueryRequest) (entity set, key
//! predicates, navigation path, `$filter`, `$orderby`, `$select`, paging)
//! against an [`EdmModel`](rustodata_model::EdmModel) into a JPQL statement.
//!
//! ```
//! use rustodata_core::{CompilerConfig, QueryCompiler, QueryPlan};
//! use rustodata_model::{EdmModel, QueryRequest};
//!
//! let compiler = QueryCompiler::new(CompilerConfig::default()).unwrap();
//! let plan = compiler
//!     .compile(&EdmModel::default(), &QueryRequest::new("Anything").with_top(0))
//!     .unwrap();
//! assert_eq!(plan, QueryPlan::Empty);
//! ```

mod compiler;
pub mod config;
mod error;
pub mod expression;
pub mod query;

pub use compiler::{QueryCompiler, QueryPlan};
pub use config::{CompilerConfig, JoinKind};
pub use error::{QueryError, QueryResult};
pub use query::{QueryContext, QueryStatement};
