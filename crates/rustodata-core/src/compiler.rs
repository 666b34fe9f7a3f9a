//! The query compiler entry point.

use rustodata_model::{EdmModel, QueryRequest};
use serde::Serialize;
use tracing::debug;

use crate::config::CompilerConfig;
use crate::error::QueryResult;
use crate::expression::operator_table;
use crate::query::{QueryStatement, assemble, build, resolve};

/// Result of compiling one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum QueryPlan {
    /// The request asked for a page of size zero; nothing needs to run.
    Empty,
    /// A statement to execute, with the paging window the caller applies.
    Statement {
        /// The rendered statement.
        statement: QueryStatement,
        /// Rows to skip.
        #[serde(skip_serializing_if = "Option::is_none")]
        skip: Option<u32>,
        /// Maximum rows to return.
        #[serde(skip_serializing_if = "Option::is_none")]
        top: Option<u32>,
    },
}

impl QueryPlan {
    /// The statement, if any.
    #[must_use]
    pub fn statement(&self) -> Option<&QueryStatement> {
        match self {
            Self::Empty => None,
            Self::Statement { statement, .. } => Some(statement),
        }
    }
}

/// Compiles [`QueryRequest`]s into [`QueryPlan`]s.
///
/// The compiler holds no per-request state; one instance may serve any
/// number of requests against any number of models.
#[derive(Debug, Clone)]
pub struct QueryCompiler {
    config: CompilerConfig,
}

impl QueryCompiler {
    /// Create a compiler, validating `config`.
    pub fn new(config: CompilerConfig) -> QueryResult<Self> {
        config.validate()?;
        let operators = operator_table().len();
        debug!(
            entity_alias_prefix = %config.entity_alias_prefix,
            relationship_alias_prefix = %config.relationship_alias_prefix,
            join_kind = %config.join_kind,
            operators,
            "query compiler ready"
        );
        Ok(Self { config })
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    /// Compile `request` against `model`.
    pub fn compile(&self, model: &EdmModel, request: &QueryRequest) -> QueryResult<QueryPlan> {
        if request.top == Some(0) {
            debug!(entity_set = %request.entity_set, "page size zero, returning empty plan");
            return Ok(QueryPlan::Empty);
        }

        let resolved = resolve(model, request)?;
        let Some(context) = build(&resolved, &self.config)? else {
            return Ok(QueryPlan::Empty);
        };
        let statement = assemble(&context)?;

        let (skip, top) = if request.count {
            (None, None)
        } else {
            let top = match (request.top, self.config.max_page_size) {
                (Some(top), Some(max)) => Some(top.min(max)),
                (top, max) => top.or(max),
            };
            (request.skip, top)
        };

        debug!(
            entity_set = %request.entity_set,
            hops = resolved.hops.len(),
            statement = %statement,
            "compiled query"
        );
        Ok(QueryPlan::Statement {
            statement,
            skip,
            top,
        })
    }
}
