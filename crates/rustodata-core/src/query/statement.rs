//! Statement assembly.
//!
//! Renders a [`QueryContext`] into the final JPQL text. Direct selects become
//! `SELECT .. FROM .. [WHERE ..] [ORDER BY ..]`; joined selects walk the join
//! chain from the root binding, emitting one join per hop and folding every
//! key condition into a single `WHERE`.

use std::fmt;

use serde::Serialize;

use super::context::{ContextShape, QueryContext};
use crate::error::{QueryError, QueryResult};

/// A rendered query statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct QueryStatement(String);

impl QueryStatement {
    /// The statement text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QueryStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Render `context` as a statement.
pub fn assemble(context: &QueryContext) -> QueryResult<QueryStatement> {
    let mut sql = format!("SELECT {} FROM ", context.select_expression);
    let mut conditions: Vec<&str> = Vec::new();

    match context.shape {
        ContextShape::Select => {
            sql.push_str(&context.entity_name);
            sql.push(' ');
            sql.push_str(&context.entity_alias);
        }
        ContextShape::JoinSelect => {
            let (root, hops) = context
                .join_clauses
                .split_first()
                .ok_or(QueryError::JoinClauseExpected)?;
            sql.push_str(&root.source_entity_name);
            sql.push(' ');
            sql.push_str(&root.source_alias);
            conditions.extend(root.join_condition.as_deref());

            let mut anchor = root.source_alias.as_str();
            for (offset, clause) in hops.iter().enumerate() {
                let index = offset + 1;
                let broken = |message: &str| QueryError::BrokenJoinChain {
                    index,
                    message: message.to_owned(),
                };
                let relationship = clause
                    .relationship_name
                    .as_deref()
                    .ok_or_else(|| broken("missing relationship name"))?;
                let target = clause
                    .target_alias
                    .as_deref()
                    .ok_or_else(|| broken("missing target alias"))?;
                if clause.source_alias != anchor {
                    return Err(QueryError::BrokenJoinChain {
                        index,
                        message: format!(
                            "clause is anchored at '{}' but the chain ends at '{anchor}'",
                            clause.source_alias
                        ),
                    });
                }
                sql.push_str(&format!(
                    " {} {anchor}.{relationship} {target}",
                    clause.join_kind.keyword()
                ));
                conditions.extend(clause.join_condition.as_deref());
                anchor = target;
            }
        }
    }

    conditions.extend(context.where_condition.as_deref());
    if !conditions.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&conditions.join(" AND "));
    }

    if !context.order_by.is_empty() {
        let keys: Vec<String> = context
            .order_by
            .iter()
            .map(|(expression, order)| format!("{expression} {order}"))
            .collect();
        sql.push_str(" ORDER BY ");
        sql.push_str(&keys.join(", "));
    }

    Ok(QueryStatement(sql))
}
