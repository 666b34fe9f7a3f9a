//! Query context construction.
//!
//! Turns a [`ResolvedRequest`] into a [`QueryContext`]: binds aliases, builds
//! the join chain for navigation hops, and translates key predicates, the
//! filter, the select list, and the sort keys.

use rustodata_model::Property;
use tracing::debug;

use super::context::{AliasGenerator, ContextShape, JoinClause, QueryContext};
use super::resolve::{ResolvedKey, ResolvedRequest};
use crate::config::CompilerConfig;
use crate::error::QueryResult;
use crate::expression::{BinaryOperator, NodeKind, translate};

/// Build the query context for `request`.
///
/// Returns `None` without building anything when the request asks for a page
/// of size zero.
pub fn build(
    request: &ResolvedRequest<'_>,
    config: &CompilerConfig,
) -> QueryResult<Option<QueryContext>> {
    if request.top == Some(0) {
        debug!(entity_type = %request.start.name, "page size zero, skipping context");
        return Ok(None);
    }

    let mut aliases =
        AliasGenerator::new(&config.entity_alias_prefix, &config.relationship_alias_prefix);
    let root_alias = aliases.next_entity_alias();
    let root_condition = key_predicate_condition(&root_alias, &request.keys);

    let (shape, alias, join_clauses) = if request.hops.is_empty() {
        (ContextShape::Select, root_alias, Vec::new())
    } else {
        let mut clauses = Vec::with_capacity(request.hops.len() + 1);
        clauses.push(JoinClause {
            source_entity_name: request.start.internal_name().to_owned(),
            source_alias: root_alias.clone(),
            relationship_name: None,
            target_alias: None,
            join_condition: root_condition.clone(),
            join_kind: config.join_kind,
        });
        let mut anchor = root_alias;
        for hop in &request.hops {
            let alias = aliases.next_relationship_alias();
            clauses.push(JoinClause {
                source_entity_name: hop.target.internal_name().to_owned(),
                source_alias: anchor,
                relationship_name: Some(hop.navigation.internal_name().to_owned()),
                target_alias: Some(alias.clone()),
                join_condition: key_predicate_condition(&alias, &hop.keys),
                join_kind: config.join_kind,
            });
            anchor = alias;
        }
        (ContextShape::JoinSelect, anchor, clauses)
    };

    let mut conditions = Vec::new();
    if shape == ContextShape::Select {
        conditions.extend(root_condition);
    }
    let other_conditions = !conditions.is_empty()
        || join_clauses.iter().any(|c| c.join_condition.is_some());
    if let Some(filter) = &request.filter {
        let rendered = translate(filter, &alias)?;
        let is_or = matches!(
            filter.kind,
            NodeKind::Binary {
                op: BinaryOperator::Or,
                ..
            }
        );
        conditions.push(if is_or && other_conditions {
            format!("({rendered})")
        } else {
            rendered
        });
    }

    let (select_expression, order_by) = if request.count {
        (format!("COUNT({alias})"), Vec::new())
    } else {
        let order_by = request
            .order_by
            .iter()
            .map(|item| Ok((translate(&item.expression, &alias)?, item.order)))
            .collect::<QueryResult<Vec<_>>>()?;
        (select_expression(&alias, &request.select), order_by)
    };

    Ok(Some(QueryContext {
        shape,
        entity_name: request.target().internal_name().to_owned(),
        entity_alias: alias,
        select_expression,
        join_clauses,
        where_condition: (!conditions.is_empty()).then(|| conditions.join(" AND ")),
        order_by,
    }))
}

/// Render key predicates as `alias.p1 = v1 AND alias.p2 = v2`, or `None` if
/// there are none.
#[must_use]
pub fn key_predicate_condition(alias: &str, keys: &[ResolvedKey<'_>]) -> Option<String> {
    if keys.is_empty() {
        return None;
    }
    let parts: Vec<String> = keys
        .iter()
        .map(|key| {
            let name = key.property.internal_name();
            if key.value.is_null() {
                format!("{alias}.{name} IS NULL")
            } else {
                format!("{alias}.{name} = {}", key.value)
            }
        })
        .collect();
    Some(parts.join(" AND "))
}

/// Render a select list: alias-qualified properties, or the bare alias when
/// no properties are given.
#[must_use]
pub fn select_expression(alias: &str, properties: &[&Property]) -> String {
    if properties.is_empty() {
        return alias.to_owned();
    }
    properties
        .iter()
        .map(|p| format!("{alias}.{}", p.internal_name()))
        .collect::<Vec<_>>()
        .join(", ")
}
