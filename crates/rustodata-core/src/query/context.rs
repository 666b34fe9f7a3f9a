//! The intermediate representation between a resolved request and its statement.

use crate::config::JoinKind;
use crate::expression::SortOrder;

/// Shape of the statement a [`QueryContext`] describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextShape {
    /// A single entity binding, no joins.
    Select,
    /// A root binding followed by one join per navigation hop.
    JoinSelect,
}

/// One entry of the join chain.
///
/// Entry 0 is the root binding: the starting entity, its alias, and its key
/// condition. Every later entry is a navigation hop that joins
/// `source_alias.relationship_name` as `target_alias`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinClause {
    /// Internal entity name: the root entity for entry 0, the reached entity for hops.
    pub source_entity_name: String,
    /// Alias the entry is anchored at.
    pub source_alias: String,
    /// Internal relationship name (hops only).
    pub relationship_name: Option<String>,
    /// Alias bound by the hop (hops only).
    pub target_alias: Option<String>,
    /// Key condition on the entry's own alias.
    pub join_condition: Option<String>,
    /// Join flavour.
    pub join_kind: JoinKind,
}

/// Everything needed to render one query statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryContext {
    /// Statement shape.
    pub shape: ContextShape,
    /// Internal name of the addressed entity.
    pub entity_name: String,
    /// Alias of the addressed entity.
    pub entity_alias: String,
    /// Rendered select list.
    pub select_expression: String,
    /// Join chain; empty for [`ContextShape::Select`].
    pub join_clauses: Vec<JoinClause>,
    /// Filter (and, for direct selects, key) condition.
    pub where_condition: Option<String>,
    /// Rendered sort keys with their direction.
    pub order_by: Vec<(String, SortOrder)>,
}

/// Per-statement alias source with independent entity and relationship counters.
#[derive(Debug)]
pub struct AliasGenerator {
    entity_prefix: String,
    relationship_prefix: String,
    entities: usize,
    relationships: usize,
}

impl AliasGenerator {
    /// Create a generator; both sequences start at 1.
    #[must_use]
    pub fn new(entity_prefix: impl Into<String>, relationship_prefix: impl Into<String>) -> Self {
        Self {
            entity_prefix: entity_prefix.into(),
            relationship_prefix: relationship_prefix.into(),
            entities: 0,
            relationships: 0,
        }
    }

    /// Next entity alias (`E1`, `E2`, ...).
    pub fn next_entity_alias(&mut self) -> String {
        self.entities += 1;
        format!("{}{}", self.entity_prefix, self.entities)
    }

    /// Next relationship alias (`R1`, `R2`, ...).
    pub fn next_relationship_alias(&mut self) -> String {
        self.relationships += 1;
        format!("{}{}", self.relationship_prefix, self.relationships)
    }
}
