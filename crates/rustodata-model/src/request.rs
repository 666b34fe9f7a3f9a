//! Request descriptor produced by the URI-parsing layer.
//!
//! The descriptor is the already-split form of a resource path plus its query
//! options, e.g. `SalesOrders(1)/Items?$filter=Quantity gt 5&$top=10` becomes a
//! request on `SalesOrders` with one key predicate, one navigation segment, a raw
//! filter string, and `top = 10`. Key predicate values stay in URI literal form
//! and are typed by the compiler.

use serde::{Deserialize, Serialize};

/// A query request against an entity set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryRequest {
    /// The starting entity set.
    pub entity_set: String,

    /// Key predicates addressing a single entity of the starting set.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub key_predicates: Vec<KeyPredicate>,

    /// Navigation hops, in path order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub navigation: Vec<NavigationSegment>,

    /// Raw `$filter` expression.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,

    /// Raw `$orderby` expression.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_by: Option<String>,

    /// `$select` property names. Empty (or `*`) selects the whole entity.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub select: Vec<String>,

    /// `$skip`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip: Option<u32>,

    /// `$top`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top: Option<u32>,

    /// `$count` (the `/$count` path segment).
    #[serde(default)]
    pub count: bool,
}

impl QueryRequest {
    /// Create a request on the given entity set with no options.
    #[must_use]
    pub fn new(entity_set: impl Into<String>) -> Self {
        Self {
            entity_set: entity_set.into(),
            ..Self::default()
        }
    }

    /// Add a key predicate on the starting entity set.
    #[must_use]
    pub fn with_key(mut self, key: KeyPredicate) -> Self {
        self.key_predicates.push(key);
        self
    }

    /// Append a navigation hop.
    #[must_use]
    pub fn navigate(mut self, segment: NavigationSegment) -> Self {
        self.navigation.push(segment);
        self
    }

    /// Set the `$filter` expression.
    #[must_use]
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    /// Set the `$orderby` expression.
    #[must_use]
    pub fn with_order_by(mut self, order_by: impl Into<String>) -> Self {
        self.order_by = Some(order_by.into());
        self
    }

    /// Set the `$select` list.
    #[must_use]
    pub fn with_select<I, S>(mut self, select: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.select = select.into_iter().map(Into::into).collect();
        self
    }

    /// Set `$skip`.
    #[must_use]
    pub fn with_skip(mut self, skip: u32) -> Self {
        self.skip = Some(skip);
        self
    }

    /// Set `$top`.
    #[must_use]
    pub fn with_top(mut self, top: u32) -> Self {
        self.top = Some(top);
        self
    }

    /// Request the entity count instead of the entities.
    #[must_use]
    pub fn counting(mut self) -> Self {
        self.count = true;
        self
    }
}

/// One key predicate: `(value)` or `(Property=value)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyPredicate {
    /// Key property name; `None` for the unnamed single-key form.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property: Option<String>,
    /// Value in URI literal form (`1`, `'abc'`, `guid'...'`).
    pub value: String,
}

impl KeyPredicate {
    /// An unnamed predicate: `(value)`.
    #[must_use]
    pub fn unnamed(value: impl Into<String>) -> Self {
        Self {
            property: None,
            value: value.into(),
        }
    }

    /// A named predicate: `(Property=value)`.
    #[must_use]
    pub fn named(property: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            property: Some(property.into()),
            value: value.into(),
        }
    }
}

/// One navigation hop of a resource path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationSegment {
    /// Navigation property name.
    pub property: String,
    /// Key predicates addressing an entity at the end of this hop.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub key_predicates: Vec<KeyPredicate>,
}

impl NavigationSegment {
    /// A hop without key predicates.
    #[must_use]
    pub fn new(property: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            key_predicates: Vec::new(),
        }
    }

    /// Add a key predicate to this hop.
    #[must_use]
    pub fn with_key(mut self, key: KeyPredicate) -> Self {
        self.key_predicates.push(key);
        self
    }
}
