//! Entity, complex, and navigation metadata.
//!
//! An [`EdmModel`] is supplied by the outer layer (typically deserialized from a
//! JSON document) and is read-only for the lifetime of a request. Entity types,
//! properties, and navigation properties may carry a `mapping`: the internal name
//! used by the backing store instead of the protocol-visible name.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::edm::EdmSimpleType;

/// The entity data model of a service.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdmModel {
    /// Schema namespace.
    #[serde(default)]
    pub namespace: String,

    /// Entity sets exposed by the service.
    #[serde(default)]
    pub entity_sets: Vec<EntitySet>,

    /// Entity types.
    #[serde(default)]
    pub entity_types: Vec<EntityType>,

    /// Complex types.
    #[serde(default)]
    pub complex_types: Vec<ComplexType>,
}

impl EdmModel {
    /// Look up an entity set by name.
    #[must_use]
    pub fn entity_set(&self, name: &str) -> Option<&EntitySet> {
        self.entity_sets.iter().find(|s| s.name == name)
    }

    /// Look up an entity type by name.
    #[must_use]
    pub fn entity_type(&self, name: &str) -> Option<&EntityType> {
        self.entity_types.iter().find(|t| t.name == name)
    }

    /// Look up a complex type by name.
    #[must_use]
    pub fn complex_type(&self, name: &str) -> Option<&ComplexType> {
        self.complex_types.iter().find(|t| t.name == name)
    }

    /// Resolve the entity type bound to an entity set.
    #[must_use]
    pub fn entity_type_of_set(&self, set_name: &str) -> Option<&EntityType> {
        self.entity_set(set_name)
            .and_then(|set| self.entity_type(&set.entity_type))
    }
}

/// An entity set: a named collection of entities of one type.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntitySet {
    /// Entity set name as it appears in resource paths.
    pub name: String,
    /// Name of the entity type of the set's members.
    pub entity_type: String,
}

/// An entity type.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityType {
    /// Protocol-visible type name.
    pub name: String,

    /// Internal entity name used by the backing store.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mapping: Option<String>,

    /// Names of the key properties, in declaration order.
    pub key: Vec<String>,

    /// Structural properties.
    #[serde(default)]
    pub properties: Vec<Property>,

    /// Navigation properties.
    #[serde(default)]
    pub navigation_properties: Vec<NavigationProperty>,
}

impl EntityType {
    /// Internal name of the entity, falling back to the protocol name.
    #[must_use]
    pub fn internal_name(&self) -> &str {
        self.mapping.as_deref().unwrap_or(&self.name)
    }

    /// Look up a structural property by name.
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name == name)
    }

    /// Look up a navigation property by name.
    #[must_use]
    pub fn navigation_property(&self, name: &str) -> Option<&NavigationProperty> {
        self.navigation_properties.iter().find(|p| p.name == name)
    }

    /// Key properties in declaration order. Key names without a matching
    /// property are skipped.
    #[must_use]
    pub fn key_properties(&self) -> Vec<&Property> {
        self.key.iter().filter_map(|k| self.property(k)).collect()
    }
}

/// A complex (structured, keyless) type.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplexType {
    /// Protocol-visible type name.
    pub name: String,
    /// Structural properties.
    #[serde(default)]
    pub properties: Vec<Property>,
}

impl ComplexType {
    /// Look up a property by name.
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name == name)
    }
}

/// A structural property of an entity or complex type.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    /// Protocol-visible property name.
    pub name: String,

    /// Declared type.
    #[serde(rename = "type")]
    pub ty: PropertyType,

    /// Type facets.
    #[serde(default)]
    pub facets: Facets,

    /// Internal property name used by the backing store.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mapping: Option<String>,
}

impl Property {
    /// Internal name of the property, falling back to the protocol name.
    #[must_use]
    pub fn internal_name(&self) -> &str {
        self.mapping.as_deref().unwrap_or(&self.name)
    }
}

/// The declared type of a property: a primitive type or a complex type name.
///
/// Serialized as a single string: `Edm.*` names denote primitive types, any
/// other name refers to a complex type of the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum PropertyType {
    /// A primitive type.
    Simple(EdmSimpleType),
    /// A complex type, by name.
    Complex(String),
}

impl TryFrom<String> for PropertyType {
    type Error = crate::edm::UnknownTypeName;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value.starts_with("Edm.") {
            value.parse().map(Self::Simple)
        } else {
            Ok(Self::Complex(value))
        }
    }
}

impl From<PropertyType> for String {
    fn from(value: PropertyType) -> Self {
        match value {
            PropertyType::Simple(ty) => ty.name().to_owned(),
            PropertyType::Complex(name) => name,
        }
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Simple(ty) => write!(f, "{ty}"),
            Self::Complex(name) => f.write_str(name),
        }
    }
}

/// Property facets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Facets {
    /// Whether the property accepts null (`None` means unspecified, i.e. nullable).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nullable: Option<bool>,
    /// Maximum length for string and binary properties.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u32>,
    /// Numeric precision.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precision: Option<u32>,
    /// Numeric scale.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<u32>,
}

impl Facets {
    /// Returns `true` unless the facets explicitly forbid null.
    #[must_use]
    pub fn is_nullable(&self) -> bool {
        self.nullable.unwrap_or(true)
    }
}

/// Cardinality of the target end of a navigation property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Multiplicity {
    /// `0..1`
    #[serde(rename = "0..1")]
    ZeroOrOne,
    /// `1`
    #[serde(rename = "1")]
    One,
    /// `*`
    #[serde(rename = "*")]
    Many,
}

impl Multiplicity {
    /// Returns `true` for single-valued ends (`0..1` and `1`).
    #[must_use]
    pub fn is_single(&self) -> bool {
        !matches!(self, Self::Many)
    }
}

/// A navigation property: one end of a relationship between entity types.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationProperty {
    /// Protocol-visible navigation property name.
    pub name: String,

    /// Relationship (association) name.
    pub relationship: String,

    /// Name of the entity type at the target end.
    pub target_type: String,

    /// Cardinality of the target end.
    pub multiplicity: Multiplicity,

    /// Internal relationship name used by the backing store.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mapping: Option<String>,
}

impl NavigationProperty {
    /// Internal relationship name, falling back to the navigation property name.
    #[must_use]
    pub fn internal_name(&self) -> &str {
        self.mapping.as_deref().unwrap_or(&self.name)
    }
}
