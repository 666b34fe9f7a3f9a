//! Primitive (simple) types of the entity data model.
//!
//! Besides the public `Edm.*` types that may appear in metadata, the catalogue
//! contains three system types that only ever appear on literals during type
//! inference: `Bit` (the literals `0` and `1`, which are both boolean-like and
//! numeric), `Uint7` (integers `0..=127`, which fit both signed and unsigned
//! bytes), and `Null` (the `null` literal).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A primitive type of the entity data model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EdmSimpleType {
    /// `Edm.Binary`.
    #[serde(rename = "Edm.Binary")]
    Binary,
    /// `Edm.Boolean`.
    #[serde(rename = "Edm.Boolean")]
    Boolean,
    /// `Edm.Byte` (unsigned 8-bit).
    #[serde(rename = "Edm.Byte")]
    Byte,
    /// `Edm.DateTime`.
    #[serde(rename = "Edm.DateTime")]
    DateTime,
    /// `Edm.DateTimeOffset`.
    #[serde(rename = "Edm.DateTimeOffset")]
    DateTimeOffset,
    /// `Edm.Decimal`.
    #[serde(rename = "Edm.Decimal")]
    Decimal,
    /// `Edm.Double`.
    #[serde(rename = "Edm.Double")]
    Double,
    /// `Edm.Guid`.
    #[serde(rename = "Edm.Guid")]
    Guid,
    /// `Edm.Int16`.
    #[serde(rename = "Edm.Int16")]
    Int16,
    /// `Edm.Int32`.
    #[serde(rename = "Edm.Int32")]
    Int32,
    /// `Edm.Int64`.
    #[serde(rename = "Edm.Int64")]
    Int64,
    /// `Edm.SByte` (signed 8-bit).
    #[serde(rename = "Edm.SByte")]
    SByte,
    /// `Edm.Single`.
    #[serde(rename = "Edm.Single")]
    Single,
    /// `Edm.String`.
    #[serde(rename = "Edm.String")]
    String,
    /// `Edm.Time`.
    #[serde(rename = "Edm.Time")]
    Time,
    /// System type of the literals `0` and `1`.
    #[serde(rename = "System.Bit")]
    Bit,
    /// System type of integer literals in `0..=127`.
    #[serde(rename = "System.Uint7")]
    Uint7,
    /// System type of the `null` literal.
    #[serde(rename = "Null")]
    Null,
}

impl EdmSimpleType {
    /// All public `Edm.*` types, in catalogue order.
    pub const PUBLIC: [Self; 15] = [
        Self::Binary,
        Self::Boolean,
        Self::Byte,
        Self::DateTime,
        Self::DateTimeOffset,
        Self::Decimal,
        Self::Double,
        Self::Guid,
        Self::Int16,
        Self::Int32,
        Self::Int64,
        Self::SByte,
        Self::Single,
        Self::String,
        Self::Time,
    ];

    /// Returns the qualified type name (e.g. `"Edm.Int32"`).
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Binary => "Edm.Binary",
            Self::Boolean => "Edm.Boolean",
            Self::Byte => "Edm.Byte",
            Self::DateTime => "Edm.DateTime",
            Self::DateTimeOffset => "Edm.DateTimeOffset",
            Self::Decimal => "Edm.Decimal",
            Self::Double => "Edm.Double",
            Self::Guid => "Edm.Guid",
            Self::Int16 => "Edm.Int16",
            Self::Int32 => "Edm.Int32",
            Self::Int64 => "Edm.Int64",
            Self::SByte => "Edm.SByte",
            Self::Single => "Edm.Single",
            Self::String => "Edm.String",
            Self::Time => "Edm.Time",
            Self::Bit => "System.Bit",
            Self::Uint7 => "System.Uint7",
            Self::Null => "Null",
        }
    }

    /// Returns `true` for the literal-only system types (`Bit`, `Uint7`, `Null`).
    #[must_use]
    pub fn is_system(&self) -> bool {
        matches!(self, Self::Bit | Self::Uint7 | Self::Null)
    }

    /// Returns `true` for integer and floating-point types, including `Bit` and `Uint7`.
    #[must_use]
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            Self::Bit
                | Self::Uint7
                | Self::Byte
                | Self::SByte
                | Self::Int16
                | Self::Int32
                | Self::Int64
                | Self::Single
                | Self::Double
                | Self::Decimal
        )
    }
}

impl fmt::Display for EdmSimpleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when parsing an unknown type name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownTypeName(pub String);

impl fmt::Display for UnknownTypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown simple type name: {}", self.0)
    }
}

impl std::error::Error for UnknownTypeName {}

impl FromStr for EdmSimpleType {
    type Err = UnknownTypeName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::PUBLIC
            .into_iter()
            .chain([Self::Bit, Self::Uint7, Self::Null])
            .find(|t| t.name() == s)
            .ok_or_else(|| UnknownTypeName(s.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_round_trip_type_names() {
        for ty in EdmSimpleType::PUBLIC {
            assert_eq!(ty.name().parse::<EdmSimpleType>().unwrap(), ty);
        }
        assert_eq!("System.Uint7".parse::<EdmSimpleType>().unwrap(), EdmSimpleType::Uint7);
    }

    #[test]
    fn test_should_reject_unknown_type_name() {
        assert!("Edm.Int128".parse::<EdmSimpleType>().is_err());
    }

    #[test]
    fn test_should_flag_system_types() {
        assert!(EdmSimpleType::Bit.is_system());
        assert!(EdmSimpleType::Null.is_system());
        assert!(!EdmSimpleType::Int32.is_system());
        assert!(EdmSimpleType::Uint7.is_numeric());
        assert!(!EdmSimpleType::Guid.is_numeric());
    }

    #[test]
    fn test_should_deserialize_qualified_name() {
        let ty: EdmSimpleType = serde_json::from_str("\"Edm.DateTime\"").unwrap();
        assert_eq!(ty, EdmSimpleType::DateTime);
    }
}
