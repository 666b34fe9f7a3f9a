//! Expression types and the promotion relation.

use std::fmt;

use rustodata_model::EdmSimpleType;

/// The result type of an expression node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EdmType {
    /// A primitive type.
    Simple(EdmSimpleType),
    /// A complex type, by name.
    Complex(String),
    /// An entity type reached through a single-valued navigation property.
    Entity(String),
}

impl EdmType {
    /// The primitive type, if this is one.
    #[must_use]
    pub fn as_simple(&self) -> Option<EdmSimpleType> {
        match self {
            Self::Simple(ty) => Some(*ty),
            _ => None,
        }
    }

    /// Returns `true` for complex and entity types.
    #[must_use]
    pub fn is_structural(&self) -> bool {
        !matches!(self, Self::Simple(_))
    }
}

impl From<EdmSimpleType> for EdmType {
    fn from(ty: EdmSimpleType) -> Self {
        Self::Simple(ty)
    }
}

impl fmt::Display for EdmType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Simple(ty) => write!(f, "{ty}"),
            Self::Complex(name) | Self::Entity(name) => f.write_str(name),
        }
    }
}

/// Returns `true` if a value of type `actual` may be passed where `formal` is
/// expected, either exactly or through promotion.
///
/// `Null` is accepted everywhere. `Bit` widens to `Boolean` and every numeric
/// type, `Uint7` to both byte types and wider; the integer ladder continues
/// `Int16 → Int32 → Int64 → Single → Double → Decimal`.
#[must_use]
pub fn accepts(formal: EdmSimpleType, actual: EdmSimpleType) -> bool {
    use EdmSimpleType::{
        Bit, Boolean, Byte, Decimal, Double, Int16, Int32, Int64, Null, SByte, Single, Uint7,
    };

    if formal == actual || actual == Null {
        return true;
    }
    match actual {
        Bit => formal == Boolean || formal.is_numeric(),
        Uint7 => matches!(formal, Byte | SByte | Int16 | Int32 | Int64 | Single | Double | Decimal),
        Byte | SByte => matches!(formal, Int16 | Int32 | Int64 | Single | Double | Decimal),
        Int16 => matches!(formal, Int32 | Int64 | Single | Double | Decimal),
        Int32 => matches!(formal, Int64 | Single | Double | Decimal),
        Int64 => matches!(formal, Single | Double | Decimal),
        Single => matches!(formal, Double | Decimal),
        Double => formal == Decimal,
        _ => false,
    }
}
