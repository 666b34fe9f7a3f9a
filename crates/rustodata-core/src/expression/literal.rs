//! Typed literal values.
//!
//! Literals are typed once, at lex time, and carried through the tree unchanged.
//! [`EdmLiteral`]'s `Display` renders the value as a JPQL literal.

use std::fmt;

use chrono::{DateTime, FixedOffset, NaiveDateTime, NaiveTime, Utc};
use rustodata_model::EdmSimpleType;
use uuid::Uuid;

/// The value part of a literal.
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    /// `null`.
    Null,
    /// `true` / `false`.
    Boolean(bool),
    /// Any integral value (Bit, Uint7, Byte, SByte, Int16, Int32, Int64).
    Integer(i64),
    /// Decimal value, kept in its textual form to preserve precision.
    Decimal(String),
    /// Double or Single value.
    Float(f64),
    /// Unescaped string content.
    String(String),
    /// Binary content.
    Binary(Vec<u8>),
    /// `datetime'...'`.
    DateTime(NaiveDateTime),
    /// `datetimeoffset'...'`.
    DateTimeOffset(DateTime<FixedOffset>),
    /// `time'...'`.
    Time(NaiveTime),
    /// `guid'...'`.
    Guid(Uuid),
}

/// A literal together with its resolved primitive type.
#[derive(Debug, Clone, PartialEq)]
pub struct EdmLiteral {
    /// The literal's type (possibly a system type such as `Bit`).
    pub ty: EdmSimpleType,
    /// The literal's value.
    pub value: LiteralValue,
}

impl EdmLiteral {
    /// The `null` literal.
    #[must_use]
    pub fn null() -> Self {
        Self {
            ty: EdmSimpleType::Null,
            value: LiteralValue::Null,
        }
    }

    /// A boolean literal.
    #[must_use]
    pub fn boolean(value: bool) -> Self {
        Self {
            ty: EdmSimpleType::Boolean,
            value: LiteralValue::Boolean(value),
        }
    }

    /// A string literal.
    #[must_use]
    pub fn string(value: impl Into<String>) -> Self {
        Self {
            ty: EdmSimpleType::String,
            value: LiteralValue::String(value.into()),
        }
    }

    /// An integer literal typed by the narrowest-fit rule.
    #[must_use]
    pub fn integer(value: i64) -> Self {
        let ty = match value {
            0 | 1 => EdmSimpleType::Bit,
            2..=127 => EdmSimpleType::Uint7,
            -128..=-1 => EdmSimpleType::SByte,
            128..=255 => EdmSimpleType::Byte,
            v if i16::try_from(v).is_ok() => EdmSimpleType::Int16,
            v if i32::try_from(v).is_ok() => EdmSimpleType::Int32,
            _ => EdmSimpleType::Int64,
        };
        Self {
            ty,
            value: LiteralValue::Integer(value),
        }
    }

    /// Returns `true` for the `null` literal.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self.value, LiteralValue::Null)
    }

    /// Length in characters for string literals, in bytes for binary literals.
    #[must_use]
    pub fn length(&self) -> Option<usize> {
        match &self.value {
            LiteralValue::String(s) => Some(s.chars().count()),
            LiteralValue::Binary(b) => Some(b.len()),
            _ => None,
        }
    }
}

impl fmt::Display for EdmLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            LiteralValue::Null => f.write_str("NULL"),
            LiteralValue::Boolean(b) => write!(f, "{b}"),
            LiteralValue::Integer(i) => write!(f, "{i}"),
            LiteralValue::Decimal(d) => f.write_str(d),
            LiteralValue::Float(x) => write!(f, "{x}"),
            LiteralValue::String(s) => write!(f, "'{}'", s.replace('\'', "''")),
            LiteralValue::Binary(bytes) => write!(f, "X'{}'", hex::encode_upper(bytes)),
            LiteralValue::DateTime(dt) => {
                write!(f, "{{ts '{}'}}", dt.format("%Y-%m-%d %H:%M:%S%.3f"))
            }
            LiteralValue::DateTimeOffset(dt) => {
                let utc = dt.with_timezone(&Utc).naive_utc();
                write!(f, "{{ts '{}'}}", utc.format("%Y-%m-%d %H:%M:%S%.3f"))
            }
            LiteralValue::Time(t) => write!(f, "{{t '{}'}}", t.format("%H:%M:%S")),
            LiteralValue::Guid(g) => write!(f, "'{}'", g.hyphenated()),
        }
    }
}

// ---------------------------------------------------------------------------
// Literal parsing
// ---------------------------------------------------------------------------

/// Prefixes introducing a quoted typed literal (`datetime'...'`, `X'...'`).
const TYPED_PREFIXES: [&str; 6] = ["datetime", "datetimeoffset", "time", "guid", "binary", "X"];

/// Returns `true` if `word` introduces a quoted typed literal.
pub(crate) fn is_typed_prefix(word: &str) -> bool {
    TYPED_PREFIXES.contains(&word)
}

/// Parse the body of a typed literal. Returns `None` if the body is malformed.
pub(crate) fn parse_typed(prefix: &str, body: &str) -> Option<EdmLiteral> {
    let (ty, value) = match prefix {
        "datetime" => (EdmSimpleType::DateTime, LiteralValue::DateTime(parse_datetime(body)?)),
        "datetimeoffset" => (
            EdmSimpleType::DateTimeOffset,
            LiteralValue::DateTimeOffset(DateTime::parse_from_rfc3339(body).ok()?),
        ),
        "time" => (EdmSimpleType::Time, LiteralValue::Time(parse_duration_time(body)?)),
        "guid" => (EdmSimpleType::Guid, LiteralValue::Guid(Uuid::parse_str(body).ok()?)),
        "binary" | "X" => (EdmSimpleType::Binary, LiteralValue::Binary(hex::decode(body).ok()?)),
        _ => return None,
    };
    Some(EdmLiteral { ty, value })
}

fn parse_datetime(body: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(body, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(body, "%Y-%m-%dT%H:%M"))
        .ok()
}

/// Parse an `xs:duration`-style time of day: `PT13H20M`, `PT13H20M15.5S`.
fn parse_duration_time(body: &str) -> Option<NaiveTime> {
    let mut rest = body.strip_prefix("PT")?;
    if rest.is_empty() {
        return None;
    }

    let mut hours = 0u32;
    let mut minutes = 0u32;
    let mut seconds = 0f64;
    for (designator, slot) in [('H', 0usize), ('M', 1), ('S', 2)] {
        let Some(idx) = rest.find(designator) else {
            continue;
        };
        let number = &rest[..idx];
        if number.is_empty() {
            return None;
        }
        match slot {
            0 => hours = number.parse().ok()?,
            1 => minutes = number.parse().ok()?,
            _ => seconds = number.parse().ok()?,
        }
        rest = &rest[idx + 1..];
    }
    if !rest.is_empty() || !(0.0..60.0).contains(&seconds) {
        return None;
    }

    // Truncated, never rounded up into a leap second.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let nanos = ((seconds.fract() * 1e9) as u32).min(999_999_999);
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let whole = seconds.trunc() as u32;
    NaiveTime::from_hms_nano_opt(hours, minutes, whole, nanos)
}

/// Parse a numeric literal, including an optional leading `-` and an optional
/// type suffix (`L`, `M`, `D`, `F`, case-insensitive). Returns `None` if the
/// text is malformed.
pub(crate) fn parse_number(text: &str) -> Option<EdmLiteral> {
    let (body, suffix) = match text.chars().last() {
        Some(c) if matches!(c.to_ascii_uppercase(), 'L' | 'M' | 'D' | 'F') => {
            (&text[..text.len() - 1], Some(c.to_ascii_uppercase()))
        }
        _ => (text, None),
    };
    let digits = body.strip_prefix('-').unwrap_or(body);
    if !digits.starts_with(|c: char| c.is_ascii_digit()) {
        return None;
    }
    let has_fraction = body.contains('.');
    let has_exponent = body.contains(['e', 'E']);

    let literal = match suffix {
        Some('L') => {
            if has_fraction || has_exponent {
                return None;
            }
            EdmLiteral {
                ty: EdmSimpleType::Int64,
                value: LiteralValue::Integer(body.parse().ok()?),
            }
        }
        Some('M') => {
            if has_exponent {
                return None;
            }
            decimal(body)?
        }
        Some('D') => float(body, EdmSimpleType::Double)?,
        Some(_) => float(body, EdmSimpleType::Single)?,
        None if has_exponent => float(body, EdmSimpleType::Double)?,
        None if has_fraction => decimal(body)?,
        None => match body.parse::<i64>() {
            Ok(value) => EdmLiteral::integer(value),
            Err(_) => decimal(body)?,
        },
    };
    Some(literal)
}

/// A `Double` or `Single` literal. Values outside the type's finite range are
/// rejected.
fn float(body: &str, ty: EdmSimpleType) -> Option<EdmLiteral> {
    let value: f64 = body.parse().ok()?;
    let max = if matches!(ty, EdmSimpleType::Single) {
        f64::from(f32::MAX)
    } else {
        f64::MAX
    };
    if !value.is_finite() || value.abs() > max {
        return None;
    }
    Some(EdmLiteral {
        ty,
        value: LiteralValue::Float(value),
    })
}

fn decimal(body: &str) -> Option<EdmLiteral> {
    let digits = body.strip_prefix('-').unwrap_or(body);
    let mut parts = digits.splitn(2, '.');
    let whole = parts.next()?;
    let fraction = parts.next().unwrap_or("0");
    let valid = |s: &str| !s.is_empty() && s.chars().all(|c| c.is_ascii_digit());
    if !valid(whole) || !valid(fraction) {
        return None;
    }
    Some(EdmLiteral {
        ty: EdmSimpleType::Decimal,
        value: LiteralValue::Decimal(body.to_owned()),
    })
}
