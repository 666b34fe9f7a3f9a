//! The operator table: operators, methods, precedences, and signatures.
//!
//! The table is built once per process (see [`operator_table`]) and is read-only
//! afterward. Signature resolution is two-pass: an exact pass over every
//! declared [`ParameterSet`] in declaration order, then a promotion pass in the
//! same order. The first hit of a pass wins, so ties between promotable
//! signatures go to the one declared first.

use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

use rustodata_model::EdmSimpleType;

use super::error::ExpressionError;
use super::types::{EdmType, accepts};

// ---------------------------------------------------------------------------
// Operator identifiers
// ---------------------------------------------------------------------------

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOperator {
    /// `or`
    Or,
    /// `and`
    And,
    /// `eq`
    Eq,
    /// `ne`
    Ne,
    /// `lt`
    Lt,
    /// `le`
    Le,
    /// `gt`
    Gt,
    /// `ge`
    Ge,
    /// `add`
    Add,
    /// `sub`
    Sub,
    /// `mul`
    Mul,
    /// `div`
    Div,
    /// `mod`
    Mod,
}

impl BinaryOperator {
    /// Every binary operator.
    pub const ALL: [Self; 13] = [
        Self::Or,
        Self::And,
        Self::Eq,
        Self::Ne,
        Self::Lt,
        Self::Le,
        Self::Gt,
        Self::Ge,
        Self::Add,
        Self::Sub,
        Self::Mul,
        Self::Div,
        Self::Mod,
    ];

    /// The operator keyword in URI syntax.
    #[must_use]
    pub fn uri_literal(self) -> &'static str {
        match self {
            Self::Or => "or",
            Self::And => "and",
            Self::Eq => "eq",
            Self::Ne => "ne",
            Self::Lt => "lt",
            Self::Le => "le",
            Self::Gt => "gt",
            Self::Ge => "ge",
            Self::Add => "add",
            Self::Sub => "sub",
            Self::Mul => "mul",
            Self::Div => "div",
            Self::Mod => "mod",
        }
    }

    /// Look up an operator by its URI keyword.
    #[must_use]
    pub fn from_uri_literal(word: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.uri_literal() == word)
    }
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOperator {
    /// `not`
    Not,
    /// `-`
    Negate,
}

/// Canonical functions callable inside expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// `endswith(s, suffix)`
    EndsWith,
    /// `startswith(s, prefix)`
    StartsWith,
    /// `substringof(needle, s)`
    SubstringOf,
    /// `indexof(s, needle)`
    IndexOf,
    /// `tolower(s)`
    ToLower,
    /// `toupper(s)`
    ToUpper,
    /// `trim(s)`
    Trim,
    /// `substring(s, start[, length])`
    Substring,
    /// `concat(a, b, ...)`
    Concat,
    /// `length(s)`
    Length,
    /// `year(d)`
    Year,
    /// `month(d)`
    Month,
    /// `day(d)`
    Day,
    /// `hour(d)`
    Hour,
    /// `minute(d)`
    Minute,
    /// `second(d)`
    Second,
    /// `round(x)`
    Round,
    /// `floor(x)`
    Floor,
    /// `ceiling(x)`
    Ceiling,
}

impl Method {
    /// Every method.
    pub const ALL: [Self; 19] = [
        Self::EndsWith,
        Self::StartsWith,
        Self::SubstringOf,
        Self::IndexOf,
        Self::ToLower,
        Self::ToUpper,
        Self::Trim,
        Self::Substring,
        Self::Concat,
        Self::Length,
        Self::Year,
        Self::Month,
        Self::Day,
        Self::Hour,
        Self::Minute,
        Self::Second,
        Self::Round,
        Self::Floor,
        Self::Ceiling,
    ];

    /// The method name in URI syntax.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::EndsWith => "endswith",
            Self::StartsWith => "startswith",
            Self::SubstringOf => "substringof",
            Self::IndexOf => "indexof",
            Self::ToLower => "tolower",
            Self::ToUpper => "toupper",
            Self::Trim => "trim",
            Self::Substring => "substring",
            Self::Concat => "concat",
            Self::Length => "length",
            Self::Year => "year",
            Self::Month => "month",
            Self::Day => "day",
            Self::Hour => "hour",
            Self::Minute => "minute",
            Self::Second => "second",
            Self::Round => "round",
            Self::Floor => "floor",
            Self::Ceiling => "ceiling",
        }
    }

    /// Look up a method by name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.name() == name)
    }
}

/// Key of an operator table entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatorId {
    /// A binary operator.
    Binary(BinaryOperator),
    /// A unary operator.
    Unary(UnaryOperator),
    /// A method.
    Method(Method),
    /// Member access (`/` or `.`).
    Member,
}

impl fmt::Display for OperatorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Binary(op) => f.write_str(op.uri_literal()),
            Self::Unary(UnaryOperator::Not) => f.write_str("not"),
            Self::Unary(UnaryOperator::Negate) => f.write_str("-"),
            Self::Method(m) => f.write_str(m.name()),
            Self::Member => f.write_str("/"),
        }
    }
}

/// Operator category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatorCategory {
    /// `and`, `or`.
    Logical,
    /// `eq`, `ne`, `lt`, `le`, `gt`, `ge`.
    Comparison,
    /// `add`, `sub`, `mul`, `div`, `mod`.
    Arithmetic,
    /// `not`, `-`.
    Unary,
    /// Canonical functions.
    Method,
    /// Member access.
    Member,
}

// ---------------------------------------------------------------------------
// Signatures
// ---------------------------------------------------------------------------

/// One accepted combination of operand types and its result type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterSet {
    /// Formal parameter types.
    pub parameters: Vec<EdmSimpleType>,
    /// Result type.
    pub result: EdmSimpleType,
    /// The last parameter may repeat.
    pub variadic: bool,
}

impl ParameterSet {
    fn matches(&self, actual: &[EdmSimpleType], exact: bool) -> bool {
        let arity_ok = if self.variadic {
            actual.len() >= self.parameters.len()
        } else {
            actual.len() == self.parameters.len()
        };
        if !arity_ok {
            return false;
        }
        actual.iter().enumerate().all(|(i, &actual)| {
            let formal = self.parameters[i.min(self.parameters.len() - 1)];
            if exact {
                formal == actual
            } else {
                accepts(formal, actual)
            }
        })
    }
}

/// How an operator's result type is determined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Signatures {
    /// Declared parameter sets, resolved by the exact pass then the promotion pass.
    Flex(Vec<ParameterSet>),
    /// The result is the type of the last argument; no signatures may be declared.
    LastParameter,
}

/// An operator table entry.
#[derive(Debug, Clone)]
pub struct OperatorDescriptor {
    /// Operator id.
    pub id: OperatorId,
    /// Keyword or symbol in URI syntax.
    pub uri_literal: &'static str,
    /// Keyword or symbol in the target query language.
    pub surface_syntax: &'static str,
    /// Category.
    pub category: OperatorCategory,
    /// Binding strength; higher binds tighter. Zero for methods.
    pub precedence: u8,
    /// Accepted signatures.
    pub signatures: Signatures,
}

impl OperatorDescriptor {
    /// Resolve the result type for the given operand types, or `None` if no
    /// signature accepts them.
    #[must_use]
    pub fn resolve(&self, actual: &[EdmType]) -> Option<EdmType> {
        let sets = match &self.signatures {
            Signatures::LastParameter => return actual.last().cloned(),
            Signatures::Flex(sets) => sets,
        };
        let simple: Vec<EdmSimpleType> = actual
            .iter()
            .map(EdmType::as_simple)
            .collect::<Option<_>>()?;

        if let Some(set) = sets.iter().find(|s| s.matches(&simple, true)) {
            return Some(EdmType::Simple(set.result));
        }
        let promoted = sets.iter().find(|s| s.matches(&simple, false))?;
        tracing::trace!(operator = %self.id, result = %promoted.result, "resolved through promotion");
        Some(EdmType::Simple(promoted.result))
    }

    /// Like [`resolve`](Self::resolve), but reports a mismatch as an error at
    /// `position`.
    pub fn validate(&self, position: usize, actual: &[EdmType]) -> Result<EdmType, ExpressionError> {
        self.resolve(actual)
            .ok_or_else(|| ExpressionError::OperandTypeMismatch {
                position,
                operator: self.id.to_string(),
                operand_types: actual
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", "),
            })
    }
}

// ---------------------------------------------------------------------------
// Table construction
// ---------------------------------------------------------------------------

/// Programmer errors detected while registering the operator table.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OperatorTableError {
    /// The operator was registered twice.
    #[error("operator '{id}' registered twice")]
    DuplicateOperator {
        /// Operator id.
        id: String,
    },
    /// A signature refers to an operator that was never registered.
    #[error("signature registered for unknown operator '{id}'")]
    UnknownOperator {
        /// Operator id.
        id: String,
    },
    /// A signature was registered against a last-parameter operator.
    #[error("operator '{id}' takes its result from the last parameter and accepts no signatures")]
    LastParameterSignature {
        /// Operator id.
        id: String,
    },
    /// A signature has the wrong number of parameters for its operator.
    #[error("operator '{id}' expects {expected} parameters, signature has {found}")]
    ArityMismatch {
        /// Operator id.
        id: String,
        /// Operator arity.
        expected: usize,
        /// Signature arity.
        found: usize,
    },
    /// A signature mentions a literal-only system type.
    #[error("operator '{id}' signature uses system type {ty}")]
    SystemTypeInSignature {
        /// Operator id.
        id: String,
        /// The offending type.
        ty: String,
    },
    /// An operator was registered without any signature.
    #[error("operator '{id}' has no signatures")]
    MissingSignatures {
        /// Operator id.
        id: String,
    },
}

/// Incremental, validating builder for an [`OperatorTable`].
#[derive(Debug, Default)]
pub struct OperatorTableBuilder {
    entries: HashMap<OperatorId, OperatorDescriptor>,
}

impl OperatorTableBuilder {
    /// Create an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an operator with no signatures yet.
    pub fn operator(
        &mut self,
        id: OperatorId,
        surface_syntax: &'static str,
        category: OperatorCategory,
        precedence: u8,
    ) -> Result<&mut Self, OperatorTableError> {
        self.insert(id, surface_syntax, category, precedence, Signatures::Flex(Vec::new()))
    }

    /// Register an operator whose result is the type of its last argument.
    pub fn last_parameter_operator(
        &mut self,
        id: OperatorId,
        surface_syntax: &'static str,
        category: OperatorCategory,
        precedence: u8,
    ) -> Result<&mut Self, OperatorTableError> {
        self.insert(id, surface_syntax, category, precedence, Signatures::LastParameter)
    }

    fn insert(
        &mut self,
        id: OperatorId,
        surface_syntax: &'static str,
        category: OperatorCategory,
        precedence: u8,
        signatures: Signatures,
    ) -> Result<&mut Self, OperatorTableError> {
        if self.entries.contains_key(&id) {
            return Err(OperatorTableError::DuplicateOperator { id: id.to_string() });
        }
        let uri_literal = match id {
            OperatorId::Binary(op) => op.uri_literal(),
            OperatorId::Unary(UnaryOperator::Not) => "not",
            OperatorId::Unary(UnaryOperator::Negate) => "-",
            OperatorId::Method(m) => m.name(),
            OperatorId::Member => "/",
        };
        self.entries.insert(
            id,
            OperatorDescriptor {
                id,
                uri_literal,
                surface_syntax,
                category,
                precedence,
                signatures,
            },
        );
        Ok(self)
    }

    /// Append a signature to a registered operator.
    pub fn signature(
        &mut self,
        id: OperatorId,
        parameters: &[EdmSimpleType],
        result: EdmSimpleType,
    ) -> Result<&mut Self, OperatorTableError> {
        self.push(id, parameters, result, false)
    }

    /// Append a signature whose last parameter may repeat.
    pub fn variadic_signature(
        &mut self,
        id: OperatorId,
        parameters: &[EdmSimpleType],
        result: EdmSimpleType,
    ) -> Result<&mut Self, OperatorTableError> {
        self.push(id, parameters, result, true)
    }

    fn push(
        &mut self,
        id: OperatorId,
        parameters: &[EdmSimpleType],
        result: EdmSimpleType,
        variadic: bool,
    ) -> Result<&mut Self, OperatorTableError> {
        let entry = self
            .entries
            .get_mut(&id)
            .ok_or_else(|| OperatorTableError::UnknownOperator { id: id.to_string() })?;

        let expected = match id {
            OperatorId::Binary(_) => Some(2),
            OperatorId::Unary(_) => Some(1),
            OperatorId::Method(_) | OperatorId::Member => None,
        };
        if let Some(expected) = expected {
            if parameters.len() != expected || variadic {
                return Err(OperatorTableError::ArityMismatch {
                    id: id.to_string(),
                    expected,
                    found: parameters.len(),
                });
            }
        }
        if parameters.is_empty() {
            return Err(OperatorTableError::ArityMismatch {
                id: id.to_string(),
                expected: 1,
                found: 0,
            });
        }
        if let Some(ty) = parameters.iter().chain([&result]).find(|t| t.is_system()) {
            return Err(OperatorTableError::SystemTypeInSignature {
                id: id.to_string(),
                ty: ty.to_string(),
            });
        }

        match &mut entry.signatures {
            Signatures::LastParameter => {
                Err(OperatorTableError::LastParameterSignature { id: id.to_string() })
            }
            Signatures::Flex(sets) => {
                sets.push(ParameterSet {
                    parameters: parameters.to_vec(),
                    result,
                    variadic,
                });
                Ok(self)
            }
        }
    }

    /// Finish the table. Every flex operator must have at least one signature.
    pub fn build(self) -> Result<OperatorTable, OperatorTableError> {
        if let Some(entry) = self
            .entries
            .values()
            .find(|e| matches!(&e.signatures, Signatures::Flex(sets) if sets.is_empty()))
        {
            return Err(OperatorTableError::MissingSignatures {
                id: entry.id.to_string(),
            });
        }
        Ok(OperatorTable {
            entries: self.entries,
        })
    }
}

// ---------------------------------------------------------------------------
// Table
// ---------------------------------------------------------------------------

/// The immutable operator table.
#[derive(Debug)]
pub struct OperatorTable {
    entries: HashMap<OperatorId, OperatorDescriptor>,
}

impl OperatorTable {
    /// Look up an entry.
    #[must_use]
    pub fn get(&self, id: OperatorId) -> Option<&OperatorDescriptor> {
        self.entries.get(&id)
    }

    /// Look up a binary operator by its URI keyword.
    #[must_use]
    pub fn binary(&self, word: &str) -> Option<&OperatorDescriptor> {
        BinaryOperator::from_uri_literal(word).and_then(|op| self.get(OperatorId::Binary(op)))
    }

    /// Look up a method by name.
    #[must_use]
    pub fn method(&self, name: &str) -> Option<&OperatorDescriptor> {
        Method::from_name(name).and_then(|m| self.get(OperatorId::Method(m)))
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the table has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Precedence shared by both unary operators; tighter than every binary operator.
pub const UNARY_PRECEDENCE: u8 = 7;

const EQUALITY_TYPES: [EdmSimpleType; 15] = [
    EdmSimpleType::String,
    EdmSimpleType::Time,
    EdmSimpleType::DateTime,
    EdmSimpleType::DateTimeOffset,
    EdmSimpleType::Guid,
    EdmSimpleType::Boolean,
    EdmSimpleType::SByte,
    EdmSimpleType::Byte,
    EdmSimpleType::Int16,
    EdmSimpleType::Int32,
    EdmSimpleType::Int64,
    EdmSimpleType::Single,
    EdmSimpleType::Double,
    EdmSimpleType::Decimal,
    EdmSimpleType::Binary,
];

const ARITHMETIC_TYPES: [EdmSimpleType; 8] = [
    EdmSimpleType::SByte,
    EdmSimpleType::Byte,
    EdmSimpleType::Int16,
    EdmSimpleType::Int32,
    EdmSimpleType::Int64,
    EdmSimpleType::Single,
    EdmSimpleType::Double,
    EdmSimpleType::Decimal,
];

/// Build the standard operator table.
pub fn standard_table() -> Result<OperatorTable, OperatorTableError> {
    use BinaryOperator as B;
    use EdmSimpleType::{Boolean, DateTime, DateTimeOffset, Decimal, Double, Int32, String};
    use OperatorCategory as C;

    let mut b = OperatorTableBuilder::new();

    for (op, surface, precedence) in [(B::Or, "OR", 1), (B::And, "AND", 2)] {
        let id = OperatorId::Binary(op);
        b.operator(id, surface, C::Logical, precedence)?
            .signature(id, &[Boolean, Boolean], Boolean)?;
    }

    let comparisons = [
        (B::Eq, "=", 3),
        (B::Ne, "<>", 3),
        (B::Lt, "<", 4),
        (B::Le, "<=", 4),
        (B::Gt, ">", 4),
        (B::Ge, ">=", 4),
    ];
    for (op, surface, precedence) in comparisons {
        let id = OperatorId::Binary(op);
        b.operator(id, surface, C::Comparison, precedence)?;
        let relational = precedence == 4;
        for ty in EQUALITY_TYPES {
            if relational && ty == Boolean {
                continue;
            }
            b.signature(id, &[ty, ty], Boolean)?;
        }
    }

    let arithmetic = [
        (B::Add, "+", 5),
        (B::Sub, "-", 5),
        (B::Mul, "*", 6),
        (B::Div, "/", 6),
        (B::Mod, "MOD", 6),
    ];
    for (op, surface, precedence) in arithmetic {
        let id = OperatorId::Binary(op);
        b.operator(id, surface, C::Arithmetic, precedence)?;
        for ty in ARITHMETIC_TYPES {
            b.signature(id, &[ty, ty], ty)?;
        }
    }

    let not = OperatorId::Unary(UnaryOperator::Not);
    b.operator(not, "NOT", C::Unary, UNARY_PRECEDENCE)?
        .signature(not, &[Boolean], Boolean)?;
    let negate = OperatorId::Unary(UnaryOperator::Negate);
    b.operator(negate, "-", C::Unary, UNARY_PRECEDENCE)?;
    for ty in ARITHMETIC_TYPES {
        if ty != EdmSimpleType::Byte {
            b.signature(negate, &[ty], ty)?;
        }
    }

    b.last_parameter_operator(OperatorId::Member, ".", C::Member, UNARY_PRECEDENCE + 1)?;

    let method = OperatorId::Method;
    for m in Method::ALL {
        b.operator(method(m), m.name(), C::Method, 0)?;
    }
    for m in [Method::EndsWith, Method::StartsWith, Method::SubstringOf] {
        b.signature(method(m), &[String, String], Boolean)?;
    }
    b.signature(method(Method::IndexOf), &[String, String], Int32)?;
    for m in [Method::ToLower, Method::ToUpper, Method::Trim] {
        b.signature(method(m), &[String], String)?;
    }
    b.signature(method(Method::Substring), &[String, Int32], String)?
        .signature(method(Method::Substring), &[String, Int32, Int32], String)?
        .variadic_signature(method(Method::Concat), &[String, String], String)?
        .signature(method(Method::Length), &[String], Int32)?;
    for m in [
        Method::Year,
        Method::Month,
        Method::Day,
        Method::Hour,
        Method::Minute,
        Method::Second,
    ] {
        b.signature(method(m), &[DateTime], Int32)?
            .signature(method(m), &[DateTimeOffset], Int32)?;
    }
    for m in [Method::Round, Method::Floor, Method::Ceiling] {
        b.signature(method(m), &[Decimal], Decimal)?
            .signature(method(m), &[Double], Double)?;
    }

    b.build()
}

static OPERATOR_TABLE: LazyLock<OperatorTable> = LazyLock::new(|| match standard_table() {
    Ok(table) => table,
    Err(e) => panic!("invalid operator table: {e}"),
});

/// The process-wide operator table.
#[must_use]
pub fn operator_table() -> &'static OperatorTable {
    &OPERATOR_TABLE
}
