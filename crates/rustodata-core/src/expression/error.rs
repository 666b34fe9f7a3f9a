//! Errors raised while tokenizing, parsing, resolving, or translating expressions.

/// Errors produced by the expression pipeline.
///
/// Every user-input variant carries the byte `position` in the source
/// expression where the problem was detected.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ExpressionError {
    /// Malformed literal or unrecognized character sequence.
    #[error("Invalid token at position {position}: '{text}'")]
    InvalidToken {
        /// Byte offset of the offending text.
        position: usize,
        /// The offending text.
        text: String,
    },
    /// A token other than the expected one was found.
    #[error("Unexpected token at position {position}: expected {expected}, found {found}")]
    UnexpectedToken {
        /// Byte offset of the found token.
        position: usize,
        /// What was expected.
        expected: String,
        /// What was found.
        found: String,
    },
    /// A complete expression was parsed but input remains.
    #[error("Unexpected trailing token at position {position}: {found}")]
    TrailingToken {
        /// Byte offset of the first unconsumed token.
        position: usize,
        /// The first unconsumed token.
        found: String,
    },
    /// No signature of an operator or method accepts the operand types.
    #[error("Operator '{operator}' at position {position} does not accept operands ({operand_types})")]
    OperandTypeMismatch {
        /// Byte offset of the operator.
        position: usize,
        /// Operator or method name.
        operator: String,
        /// Comma-separated operand types.
        operand_types: String,
    },
    /// A member path continues past a primitive-typed segment.
    #[error("Path segment '{segment}' at position {position} is applied to non-structural type {found}")]
    PathNotStructural {
        /// Byte offset of the segment.
        position: usize,
        /// The segment that cannot be resolved.
        segment: String,
        /// Type of the preceding segment.
        found: String,
    },
    /// A property name does not exist on its owning type.
    #[error("Unknown property '{name}' on type {owner} at position {position}")]
    UnknownProperty {
        /// Byte offset of the property name.
        position: usize,
        /// The property name.
        name: String,
        /// Owning entity or complex type.
        owner: String,
    },
    /// A method name is not part of the operator table.
    #[error("Unknown method '{name}' at position {position}")]
    UnknownMethod {
        /// Byte offset of the method name.
        position: usize,
        /// The method name.
        name: String,
    },
    /// A collection-valued navigation property appears inside a member path.
    #[error("Collection navigation property '{name}' at position {position} cannot be used in an expression")]
    CollectionNavigation {
        /// Byte offset of the navigation property.
        position: usize,
        /// The navigation property name.
        name: String,
    },
    /// The expression has the wrong result type for its context.
    #[error("Expression at position {position} must be of type {expected}, found {found}")]
    TypeExpected {
        /// Byte offset of the expression.
        position: usize,
        /// The required type.
        expected: String,
        /// The actual type.
        found: String,
    },
    /// The translator cannot render a node of this kind as a value.
    #[error("Unsupported expression node: {kind}")]
    UnsupportedNode {
        /// Description of the node.
        kind: String,
    },
}
