//! Error types for the query compiler.

use crate::expression::ExpressionError;

/// Errors raised while compiling a request into a query statement.
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    /// A `$filter`, `$orderby`, or key predicate expression is invalid.
    #[error(transparent)]
    Expression(#[from] ExpressionError),

    /// The request names an entity set the model does not define.
    #[error("unknown entity set: {0}")]
    UnknownEntitySet(String),

    /// An entity set or navigation property refers to an undefined entity type.
    #[error("unknown entity type: {0}")]
    UnknownEntityType(String),

    /// A navigation segment names an undefined navigation property.
    #[error("unknown navigation property '{property}' on entity type {entity_type}")]
    UnknownNavigation {
        /// Entity type at the start of the hop.
        entity_type: String,
        /// The navigation property name.
        property: String,
    },

    /// A `$select` item names an undefined property.
    #[error("unknown property '{property}' on entity type {entity_type}")]
    UnknownProperty {
        /// Entity type the property was looked up on.
        entity_type: String,
        /// The property name.
        property: String,
    },

    /// A key predicate does not address exactly one entity.
    #[error("invalid key predicate for {entity_type}: {message}")]
    InvalidKeyPredicate {
        /// Entity type the predicate was applied to.
        entity_type: String,
        /// Explanation.
        message: String,
    },

    /// A joined statement was requested without any join clauses.
    #[error("join clause expected: a joined statement needs at least one join clause")]
    JoinClauseExpected,

    /// A join clause does not continue the alias chain of its predecessor.
    #[error("broken join chain at clause {index}: {message}")]
    BrokenJoinChain {
        /// Position of the offending clause.
        index: usize,
        /// Explanation.
        message: String,
    },

    /// Invalid compiler configuration.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Convenience result type for query compilation.
pub type QueryResult<T> = Result<T, QueryError>;
