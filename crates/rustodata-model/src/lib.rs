//! Entity data model types for the rustodata query compiler.
//!
//! This crate holds the protocol-side vocabulary shared by the compiler and its
//! callers:
//!
//! - [`EdmSimpleType`]: the primitive type catalogue, including the literal-only
//!   system types used during type inference.
//! - [`EdmModel`] and friends: entity, complex, and navigation metadata with
//!   optional internal-name mappings.
//! - [`QueryRequest`]: the request descriptor handed over by the URI layer.

mod edm;
mod metadata;
mod request;

pub use edm::{EdmSimpleType, UnknownTypeName};
pub use metadata::{
    ComplexType, EdmModel, EntitySet, EntityType, Facets, Multiplicity, NavigationProperty,
    Property, PropertyType,
};
pub use request::{KeyPredicate, NavigationSegment, QueryRequest};
