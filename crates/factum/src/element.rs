//! Domain element types for ORM models.
//!
//! These are the plain data records owned by a [`crate::model::Model`]. All
//! cross-references between elements are [`factum_core::identifier::ObjectId`]
//! lookups into the owning model; an element never holds another element
//! directly.
//!
//! # Organization
//!
//! - [`object_type`] - Named object types: [`Entity`], [`Value`]
//! - [`predicate`] - Facts and their ordered role boxes: [`Predicate`], [`Role`]
//! - [`constraint`] - Typed constraints and content rules: [`Constraint`], [`ConstraintKind`]
//! - [`connector`] - Typed, directed edges: [`Connector`], [`ConnectorKind`], [`Side`]

pub mod connector;
pub mod constraint;
pub mod object_type;
pub mod predicate;

pub use connector::{Connector, ConnectorKind, Side};
pub use constraint::{Constraint, ConstraintKind, valid_frequency_content};
pub use object_type::{Entity, Value};
pub use predicate::{Predicate, Role};
