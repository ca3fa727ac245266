//! Factum - The semantic core of an ORM diagram editor.
//!
//! Factum models Object-Role Modeling schemas: entities, value types, facts
//! (ordered sequences of roles), typed constraints, and the connectors that
//! join them. The crate owns the semantics — which attachments are legal,
//! how a constraint propagates along a fact, where a connector meets a
//! circular boundary — and leaves rendering, gestures, and file formats to
//! the host.
//!
//! # Examples
//!
//! ```
//! use factum::{Command, Model, Outcome};
//! use factum::element::{ConstraintKind, Side};
//! use factum::geometry::Point;
//!
//! let mut model = Model::new();
//!
//! // A binary fact: Person works for Company.
//! let person = model.create_entity("Person", Point::new(0.0, 0.0));
//! let company = model.create_entity("Company", Point::new(300.0, 0.0));
//! let works_for = model.create_predicate("works for", Point::new(150.0, 0.0));
//! model.append_role(works_for).unwrap();
//!
//! let roles = model.predicate(works_for).unwrap().roles().to_vec();
//! model.assign_role(roles[0], person).unwrap();
//! model.assign_role(roles[1], company).unwrap();
//!
//! // Attach a frequency constraint; it propagates along the fact.
//! let freq = model.create_constraint(ConstraintKind::InternalFrequency, Point::new(150.0, 80.0));
//! let outcome = model.apply(Command::AttachConstraint {
//!     constraint: freq,
//!     target: roles[0],
//!     side: Side::Right,
//! }).unwrap();
//!
//! assert!(matches!(outcome, Outcome::CreatedMany(ids) if ids.len() == 2));
//! assert_eq!(model.attached_roles(freq).len(), 2);
//! ```

pub mod command;
pub mod element;
pub mod error;
pub mod inference;
pub mod model;
pub mod params;
pub mod validator;

pub use factum_core::{geometry, identifier};

pub use command::Command;
pub use error::ModelError;
pub use inference::{Neighbor, neighbor_roles, propagate_roles};
pub use model::{Model, Outcome};
pub use validator::can_connect;
