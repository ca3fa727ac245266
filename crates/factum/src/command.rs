//! Explicit command objects for model mutation.
//!
//! Host gesture handling translates pointer events and menu selections into
//! [`Command`] values; [`Model::apply`] validates and applies each one
//! synchronously and atomically. A command either completes fully (registry
//! updated, cascades applied) or is rejected before any write. Commands
//! addressed to ids that no longer exist resolve to
//! [`Outcome::Ignored`](crate::model::Outcome::Ignored) rather than failing,
//! so stale ids from rapid interaction are harmless.

use serde::{Deserialize, Serialize};

use factum_core::{geometry::Point, identifier::ObjectId};

use crate::{
    element::{ConstraintKind, Side},
    error::ModelError,
    model::{Model, Outcome},
};

/// A single model mutation.
///
/// One variant per exposed operation; the exhaustive `match` in
/// [`Model::apply`] keeps the operation set checked at compile time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    /// Create an entity type.
    AddEntity { name: String, at: Point },
    /// Create a value type.
    AddValue { name: String, at: Point },
    /// Create a predicate with a single unassigned role.
    AddPredicate { name: String, at: Point },
    /// Create a constraint of the given kind.
    AddConstraint { kind: ConstraintKind, at: Point },
    /// Append an unassigned role to a predicate.
    AppendRole { predicate: ObjectId },
    /// Remove the last role of a predicate; removing the only role deletes
    /// the predicate.
    RemoveLastRole { predicate: ObjectId },
    /// Make an entity or value type the player of a role.
    AssignRole { role: ObjectId, player: ObjectId },
    /// Record that `subtype` is-a `supertype`.
    AddSubtype {
        subtype: ObjectId,
        supertype: ObjectId,
    },
    /// Attach a constraint to a role (with the given attachment side) or to
    /// a subtype connector (side ignored).
    AttachConstraint {
        constraint: ObjectId,
        target: ObjectId,
        side: Side,
    },
    /// Retype a constraint, re-gating its content.
    SetConstraintKind {
        constraint: ObjectId,
        kind: ConstraintKind,
    },
    /// Edit a constraint's content text; `None` clears it.
    SetContent {
        constraint: ObjectId,
        content: Option<String>,
    },
    /// Set a role's mandatory flag.
    SetMandatory { role: ObjectId, mandatory: bool },
    /// Rename an entity, value, predicate, or role.
    SetName { object: ObjectId, name: String },
    /// Set an entity's reference mode; `None` clears it.
    SetRefMode {
        entity: ObjectId,
        ref_mode: Option<String>,
    },
    /// Reverse a predicate's role order.
    FlipPredicate { predicate: ObjectId },
    /// Toggle a predicate's vertical display.
    RotatePredicate { predicate: ObjectId },
    /// Move an element to a new position.
    MoveTo { object: ObjectId, to: Point },
    /// Copy an element (without its connectors) at an offset position.
    Duplicate { object: ObjectId },
    /// Delete an element and cascade to the connectors it owns.
    Delete { object: ObjectId },
}

impl Model {
    /// Validate and apply a single command.
    ///
    /// # Errors
    ///
    /// [`ModelError::ConnectionRejected`] when the connection validator
    /// refuses an attachment, [`ModelError::InvalidFrequency`] for content
    /// outside the frequency grammar, and the subtype errors for degenerate
    /// subtype requests. In every error case the model is unchanged.
    pub fn apply(&mut self, command: Command) -> Result<Outcome, ModelError> {
        match command {
            Command::AddEntity { name, at } => Ok(Outcome::Created(self.create_entity(&name, at))),
            Command::AddValue { name, at } => Ok(Outcome::Created(self.create_value(&name, at))),
            Command::AddPredicate { name, at } => {
                Ok(Outcome::Created(self.create_predicate(&name, at)))
            }
            Command::AddConstraint { kind, at } => {
                Ok(Outcome::Created(self.create_constraint(kind, at)))
            }
            Command::AppendRole { predicate } => self.append_role(predicate),
            Command::RemoveLastRole { predicate } => self.remove_last_role(predicate),
            Command::AssignRole { role, player } => self.assign_role(role, player),
            Command::AddSubtype { subtype, supertype } => self.add_subtype(subtype, supertype),
            Command::AttachConstraint {
                constraint,
                target,
                side,
            } => self.attach_constraint(constraint, target, side),
            Command::SetConstraintKind { constraint, kind } => {
                self.set_constraint_kind(constraint, kind)
            }
            Command::SetContent {
                constraint,
                content,
            } => self.set_content(constraint, content.as_deref()),
            Command::SetMandatory { role, mandatory } => self.set_mandatory(role, mandatory),
            Command::SetName { object, name } => self.set_name(object, &name),
            Command::SetRefMode { entity, ref_mode } => {
                self.set_ref_mode(entity, ref_mode.as_deref())
            }
            Command::FlipPredicate { predicate } => self.flip_predicate(predicate),
            Command::RotatePredicate { predicate } => self.rotate_predicate(predicate),
            Command::MoveTo { object, to } => self.move_to(object, to),
            Command::Duplicate { object } => self.duplicate(object),
            Command::Delete { object } => self.delete(object),
        }
    }
}
