//! Facts (predicates) and their ordered role boxes.

use serde::{Deserialize, Serialize};

use factum_core::{geometry::Point, identifier::ObjectId};

/// A fact type: an ordered sequence of role boxes.
///
/// Role order is semantic, not just visual: the connection validator and role
/// inference both use it. The first role's player is the fact's *primary
/// entity*, and adjacency in the sequence determines which roles a constraint
/// propagates to. Flipping a predicate reverses the stored order, which
/// inverts both.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Predicate {
    pub(crate) id: ObjectId,
    pub(crate) name: String,
    pub(crate) role_order: Vec<ObjectId>,
    pub(crate) flipped: bool,
    pub(crate) rotated: bool,
    pub(crate) position: Point,
}

impl Predicate {
    pub(crate) fn new(id: ObjectId, name: &str, position: Point) -> Self {
        Self {
            id,
            name: name.to_string(),
            role_order: Vec::new(),
            flipped: false,
            rotated: false,
            position,
        }
    }

    /// Get the predicate's identifier.
    pub fn id(&self) -> ObjectId {
        self.id
    }

    /// Get the predicate's reading text.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Borrow the ordered role sequence.
    pub fn roles(&self) -> &[ObjectId] {
        &self.role_order
    }

    /// The number of roles (the fact's arity).
    pub fn arity(&self) -> usize {
        self.role_order.len()
    }

    /// Whether the role order has been reversed from its creation order.
    pub fn flipped(&self) -> bool {
        self.flipped
    }

    /// Whether the predicate is displayed vertically.
    pub fn rotated(&self) -> bool {
        self.rotated
    }

    /// Get the predicate's position in diagram space.
    pub fn position(&self) -> Point {
        self.position
    }

    /// The position of `role` within the ordered sequence.
    pub fn role_index(&self, role: ObjectId) -> Option<usize> {
        self.role_order.iter().position(|id| *id == role)
    }

    /// Reverse the role order, inverting left/right adjacency.
    pub(crate) fn flip(&mut self) {
        self.role_order.reverse();
        self.flipped = !self.flipped;
    }

    /// Toggle vertical display. Orientation does not affect role order.
    pub(crate) fn rotate(&mut self) {
        self.rotated = !self.rotated;
    }
}

/// A role box: one slot within a fact, optionally filled by an entity or
/// value type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Role {
    pub(crate) id: ObjectId,
    pub(crate) predicate: ObjectId,
    pub(crate) player: Option<ObjectId>,
    pub(crate) mandatory: bool,
    pub(crate) name: String,
}

impl Role {
    pub(crate) fn new(id: ObjectId, predicate: ObjectId) -> Self {
        Self {
            id,
            predicate,
            player: None,
            mandatory: false,
            name: String::new(),
        }
    }

    /// Get the role's identifier.
    pub fn id(&self) -> ObjectId {
        self.id
    }

    /// The predicate this role belongs to.
    pub fn predicate(&self) -> ObjectId {
        self.predicate
    }

    /// The entity or value type filling this role, if assigned.
    ///
    /// An unassigned role cannot accept constraint connections.
    pub fn player(&self) -> Option<ObjectId> {
        self.player
    }

    /// Whether every instance of the player must play this role.
    pub fn mandatory(&self) -> bool {
        self.mandatory
    }

    /// Get the role's display name.
    pub fn name(&self) -> &str {
        &self.name
    }
}
