//! Role inference: propagating a constraint across a fact.
//!
//! When a constraint attaches to a role on its left or right side, the
//! conventional reading is that it applies along the fact — an internal
//! frequency constraint attached between two role boxes is meant to span
//! both. [`neighbor_roles`] computes the adjacent candidates from the owning
//! predicate's role order; [`propagate_roles`] connects the eligible ones
//! automatically after a successful manual attachment.

use log::debug;

use factum_core::identifier::ObjectId;

use crate::{element::Side, model::Model, validator};

/// An adjacent-role candidate produced by [`neighbor_roles`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Neighbor {
    /// The adjacent role.
    pub role: ObjectId,
    /// The side the new attachment would use: `right` for the preceding
    /// role, `left` for the following role, continuing the chain.
    pub side: Side,
    /// Direction inherited from the originating connector.
    pub directed: bool,
    /// Whether this neighbor should be connected automatically. True when
    /// the originating attachment is on a chainable (left/right) side; an
    /// attachment on top or bottom breaks the chain, so its neighbors are
    /// reported but not auto-connected.
    pub auto: bool,
}

/// The adjacent roles of every role currently attached to `constraint`.
///
/// For each role-attached connector, the owning predicate's ordered role
/// sequence is consulted at the attached role's index: the immediately
/// preceding and following roles (where present) are returned, in attachment
/// order. Returns an empty list for unknown constraints.
pub fn neighbor_roles(model: &Model, constraint: ObjectId) -> Vec<Neighbor> {
    let mut neighbors = Vec::new();

    for conn in model.attached_role_connectors(constraint) {
        let Some(role_id) = conn.role_end() else {
            continue;
        };
        let Some(role) = model.role(role_id) else {
            continue;
        };
        let Some(predicate) = model.predicate(role.predicate()) else {
            continue;
        };
        let Some(index) = predicate.role_index(role_id) else {
            continue;
        };

        let auto = conn.attach_side().is_some_and(Side::chainable);
        let order = predicate.roles();

        if index > 0 {
            neighbors.push(Neighbor {
                role: order[index - 1],
                side: Side::Right,
                directed: conn.directed(),
                auto,
            });
        }
        if index + 1 < order.len() {
            neighbors.push(Neighbor {
                role: order[index + 1],
                side: Side::Left,
                directed: conn.directed(),
                auto,
            });
        }
    }

    neighbors
}

/// Connect `constraint` to every eligible adjacent role.
///
/// Called after each successful manual attachment. Neighbors already
/// attached, or reported with `auto` false, are skipped, and each candidate
/// is re-checked with the connection validator, so single-attachment kinds
/// and self-referencing identifier targets never gain automatic connectors.
/// New connectors are oriented by the inherited `directed` flag:
/// role→constraint when directed (preserving the arrow's direction along the
/// chain), constraint→role otherwise. Returns the created connector ids.
pub fn propagate_roles(model: &mut Model, constraint: ObjectId) -> Vec<ObjectId> {
    let neighbors = neighbor_roles(model, constraint);
    let mut attached = model.attached_roles(constraint);
    let mut created = Vec::new();

    for neighbor in neighbors {
        if !neighbor.auto || attached.contains(&neighbor.role) {
            continue;
        }
        if !validator::can_connect(model, constraint, neighbor.role) {
            continue;
        }
        let conn = model.connect_propagated(
            constraint,
            neighbor.role,
            neighbor.side,
            neighbor.directed,
        );
        attached.push(neighbor.role);
        created.push(conn);
    }

    if !created.is_empty() {
        debug!(constraint:% = constraint, count = created.len(); "propagated to adjacent roles");
    }
    created
}
