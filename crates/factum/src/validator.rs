//! The connection validator: legality of constraint attachments.
//!
//! [`can_connect`] is a pure predicate over current model state; it never
//! mutates. The rules encode ORM's modeling conventions: a constraint
//! expresses set logic over either roles-of-facts or subtypes-of-a-supertype
//! (never both), attachments must agree on the entities they range over, and
//! roles within a single fact get an adjacency exception so constraints that
//! span one fact need not repeat explicit entity checks on immediate
//! neighbors.

use log::trace;

use factum_core::identifier::{ObjectId, ObjectKind};

use crate::{
    element::{ConnectorKind, Constraint, ConstraintKind, Role},
    inference,
    model::Model,
};

/// Decide whether `constraint` may legally attach to `target`.
///
/// Targets are roles and subtype connectors; any other target kind is
/// refused. A `false` return means the caller must not create a connector;
/// nothing has been mutated either way.
pub fn can_connect(model: &Model, constraint: ObjectId, target: ObjectId) -> bool {
    let Some(constraint) = model.constraint(constraint) else {
        return false;
    };

    let allowed = match target.kind() {
        ObjectKind::Role => match model.role(target) {
            Some(role) => can_connect_role(model, constraint, role),
            None => false,
        },
        ObjectKind::Connector => match model.connector(target) {
            Some(conn) if conn.kind() == ConnectorKind::Subtype => {
                can_connect_subtype(model, constraint, target)
            }
            _ => false,
        },
        _ => false,
    };

    trace!(constraint:% = constraint.id(), target:% = target, allowed = allowed; "connection check");
    allowed
}

/// Rolebox rules, in order; the first matching rule decides.
fn can_connect_role(model: &Model, constraint: &Constraint, role: &Role) -> bool {
    // An unassigned role cannot take constraints.
    let Some(player) = role.player() else {
        return false;
    };

    // No connections, no problems.
    if constraint.connectors().is_empty() {
        return true;
    }

    // A constraint is role-typed or subtype-typed, never both.
    if !model.attached_subtypes(constraint.id()).is_empty() {
        return false;
    }

    // No double attachment to the same role.
    let attached = model.attached_roles(constraint.id());
    if attached.contains(&role.id()) {
        return false;
    }

    // Single-attachment kinds are already full at this point.
    if constraint.kind().single_attachment() {
        return false;
    }

    // Internal frequency stays within one fact: only adjacent neighbors of an
    // already-attached role qualify.
    if constraint.kind() == ConstraintKind::InternalFrequency {
        return is_neighbor(model, constraint.id(), role.id());
    }

    // Identification and external frequency match on the primary entity of
    // the target's fact, and refuse self-reference: the fact's primary entity
    // must differ from the target role's own player.
    if constraint.kind().matches_primary_entity() {
        let Some(fact_entity) = model.primary_entity(role.predicate()) else {
            return false;
        };
        if fact_entity == player {
            return false;
        }
        return model
            .reachable_primary_entities(constraint.id())
            .contains(&fact_entity);
    }

    // General entity matching: the role's player must already be reachable
    // from the constraint...
    if model.reachable_entities(constraint.id()).contains(&player) {
        return true;
    }

    // ...with an exception for adjacent neighbors of attached roles.
    is_neighbor(model, constraint.id(), role.id())
}

/// Subtype rules: only the or/exclusion family attaches to subtype
/// connectors, exclusively with other subtype attachments, matching on the
/// supertype end.
fn can_connect_subtype(model: &Model, constraint: &Constraint, subtype: ObjectId) -> bool {
    if !constraint.kind().subtype_capable() {
        return false;
    }

    if constraint.connectors().is_empty() {
        return true;
    }

    if !model.attached_roles(constraint.id()).is_empty() {
        return false;
    }

    let attached = model.attached_subtypes(constraint.id());
    if attached.contains(&subtype) {
        return false;
    }

    let Some(supertype) = model.connector(subtype).map(|conn| conn.to()) else {
        return false;
    };
    model
        .reachable_entities(constraint.id())
        .contains(&supertype)
}

fn is_neighbor(model: &Model, constraint: ObjectId, role: ObjectId) -> bool {
    inference::neighbor_roles(model, constraint)
        .iter()
        .any(|neighbor| neighbor.role == role)
}

#[cfg(test)]
mod tests {
    use factum_core::geometry::Point;

    use crate::element::Side;
    use crate::model::{Model, Outcome};

    use super::*;

    /// A fact with `arity` roles, each assigned a fresh entity. Returns the
    /// predicate id and the role ids in order.
    fn fact(model: &mut Model, arity: usize) -> (ObjectId, Vec<ObjectId>) {
        let predicate = model.create_predicate("works for", Point::new(0.0, 0.0));
        for _ in 1..arity {
            model.append_role(predicate).unwrap();
        }
        let roles = model.predicate(predicate).unwrap().roles().to_vec();
        for (i, role) in roles.iter().enumerate() {
            let entity = model.create_entity(&format!("E{i}"), Point::new(i as f32 * 100.0, 0.0));
            model.assign_role(*role, entity).unwrap();
        }
        (predicate, roles)
    }

    fn subtype(model: &mut Model, sub: ObjectId, sup: ObjectId) -> ObjectId {
        match model.add_subtype(sub, sup).unwrap() {
            Outcome::Created(id) => id,
            other => panic!("expected created subtype, got {other:?}"),
        }
    }

    #[test]
    fn test_unassigned_role_is_refused() {
        let mut model = Model::new();
        let predicate = model.create_predicate("works for", Point::new(0.0, 0.0));
        let role = model.predicate(predicate).unwrap().roles()[0];
        let constraint =
            model.create_constraint(ConstraintKind::Exclusion, Point::new(0.0, 50.0));

        assert!(!can_connect(&model, constraint, role));
    }

    #[test]
    fn test_zero_connector_constraint_accepts_any_assigned_role() {
        let mut model = Model::new();
        let (_, roles) = fact(&mut model, 3);

        for kind in ConstraintKind::assignable() {
            let constraint = model.create_constraint(kind, Point::new(0.0, 50.0));
            for role in &roles {
                assert!(
                    can_connect(&model, constraint, *role),
                    "{kind} should accept a first attachment"
                );
            }
        }
    }

    #[test]
    fn test_no_duplicate_role_attachment() {
        let mut model = Model::new();
        let (_, roles) = fact(&mut model, 2);
        let constraint =
            model.create_constraint(ConstraintKind::Equality, Point::new(0.0, 50.0));

        model
            .attach_constraint(constraint, roles[0], Side::Top)
            .unwrap();
        assert!(!can_connect(&model, constraint, roles[0]));
    }

    #[test]
    fn test_role_value_accepts_exactly_one_attachment() {
        let mut model = Model::new();
        let (_, roles) = fact(&mut model, 2);
        let constraint =
            model.create_constraint(ConstraintKind::RoleValue, Point::new(0.0, 50.0));

        assert!(can_connect(&model, constraint, roles[0]));
        model
            .attach_constraint(constraint, roles[0], Side::Top)
            .unwrap();
        assert!(!can_connect(&model, constraint, roles[1]));
    }

    #[test]
    fn test_internal_frequency_requires_adjacency() {
        let mut model = Model::new();
        let (_, roles) = fact(&mut model, 3);
        let (_, other_fact_roles) = fact(&mut model, 2);
        let constraint =
            model.create_constraint(ConstraintKind::InternalFrequency, Point::new(0.0, 50.0));

        // Top-side attachment so propagation leaves the neighbors open.
        model
            .attach_constraint(constraint, roles[1], Side::Top)
            .unwrap();

        assert!(can_connect(&model, constraint, roles[0]));
        assert!(can_connect(&model, constraint, roles[2]));
        assert!(!can_connect(&model, constraint, other_fact_roles[0]));
    }

    #[test]
    fn test_entity_matching_with_shared_player() {
        let mut model = Model::new();
        let (_, left_roles) = fact(&mut model, 2);
        let (_, right_roles) = fact(&mut model, 2);

        // The same entity plays the first role of both facts.
        let shared = model.create_entity("Shared", Point::new(0.0, 200.0));
        model.assign_role(left_roles[0], shared).unwrap();
        model.assign_role(right_roles[0], shared).unwrap();

        let constraint =
            model.create_constraint(ConstraintKind::Exclusion, Point::new(0.0, 50.0));
        model
            .attach_constraint(constraint, left_roles[0], Side::Top)
            .unwrap();

        // Same player: allowed. Different player, different fact: refused.
        assert!(can_connect(&model, constraint, right_roles[0]));
        assert!(!can_connect(&model, constraint, right_roles[1]));
    }

    #[test]
    fn test_adjacency_exception_spans_entities() {
        let mut model = Model::new();
        let (_, roles) = fact(&mut model, 3);
        let constraint =
            model.create_constraint(ConstraintKind::Exclusion, Point::new(0.0, 50.0));

        // Different players everywhere, but neighbors of an attached role are
        // eligible anyway.
        model
            .attach_constraint(constraint, roles[1], Side::Top)
            .unwrap();
        assert!(can_connect(&model, constraint, roles[0]));
        assert!(can_connect(&model, constraint, roles[2]));
    }

    #[test]
    fn test_primary_entity_matching() {
        let mut model = Model::new();
        let (_, left_roles) = fact(&mut model, 2);
        let (_, right_roles) = fact(&mut model, 2);

        // Both facts open with the same primary entity.
        let person = model.create_entity("Person", Point::new(0.0, 200.0));
        model.assign_role(left_roles[0], person).unwrap();
        model.assign_role(right_roles[0], person).unwrap();

        let constraint =
            model.create_constraint(ConstraintKind::ExternalFrequency, Point::new(0.0, 50.0));
        model
            .attach_constraint(constraint, left_roles[1], Side::Top)
            .unwrap();

        // Matching primary entity, non-self role: allowed.
        assert!(can_connect(&model, constraint, right_roles[1]));
        // The primary role itself is a self-reference: the fact's primary
        // entity equals the target's player.
        assert!(!can_connect(&model, constraint, right_roles[0]));
    }

    #[test]
    fn test_primary_entity_mismatch_is_refused() {
        let mut model = Model::new();
        let (_, left_roles) = fact(&mut model, 2);
        let (_, right_roles) = fact(&mut model, 2);

        let constraint =
            model.create_constraint(ConstraintKind::Identifier, Point::new(0.0, 50.0));
        model
            .attach_constraint(constraint, left_roles[1], Side::Top)
            .unwrap();

        // The second fact's primary entity is unrelated to the constraint.
        assert!(!can_connect(&model, constraint, right_roles[1]));
    }

    #[test]
    fn test_subtype_rules() {
        let mut model = Model::new();
        let animal = model.create_entity("Animal", Point::new(0.0, 0.0));
        let dog = model.create_entity("Dog", Point::new(0.0, 100.0));
        let cat = model.create_entity("Cat", Point::new(100.0, 100.0));
        let tree = model.create_entity("Tree", Point::new(200.0, 0.0));
        let oak = model.create_entity("Oak", Point::new(200.0, 100.0));

        let dog_isa = subtype(&mut model, dog, animal);
        let cat_isa = subtype(&mut model, cat, animal);
        let oak_isa = subtype(&mut model, oak, tree);

        // Only the or/exclusion family may attach to subtypes.
        let equality = model.create_constraint(ConstraintKind::Equality, Point::new(50.0, 50.0));
        assert!(!can_connect(&model, equality, dog_isa));

        let exclusion =
            model.create_constraint(ConstraintKind::Exclusion, Point::new(50.0, 50.0));
        assert!(can_connect(&model, exclusion, dog_isa));
        model
            .attach_constraint(exclusion, dog_isa, Side::Top)
            .unwrap();

        // Same subtype twice: refused. Same supertype: allowed. Unrelated
        // supertype: refused.
        assert!(!can_connect(&model, exclusion, dog_isa));
        assert!(can_connect(&model, exclusion, cat_isa));
        assert!(!can_connect(&model, exclusion, oak_isa));
    }

    #[test]
    fn test_role_and_subtype_attachments_are_exclusive() {
        let mut model = Model::new();
        let (_, roles) = fact(&mut model, 2);
        let animal = model.create_entity("Animal", Point::new(0.0, 0.0));
        let dog = model.create_entity("Dog", Point::new(0.0, 100.0));
        let isa = subtype(&mut model, dog, animal);

        // Role-attached first: subtype targets are refused.
        let role_first =
            model.create_constraint(ConstraintKind::InclusiveOr, Point::new(0.0, 50.0));
        model
            .attach_constraint(role_first, roles[0], Side::Top)
            .unwrap();
        assert!(!can_connect(&model, role_first, isa));

        // Subtype-attached first: role targets are refused.
        let subtype_first =
            model.create_constraint(ConstraintKind::InclusiveOr, Point::new(0.0, 50.0));
        model
            .attach_constraint(subtype_first, isa, Side::Top)
            .unwrap();
        assert!(!can_connect(&model, subtype_first, roles[0]));
    }

    #[test]
    fn test_unknown_targets_are_refused() {
        let mut model = Model::new();
        let entity = model.create_entity("Person", Point::new(0.0, 0.0));
        let constraint =
            model.create_constraint(ConstraintKind::Exclusion, Point::new(0.0, 50.0));

        // Entities are not connectable targets, nor are entity-to-role
        // connectors or missing ids.
        assert!(!can_connect(&model, constraint, entity));
        fact(&mut model, 1);
        let etor = model
            .connectors()
            .find(|conn| conn.kind() == ConnectorKind::EntityToRole)
            .map(|conn| conn.id())
            .unwrap();
        assert!(!can_connect(&model, constraint, etor));
        assert!(!can_connect(
            &model,
            constraint,
            ObjectId::new(ObjectKind::Role, 999)
        ));
    }
}
