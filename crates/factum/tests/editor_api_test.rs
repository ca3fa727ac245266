//! Integration tests for the public command API.
//!
//! These drive a model the way a host editor would: commands in, outcomes
//! and queries out.

use factum::element::{ConstraintKind, Side};
use factum::geometry::{Point, point_on_circle};
use factum::{Command, Model, ModelError, Outcome, can_connect};

fn created(model: &mut Model, command: Command) -> factum::identifier::ObjectId {
    match model.apply(command).expect("command should succeed") {
        Outcome::Created(id) => id,
        Outcome::CreatedMany(ids) => *ids.first().expect("at least one created id"),
        other => panic!("expected a creation, got {other:?}"),
    }
}

/// Build the classic example schema: Person works for Company, Person earns
/// Salary, with Person playing the first role of both facts.
fn staffing_model() -> (Model, Vec<factum::identifier::ObjectId>) {
    let mut model = Model::new();

    let person = created(
        &mut model,
        Command::AddEntity {
            name: "Person".into(),
            at: Point::new(0.0, 0.0),
        },
    );
    let company = created(
        &mut model,
        Command::AddEntity {
            name: "Company".into(),
            at: Point::new(400.0, 0.0),
        },
    );
    let salary = created(
        &mut model,
        Command::AddValue {
            name: "Salary".into(),
            at: Point::new(400.0, 200.0),
        },
    );

    let works_for = created(
        &mut model,
        Command::AddPredicate {
            name: "works for".into(),
            at: Point::new(200.0, 0.0),
        },
    );
    model
        .apply(Command::AppendRole {
            predicate: works_for,
        })
        .unwrap();
    let earns = created(
        &mut model,
        Command::AddPredicate {
            name: "earns".into(),
            at: Point::new(200.0, 200.0),
        },
    );
    model
        .apply(Command::AppendRole { predicate: earns })
        .unwrap();

    let wf_roles = model.predicate(works_for).unwrap().roles().to_vec();
    let e_roles = model.predicate(earns).unwrap().roles().to_vec();
    for (role, player) in [
        (wf_roles[0], person),
        (wf_roles[1], company),
        (e_roles[0], person),
        (e_roles[1], salary),
    ] {
        model.apply(Command::AssignRole { role, player }).unwrap();
    }

    (model, vec![wf_roles[0], wf_roles[1], e_roles[0], e_roles[1]])
}

#[test]
fn test_build_and_query_schema() {
    let (model, roles) = staffing_model();

    assert_eq!(model.entities().count(), 2);
    assert_eq!(model.values().count(), 1);
    assert_eq!(model.predicates().count(), 2);
    // One entity-to-role connector per assignment.
    assert_eq!(model.connectors().count(), 4);

    let person = model.role(roles[0]).unwrap().player().unwrap();
    assert_eq!(model.role(roles[2]).unwrap().player(), Some(person));
}

#[test]
fn test_external_frequency_spans_facts_through_primary_entity() {
    let (mut model, roles) = staffing_model();

    let freq = created(
        &mut model,
        Command::AddConstraint {
            kind: ConstraintKind::ExternalFrequency,
            at: Point::new(200.0, 100.0),
        },
    );
    model
        .apply(Command::SetContent {
            constraint: freq,
            content: Some(">= 2".into()),
        })
        .unwrap();
    assert_eq!(model.constraint(freq).unwrap().content(), "≥2");

    // Attach on the company role of "works for"; the salary role of "earns"
    // shares the primary entity (Person), so it is eligible; the person roles
    // themselves are self-references and are not.
    model
        .apply(Command::AttachConstraint {
            constraint: freq,
            target: roles[1],
            side: Side::Top,
        })
        .unwrap();

    assert!(can_connect(&model, freq, roles[3]));
    assert!(!can_connect(&model, freq, roles[0]));
    assert!(!can_connect(&model, freq, roles[2]));
}

#[test]
fn test_invalid_frequency_content_is_rejected() {
    let (mut model, _) = staffing_model();
    let freq = created(
        &mut model,
        Command::AddConstraint {
            kind: ConstraintKind::InternalFrequency,
            at: Point::new(0.0, 100.0),
        },
    );

    let err = model
        .apply(Command::SetContent {
            constraint: freq,
            content: Some("abc".into()),
        })
        .unwrap_err();
    assert_eq!(err, ModelError::InvalidFrequency("abc".to_string()));
    assert_eq!(model.constraint(freq).unwrap().content(), "");
}

#[test]
fn test_attachment_propagates_and_deletion_cascades() {
    let (mut model, roles) = staffing_model();

    let equality = created(
        &mut model,
        Command::AddConstraint {
            kind: ConstraintKind::Equality,
            at: Point::new(200.0, 100.0),
        },
    );
    let outcome = model
        .apply(Command::AttachConstraint {
            constraint: equality,
            target: roles[0],
            side: Side::Right,
        })
        .unwrap();
    // Manual connector plus the propagated neighbor.
    assert!(matches!(outcome, Outcome::CreatedMany(ids) if ids.len() == 2));
    assert_eq!(model.attached_roles(equality).len(), 2);

    // Deleting the fact takes the connectors with it but leaves the
    // constraint in place, detached.
    let works_for = model.role(roles[0]).unwrap().predicate();
    model
        .apply(Command::Delete { object: works_for })
        .unwrap();

    assert!(model.constraint(equality).is_some());
    assert!(model.constraint(equality).unwrap().connectors().is_empty());

    // A fresh attachment to the surviving fact works again.
    assert!(can_connect(&model, equality, roles[2]));
}

#[test]
fn test_connector_anchors_on_constraint_boundary() {
    let (mut model, roles) = staffing_model();
    let constraint = created(
        &mut model,
        Command::AddConstraint {
            kind: ConstraintKind::InclusiveOr,
            at: Point::new(200.0, 100.0),
        },
    );
    model
        .apply(Command::AttachConstraint {
            constraint,
            target: roles[0],
            side: Side::Top,
        })
        .unwrap();

    let constraint = model.constraint(constraint).unwrap();
    let role_position = Point::new(180.0, 20.0);
    let anchor = constraint.anchor_point(role_position);

    // The endpoint sits on the circle, not at its center.
    let center = constraint.position();
    assert!((anchor.distance(center) - constraint.radius()).abs() < 1e-3);
    assert_eq!(
        anchor,
        point_on_circle(center, role_position, constraint.radius())
    );
}

#[test]
fn test_model_roundtrips_through_serde() {
    let (mut model, roles) = staffing_model();
    let freq = created(
        &mut model,
        Command::AddConstraint {
            kind: ConstraintKind::InternalFrequency,
            at: Point::new(200.0, 100.0),
        },
    );
    model
        .apply(Command::SetContent {
            constraint: freq,
            content: Some("2..5".into()),
        })
        .unwrap();
    model
        .apply(Command::AttachConstraint {
            constraint: freq,
            target: roles[0],
            side: Side::Right,
        })
        .unwrap();

    let json = serde_json::to_string(&model).expect("model serializes");
    let mut restored: Model = serde_json::from_str(&json).expect("model deserializes");

    assert_eq!(restored.entities().count(), model.entities().count());
    assert_eq!(
        restored.attached_roles(freq),
        model.attached_roles(freq),
        "attachment order survives the roundtrip"
    );
    assert_eq!(restored.constraint(freq).unwrap().content(), "2..5");

    // Restored counters keep issuing fresh ids.
    let next = restored.create_entity("New", Point::new(0.0, 0.0));
    assert!(restored.entity(next).is_some());
    assert_ne!(Some(next), model.entities().map(|e| e.id()).next());
}
