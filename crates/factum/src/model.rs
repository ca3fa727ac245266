//! The model registry: per-diagram element storage and lifecycle.
//!
//! A [`Model`] is the sole owner of every element in one diagram. It issues
//! ids, stores elements in per-kind maps, and applies every mutation —
//! creation, movement, content edits, attachment, cascade deletion. All
//! relations between elements are id lookups into the owning model, so there
//! are no ownership cycles and the whole model serializes directly.
//!
//! Multiple models coexist independently; each has its own id counters, so
//! ids never collide across models.
//!
//! Mutations are synchronous and atomic: a command either applies fully or is
//! rejected before any write. Operations addressed to ids that no longer
//! exist are ignored rather than failing, which keeps the core robust against
//! stale ids arriving from rapid host interaction.

use indexmap::IndexMap;
use log::debug;
use serde::{Deserialize, Serialize};

use factum_core::{
    geometry::Point,
    identifier::{IdCounters, ObjectId, ObjectKind},
};

use crate::{
    element::{
        Connector, ConnectorKind, Constraint, ConstraintKind, Entity, Predicate, Role, Side, Value,
    },
    error::ModelError,
    inference, params, validator,
};

/// What a mutation did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// One element was created.
    Created(ObjectId),
    /// Several elements were created (e.g. an attachment plus its propagated
    /// connectors), in creation order.
    CreatedMany(Vec<ObjectId>),
    /// Existing state was changed in place.
    Applied,
    /// The operation addressed a missing element and was skipped.
    Ignored,
}

/// A single diagram's element registry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Model {
    counters: IdCounters,
    entities: IndexMap<ObjectId, Entity>,
    values: IndexMap<ObjectId, Value>,
    predicates: IndexMap<ObjectId, Predicate>,
    roles: IndexMap<ObjectId, Role>,
    constraints: IndexMap<ObjectId, Constraint>,
    connectors: IndexMap<ObjectId, Connector>,
}

impl Model {
    /// Create an empty model with fresh id counters.
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Creation
    // =========================================================================

    /// Create an entity type at the given position.
    pub fn create_entity(&mut self, name: &str, at: Point) -> ObjectId {
        let id = self.counters.issue(ObjectKind::Entity);
        debug!(id:% = id, name = name; "creating entity");
        self.entities.insert(id, Entity::new(id, name, at));
        id
    }

    /// Create a value type at the given position.
    pub fn create_value(&mut self, name: &str, at: Point) -> ObjectId {
        let id = self.counters.issue(ObjectKind::Value);
        debug!(id:% = id, name = name; "creating value");
        self.values.insert(id, Value::new(id, name, at));
        id
    }

    /// Create a predicate with a single unassigned role. Grow the fact with
    /// [`Self::append_role`].
    pub fn create_predicate(&mut self, name: &str, at: Point) -> ObjectId {
        let id = self.counters.issue(ObjectKind::Predicate);
        debug!(id:% = id, name = name; "creating predicate");
        self.predicates.insert(id, Predicate::new(id, name, at));
        self.push_role(id);
        id
    }

    /// Create a constraint of the given kind at the given position.
    pub fn create_constraint(&mut self, kind: ConstraintKind, at: Point) -> ObjectId {
        let id = self.counters.issue(ObjectKind::Constraint);
        debug!(id:% = id, kind:% = kind; "creating constraint");
        self.constraints.insert(id, Constraint::new(id, kind, at));
        id
    }

    fn push_role(&mut self, predicate: ObjectId) -> ObjectId {
        let id = self.counters.issue(ObjectKind::Role);
        self.roles.insert(id, Role::new(id, predicate));
        if let Some(predicate) = self.predicates.get_mut(&predicate) {
            predicate.role_order.push(id);
        }
        id
    }

    // =========================================================================
    // Lookup
    // =========================================================================

    /// Look up an entity by id.
    pub fn entity(&self, id: ObjectId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    /// Look up a value type by id.
    pub fn value(&self, id: ObjectId) -> Option<&Value> {
        self.values.get(&id)
    }

    /// Look up a predicate by id.
    pub fn predicate(&self, id: ObjectId) -> Option<&Predicate> {
        self.predicates.get(&id)
    }

    /// Look up a role by id.
    pub fn role(&self, id: ObjectId) -> Option<&Role> {
        self.roles.get(&id)
    }

    /// Look up a constraint by id.
    pub fn constraint(&self, id: ObjectId) -> Option<&Constraint> {
        self.constraints.get(&id)
    }

    /// Look up a connector by id.
    pub fn connector(&self, id: ObjectId) -> Option<&Connector> {
        self.connectors.get(&id)
    }

    /// Whether an element with this id currently exists.
    pub fn contains(&self, id: ObjectId) -> bool {
        match id.kind() {
            ObjectKind::Entity => self.entities.contains_key(&id),
            ObjectKind::Value => self.values.contains_key(&id),
            ObjectKind::Predicate => self.predicates.contains_key(&id),
            ObjectKind::Role => self.roles.contains_key(&id),
            ObjectKind::Constraint => self.constraints.contains_key(&id),
            ObjectKind::Connector => self.connectors.contains_key(&id),
        }
    }

    /// Iterate over all entities in creation order.
    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    /// Iterate over all value types in creation order.
    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.values.values()
    }

    /// Iterate over all predicates in creation order.
    pub fn predicates(&self) -> impl Iterator<Item = &Predicate> {
        self.predicates.values()
    }

    /// Iterate over all constraints in creation order.
    pub fn constraints(&self) -> impl Iterator<Item = &Constraint> {
        self.constraints.values()
    }

    /// Iterate over all connectors in creation order.
    pub fn connectors(&self) -> impl Iterator<Item = &Connector> {
        self.connectors.values()
    }

    // =========================================================================
    // Constraint reachability queries
    // =========================================================================

    /// The role-attached connectors of a constraint, in attachment order.
    pub fn attached_role_connectors(&self, constraint: ObjectId) -> Vec<&Connector> {
        self.attached_connectors(constraint, ConnectorKind::ConstraintToRole)
    }

    /// The roles a constraint is attached to, in attachment order.
    pub fn attached_roles(&self, constraint: ObjectId) -> Vec<ObjectId> {
        self.attached_role_connectors(constraint)
            .iter()
            .filter_map(|conn| conn.role_end())
            .collect()
    }

    /// The subtype connectors a constraint is attached to, in attachment
    /// order.
    pub fn attached_subtypes(&self, constraint: ObjectId) -> Vec<ObjectId> {
        self.attached_connectors(constraint, ConnectorKind::ConstraintToSubtype)
            .iter()
            .filter_map(|conn| conn.endpoint_of_kind(ObjectKind::Connector))
            .collect()
    }

    fn attached_connectors(&self, constraint: ObjectId, kind: ConnectorKind) -> Vec<&Connector> {
        let Some(constraint) = self.constraints.get(&constraint) else {
            return Vec::new();
        };
        constraint
            .connectors
            .iter()
            .filter_map(|id| self.connectors.get(id))
            .filter(|conn| conn.kind == kind)
            .collect()
    }

    /// Every entity or value reachable from a constraint: the players of its
    /// attached roles plus the supertype ends of its attached subtype
    /// connectors.
    pub fn reachable_entities(&self, constraint: ObjectId) -> Vec<ObjectId> {
        let mut entities: Vec<ObjectId> = self
            .attached_roles(constraint)
            .iter()
            .filter_map(|role| self.roles.get(role))
            .filter_map(|role| role.player)
            .collect();
        entities.extend(
            self.attached_subtypes(constraint)
                .iter()
                .filter_map(|id| self.connectors.get(id))
                .map(|subtype| subtype.to),
        );
        entities
    }

    /// Every primary entity reachable from a constraint: the primary entities
    /// of the facts its attached roles belong to, plus the subtype ends of
    /// its attached subtype connectors.
    pub fn reachable_primary_entities(&self, constraint: ObjectId) -> Vec<ObjectId> {
        let mut entities: Vec<ObjectId> = self
            .attached_roles(constraint)
            .iter()
            .filter_map(|role| self.roles.get(role))
            .filter_map(|role| self.primary_entity(role.predicate))
            .collect();
        entities.extend(
            self.attached_subtypes(constraint)
                .iter()
                .filter_map(|id| self.connectors.get(id))
                .map(|subtype| subtype.from),
        );
        entities
    }

    /// The primary entity of a fact: the player of its first role.
    pub fn primary_entity(&self, predicate: ObjectId) -> Option<ObjectId> {
        let first = *self.predicates.get(&predicate)?.role_order.first()?;
        self.roles.get(&first)?.player
    }

    // =========================================================================
    // Mutation
    // =========================================================================

    /// Move an element to a new position.
    pub fn move_to(&mut self, id: ObjectId, to: Point) -> Result<Outcome, ModelError> {
        let moved = match id.kind() {
            ObjectKind::Entity => self
                .entities
                .get_mut(&id)
                .map(|entity| entity.position = to)
                .is_some(),
            ObjectKind::Value => self
                .values
                .get_mut(&id)
                .map(|value| value.position = to)
                .is_some(),
            ObjectKind::Predicate => self
                .predicates
                .get_mut(&id)
                .map(|predicate| predicate.position = to)
                .is_some(),
            ObjectKind::Constraint => self
                .constraints
                .get_mut(&id)
                .map(|constraint| constraint.position = to)
                .is_some(),
            // Roles travel with their predicate; connectors follow endpoints.
            ObjectKind::Role | ObjectKind::Connector => false,
        };
        if moved {
            Ok(Outcome::Applied)
        } else {
            debug!(id:% = id; "move ignored");
            Ok(Outcome::Ignored)
        }
    }

    /// Rename an entity, value, predicate, or role.
    pub fn set_name(&mut self, id: ObjectId, name: &str) -> Result<Outcome, ModelError> {
        let renamed = match id.kind() {
            ObjectKind::Entity => self
                .entities
                .get_mut(&id)
                .map(|entity| entity.name = name.to_string())
                .is_some(),
            ObjectKind::Value => self
                .values
                .get_mut(&id)
                .map(|value| value.name = name.to_string())
                .is_some(),
            ObjectKind::Predicate => self
                .predicates
                .get_mut(&id)
                .map(|predicate| predicate.name = name.to_string())
                .is_some(),
            ObjectKind::Role => self
                .roles
                .get_mut(&id)
                .map(|role| role.name = name.to_string())
                .is_some(),
            ObjectKind::Constraint | ObjectKind::Connector => false,
        };
        if renamed {
            Ok(Outcome::Applied)
        } else {
            Ok(Outcome::Ignored)
        }
    }

    /// Set an entity's reference mode.
    pub fn set_ref_mode(
        &mut self,
        entity: ObjectId,
        ref_mode: Option<&str>,
    ) -> Result<Outcome, ModelError> {
        match self.entities.get_mut(&entity) {
            Some(entity) => {
                entity.ref_mode = ref_mode.map(str::to_string);
                Ok(Outcome::Applied)
            }
            None => Ok(Outcome::Ignored),
        }
    }

    /// Retype a constraint. Content is forced into the new kind's shape
    /// (cleared for contentless kinds, fixed for subset).
    pub fn set_constraint_kind(
        &mut self,
        constraint: ObjectId,
        kind: ConstraintKind,
    ) -> Result<Outcome, ModelError> {
        match self.constraints.get_mut(&constraint) {
            Some(constraint) => {
                constraint.kind = kind;
                constraint.reset_content();
                Ok(Outcome::Applied)
            }
            None => Ok(Outcome::Ignored),
        }
    }

    /// Set a constraint's content text. Frequency content outside the
    /// recognized grammar is rejected and prior content kept.
    pub fn set_content(
        &mut self,
        constraint: ObjectId,
        content: Option<&str>,
    ) -> Result<Outcome, ModelError> {
        match self.constraints.get_mut(&constraint) {
            Some(constraint) => {
                constraint.set_content(content)?;
                Ok(Outcome::Applied)
            }
            None => Ok(Outcome::Ignored),
        }
    }

    /// Toggle or set a role's mandatory flag.
    pub fn set_mandatory(&mut self, role: ObjectId, mandatory: bool) -> Result<Outcome, ModelError> {
        match self.roles.get_mut(&role) {
            Some(role) => {
                role.mandatory = mandatory;
                Ok(Outcome::Applied)
            }
            None => Ok(Outcome::Ignored),
        }
    }

    /// Reverse a predicate's role order, inverting left/right adjacency.
    pub fn flip_predicate(&mut self, predicate: ObjectId) -> Result<Outcome, ModelError> {
        match self.predicates.get_mut(&predicate) {
            Some(predicate) => {
                predicate.flip();
                Ok(Outcome::Applied)
            }
            None => Ok(Outcome::Ignored),
        }
    }

    /// Toggle a predicate's vertical display flag.
    pub fn rotate_predicate(&mut self, predicate: ObjectId) -> Result<Outcome, ModelError> {
        match self.predicates.get_mut(&predicate) {
            Some(predicate) => {
                predicate.rotate();
                Ok(Outcome::Applied)
            }
            None => Ok(Outcome::Ignored),
        }
    }

    /// Append an unassigned role to the end of a predicate's role order.
    pub fn append_role(&mut self, predicate: ObjectId) -> Result<Outcome, ModelError> {
        if !self.predicates.contains_key(&predicate) {
            return Ok(Outcome::Ignored);
        }
        let role = self.push_role(predicate);
        debug!(predicate:% = predicate, role:% = role; "appended role");
        Ok(Outcome::Created(role))
    }

    /// Remove the last role in a predicate's current order, cascading to any
    /// connectors attached to it. Removing the only role deletes the whole
    /// predicate.
    pub fn remove_last_role(&mut self, predicate: ObjectId) -> Result<Outcome, ModelError> {
        let Some(pred) = self.predicates.get(&predicate) else {
            return Ok(Outcome::Ignored);
        };
        if pred.arity() <= 1 {
            debug!(predicate:% = predicate; "removing last remaining role deletes the predicate");
            return self.delete(predicate);
        }
        let Some(&last) = pred.role_order.last() else {
            return Ok(Outcome::Ignored);
        };
        self.remove_role(last);
        Ok(Outcome::Applied)
    }

    /// Assign an entity or value type as the player of a role, creating the
    /// entity-to-role connector. Reassigning replaces the previous player and
    /// its connector.
    pub fn assign_role(&mut self, role: ObjectId, player: ObjectId) -> Result<Outcome, ModelError> {
        if !self.roles.contains_key(&role) || !self.contains(player) {
            return Ok(Outcome::Ignored);
        }
        if !matches!(player.kind(), ObjectKind::Entity | ObjectKind::Value) {
            debug!(role:% = role, player:% = player; "role player must be an entity or value");
            return Ok(Outcome::Ignored);
        }

        // Drop a previous assignment's connector before rebinding.
        let stale: Vec<ObjectId> = self
            .connectors
            .values()
            .filter(|conn| conn.kind == ConnectorKind::EntityToRole && conn.touches(role))
            .map(|conn| conn.id)
            .collect();
        for conn in stale {
            self.remove_connector(conn);
        }

        let id = self.counters.issue(ObjectKind::Connector);
        self.connectors.insert(
            id,
            Connector::new(id, ConnectorKind::EntityToRole, player, role, false, None),
        );
        if let Some(role) = self.roles.get_mut(&role) {
            role.player = Some(player);
        }
        debug!(role:% = role, player:% = player, connector:% = id; "assigned role");
        Ok(Outcome::Created(id))
    }

    /// Create a subtype connector expressing `subtype` is-a `supertype`.
    pub fn add_subtype(
        &mut self,
        subtype: ObjectId,
        supertype: ObjectId,
    ) -> Result<Outcome, ModelError> {
        if !self.entities.contains_key(&subtype) || !self.entities.contains_key(&supertype) {
            return Ok(Outcome::Ignored);
        }
        if subtype == supertype {
            return Err(ModelError::SelfSubtype(subtype));
        }
        let duplicate = self.connectors.values().any(|conn| {
            conn.kind == ConnectorKind::Subtype && conn.from == subtype && conn.to == supertype
        });
        if duplicate {
            return Err(ModelError::DuplicateSubtype { subtype, supertype });
        }

        let id = self.counters.issue(ObjectKind::Connector);
        self.connectors.insert(
            id,
            Connector::new(id, ConnectorKind::Subtype, subtype, supertype, true, None),
        );
        debug!(subtype:% = subtype, supertype:% = supertype, connector:% = id; "added subtype");
        Ok(Outcome::Created(id))
    }

    /// Attach a constraint to a role or a subtype connector.
    ///
    /// The connection validator runs first; a rejected attachment returns
    /// [`ModelError::ConnectionRejected`] without touching the model. On
    /// success the connector is created and role inference propagates the
    /// constraint to eligible adjacent roles. Returns every connector created,
    /// the manual attachment first.
    pub fn attach_constraint(
        &mut self,
        constraint: ObjectId,
        target: ObjectId,
        side: Side,
    ) -> Result<Outcome, ModelError> {
        if !self.constraints.contains_key(&constraint) || !self.contains(target) {
            return Ok(Outcome::Ignored);
        }
        if !validator::can_connect(self, constraint, target) {
            return Err(ModelError::ConnectionRejected { constraint, target });
        }

        let (kind, attach_side) = match target.kind() {
            ObjectKind::Role => (ConnectorKind::ConstraintToRole, Some(side)),
            ObjectKind::Connector => (ConnectorKind::ConstraintToSubtype, None),
            // can_connect already refused anything else
            _ => return Err(ModelError::ConnectionRejected { constraint, target }),
        };
        let directed = self.constraints[&constraint].kind.directed();

        let id = self.counters.issue(ObjectKind::Connector);
        self.connectors.insert(
            id,
            Connector::new(id, kind, constraint, target, directed, attach_side),
        );
        if let Some(constraint) = self.constraints.get_mut(&constraint) {
            constraint.connectors.push(id);
        }
        debug!(constraint:% = constraint, target:% = target, connector:% = id; "attached constraint");

        let mut created = vec![id];
        created.extend(inference::propagate_roles(self, constraint));
        Ok(Outcome::CreatedMany(created))
    }

    /// Create a role connector for propagation, oriented by `directed`:
    /// role→constraint when directed (preserving the arrow's direction along
    /// the chain), constraint→role otherwise.
    pub(crate) fn connect_propagated(
        &mut self,
        constraint: ObjectId,
        role: ObjectId,
        side: Side,
        directed: bool,
    ) -> ObjectId {
        let (from, to) = if directed {
            (role, constraint)
        } else {
            (constraint, role)
        };
        let id = self.counters.issue(ObjectKind::Connector);
        self.connectors.insert(
            id,
            Connector::new(
                id,
                ConnectorKind::ConstraintToRole,
                from,
                to,
                directed,
                Some(side),
            ),
        );
        if let Some(constraint) = self.constraints.get_mut(&constraint) {
            constraint.connectors.push(id);
        }
        debug!(constraint:% = constraint, role:% = role, connector:% = id; "propagated constraint");
        id
    }

    /// Duplicate an entity, value, predicate, or constraint at an offset
    /// position. Typed fields are copied; connectors never are.
    pub fn duplicate(&mut self, id: ObjectId) -> Result<Outcome, ModelError> {
        let offset = Point::new(params::DUPLICATE_OFFSET, params::DUPLICATE_OFFSET);
        let copy = match id.kind() {
            ObjectKind::Entity => self.entities.get(&id).cloned().map(|source| {
                let copy = self.create_entity(&source.name, source.position.add_point(offset));
                if let Some(entity) = self.entities.get_mut(&copy) {
                    entity.ref_mode = source.ref_mode.clone();
                }
                copy
            }),
            ObjectKind::Value => self
                .values
                .get(&id)
                .cloned()
                .map(|source| self.create_value(&source.name, source.position.add_point(offset))),
            ObjectKind::Predicate => self.predicates.get(&id).cloned().map(|source| {
                let copy = self.create_predicate(&source.name, source.position.add_point(offset));
                for _ in 1..source.arity() {
                    self.push_role(copy);
                }
                // Per-role names and mandatory flags carry over; players and
                // connectors do not.
                let copied_roles = self.predicates[&copy].role_order.clone();
                for (original, copied) in source.role_order.iter().zip(copied_roles) {
                    if let Some(original) = self.roles.get(original).cloned() {
                        if let Some(role) = self.roles.get_mut(&copied) {
                            role.name = original.name;
                            role.mandatory = original.mandatory;
                        }
                    }
                }
                if let Some(predicate) = self.predicates.get_mut(&copy) {
                    predicate.flipped = source.flipped;
                    predicate.rotated = source.rotated;
                }
                copy
            }),
            ObjectKind::Constraint => self.constraints.get(&id).cloned().map(|source| {
                let copy =
                    self.create_constraint(source.kind, source.position.add_point(offset));
                if let Some(constraint) = self.constraints.get_mut(&copy) {
                    constraint.content = source.content.clone();
                    constraint.deontic = source.deontic;
                    constraint.ring = source.ring;
                    constraint.obligatory = source.obligatory;
                }
                copy
            }),
            ObjectKind::Role | ObjectKind::Connector => None,
        };
        match copy {
            Some(copy) => {
                debug!(source:% = id, copy:% = copy; "duplicated element");
                Ok(Outcome::Created(copy))
            }
            None => Ok(Outcome::Ignored),
        }
    }

    // =========================================================================
    // Deletion
    // =========================================================================

    /// Delete an element, cascading to every connector whose lifetime it
    /// owns. Constraints that lose connectors in a cascade keep living with a
    /// shortened attachment list; they are never deleted on the caller's
    /// behalf.
    pub fn delete(&mut self, id: ObjectId) -> Result<Outcome, ModelError> {
        if !self.contains(id) {
            return Ok(Outcome::Ignored);
        }
        debug!(id:% = id; "deleting element");
        match id.kind() {
            ObjectKind::Entity => {
                self.remove_connectors_touching(id);
                self.entities.shift_remove(&id);
            }
            ObjectKind::Value => {
                self.remove_connectors_touching(id);
                self.values.shift_remove(&id);
            }
            ObjectKind::Predicate => {
                let roles = self.predicates[&id].role_order.clone();
                for role in roles {
                    self.remove_connectors_touching(role);
                    self.roles.shift_remove(&role);
                }
                self.predicates.shift_remove(&id);
            }
            ObjectKind::Role => {
                self.remove_role(id);
            }
            ObjectKind::Constraint => {
                let attached = self.constraints[&id].connectors.clone();
                for connector in attached {
                    self.remove_connector(connector);
                }
                self.constraints.shift_remove(&id);
            }
            ObjectKind::Connector => {
                self.remove_connector(id);
            }
        }
        Ok(Outcome::Applied)
    }

    fn remove_role(&mut self, role: ObjectId) {
        let Some(removed) = self.roles.shift_remove(&role) else {
            return;
        };
        self.remove_connectors_touching(role);
        if let Some(predicate) = self.predicates.get_mut(&removed.predicate) {
            predicate.role_order.retain(|id| *id != role);
        }
    }

    fn remove_connectors_touching(&mut self, id: ObjectId) {
        let touching: Vec<ObjectId> = self
            .connectors
            .values()
            .filter(|conn| conn.touches(id))
            .map(|conn| conn.id)
            .collect();
        for connector in touching {
            self.remove_connector(connector);
        }
    }

    /// Remove one connector: detach it from any constraint's attachment list,
    /// unassign the role for entity-to-role connectors, and cascade to
    /// connectors riding on this one (constraints over subtype connectors).
    fn remove_connector(&mut self, id: ObjectId) {
        let Some(conn) = self.connectors.shift_remove(&id) else {
            return;
        };
        debug!(connector:% = id; "removing connector");

        if let Some(constraint) = conn.endpoint_of_kind(ObjectKind::Constraint) {
            if let Some(constraint) = self.constraints.get_mut(&constraint) {
                constraint.connectors.retain(|c| *c != id);
            }
        }

        if conn.kind == ConnectorKind::EntityToRole {
            if let Some(role) = conn.role_end() {
                if let Some(role) = self.roles.get_mut(&role) {
                    role.player = None;
                }
            }
        }

        let riders: Vec<ObjectId> = self
            .connectors
            .values()
            .filter(|other| other.touches(id))
            .map(|other| other.id)
            .collect();
        for rider in riders {
            self.remove_connector(rider);
        }
    }
}
