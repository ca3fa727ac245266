//! Named object types: entities and values.

use serde::{Deserialize, Serialize};

use factum_core::{geometry::Point, identifier::ObjectId};

/// An entity type: a named, identifiable kind of thing in the schema.
///
/// Entities play roles in facts and may stand in subtype relationships with
/// other entities.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub(crate) id: ObjectId,
    pub(crate) name: String,
    pub(crate) ref_mode: Option<String>,
    pub(crate) position: Point,
}

impl Entity {
    pub(crate) fn new(id: ObjectId, name: &str, position: Point) -> Self {
        Self {
            id,
            name: name.to_string(),
            ref_mode: None,
            position,
        }
    }

    /// Get the entity's identifier.
    pub fn id(&self) -> ObjectId {
        self.id
    }

    /// Get the entity's display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the reference mode, the scheme by which instances are identified
    /// (e.g. `"id"`, `"name"`), if one has been set.
    pub fn ref_mode(&self) -> Option<&str> {
        self.ref_mode.as_deref()
    }

    /// Get the entity's position in diagram space.
    pub fn position(&self) -> Point {
        self.position
    }
}

/// A value type: a named lexical type (string, number, code) that can fill
/// roles but has no identity of its own.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Value {
    pub(crate) id: ObjectId,
    pub(crate) name: String,
    pub(crate) position: Point,
}

impl Value {
    pub(crate) fn new(id: ObjectId, name: &str, position: Point) -> Self {
        Self {
            id,
            name: name.to_string(),
            position,
        }
    }

    /// Get the value type's identifier.
    pub fn id(&self) -> ObjectId {
        self.id
    }

    /// Get the value type's display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the value type's position in diagram space.
    pub fn position(&self) -> Point {
        self.position
    }
}
