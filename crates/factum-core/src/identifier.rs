//! Model element identifiers.
//!
//! Every element in a Factum model is addressed by an [`ObjectId`]: the
//! element's kind paired with a numeric index issued by that model's
//! [`IdCounters`]. Ids are small `Copy` values; all relations between model
//! elements are id lookups rather than direct references, which keeps the
//! model free of ownership cycles and makes serialization trivial.
//!
//! Ids render as `"<kind>-<index>"` (`"entity-0"`, `"constraint-3"`), and the
//! same form is used when a model is serialized, so persisted maps stay
//! legible.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The kind of a model element.
///
/// Each kind has its own id namespace within a model: `entity-0` and
/// `constraint-0` are unrelated objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectKind {
    Entity,
    Value,
    Predicate,
    Role,
    Constraint,
    Connector,
}

impl ObjectKind {
    /// The lowercase name used in rendered and serialized ids.
    pub fn as_str(self) -> &'static str {
        match self {
            ObjectKind::Entity => "entity",
            ObjectKind::Value => "value",
            ObjectKind::Predicate => "predicate",
            ObjectKind::Role => "role",
            ObjectKind::Constraint => "constraint",
            ObjectKind::Connector => "connector",
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ObjectKind {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "entity" => Ok(ObjectKind::Entity),
            "value" => Ok(ObjectKind::Value),
            "predicate" => Ok(ObjectKind::Predicate),
            "role" => Ok(ObjectKind::Role),
            "constraint" => Ok(ObjectKind::Constraint),
            "connector" => Ok(ObjectKind::Connector),
            _ => Err(ParseIdError::UnknownKind(s.to_string())),
        }
    }
}

/// Error returned when parsing an id from its string form fails.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseIdError {
    #[error("unknown element kind: {0}")]
    UnknownKind(String),

    #[error("malformed id: {0}")]
    Malformed(String),
}

/// A kind-tagged identifier for a model element.
///
/// # Examples
///
/// ```
/// use factum_core::identifier::{IdCounters, ObjectId, ObjectKind};
///
/// let mut counters = IdCounters::default();
/// let first = counters.issue(ObjectKind::Entity);
/// let second = counters.issue(ObjectKind::Entity);
///
/// assert_eq!(first, "entity-0");
/// assert_eq!(second, "entity-1");
/// assert_eq!(first.kind(), ObjectKind::Entity);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct ObjectId {
    kind: ObjectKind,
    index: u32,
}

impl ObjectId {
    /// Creates an id from a kind and an index.
    ///
    /// Ids inside a model are normally issued through [`IdCounters::issue`];
    /// direct construction is for tests and for hosts reconstructing state.
    pub fn new(kind: ObjectKind, index: u32) -> Self {
        Self { kind, index }
    }

    /// The element kind this id addresses.
    pub fn kind(self) -> ObjectKind {
        self.kind
    }

    /// The numeric index within the kind's namespace.
    pub fn index(self) -> u32 {
        self.index
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.kind, self.index)
    }
}

impl FromStr for ObjectId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, index) = s
            .rsplit_once('-')
            .ok_or_else(|| ParseIdError::Malformed(s.to_string()))?;
        let kind = ObjectKind::from_str(kind)?;
        let index = index
            .parse::<u32>()
            .map_err(|_| ParseIdError::Malformed(s.to_string()))?;
        Ok(ObjectId { kind, index })
    }
}

impl From<ObjectId> for String {
    fn from(id: ObjectId) -> Self {
        id.to_string()
    }
}

impl TryFrom<String> for ObjectId {
    type Error = ParseIdError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl PartialEq<str> for ObjectId {
    /// Allows direct comparison with the rendered form: `id == "entity-0"`
    fn eq(&self, other: &str) -> bool {
        other
            .parse::<ObjectId>()
            .map(|parsed| parsed == *self)
            .unwrap_or(false)
    }
}

impl PartialEq<&str> for ObjectId {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

/// Monotonically increasing id counters, one per element kind.
///
/// Each model owns its own counters, so independent models never collide on
/// ids. Counters only move forward; deleting an element does not recycle its
/// index.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdCounters {
    entities: u32,
    values: u32,
    predicates: u32,
    roles: u32,
    constraints: u32,
    connectors: u32,
}

impl IdCounters {
    /// Issues the next id for `kind`, advancing that kind's counter.
    pub fn issue(&mut self, kind: ObjectKind) -> ObjectId {
        let counter = match kind {
            ObjectKind::Entity => &mut self.entities,
            ObjectKind::Value => &mut self.values,
            ObjectKind::Predicate => &mut self.predicates,
            ObjectKind::Role => &mut self.roles,
            ObjectKind::Constraint => &mut self.constraints,
            ObjectKind::Connector => &mut self.connectors,
        };
        let id = ObjectId::new(kind, *counter);
        *counter += 1;
        id
    }
}
