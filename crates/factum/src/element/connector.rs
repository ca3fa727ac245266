//! Typed, directed edges between model elements.

use std::{
    fmt::{self, Display},
    str::FromStr,
};

use serde::{Deserialize, Serialize};

use factum_core::identifier::{ObjectId, ObjectKind};

/// The kind of a connector.
///
/// The kind fixes what the endpoints are: a `ConstraintToSubtype` connector's
/// role-like end is itself a subtype connector id, so constraints over
/// subtypes ride on the edge rather than on either entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConnectorKind {
    /// An entity or value type filling a role
    EntityToRole,
    /// An is-a relationship from a subtype entity to its supertype
    Subtype,
    /// A constraint attached to a role
    ConstraintToRole,
    /// A constraint attached to a subtype connector
    ConstraintToSubtype,
}

/// The side of a role box a connector attaches on.
///
/// Left and right attachments participate in role inference (the chain
/// continues along the fact); top and bottom attachments do not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Left,
    Right,
    Top,
    Bottom,
}

impl Side {
    /// Whether an attachment on this side continues a chain along the fact.
    pub fn chainable(self) -> bool {
        matches!(self, Side::Left | Side::Right)
    }

    /// The opposite side.
    pub fn opposite(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
            Side::Top => Side::Bottom,
            Side::Bottom => Side::Top,
        }
    }
}

impl Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Side::Left => "left",
            Side::Right => "right",
            Side::Top => "top",
            Side::Bottom => "bottom",
        };
        write!(f, "{s}")
    }
}

impl FromStr for Side {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "left" => Ok(Side::Left),
            "right" => Ok(Side::Right),
            "top" => Ok(Side::Top),
            "bottom" => Ok(Side::Bottom),
            _ => Err("Unsupported attachment side"),
        }
    }
}

/// A typed edge joining two model elements.
///
/// A connector's lifetime is owned by the pair it joins: deleting either
/// endpoint deletes the connector. Endpoint orientation (`from`/`to`) follows
/// the creating gesture, so queries that need "the role end" or "the
/// constraint end" resolve endpoints by kind instead of by position.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Connector {
    pub(crate) id: ObjectId,
    pub(crate) kind: ConnectorKind,
    pub(crate) from: ObjectId,
    pub(crate) to: ObjectId,
    pub(crate) directed: bool,
    pub(crate) attach_side: Option<Side>,
}

impl Connector {
    pub(crate) fn new(
        id: ObjectId,
        kind: ConnectorKind,
        from: ObjectId,
        to: ObjectId,
        directed: bool,
        attach_side: Option<Side>,
    ) -> Self {
        Self {
            id,
            kind,
            from,
            to,
            directed,
            attach_side,
        }
    }

    /// Get the connector's identifier.
    pub fn id(&self) -> ObjectId {
        self.id
    }

    /// Get the connector's kind.
    pub fn kind(&self) -> ConnectorKind {
        self.kind
    }

    /// The endpoint the connector starts from.
    pub fn from(&self) -> ObjectId {
        self.from
    }

    /// The endpoint the connector points to.
    pub fn to(&self) -> ObjectId {
        self.to
    }

    /// Whether the connector carries a direction (drawn as an arrow and
    /// preserved by role propagation).
    pub fn directed(&self) -> bool {
        self.directed
    }

    /// The side of the role box this connector attaches on, for connectors
    /// with a role end.
    pub fn attach_side(&self) -> Option<Side> {
        self.attach_side
    }

    /// Whether `id` is one of the two endpoints.
    pub fn touches(&self, id: ObjectId) -> bool {
        self.from == id || self.to == id
    }

    /// The endpoint of the given kind, if either end has it.
    pub fn endpoint_of_kind(&self, kind: ObjectKind) -> Option<ObjectId> {
        if self.from.kind() == kind {
            Some(self.from)
        } else if self.to.kind() == kind {
            Some(self.to)
        } else {
            None
        }
    }

    /// The role end of a role-attached connector.
    pub fn role_end(&self) -> Option<ObjectId> {
        self.endpoint_of_kind(ObjectKind::Role)
    }
}
