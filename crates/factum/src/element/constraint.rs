//! Constraints and their content rules.

use std::{
    fmt::{self, Display},
    str::FromStr,
    sync::OnceLock,
};

use log::debug;
use regex::Regex;
use serde::{Deserialize, Serialize};

use factum_core::{
    geometry::{Point, point_on_circle},
    identifier::ObjectId,
};

use crate::{error::ModelError, params};

/// The kind of a constraint.
///
/// Kinds decide which targets a constraint may attach to, how attachments
/// match entities, and whether the constraint carries user-editable content.
/// The names match the serialized form (kebab-case).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConstraintKind {
    /// At least one of the constrained roles must be played
    InclusiveOr,
    /// At most one of the constrained roles may be played
    Exclusion,
    /// Exactly one of the constrained roles must be played
    ExclusiveOr,
    /// The constrained roles must be played by the same instances
    Equality,
    /// Frequency bound spanning more than one fact
    ExternalFrequency,
    /// Frequency bound over adjacent roles of a single fact
    InternalFrequency,
    /// Uniqueness over the constrained roles
    Identifier,
    /// The preferred identification scheme for an entity
    PreferredIdentifier,
    /// The population of one role sequence is contained in another's
    Subset,
    /// Restriction of the values a single role may take
    RoleValue,
}

impl ConstraintKind {
    /// The kinds a host may offer when assigning a type to a constraint.
    ///
    /// `RoleValue` is excluded; role-value constraints are created through a
    /// role's own value-restriction flow rather than retyped in place.
    pub fn assignable() -> [ConstraintKind; 9] {
        [
            ConstraintKind::InclusiveOr,
            ConstraintKind::Exclusion,
            ConstraintKind::ExclusiveOr,
            ConstraintKind::Equality,
            ConstraintKind::Identifier,
            ConstraintKind::PreferredIdentifier,
            ConstraintKind::Subset,
            ConstraintKind::ExternalFrequency,
            ConstraintKind::InternalFrequency,
        ]
    }

    /// The lowercase name used in serialized form.
    pub fn as_str(self) -> &'static str {
        match self {
            ConstraintKind::InclusiveOr => "inclusive-or",
            ConstraintKind::Exclusion => "exclusion",
            ConstraintKind::ExclusiveOr => "exclusive-or",
            ConstraintKind::Equality => "equality",
            ConstraintKind::ExternalFrequency => "external-frequency",
            ConstraintKind::InternalFrequency => "internal-frequency",
            ConstraintKind::Identifier => "identifier",
            ConstraintKind::PreferredIdentifier => "preferred-identifier",
            ConstraintKind::Subset => "subset",
            ConstraintKind::RoleValue => "role-value",
        }
    }

    /// Whether this kind carries user-editable content.
    pub fn allows_content(self) -> bool {
        matches!(
            self,
            ConstraintKind::InternalFrequency
                | ConstraintKind::ExternalFrequency
                | ConstraintKind::RoleValue
        )
    }

    /// Whether this kind's content must satisfy the frequency grammar.
    pub fn is_frequency(self) -> bool {
        matches!(
            self,
            ConstraintKind::InternalFrequency | ConstraintKind::ExternalFrequency
        )
    }

    /// Whether this kind may attach to subtype connectors.
    pub fn subtype_capable(self) -> bool {
        matches!(
            self,
            ConstraintKind::Exclusion | ConstraintKind::ExclusiveOr | ConstraintKind::InclusiveOr
        )
    }

    /// Whether attachment matching is against the primary entity of the
    /// target role's fact rather than the role's own player.
    pub fn matches_primary_entity(self) -> bool {
        matches!(
            self,
            ConstraintKind::Identifier
                | ConstraintKind::PreferredIdentifier
                | ConstraintKind::ExternalFrequency
        )
    }

    /// Whether this kind accepts exactly one attachment in total.
    pub fn single_attachment(self) -> bool {
        matches!(self, ConstraintKind::RoleValue)
    }

    /// Whether connectors from this kind are drawn and propagated with a
    /// direction.
    pub fn directed(self) -> bool {
        matches!(self, ConstraintKind::Subset)
    }
}

impl Default for ConstraintKind {
    /// New constraints start as inclusive-or.
    fn default() -> Self {
        ConstraintKind::InclusiveOr
    }
}

impl Display for ConstraintKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ConstraintKind {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "inclusive-or" => Ok(ConstraintKind::InclusiveOr),
            "exclusion" => Ok(ConstraintKind::Exclusion),
            "exclusive-or" => Ok(ConstraintKind::ExclusiveOr),
            "equality" => Ok(ConstraintKind::Equality),
            "external-frequency" => Ok(ConstraintKind::ExternalFrequency),
            "internal-frequency" => Ok(ConstraintKind::InternalFrequency),
            "identifier" => Ok(ConstraintKind::Identifier),
            "preferred-identifier" => Ok(ConstraintKind::PreferredIdentifier),
            "subset" => Ok(ConstraintKind::Subset),
            "role-value" => Ok(ConstraintKind::RoleValue),
            _ => Err("Unsupported constraint kind"),
        }
    }
}

/// A typed constraint over roles or subtype connectors.
///
/// The `connectors` list is ordered: attachment order is preserved across
/// serialization and drives the order in which inference examines roles.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Constraint {
    pub(crate) id: ObjectId,
    pub(crate) kind: ConstraintKind,
    pub(crate) position: Point,
    pub(crate) content: String,
    pub(crate) connectors: Vec<ObjectId>,
    pub(crate) deontic: bool,
    pub(crate) ring: bool,
    pub(crate) obligatory: bool,
}

impl Constraint {
    pub(crate) fn new(id: ObjectId, kind: ConstraintKind, position: Point) -> Self {
        let mut constraint = Self {
            id,
            kind,
            position,
            content: String::new(),
            connectors: Vec::new(),
            deontic: false,
            ring: false,
            obligatory: false,
        };
        // Subset carries its fixed symbol from the start.
        constraint.reset_content();
        constraint
    }

    /// Get the constraint's identifier.
    pub fn id(&self) -> ObjectId {
        self.id
    }

    /// Get the constraint's kind.
    pub fn kind(&self) -> ConstraintKind {
        self.kind
    }

    /// Get the constraint's position (circle center) in diagram space.
    pub fn position(&self) -> Point {
        self.position
    }

    /// Get the constraint's content text.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Borrow the ordered list of attached connector ids.
    pub fn connectors(&self) -> &[ObjectId] {
        &self.connectors
    }

    /// Whether the constraint is deontic (obligation rather than assertion).
    /// Rendering-only; no effect on connection rules.
    pub fn deontic(&self) -> bool {
        self.deontic
    }

    /// Whether the constraint is a ring constraint. Rendering-only.
    pub fn ring(&self) -> bool {
        self.ring
    }

    /// Whether the constraint is obligatory. Rendering-only.
    pub fn obligatory(&self) -> bool {
        self.obligatory
    }

    /// The circle radius, grown to fit content when present.
    pub fn radius(&self) -> f32 {
        if self.content.is_empty() {
            return params::CONSTRAINT_RADIUS;
        }
        let dots = self.content.matches('.').count() as f32;
        let fitted = (self.content.chars().count() as f32 * params::CONTENT_CHAR_WIDTH + 4.0)
            / 2.0
            - dots * params::CONTENT_DOT_DISCOUNT;
        fitted.max(params::CONSTRAINT_RADIUS)
    }

    /// The overlay radius, tracking [`Self::radius`] at a fixed offset.
    pub fn outer_radius(&self) -> f32 {
        self.radius() + (params::CONSTRAINT_OUTER_RADIUS - params::CONSTRAINT_RADIUS)
    }

    /// The point on the constraint's circular boundary along the direction of
    /// `toward`. Connector endpoints anchor here so they meet the circle edge
    /// rather than its center.
    pub fn anchor_point(&self, toward: Point) -> Point {
        point_on_circle(self.position, toward, self.radius())
    }

    /// Set the content text, if this kind allows it.
    ///
    /// Content is first forced into the kind's shape: `subset` always shows
    /// `"⊆"`, kinds without content are cleared. A provided value is then
    /// normalized (spaces stripped, `>=`/`<=` mapped to `≥`/`≤`) and, for
    /// frequency kinds, checked against the frequency grammar. Invalid
    /// frequency content is rejected and the previous content kept.
    pub fn set_content(&mut self, value: Option<&str>) -> Result<(), ModelError> {
        self.reset_content();

        let Some(value) = value else {
            return Ok(());
        };
        if !self.kind.allows_content() {
            return Ok(());
        }

        let normalized = normalize_content(value);
        if self.kind.is_frequency()
            && !normalized.is_empty()
            && !valid_frequency_content(&normalized)
        {
            debug!(constraint:% = self.id, content = value; "rejecting frequency content");
            return Err(ModelError::InvalidFrequency(value.to_string()));
        }

        self.content = normalized;
        Ok(())
    }

    /// Force the stored content into the shape the kind allows. Called after
    /// retyping as well as before every content edit.
    pub(crate) fn reset_content(&mut self) {
        if self.kind == ConstraintKind::Subset {
            self.content = "⊆".to_string();
        } else if !self.kind.allows_content() {
            self.content.clear();
        } else {
            self.content = normalize_content(&self.content);
        }
    }
}

/// Normalize content for display: drop spaces, replace ASCII comparators
/// with their typeset forms.
fn normalize_content(raw: &str) -> String {
    raw.replace(' ', "").replace(">=", "≥").replace("<=", "≤")
}

/// Check a (normalized) content string against the frequency grammar:
/// an optional comparator, an optional opening bracket, a number, an
/// optional `..` range continuation, an optional closing bracket.
///
/// `"2..5"`, `"≥3"`, and `"(1..12]"` are valid; `"abc"` is not.
pub fn valid_frequency_content(content: &str) -> bool {
    static FREQUENCY: OnceLock<Regex> = OnceLock::new();
    let regex = FREQUENCY.get_or_init(|| {
        let number = r"-?[0-9]+(\.[0-9]+)?";
        Regex::new(&format!(
            r"^[><≥≤]?=?[\(\[]?{number}(\.\.{number})?[\)\]]?$"
        ))
        .expect("frequency grammar must compile")
    });
    !content.is_empty() && regex.is_match(content)
}
