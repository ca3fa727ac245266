//! Error types for model mutations.
//!
//! Rejections are local and recoverable: a failed command leaves the model
//! untouched. Operations addressed to ids that no longer exist are *not*
//! errors; they are ignored (see [`crate::model::Outcome::Ignored`]), which
//! keeps the core robust against stale ids from rapid host interaction.

use thiserror::Error;

use factum_core::identifier::ObjectId;

/// The error type for Factum model mutations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// The connection validator refused the attachment. No connector was
    /// created and no state changed.
    #[error("constraint {constraint} may not attach to {target}")]
    ConnectionRejected {
        constraint: ObjectId,
        target: ObjectId,
    },

    /// A frequency constraint was given content outside the recognized
    /// grammar. The previous content is kept.
    #[error("invalid frequency content: {0:?}")]
    InvalidFrequency(String),

    /// A subtype connector must join two distinct entities.
    #[error("an entity cannot be a subtype of itself: {0}")]
    SelfSubtype(ObjectId),

    /// The two entities are already joined by a subtype connector.
    #[error("{subtype} is already a subtype of {supertype}")]
    DuplicateSubtype {
        subtype: ObjectId,
        supertype: ObjectId,
    },
}
