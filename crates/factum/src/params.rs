//! Default sizing parameters for model elements.
//!
//! The reference editor resolves these from stylesheet variables; the core
//! keeps them as plain constants so geometry stays computable without a
//! rendering layer. Hosts that restyle elements can feed their own radii into
//! [`factum_core::geometry::point_on_circle`] directly.

/// Radius of a constraint circle.
pub const CONSTRAINT_RADIUS: f32 = 25.0;

/// Radius of the grab overlay around a constraint, slightly larger than the
/// circle itself so connectors can be picked up near the boundary.
pub const CONSTRAINT_OUTER_RADIUS: f32 = 33.0;

/// Offset applied to the position of a duplicated element.
pub const DUPLICATE_OFFSET: f32 = 2.0 * CONSTRAINT_RADIUS;

/// Horizontal advance per character when a constraint's circle grows to fit
/// its content.
pub const CONTENT_CHAR_WIDTH: f32 = 12.0;

/// Width discount for each `.` in constraint content (range dots are narrow).
pub const CONTENT_DOT_DISCOUNT: f32 = 4.0;
