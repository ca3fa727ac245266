//! Geometric primitives for connector placement.
//!
//! This module provides the geometric types used throughout Factum for
//! positioning model elements and anchoring connector endpoints.
//!
//! # Overview
//!
//! - [`Point`] - A 2D coordinate in diagram space
//! - [`point_on_circle`] - The boundary anchor used for connector endpoints
//!
//! # Coordinate System
//!
//! Factum uses a coordinate system consistent with SVG:
//!
//! ```text
//!   (0,0) ────────► +X
//!     │
//!     │
//!     ▼
//!    +Y
//! ```
//!
//! - **Origin**: Top-left corner at `(0, 0)`
//! - **X-axis**: Increases rightward
//! - **Y-axis**: Increases downward

use std::f32::consts::PI;

use serde::{Deserialize, Serialize};

/// A 2D point representing a position in diagram coordinate space.
///
/// Points use `f32` coordinates and provide operations for basic vector math.
/// The coordinate system has origin at top-left with Y increasing downward
/// (see [module documentation](self) for details).
///
/// # Examples
///
/// ```
/// # use factum_core::geometry::Point;
/// let p1 = Point::new(10.0, 20.0);
/// let p2 = Point::new(5.0, 5.0);
///
/// let sum = p1.add_point(p2);
/// assert_eq!(sum.x(), 15.0);
/// assert_eq!(sum.y(), 25.0);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    x: f32,
    y: f32,
}

impl Point {
    /// Creates a new point with the specified coordinates
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Returns the x-coordinate of the point
    pub fn x(self) -> f32 {
        self.x
    }

    /// Returns the y-coordinate of the point
    pub fn y(self) -> f32 {
        self.y
    }

    /// Adds another point to this point, returning a new point
    pub fn add_point(self, other: Point) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }

    /// Subtracts another point from this point, returning a new point
    pub fn sub_point(self, other: Point) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }

    /// Calculates the hypotenuse (Euclidean distance from origin)
    pub fn hypot(self) -> f32 {
        self.x.hypot(self.y)
    }

    /// Calculates the Euclidean distance to another point
    pub fn distance(self, other: Point) -> f32 {
        self.sub_point(other).hypot()
    }
}

/// Find the point at distance `radius` from `center` along the line toward
/// `target`.
///
/// Used to anchor connector endpoints on a constraint's circular boundary so
/// that connectors meet the circle edge rather than its center, regardless of
/// the approach angle.
///
/// The angle is computed from the `atan` of the slope, with a `π` correction
/// when the target lies to the left of the center (resolving the two-quadrant
/// ambiguity of `atan`). A target directly above or below the center yields an
/// infinite slope, which `atan` maps to `±π/2`, so the vertical case needs no
/// special handling.
///
/// # Examples
///
/// ```
/// # use factum_core::geometry::{Point, point_on_circle};
/// let center = Point::new(0.0, 0.0);
///
/// let anchor = point_on_circle(center, Point::new(10.0, 0.0), 5.0);
/// assert_eq!(anchor, Point::new(5.0, 0.0));
/// ```
pub fn point_on_circle(center: Point, target: Point, radius: f32) -> Point {
    let mut angle = ((target.y - center.y) / (target.x - center.x)).atan();
    if center.x > target.x {
        angle += PI;
    }

    Point::new(
        center.x + radius * angle.cos(),
        center.y + radius * angle.sin(),
    )
}


#[cfg(test)]
mod proptest_tests {
    use float_cmp::approx_eq;
    use proptest::prelude::*;

    use super::*;

    fn point_strategy() -> impl Strategy<Value = Point> {
        (-1000.0f32..1000.0, -1000.0f32..1000.0).prop_map(|(x, y)| Point::new(x, y))
    }

    fn radius_strategy() -> impl Strategy<Value = f32> {
        1.0f32..200.0
    }

    /// The anchor always lies at distance `radius` from the center.
    fn check_anchor_distance(
        center: Point,
        target: Point,
        radius: f32,
    ) -> Result<(), TestCaseError> {
        prop_assume!(center.distance(target) > 1.0);

        let anchor = point_on_circle(center, target, radius);
        prop_assert!(approx_eq!(
            f32,
            anchor.distance(center),
            radius,
            epsilon = 0.01
        ));
        Ok(())
    }

    /// The anchor lies on the center→target ray: the cross product of the two
    /// direction vectors vanishes and the dot product is non-negative.
    fn check_anchor_collinear(
        center: Point,
        target: Point,
        radius: f32,
    ) -> Result<(), TestCaseError> {
        prop_assume!(center.distance(target) > 1.0);

        let anchor = point_on_circle(center, target, radius);
        let to_anchor = anchor.sub_point(center);
        let to_target = target.sub_point(center);

        let cross = to_anchor.x() * to_target.y() - to_anchor.y() * to_target.x();
        let dot = to_anchor.x() * to_target.x() + to_anchor.y() * to_target.y();

        prop_assert!(cross.abs() < 0.05 * to_target.hypot() * radius);
        prop_assert!(dot >= 0.0);
        Ok(())
    }

    proptest! {
        #[test]
        fn anchor_distance(center in point_strategy(), target in point_strategy(), radius in radius_strategy()) {
            check_anchor_distance(center, target, radius)?;
        }

        #[test]
        fn anchor_collinear(center in point_strategy(), target in point_strategy(), radius in radius_strategy()) {
            check_anchor_collinear(center, target, radius)?;
        }
    }
}
