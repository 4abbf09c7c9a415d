// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
use crate::math::EPSILON;

/// 3D vector in metres (points) or unitless (directions).
///
/// * Use [`crate::math::Mat4::transform_point`] for points (`w = 1`) and
///   [`crate::math::Mat4::transform_direction`] for directions (`w = 0`).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Vec3 {
    data: [f64; 3],
}

impl Vec3 {
    /// The zero vector.
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    /// Unit vector pointing along the positive X axis.
    pub const UNIT_X: Self = Self::new(1.0, 0.0, 0.0);

    /// Unit vector pointing along the positive Y axis.
    pub const UNIT_Y: Self = Self::new(0.0, 1.0, 0.0);

    /// Unit vector pointing along the positive Z axis (world up).
    pub const UNIT_Z: Self = Self::new(0.0, 0.0, 1.0);

    /// Creates a vector from components.
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { data: [x, y, z] }
    }

    /// Returns the components as an array.
    pub fn to_array(self) -> [f64; 3] {
        self.data
    }

    /// X component.
    pub fn x(&self) -> f64 {
        self.data[0]
    }

    /// Y component.
    pub fn y(&self) -> f64 {
        self.data[1]
    }

    /// Z component.
    pub fn z(&self) -> f64 {
        self.data[2]
    }

    pub(crate) fn component(&self, idx: usize) -> f64 {
        self.data[idx]
    }

    /// Adds two vectors.
    pub fn add(&self, other: &Self) -> Self {
        Self::new(
            self.component(0) + other.component(0),
            self.component(1) + other.component(1),
            self.component(2) + other.component(2),
        )
    }

    /// Subtracts another vector.
    pub fn sub(&self, other: &Self) -> Self {
        Self::new(
            self.component(0) - other.component(0),
            self.component(1) - other.component(1),
            self.component(2) - other.component(2),
        )
    }

    /// Scales the vector by a scalar.
    pub fn scale(&self, scalar: f64) -> Self {
        Self::new(
            self.component(0) * scalar,
            self.component(1) * scalar,
            self.component(2) * scalar,
        )
    }

    /// Returns the negated vector.
    pub fn neg(&self) -> Self {
        self.scale(-1.0)
    }

    /// Dot product with another vector.
    pub fn dot(&self, other: &Self) -> f64 {
        self.component(0) * other.component(0)
            + self.component(1) * other.component(1)
            + self.component(2) * other.component(2)
    }

    /// Cross product with another vector.
    pub fn cross(&self, other: &Self) -> Self {
        let [ax, ay, az] = self.data;
        let [bx, by, bz] = other.data;
        Self::new(ay * bz - az * by, az * bx - ax * bz, ax * by - ay * bx)
    }

    /// Vector length.
    pub fn length(&self) -> f64 {
        self.dot(self).sqrt()
    }

    /// Normalises the vector, returning `None` if its length is ≤ `EPSILON`.
    ///
    /// Frame construction must not silently continue with a zero axis, so the
    /// degenerate case is surfaced to the caller instead of collapsing to zero.
    pub fn try_normalize(&self) -> Option<Self> {
        let len = self.length();
        if len <= EPSILON {
            return None;
        }
        Some(self.scale(1.0 / len))
    }

    /// Midpoint between two points.
    pub fn midpoint(&self, other: &Self) -> Self {
        self.add(other).scale(0.5)
    }

    /// Returns `true` when every component is within `tol` of `other`.
    pub fn approx_eq(&self, other: &Self, tol: f64) -> bool {
        (0..3).all(|i| (self.component(i) - other.component(i)).abs() <= tol)
    }
}

impl From<[f64; 3]> for Vec3 {
    fn from(value: [f64; 3]) -> Self {
        Self { data: value }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_degenerate_is_none() {
        assert!(Vec3::new(1e-12, -1e-12, 0.0).try_normalize().is_none());
    }

    #[test]
    fn cross_of_up_and_forward_points_left() {
        let left = Vec3::UNIT_Z.cross(&Vec3::UNIT_X);
        assert_eq!(left.to_array(), [0.0, 1.0, 0.0]);
    }
}
