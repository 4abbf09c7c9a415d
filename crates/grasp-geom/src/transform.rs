// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

use core::fmt;

use thiserror::Error;

use crate::math::{self, Mat4, Vec3, EPSILON};

/// Basis axis label used in error reports.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Axis {
    /// First basis vector.
    X,
    /// Second basis vector.
    Y,
    /// Third basis vector.
    Z,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::X => "x",
            Self::Y => "y",
            Self::Z => "z",
        };
        f.write_str(s)
    }
}

/// Errors raised while building transforms from raw geometry.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum GeomError {
    /// An axis had near-zero length before normalisation.
    #[error("degenerate basis: {axis} axis has length {length:e}")]
    DegenerateBasis {
        /// Offending axis.
        axis: Axis,
        /// Its length before normalisation.
        length: f64,
    },
}

/// Rigid transform (rotation + translation) stored as an affine matrix.
///
/// Conventions:
/// - `translation` in metres, world space.
/// - Columns 0..3 of the matrix are the frame's x, y, z axes in world space.
/// - Immutable: composition returns a new transform.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RigidTransform {
    matrix: Mat4,
}

impl Default for RigidTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl RigidTransform {
    /// Identity transform.
    pub const fn identity() -> Self {
        Self {
            matrix: Mat4::identity(),
        }
    }

    /// Pure translation.
    pub fn from_translation(translation: Vec3) -> Self {
        let [x, y, z] = translation.to_array();
        Self {
            matrix: Mat4::translation(x, y, z),
        }
    }

    /// Rotation-only transform whose basis vectors are `x`, `y`, `z`.
    ///
    /// Each axis is normalised. Orthogonality is the caller's responsibility;
    /// an axis shorter than `EPSILON` fails with [`GeomError::DegenerateBasis`].
    pub fn from_axes(x: Vec3, y: Vec3, z: Vec3) -> Result<Self, GeomError> {
        let unit = |v: Vec3, axis: Axis| {
            v.try_normalize().ok_or(GeomError::DegenerateBasis {
                axis,
                length: v.length(),
            })
        };
        let x = unit(x, Axis::X)?;
        let y = unit(y, Axis::Y)?;
        let z = unit(z, Axis::Z)?;
        Ok(Self {
            matrix: Mat4::from_columns(x, y, z, Vec3::ZERO),
        })
    }

    /// Translation + rotation from a position and roll/pitch/yaw in degrees.
    pub fn from_position_and_rpy(position: Vec3, rpy_degrees: [f64; 3]) -> Self {
        let [roll, pitch, yaw] = rpy_degrees.map(math::deg_to_rad);
        let [x, y, z] = position.to_array();
        Self {
            matrix: Mat4::translation(x, y, z).multiply(&Mat4::rotation_from_rpy(roll, pitch, yaw)),
        }
    }

    /// Expresses `local` relative to `reference`: `reference` applied after `local`.
    ///
    /// Every task frame is produced this way, never the other way round.
    ///
    /// # Examples
    /// ```
    /// use grasp_geom::{RigidTransform, Vec3};
    /// let anchor = RigidTransform::from_position_and_rpy(Vec3::new(1.0, 0.0, 0.0), [0.0, 0.0, 90.0]);
    /// let offset = RigidTransform::from_translation(Vec3::new(0.5, 0.0, 0.0));
    /// let frame = RigidTransform::concatenate(&offset, &anchor);
    /// assert!(frame.translation().approx_eq(&Vec3::new(1.0, 0.5, 0.0), 1e-12));
    /// ```
    pub fn concatenate(local: &Self, reference: &Self) -> Self {
        Self {
            matrix: reference.matrix.multiply(&local.matrix),
        }
    }

    /// Translates the frame by `offset` expressed in world coordinates.
    pub fn translated(&self, offset: Vec3) -> Self {
        Self::concatenate(self, &Self::from_translation(offset))
    }

    /// Inverse transform (`R^T`, `-R^T t`).
    pub fn inverse(&self) -> Self {
        let x = self.x_axis();
        let y = self.y_axis();
        let z = self.z_axis();
        let t = self.translation();
        // Rows of R become the columns of R^T.
        let cx = Vec3::new(x.x(), y.x(), z.x());
        let cy = Vec3::new(x.y(), y.y(), z.y());
        let cz = Vec3::new(x.z(), y.z(), z.z());
        let origin = Vec3::new(-x.dot(&t), -y.dot(&t), -z.dot(&t));
        Self {
            matrix: Mat4::from_columns(cx, cy, cz, origin),
        }
    }

    /// Transform taking `self` to `other`, expressed in `self`'s frame.
    ///
    /// Satisfies `concatenate(&self.relative(other), self) == other`.
    pub fn relative(&self, other: &Self) -> Self {
        Self::concatenate(other, &self.inverse())
    }

    /// Translation component.
    pub fn translation(&self) -> Vec3 {
        self.matrix.column(3)
    }

    /// Frame x axis in world coordinates.
    pub fn x_axis(&self) -> Vec3 {
        self.matrix.column(0)
    }

    /// Frame y axis in world coordinates.
    pub fn y_axis(&self) -> Vec3 {
        self.matrix.column(1)
    }

    /// Frame z axis in world coordinates.
    pub fn z_axis(&self) -> Vec3 {
        self.matrix.column(2)
    }

    /// Roll, pitch and yaw in degrees (inverse of [`Self::from_position_and_rpy`]).
    pub fn rpy_degrees(&self) -> [f64; 3] {
        let m = &self.matrix;
        let pitch = (-m.at(2, 0)).clamp(-1.0, 1.0).asin();
        let (roll, yaw) = if m.at(2, 0).abs() < 1.0 - EPSILON {
            (m.at(2, 1).atan2(m.at(2, 2)), m.at(1, 0).atan2(m.at(0, 0)))
        } else {
            // Gimbal lock: fold everything into yaw.
            (0.0, (-m.at(0, 1)).atan2(m.at(1, 1)))
        };
        [roll, pitch, yaw].map(math::rad_to_deg)
    }

    /// Maps a point from this frame into world coordinates.
    pub fn transform_point(&self, point: &Vec3) -> Vec3 {
        self.matrix.transform_point(point)
    }

    /// Maps a direction from this frame into world coordinates.
    pub fn transform_direction(&self, direction: &Vec3) -> Vec3 {
        self.matrix.transform_direction(direction)
    }

    /// Returns the column-major matrix.
    pub fn to_mat4(&self) -> Mat4 {
        self.matrix
    }

    /// Element-wise comparison of the underlying matrices.
    pub fn approx_eq(&self, other: &Self, tol: f64) -> bool {
        self.matrix
            .to_array()
            .iter()
            .zip(other.matrix.to_array().iter())
            .all(|(a, b)| (a - b).abs() <= tol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_axes_rejects_zero_axis() {
        let err = RigidTransform::from_axes(Vec3::UNIT_X, Vec3::ZERO, Vec3::UNIT_Z).unwrap_err();
        assert!(matches!(err, GeomError::DegenerateBasis { axis: Axis::Y, .. }));
    }

    #[test]
    fn inverse_composes_to_identity() {
        let t = RigidTransform::from_position_and_rpy(Vec3::new(0.3, -1.2, 0.8), [10.0, -25.0, 140.0]);
        let id = RigidTransform::concatenate(&t, &t.inverse());
        assert!(id.approx_eq(&RigidTransform::identity(), 1e-12), "{id:?}");
    }

    #[test]
    fn rpy_extraction_matches_construction() {
        let rpy = [-90.0, 45.0, 30.0];
        let t = RigidTransform::from_position_and_rpy(Vec3::ZERO, rpy);
        let back = t.rpy_degrees();
        for i in 0..3 {
            assert!((back[i] - rpy[i]).abs() < 1e-9, "{back:?} vs {rpy:?}");
        }
    }

    #[test]
    fn relative_recovers_offset() {
        let anchor = RigidTransform::from_position_and_rpy(Vec3::new(1.0, 2.0, 3.0), [0.0, 0.0, 60.0]);
        let offset = RigidTransform::from_position_and_rpy(Vec3::new(0.2, 0.0, 0.1), [0.0, 90.0, 0.0]);
        let frame = RigidTransform::concatenate(&offset, &anchor);
        assert!(anchor.relative(&frame).approx_eq(&offset, 1e-12));
    }
}
