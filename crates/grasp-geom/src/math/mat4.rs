// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
use crate::math::Vec3;

/// Column‑major 4×4 affine matrix.
///
/// - Stored column‑major; the translation occupies the last column.
/// - Helper methods treat the matrix as affine (`w = 1` for points).
///
/// # Examples
/// ```
/// use grasp_geom::math::{Mat4, Vec3};
/// let t = Mat4::translation(5.0, -3.0, 2.0);
/// let p = Vec3::new(2.0, 4.0, -1.0);
/// assert_eq!(t.transform_point(&p).to_array(), [7.0, 1.0, 1.0]);
/// ```
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Mat4 {
    data: [f64; 16],
}

impl Mat4 {
    /// Returns the identity matrix.
    pub const fn identity() -> Self {
        Self {
            data: [
                1.0, 0.0, 0.0, 0.0, // col 0
                0.0, 1.0, 0.0, 0.0, // col 1
                0.0, 0.0, 1.0, 0.0, // col 2
                0.0, 0.0, 0.0, 1.0, // col 3
            ],
        }
    }

    /// Builds a translation matrix in metres.
    pub const fn translation(tx: f64, ty: f64, tz: f64) -> Self {
        Self {
            data: [
                1.0, 0.0, 0.0, 0.0, // col 0
                0.0, 1.0, 0.0, 0.0, // col 1
                0.0, 0.0, 1.0, 0.0, // col 2
                tx, ty, tz, 1.0,    // col 3 (translation)
            ],
        }
    }

    /// Builds a rotation matrix around the X axis by `angle` radians.
    #[rustfmt::skip]
    pub fn rotation_x(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        Self::new([
            1.0, 0.0, 0.0, 0.0,
            0.0, c,   s,   0.0,
            0.0, -s,  c,   0.0,
            0.0, 0.0, 0.0, 1.0,
        ])
    }

    /// Builds a rotation matrix around the Y axis by `angle` radians.
    #[rustfmt::skip]
    pub fn rotation_y(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        Self::new([
            c,   0.0, -s,  0.0,
            0.0, 1.0, 0.0, 0.0,
            s,   0.0, c,   0.0,
            0.0, 0.0, 0.0, 1.0,
        ])
    }

    /// Builds a rotation matrix around the Z axis by `angle` radians.
    #[rustfmt::skip]
    pub fn rotation_z(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        Self::new([
            c,   s,   0.0, 0.0,
            -s,  c,   0.0, 0.0,
            0.0, 0.0, 1.0, 0.0,
            0.0, 0.0, 0.0, 1.0,
        ])
    }

    /// Builds a rotation from roll, pitch and yaw in radians.
    ///
    /// Ordering: `R = R_z(yaw) * R_y(pitch) * R_x(roll)`, i.e. roll about X is
    /// applied first. This is the intrinsic Z‑Y′‑X″ convention used by the
    /// frame offsets throughout the pipeline.
    ///
    /// # Examples
    /// ```
    /// use core::f64::consts::FRAC_PI_2;
    /// use grasp_geom::math::{Mat4, Vec3};
    /// // Yaw=90°: +X maps to +Y
    /// let r = Mat4::rotation_from_rpy(0.0, 0.0, FRAC_PI_2);
    /// let v = r.transform_direction(&Vec3::UNIT_X);
    /// assert!((v.y() - 1.0).abs() < 1e-12);
    /// ```
    pub fn rotation_from_rpy(roll: f64, pitch: f64, yaw: f64) -> Self {
        Self::rotation_z(yaw)
            .multiply(&Self::rotation_y(pitch))
            .multiply(&Self::rotation_x(roll))
    }

    /// Builds an affine matrix whose first three columns are `x`, `y`, `z`
    /// and whose translation column is `origin`.
    #[rustfmt::skip]
    pub fn from_columns(x: Vec3, y: Vec3, z: Vec3, origin: Vec3) -> Self {
        let [xx, xy, xz] = x.to_array();
        let [yx, yy, yz] = y.to_array();
        let [zx, zy, zz] = z.to_array();
        let [tx, ty, tz] = origin.to_array();
        Self::new([
            xx, xy, xz, 0.0,
            yx, yy, yz, 0.0,
            zx, zy, zz, 0.0,
            tx, ty, tz, 1.0,
        ])
    }

    /// Creates a matrix from column-major array data.
    pub const fn new(data: [f64; 16]) -> Self {
        Self { data }
    }

    /// Returns the matrix as a column‑major array.
    pub fn to_array(self) -> [f64; 16] {
        self.data
    }

    /// Element at `row`, `col`.
    pub fn at(&self, row: usize, col: usize) -> f64 {
        self.data[col * 4 + row]
    }

    /// Returns the first three rows of column `col`.
    pub fn column(&self, col: usize) -> Vec3 {
        Vec3::new(self.at(0, col), self.at(1, col), self.at(2, col))
    }

    /// Multiplies the matrix with another matrix (`self * rhs`).
    ///
    /// `rhs` acts on a point first, then `self`.
    pub fn multiply(&self, rhs: &Self) -> Self {
        let mut out = [0.0; 16];
        for row in 0..4 {
            for col in 0..4 {
                let mut sum = 0.0;
                for k in 0..4 {
                    sum += self.at(row, k) * rhs.at(k, col);
                }
                out[col * 4 + row] = sum;
            }
        }
        Self::new(out)
    }

    /// Transforms a point (assumes `w = 1`, no perspective divide).
    pub fn transform_point(&self, point: &Vec3) -> Vec3 {
        self.transform_direction(point).add(&self.column(3))
    }

    /// Transforms a direction vector (ignores translation, `w = 0`).
    pub fn transform_direction(&self, direction: &Vec3) -> Vec3 {
        let x = direction.component(0);
        let y = direction.component(1);
        let z = direction.component(2);

        let nx = self.at(0, 0) * x + self.at(0, 1) * y + self.at(0, 2) * z;
        let ny = self.at(1, 0) * x + self.at(1, 1) * y + self.at(1, 2) * z;
        let nz = self.at(2, 0) * x + self.at(2, 1) * y + self.at(2, 2) * z;

        Vec3::new(nx, ny, nz)
    }
}

impl From<[f64; 16]> for Mat4 {
    fn from(value: [f64; 16]) -> Self {
        Self { data: value }
    }
}

impl core::ops::Mul for Mat4 {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self::Output {
        self.multiply(&rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::f64::consts::FRAC_PI_2;

    #[test]
    fn rpy_applies_roll_before_yaw() {
        // Roll 90° sends +Y to +Z; yaw afterwards leaves +Z alone.
        let r = Mat4::rotation_from_rpy(FRAC_PI_2, 0.0, FRAC_PI_2);
        let v = r.transform_direction(&Vec3::UNIT_Y);
        assert!(v.approx_eq(&Vec3::UNIT_Z, 1e-12), "{v:?}");
    }

    #[test]
    fn multiply_applies_rhs_first() {
        let t = Mat4::translation(1.0, 0.0, 0.0);
        let r = Mat4::rotation_z(FRAC_PI_2);
        // rotate, then translate
        let p = (t * r).transform_point(&Vec3::UNIT_X);
        assert!(p.approx_eq(&Vec3::new(1.0, 1.0, 0.0), 1e-12), "{p:?}");
    }
}
