// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Linear algebra helpers for frame math.
//!
//! Everything is `f64`: frame offsets are hand-tuned to the millimetre and get
//! composed several layers deep, so single precision drifts visibly.

use std::f64::consts::TAU;

mod mat4;
mod vec3;

pub use mat4::Mat4;
pub use vec3::Vec3;

/// Degeneracy threshold for vector lengths.
pub const EPSILON: f64 = 1e-9;

/// Converts degrees to radians.
pub fn deg_to_rad(value: f64) -> f64 {
    value * (TAU / 360.0)
}

/// Converts radians to degrees.
pub fn rad_to_deg(value: f64) -> f64 {
    value * (360.0 / TAU)
}
