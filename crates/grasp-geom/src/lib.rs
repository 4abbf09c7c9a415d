// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![doc = r"Geometry primitives for the grasp task pipeline.

This crate provides:
- `f64` vector and column-major matrix helpers (`math`).
- Rigid transforms (`RigidTransform`) built from axis triples,
  position + roll/pitch/yaw, and concatenation.

Design notes:
- Pure and stateless: every constructor is a function of its inputs.
- Transforms are values; composition produces new transforms.
- Frames are always built in local coordinates and then concatenated onto
  their anchor. `RigidTransform::concatenate(&local, &reference)` applies
  `reference` after `local`.
"]

/// Vector and matrix helpers.
pub mod math;
/// Rigid transforms and their constructors.
pub mod transform;

pub use math::{Mat4, Vec3};
pub use transform::{Axis, GeomError, RigidTransform};
