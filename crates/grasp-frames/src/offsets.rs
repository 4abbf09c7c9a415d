// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

use grasp_geom::{RigidTransform, Vec3};
use serde::{Deserialize, Serialize};

/// A local offset: position in metres plus roll/pitch/yaw in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Offset {
    /// Position relative to the anchor frame.
    pub position: [f64; 3],
    /// Roll, pitch, yaw in degrees.
    pub rpy_degrees: [f64; 3],
}

impl Offset {
    /// Builds an offset from raw arrays.
    pub const fn new(position: [f64; 3], rpy_degrees: [f64; 3]) -> Self {
        Self {
            position,
            rpy_degrees,
        }
    }

    /// The offset as a transform, ready to concatenate onto an anchor.
    pub fn to_transform(&self) -> RigidTransform {
        RigidTransform::from_position_and_rpy(Vec3::from(self.position), self.rpy_degrees)
    }
}

/// Which side of the object the hand approaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GraspStyle {
    /// Wrap the palm around the barrel.
    #[default]
    Barrel,
    /// Grip the rotary section from the side.
    Rotary,
}

/// Forward-kinematics link names the ground frame is built from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BodyLinks {
    /// Left foot link.
    pub left_foot: String,
    /// Right foot link.
    pub right_foot: String,
    /// Pelvis link; its x axis defines "forward".
    pub pelvis: String,
}

impl Default for BodyLinks {
    fn default() -> Self {
        Self {
            left_foot: "l_foot".into(),
            right_foot: "r_foot".into(),
            pelvis: "pelvis".into(),
        }
    }
}

/// Scenario-specific geometry that frame synthesis is parameterized by.
///
/// No `Default`: values are tuned per robot and per object and come from the
/// scenario configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameOffsets {
    /// Height of the foot link above the sole, in metres.
    pub foot_height: f64,
    /// Object frame relative to the ground frame when spawned without sensing.
    pub object_spawn: Offset,
    /// Grasp style used by `compute_grasp_frame`.
    #[serde(default)]
    pub grasp_style: GraspStyle,
    /// Grasp frame relative to the object for [`GraspStyle::Barrel`].
    pub grasp_barrel: Offset,
    /// Grasp frame relative to the object for [`GraspStyle::Rotary`].
    pub grasp_rotary: Offset,
    /// Stance frame relative to the ground-projected grasp frame.
    pub stance: Offset,
    /// Tool tip relative to the object.
    pub tip: Offset,
    /// Link names used for the ground frame.
    #[serde(default)]
    pub links: BodyLinks,
}

impl FrameOffsets {
    /// Grasp offset for the configured style.
    pub fn grasp(&self) -> &Offset {
        match self.grasp_style {
            GraspStyle::Barrel => &self.grasp_barrel,
            GraspStyle::Rotary => &self.grasp_rotary,
        }
    }
}
