// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Collaborator ports consumed by frame synthesis.

use grasp_geom::{RigidTransform, Vec3};
use serde::{Deserialize, Serialize};

use crate::FrameError;

/// Robot joint positions, opaque to everything except the kinematics port.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct JointConfiguration {
    /// Joint positions in the robot's canonical joint order.
    pub positions: Vec<f64>,
}

impl JointConfiguration {
    /// Wraps raw joint positions.
    pub fn new(positions: Vec<f64>) -> Self {
        Self { positions }
    }
}

/// Supplies the robot's current (estimated) configuration.
pub trait PoseSource: Send {
    /// Most recent estimated configuration; must not block.
    fn current_pose(&self) -> JointConfiguration;
}

/// Forward kinematics.
pub trait Kinematics: Send {
    /// World pose of `link` at `pose`.
    fn link_frame(
        &self,
        pose: &JointConfiguration,
        link: &str,
    ) -> Result<RigidTransform, FrameError>;
}

/// Button location on the object, in object coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ButtonGeometry {
    /// Button centre.
    pub position: Vec3,
    /// Outward surface normal.
    pub normal: Vec3,
}

/// Result of the object fitting service.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObjectPose {
    /// Object frame in world coordinates.
    pub transform: RigidTransform,
    /// Button geometry, when the fitted model has one.
    pub button: Option<ButtonGeometry>,
}

impl ObjectPose {
    /// Object pose without button geometry.
    pub fn new(transform: RigidTransform) -> Self {
        Self {
            transform,
            button: None,
        }
    }

    /// Attaches button geometry.
    pub fn with_button(mut self, position: Vec3, normal: Vec3) -> Self {
        self.button = Some(ButtonGeometry { position, normal });
        self
    }
}
