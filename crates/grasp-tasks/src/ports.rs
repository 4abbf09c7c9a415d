// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! External collaborator contracts.
//!
//! Planners, drivers and perception are opaque services. Planning calls block
//! until an artifact is returned; commits are fire-and-forget and their effect
//! is observed through the robot's reported behavior.

use std::fmt;

use grasp_frames::{JointConfiguration, Kinematics, ObjectPose, PoseSource};
use grasp_geom::RigidTransform;
use serde::{Deserialize, Serialize};

/// Robot side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    /// Left hand / arm.
    #[default]
    Left,
    /// Right hand / arm.
    Right,
}

impl Side {
    /// The other side.
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// End-effector link for this side.
    pub fn hand_link(self) -> &'static str {
        match self {
            Self::Left => "l_hand",
            Self::Right => "r_hand",
        }
    }

    /// Base link of this side's hand, the link end-pose goals constrain.
    pub fn hand_base_link(self) -> &'static str {
        match self {
            Self::Left => "left_base_link",
            Self::Right => "right_base_link",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Left => "left",
            Self::Right => "right",
        })
    }
}

/// What produced a [`PlanArtifact`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanKind {
    /// Footstep placement plan.
    Footsteps,
    /// Whole-body walking trajectory following a footstep plan.
    Walking,
    /// End-effector or gaze trajectory.
    Manipulation,
    /// Joint-space motion to a stored posture.
    Posture,
    /// Single whole-body pose, no trajectory.
    EndPose,
}

/// Opaque result of a planning call.
///
/// Owned by the task builder once returned and never mutated; later steps
/// commit it or chain planning from its end pose.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanArtifact {
    /// Planner that produced it.
    pub kind: PlanKind,
    /// Human-readable label.
    pub label: String,
    /// Final configuration of the plan, when the planner reports one.
    pub end_pose: Option<JointConfiguration>,
}

impl PlanArtifact {
    /// Artifact with a known end pose.
    pub fn new(kind: PlanKind, label: impl Into<String>, end_pose: JointConfiguration) -> Self {
        Self {
            kind,
            label: label.into(),
            end_pose: Some(end_pose),
        }
    }
}

/// Goal handed to the manipulation planner.
#[derive(Debug, Clone, PartialEq)]
pub enum ManipGoal {
    /// Bring the hand's grasp point to `target`.
    EndEffector {
        /// Hand to move.
        side: Side,
        /// Target frame in world coordinates.
        target: RigidTransform,
        /// Keep the torso fixed during the solve.
        lock_torso: bool,
    },
    /// Solve for the hand at `target`, then blend in the arm-up pre-grasp
    /// posture so the approach starts clear of the object.
    PreGrasp {
        /// Hand to move.
        side: Side,
        /// Grasp frame in world coordinates.
        target: RigidTransform,
    },
    /// Move one arm to a stored posture, merged into the start pose.
    Posture {
        /// Posture database group.
        group: String,
        /// Posture name within the group.
        name: String,
        /// Arm the posture applies to.
        side: Side,
    },
    /// Keep the hand aimed at `target` while reaching it.
    Gaze {
        /// Hand to move.
        side: Side,
        /// Target frame in world coordinates.
        target: RigidTransform,
    },
    /// Solve one whole-body pose with the hand base link at `target`.
    EndPose {
        /// Hand whose base link is constrained.
        side: Side,
        /// Target frame in world coordinates.
        target: RigidTransform,
    },
    /// Return to the nominal standing posture.
    Nominal,
}

/// Robot-reported behavior mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Behavior {
    /// Joints locked.
    Freeze,
    /// Balanced stand.
    Stand,
    /// Executing a footstep plan.
    Step,
    /// Dynamic walking.
    Walk,
    /// Whole-body manipulation mode.
    Manip,
    /// User-level joint control.
    User,
}

impl fmt::Display for Behavior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Freeze => "freeze",
            Self::Stand => "stand",
            Self::Step => "step",
            Self::Walk => "walk",
            Self::Manip => "manip",
            Self::User => "user",
        })
    }
}

/// Footstep planning service.
pub trait FootstepPlanner: Send {
    /// Plans footsteps from `start` to the stance `goal`.
    fn plan_footsteps(
        &mut self,
        start: &JointConfiguration,
        goal: &RigidTransform,
    ) -> anyhow::Result<PlanArtifact>;

    /// Turns a footstep plan into a walking trajectory.
    fn plan_walking(
        &mut self,
        footsteps: &PlanArtifact,
        start: &JointConfiguration,
    ) -> anyhow::Result<PlanArtifact>;

    /// Sends the footstep plan to the robot.
    fn commit(&mut self, footsteps: &PlanArtifact) -> anyhow::Result<()>;
}

/// Manipulation / posture planning service.
pub trait ManipPlanner: Send {
    /// Plans from `start` towards `goal`.
    fn plan(&mut self, start: &JointConfiguration, goal: &ManipGoal)
        -> anyhow::Result<PlanArtifact>;

    /// Sends the plan to the robot.
    fn commit(&mut self, plan: &PlanArtifact) -> anyhow::Result<()>;
}

/// Whole-robot behavior driver.
pub trait RobotDriver: Send {
    /// Requests the stand behavior.
    fn send_stand(&mut self) -> anyhow::Result<()>;
    /// Requests the manipulation behavior.
    fn send_manip(&mut self) -> anyhow::Result<()>;
    /// Selects whether plans use the controller's own pelvis height.
    fn send_plan_with_height_mode(&mut self, controller_height: bool) -> anyhow::Result<()>;
    /// Commands pelvis height in metres.
    fn send_pelvis_height(&mut self, height: f64) -> anyhow::Result<()>;
    /// Current reported behavior, if known. Must not block.
    fn current_behavior(&self) -> Option<Behavior>;
}

/// Gripper driver for the grasping hand.
pub trait HandDriver: Send {
    /// Opens the hand.
    fn open(&mut self) -> anyhow::Result<()>;
    /// Closes the hand with `strength` (percent of maximum force).
    fn close(&mut self, strength: u8) -> anyhow::Result<()>;
}

/// Sensor head with a pitch joint and a spinning lidar.
pub trait SensorHead: Send {
    /// Commands neck pitch in degrees (positive looks down).
    fn set_neck_pitch(&mut self, degrees: f64) -> anyhow::Result<()>;
    /// Number of completed lidar revolutions shown so far.
    fn revolution(&self) -> u64;
}

/// Object detection and model fitting.
pub trait ObjectFitter: Send {
    /// Fits the object model to the latest sensor data.
    fn fit(&mut self) -> anyhow::Result<ObjectPose>;
}

/// Every collaborator the drill scenario needs, passed in explicitly.
pub struct Collaborators {
    /// Estimated robot state.
    pub pose: Box<dyn PoseSource>,
    /// Forward kinematics.
    pub kinematics: Box<dyn Kinematics>,
    /// Footstep planner.
    pub footsteps: Box<dyn FootstepPlanner>,
    /// Manipulation planner.
    pub manip: Box<dyn ManipPlanner>,
    /// Behavior driver.
    pub robot: Box<dyn RobotDriver>,
    /// Grasping-hand driver.
    pub hand: Box<dyn HandDriver>,
    /// Sensor head.
    pub sensor: Box<dyn SensorHead>,
    /// Object fitting.
    pub fitter: Box<dyn ObjectFitter>,
}
