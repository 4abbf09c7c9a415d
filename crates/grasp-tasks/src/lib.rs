// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Grasp Tasks
//!
//! The drill grasp scenario:
//! - collaborator ports (planners, drivers, perception)
//! - scenario configuration
//! - the [`DrillDemo`] step context and its scripted sequences

pub mod config;
mod demo;
pub mod ports;
mod sequences;

pub use config::{Dwells, NeckPitch, PelvisHeights, ScenarioConfig};
pub use demo::{DemoError, DrillDemo, PlanSlot};
pub use ports::{
    Behavior, Collaborators, FootstepPlanner, HandDriver, ManipGoal, ManipPlanner, ObjectFitter,
    PlanArtifact, PlanKind, RobotDriver, SensorHead, Side,
};
