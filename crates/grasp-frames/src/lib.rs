// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Task frame synthesis for grasp scenarios.
//!
//! [`FrameSynthesis`] turns a joint configuration (through a [`Kinematics`]
//! port) and a sensed [`ObjectPose`] into the named frames planners consume.
//! Derived frames live in a [`FrameStore`]; frames that must move together
//! share a [`FrameGroup`].

mod error;
mod frame;
mod group;
pub mod names;
mod offsets;
mod ports;
mod store;
mod synth;

pub use error::FrameError;
pub use frame::NamedFrame;
pub use group::FrameGroup;
pub use offsets::{BodyLinks, FrameOffsets, GraspStyle, Offset};
pub use ports::{ButtonGeometry, JointConfiguration, Kinematics, ObjectPose, PoseSource};
pub use store::FrameStore;
pub use synth::FrameSynthesis;
