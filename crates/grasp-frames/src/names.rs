// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Well-known frame and group names.

/// Presentation parent of every object-derived frame.
pub const OBJECT: &str = "drill";
/// Sensed or spawned object frame.
pub const OBJECT_FRAME: &str = "drill frame";
/// Hand target on the object.
pub const GRASP_FRAME: &str = "grasp frame";
/// Snapshot of the first grasp solution, kept hidden.
pub const SAMPLE_GRASP_FRAME: &str = "sample grasp frame 0";
/// Where the robot stands to reach the grasp.
pub const STANCE_FRAME: &str = "grasp stance";
/// Tool tip.
pub const TIP_FRAME: &str = "drill tip frame";
/// Power button.
pub const BUTTON_FRAME: &str = "drill button";
/// Group of frames rigidly attached to the object.
pub const OBJECT_GROUP: &str = "drill sync";
