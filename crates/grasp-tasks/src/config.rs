// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Scenario tuning.

use std::time::Duration;

use grasp_config::Validate;
use grasp_frames::{BodyLinks, FrameOffsets, GraspStyle, Offset};
use grasp_sched::ConfirmPolicy;
use serde::{Deserialize, Serialize};

use crate::Side;

/// Neck pitch targets in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NeckPitch {
    /// Looking down at the workspace.
    pub look_down: f64,
    /// Looking ahead for walking and fitting.
    pub look_forward: f64,
}

impl Default for NeckPitch {
    fn default() -> Self {
        Self {
            look_down: 40.0,
            look_forward: 15.0,
        }
    }
}

/// Pelvis height targets in metres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PelvisHeights {
    /// Crouched for low reaches.
    pub crouch: f64,
    /// Normal standing height.
    pub stand: f64,
}

impl Default for PelvisHeights {
    fn default() -> Self {
        Self {
            crouch: 0.7,
            stand: 0.8,
        }
    }
}

/// Settle times in seconds after each command.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Dwells {
    /// After a neck pitch command.
    pub neck: f64,
    /// After switching to manipulation mode.
    pub manip_mode: f64,
    /// After committing the pre-grasp plan.
    pub pre_grasp_commit: f64,
    /// After committing the grasp plan.
    pub grasp_commit: f64,
    /// After committing the refined grasp plan.
    pub refine_commit: f64,
    /// After closing the hand.
    pub hand_close: f64,
    /// After crouching.
    pub crouch: f64,
    /// After the final stand command.
    pub stand: f64,
}

impl Default for Dwells {
    fn default() -> Self {
        Self {
            neck: 1.0,
            manip_mode: 1.0,
            pre_grasp_commit: 10.0,
            grasp_commit: 10.0,
            refine_commit: 3.0,
            hand_close: 3.0,
            crouch: 3.0,
            stand: 5.0,
        }
    }
}

/// Converts a configured dwell to a `Duration`.
///
/// Negative or NaN becomes zero; anything too long to represent, infinity
/// included, waits forever.
pub fn seconds(value: f64) -> Duration {
    if value.is_nan() || value <= 0.0 {
        return Duration::ZERO;
    }
    Duration::try_from_secs_f64(value).unwrap_or(Duration::MAX)
}

/// Everything the drill scenario is parameterized by.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioConfig {
    /// Frame synthesis offsets.
    pub offsets: FrameOffsets,
    /// Hand that grasps the object; the other one points.
    pub grasping_hand: Side,
    /// Neck pitch targets.
    pub neck_pitch: NeckPitch,
    /// Pelvis height targets.
    pub pelvis: PelvisHeights,
    /// Hand close strength, percent.
    pub close_strength: u8,
    /// Fresh lidar revolutions to wait for before fitting.
    pub clean_sweeps: u64,
    /// Settle times.
    pub dwell: Dwells,
    /// Ask the operator before irreversible phases.
    pub prompts_enabled: bool,
    /// Answer accepted by confirmation prompts.
    pub accept_token: String,
    /// Plan from the estimated robot state rather than the previous plan's end.
    pub plan_from_current_state: bool,
    /// Crouch before planning the pre-grasp.
    pub crouch_before_pre_grasp: bool,
    /// Sequencer cycle in milliseconds.
    pub tick_ms: u64,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            offsets: FrameOffsets {
                foot_height: 0.0811,
                object_spawn: Offset::new([0.65, 0.4, 0.9], [1.0, 1.0, 1.0]),
                grasp_style: GraspStyle::Barrel,
                grasp_barrel: Offset::new([-0.04, 0.0, 0.01], [0.0, 90.0, -90.0]),
                grasp_rotary: Offset::new([0.0, -0.18, 0.0], [-90.0, 90.0, 0.0]),
                stance: Offset::new([-0.67, -0.4, 0.0], [0.0, 0.0, 0.0]),
                tip: Offset::new([0.18, 0.0, 0.13], [0.0, 0.0, 0.0]),
                links: BodyLinks::default(),
            },
            grasping_hand: Side::Left,
            neck_pitch: NeckPitch::default(),
            pelvis: PelvisHeights::default(),
            close_strength: 60,
            clean_sweeps: 2,
            dwell: Dwells::default(),
            prompts_enabled: true,
            accept_token: "y".into(),
            plan_from_current_state: true,
            crouch_before_pre_grasp: false,
            tick_ms: 50,
        }
    }
}

impl ScenarioConfig {
    /// Key under which the scenario is stored in a config store.
    pub const KEY: &'static str = "scenario";

    /// Confirmation policy for the sequencer.
    pub fn confirm_policy(&self) -> ConfirmPolicy {
        ConfirmPolicy {
            enabled: self.prompts_enabled,
            accept_token: self.accept_token.clone(),
        }
    }

    /// Sequencer cycle.
    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms.max(1))
    }

}

impl Dwells {
    /// Every dwell with its field name.
    pub fn named(&self) -> [(&'static str, f64); 8] {
        [
            ("neck", self.neck),
            ("manip_mode", self.manip_mode),
            ("pre_grasp_commit", self.pre_grasp_commit),
            ("grasp_commit", self.grasp_commit),
            ("refine_commit", self.refine_commit),
            ("hand_close", self.hand_close),
            ("crouch", self.crouch),
            ("stand", self.stand),
        ]
    }
}

impl Validate for ScenarioConfig {
    fn problems(&self) -> Vec<String> {
        let mut out = Vec::new();
        if self.tick_ms == 0 {
            out.push("tick_ms must be at least 1".to_owned());
        }
        for (name, value) in self.dwell.named() {
            let usable = value.is_finite() && value >= 0.0;
            if !usable {
                out.push(format!("dwell.{name}: {value} is not a duration in seconds"));
            }
        }
        if self.close_strength > 100 {
            out.push(format!("close_strength: {} exceeds 100 percent", self.close_strength));
        }
        let pitches = [self.neck_pitch.look_down, self.neck_pitch.look_forward];
        if pitches.iter().any(|p| !p.is_finite()) {
            out.push("neck_pitch must be finite".to_owned());
        }
        let PelvisHeights { crouch, stand } = self.pelvis;
        let ordered = crouch.is_finite() && stand.is_finite() && 0.0 < crouch && crouch <= stand;
        if !ordered {
            out.push(format!("pelvis: need 0 < crouch <= stand, got {crouch} and {stand}"));
        }
        if !self.offsets.foot_height.is_finite() {
            out.push("offsets.foot_height must be finite".to_owned());
        }
        if self.prompts_enabled && self.accept_token.trim().is_empty() {
            out.push("accept_token is empty while prompts are enabled".to_owned());
        }
        out
    }
}
