// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Shared test doubles and fixtures for grasp crates.
#![forbid(unsafe_code)]
//!
//! # Modules
//!
//! - [`config`] - In-memory config store fake for testing without filesystem
//! - [`rig`] - Simulated robot implementing every scenario collaborator port

pub mod config;
pub mod rig;

pub use config::InMemoryConfigStore;
pub use rig::{Command, SimRig, SIM_FOOT_HEIGHT, SIM_HALF_STANCE, SIM_PELVIS_HEIGHT};

/// Scenario config tuned for tests: no prompts, zero dwells, fast ticks.
pub fn quick_scenario() -> grasp_tasks::ScenarioConfig {
    let mut config = grasp_tasks::ScenarioConfig {
        prompts_enabled: false,
        tick_ms: 1,
        ..grasp_tasks::ScenarioConfig::default()
    };
    config.dwell = grasp_tasks::Dwells {
        neck: 0.0,
        manip_mode: 0.0,
        pre_grasp_commit: 0.0,
        grasp_commit: 0.0,
        refine_commit: 0.0,
        hand_close: 0.0,
        crouch: 0.0,
        stand: 0.0,
    };
    config
}
