// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

#![allow(missing_docs)]
//! Scenario configuration persisted through the config service.

use grasp_config::{ConfigError, ConfigFormat, ConfigService};
use grasp_dry_tests::InMemoryConfigStore;
use grasp_frames::GraspStyle;
use grasp_tasks::{ScenarioConfig, Side};

#[test]
fn saved_scenario_loads_back_unchanged() {
    let store = InMemoryConfigStore::new();
    let service = ConfigService::new(store.clone());
    let mut cfg = ScenarioConfig {
        grasping_hand: Side::Right,
        close_strength: 80,
        crouch_before_pre_grasp: true,
        ..ScenarioConfig::default()
    };
    cfg.offsets.grasp_style = GraspStyle::Rotary;
    cfg.dwell.hand_close = 1.5;

    service.save(ScenarioConfig::KEY, &cfg).unwrap();
    let back: Option<ScenarioConfig> = service.load(ScenarioConfig::KEY).unwrap();
    assert_eq!(back, Some(cfg));
    assert_eq!(store.keys(), vec![ScenarioConfig::KEY.to_owned()]);
}

#[test]
fn partial_json_fills_in_defaults() {
    let store = InMemoryConfigStore::with_entry(
        ScenarioConfig::KEY,
        r#"{ "tick_ms": 20, "grasping_hand": "right", "neck_pitch": { "look_down": 35.0 } }"#,
    );
    let service = ConfigService::new(store);
    let cfg: ScenarioConfig = service.load_or_default(ScenarioConfig::KEY).unwrap();

    assert_eq!(cfg.tick_ms, 20);
    assert_eq!(cfg.grasping_hand, Side::Right);
    assert!((cfg.neck_pitch.look_down - 35.0).abs() < f64::EPSILON);
    assert!((cfg.neck_pitch.look_forward - 15.0).abs() < f64::EPSILON);
    assert_eq!(cfg.offsets, ScenarioConfig::default().offsets);
    assert!(cfg.prompts_enabled);
}

#[test]
fn missing_scenario_uses_defaults() {
    let service = ConfigService::new(InMemoryConfigStore::new());
    let cfg: ScenarioConfig = service.load_or_default(ScenarioConfig::KEY).unwrap();
    assert_eq!(cfg, ScenarioConfig::default());
}

#[test]
fn store_failures_surface() {
    let store = InMemoryConfigStore::new();
    store.fail_loads(true);
    let service = ConfigService::new(store.clone());
    let err = service
        .load_or_default::<ScenarioConfig>(ScenarioConfig::KEY)
        .unwrap_err();
    assert!(matches!(err, ConfigError::Other(_)));
    assert_eq!(store.loads(), 1);
}

#[test]
fn malformed_scenario_is_a_serde_error() {
    let store = InMemoryConfigStore::with_entry(ScenarioConfig::KEY, r#"{ "tick_ms": "fast" }"#);
    let service = ConfigService::new(store);
    let err = service.load::<ScenarioConfig>(ScenarioConfig::KEY).unwrap_err();
    assert!(matches!(err, ConfigError::Json(_)));
}

#[test]
fn checked_load_rejects_unusable_dwells_and_tick() {
    let store = InMemoryConfigStore::with_entry(
        ScenarioConfig::KEY,
        r#"{ "tick_ms": 0, "dwell": { "crouch": -2.0 } }"#,
    );
    let service = ConfigService::new(store);
    match service.load_checked::<ScenarioConfig>(ScenarioConfig::KEY) {
        Err(ConfigError::Invalid { key, problems }) => {
            assert_eq!(key, ScenarioConfig::KEY);
            assert_eq!(
                problems,
                vec![
                    "tick_ms must be at least 1".to_owned(),
                    "dwell.crouch: -2 is not a duration in seconds".to_owned(),
                ]
            );
        }
        other => panic!("expected rejection, got {other:?}"),
    }
}

#[test]
fn checked_load_accepts_a_yaml_scenario() {
    let scenario = ScenarioConfig {
        grasping_hand: Side::Right,
        tick_ms: 10,
        ..ScenarioConfig::default()
    };
    let store = InMemoryConfigStore::with_scenario(&scenario, ConfigFormat::Yaml).unwrap();
    let service = ConfigService::new(store.clone());

    let back: ScenarioConfig = service.load_checked(ScenarioConfig::KEY).unwrap();
    assert_eq!(back, scenario);
    assert!(store
        .text(ScenarioConfig::KEY)
        .unwrap()
        .contains("grasping_hand: right\n"));
}

#[test]
fn missing_scenario_passes_the_check_with_defaults() {
    let service = ConfigService::new(InMemoryConfigStore::new());
    let cfg: ScenarioConfig = service.load_checked(ScenarioConfig::KEY).unwrap();
    assert_eq!(cfg, ScenarioConfig::default());
}
