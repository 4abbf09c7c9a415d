// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

#![allow(missing_docs)]
//! Filesystem store behaviour in a scratch directory.

use std::path::Path;

use grasp_config::{
    load_file, ConfigError, ConfigFormat, ConfigService, ConfigStore, FsConfigStore, Validate,
};
use serde::Deserialize;
use serde_json::json;

#[derive(Debug, Deserialize)]
struct Settle {
    seconds: f64,
}

impl Validate for Settle {
    fn problems(&self) -> Vec<String> {
        if self.seconds.is_finite() && self.seconds >= 0.0 {
            Vec::new()
        } else {
            vec![format!("seconds: {} is not a duration", self.seconds)]
        }
    }
}

fn write(dir: &Path, name: &str, text: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, text).unwrap();
    path
}

#[test]
fn missing_file_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let store = FsConfigStore::with_root(dir.path());
    assert!(matches!(store.load_raw("scenario"), Err(ConfigError::NotFound)));
}

#[test]
fn values_land_in_key_named_json_files() {
    let dir = tempfile::tempdir().unwrap();
    let service = ConfigService::new(FsConfigStore::with_root(dir.path()));
    let value = json!({ "tick_ms": 50, "prompts": { "enabled": true } });
    service.save("scenario", &value).unwrap();

    let path = dir.path().join("scenario.json");
    assert_eq!(service.store().path_for("scenario"), path);
    let text = std::fs::read_to_string(path).unwrap();
    assert!(text.contains("\n  \"tick_ms\": 50"));
    assert_eq!(
        service.load::<serde_json::Value>("scenario").unwrap(),
        Some(value)
    );
}

#[test]
fn yaml_store_writes_yaml_files() {
    let dir = tempfile::tempdir().unwrap();
    let store = FsConfigStore::with_root(dir.path()).with_format(ConfigFormat::Yaml);
    let service = ConfigService::new(store);
    service.save("scenario", &json!({ "tick_ms": 20 })).unwrap();

    let text = std::fs::read_to_string(dir.path().join("scenario.yaml")).unwrap();
    assert_eq!(text, "tick_ms: 20\n");
    assert!(!dir.path().join("scenario.json").exists());
}

#[test]
fn reading_never_creates_the_directory() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("a").join("b");
    let service = ConfigService::new(FsConfigStore::with_root(&nested));
    assert_eq!(service.store().base(), nested.as_path());

    assert!(service.load::<serde_json::Value>("scenario").unwrap().is_none());
    assert!(!nested.exists());

    service.save("scenario", &json!({})).unwrap();
    assert!(nested.join("scenario.json").is_file());
}

#[test]
fn standalone_file_format_follows_its_extension() {
    let dir = tempfile::tempdir().unwrap();
    let yaml = write(dir.path(), "settle.yml", "seconds: 1.5\n");
    let json = write(dir.path(), "settle.json", r#"{ "seconds": 2.0 }"#);

    assert!((load_file::<Settle>(&yaml).unwrap().seconds - 1.5).abs() < f64::EPSILON);
    assert!((load_file::<Settle>(&json).unwrap().seconds - 2.0).abs() < f64::EPSILON);

    let toml = write(dir.path(), "settle.toml", "seconds = 1");
    assert!(matches!(load_file::<Settle>(&toml), Err(ConfigError::UnsupportedFormat(_))));
}

#[test]
fn standalone_file_is_validated() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "settle.yaml", "seconds: -3\n");
    match load_file::<Settle>(&path) {
        Err(ConfigError::Invalid { key, problems }) => {
            assert!(key.ends_with("settle.yaml"));
            assert_eq!(problems, vec!["seconds: -3 is not a duration".to_owned()]);
        }
        other => panic!("expected rejection, got {other:?}"),
    }
    assert!(matches!(
        load_file::<Settle>(&dir.path().join("absent.yaml")),
        Err(ConfigError::Io(_))
    ));
}
