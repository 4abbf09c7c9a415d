// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::ConfigFormat;

/// Where config blobs live. Stores move bytes; [`ConfigService`] parses them.
pub trait ConfigStore {
    /// Bytes stored under `key`, or [`ConfigError::NotFound`].
    fn load_raw(&self, key: &str) -> Result<Vec<u8>, ConfigError>;
    /// Replaces whatever is stored under `key`.
    fn save_raw(&self, key: &str, data: &[u8]) -> Result<(), ConfigError>;
    /// Encoding of the blobs this store holds.
    fn format(&self) -> ConfigFormat {
        ConfigFormat::Json
    }
}

/// Sanity checks a config value runs after it is parsed.
pub trait Validate {
    /// Every problem found, empty when the value is usable.
    fn problems(&self) -> Vec<String>;
}

/// Why a config could not be loaded or stored.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Nothing stored under the key.
    #[error("not found")]
    NotFound,
    /// Reading or writing the backing file failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// Malformed or mistyped JSON.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    /// Malformed or mistyped YAML.
    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    /// File extension names no known format.
    #[error("unsupported config format: {0}")]
    UnsupportedFormat(String),
    /// Parsed, but the values are unusable.
    #[error("invalid {key}: {}", .problems.join("; "))]
    Invalid {
        /// Key or file the value came from.
        key: String,
        /// What is wrong with it.
        problems: Vec<String>,
    },
    /// Anything else, e.g. no resolvable config directory.
    #[error("other: {0}")]
    Other(String),
}

/// Fails with [`ConfigError::Invalid`] if `value` reports any problem.
pub fn check<T: Validate>(key: &str, value: &T) -> Result<(), ConfigError> {
    let problems = value.problems();
    if problems.is_empty() {
        return Ok(());
    }
    warn!(key, ?problems, "config rejected");
    Err(ConfigError::Invalid {
        key: key.to_owned(),
        problems,
    })
}

/// Typed load and save on top of a [`ConfigStore`], in the store's format.
pub struct ConfigService<S> {
    store: S,
}

impl<S> ConfigService<S> {
    /// Wraps `store`.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// The wrapped store.
    pub fn store(&self) -> &S {
        &self.store
    }
}

impl<S: ConfigStore> ConfigService<S> {
    /// Value stored under `key`; `Ok(None)` if missing or empty.
    pub fn load<T>(&self, key: &str) -> Result<Option<T>, ConfigError>
    where
        T: DeserializeOwned,
    {
        let bytes = match self.store.load_raw(key) {
            Ok(bytes) => bytes,
            Err(ConfigError::NotFound) => {
                debug!(key, "no stored config");
                return Ok(None);
            }
            Err(e) => return Err(e),
        };
        if bytes.is_empty() {
            return Ok(None);
        }
        let format = self.store.format();
        debug!(key, %format, len = bytes.len(), "config loaded");
        format.decode(&bytes).map(Some)
    }

    /// Value stored under `key`, or `T::default()` when missing.
    pub fn load_or_default<T>(&self, key: &str) -> Result<T, ConfigError>
    where
        T: DeserializeOwned + Default,
    {
        Ok(self.load(key)?.unwrap_or_default())
    }

    /// Like [`ConfigService::load_or_default`], then rejects unusable values.
    pub fn load_checked<T>(&self, key: &str) -> Result<T, ConfigError>
    where
        T: DeserializeOwned + Default + Validate,
    {
        let value = self.load_or_default(key)?;
        check(key, &value)?;
        Ok(value)
    }

    /// Stores `value` under `key` in the store's format.
    pub fn save<T>(&self, key: &str, value: &T) -> Result<(), ConfigError>
    where
        T: Serialize,
    {
        let data = self.store.format().encode(value)?;
        self.store.save_raw(key, &data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::cell::RefCell;
    use std::collections::HashMap;

    #[derive(Default)]
    struct MapStore {
        blobs: RefCell<HashMap<String, Vec<u8>>>,
        format: ConfigFormat,
    }

    impl ConfigStore for MapStore {
        fn load_raw(&self, key: &str) -> Result<Vec<u8>, ConfigError> {
            self.blobs.borrow().get(key).cloned().ok_or(ConfigError::NotFound)
        }

        fn save_raw(&self, key: &str, data: &[u8]) -> Result<(), ConfigError> {
            self.blobs.borrow_mut().insert(key.to_owned(), data.to_vec());
            Ok(())
        }

        fn format(&self) -> ConfigFormat {
            self.format
        }
    }

    #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
    #[serde(default)]
    struct Pacing {
        tick_ms: u64,
        settle: f64,
    }

    impl Validate for Pacing {
        fn problems(&self) -> Vec<String> {
            let mut out = Vec::new();
            if self.tick_ms == 0 {
                out.push("tick_ms must be positive".to_owned());
            }
            let usable = self.settle.is_finite() && self.settle >= 0.0;
            if !usable {
                out.push(format!("settle {} is not a duration", self.settle));
            }
            out
        }
    }

    #[test]
    fn missing_and_empty_keys_load_as_none() {
        let service = ConfigService::new(MapStore::default());
        assert!(service.load::<Pacing>("absent").unwrap().is_none());
        service.store().save_raw("blank", b"").unwrap();
        assert!(service.load::<Pacing>("blank").unwrap().is_none());
        assert_eq!(service.load_or_default::<Pacing>("absent").unwrap(), Pacing::default());
    }

    #[test]
    fn store_format_decides_the_encoding() {
        let json = ConfigService::new(MapStore::default());
        let yaml = ConfigService::new(MapStore {
            format: ConfigFormat::Yaml,
            ..MapStore::default()
        });
        let pacing = Pacing {
            tick_ms: 20,
            settle: 1.5,
        };
        json.save("pacing", &pacing).unwrap();
        yaml.save("pacing", &pacing).unwrap();

        let raw = json.store().load_raw("pacing").unwrap();
        assert!(raw.starts_with(b"{\n"));
        let raw = yaml.store().load_raw("pacing").unwrap();
        assert_eq!(raw, b"tick_ms: 20\nsettle: 1.5\n");
        assert_eq!(yaml.load::<Pacing>("pacing").unwrap(), Some(pacing));
    }

    #[test]
    fn checked_load_lists_every_problem() {
        let service = ConfigService::new(MapStore::default());
        service
            .store()
            .save_raw("pacing", br#"{ "tick_ms": 0, "settle": -2.0 }"#)
            .unwrap();
        match service.load_checked::<Pacing>("pacing") {
            Err(ConfigError::Invalid { key, problems }) => {
                assert_eq!(key, "pacing");
                assert_eq!(problems.len(), 2);
            }
            other => panic!("expected rejection, got {other:?}"),
        }

        service.save("pacing", &Pacing { tick_ms: 5, settle: 0.0 }).unwrap();
        assert_eq!(service.load_checked::<Pacing>("pacing").unwrap().tick_ms, 5);
    }

    #[test]
    fn malformed_value_is_a_parse_error() {
        let service = ConfigService::new(MapStore::default());
        service.store().save_raw("pacing", b"{ not json").unwrap();
        assert!(matches!(service.load::<Pacing>("pacing"), Err(ConfigError::Json(_))));
    }
}
