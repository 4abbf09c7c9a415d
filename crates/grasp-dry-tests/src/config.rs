// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Config store kept in memory, for scenario tests that must not touch disk.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use grasp_config::{ConfigError, ConfigFormat, ConfigStore};
use grasp_tasks::ScenarioConfig;

/// In-memory [`ConfigStore`] that counts traffic and can be told to fail.
///
/// Clones share state, so a test can keep one handle while the service owns
/// another.
///
/// # Example
///
/// ```
/// use grasp_config::{ConfigFormat, ConfigService};
/// use grasp_dry_tests::InMemoryConfigStore;
/// use grasp_tasks::ScenarioConfig;
///
/// let store = InMemoryConfigStore::new().with_format(ConfigFormat::Yaml);
/// let service = ConfigService::new(store.clone());
///
/// service.save(ScenarioConfig::KEY, &serde_json::json!({"tick_ms": 20})).unwrap();
/// assert_eq!(store.text(ScenarioConfig::KEY).as_deref(), Some("tick_ms: 20\n"));
/// assert_eq!((store.loads(), store.saves()), (0, 1));
/// ```
#[derive(Clone, Default)]
pub struct InMemoryConfigStore {
    shared: Arc<Mutex<Shelf>>,
    format: ConfigFormat,
}

#[derive(Default)]
struct Shelf {
    entries: BTreeMap<String, Vec<u8>>,
    loads: usize,
    saves: usize,
    failing_loads: bool,
    failing_saves: bool,
}

impl InMemoryConfigStore {
    /// Empty JSON store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store holding `text` under `key`, as if hand-written.
    pub fn with_entry(key: &str, text: &str) -> Self {
        let store = Self::new();
        store.shelf().entries.insert(key.to_owned(), text.as_bytes().to_vec());
        store
    }

    /// Store already holding `scenario`, encoded in `format`.
    pub fn with_scenario(
        scenario: &ScenarioConfig,
        format: ConfigFormat,
    ) -> Result<Self, ConfigError> {
        let store = Self::new().with_format(format);
        let bytes = format.encode(scenario)?;
        store.shelf().entries.insert(ScenarioConfig::KEY.to_owned(), bytes);
        Ok(store)
    }

    /// Reports `format` to the service.
    #[must_use]
    pub fn with_format(mut self, format: ConfigFormat) -> Self {
        self.format = format;
        self
    }

    /// While on, every load fails with [`ConfigError::Other`].
    pub fn fail_loads(&self, on: bool) {
        self.shelf().failing_loads = on;
    }

    /// While on, every save fails with [`ConfigError::Other`] and stores nothing.
    pub fn fail_saves(&self, on: bool) {
        self.shelf().failing_saves = on;
    }

    /// Loads attempted, failed ones included.
    pub fn loads(&self) -> usize {
        self.shelf().loads
    }

    /// Saves attempted, failed ones included.
    pub fn saves(&self) -> usize {
        self.shelf().saves
    }

    /// Keys present, sorted.
    pub fn keys(&self) -> Vec<String> {
        self.shelf().entries.keys().cloned().collect()
    }

    /// Stored text for `key`, without counting a load.
    pub fn text(&self, key: &str) -> Option<String> {
        self.shelf()
            .entries
            .get(key)
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
    }

    fn shelf(&self) -> MutexGuard<'_, Shelf> {
        self.shared.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl ConfigStore for InMemoryConfigStore {
    fn load_raw(&self, key: &str) -> Result<Vec<u8>, ConfigError> {
        let mut shelf = self.shelf();
        shelf.loads += 1;
        if shelf.failing_loads {
            return Err(ConfigError::Other(format!("simulated failure loading {key}")));
        }
        shelf.entries.get(key).cloned().ok_or(ConfigError::NotFound)
    }

    fn save_raw(&self, key: &str, data: &[u8]) -> Result<(), ConfigError> {
        let mut shelf = self.shelf();
        shelf.saves += 1;
        if shelf.failing_saves {
            return Err(ConfigError::Other(format!("simulated failure saving {key}")));
        }
        shelf.entries.insert(key.to_owned(), data.to_vec());
        Ok(())
    }

    fn format(&self) -> ConfigFormat {
        self.format
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_entries_and_counters() {
        let a = InMemoryConfigStore::new();
        let b = a.clone();
        a.save_raw("scenario", b"{}").unwrap();
        assert_eq!(b.load_raw("scenario").unwrap(), b"{}");
        assert_eq!((a.saves(), a.loads()), (1, 1));
        assert_eq!(b.keys(), vec!["scenario".to_owned()]);
    }

    #[test]
    fn seeded_scenario_uses_the_store_format() {
        let scenario = ScenarioConfig::default();
        let store = InMemoryConfigStore::with_scenario(&scenario, ConfigFormat::Yaml).unwrap();
        assert_eq!(store.format(), ConfigFormat::Yaml);
        let text = store.text(ScenarioConfig::KEY).unwrap();
        assert!(text.contains("grasping_hand: left\n"), "{text}");
        assert_eq!(store.loads(), 0);
    }

    #[test]
    fn failures_still_count_and_store_nothing() {
        let store = InMemoryConfigStore::with_entry("other", "x");
        assert!(matches!(store.load_raw("scenario"), Err(ConfigError::NotFound)));

        store.fail_saves(true);
        store.fail_loads(true);
        assert!(matches!(store.save_raw("k", b"v"), Err(ConfigError::Other(_))));
        assert!(matches!(store.load_raw("k"), Err(ConfigError::Other(_))));
        assert_eq!((store.saves(), store.loads()), (1, 2));
        assert!(store.text("k").is_none());

        store.fail_saves(false);
        store.save_raw("k", b"v").unwrap();
        assert_eq!(store.text("k").as_deref(), Some("v"));
    }
}
