// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

use std::fmt;
use std::path::Path;

use serde::{de::DeserializeOwned, Serialize};

use crate::ConfigError;

/// Text encoding of a stored config.
///
/// Stores written by the demo use pretty JSON; scenarios edited by hand are
/// usually YAML.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConfigFormat {
    /// Pretty-printed JSON, `.json`.
    #[default]
    Json,
    /// YAML, `.yaml` or `.yml`.
    Yaml,
}

impl ConfigFormat {
    /// Picks the format from a file extension, case-insensitively.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("json") => Ok(Self::Json),
            Some("yaml" | "yml") => Ok(Self::Yaml),
            _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        }
    }

    /// Extension used for files written in this format.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Yaml => "yaml",
        }
    }

    /// Renders `value` as text bytes.
    pub fn encode<T: Serialize>(self, value: &T) -> Result<Vec<u8>, ConfigError> {
        match self {
            Self::Json => Ok(serde_json::to_vec_pretty(value)?),
            Self::Yaml => Ok(serde_yaml::to_string(value)?.into_bytes()),
        }
    }

    /// Parses bytes written in this format.
    pub fn decode<T: DeserializeOwned>(self, bytes: &[u8]) -> Result<T, ConfigError> {
        match self {
            Self::Json => Ok(serde_json::from_slice(bytes)?),
            Self::Yaml => Ok(serde_yaml::from_slice(bytes)?),
        }
    }
}

impl fmt::Display for ConfigFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn extension_selects_format() {
        let detect = |p: &str| ConfigFormat::from_path(Path::new(p)).unwrap();
        assert_eq!(detect("a/scenario.json"), ConfigFormat::Json);
        assert_eq!(detect("scenario.YML"), ConfigFormat::Yaml);
        assert_eq!(detect("scenario.yaml"), ConfigFormat::Yaml);
        assert!(matches!(
            ConfigFormat::from_path(Path::new("scenario.toml")),
            Err(ConfigError::UnsupportedFormat(_))
        ));
        assert!(ConfigFormat::from_path(Path::new("scenario")).is_err());
    }

    #[test]
    fn yaml_text_is_readable() {
        let mut dwell = BTreeMap::new();
        dwell.insert("stand", 2.5);
        let text = ConfigFormat::Yaml.encode(&dwell).unwrap();
        assert_eq!(String::from_utf8(text.clone()).unwrap(), "stand: 2.5\n");
        let back: BTreeMap<String, f64> = ConfigFormat::Yaml.decode(&text).unwrap();
        assert_eq!(back.get("stand"), Some(&2.5));
    }

    #[test]
    fn parse_errors_name_their_format() {
        let json = ConfigFormat::Json.decode::<BTreeMap<String, f64>>(b"{ nope");
        assert!(matches!(json, Err(ConfigError::Json(_))));
        let yaml = ConfigFormat::Yaml.decode::<BTreeMap<String, f64>>(b"stand: [");
        assert!(matches!(yaml, Err(ConfigError::Yaml(_))));
    }
}
