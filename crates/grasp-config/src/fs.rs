// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::{check, ConfigError, ConfigFormat, ConfigStore, Validate};

/// One file per key, `<key>.<ext>`, under a base directory.
///
/// The directory is only created when something is saved, so a store that is
/// only read never touches the filesystem.
#[derive(Debug, Clone)]
pub struct FsConfigStore {
    base: PathBuf,
    format: ConfigFormat,
}

impl FsConfigStore {
    /// Store under the platform config directory (`~/.config/grasp-demo` on Linux).
    pub fn new() -> Result<Self, ConfigError> {
        let dirs = ProjectDirs::from("dev", "flyingrobots", "grasp-demo")
            .ok_or_else(|| ConfigError::Other("could not resolve config dir".into()))?;
        Ok(Self::with_root(dirs.config_dir()))
    }

    /// Store under `base`, JSON files.
    pub fn with_root(base: impl AsRef<Path>) -> Self {
        Self {
            base: base.as_ref().to_path_buf(),
            format: ConfigFormat::Json,
        }
    }

    /// Switches the file format for both reads and writes.
    #[must_use]
    pub fn with_format(mut self, format: ConfigFormat) -> Self {
        self.format = format;
        self
    }

    /// Directory holding the config files.
    pub fn base(&self) -> &Path {
        &self.base
    }

    /// File backing `key`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.base.join(format!("{key}.{}", self.format.extension()))
    }
}

impl ConfigStore for FsConfigStore {
    fn load_raw(&self, key: &str) -> Result<Vec<u8>, ConfigError> {
        let path = self.path_for(key);
        match fs::read(&path) {
            Ok(bytes) => Ok(bytes),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "config file absent");
                Err(ConfigError::NotFound)
            }
            Err(err) => Err(err.into()),
        }
    }

    fn save_raw(&self, key: &str, data: &[u8]) -> Result<(), ConfigError> {
        fs::create_dir_all(&self.base)?;
        let path = self.path_for(key);
        fs::write(&path, data)?;
        info!(path = %path.display(), "config written");
        Ok(())
    }

    fn format(&self) -> ConfigFormat {
        self.format
    }
}

/// Reads a standalone config file, format chosen by its extension, and
/// rejects values that fail validation.
pub fn load_file<T>(path: &Path) -> Result<T, ConfigError>
where
    T: DeserializeOwned + Validate,
{
    let format = ConfigFormat::from_path(path)?;
    let bytes = fs::read(path)?;
    let value = format.decode(&bytes)?;
    check(&path.display().to_string(), &value)?;
    Ok(value)
}
