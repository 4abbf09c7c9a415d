// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Config persistence for the grasp demo.
//!
//! Stores move bytes; the service picks the encoding from the store and
//! validates what it parses.

mod format;
mod fs;
mod service;

pub use format::ConfigFormat;
pub use fs::{load_file, FsConfigStore};
pub use service::{check, ConfigError, ConfigService, ConfigStore, Validate};
