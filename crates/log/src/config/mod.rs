//! Router configuration
//!
//! - `RouterConfig`: log directory, console mirror and per-destination options
//! - `presets`: environment, development and production setups

mod presets;

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::sink::RotationPolicy;

/// Settings fixed when a [`RoutingEngine`](crate::RoutingEngine) is constructed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
    /// Directory holding per-module files and `critical.log`
    pub log_dir: PathBuf,
    /// Mirror every record to stderr
    pub console: bool,
    /// Use ANSI colors on the console mirror
    pub console_colors: bool,
    /// Flush after every record
    pub auto_flush: bool,
    /// Rotation applied to every file destination
    pub rotation: RotationPolicy,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            log_dir: PathBuf::from("logs"),
            console: false,
            console_colors: true,
            auto_flush: true,
            rotation: RotationPolicy::default(),
        }
    }
}

impl RouterConfig {
    /// Default configuration writing into `log_dir`
    pub fn new(log_dir: impl Into<PathBuf>) -> Self {
        Self {
            log_dir: log_dir.into(),
            ..Self::default()
        }
    }

    /// Enable or disable the console mirror
    #[must_use]
    pub fn with_console(mut self, console: bool) -> Self {
        self.console = console;
        self
    }

    /// Replace the rotation policy
    #[must_use]
    pub fn with_rotation(mut self, rotation: RotationPolicy) -> Self {
        self.rotation = rotation;
        self
    }

    /// Path of the error/critical aggregator
    pub fn aggregator_path(&self) -> PathBuf {
        self.log_dir.join("critical.log")
    }
}
