//! Dispatcher configuration.
//!
//! Two switches, both optional in config files:
//!
//! ```toml
//! verbose = true   # one diagnostic line per notification
//! xr = "off"       # "auto" (default) probes the injected XR backend once
//! ```
//!
//! The same keys work in JSON. [`DispatcherConfig::load`] picks the format from
//! the file extension.

use crate::error::{ConfigError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// How the dispatcher decides whether to poll XR devices.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum XrSupport {
    /// Ask the injected [`XrQuery`](crate::device::XrQuery) once at construction.
    #[default]
    Auto,
    /// Never poll XR, whatever the backend reports.
    Off,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatcherConfig {
    /// Emit a diagnostic line for every notification.
    pub verbose: bool,
    pub xr: XrSupport,
}

impl DispatcherConfig {
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn with_xr(mut self, xr: XrSupport) -> Self {
        self.xr = xr;
        self
    }

    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    pub fn from_json_str(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    /// Load from a `.toml` or `.json` file.
    pub fn load(path: &Path) -> Result<Self> {
        let format = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match format.as_deref() {
            Some("toml") => Self::from_toml_str(&std::fs::read_to_string(path)?),
            Some("json") => Self::from_json_str(&std::fs::read_to_string(path)?),
            _ => Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
        }
    }
}
