// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! YAML configuration for the InfluxDB output.
//!
//! ```yaml
//! server: "influx.example.com:8086"
//! user: "writer"
//! password: "secret"
//! database: "metrics"
//! use_udp: false
//! strip_tag: 1
//! ```
//!
//! Unknown keys are rejected.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default store address (InfluxDB 0.8 HTTP API port).
pub const DEFAULT_SERVER: &str = "localhost:8086";

/// Output configuration. Immutable for the adapter's lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    /// Store address as `host:port`.
    #[serde(default = "default_server")]
    pub server: String,

    /// Username. The client falls back to `root` when unset.
    #[serde(default)]
    pub user: Option<String>,

    /// Password. The client falls back to `root` when unset.
    #[serde(default)]
    pub password: Option<String>,

    /// Target database name.
    #[serde(default)]
    pub database: String,

    /// Send batches as UDP datagrams instead of HTTP requests.
    #[serde(default)]
    pub use_udp: bool,

    /// Number of leading dot-separated tag segments to strip when deriving
    /// the series name (0 = no stripping).
    #[serde(default)]
    pub strip_tag: usize,

    /// Use https for the HTTP transport.
    #[serde(default)]
    pub secure: bool,

    /// Convert timestamps through a floating-point intermediate, matching
    /// the rounding of older deployments.
    #[serde(default)]
    pub float_time: bool,
}

fn default_server() -> String {
    DEFAULT_SERVER.to_string()
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            server: default_server(),
            user: None,
            password: None,
            database: String::new(),
            use_udp: false,
            strip_tag: 0,
            secure: false,
            float_time: false,
        }
    }
}

impl OutputConfig {
    /// Configuration for an HTTP output writing into `database`.
    pub fn new(server: impl Into<String>, database: impl Into<String>) -> Self {
        Self {
            server: server.into(),
            database: database.into(),
            ..Default::default()
        }
    }

    /// Parse and validate configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate configuration from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Render the configuration as YAML.
    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.trim().is_empty() {
            return Err(ConfigError::Invalid("server must not be empty".into()));
        }
        if self.server.contains("://") {
            return Err(ConfigError::Invalid(format!(
                "server '{}' must be host:port without a scheme (use `secure` for https)",
                self.server
            )));
        }
        if !self.use_udp && self.database.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "database is required for the HTTP transport".into(),
            ));
        }
        if self.use_udp && self.secure {
            return Err(ConfigError::Invalid(
                "secure and use_udp cannot be combined".into(),
            ));
        }
        Ok(())
    }
}
