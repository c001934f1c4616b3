//! # Configuration
//!
//! Process configuration, layered as: defaults → TOML file → environment.
//!
//! ## Environment Variables
//!
//! - `LOG_LEVEL`: tracing level for calcd targets (default: `info`)
//! - `CALCD_LOG_FORMAT`: `text` or `json` (default: `text`)
//! - `COMPUTING_POWER`: worker count hint (default: 1)
//! - `TIME_ADDITION_MS`, `TIME_SUBTRACTION_MS`, `TIME_MULTIPLICATION_MS`,
//!   `TIME_DIVISION_MS`: per-operator timing hints (default: 1000)
//!
//! The worker and timing hints are accepted and reported, but evaluation is
//! synchronous and in-process, so they change nothing.
//!
//! An integer variable that does not parse leaves the previous value in place.

use calcd_core::CalcError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Output format of the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Effective process configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub log_level: String,
    pub log_format: LogFormat,
    pub computing_power: i64,
    pub time_addition_ms: i64,
    pub time_subtraction_ms: i64,
    pub time_multiplication_ms: i64,
    pub time_division_ms: i64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Text,
            computing_power: 1,
            time_addition_ms: 1000,
            time_subtraction_ms: 1000,
            time_multiplication_ms: 1000,
            time_division_ms: 1000,
        }
    }
}

impl Config {
    /// Load configuration: defaults, then `path` if given, then the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self, CalcError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Read a TOML configuration file. Missing keys take their defaults.
    pub fn from_file(path: &Path) -> Result<Self, CalcError> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            CalcError::ConfigError(format!("Cannot read '{}': {}", path.display(), e))
        })?;
        toml::from_str(&text)
            .map_err(|e| CalcError::ConfigError(format!("{}: {}", path.display(), e)))
    }

    /// Parse TOML configuration text.
    pub fn from_toml_str(text: &str) -> Result<Self, CalcError> {
        toml::from_str(text).map_err(|e| CalcError::ConfigError(e.to_string()))
    }

    /// Overlay values found through `lookup` (normally `std::env::var`).
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(level) = lookup("LOG_LEVEL") {
            self.log_level = level;
        }
        match lookup("CALCD_LOG_FORMAT").as_deref().map(str::trim) {
            Some(f) if f.eq_ignore_ascii_case("json") => self.log_format = LogFormat::Json,
            Some(f) if f.eq_ignore_ascii_case("text") => self.log_format = LogFormat::Text,
            _ => {}
        }

        let int = |key: &str, current: i64| {
            lookup(key)
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(current)
        };
        self.computing_power = int("COMPUTING_POWER", self.computing_power);
        self.time_addition_ms = int("TIME_ADDITION_MS", self.time_addition_ms);
        self.time_subtraction_ms = int("TIME_SUBTRACTION_MS", self.time_subtraction_ms);
        self.time_multiplication_ms = int("TIME_MULTIPLICATION_MS", self.time_multiplication_ms);
        self.time_division_ms = int("TIME_DIVISION_MS", self.time_division_ms);
    }

    /// `EnvFilter` directives for the configured level.
    pub fn tracing_filter(&self) -> String {
        let level = self.log_level.trim();
        format!("calcd={0},calcd_core={0},tower_http={0}", level)
    }

    /// Render as TOML.
    pub fn to_toml(&self) -> Result<String, CalcError> {
        toml::to_string(self).map_err(|e| CalcError::ConfigError(e.to_string()))
    }
}

// =============================================================================
// TESTS
// =============================================================================
