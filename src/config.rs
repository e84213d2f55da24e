//! Configuration handling for yoda-lint
//!
//! Configuration is loaded from `.yodalint.json`, discovered upward
//! from the working directory. Loading is fail-fast: a config file
//! that exists but does not validate aborts the run instead of being
//! silently replaced by defaults.

use crate::core::Severity;
use crate::rule::{OptionsError, Settings};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Configuration file name
pub const CONFIG_FILE_NAME: &str = ".yodalint.json";

fn default_order() -> String {
    "always".to_string()
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Enforced order: "always" (literal first) or "never"
    #[serde(default = "default_order")]
    pub order: String,

    /// Rule options, validated against the option schema on load
    #[serde(default)]
    pub options: Option<serde_json::Value>,

    /// Rule enable/disable and severity overrides
    #[serde(default)]
    pub rules: RulesConfig,

    /// File patterns to exclude
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Minimum severity to report
    #[serde(default)]
    pub min_severity: MinSeverity,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            order: default_order(),
            options: None,
            rules: RulesConfig::default(),
            exclude: Vec::new(),
            min_severity: MinSeverity::default(),
        }
    }
}

/// Rule-specific configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RulesConfig {
    /// Rules to enable (supports wildcards like "yoda-*")
    #[serde(default)]
    pub enable: Vec<String>,

    /// Rules to disable (supports wildcards)
    #[serde(default)]
    pub disable: Vec<String>,

    /// Override severity for specific rules
    #[serde(default)]
    pub severity: HashMap<String, String>,
}

/// Minimum severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MinSeverity {
    Error,
    #[default]
    Warning,
}

impl MinSeverity {
    pub fn as_severity(&self) -> Severity {
        match self {
            Self::Error => Severity::Error,
            Self::Warning => Severity::Warning,
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::ReadError(path.to_path_buf(), e.to_string()))?;

        let config: Config = serde_json::from_str(&content)
            .map_err(|e| ConfigError::ParseError(path.to_path_buf(), e.to_string()))?;

        // Validate order and options up front rather than at first use
        config
            .settings()
            .map_err(|e| ConfigError::InvalidOptions(path.to_path_buf(), e))?;

        Ok(config)
    }

    /// Find and load configuration from the given directory or parents.
    /// A file that exists but does not validate is an error, not a
    /// fallback to defaults.
    pub fn find_and_load(start_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let mut current = start_dir.to_path_buf();

        loop {
            let config_path = current.join(CONFIG_FILE_NAME);
            if config_path.exists() {
                return Self::load(&config_path).map(Some);
            }

            if !current.pop() {
                break;
            }
        }

        Ok(None)
    }

    /// Resolve the rule settings from this configuration
    pub fn settings(&self) -> Result<Settings, OptionsError> {
        Settings::resolve(&self.order, self.options.as_ref())
    }

    /// Check if a rule should be enabled
    pub fn is_rule_enabled(&self, rule_id: &str) -> bool {
        if matches_pattern(rule_id, &self.rules.disable) {
            return false;
        }

        // Empty enable list means all rules are on
        if self.rules.enable.is_empty() {
            return true;
        }

        matches_pattern(rule_id, &self.rules.enable)
    }

    /// Check if a file should be excluded
    pub fn is_excluded(&self, path: &Path) -> bool {
        let path_str = path.to_string_lossy();
        for pattern in &self.exclude {
            if let Ok(glob) = glob::Pattern::new(pattern) {
                if glob.matches(&path_str) {
                    return true;
                }
            }
        }
        false
    }

    /// Get overridden severity for a rule
    pub fn severity_override(&self, rule_id: &str) -> Option<Severity> {
        self.rules
            .severity
            .get(rule_id)
            .and_then(|s| Severity::parse(s))
    }
}

fn matches_pattern(rule_id: &str, patterns: &[String]) -> bool {
    for pattern in patterns {
        if let Some(prefix) = pattern.strip_suffix('*') {
            if rule_id.starts_with(prefix) {
                return true;
            }
        } else if pattern == rule_id {
            return true;
        }
    }
    false
}

/// Configuration error
#[derive(Debug)]
pub enum ConfigError {
    ReadError(PathBuf, String),
    ParseError(PathBuf, String),
    InvalidOptions(PathBuf, OptionsError),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ReadError(path, msg) => {
                write!(f, "Failed to read config file '{}': {}", path.display(), msg)
            }
            Self::ParseError(path, msg) => {
                write!(f, "Failed to parse config file '{}': {}", path.display(), msg)
            }
            Self::InvalidOptions(path, err) => {
                write!(f, "Invalid config file '{}': {}", path.display(), err)
            }
        }
    }
}

impl std::error::Error for ConfigError {}
