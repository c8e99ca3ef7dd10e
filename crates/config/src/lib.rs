//! Configuration loading, validation, and management for promptloom.
//!
//! Loads configuration from `~/.promptloom/config.toml` with environment
//! variable overrides. Validates all settings at startup.
//!
//! Besides the encoding defaults, the file may describe custom chat
//! templates which are registered next to the built-in catalog:
//!
//! ```toml
//! template = "custom"
//! cutoff_len = 2048
//!
//! [[templates]]
//! name = "custom"
//! efficient_eos = true
//! user = { kind = "string", slots = [{ text = "[HUMAN]:\n{{content}}\n[AI]:\n" }] }
//! separator = { kind = "empty", slots = [{ text = "\n\n" }] }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `~/.promptloom/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Template used when the caller does not name one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,

    /// Maximum total token budget for a single encoded example
    #[serde(default = "default_cutoff_len")]
    pub cutoff_len: usize,

    /// Minimum token space guaranteed to the response side
    #[serde(default = "default_reserved_label_len")]
    pub reserved_label_len: usize,

    /// Custom template definitions
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub templates: Vec<TemplateConfig>,
}

fn default_cutoff_len() -> usize {
    1_000_000
}
fn default_reserved_label_len() -> usize {
    1
}

/// A chat template described in configuration.
///
/// Every formatter left out falls back to the registry default.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateConfig {
    pub name: String,

    #[serde(default)]
    pub default_system: String,

    #[serde(default)]
    pub stop_words: Vec<String>,

    #[serde(default)]
    pub efficient_eos: bool,

    #[serde(default)]
    pub replace_eos: bool,

    #[serde(default)]
    pub force_system: bool,

    /// Where rendered system text goes; inferred from the name when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_injection: Option<SystemInjectionConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<FormatterConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assistant: Option<FormatterConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system: Option<FormatterConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function: Option<FormatterConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observation: Option<FormatterConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tools: Option<FormatterConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub separator: Option<FormatterConfig>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SystemInjectionConfig {
    Leading,
    PrependToFirstUser,
}

/// A formatter description, tagged by `kind`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FormatterConfig {
    Empty {
        #[serde(default)]
        slots: Vec<SlotConfig>,
    },
    String {
        slots: Vec<SlotConfig>,
    },
    Function {
        slots: Vec<SlotConfig>,
    },
    Tool {
        #[serde(default = "default_tool_format")]
        format: String,
    },
}

fn default_tool_format() -> String {
    "default".into()
}

/// One slot: `{ text = "..." }`, `{ token = "..." }`, `"bos"` or `"eos"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotConfig {
    Text(String),
    Token(String),
    Bos,
    Eos,
}

impl EngineConfig {
    /// Load configuration from the default path (~/.promptloom/config.toml).
    ///
    /// Environment variables take precedence over the file:
    /// - `PROMPTLOOM_TEMPLATE`
    /// - `PROMPTLOOM_CUTOFF_LEN`
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        let mut config = Self::load_from(&config_path)?;

        if let Ok(template) = std::env::var("PROMPTLOOM_TEMPLATE") {
            config.template = Some(template);
        }

        if let Ok(raw) = std::env::var("PROMPTLOOM_CUTOFF_LEN") {
            config.cutoff_len = raw.parse().map_err(|_| {
                ConfigError::ValidationError(format!(
                    "PROMPTLOOM_CUTOFF_LEN must be a positive integer, got {raw:?}"
                ))
            })?;
            config.validate()?;
        }

        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        tracing::debug!(
            path = %path.display(),
            templates = config.templates.len(),
            "Loaded configuration"
        );
        Ok(config)
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".promptloom")
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.cutoff_len == 0 {
            return Err(ConfigError::ValidationError(
                "cutoff_len must be greater than 0".into(),
            ));
        }

        if self.reserved_label_len > self.cutoff_len {
            return Err(ConfigError::ValidationError(
                "reserved_label_len must not exceed cutoff_len".into(),
            ));
        }

        let mut seen = HashSet::new();
        for template in &self.templates {
            if template.name.trim().is_empty() {
                return Err(ConfigError::ValidationError(
                    "template name must not be empty".into(),
                ));
            }
            if !seen.insert(template.name.as_str()) {
                return Err(ConfigError::ValidationError(format!(
                    "template {} is defined more than once",
                    template.name
                )));
            }
            if template.replace_eos && template.stop_words.is_empty() {
                return Err(ConfigError::ValidationError(format!(
                    "template {} sets replace_eos without stop_words",
                    template.name
                )));
            }
        }

        Ok(())
    }

    /// Generate a default config TOML string.
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            template: None,
            cutoff_len: default_cutoff_len(),
            reserved_label_len: default_reserved_label_len(),
            templates: vec![],
        }
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}
