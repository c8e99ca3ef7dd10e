pub mod compile;
pub mod config_cmd;
pub mod encode;
pub mod list;

use promptloom_config::{ConfigError, EngineConfig};
use promptloom_core::TemplateError;
use promptloom_template::TemplateRegistry;
use std::path::Path;

/// Load the configuration from `path`, or from the default location.
pub fn load_config(path: Option<&Path>) -> Result<EngineConfig, ConfigError> {
    match path {
        Some(path) => EngineConfig::load_from(path),
        None => EngineConfig::load(),
    }
}

/// The built-in catalog plus every template defined in configuration.
pub fn build_registry(config: &EngineConfig) -> Result<TemplateRegistry, TemplateError> {
    let mut registry = TemplateRegistry::with_builtins()?;
    for template in &config.templates {
        registry.register_config(template)?;
    }
    Ok(registry)
}
