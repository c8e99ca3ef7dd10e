//! `promptloom config`: configuration management commands.

use super::{build_registry, load_config};
use promptloom_config::EngineConfig;
use std::path::{Path, PathBuf};

pub fn validate(config_path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    println!("Validating configuration...");

    let config = match load_config(config_path) {
        Ok(config) => config,
        Err(e) => {
            println!("   Config error: {e}");
            return Err(e.into());
        }
    };
    println!("   Config parsed successfully");

    let registry = match build_registry(&config) {
        Ok(registry) => registry,
        Err(e) => {
            println!("   Template error: {e}");
            return Err(e.into());
        }
    };

    let mut warnings = Vec::new();
    if let Some(name) = &config.template {
        if registry.get(name).is_err() {
            warnings.push(format!("Default template {name} is not registered"));
        }
    }

    if warnings.is_empty() {
        println!("   All checks passed");
    } else {
        println!();
        for w in &warnings {
            println!("   Warning: {w}");
        }
    }

    println!();
    println!(
        "   Template:       {}",
        config.template.as_deref().unwrap_or("(empty)")
    );
    println!("   Cutoff:         {}", config.cutoff_len);
    println!("   Reserved label: {}", config.reserved_label_len);
    println!("   Custom:         {}", config.templates.len());
    Ok(())
}

pub fn show(config_path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(config_path).map_err(|e| format!("Failed to load config: {e}"))?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

pub fn path(config_path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", resolved_path(config_path).display());
    Ok(())
}

fn resolved_path(config_path: Option<&Path>) -> PathBuf {
    config_path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| EngineConfig::config_dir().join("config.toml"))
}
