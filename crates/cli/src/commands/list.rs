//! `promptloom list`: show registered templates.

use super::{build_registry, load_config};
use promptloom_template::{SystemInjection, Template};
use std::path::Path;

pub fn run(config_path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(config_path)?;
    let registry = build_registry(&config)?;

    println!("Chat templates ({} registered):\n", registry.len());
    for template in registry.iter() {
        let marker = if config.template.as_deref() == Some(template.name.as_str()) {
            "*"
        } else {
            " "
        };
        println!("  {marker} {:<16} {}", template.name, describe(template));
    }
    Ok(())
}

fn describe(template: &Template) -> String {
    let mut flags = Vec::new();
    if template.efficient_eos {
        flags.push("efficient_eos".to_string());
    }
    if template.replace_eos {
        flags.push("replace_eos".to_string());
    }
    if template.force_system {
        flags.push("force_system".to_string());
    }
    if template.system_injection == SystemInjection::PrependToFirstUser {
        flags.push("prepend_system".to_string());
    }
    if !template.stop_words.is_empty() {
        flags.push(format!("stop=[{}]", template.stop_words.join(", ")));
    }
    flags.join(" ")
}
