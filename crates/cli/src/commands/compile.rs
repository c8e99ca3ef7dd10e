//! `promptloom compile`: print a template as a Jinja chat template.

use super::{build_registry, load_config};
use promptloom_core::HfTokenizer;
use promptloom_template::compile;
use std::path::Path;

pub fn run(
    config_path: Option<&Path>,
    template: Option<String>,
    tokenizer_path: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(config_path)?;
    let registry = build_registry(&config)?;
    let mut tokenizer = HfTokenizer::from_file(tokenizer_path)?;

    let name = template.or(config.template);
    let template = registry.resolve(&mut tokenizer, name.as_deref())?;

    // Compile again to report why, if resolve could not install it.
    let jinja = compile(template, &tokenizer)?;
    println!("{jinja}");
    Ok(())
}
