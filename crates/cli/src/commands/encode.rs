//! `promptloom encode`: encode a dialogue file into token ids.

use super::{build_registry, load_config};
use promptloom_config::EngineConfig;
use promptloom_core::{Error, HfTokenizer, Turn};
use promptloom_template::TokenBudget;
use std::path::{Path, PathBuf};
use tracing::info;

pub struct EncodeArgs {
    pub template: Option<String>,
    pub tokenizer: PathBuf,
    pub dialogue: PathBuf,
    pub system: Option<String>,
    pub tools: Option<PathBuf>,
    pub cutoff_len: Option<usize>,
    pub reserved_label_len: Option<usize>,
    pub single: bool,
}

pub fn run(
    config_path: Option<&Path>,
    args: EncodeArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(config_path)?;
    let registry = build_registry(&config)?;
    let mut tokenizer = HfTokenizer::from_file(&args.tokenizer)?;

    let turns = read_dialogue(&args.dialogue)?;
    let tools = args.tools.as_deref().map(std::fs::read_to_string).transpose()?;
    let budget = effective_budget(&config, args.cutoff_len, args.reserved_label_len);

    let name = args.template.or(config.template);
    let template = registry.resolve(&mut tokenizer, name.as_deref())?;
    info!(
        template = %template.name,
        turns = turns.len(),
        cutoff_len = budget.cutoff_len,
        "Encoding dialogue"
    );

    let system = args.system.as_deref();
    let tools = tools.as_deref();
    let output = if args.single {
        let pair = template.encode_single_turn(&tokenizer, &turns, system, tools, budget)?;
        serde_json::to_string_pretty(&pair)?
    } else {
        let pairs = template.encode_multi_turn(&tokenizer, &turns, system, tools, budget)?;
        serde_json::to_string_pretty(&pairs)?
    };
    println!("{output}");
    Ok(())
}

fn read_dialogue(path: &Path) -> Result<Vec<Turn>, Error> {
    let raw = std::fs::read_to_string(path).map_err(|e| Error::Config {
        message: format!("cannot read dialogue {}: {e}", path.display()),
    })?;
    Ok(serde_json::from_str(&raw)?)
}

/// Configured budget with command-line overrides applied.
fn effective_budget(
    config: &EngineConfig,
    cutoff_len: Option<usize>,
    reserved_label_len: Option<usize>,
) -> TokenBudget {
    let mut budget = TokenBudget::from(config);
    if let Some(cutoff_len) = cutoff_len {
        budget.cutoff_len = cutoff_len;
    }
    if let Some(reserved_label_len) = reserved_label_len {
        budget.reserved_label_len = reserved_label_len;
    }
    budget
}
