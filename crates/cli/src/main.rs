//! promptloom CLI, the main entry point.
//!
//! Commands:
//! - `list`     List registered chat templates
//! - `compile`  Print a template as a Jinja chat template
//! - `encode`   Encode a dialogue into token ids
//! - `config`   Show, locate or validate the configuration

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(
    name = "promptloom",
    about = "promptloom: chat templates for fine-tuning and inference",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Read configuration from this file instead of ~/.promptloom/config.toml
    #[arg(long, global = true, env = "PROMPTLOOM_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// List registered templates and their flags
    List,

    /// Compile a template into a Jinja chat template
    Compile {
        /// Template name (defaults to the configured template)
        #[arg(short, long)]
        template: Option<String>,

        /// Path to a tokenizer.json
        #[arg(long)]
        tokenizer: PathBuf,
    },

    /// Encode a dialogue into prompt/response token ids
    Encode {
        /// Template name (defaults to the configured template)
        #[arg(short, long)]
        template: Option<String>,

        /// Path to a tokenizer.json
        #[arg(long)]
        tokenizer: PathBuf,

        /// JSON file holding `[{"role": ..., "content": ...}, ...]`
        #[arg(short, long)]
        dialogue: PathBuf,

        /// System prompt (defaults to the template's)
        #[arg(short, long)]
        system: Option<String>,

        /// JSON file holding the tool manifest
        #[arg(long)]
        tools: Option<PathBuf>,

        /// Override the configured cutoff length
        #[arg(long)]
        cutoff_len: Option<usize>,

        /// Override the configured reserved label length
        #[arg(long)]
        reserved_label_len: Option<usize>,

        /// Emit one prompt/response pair instead of one per round
        #[arg(long)]
        single: bool,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration as TOML
    Show,
    /// Print the configuration file path
    Path,
    /// Validate the configuration and its custom templates
    Validate,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config_path = cli.config.as_deref();
    match cli.command {
        Commands::List => commands::list::run(config_path)?,
        Commands::Compile {
            template,
            tokenizer,
        } => commands::compile::run(config_path, template, &tokenizer)?,
        Commands::Encode {
            template,
            tokenizer,
            dialogue,
            system,
            tools,
            cutoff_len,
            reserved_label_len,
            single,
        } => commands::encode::run(
            config_path,
            commands::encode::EncodeArgs {
                template,
                tokenizer,
                dialogue,
                system,
                tools,
                cutoff_len,
                reserved_label_len,
                single,
            },
        )?,
        Commands::Config { action } => match action.unwrap_or(ConfigAction::Show) {
            ConfigAction::Show => commands::config_cmd::show(config_path)?,
            ConfigAction::Path => commands::config_cmd::path(config_path)?,
            ConfigAction::Validate => commands::config_cmd::validate(config_path)?,
        },
    }

    Ok(())
}
