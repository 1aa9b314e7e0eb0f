//! CLI argument parsing and command dispatch

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::commands;
use instance_forge::output::OutputConfig;

/// Instance Forge - Generate per-tenant deployment instances from one build
#[derive(Parser, Debug)]
#[command(name = "instance-forge")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Colorize output (always, never, auto)
    #[arg(long, global = true, value_name = "WHEN", default_value = "auto")]
    color: String,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, global = true, value_name = "LEVEL", default_value = "info")]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate all configured instances from the build output
    Generate(commands::generate::GenerateArgs),

    /// Generate shell completion scripts
    Completions(commands::completions::CompletionsArgs),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        env_logger::Builder::from_env(
            env_logger::Env::default().default_filter_or(&self.log_level),
        )
        .try_init()
        .ok();

        let output = OutputConfig::from_env_and_flag(&self.color);

        match self.command {
            Commands::Generate(args) => commands::generate::execute(args, &output),
            Commands::Completions(args) => commands::completions::execute(args),
        }
    }
}
