//! Generate command implementation
//!
//! The generate command executes the full materialization run:
//! 1. Load and validate the generator configuration
//! 2. Replicate the build output into each instance directory
//! 3. Derive and write each instance's settings document
//! 4. Write per-instance startup scripts
//! 5. Write the aggregate pm2 command artifacts
//!
//! Running without a config file is not an error: a fully populated example
//! configuration is written for the operator to edit, and the command exits
//! successfully.

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use instance_forge::output::{emoji, OutputConfig};

/// Arguments for the generate command
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Path to the generator config file
    #[arg(short, long, value_name = "PATH", env = "INSTANCE_FORGE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Show per-entry copy detail
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long)]
    pub quiet: bool,
}

/// Execute the generate command
pub fn execute(args: GenerateArgs, output: &OutputConfig) -> Result<()> {
    use instance_forge::replicate::CopyOutcome;
    use instance_forge::{config, generator};

    let config_path = args
        .config
        .unwrap_or_else(|| PathBuf::from("instances-config.json"));

    if !config_path.exists() {
        let example = serde_json::to_string_pretty(&config::GeneratorConfig::example())?;
        std::fs::write(&config_path, example)?;
        if !args.quiet {
            println!(
                "{} Wrote an example configuration: {}",
                emoji(output, "✅", "[OK]"),
                config_path.display()
            );
            println!("Edit it with your instances and run the command again.");
        }
        return Ok(());
    }

    let config = config::from_file(&config_path)?;

    if !args.quiet {
        println!("{} Instance Forge", emoji(output, "🔨", "[GEN]"));
        println!("   source:      {}", config.source_path);
        println!("   destination: {}", config.output_base_path);
        println!("   instances:   {}", config.instances.len());
        println!();
    }

    let report = generator::run(&config)?;

    for instance in &report.instances {
        if args.quiet && instance.succeeded() {
            continue;
        }
        match &instance.error {
            None => {
                let copied = instance
                    .copy_outcomes
                    .iter()
                    .filter(|o| matches!(o, CopyOutcome::Copied { .. }))
                    .count();
                println!(
                    "{} {} -> {}/ ({} files)",
                    emoji(output, "✓", "[OK]"),
                    instance.instance_name,
                    instance.folder_name,
                    copied
                );
                if args.verbose {
                    for outcome in &instance.copy_outcomes {
                        match outcome {
                            CopyOutcome::Excluded { path } => {
                                println!("    excluded: {}", path.display())
                            }
                            CopyOutcome::Missing { path } => {
                                println!("    missing:  {}", path.display())
                            }
                            _ => {}
                        }
                    }
                }
            }
            Some(e) => {
                println!(
                    "{} {}: {}",
                    emoji(output, "✗", "[FAIL]"),
                    instance.instance_name,
                    e
                );
            }
        }
    }

    if let Some(e) = &report.pm2_error {
        println!(
            "{} Could not generate pm2 command artifacts: {}",
            emoji(output, "⚠", "[WARN]"),
            e
        );
    }

    if !args.quiet {
        println!();
        println!("=== Generation Summary ===");
        println!("Succeeded: {}", report.succeeded_count());
        println!("Failed:    {}", report.failed_count());
        println!("Total:     {}", report.total());

        if report.succeeded_count() > 0 {
            println!();
            println!("Instances available under: {}", config.output_base_path);
            println!("Start one with its start-<folder>.bat or start-<folder>.ps1 script,");
            println!("or start them all with pm2-start-all in the output root.");
        }
    }

    Ok(())
}
