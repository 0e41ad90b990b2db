// src/main.rs

use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins over -v
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Convert {
            projects,
            evaluation,
            output,
            no_backup,
        } => commands::cmd_convert(&projects, &evaluation, output, no_backup),
        Commands::Diff {
            project,
            evaluation,
            json,
        } => commands::cmd_diff(project, &evaluation, json),
        Commands::Completions { shell } => commands::cmd_completions(shell),
    }
}
