// src/cli.rs
//! CLI definitions for sdkify
//!
//! The command implementations live in the `commands` module.

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "sdkify")]
#[command(author = "sdkify Contributors")]
#[command(version)]
#[command(about = "Migrate legacy MSBuild projects to SDK-style projects", long_about = None)]
pub struct Cli {
    /// Log what every pass removes and adds
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by commands that evaluate a project
#[derive(Args, Debug, Clone, Default)]
pub struct EvaluationArgs {
    /// Recorded snapshots (default: <PROJECT>.snapshots.json next to each project)
    #[arg(short, long)]
    pub snapshots: Option<PathBuf>,

    /// Options file (TOML)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Framework moniker for converted projects
    #[arg(long)]
    pub target_framework: Option<String>,

    /// Keep the framework the legacy project already targets
    #[arg(long)]
    pub keep_current_tfm: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Convert one or more legacy projects
    Convert {
        /// Project files to convert
        #[arg(required = true)]
        projects: Vec<PathBuf>,

        #[command(flatten)]
        evaluation: EvaluationArgs,

        /// Write the converted project here instead of in place
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Do not keep a .old copy of projects converted in place
        #[arg(long)]
        no_backup: bool,
    },

    /// Show what conversion would remove, rewrite and suppress
    Diff {
        /// Project file to inspect
        project: PathBuf,

        #[command(flatten)]
        evaluation: EvaluationArgs,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_convert() {
        let cli = Cli::parse_from([
            "sdkify",
            "-v",
            "convert",
            "a.csproj",
            "b.vbproj",
            "--target-framework",
            "net6.0",
            "--no-backup",
        ]);
        assert!(cli.verbose);
        let Commands::Convert {
            projects,
            evaluation,
            output,
            no_backup,
        } = cli.command
        else {
            panic!("expected convert");
        };
        assert_eq!(projects.len(), 2);
        assert_eq!(evaluation.target_framework.as_deref(), Some("net6.0"));
        assert!(output.is_none());
        assert!(no_backup);
    }

    #[test]
    fn test_parse_diff() {
        let cli = Cli::parse_from(["sdkify", "diff", "a.csproj", "--snapshots", "a.json", "--json"]);
        let Commands::Diff {
            project,
            evaluation,
            json,
        } = cli.command
        else {
            panic!("expected diff");
        };
        assert_eq!(project, PathBuf::from("a.csproj"));
        assert_eq!(evaluation.snapshots, Some(PathBuf::from("a.json")));
        assert!(json);
    }

    #[test]
    fn test_convert_requires_project() {
        assert!(Cli::try_parse_from(["sdkify", "convert"]).is_err());
    }
}
