// src/commands.rs
//! Command handlers for the sdkify CLI

use anyhow::{Context, Result, bail};
use clap::CommandFactory;
use clap_complete::Shell;
use std::path::PathBuf;
use tracing::info;

use crate::cli::{Cli, EvaluationArgs};
use sdkify::{ConvertOptions, OutputTarget, PackagesConfigReader, ProjectJob, Workspace};

/// Options file first, then command-line overrides
fn resolve_options(args: &EvaluationArgs) -> Result<ConvertOptions> {
    let mut options = match &args.config {
        Some(path) => ConvertOptions::load(path)
            .with_context(|| format!("Failed to load options from {}", path.display()))?,
        None => ConvertOptions::default(),
    };
    if let Some(tfm) = &args.target_framework {
        options.target_framework = tfm.clone();
    }
    if args.keep_current_tfm {
        options.keep_current_tfm = true;
    }
    options.validate()?;
    Ok(options)
}

/// Convert projects, writing each one that succeeds
pub fn cmd_convert(
    projects: &[PathBuf],
    args: &EvaluationArgs,
    output: Option<PathBuf>,
    no_backup: bool,
) -> Result<()> {
    if projects.len() > 1 && (output.is_some() || args.snapshots.is_some()) {
        bail!("--output and --snapshots take a single project");
    }

    let mut options = resolve_options(args)?;
    if no_backup {
        options.backup = false;
    }

    let target = match output {
        Some(path) => OutputTarget::Path(path),
        None => OutputTarget::InPlace {
            backup: options.backup,
        },
    };
    let jobs: Vec<ProjectJob> = projects
        .iter()
        .map(|project| ProjectJob::new(project, args.snapshots.clone()))
        .collect();

    let manifest_converter = PackagesConfigReader;
    let workspace = Workspace::new(&options, &manifest_converter);
    let result = workspace.convert_batch(&jobs, &target);

    for converted in &result.converted {
        let summary = &converted.summary;
        println!("Converted {} -> {}", converted.project.display(), converted.written_to.display());
        println!("  Target framework: {}", converted.target_framework);
        println!(
            "  Properties: {} removed, {} added",
            summary.properties_removed, summary.properties_added
        );
        println!(
            "  Items: {} removed, {} updated, {} suppressed",
            summary.items_removed, summary.items_updated, summary.item_removes_added
        );
        if summary.packages_added > 0 {
            println!("  Packages added: {}", summary.packages_added);
        }
    }
    for (project, err) in &result.failures {
        eprintln!("Failed: {}: {}", project.display(), err);
    }

    info!(
        "{} converted, {} failed",
        result.converted.len(),
        result.failed()
    );
    if !result.is_success() {
        bail!("{} of {} projects failed to convert", result.failed(), jobs.len());
    }
    Ok(())
}

/// Print the diff report for one project
pub fn cmd_diff(project: PathBuf, args: &EvaluationArgs, json: bool) -> Result<()> {
    let options = resolve_options(args)?;
    let job = ProjectJob::new(project, args.snapshots.clone());

    let manifest_converter = PackagesConfigReader;
    let workspace = Workspace::new(&options, &manifest_converter);
    let report = workspace
        .diff_job(&job)
        .with_context(|| format!("Failed to diff {}", job.project.display()))?;

    if json {
        println!("{}", report.to_json()?);
    } else {
        print!("{}", report.render_text());
    }
    Ok(())
}

/// Write completions for `shell` to stdout
pub fn cmd_completions(shell: Shell) -> Result<()> {
    let mut command = Cli::command();
    let name = command.get_name().to_string();
    clap_complete::generate(shell, &mut command, name, &mut std::io::stdout());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_options() {
        let args = EvaluationArgs {
            target_framework: Some("net6.0".to_string()),
            keep_current_tfm: true,
            ..EvaluationArgs::default()
        };
        let options = resolve_options(&args).unwrap();
        assert_eq!(options.target_framework, "net6.0");
        assert!(options.keep_current_tfm);
        assert!(options.backup);
    }

    #[test]
    fn test_empty_framework_rejected() {
        let args = EvaluationArgs {
            target_framework: Some(" ".to_string()),
            ..EvaluationArgs::default()
        };
        assert!(resolve_options(&args).is_err());
    }

    #[test]
    fn test_single_project_flags() {
        let args = EvaluationArgs {
            snapshots: Some(PathBuf::from("a.json")),
            ..EvaluationArgs::default()
        };
        let projects = [PathBuf::from("a.csproj"), PathBuf::from("b.csproj")];
        assert!(cmd_convert(&projects, &args, None, false).is_err());
    }
}
