// src/workspace.rs

//! Converting projects on disk
//!
//! Ties the pieces together for one project: load the document, evaluate the
//! legacy configurations, build the baseline and differs, run the converter
//! and write the result. Batch conversion runs each project on its own so a
//! failure in one leaves the others untouched.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, error, info};

use crate::baseline::{BaselineBuilder, BaselineProject};
use crate::convert::{Conversion, ConversionSummary, Converter};
use crate::diff::{DiffReport, Differs, generate_report};
use crate::error::{Error, Result};
use crate::evaluation::{
    EvaluationPurpose, Evaluator, RecordedEvaluator, UnconfiguredProject, declared_configurations,
    evaluate_all,
};
use crate::manifest::ManifestConverter;
use crate::options::ConvertOptions;
use crate::project::ProjectDocument;

/// Suffix of the snapshot file recorded next to a project
pub const SNAPSHOT_SUFFIX: &str = ".snapshots.json";

/// Suffix of the backup written before a project is replaced
pub const BACKUP_SUFFIX: &str = ".old";

/// Everything the converter needs to know about one project
#[derive(Debug, Clone)]
pub struct Analysis {
    pub legacy: UnconfiguredProject,
    pub baseline: BaselineProject,
    pub differs: Differs,
}

/// One project to convert and where its snapshots live
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectJob {
    pub project: PathBuf,
    pub snapshots: PathBuf,
}

impl ProjectJob {
    /// Use the given snapshot file, or the one recorded next to the project
    pub fn new(project: impl Into<PathBuf>, snapshots: Option<PathBuf>) -> Self {
        let project = project.into();
        let snapshots = snapshots.unwrap_or_else(|| default_snapshot_path(&project));
        Self { project, snapshots }
    }
}

/// `MyApp.csproj` -> `MyApp.csproj.snapshots.json`
pub fn default_snapshot_path(project: &Path) -> PathBuf {
    append_to_file_name(project, SNAPSHOT_SUFFIX)
}

/// `MyApp.csproj` -> `MyApp.csproj.old`
pub fn backup_path(project: &Path) -> PathBuf {
    append_to_file_name(project, BACKUP_SUFFIX)
}

fn append_to_file_name(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(suffix);
    path.with_file_name(name)
}

/// Where a converted project is written
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    /// Replace the project file, keeping a `.old` copy when `backup` is set
    InPlace { backup: bool },
    /// Write to this path and leave the project file alone
    Path(PathBuf),
}

/// A project converted and written
#[derive(Debug, Clone)]
pub struct ConvertedProject {
    pub project: PathBuf,
    pub written_to: PathBuf,
    pub target_framework: String,
    pub summary: ConversionSummary,
}

/// Outcome of a batch conversion
#[derive(Debug, Default)]
pub struct BatchResult {
    pub converted: Vec<ConvertedProject>,
    pub failures: Vec<(PathBuf, Error)>,
}

impl BatchResult {
    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Conversion settings shared by every project of a run
pub struct Workspace<'a> {
    options: &'a ConvertOptions,
    manifest_converter: &'a dyn ManifestConverter,
}

impl<'a> Workspace<'a> {
    pub fn new(options: &'a ConvertOptions, manifest_converter: &'a dyn ManifestConverter) -> Self {
        Self {
            options,
            manifest_converter,
        }
    }

    /// Evaluate the legacy project and build its baseline and differs
    pub fn analyze<E: Evaluator + ?Sized>(&self, document: &ProjectDocument, evaluator: &E) -> Result<Analysis> {
        let configurations = declared_configurations(document);
        debug!(
            "Evaluating {} configurations: {}",
            configurations.len(),
            configurations
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        );

        let legacy = evaluate_all(evaluator, EvaluationPurpose::Legacy, document, &configurations)?;
        let baseline = BaselineBuilder::new(evaluator, self.options).build(document, &legacy)?;
        let differs = Differs::build(&legacy, &baseline)?;
        Ok(Analysis {
            legacy,
            baseline,
            differs,
        })
    }

    /// Run the whole pipeline on an in-memory document
    pub fn convert<E: Evaluator + ?Sized>(&self, document: ProjectDocument, evaluator: &E) -> Result<Conversion> {
        let analysis = self.analyze(&document, evaluator)?;
        Converter::new(document, &analysis.baseline, &analysis.differs, self.manifest_converter).convert()
    }

    /// Diff report for a project without converting it
    pub fn diff<E: Evaluator + ?Sized>(&self, document: &ProjectDocument, evaluator: &E) -> Result<DiffReport> {
        let analysis = self.analyze(document, evaluator)?;
        Ok(generate_report(
            document.project_name(),
            &analysis.baseline,
            &analysis.differs,
        ))
    }

    /// Diff report for a project file and its recorded snapshots
    pub fn diff_job(&self, job: &ProjectJob) -> Result<DiffReport> {
        let document = ProjectDocument::load(&job.project)?;
        let evaluator = RecordedEvaluator::load(&job.snapshots)?;
        self.diff(&document, &evaluator)
    }

    /// Convert one project file and write it. Nothing is written unless the
    /// whole pipeline succeeded.
    pub fn convert_job(&self, job: &ProjectJob, output: &OutputTarget) -> Result<ConvertedProject> {
        let document = ProjectDocument::load(&job.project)?;
        let evaluator = RecordedEvaluator::load(&job.snapshots)?;
        let conversion = self.convert(document, &evaluator)?;

        let written_to = match output {
            OutputTarget::InPlace { backup } => {
                if *backup {
                    let backup = backup_path(&job.project);
                    fs::copy(&job.project, &backup).map_err(|e| Error::io(&backup, e))?;
                    debug!("Backed up {} to {}", job.project.display(), backup.display());
                }
                job.project.clone()
            }
            OutputTarget::Path(path) => path.clone(),
        };
        write_document(&conversion.document, &written_to)?;

        Ok(ConvertedProject {
            project: job.project.clone(),
            written_to,
            target_framework: conversion.target_framework,
            summary: conversion.summary,
        })
    }

    /// Convert every job, isolating failures
    pub fn convert_batch(&self, jobs: &[ProjectJob], output: &OutputTarget) -> BatchResult {
        let mut result = BatchResult::default();
        for job in jobs {
            match self.convert_job(job, output) {
                Ok(converted) => {
                    info!(
                        "Wrote {} ({})",
                        converted.written_to.display(),
                        converted.target_framework
                    );
                    result.converted.push(converted);
                }
                Err(e) => {
                    error!("Failed to convert {}: {}", job.project.display(), e);
                    result.failures.push((job.project.clone(), e));
                }
            }
        }
        result
    }
}

/// Serialize and atomically replace `destination`
pub fn write_document(document: &ProjectDocument, destination: &Path) -> Result<()> {
    let xml = document.to_xml_string()?;

    let dir = match destination.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut temp = NamedTempFile::new_in(dir).map_err(|e| Error::io(dir, e))?;
    temp.write_all(xml.as_bytes())
        .map_err(|e| Error::io(temp.path(), e))?;
    temp.persist(destination)
        .map_err(|e| Error::io(destination, e.error))?;
    Ok(())
}
