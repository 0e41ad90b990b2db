// src/lib.rs

//! sdkify
//!
//! Migrates legacy MSBuild project files to minimal SDK-style projects.
//!
//! # Architecture
//!
//! - Evaluation is external: the [`Evaluator`] trait supplies resolved
//!   property and item values per configuration
//! - Baseline: the project re-imagined as a bare `<Project Sdk>` and evaluated
//!   the same way, so whatever it yields is what the SDK provides for free
//! - Differ: legacy vs baseline, per configuration
//! - Converter: an ordered pipeline of document rewrites driven by the
//!   differs and fixed rule tables

pub mod baseline;
pub mod convert;
pub mod diff;
mod error;
pub mod evaluation;
pub mod ignore_case;
pub mod manifest;
pub mod options;
pub mod project;
pub mod rules;
pub mod workspace;

pub use baseline::{BaselineBuilder, BaselineProject, ProjectStyle, Toolkits};
pub use convert::{Conversion, ConversionSummary, Converter};
pub use diff::{Classification, DiffReport, Differ, Differs, generate_report};
pub use error::{Error, Result};
pub use evaluation::{
    Configuration, ConfiguredSnapshot, EvaluatedItem, EvaluationPurpose, EvaluationRequest,
    Evaluator, GroupScope, RecordedEvaluator, SnapshotFile, UnconfiguredProject,
};
pub use manifest::{ManifestConverter, PackageEntry, PackagesConfigReader};
pub use options::ConvertOptions;
pub use project::ProjectDocument;
pub use workspace::{BatchResult, OutputTarget, ProjectJob, Workspace};
