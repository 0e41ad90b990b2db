// src/evaluation/mod.rs

//! Project evaluation boundary
//!
//! Evaluating a project (expanding properties, running globs, applying SDK
//! defaults) is the build engine's job. The converter only needs the result:
//! an immutable [`ConfiguredSnapshot`] per configuration. The [`Evaluator`]
//! trait is that narrow capability; [`RecordedEvaluator`] serves snapshots
//! captured ahead of time.

mod configuration;
mod recorded;
mod snapshot;

pub use configuration::{Configuration, ConfigurationSelector, DEFAULT_PLATFORM, GroupScope};
pub use recorded::{RecordedEvaluator, SnapshotFile};
pub use snapshot::{ConfiguredSnapshot, EvaluatedItem, UnconfiguredProject};

use std::collections::{BTreeMap, BTreeSet};
use strum_macros::{Display, EnumString};

use crate::error::Result;
use crate::project::ProjectDocument;

/// Which project an evaluation request is for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum EvaluationPurpose {
    /// The legacy project as it is on disk
    Legacy,
    /// The synthetic SDK-style baseline
    Baseline,
}

/// Everything the build engine needs to evaluate one configuration
#[derive(Debug)]
pub struct EvaluationRequest<'a> {
    pub purpose: EvaluationPurpose,
    pub document: &'a ProjectDocument,
    pub configuration: &'a Configuration,
    pub global_properties: BTreeMap<String, String>,
}

impl<'a> EvaluationRequest<'a> {
    pub fn new(
        purpose: EvaluationPurpose,
        document: &'a ProjectDocument,
        configuration: &'a Configuration,
    ) -> Self {
        Self {
            purpose,
            document,
            configuration,
            global_properties: configuration.global_properties(),
        }
    }
}

/// Given a project and global overrides, produce an immutable snapshot
pub trait Evaluator {
    fn evaluate(&self, request: &EvaluationRequest<'_>) -> Result<ConfiguredSnapshot>;
}

/// Configurations declared by a document's conditioned groups
///
/// Conditions that only name a configuration get the default platform. A
/// document without any configuration conditions yields `Debug|AnyCPU` and
/// `Release|AnyCPU`.
pub fn declared_configurations(document: &ProjectDocument) -> BTreeSet<Configuration> {
    let scopes = document
        .property_groups()
        .map(|g| g.scope())
        .chain(document.item_groups().map(|g| g.scope()));

    let mut configurations = BTreeSet::new();
    for scope in scopes {
        if let GroupScope::Configured(selector) = scope {
            let platform = selector.platform.as_deref().unwrap_or(DEFAULT_PLATFORM);
            configurations.insert(Configuration::new(selector.name.as_str(), platform));
        }
    }

    if configurations.is_empty() {
        configurations.insert(Configuration::new("Debug", DEFAULT_PLATFORM));
        configurations.insert(Configuration::new("Release", DEFAULT_PLATFORM));
    }
    configurations
}

/// Evaluate every configuration of a document into an [`UnconfiguredProject`]
pub fn evaluate_all<'a, E, I>(
    evaluator: &E,
    purpose: EvaluationPurpose,
    document: &ProjectDocument,
    configurations: I,
) -> Result<UnconfiguredProject>
where
    E: Evaluator + ?Sized,
    I: IntoIterator<Item = &'a Configuration>,
{
    let mut project = UnconfiguredProject::new();
    for configuration in configurations {
        let request = EvaluationRequest::new(purpose, document, configuration);
        let snapshot = evaluator.evaluate(&request)?;
        tracing::debug!("Evaluated {} project for {}", purpose, configuration);
        project.insert(configuration.clone(), snapshot);
    }
    Ok(project)
}
