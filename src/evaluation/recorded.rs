// src/evaluation/recorded.rs

//! Snapshots recorded ahead of time
//!
//! The build engine runs elsewhere and dumps what it evaluated to JSON:
//!
//! ```json
//! {
//!   "legacy":   { "Debug|AnyCPU": { "properties": {...}, "items": {...} } },
//!   "baseline": { "Debug|AnyCPU": { "properties": {...}, "items": {...} } }
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use super::snapshot::{ConfiguredSnapshot, UnconfiguredProject};
use super::{EvaluationPurpose, EvaluationRequest, Evaluator};
use crate::error::{Error, Result};

/// Legacy and baseline snapshots for every configuration of one project
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SnapshotFile {
    pub legacy: UnconfiguredProject,
    pub baseline: UnconfiguredProject,
}

impl SnapshotFile {
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Self::from_json(&text)
    }
}

/// An [`Evaluator`] that answers from a [`SnapshotFile`]
#[derive(Debug, Clone)]
pub struct RecordedEvaluator {
    snapshots: SnapshotFile,
}

impl RecordedEvaluator {
    pub fn new(snapshots: SnapshotFile) -> Self {
        Self { snapshots }
    }

    pub fn load(path: &Path) -> Result<Self> {
        Ok(Self::new(SnapshotFile::load(path)?))
    }

    fn project(&self, purpose: EvaluationPurpose) -> &UnconfiguredProject {
        match purpose {
            EvaluationPurpose::Legacy => &self.snapshots.legacy,
            EvaluationPurpose::Baseline => &self.snapshots.baseline,
        }
    }
}

impl Evaluator for RecordedEvaluator {
    fn evaluate(&self, request: &EvaluationRequest<'_>) -> Result<ConfiguredSnapshot> {
        self.project(request.purpose)
            .get(request.configuration)
            .cloned()
            .ok_or_else(|| Error::MissingSnapshot {
                purpose: request.purpose.to_string(),
                configuration: request.configuration.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::Configuration;
    use crate::project::ProjectDocument;

    const SNAPSHOTS: &str = r#"{
        "legacy": {
            "Debug|AnyCPU": { "properties": { "DebugType": "full" } }
        },
        "baseline": {
            "Debug|AnyCPU": { "properties": { "DebugType": "portable" } }
        }
    }"#;

    #[test]
    fn test_recorded_evaluator_serves_by_purpose() {
        let evaluator = RecordedEvaluator::new(SnapshotFile::from_json(SNAPSHOTS).unwrap());
        let doc = ProjectDocument::new();
        let config = Configuration::parse("debug|anycpu");

        let legacy = evaluator
            .evaluate(&EvaluationRequest::new(EvaluationPurpose::Legacy, &doc, &config))
            .unwrap();
        assert_eq!(legacy.property("DebugType"), Some("full"));

        let baseline = evaluator
            .evaluate(&EvaluationRequest::new(EvaluationPurpose::Baseline, &doc, &config))
            .unwrap();
        assert_eq!(baseline.property("DebugType"), Some("portable"));
    }

    #[test]
    fn test_recorded_evaluator_missing_configuration() {
        let evaluator = RecordedEvaluator::new(SnapshotFile::from_json(SNAPSHOTS).unwrap());
        let doc = ProjectDocument::new();
        let config = Configuration::parse("Release|AnyCPU");

        let err = evaluator
            .evaluate(&EvaluationRequest::new(EvaluationPurpose::Legacy, &doc, &config))
            .unwrap_err();
        assert!(matches!(err, Error::MissingSnapshot { .. }));
        assert!(err.to_string().contains("Release|AnyCPU"));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(SnapshotFile::from_json("{"), Err(Error::Json(_))));
    }
}
