// src/baseline/builder.rs

//! Building the SDK-style baseline
//!
//! The baseline is the legacy project rewritten as a bare `<Project Sdk>`
//! with only its framework, output type and toolkit switches, evaluated for
//! the same configurations. Whatever the baseline evaluates to is what the
//! SDK supplies without being asked.

use std::collections::BTreeSet;

use super::style::{ProjectStyle, Toolkits, classify_style};
use crate::error::Result;
use crate::evaluation::{EvaluationPurpose, Evaluator, UnconfiguredProject, evaluate_all};
use crate::ignore_case::IgnoreCase;
use crate::options::ConvertOptions;
use crate::project::{ProjectChild, ProjectDocument, PropertyGroup};
use crate::rules::facts::{
    DEFAULT_OUTPUT_TYPE, DEFAULT_SDK, DESKTOP_SDK, OUTPUT_TYPE, TARGET_FRAMEWORK,
    TARGET_FRAMEWORK_VERSION, USE_WINDOWS_FORMS, USE_WPF,
};
use crate::rules::tfm::moniker_from_framework_version;

/// The evaluated baseline plus what the converter needs to know about it
#[derive(Debug, Clone)]
pub struct BaselineProject {
    /// Baseline snapshots, keyed like the legacy project
    pub project: UnconfiguredProject,
    pub style: ProjectStyle,
    pub toolkits: Toolkits,
    /// Properties set on the baseline only to make the comparison valid
    pub global_properties: BTreeSet<IgnoreCase>,
    /// Properties every converted project gets, in order
    pub target_project_properties: Vec<(String, String)>,
    /// Framework moniker the baseline was built for
    pub target_framework: String,
    pub output_type: String,
}

impl BaselineProject {
    pub fn is_injected(&self, name: &str) -> bool {
        self.global_properties.contains(&IgnoreCase::from(name))
    }

    /// `TargetFramework` as the baseline evaluated it for its first configuration
    pub fn evaluated_target_framework(&self) -> &str {
        self.project
            .first()
            .and_then(|(_, snapshot)| snapshot.property(TARGET_FRAMEWORK))
            .filter(|tfm| !tfm.trim().is_empty())
            .unwrap_or(self.target_framework.as_str())
    }
}

/// Produces a [`BaselineProject`] for a legacy document
pub struct BaselineBuilder<'a, E: Evaluator + ?Sized> {
    evaluator: &'a E,
    options: &'a ConvertOptions,
}

impl<'a, E: Evaluator + ?Sized> BaselineBuilder<'a, E> {
    pub fn new(evaluator: &'a E, options: &'a ConvertOptions) -> Self {
        Self { evaluator, options }
    }

    /// Classify, synthesize and evaluate the baseline for every legacy
    /// configuration
    pub fn build(&self, document: &ProjectDocument, legacy: &UnconfiguredProject) -> Result<BaselineProject> {
        let style = classify_style(document);
        let toolkits = if style == ProjectStyle::WindowsDesktop {
            Toolkits::detect(document)
        } else {
            Toolkits::default()
        };

        let target_framework = self.resolve_target_framework(document, legacy, style);
        let output_type = resolve_output_type(legacy);
        tracing::debug!(
            "Baseline style {} targeting {} ({})",
            style,
            target_framework,
            output_type
        );

        let baseline_document = baseline_document(document, style, toolkits, &target_framework, &output_type);
        let project = evaluate_all(
            self.evaluator,
            EvaluationPurpose::Baseline,
            &baseline_document,
            legacy.configurations(),
        )?;

        let mut global_properties = BTreeSet::from([IgnoreCase::from(OUTPUT_TYPE)]);
        for name in [TARGET_FRAMEWORK, USE_WINDOWS_FORMS, USE_WPF] {
            if document.unconditioned_property(name).is_some() {
                global_properties.insert(IgnoreCase::from(name));
            }
        }

        Ok(BaselineProject {
            project,
            style,
            toolkits,
            global_properties,
            target_project_properties: self.options.target_property_pairs(),
            target_framework,
            output_type,
        })
    }

    /// Declared moniker first, then the current framework when asked to keep
    /// it, then the desktop or configured default
    fn resolve_target_framework(
        &self,
        document: &ProjectDocument,
        legacy: &UnconfiguredProject,
        style: ProjectStyle,
    ) -> String {
        if let Some(declared) = document.unconditioned_property(TARGET_FRAMEWORK) {
            return declared.value.trim().to_string();
        }

        if self.options.keep_current_tfm {
            let version = document
                .unconditioned_property(TARGET_FRAMEWORK_VERSION)
                .map(|p| p.value.as_str())
                .or_else(|| {
                    legacy
                        .first()
                        .and_then(|(_, snapshot)| snapshot.property(TARGET_FRAMEWORK_VERSION))
                });
            match version.and_then(moniker_from_framework_version) {
                Some(moniker) => return moniker,
                None => tracing::warn!("No usable TargetFrameworkVersion to keep, retargeting"),
            }
        }

        if style == ProjectStyle::WindowsDesktop {
            self.options.desktop_target_framework.clone()
        } else {
            self.options.target_framework.clone()
        }
    }
}

fn resolve_output_type(legacy: &UnconfiguredProject) -> String {
    legacy
        .first()
        .and_then(|(_, snapshot)| snapshot.property(OUTPUT_TYPE))
        .filter(|value| !value.trim().is_empty())
        .unwrap_or(DEFAULT_OUTPUT_TYPE)
        .to_string()
}

/// The bare SDK-style project the baseline is evaluated from
pub fn baseline_document(
    legacy: &ProjectDocument,
    style: ProjectStyle,
    toolkits: Toolkits,
    target_framework: &str,
    output_type: &str,
) -> ProjectDocument {
    let mut document = ProjectDocument::new();
    if let Some(path) = legacy.path() {
        document = document.with_path(path);
    }

    let sdk = if style == ProjectStyle::WindowsDesktop {
        DESKTOP_SDK
    } else {
        DEFAULT_SDK
    };
    document.set_attribute("Sdk", sdk);

    let mut group = PropertyGroup::default();
    group.set_if_absent(TARGET_FRAMEWORK, target_framework);
    group.set_if_absent(OUTPUT_TYPE, output_type);
    if toolkits.windows_forms {
        group.set_if_absent(USE_WINDOWS_FORMS, "true");
    }
    if toolkits.wpf {
        group.set_if_absent(USE_WPF, "true");
    }
    document.children.push(ProjectChild::PropertyGroup(group));
    document
}
