// src/diff/report.rs

//! Read-only diff report
//!
//! What the converter would act on, without touching the document.

use serde::Serialize;
use std::fmt::Write as _;

use super::differ::Differs;
use crate::baseline::BaselineProject;
use crate::error::Result;

/// Items of one type that differ from the baseline
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ItemTypeReport {
    pub item_type: String,
    pub defaulted: Vec<String>,
    pub changed: Vec<String>,
    pub introduced: Vec<String>,
}

/// Everything that differs for one configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConfigurationReport {
    pub configuration: String,
    pub defaulted_properties: Vec<String>,
    pub changed_properties: Vec<String>,
    pub items: Vec<ItemTypeReport>,
}

/// Diff report for one project
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DiffReport {
    pub project: Option<String>,
    pub style: String,
    pub target_framework: String,
    pub configurations: Vec<ConfigurationReport>,
}

/// Summarize every configuration's differ
pub fn generate_report(project: Option<&str>, baseline: &BaselineProject, differs: &Differs) -> DiffReport {
    let configurations = differs
        .iter()
        .map(|(configuration, differ)| {
            let properties = differ.properties_diff();
            let items = differ
                .items_diff()
                .iter()
                .filter(|diff| !diff.is_empty())
                .map(|diff| ItemTypeReport {
                    item_type: diff.item_type.clone(),
                    defaulted: diff.defaulted.iter().map(|i| i.include.clone()).collect(),
                    changed: diff.changed.iter().map(|i| i.include.clone()).collect(),
                    introduced: diff.introduced.iter().map(|i| i.include.clone()).collect(),
                })
                .collect();
            ConfigurationReport {
                configuration: configuration.to_string(),
                defaulted_properties: properties.defaulted.clone(),
                changed_properties: properties.changed.clone(),
                items,
            }
        })
        .collect();

    DiffReport {
        project: project.map(str::to_string),
        style: baseline.style.to_string(),
        target_framework: baseline.target_framework.clone(),
        configurations,
    }
}

impl DiffReport {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Plain-text rendering for the terminal
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        let name = self.project.as_deref().unwrap_or("<project>");
        let _ = writeln!(out, "{} ({}, {})", name, self.style, self.target_framework);

        for config in &self.configurations {
            let _ = writeln!(out, "\n[{}]", config.configuration);
            write_list(&mut out, "Defaulted properties", &config.defaulted_properties);
            write_list(&mut out, "Changed properties", &config.changed_properties);
            for items in &config.items {
                write_list(&mut out, &format!("Defaulted {} items", items.item_type), &items.defaulted);
                write_list(&mut out, &format!("Changed {} items", items.item_type), &items.changed);
                write_list(&mut out, &format!("Introduced {} items", items.item_type), &items.introduced);
            }
        }
        out
    }
}

fn write_list(out: &mut String, title: &str, entries: &[String]) {
    if entries.is_empty() {
        return;
    }
    let _ = writeln!(out, "  {title}:");
    for entry in entries {
        let _ = writeln!(out, "    - {entry}");
    }
}
