// src/options.rs

//! Conversion options
//!
//! Read from an optional TOML file; command-line flags override it.
//!
//! ```toml
//! target_framework = "net8.0"
//! desktop_target_framework = "net8.0-windows"
//! keep_current_tfm = false
//! backup = true
//!
//! [[target_property]]
//! name = "LangVersion"
//! value = "latest"
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Error, Result};

/// A property added to every converted project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetProperty {
    pub name: String,
    pub value: String,
}

/// Options for converting projects
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertOptions {
    /// Moniker for projects that do not keep their own
    pub target_framework: String,
    /// Moniker for WinForms and WPF projects
    pub desktop_target_framework: String,
    /// Retarget to the framework the legacy project already uses
    pub keep_current_tfm: bool,
    /// Keep the legacy file as `<name>.old` when writing in place
    pub backup: bool,
    /// Properties added to every converted project, in order
    #[serde(rename = "target_property")]
    pub target_properties: Vec<TargetProperty>,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            target_framework: "net8.0".to_string(),
            desktop_target_framework: "net8.0-windows".to_string(),
            keep_current_tfm: false,
            backup: true,
            target_properties: Vec::new(),
        }
    }
}

impl ConvertOptions {
    /// Load options from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Self::parse(&content)
    }

    /// Parse options from a TOML string
    pub fn parse(content: &str) -> Result<Self> {
        let options: ConvertOptions = toml::from_str(content)?;
        options.validate()?;
        Ok(options)
    }

    /// Reject monikers and property names that cannot be written
    pub fn validate(&self) -> Result<()> {
        if self.target_framework.trim().is_empty() || self.desktop_target_framework.trim().is_empty() {
            return Err(Error::InvalidOptions("target framework must not be empty".to_string()));
        }
        for property in &self.target_properties {
            let valid = property
                .name
                .chars()
                .next()
                .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
                && property
                    .name
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.');
            if !valid {
                return Err(Error::InvalidOptions(format!(
                    "'{}' is not a valid property name",
                    property.name
                )));
            }
        }
        Ok(())
    }

    /// Target properties as ordered `(name, value)` pairs
    pub fn target_property_pairs(&self) -> Vec<(String, String)> {
        self.target_properties
            .iter()
            .map(|p| (p.name.clone(), p.value.clone()))
            .collect()
    }
}
