// src/baseline/style.rs

//! Project style classification

use strum_macros::{Display, EnumString};

use crate::project::ProjectDocument;
use crate::rules::facts::{COMMON_PROPS_IMPORT, LANGUAGE_TARGETS_IMPORTS, contains_ignore_case};
use crate::rules::items::{uses_windows_forms, uses_wpf};

/// What kind of legacy project this is, as far as conversion cares
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString)]
pub enum ProjectStyle {
    /// Common props plus a language targets import and nothing else
    #[default]
    Default,
    /// Only some of the standard imports
    DefaultSubset,
    /// A WinForms or WPF project with standard imports
    WindowsDesktop,
    /// Imports something beyond the standard set; imports are left alone
    Custom,
}

impl ProjectStyle {
    /// Whether the converter may swap the imports for an `Sdk` attribute
    pub fn replaces_imports(&self) -> bool {
        matches!(self, Self::Default | Self::WindowsDesktop)
    }
}

/// UI toolkits a desktop project uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Toolkits {
    pub windows_forms: bool,
    pub wpf: bool,
}

impl Toolkits {
    pub fn detect(document: &ProjectDocument) -> Self {
        Self {
            windows_forms: uses_windows_forms(document),
            wpf: uses_wpf(document),
        }
    }

    pub fn any(&self) -> bool {
        self.windows_forms || self.wpf
    }
}

fn is_language_targets(file_name: &str) -> bool {
    contains_ignore_case(LANGUAGE_TARGETS_IMPORTS, file_name)
}

/// Classify a legacy document by its imports and toolkit usage
pub fn classify_style(document: &ProjectDocument) -> ProjectStyle {
    if document.has_import_groups() {
        return ProjectStyle::Custom;
    }

    let mut has_props = false;
    let mut has_targets = false;
    for import in document.imports() {
        let file_name = import.file_name();
        if file_name.eq_ignore_ascii_case(COMMON_PROPS_IMPORT) {
            has_props = true;
        } else if is_language_targets(file_name) {
            has_targets = true;
        } else {
            tracing::debug!("Non-standard import {}", import.project);
            return ProjectStyle::Custom;
        }
    }

    if Toolkits::detect(document).any() {
        ProjectStyle::WindowsDesktop
    } else if has_props && has_targets {
        ProjectStyle::Default
    } else {
        ProjectStyle::DefaultSubset
    }
}
