// src/rules/globs.rs

//! Default item globs of SDK-style projects
//!
//! The SDK includes `Compile`, `EmbeddedResource` and `None` items by glob,
//! and the desktop SDK adds XAML pages. A legacy item whose include one of
//! these globs already matches can be dropped from the converted project.

use glob::{MatchOptions, Pattern};
use strum_macros::{Display, EnumString};

use super::facts::{DESKTOP_GLOBBED_ITEM_TYPES, GLOBBED_ITEM_TYPES, contains_ignore_case};

/// Source language, inferred from the project file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
pub enum ProjectLanguage {
    #[default]
    #[strum(serialize = "csharp")]
    CSharp,
    #[strum(serialize = "visualbasic")]
    VisualBasic,
    #[strum(serialize = "fsharp")]
    FSharp,
}

impl ProjectLanguage {
    /// `csproj` -> C#, `vbproj` -> VB, `fsproj` -> F#; anything else is C#
    pub fn from_extension(extension: Option<&str>) -> Self {
        match extension.map(str::to_ascii_lowercase).as_deref() {
            Some("vbproj") => Self::VisualBasic,
            Some("fsproj") => Self::FSharp,
            _ => Self::CSharp,
        }
    }

    fn compile_glob(&self) -> Option<&'static str> {
        match self {
            Self::CSharp => Some("**/*.cs"),
            Self::VisualBasic => Some("**/*.vb"),
            // F# compile order is significant, so nothing is globbed
            Self::FSharp => None,
        }
    }
}

const DEFAULT_EXCLUDES: &[&str] = &["bin/**", "obj/**", "**/.*/**", "**/*.user", "**/*.*proj", "**/*.sln"];

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: false,
    require_literal_separator: false,
    require_literal_leading_dot: false,
};

fn matches_any(patterns: &[&str], path: &str) -> bool {
    patterns.iter().any(|p| {
        Pattern::new(p)
            .map(|pattern| pattern.matches_with(path, MATCH_OPTIONS))
            .unwrap_or(false)
    })
}

/// Whether an item type is discovered by globs at all
pub fn is_globbed_item_type(item_type: &str, language: ProjectLanguage, desktop: bool) -> bool {
    if item_type.eq_ignore_ascii_case("Compile") && language.compile_glob().is_none() {
        return false;
    }
    contains_ignore_case(GLOBBED_ITEM_TYPES, item_type)
        || (desktop && contains_ignore_case(DESKTOP_GLOBBED_ITEM_TYPES, item_type))
}

/// Include paths inside the project directory without wildcards or properties
fn is_plain_relative_path(include: &str) -> bool {
    !include.is_empty()
        && !include.contains(['*', '?', '$', '%', '@', ';'])
        && !include.starts_with(['/', '\\'])
        && !include.contains(':')
        && !include.split(['/', '\\']).any(|segment| segment == "..")
}

/// Whether the SDK's own globs would include this file as this item type
pub fn is_covered_by_default_glob(
    item_type: &str,
    include: &str,
    language: ProjectLanguage,
    desktop: bool,
) -> bool {
    if !is_plain_relative_path(include) || !is_globbed_item_type(item_type, language, desktop) {
        return false;
    }

    let path = include.replace('\\', "/");
    if matches_any(DEFAULT_EXCLUDES, &path) {
        return false;
    }

    let compile = language.compile_glob();
    let is_compile = compile.is_some_and(|g| matches_any(&[g], &path));
    let is_resource = matches_any(&["**/*.resx"], &path);
    let is_xaml = desktop && matches_any(&["**/*.xaml"], &path);

    let is_app_definition = is_xaml && matches_any(&["App.xaml", "Application.xaml"], &path);

    match item_type.to_ascii_lowercase().as_str() {
        "compile" => is_compile,
        "embeddedresource" => is_resource,
        "page" => is_xaml && !is_app_definition,
        "applicationdefinition" => is_app_definition,
        "none" => !is_compile && !is_resource && !is_xaml,
        _ => false,
    }
}
