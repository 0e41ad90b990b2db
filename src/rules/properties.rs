// src/rules/properties.rs

//! Property rules that hold regardless of the baseline evaluation
//!
//! These are canonical SDK defaults: a legacy property spelling out one of
//! them is redundant whatever the evaluated baseline says.

use super::facts::{
    DEFAULT_PROPERTY_VALUES, GENERATE_DOCUMENTATION_FILE, UNNECESSARY_PROPERTIES,
    contains_ignore_case,
};
use crate::project::Property;

/// What the property group a property sits in tells the rules
#[derive(Debug, Clone, Copy, Default)]
pub struct PropertyContext<'a> {
    /// Project file base name
    pub project_name: Option<&'a str>,
    /// Configuration name the owning group is conditioned on
    pub configuration_name: Option<&'a str>,
    /// Platform the owning group is conditioned on, if it names one
    pub platform_name: Option<&'a str>,
}

/// Outcome of checking one property
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyVerdict {
    Keep,
    Remove,
    /// Remove and put this property in its place
    Replace(Property),
}

/// Classify a property against the fixed SDK defaults
pub fn classify_property(property: &Property, ctx: &PropertyContext<'_>) -> PropertyVerdict {
    if is_default_fallback(property) {
        return PropertyVerdict::Remove;
    }

    // A property with its own condition is not a plain default
    if property.condition.is_some() {
        return PropertyVerdict::Keep;
    }

    if contains_ignore_case(UNNECESSARY_PROPERTIES, &property.name) {
        return PropertyVerdict::Remove;
    }

    let value = property.value.trim();
    let has_default_value = DEFAULT_PROPERTY_VALUES
        .iter()
        .any(|(name, default)| property.is_named(name) && value.eq_ignore_ascii_case(default));
    if has_default_value {
        return PropertyVerdict::Remove;
    }

    if property.is_named("OutputPath")
        && is_default_output_path(value, ctx.configuration_name, ctx.platform_name)
    {
        return PropertyVerdict::Remove;
    }

    if (property.is_named("AssemblyName") || property.is_named("RootNamespace"))
        && ctx
            .project_name
            .is_some_and(|name| value.eq_ignore_ascii_case(name))
    {
        return PropertyVerdict::Remove;
    }

    if property.is_named("DocumentationFile")
        && is_default_documentation_file(
            value,
            ctx.configuration_name,
            ctx.platform_name,
            ctx.project_name,
        )
    {
        return PropertyVerdict::Replace(Property::new(GENERATE_DOCUMENTATION_FILE, "true"));
    }

    if property.is_named("DefineConstants")
        && is_default_define_constants(value, ctx.configuration_name)
    {
        return PropertyVerdict::Remove;
    }

    PropertyVerdict::Keep
}

/// `<Configuration Condition="'$(Configuration)' == ''">Debug</Configuration>`
/// and the matching `AnyCPU` platform fallback
fn is_default_fallback(property: &Property) -> bool {
    let Some(condition) = property.condition.as_deref() else {
        return false;
    };
    let condition: String = condition.chars().filter(|c| !c.is_whitespace()).collect();
    let value = property.value.trim();

    (property.is_named("Configuration")
        && value.eq_ignore_ascii_case("Debug")
        && condition.eq_ignore_ascii_case("'$(Configuration)'==''"))
        || (property.is_named("Platform")
            && value.eq_ignore_ascii_case("AnyCPU")
            && condition.eq_ignore_ascii_case("'$(Platform)'==''"))
}

fn normalize_path(value: &str) -> String {
    let mut path = value.trim().replace('/', "\\").to_ascii_lowercase();
    if !path.ends_with('\\') {
        path.push('\\');
    }
    path
}

fn is_any_cpu(platform: &str) -> bool {
    platform.replace(' ', "").eq_ignore_ascii_case("AnyCPU")
}

/// The SDK's output directory: `bin\<Configuration>\` under AnyCPU (or no
/// platform), `bin\<Platform>\<Configuration>\` under any other platform.
/// `bin\$(Configuration)\` counts for groups that pin no other platform.
pub fn is_default_output_path(
    value: &str,
    configuration_name: Option<&str>,
    platform_name: Option<&str>,
) -> bool {
    let path = normalize_path(value);
    if let Some(platform) = platform_name.filter(|p| !is_any_cpu(p)) {
        return configuration_name.is_some_and(|config| {
            path == format!(
                "bin\\{}\\{}\\",
                platform.trim().to_ascii_lowercase(),
                config.to_ascii_lowercase()
            )
        });
    }

    path == "bin\\$(configuration)\\"
        || configuration_name
            .is_some_and(|config| path == format!("bin\\{}\\", config.to_ascii_lowercase()))
}

/// `bin\<Configuration>\<ProjectName>.xml` and its property-based spellings
pub fn is_default_documentation_file(
    value: &str,
    configuration_name: Option<&str>,
    platform_name: Option<&str>,
    project_name: Option<&str>,
) -> bool {
    let path = value.trim().replace('/', "\\").to_ascii_lowercase();
    let Some(file) = path.strip_suffix(".xml") else {
        return false;
    };

    let (dir, stem) = match file.rfind('\\') {
        Some(pos) => (&file[..=pos], &file[pos + 1..]),
        None if file.starts_with("$(outputpath)") => ("$(outputpath)", &file["$(outputpath)".len()..]),
        None => return false,
    };

    let stem_ok = stem == "$(assemblyname)"
        || project_name.is_some_and(|name| stem == name.to_ascii_lowercase());
    let dir_ok = dir == "$(outputpath)"
        || dir == "$(outputpath)\\"
        || is_default_output_path(dir, configuration_name, platform_name);

    stem_ok && dir_ok
}

/// `DEBUG;TRACE` in Debug, `TRACE` in Release, in any order
pub fn is_default_define_constants(value: &str, configuration_name: Option<&str>) -> bool {
    let Some(config) = configuration_name else {
        return false;
    };

    let mut symbols: Vec<String> = value
        .split(';')
        .map(|s| s.trim().to_ascii_uppercase())
        .filter(|s| !s.is_empty())
        .collect();
    symbols.sort();
    symbols.dedup();

    if config.eq_ignore_ascii_case("Debug") {
        symbols == ["DEBUG", "TRACE"]
    } else if config.eq_ignore_ascii_case("Release") {
        symbols == ["TRACE"]
    } else {
        false
    }
}
