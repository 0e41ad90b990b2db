// src/rules/packages.rs

//! Package inclusion policy
//!
//! Decides which legacy packages are carried over as `PackageReference`
//! items and which framework references become packages.

use super::facts::{PACKAGE_DENYLIST, REFERENCE_PACKAGE_EQUIVALENTS, contains_ignore_case};
use super::tfm::{FrameworkVersion, TargetFramework};
use crate::manifest::PackageEntry;

/// Packages the SDK or toolchain supplies on its own
pub fn is_denylisted_package(id: &str) -> bool {
    contains_ignore_case(PACKAGE_DENYLIST, id)
}

/// Whether the framework already ships what this package provides
pub fn is_implicit_at(id: &str, framework: Option<&TargetFramework>) -> bool {
    let Some(tfm) = framework else {
        return false;
    };
    let id = id.to_ascii_lowercase();

    match id.as_str() {
        "system.valuetuple" => {
            tfm.is_net_framework_at_least(FrameworkVersion::new(4, 7, 0))
                || tfm.is_net_standard_at_least(FrameworkVersion::new(2, 0, 0))
                || tfm.is_core()
        }
        "system.runtime.interopservices.runtimeinformation" => {
            tfm.is_net_framework_at_least(FrameworkVersion::new(4, 7, 1))
                || tfm.is_net_standard_at_least(FrameworkVersion::new(2, 0, 0))
                || tfm.is_core()
        }
        "system.net.http" | "microsoft.csharp" => {
            tfm.is_core() || tfm.is_net_standard_at_least(FrameworkVersion::new(2, 0, 0))
        }
        "system.buffers" | "system.memory" | "system.numerics.vectors"
        | "system.threading.tasks.extensions" => {
            tfm.is_core_at_least(FrameworkVersion::new(2, 1, 0))
                || tfm.is_net_standard_at_least(FrameworkVersion::new(2, 1, 0))
        }
        _ => false,
    }
}

/// Whether a manifest entry should become a `PackageReference`
pub fn should_add_package(entry: &PackageEntry, framework: Option<&TargetFramework>) -> bool {
    !is_denylisted_package(&entry.id) && !is_implicit_at(&entry.id, framework)
}

/// The package that replaces a framework assembly reference
///
/// Only frameworks that dropped the assembly need one; .NET Framework
/// targets keep the plain reference.
pub fn package_equivalent(reference: &str, framework: Option<&TargetFramework>) -> Option<PackageEntry> {
    let tfm = framework?;
    if tfm.is_net_framework() {
        return None;
    }
    REFERENCE_PACKAGE_EQUIVALENTS
        .iter()
        .find(|(assembly, _, _)| assembly.eq_ignore_ascii_case(reference))
        .map(|(_, id, version)| PackageEntry::new(*id, *version))
}
