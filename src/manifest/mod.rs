// src/manifest/mod.rs

//! Legacy package manifests
//!
//! Legacy projects list their NuGet dependencies in a flat `packages.config`
//! next to the project file. The converter only needs the `(id, version)`
//! pairs; which of them survive is decided by [`crate::rules::packages`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

use crate::error::{Error, Result};
use crate::project::element::parse_xml;

/// One package dependency
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageEntry {
    pub id: String,
    pub version: String,
}

impl PackageEntry {
    pub fn new(id: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            version: version.into(),
        }
    }
}

impl fmt::Display for PackageEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.id, self.version)
    }
}

/// Turns a manifest file into an ordered package list
pub trait ManifestConverter {
    fn convert(&self, manifest: &Path) -> Result<Vec<PackageEntry>>;
}

/// Reads `<package id="..." version="..."/>` entries from `packages.config`
#[derive(Debug, Clone, Copy, Default)]
pub struct PackagesConfigReader;

impl PackagesConfigReader {
    /// Parse manifest text
    pub fn parse(text: &str) -> Result<Vec<PackageEntry>> {
        let xml = parse_xml(text).map_err(|e| Error::Manifest(e.to_string()))?;
        if !xml.root.name.eq_ignore_ascii_case("packages") {
            return Err(Error::Manifest(format!(
                "Root element is <{}>, expected <packages>",
                xml.root.name
            )));
        }

        let mut entries = Vec::new();
        for element in xml.root.child_elements() {
            if !element.name.eq_ignore_ascii_case("package") {
                continue;
            }
            match (element.attribute("id"), element.attribute("version")) {
                (Some(id), Some(version)) if !id.trim().is_empty() => {
                    entries.push(PackageEntry::new(id.trim(), version.trim()));
                }
                _ => {
                    tracing::warn!("Skipping package entry without id or version");
                }
            }
        }
        Ok(entries)
    }
}

impl ManifestConverter for PackagesConfigReader {
    fn convert(&self, manifest: &Path) -> Result<Vec<PackageEntry>> {
        let text = std::fs::read_to_string(manifest).map_err(|e| Error::io(manifest, e))?;
        Self::parse(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_packages_config() {
        let entries = PackagesConfigReader::parse(
            r#"<?xml version="1.0" encoding="utf-8"?>
<packages>
  <package id="Newtonsoft.Json" version="12.0.3" targetFramework="net472" />
  <package id="Serilog" version="2.10.0" targetFramework="net472" />
</packages>"#,
        )
        .unwrap();
        assert_eq!(
            entries,
            vec![
                PackageEntry::new("Newtonsoft.Json", "12.0.3"),
                PackageEntry::new("Serilog", "2.10.0"),
            ]
        );
    }

    #[test]
    fn test_entries_without_version_are_skipped() {
        let entries = PackagesConfigReader::parse(
            r#"<packages><package id="A" /><package id="B" version="1.0.0" /></packages>"#,
        )
        .unwrap();
        assert_eq!(entries, vec![PackageEntry::new("B", "1.0.0")]);
    }

    #[test]
    fn test_wrong_root_is_an_error() {
        let err = PackagesConfigReader::parse("<Project />").unwrap_err();
        assert!(matches!(err, Error::Manifest(_)));
    }

    #[test]
    fn test_convert_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("packages.config");
        std::fs::write(&path, r#"<packages><package id="Dapper" version="2.0.123" /></packages>"#).unwrap();

        let entries = PackagesConfigReader.convert(&path).unwrap();
        assert_eq!(entries, vec![PackageEntry::new("Dapper", "2.0.123")]);

        let missing = PackagesConfigReader.convert(&dir.path().join("nope.config"));
        assert!(matches!(missing, Err(Error::Io { .. })));
    }
}
