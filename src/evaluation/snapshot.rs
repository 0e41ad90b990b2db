// src/evaluation/snapshot.rs

//! Evaluated project snapshots
//!
//! A snapshot is what the build engine reports for one configuration of a
//! project: the final value of every property and the evaluated items of
//! every item type. Snapshots are immutable once captured.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::configuration::Configuration;
use crate::ignore_case::{IgnoreCase, same_include};

/// One evaluated item: its expanded include path and direct metadata
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluatedItem {
    pub include: String,
    #[serde(default)]
    pub metadata: BTreeMap<IgnoreCase, String>,
}

impl EvaluatedItem {
    pub fn new(include: impl Into<String>) -> Self {
        Self {
            include: include.into(),
            metadata: BTreeMap::new(),
        }
    }

    /// Builder-style metadata setter
    pub fn with_metadata(mut self, name: &str, value: impl Into<String>) -> Self {
        self.metadata.insert(IgnoreCase::from(name), value.into());
        self
    }

    pub fn metadata_value(&self, name: &str) -> Option<&str> {
        self.metadata
            .get(&IgnoreCase::from(name))
            .map(String::as_str)
    }

    pub fn same_include(&self, other: &EvaluatedItem) -> bool {
        same_include(&self.include, &other.include)
    }

    /// Metadata equality, names and values compared case-insensitively
    pub fn same_metadata(&self, other: &EvaluatedItem) -> bool {
        self.metadata.len() == other.metadata.len()
            && self.metadata.iter().all(|(name, value)| {
                other
                    .metadata
                    .get(name)
                    .is_some_and(|v| v.eq_ignore_ascii_case(value))
            })
    }
}

/// Properties and items of one project, evaluated for one configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfiguredSnapshot {
    #[serde(default)]
    properties: BTreeMap<IgnoreCase, String>,
    #[serde(default)]
    items: BTreeMap<IgnoreCase, Vec<EvaluatedItem>>,
}

impl ConfiguredSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_property(mut self, name: &str, value: impl Into<String>) -> Self {
        self.properties.insert(IgnoreCase::from(name), value.into());
        self
    }

    pub fn with_item(mut self, item_type: &str, item: EvaluatedItem) -> Self {
        self.items
            .entry(IgnoreCase::from(item_type))
            .or_default()
            .push(item);
        self
    }

    /// Evaluated value of a property, if the project defines it
    pub fn property(&self, name: &str) -> Option<&str> {
        self.properties
            .get(&IgnoreCase::from(name))
            .map(String::as_str)
    }

    pub fn properties(&self) -> impl Iterator<Item = (&IgnoreCase, &str)> {
        self.properties.iter().map(|(k, v)| (k, v.as_str()))
    }

    pub fn item_types(&self) -> impl Iterator<Item = &IgnoreCase> {
        self.items.keys()
    }

    /// Evaluated items of one type, empty when the type is absent
    pub fn items(&self, item_type: &str) -> &[EvaluatedItem] {
        self.items
            .get(&IgnoreCase::from(item_type))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn find_item(&self, item_type: &str, include: &str) -> Option<&EvaluatedItem> {
        self.items(item_type)
            .iter()
            .find(|item| same_include(&item.include, include))
    }
}

/// Every configuration of one project, each with its own snapshot
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnconfiguredProject {
    configured: BTreeMap<Configuration, ConfiguredSnapshot>,
}

impl UnconfiguredProject {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, configuration: Configuration, snapshot: ConfiguredSnapshot) {
        self.configured.insert(configuration, snapshot);
    }

    pub fn with_configuration(mut self, key: &str, snapshot: ConfiguredSnapshot) -> Self {
        self.insert(Configuration::parse(key), snapshot);
        self
    }

    pub fn get(&self, configuration: &Configuration) -> Option<&ConfiguredSnapshot> {
        self.configured.get(configuration)
    }

    pub fn configurations(&self) -> impl Iterator<Item = &Configuration> {
        self.configured.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Configuration, &ConfiguredSnapshot)> {
        self.configured.iter()
    }

    /// The first configuration in key order
    pub fn first(&self) -> Option<(&Configuration, &ConfiguredSnapshot)> {
        self.configured.iter().next()
    }

    pub fn len(&self) -> usize {
        self.configured.len()
    }

    pub fn is_empty(&self) -> bool {
        self.configured.is_empty()
    }
}
