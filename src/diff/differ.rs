// src/diff/differ.rs

//! Legacy vs. baseline comparison
//!
//! A [`Differ`] compares the legacy and baseline snapshots of one
//! configuration. [`Differs`] holds one per configuration and answers
//! questions for a group scope, which may span several configurations.

use std::collections::{BTreeMap, BTreeSet};

use crate::baseline::BaselineProject;
use crate::error::{Error, Result};
use crate::evaluation::{Configuration, ConfiguredSnapshot, EvaluatedItem, GroupScope, UnconfiguredProject};
use crate::ignore_case::{IgnoreCase, normalize_include, same_include};

/// How a declaration compares against the baseline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// The baseline supplies the same thing; the declaration can go
    Defaulted,
    /// Both have it but they differ; the declaration must be kept or rewritten
    Changed,
}

/// Property names classified for one configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertiesDiff {
    pub defaulted: Vec<String>,
    pub changed: Vec<String>,
}

impl PropertiesDiff {
    pub fn classify(&self, name: &str) -> Option<Classification> {
        if self.defaulted.iter().any(|n| n.eq_ignore_ascii_case(name)) {
            Some(Classification::Defaulted)
        } else if self.changed.iter().any(|n| n.eq_ignore_ascii_case(name)) {
            Some(Classification::Changed)
        } else {
            None
        }
    }

    pub fn is_empty(&self) -> bool {
        self.defaulted.is_empty() && self.changed.is_empty()
    }
}

/// Items of one type classified for one configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemsDiff {
    pub item_type: String,
    /// In both, with the same metadata
    pub defaulted: Vec<EvaluatedItem>,
    /// In both, with different metadata
    pub changed: Vec<EvaluatedItem>,
    /// Only in the baseline
    pub introduced: Vec<EvaluatedItem>,
}

impl ItemsDiff {
    fn contains(items: &[EvaluatedItem], include: &str) -> bool {
        items.iter().any(|i| same_include(&i.include, include))
    }

    pub fn classify(&self, include: &str) -> Option<Classification> {
        if Self::contains(&self.defaulted, include) {
            Some(Classification::Defaulted)
        } else if Self::contains(&self.changed, include) {
            Some(Classification::Changed)
        } else {
            None
        }
    }

    pub fn is_empty(&self) -> bool {
        self.defaulted.is_empty() && self.changed.is_empty() && self.introduced.is_empty()
    }
}

/// Comparison of one configuration's legacy and baseline snapshots
#[derive(Debug, Clone, Default)]
pub struct Differ {
    properties: PropertiesDiff,
    items: Vec<ItemsDiff>,
}

impl Differ {
    /// Compare two snapshots of the same configuration. Properties named in
    /// `injected` were set on the baseline on purpose and are never Defaulted.
    pub fn new(legacy: &ConfiguredSnapshot, baseline: &ConfiguredSnapshot, injected: &BTreeSet<IgnoreCase>) -> Self {
        Self {
            properties: diff_properties(legacy, baseline, injected),
            items: diff_items(legacy, baseline),
        }
    }

    pub fn properties_diff(&self) -> &PropertiesDiff {
        &self.properties
    }

    /// Item diffs, one per item type present in either snapshot
    pub fn items_diff(&self) -> &[ItemsDiff] {
        &self.items
    }

    pub fn items_diff_for(&self, item_type: &str) -> Option<&ItemsDiff> {
        self.items
            .iter()
            .find(|d| d.item_type.eq_ignore_ascii_case(item_type))
    }

    pub fn classify_item(&self, item_type: &str, include: &str) -> Option<Classification> {
        self.items_diff_for(item_type)?.classify(include)
    }
}

fn diff_properties(
    legacy: &ConfiguredSnapshot,
    baseline: &ConfiguredSnapshot,
    injected: &BTreeSet<IgnoreCase>,
) -> PropertiesDiff {
    let mut diff = PropertiesDiff::default();
    for (name, value) in legacy.properties() {
        let Some(baseline_value) = baseline.property(name.as_str()) else {
            continue;
        };
        if value.eq_ignore_ascii_case(baseline_value) {
            if !injected.contains(name) {
                diff.defaulted.push(name.to_string());
            }
        } else {
            diff.changed.push(name.to_string());
        }
    }
    diff
}

fn diff_items(legacy: &ConfiguredSnapshot, baseline: &ConfiguredSnapshot) -> Vec<ItemsDiff> {
    let item_types: BTreeSet<&IgnoreCase> = legacy.item_types().chain(baseline.item_types()).collect();

    let mut diffs = Vec::with_capacity(item_types.len());
    for item_type in item_types {
        let legacy_items = legacy.items(item_type.as_str());
        let baseline_items = baseline.items(item_type.as_str());

        let mut diff = ItemsDiff {
            item_type: item_type.to_string(),
            ..ItemsDiff::default()
        };

        for item in legacy_items {
            match baseline_items.iter().find(|b| b.same_include(item)) {
                Some(implicit) if implicit.same_metadata(item) => diff.defaulted.push(item.clone()),
                Some(_) => diff.changed.push(item.clone()),
                None => {}
            }
        }

        for item in baseline_items {
            if !legacy_items.iter().any(|l| l.same_include(item)) {
                diff.introduced.push(item.clone());
            }
        }

        diffs.push(diff);
    }
    diffs
}

/// One [`Differ`] per configuration
#[derive(Debug, Clone, Default)]
pub struct Differs {
    differs: BTreeMap<Configuration, Differ>,
}

impl Differs {
    /// Pair every legacy configuration with its baseline; the two must have
    /// exactly the same configurations
    pub fn build(legacy: &UnconfiguredProject, baseline: &BaselineProject) -> Result<Self> {
        let legacy_keys: BTreeSet<&Configuration> = legacy.configurations().collect();
        let baseline_keys: BTreeSet<&Configuration> = baseline.project.configurations().collect();
        if legacy_keys != baseline_keys {
            let describe = |keys: &BTreeSet<&Configuration>| {
                keys.iter()
                    .map(|c| c.to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            };
            return Err(Error::ConfigurationMismatch(format!(
                "legacy has [{}], baseline has [{}]",
                describe(&legacy_keys),
                describe(&baseline_keys)
            )));
        }

        let mut differs = BTreeMap::new();
        for (configuration, legacy_snapshot) in legacy.iter() {
            let Some(baseline_snapshot) = baseline.project.get(configuration) else {
                return Err(Error::ConfigurationMismatch(format!(
                    "no baseline for {configuration}"
                )));
            };
            differs.insert(
                configuration.clone(),
                Differ::new(legacy_snapshot, baseline_snapshot, &baseline.global_properties),
            );
        }
        Ok(Self { differs })
    }

    pub fn get(&self, configuration: &Configuration) -> Result<&Differ> {
        self.differs
            .get(configuration)
            .ok_or_else(|| Error::ConfigurationMismatch(format!("no differ for {configuration}")))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Configuration, &Differ)> {
        self.differs.iter()
    }

    pub fn len(&self) -> usize {
        self.differs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.differs.is_empty()
    }

    /// The differs a group scope consults. Opaque scopes consult none.
    pub fn for_scope(&self, scope: &GroupScope) -> Result<Vec<&Differ>> {
        match scope {
            GroupScope::Unconditioned => Ok(self.differs.values().collect()),
            GroupScope::Opaque => Ok(Vec::new()),
            GroupScope::Configured(selector) => {
                let matching: Vec<&Differ> = self
                    .differs
                    .iter()
                    .filter(|(configuration, _)| selector.matches(configuration))
                    .map(|(_, differ)| differ)
                    .collect();
                if matching.is_empty() {
                    return Err(Error::ConfigurationMismatch(format!(
                        "condition selects {selector}, which is not a known configuration"
                    )));
                }
                Ok(matching)
            }
        }
    }

    /// Classify a property for a scope: Defaulted only when every consulted
    /// configuration agrees
    pub fn classify_property(&self, scope: &GroupScope, name: &str) -> Result<Option<Classification>> {
        let differs = self.for_scope(scope)?;
        Ok(aggregate(differs.iter().map(|d| d.properties_diff().classify(name))))
    }

    /// Classify an item for a scope: Defaulted when Defaulted everywhere,
    /// Changed when the baseline has it everywhere and it changed somewhere
    pub fn classify_item(&self, scope: &GroupScope, item_type: &str, include: &str) -> Result<Option<Classification>> {
        let differs = self.for_scope(scope)?;
        Ok(aggregate(differs.iter().map(|d| d.classify_item(item_type, include))))
    }

    /// Introduced items of the given types across every configuration,
    /// deduplicated by type and include
    pub fn introduced_items(&self, item_type_filter: impl Fn(&str) -> bool) -> Vec<(String, EvaluatedItem)> {
        let mut seen = BTreeSet::new();
        let mut introduced = Vec::new();
        for differ in self.differs.values() {
            for diff in differ.items_diff() {
                if !item_type_filter(&diff.item_type) {
                    continue;
                }
                for item in &diff.introduced {
                    let key = (IgnoreCase::from(diff.item_type.as_str()), normalize_include(&item.include));
                    if seen.insert(key) {
                        introduced.push((diff.item_type.clone(), item.clone()));
                    }
                }
            }
        }
        introduced
    }
}

/// Combine per-configuration classifications
fn aggregate(classifications: impl Iterator<Item = Option<Classification>>) -> Option<Classification> {
    let mut any = false;
    let mut all_defaulted = true;
    let mut any_changed = false;
    for classification in classifications {
        any = true;
        match classification {
            Some(Classification::Defaulted) => {}
            Some(Classification::Changed) => {
                all_defaulted = false;
                any_changed = true;
            }
            // Absent from this configuration's baseline
            None => return None,
        }
    }

    if !any {
        None
    } else if all_defaulted {
        Some(Classification::Defaulted)
    } else if any_changed {
        Some(Classification::Changed)
    } else {
        None
    }
}
