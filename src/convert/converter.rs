// src/convert/converter.rs

//! The rewrite pipeline
//!
//! Passes run in a fixed order and each one leaves the document in the
//! state the next one expects. Later passes rely on earlier ones: the
//! framework moniker resolved in pass 4 decides which packages and
//! references survive passes 8 and 9, and pass 10 must see the final item
//! declarations.

use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::baseline::{BaselineProject, ProjectStyle, Toolkits};
use crate::diff::{Classification, Differs};
use crate::error::Result;
use crate::evaluation::GroupScope;
use crate::ignore_case::same_include;
use crate::manifest::{ManifestConverter, PackageEntry};
use crate::project::{Item, ItemGroup, ItemOperation, ProjectChild, ProjectDocument, Property};
use crate::rules::facts::{
    DEFAULT_SDK, DESKTOP_SDK, GENERATE_ASSEMBLY_INFO, PACKAGE_REFERENCE, PACKAGES_CONFIG,
    TARGET_FRAMEWORK, USE_WINDOWS_FORMS, USE_WPF, VERSION_METADATA,
};
use crate::rules::globs::is_globbed_item_type;
use crate::rules::items::{ItemAction, ItemContext, first_matching_rule, strip_removable_metadata};
use crate::rules::packages::{package_equivalent, should_add_package};
use crate::rules::properties::{PropertyContext, PropertyVerdict, classify_property};
use crate::rules::tfm::{TargetFramework, normalize_moniker};
use crate::rules::ProjectLanguage;

/// Counts of what the pipeline changed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversionSummary {
    pub imports_removed: usize,
    pub properties_removed: usize,
    pub properties_added: usize,
    pub packages_added: usize,
    pub items_removed: usize,
    pub items_updated: usize,
    pub item_removes_added: usize,
}

impl ConversionSummary {
    /// Whether the pipeline changed anything beyond attributes
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// A converted document and what it took to get there
#[derive(Debug, Clone)]
pub struct Conversion {
    pub document: ProjectDocument,
    /// Moniker the converted project targets
    pub target_framework: String,
    pub summary: ConversionSummary,
}

/// Rewrites one legacy document into SDK style
pub struct Converter<'a> {
    document: ProjectDocument,
    baseline: &'a BaselineProject,
    differs: &'a Differs,
    manifest_converter: &'a dyn ManifestConverter,
    summary: ConversionSummary,
}

impl<'a> Converter<'a> {
    pub fn new(
        document: ProjectDocument,
        baseline: &'a BaselineProject,
        differs: &'a Differs,
        manifest_converter: &'a dyn ManifestConverter,
    ) -> Self {
        Self {
            document,
            baseline,
            differs,
            manifest_converter,
            summary: ConversionSummary::default(),
        }
    }

    /// Run every pass in order
    pub fn convert(mut self) -> Result<Conversion> {
        let name = self.document.project_name().unwrap_or("<project>").to_string();
        info!("Converting {} ({} style)", name, self.baseline.style);

        self.change_imports();
        self.remove_defaulted_properties()?;
        self.remove_unnecessary_properties();
        let target_framework = self.add_target_framework();
        self.add_generate_assembly_info();
        self.add_desktop_properties();
        self.add_target_project_properties();

        let framework = TargetFramework::parse(&target_framework);
        let packages_migrated = self.add_converted_packages(framework.as_ref());

        let ctx = ItemContext {
            style: self.baseline.style,
            target_framework: framework,
            language: ProjectLanguage::from_extension(self.document.extension()),
            packages_migrated,
        };
        self.remove_or_update_items(&ctx)?;
        self.add_item_removes_for_introduced_items(&ctx);
        self.finalize();

        info!(
            "Converted {} to {}: {} properties and {} items removed, {} items updated, {} packages added",
            name,
            target_framework,
            self.summary.properties_removed,
            self.summary.items_removed,
            self.summary.items_updated,
            self.summary.packages_added
        );

        Ok(Conversion {
            document: self.document,
            target_framework,
            summary: self.summary,
        })
    }

    fn is_desktop(&self) -> bool {
        self.baseline.style == ProjectStyle::WindowsDesktop
    }

    /// Pass 1: swap explicit imports for an `Sdk` attribute
    fn change_imports(&mut self) {
        if !self.baseline.style.replaces_imports() {
            debug!("Keeping imports of {} project", self.baseline.style);
            return;
        }

        let removed = self.document.remove_imports();
        self.summary.imports_removed += removed;

        let sdk = if Toolkits::detect(&self.document).any() {
            DESKTOP_SDK
        } else {
            DEFAULT_SDK
        };
        self.document.set_attribute("Sdk", sdk);
        debug!("Removed {} imports, using {}", removed, sdk);
    }

    /// Pass 2: drop properties the baseline already evaluates identically
    fn remove_defaulted_properties(&mut self) -> Result<()> {
        let differs = self.differs;
        let baseline = self.baseline;

        for child in self.document.children.iter_mut() {
            let ProjectChild::PropertyGroup(group) = child else {
                continue;
            };
            let scope = group.scope();
            if scope == GroupScope::Opaque {
                continue;
            }

            let mut kept = Vec::with_capacity(group.properties.len());
            for property in std::mem::take(&mut group.properties) {
                if property.condition.is_some() || baseline.is_injected(&property.name) {
                    kept.push(property);
                    continue;
                }
                match differs.classify_property(&scope, &property.name)? {
                    Some(Classification::Defaulted) => {
                        debug!("Removing defaulted property {}", property.name);
                        self.summary.properties_removed += 1;
                    }
                    _ => kept.push(property),
                }
            }
            group.properties = kept;
        }

        self.document.remove_empty_groups();
        Ok(())
    }

    /// Pass 3: drop properties that are always redundant under the SDK
    fn remove_unnecessary_properties(&mut self) {
        let project_name = self.document.project_name().map(str::to_string);

        for child in self.document.children.iter_mut() {
            let ProjectChild::PropertyGroup(group) = child else {
                continue;
            };
            let scope = group.scope();
            let ctx = PropertyContext {
                project_name: project_name.as_deref(),
                configuration_name: scope.configuration_name(),
                platform_name: scope.platform_name(),
            };

            let declared: Vec<String> = group.properties.iter().map(|p| p.name.clone()).collect();
            let mut kept: Vec<Property> = Vec::with_capacity(group.properties.len());
            for property in std::mem::take(&mut group.properties) {
                match classify_property(&property, &ctx) {
                    PropertyVerdict::Keep => kept.push(property),
                    PropertyVerdict::Remove => {
                        debug!("Removing unnecessary property {}", property.name);
                        self.summary.properties_removed += 1;
                    }
                    PropertyVerdict::Replace(replacement) => {
                        debug!("Replacing {} with {}", property.name, replacement.name);
                        self.summary.properties_removed += 1;
                        let already_set = declared.iter().any(|n| n.eq_ignore_ascii_case(&replacement.name))
                            || kept.iter().any(|p| p.is_named(&replacement.name));
                        if !already_set {
                            kept.push(replacement);
                            self.summary.properties_added += 1;
                        }
                    }
                }
            }
            group.properties = kept;
        }

        self.document.remove_empty_groups();
    }

    /// Pass 4: make sure the project names its framework, returning the
    /// moniker it ends up with
    fn add_target_framework(&mut self) -> String {
        if let Some(existing) = self.document.unconditioned_property(TARGET_FRAMEWORK) {
            return existing.value.trim().to_string();
        }
        if let Some(existing) = self.document.unconditioned_property("TargetFrameworks") {
            let first = existing.value.split(';').map(str::trim).find(|s| !s.is_empty());
            if let Some(first) = first {
                return first.to_string();
            }
        }

        let moniker = if self.is_desktop() {
            self.baseline.target_framework.clone()
        } else {
            normalize_moniker(self.baseline.evaluated_target_framework())
        };

        let index = self.document.ensure_top_level_property_group();
        if let Some(group) = self.document.property_group_mut(index) {
            group.prepend(Property::new(TARGET_FRAMEWORK, moniker.as_str()));
            self.summary.properties_added += 1;
        }
        debug!("Targeting {}", moniker);
        moniker
    }

    /// Index of the unconditioned group holding `TargetFramework`
    fn target_framework_group(&mut self) -> usize {
        match self.document.property_group_index_with(TARGET_FRAMEWORK) {
            Some(index) => index,
            None => self.document.ensure_top_level_property_group(),
        }
    }

    fn set_in_group(&mut self, index: usize, name: &str, value: &str) {
        if self.document.unconditioned_property(name).is_some() {
            return;
        }
        if let Some(group) = self.document.property_group_mut(index) {
            if group.set_if_absent(name, value) {
                debug!("Added {}={}", name, value);
                self.summary.properties_added += 1;
            }
        }
    }

    /// Pass 5: assembly attributes stay in the legacy AssemblyInfo file
    fn add_generate_assembly_info(&mut self) {
        let index = self.target_framework_group();
        self.set_in_group(index, GENERATE_ASSEMBLY_INFO, "false");
    }

    /// Pass 6: switch on the toolkits a desktop project uses
    fn add_desktop_properties(&mut self) {
        if !self.is_desktop() {
            return;
        }
        let toolkits = self.baseline.toolkits;
        let index = self.target_framework_group();
        if toolkits.windows_forms && !self.baseline.is_injected(USE_WINDOWS_FORMS) {
            self.set_in_group(index, USE_WINDOWS_FORMS, "true");
        }
        if toolkits.wpf && !self.baseline.is_injected(USE_WPF) {
            self.set_in_group(index, USE_WPF, "true");
        }
    }

    /// Pass 7
    fn add_target_project_properties(&mut self) {
        let baseline = self.baseline;
        let properties = &baseline.target_project_properties;
        if properties.is_empty() {
            return;
        }
        let index = self.document.ensure_top_level_property_group();
        for (name, value) in properties {
            self.set_in_group(index, name, value);
        }
    }

    fn manifest_path(&self, include: &str) -> PathBuf {
        let relative = include.replace('\\', "/");
        match self.document.path().and_then(Path::parent) {
            Some(dir) => dir.join(relative),
            None => PathBuf::from(relative),
        }
    }

    /// Pass 8: turn `packages.config` into package references. Returns
    /// whether a manifest was migrated.
    fn add_converted_packages(&mut self, framework: Option<&TargetFramework>) -> bool {
        let manifest = self
            .document
            .items()
            .find(|item| {
                item.operation == ItemOperation::Include && is_manifest_include(&item.spec)
            })
            .cloned();
        let Some(manifest) = manifest else {
            return false;
        };

        let path = self.manifest_path(&manifest.spec);
        let (entries, migrated) = match self.manifest_converter.convert(&path) {
            Ok(entries) => (entries, true),
            Err(e) => {
                warn!("Could not read {}: {}; no packages added", path.display(), e);
                (Vec::new(), false)
            }
        };

        for entry in entries {
            if should_add_package(&entry, framework) {
                self.add_package(entry);
            } else {
                debug!("Skipping package {}", entry);
            }
        }

        for group in self.document.item_groups_mut() {
            group.items.retain(|item| item != &manifest);
        }
        self.document.remove_empty_groups();
        migrated
    }

    /// Append a `PackageReference` unless the package is already referenced
    fn add_package(&mut self, entry: PackageEntry) {
        let exists = self
            .document
            .items()
            .any(|item| item.is_type(PACKAGE_REFERENCE) && item.spec.eq_ignore_ascii_case(&entry.id));
        if exists {
            return;
        }

        debug!("Adding package {}", entry);
        let item = Item::include(PACKAGE_REFERENCE, entry.id.as_str()).with_metadata(
            VERSION_METADATA,
            &entry.version,
            true,
        );

        let group = self
            .document
            .item_groups_mut()
            .find(|g| g.condition.is_none() && g.items.iter().all(|i| i.is_type(PACKAGE_REFERENCE)) && !g.is_empty());
        match group {
            Some(group) => group.items.push(item),
            None => {
                self.document.push_item_group(ItemGroup {
                    items: vec![item],
                    ..ItemGroup::default()
                });
            }
        }
        self.summary.packages_added += 1;
    }

    /// Pass 9: apply the item rules, then the differ
    fn remove_or_update_items(&mut self, ctx: &ItemContext) -> Result<()> {
        let differs = self.differs;
        let mut packages = Vec::new();

        for child in self.document.children.iter_mut() {
            let ProjectChild::ItemGroup(group) = child else {
                continue;
            };
            let scope = group.scope();

            let mut kept = Vec::with_capacity(group.items.len());
            for mut item in std::mem::take(&mut group.items) {
                if item.operation != ItemOperation::Include || item.is_type(PACKAGE_REFERENCE) {
                    kept.push(item);
                    continue;
                }

                if let Some(rule) = first_matching_rule(&item, ctx) {
                    debug!("{} {} matched rule {}", item.item_type, item.spec, rule.name);
                    match rule.action {
                        ItemAction::StripMetadata => {
                            strip_removable_metadata(&mut item);
                            kept.push(item);
                        }
                        ItemAction::Remove => self.summary.items_removed += 1,
                        ItemAction::ReplaceWithPackage => {
                            packages.extend(package_equivalent(item.simple_name(), ctx.target_framework.as_ref()));
                            self.summary.items_removed += 1;
                        }
                    }
                    continue;
                }

                if scope == GroupScope::Opaque || item.condition.is_some() {
                    kept.push(item);
                    continue;
                }

                match differs.classify_item(&scope, &item.item_type, &item.spec)? {
                    Some(Classification::Defaulted) => {
                        debug!("Removing defaulted {} {}", item.item_type, item.spec);
                        self.summary.items_removed += 1;
                    }
                    Some(Classification::Changed) => {
                        debug!("Updating changed {} {}", item.item_type, item.spec);
                        item.convert_to_update();
                        self.summary.items_updated += 1;
                        kept.push(item);
                    }
                    None => kept.push(item),
                }
            }
            group.items = kept;
        }

        for package in packages {
            self.add_package(package);
        }
        self.document.remove_empty_groups();
        Ok(())
    }

    /// Pass 10: suppress what the SDK globs would newly pull in
    fn add_item_removes_for_introduced_items(&mut self, ctx: &ItemContext) {
        let desktop = self.is_desktop();
        let introduced = self
            .differs
            .introduced_items(|item_type| is_globbed_item_type(item_type, ctx.language, desktop));

        let mut removes: Vec<Item> = Vec::new();
        for (item_type, item) in introduced {
            let already_removed = self.document.items().chain(removes.iter()).any(|existing| {
                existing.operation == ItemOperation::Remove
                    && existing.is_type(&item_type)
                    && same_include(&existing.spec, &item.include)
            });
            if !already_removed {
                debug!("Suppressing introduced {} {}", item_type, item.include);
                removes.push(Item::remove(item_type, item.include));
            }
        }

        if removes.is_empty() {
            return;
        }
        self.summary.item_removes_added += removes.len();
        self.document.push_item_group(ItemGroup {
            items: removes,
            ..ItemGroup::default()
        });
    }

    /// Pass 11: attributes the SDK resolves on its own
    fn finalize(&mut self) {
        self.document.remove_attribute("ToolsVersion");
        self.document.remove_attribute("DefaultTargets");
    }
}

fn is_manifest_include(include: &str) -> bool {
    include
        .rsplit(['\\', '/'])
        .next()
        .is_some_and(|name| name.eq_ignore_ascii_case(PACKAGES_CONFIG))
}
