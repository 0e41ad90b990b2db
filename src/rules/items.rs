// src/rules/items.rs

//! Item rules, in priority order
//!
//! Each declared item is checked against [`ITEM_RULES`] top to bottom and the
//! first rule that applies decides what happens to it. Items no rule claims
//! are left to the differ.

use super::facts::{
    ALWAYS_REMOVABLE_METADATA, CORE_IMPLICIT_REFERENCES, DESKTOP_XAML_METADATA,
    IMPLICIT_REFERENCES, IMPLIED_METADATA, OBSOLETE_ITEM_TYPES, REFERENCE, T4_SERVICE_GUID,
    USE_WINDOWS_FORMS, USE_WPF, VALUE_TUPLE, WINFORMS_REFERENCES, WPF_ITEM_TYPES, WPF_REFERENCES, contains_ignore_case,
};
use super::globs::{ProjectLanguage, is_covered_by_default_glob};
use super::packages::{is_implicit_at, package_equivalent};
use super::tfm::TargetFramework;
use crate::baseline::ProjectStyle;
use crate::project::{Item, ProjectDocument};

/// What the rules need to know about the project being converted
#[derive(Debug, Clone, Copy, Default)]
pub struct ItemContext {
    pub style: ProjectStyle,
    pub target_framework: Option<TargetFramework>,
    pub language: ProjectLanguage,
    /// A `packages.config` was migrated to package references
    pub packages_migrated: bool,
}

impl ItemContext {
    fn is_desktop(&self) -> bool {
        self.style == ProjectStyle::WindowsDesktop
    }
}

/// What to do with an item a rule claimed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemAction {
    /// Drop the always-removable metadata, keep the item
    StripMetadata,
    Remove,
    /// Remove the reference and add its package equivalent
    ReplaceWithPackage,
}

/// A named predicate with the action it triggers
pub struct ItemRule {
    pub name: &'static str,
    pub applies: fn(&Item, &ItemContext) -> bool,
    pub action: ItemAction,
}

impl std::fmt::Debug for ItemRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ItemRule")
            .field("name", &self.name)
            .field("action", &self.action)
            .finish()
    }
}

/// Item rules, highest priority first
pub static ITEM_RULES: &[ItemRule] = &[
    ItemRule {
        name: "always-removable-metadata",
        applies: has_always_removable_metadata,
        action: ItemAction::StripMetadata,
    },
    ItemRule {
        name: "denylisted-include",
        applies: is_denylisted_item,
        action: ItemAction::Remove,
    },
    ItemRule {
        name: "unneeded-compatibility-shim",
        applies: is_unneeded_shim,
        action: ItemAction::Remove,
    },
    ItemRule {
        name: "package-equivalent-reference",
        applies: has_package_equivalent,
        action: ItemAction::ReplaceWithPackage,
    },
    ItemRule {
        name: "desktop-removable",
        applies: is_desktop_removable,
        action: ItemAction::Remove,
    },
    ItemRule {
        name: "implied-metadata-only",
        applies: has_only_implied_metadata,
        action: ItemAction::Remove,
    },
];

/// The first rule that claims this item
pub fn first_matching_rule(item: &Item, ctx: &ItemContext) -> Option<&'static ItemRule> {
    ITEM_RULES.iter().find(|rule| (rule.applies)(item, ctx))
}

/// Remove the always-removable metadata of an item, returning how many
/// entries were dropped
pub fn strip_removable_metadata(item: &mut Item) -> usize {
    let Some(names) = removable_metadata_names(&item.item_type) else {
        return 0;
    };
    let before = item.metadata.len();
    item.metadata
        .retain(|m| !contains_ignore_case(names, &m.name));
    before - item.metadata.len()
}

fn removable_metadata_names(item_type: &str) -> Option<&'static [&'static str]> {
    ALWAYS_REMOVABLE_METADATA
        .iter()
        .find(|(t, _)| t.eq_ignore_ascii_case(item_type))
        .map(|(_, names)| *names)
}

/// (a)
fn has_always_removable_metadata(item: &Item, _ctx: &ItemContext) -> bool {
    removable_metadata_names(&item.item_type)
        .is_some_and(|names| item.metadata.iter().any(|m| contains_ignore_case(names, &m.name)))
}

fn is_package_hint_path(item: &Item) -> bool {
    item.metadata_value("HintPath").is_some_and(|hint| {
        let hint = hint.replace('/', "\\").to_ascii_lowercase();
        hint.starts_with("packages\\") || hint.contains("\\packages\\")
    })
}

/// (b)
fn is_denylisted_item(item: &Item, ctx: &ItemContext) -> bool {
    if contains_ignore_case(OBSOLETE_ITEM_TYPES, &item.item_type) {
        return true;
    }

    if item.is_type("Service") {
        return item.spec.eq_ignore_ascii_case(T4_SERVICE_GUID);
    }

    if !item.is_type(REFERENCE) {
        return false;
    }

    let name = item.simple_name();
    if contains_ignore_case(IMPLICIT_REFERENCES, name) {
        return true;
    }
    if contains_ignore_case(CORE_IMPLICIT_REFERENCES, name)
        && ctx.target_framework.is_some_and(|tfm| tfm.is_core())
    {
        return true;
    }

    // The migrated package reference supplies the assembly now
    ctx.packages_migrated && is_package_hint_path(item)
}

/// (c)
fn is_unneeded_shim(item: &Item, ctx: &ItemContext) -> bool {
    item.is_type(REFERENCE)
        && item.simple_name().eq_ignore_ascii_case(VALUE_TUPLE)
        && is_implicit_at(VALUE_TUPLE, ctx.target_framework.as_ref())
}

/// (d)
fn has_package_equivalent(item: &Item, ctx: &ItemContext) -> bool {
    item.is_type(REFERENCE)
        && package_equivalent(item.simple_name(), ctx.target_framework.as_ref()).is_some()
}

fn has_extension(spec: &str, extension: &str) -> bool {
    spec.to_ascii_lowercase().ends_with(extension)
}

fn is_designer_file(item: &Item) -> bool {
    item.is_type("Compile")
        && (has_extension(&item.spec, ".designer.cs") || has_extension(&item.spec, ".designer.vb"))
}

/// Code-behind for XAML or WinForms surfaces, which the desktop SDK nests itself
fn is_code_behind(item: &Item) -> bool {
    if !item.is_type("Compile") {
        return false;
    }
    if item
        .metadata_value("DependentUpon")
        .is_some_and(|parent| has_extension(parent, ".xaml"))
    {
        return true;
    }
    item.metadata.len() == 1
        && item.metadata_value("SubType").is_some_and(|subtype| {
            ["Form", "UserControl", "Component"]
                .iter()
                .any(|s| s.eq_ignore_ascii_case(subtype))
        })
}

fn is_settings_or_resources(item: &Item) -> bool {
    (item.is_type("None") && has_extension(&item.spec, ".settings"))
        || (item.is_type("EmbeddedResource") && has_extension(&item.spec, ".resx"))
}

fn is_superseded_toolkit_reference(item: &Item) -> bool {
    item.is_type(REFERENCE)
        && (contains_ignore_case(WINFORMS_REFERENCES, item.simple_name())
            || contains_ignore_case(WPF_REFERENCES, item.simple_name()))
}

fn is_globbed_xaml(item: &Item, ctx: &ItemContext) -> bool {
    (item.is_type("Page") || item.is_type("ApplicationDefinition"))
        && is_covered_by_default_glob(&item.item_type, &item.spec, ctx.language, true)
        && item.metadata.iter().all(|m| {
            DESKTOP_XAML_METADATA
                .iter()
                .any(|(name, value)| m.name.eq_ignore_ascii_case(name) && m.value.eq_ignore_ascii_case(value))
        })
}

/// Designer, code-behind and settings files the desktop SDK globs pick up
/// again; linked files outside the project cone stay declared
fn is_globbed_desktop_file(item: &Item, ctx: &ItemContext) -> bool {
    (is_designer_file(item) || is_code_behind(item) || is_settings_or_resources(item))
        && is_covered_by_default_glob(&item.item_type, &item.spec, ctx.language, true)
}

/// (e)
fn is_desktop_removable(item: &Item, ctx: &ItemContext) -> bool {
    ctx.is_desktop()
        && (is_globbed_desktop_file(item, ctx)
            || is_superseded_toolkit_reference(item)
            || is_globbed_xaml(item, ctx))
}

/// (f)
fn has_only_implied_metadata(item: &Item, ctx: &ItemContext) -> bool {
    item.has_metadata()
        && item.metadata.iter().all(|m| {
            IMPLIED_METADATA.iter().any(|(item_type, name, value)| {
                item.is_type(item_type)
                    && m.name.eq_ignore_ascii_case(name)
                    && m.value.eq_ignore_ascii_case(value)
            })
        })
        && is_covered_by_default_glob(&item.item_type, &item.spec, ctx.language, ctx.is_desktop())
}

fn is_enabled(document: &ProjectDocument, property: &str) -> bool {
    document
        .unconditioned_property(property)
        .is_some_and(|p| p.value.trim().eq_ignore_ascii_case("true"))
}

/// WinForms is in use when the project references `System.Windows.Forms`
/// or already switches it on
pub fn uses_windows_forms(document: &ProjectDocument) -> bool {
    document.has_reference("System.Windows.Forms") || is_enabled(document, USE_WINDOWS_FORMS)
}

/// WPF is in use when XAML item types or `PresentationFramework` appear
pub fn uses_wpf(document: &ProjectDocument) -> bool {
    WPF_ITEM_TYPES
        .iter()
        .filter(|t| !t.eq_ignore_ascii_case("Resource"))
        .any(|t| document.has_item_type(t))
        || document.has_reference("PresentationFramework")
        || is_enabled(document, USE_WPF)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(style: ProjectStyle, moniker: &str) -> ItemContext {
        ItemContext {
            style,
            target_framework: TargetFramework::parse(moniker),
            language: ProjectLanguage::CSharp,
            packages_migrated: false,
        }
    }

    fn rule_name(item: &Item, ctx: &ItemContext) -> Option<&'static str> {
        first_matching_rule(item, ctx).map(|r| r.name)
    }

    #[test]
    fn test_project_reference_metadata_stripped() {
        let mut item = Item::include("ProjectReference", "..\\Lib\\Lib.csproj")
            .with_metadata("Project", "{0000}", false)
            .with_metadata("Name", "Lib", false)
            .with_metadata("Private", "false", false);
        let c = ctx(ProjectStyle::Default, "net472");
        assert_eq!(first_matching_rule(&item, &c).unwrap().action, ItemAction::StripMetadata);

        assert_eq!(strip_removable_metadata(&mut item), 2);
        assert_eq!(item.metadata.len(), 1);
        assert!(first_matching_rule(&item, &c).is_none());
    }

    #[test]
    fn test_implicit_references_removed() {
        let c = ctx(ProjectStyle::Default, "net472");
        assert_eq!(rule_name(&Item::include("Reference", "System.Xml"), &c), Some("denylisted-include"));
        assert_eq!(
            rule_name(&Item::include("Reference", "System.Core, Version=4.0.0.0"), &c),
            Some("denylisted-include")
        );
        assert_eq!(rule_name(&Item::include("Reference", "Microsoft.CSharp"), &c), None);

        let core = ctx(ProjectStyle::Default, "net8.0");
        assert_eq!(rule_name(&Item::include("Reference", "Microsoft.CSharp"), &core), Some("denylisted-include"));
    }

    #[test]
    fn test_obsolete_items_removed() {
        let c = ctx(ProjectStyle::Default, "net472");
        assert!(first_matching_rule(&Item::include("Service", T4_SERVICE_GUID), &c).is_some());
        assert!(first_matching_rule(&Item::include("Service", "{0000}"), &c).is_none());
        assert!(
            first_matching_rule(&Item::include("BootstrapperPackage", ".NETFramework,Version=v4.7.2"), &c)
                .is_some()
        );
    }

    #[test]
    fn test_package_hint_path_only_when_migrated() {
        let item = Item::include("Reference", "Newtonsoft.Json, Version=12.0.0.0")
            .with_metadata("HintPath", "..\\packages\\Newtonsoft.Json.12.0.3\\lib\\net45\\Newtonsoft.Json.dll", false);
        let mut c = ctx(ProjectStyle::Default, "net472");
        assert!(first_matching_rule(&item, &c).is_none());
        c.packages_migrated = true;
        assert_eq!(rule_name(&item, &c), Some("denylisted-include"));
    }

    #[test]
    fn test_value_tuple_shim() {
        let item = Item::include("Reference", "System.ValueTuple");
        assert_eq!(
            rule_name(&item, &ctx(ProjectStyle::Default, "net472")),
            Some("unneeded-compatibility-shim")
        );
        assert!(first_matching_rule(&item, &ctx(ProjectStyle::Default, "net461")).is_none());
    }

    #[test]
    fn test_package_equivalent_reference() {
        let item = Item::include("Reference", "System.Configuration");
        let rule = first_matching_rule(&item, &ctx(ProjectStyle::Default, "net8.0")).unwrap();
        assert_eq!(rule.action, ItemAction::ReplaceWithPackage);
        assert!(first_matching_rule(&item, &ctx(ProjectStyle::Default, "net472")).is_none());
    }

    #[test]
    fn test_denylist_beats_package_equivalent() {
        // DataSetExtensions is both implicit on core and has a package mapping
        let item = Item::include("Reference", "System.Data.DataSetExtensions");
        let c = ctx(ProjectStyle::Default, "net8.0");
        assert!(has_package_equivalent(&item, &c));
        assert_eq!(rule_name(&item, &c), Some("denylisted-include"));
    }

    #[test]
    fn test_desktop_removables() {
        let desktop = ctx(ProjectStyle::WindowsDesktop, "net8.0-windows");
        let plain = ctx(ProjectStyle::Default, "net8.0");

        let designer = Item::include("Compile", "Form1.Designer.cs").with_metadata("DependentUpon", "Form1.cs", false);
        assert_eq!(rule_name(&designer, &desktop), Some("desktop-removable"));
        assert!(first_matching_rule(&designer, &plain).is_none());

        let form = Item::include("Compile", "Form1.cs").with_metadata("SubType", "Form", false);
        assert_eq!(rule_name(&form, &desktop), Some("desktop-removable"));

        let code_behind = Item::include("Compile", "MainWindow.xaml.cs")
            .with_metadata("DependentUpon", "MainWindow.xaml", false);
        assert_eq!(rule_name(&code_behind, &desktop), Some("desktop-removable"));

        let resx = Item::include("EmbeddedResource", "Form1.resx");
        assert_eq!(rule_name(&resx, &desktop), Some("desktop-removable"));

        let settings = Item::include("None", "Properties\\Settings.settings");
        assert_eq!(rule_name(&settings, &desktop), Some("desktop-removable"));

        let forms = Item::include("Reference", "System.Windows.Forms");
        assert_eq!(rule_name(&forms, &desktop), Some("desktop-removable"));

        let page = Item::include("Page", "MainWindow.xaml")
            .with_metadata("Generator", "MSBuild:Compile", false)
            .with_metadata("SubType", "Designer", false);
        assert_eq!(rule_name(&page, &desktop), Some("desktop-removable"));

        let custom_page = Item::include("Page", "Themes\\Generic.xaml").with_metadata("Generator", "Custom", false);
        assert!(first_matching_rule(&custom_page, &desktop).is_none());
    }

    #[test]
    fn test_linked_desktop_files_kept() {
        let desktop = ctx(ProjectStyle::WindowsDesktop, "net8.0-windows");

        let designer = Item::include("Compile", "..\\Shared\\Dialog.Designer.cs")
            .with_metadata("DependentUpon", "Dialog.cs", false);
        assert!(first_matching_rule(&designer, &desktop).is_none());

        let form = Item::include("Compile", "..\\Shared\\Dialog.cs").with_metadata("SubType", "Form", false);
        assert!(first_matching_rule(&form, &desktop).is_none());

        let resx = Item::include("EmbeddedResource", "..\\Shared\\Strings.resx");
        assert!(first_matching_rule(&resx, &desktop).is_none());

        let settings = Item::include("None", "C:\\Shared\\App.settings");
        assert!(first_matching_rule(&settings, &desktop).is_none());
    }

    #[test]
    fn test_implied_metadata_only() {
        let c = ctx(ProjectStyle::Default, "net472");
        let compile = Item::include("Compile", "Program.cs").with_metadata("SubType", "Code", false);
        assert_eq!(rule_name(&compile, &c), Some("implied-metadata-only"));

        // Outside the project cone, the glob does not reach it
        let linked = Item::include("Compile", "..\\Shared\\Util.cs").with_metadata("SubType", "Code", false);
        assert!(first_matching_rule(&linked, &c).is_none());

        let bare = Item::include("Compile", "Program.cs");
        assert!(first_matching_rule(&bare, &c).is_none());
    }

    #[test]
    fn test_rule_names_are_unique() {
        let mut names: Vec<_> = ITEM_RULES.iter().map(|r| r.name).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), ITEM_RULES.len());
    }

    #[test]
    fn test_toolkit_detection() {
        let winforms = ProjectDocument::parse(
            r#"<Project><ItemGroup><Reference Include="System.Windows.Forms" /></ItemGroup></Project>"#,
        )
        .unwrap();
        assert!(uses_windows_forms(&winforms));
        assert!(!uses_wpf(&winforms));

        let wpf = ProjectDocument::parse(
            r#"<Project><ItemGroup><Page Include="MainWindow.xaml" /></ItemGroup></Project>"#,
        )
        .unwrap();
        assert!(uses_wpf(&wpf));
        assert!(!uses_windows_forms(&wpf));

        let converted = ProjectDocument::parse(
            r#"<Project Sdk="Microsoft.NET.Sdk.WindowsDesktop"><PropertyGroup><UseWindowsForms>true</UseWindowsForms></PropertyGroup></Project>"#,
        )
        .unwrap();
        assert!(uses_windows_forms(&converted));
    }
}
