// src/rules/facts.rs

//! Fixed knowledge about legacy and SDK-style projects
//!
//! Names, SDK identifiers and the curated lists the rules consult. Lists are
//! compared case-insensitively.

/// SDK for ordinary projects
pub const DEFAULT_SDK: &str = "Microsoft.NET.Sdk";

/// SDK for WinForms and WPF projects
pub const DESKTOP_SDK: &str = "Microsoft.NET.Sdk.WindowsDesktop";

pub const TARGET_FRAMEWORK: &str = "TargetFramework";
pub const TARGET_FRAMEWORK_VERSION: &str = "TargetFrameworkVersion";
pub const OUTPUT_TYPE: &str = "OutputType";
pub const DEFAULT_OUTPUT_TYPE: &str = "Library";
pub const GENERATE_ASSEMBLY_INFO: &str = "GenerateAssemblyInfo";
pub const GENERATE_DOCUMENTATION_FILE: &str = "GenerateDocumentationFile";
pub const USE_WINDOWS_FORMS: &str = "UseWindowsForms";
pub const USE_WPF: &str = "UseWPF";

pub const PACKAGE_REFERENCE: &str = "PackageReference";
pub const REFERENCE: &str = "Reference";
pub const PROJECT_REFERENCE: &str = "ProjectReference";
pub const VERSION_METADATA: &str = "Version";

/// Legacy flat package manifest file name
pub const PACKAGES_CONFIG: &str = "packages.config";

/// Imports a plain legacy project carries and the SDK replaces
pub const COMMON_PROPS_IMPORT: &str = "Microsoft.Common.props";
pub const LANGUAGE_TARGETS_IMPORTS: &[&str] = &[
    "Microsoft.CSharp.targets",
    "Microsoft.VisualBasic.targets",
    "Microsoft.FSharp.targets",
];

/// Properties that mean nothing under the SDK, whatever their value
pub const UNNECESSARY_PROPERTIES: &[&str] = &[
    "ProjectGuid",
    "ProjectTypeGuids",
    "TargetFrameworkIdentifier",
    "TargetFrameworkVersion",
    "TargetFrameworkProfile",
    "FileAlignment",
    "AppDesignerFolder",
    "SchemaVersion",
    "ProductVersion",
    "OldToolsVersion",
    "UpgradeBackupLocation",
    "NuGetPackageImportStamp",
    "AutoGenerateBindingRedirects",
    "RestorePackages",
    "SolutionDir",
    "Deterministic",
    "ProjectTypeGuid",
    "TargetCulture",
    "VSToolsPath",
    "VisualStudioVersion",
];

/// Property values the SDK supplies on its own
pub const DEFAULT_PROPERTY_VALUES: &[(&str, &str)] = &[
    ("DebugType", "portable"),
    ("PlatformTarget", "AnyCPU"),
    ("ErrorReport", "prompt"),
    ("WarningLevel", "4"),
];

/// Metadata no SDK-style item needs, keyed by item type
pub const ALWAYS_REMOVABLE_METADATA: &[(&str, &[&str])] =
    &[(PROJECT_REFERENCE, &["Project", "Name"])];

/// Metadata the SDK's own globs already imply, keyed by item type
pub const IMPLIED_METADATA: &[(&str, &str, &str)] = &[
    ("Compile", "SubType", "Code"),
    ("None", "SubType", "Designer"),
];

/// Assembly references the SDK adds implicitly for every framework
pub const IMPLICIT_REFERENCES: &[&str] = &[
    "mscorlib",
    "System",
    "System.Core",
    "System.Data",
    "System.IO.Compression.FileSystem",
    "System.Numerics",
    "System.Runtime.Serialization",
    "System.Xml",
    "System.Xml.Linq",
];

/// Assembly references that are part of the .NET Core shared framework
pub const CORE_IMPLICIT_REFERENCES: &[&str] = &[
    "Microsoft.CSharp",
    "System.Data.DataSetExtensions",
    "System.Net.Http",
];

/// The legacy T4 text templating service registration
pub const T4_SERVICE_GUID: &str = "{508349B6-6B84-4DF5-91F0-309BEEBAD82D}";

/// Item types that only ever existed for ClickOnce or designer tooling
pub const OBSOLETE_ITEM_TYPES: &[&str] = &["BootstrapperPackage"];

/// References to `System.ValueTuple` are unneeded from these frameworks on
pub const VALUE_TUPLE: &str = "System.ValueTuple";

/// Reference → package replacements for frameworks that dropped the assembly
pub const REFERENCE_PACKAGE_EQUIVALENTS: &[(&str, &str, &str)] = &[
    ("System.ComponentModel.Composition", "System.ComponentModel.Composition", "8.0.0"),
    ("System.Configuration", "System.Configuration.ConfigurationManager", "8.0.0"),
    ("System.Data.DataSetExtensions", "System.Data.DataSetExtensions", "4.5.0"),
    ("System.Runtime.Caching", "System.Runtime.Caching", "8.0.0"),
    ("System.ServiceModel", "System.ServiceModel.Primitives", "6.0.0"),
    ("System.Management", "System.Management", "8.0.0"),
];

/// Packages never carried over from a legacy manifest
pub const PACKAGE_DENYLIST: &[&str] = &[
    "Microsoft.Net.Compilers",
    "Microsoft.Net.Compilers.Toolset",
    "Microsoft.CodeDom.Providers.DotNetCompilerPlatform",
    "Microsoft.NETFramework.ReferenceAssemblies",
    "NETStandard.Library",
    "Microsoft.NETCore.App",
];

/// WinForms assembly references the desktop SDK adds itself
pub const WINFORMS_REFERENCES: &[&str] = &[
    "System.Windows.Forms",
    "System.Drawing",
    "System.Deployment",
];

/// WPF assembly references the desktop SDK adds itself
pub const WPF_REFERENCES: &[&str] = &[
    "PresentationCore",
    "PresentationFramework",
    "WindowsBase",
    "System.Xaml",
    "UIAutomationProvider",
    "UIAutomationTypes",
    "WindowsFormsIntegration",
];

/// Item types only WPF projects declare
pub const WPF_ITEM_TYPES: &[&str] = &["Page", "ApplicationDefinition", "Resource"];

/// Item types picked up by globs in every SDK project
pub const GLOBBED_ITEM_TYPES: &[&str] = &["Compile", "EmbeddedResource", "None"];

/// Item types the desktop SDK additionally globs
pub const DESKTOP_GLOBBED_ITEM_TYPES: &[&str] = &["Page", "ApplicationDefinition"];

/// Metadata the desktop SDK sets on globbed XAML items
pub const DESKTOP_XAML_METADATA: &[(&str, &str)] = &[
    ("Generator", "MSBuild:Compile"),
    ("SubType", "Designer"),
    ("SubType", "Code"),
];

pub fn contains_ignore_case(list: &[&str], value: &str) -> bool {
    list.iter().any(|entry| entry.eq_ignore_ascii_case(value))
}
