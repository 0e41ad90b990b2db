// tests/conversion_integration.rs
//! Integration tests for legacy to SDK-style project conversion
//!
//! Each test lays out a project, its recorded snapshots and any manifest on
//! disk, converts it through the workspace and checks the written XML.

mod common;

use common::{ProjectFixture, element_text, read, snapshot, snapshots};
use serde_json::json;

use sdkify::workspace::backup_path;
use sdkify::{
    ConvertOptions, OutputTarget, PackagesConfigReader, ProjectDocument, ProjectJob, Workspace,
};

// =============================================================================
// FIXTURES
// =============================================================================

const CONSOLE_APP: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<Project ToolsVersion="15.0" DefaultTargets="Build" xmlns="http://schemas.microsoft.com/developer/msbuild/2003">
  <Import Project="$(MSBuildExtensionsPath)\$(MSBuildToolsVersion)\Microsoft.Common.props" Condition="Exists('$(MSBuildExtensionsPath)\$(MSBuildToolsVersion)\Microsoft.Common.props')" />
  <PropertyGroup>
    <Configuration Condition=" '$(Configuration)' == '' ">Debug</Configuration>
    <Platform Condition=" '$(Platform)' == '' ">AnyCPU</Platform>
    <ProjectGuid>{0C3C1B9A-7E8F-4D3B-A3B1-2E9F6A1C5D42}</ProjectGuid>
    <OutputType>Exe</OutputType>
    <RootNamespace>Console</RootNamespace>
    <AssemblyName>Console</AssemblyName>
    <TargetFrameworkVersion>v4.7.2</TargetFrameworkVersion>
    <FileAlignment>512</FileAlignment>
    <LangVersion>7.3</LangVersion>
  </PropertyGroup>
  <PropertyGroup Condition=" '$(Configuration)|$(Platform)' == 'Debug|AnyCPU' ">
    <PlatformTarget>AnyCPU</PlatformTarget>
    <DebugSymbols>true</DebugSymbols>
    <DebugType>full</DebugType>
    <Optimize>false</Optimize>
    <OutputPath>bin\Debug\</OutputPath>
    <DefineConstants>DEBUG;TRACE</DefineConstants>
    <ErrorReport>prompt</ErrorReport>
    <WarningLevel>4</WarningLevel>
  </PropertyGroup>
  <PropertyGroup Condition=" '$(Configuration)|$(Platform)' == 'Release|AnyCPU' ">
    <PlatformTarget>AnyCPU</PlatformTarget>
    <DebugType>pdbonly</DebugType>
    <Optimize>true</Optimize>
    <OutputPath>bin\Release\</OutputPath>
    <DefineConstants>TRACE</DefineConstants>
    <ErrorReport>prompt</ErrorReport>
    <WarningLevel>4</WarningLevel>
  </PropertyGroup>
  <ItemGroup>
    <Reference Include="Newtonsoft.Json, Version=12.0.0.0, Culture=neutral, PublicKeyToken=30ad4fe6b2a6aeed, processorArchitecture=MSIL">
      <HintPath>..\packages\Newtonsoft.Json.12.0.3\lib\net45\Newtonsoft.Json.dll</HintPath>
    </Reference>
    <Reference Include="System" />
    <Reference Include="System.Core" />
    <Reference Include="System.Data" />
  </ItemGroup>
  <ItemGroup>
    <Compile Include="Program.cs" />
    <Compile Include="Properties\AssemblyInfo.cs" />
  </ItemGroup>
  <ItemGroup>
    <None Include="App.config" />
    <None Include="packages.config" />
  </ItemGroup>
  <Import Project="$(MSBuildToolsPath)\Microsoft.CSharp.targets" />
</Project>
"#;

const PACKAGES_CONFIG: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<packages>
  <package id="Newtonsoft.Json" version="12.0.3" targetFramework="net472" />
  <package id="Microsoft.Net.Compilers" version="2.10.0" targetFramework="net472" developmentDependency="true" />
  <package id="System.ValueTuple" version="4.5.0" targetFramework="net472" />
</packages>
"#;

const CONSOLE_ITEMS: &[(&str, &str)] = &[
    ("Compile", "Program.cs"),
    ("Compile", "Properties\\AssemblyInfo.cs"),
    ("None", "App.config"),
    ("None", "packages.config"),
];

fn console_snapshots() -> serde_json::Value {
    let common = [
        ("OutputType", "Exe"),
        ("RootNamespace", "Console"),
        ("AssemblyName", "Console"),
    ];
    let legacy = |debug_type: &str, optimize: &str| {
        let mut properties = common.to_vec();
        properties.extend([
            ("TargetFrameworkVersion", "v4.7.2"),
            ("LangVersion", "7.3"),
            ("DebugSymbols", "true"),
        ]);
        properties.push(("DebugType", debug_type));
        properties.push(("Optimize", optimize));
        snapshot(&properties, CONSOLE_ITEMS)
    };
    let baseline = |optimize: &str| {
        let mut properties = common.to_vec();
        properties.extend([
            ("TargetFramework", "net8.0"),
            ("LangVersion", "12.0"),
            ("DebugSymbols", "true"),
            ("DebugType", "portable"),
        ]);
        properties.push(("Optimize", optimize));
        let mut items = CONSOLE_ITEMS.to_vec();
        items.push(("Compile", "Tools\\Scratch.cs"));
        snapshot(&properties, &items)
    };

    json!({
        "legacy": {
            "Debug|AnyCPU": legacy("full", "false"),
            "Release|AnyCPU": legacy("pdbonly", "true"),
        },
        "baseline": {
            "Debug|AnyCPU": baseline("false"),
            "Release|AnyCPU": baseline("true"),
        },
    })
}

fn convert_in_place(fixture: &ProjectFixture, options: &ConvertOptions) -> sdkify::workspace::ConvertedProject {
    let workspace = Workspace::new(options, &PackagesConfigReader);
    workspace
        .convert_job(
            &ProjectJob::new(&fixture.project, None),
            &OutputTarget::InPlace {
                backup: options.backup,
            },
        )
        .unwrap()
}

// =============================================================================
// CONSOLE APPLICATION
// =============================================================================

#[test]
fn test_console_app_end_to_end() {
    let fixture = ProjectFixture::new("Console.csproj", CONSOLE_APP, &console_snapshots());
    fixture.write("packages.config", PACKAGES_CONFIG);

    let converted = convert_in_place(&fixture, &ConvertOptions::default());
    assert_eq!(converted.target_framework, "net8.0");

    let xml = fixture.read_project();
    assert!(xml.contains(r#"Sdk="Microsoft.NET.Sdk""#));
    assert!(!xml.contains("<Import"));
    assert!(!xml.contains("ToolsVersion"));
    assert!(!xml.contains("DefaultTargets"));

    // Boilerplate gone
    for removed in [
        "ProjectGuid",
        "TargetFrameworkVersion",
        "FileAlignment",
        "RootNamespace",
        "AssemblyName",
        "PlatformTarget",
        "OutputPath",
        "DefineConstants",
        "ErrorReport",
        "WarningLevel",
        "Optimize",
        "DebugSymbols",
        "<Configuration",
        "<Platform",
    ] {
        assert!(!xml.contains(removed), "{removed} survived:\n{xml}");
    }

    // Non-default values survive
    assert_eq!(element_text(&xml, "LangVersion"), Some("7.3"));
    assert!(xml.contains("<DebugType>full</DebugType>"));
    assert!(xml.contains("<DebugType>pdbonly</DebugType>"));
    assert_eq!(element_text(&xml, "OutputType"), Some("Exe"));
    assert_eq!(element_text(&xml, "TargetFramework"), Some("net8.0"));
    assert_eq!(element_text(&xml, "GenerateAssemblyInfo"), Some("false"));
}

#[test]
fn test_console_app_items_and_packages() {
    let fixture = ProjectFixture::new("Console.csproj", CONSOLE_APP, &console_snapshots());
    fixture.write("packages.config", PACKAGES_CONFIG);

    let converted = convert_in_place(&fixture, &ConvertOptions::default());
    assert_eq!(converted.summary.packages_added, 1);
    assert_eq!(converted.summary.item_removes_added, 1);

    let document = ProjectDocument::load(&fixture.project).unwrap();
    assert!(!document.has_item_type("Reference"));
    assert!(!document.has_item_type("None"));

    let packages: Vec<(&str, Option<&str>)> = document
        .items()
        .filter(|i| i.is_type("PackageReference"))
        .map(|i| (i.spec.as_str(), i.metadata_value("Version")))
        .collect();
    assert_eq!(packages, vec![("Newtonsoft.Json", Some("12.0.3"))]);

    let compile: Vec<String> = document
        .items()
        .filter(|i| i.is_type("Compile"))
        .map(|i| format!("{:?} {}", i.operation, i.spec))
        .collect();
    assert_eq!(compile, vec!["Remove Tools\\Scratch.cs"]);
}

#[test]
fn test_backup_keeps_legacy_file() {
    let fixture = ProjectFixture::new("Console.csproj", CONSOLE_APP, &console_snapshots());
    convert_in_place(&fixture, &ConvertOptions::default());
    assert_eq!(read(&backup_path(&fixture.project)), CONSOLE_APP);

    let fixture = ProjectFixture::new("Console.csproj", CONSOLE_APP, &console_snapshots());
    let options = ConvertOptions {
        backup: false,
        ..ConvertOptions::default()
    };
    convert_in_place(&fixture, &options);
    assert!(!backup_path(&fixture.project).exists());
}

#[test]
fn test_unreadable_manifest_still_converts() {
    let fixture = ProjectFixture::new("Console.csproj", CONSOLE_APP, &console_snapshots());
    fixture.write("packages.config", "<not-packages />");

    let converted = convert_in_place(&fixture, &ConvertOptions::default());
    assert_eq!(converted.summary.packages_added, 0);

    let xml = fixture.read_project();
    assert!(!xml.contains("packages.config"));
    assert!(!xml.contains("PackageReference"));
    // Without a migrated manifest the hinted reference has nothing replacing it
    assert!(xml.contains("Newtonsoft.Json.12.0.3"));
}

// =============================================================================
// DESKTOP APPLICATIONS
// =============================================================================

const WPF_APP: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<Project ToolsVersion="15.0" xmlns="http://schemas.microsoft.com/developer/msbuild/2003">
  <Import Project="$(MSBuildExtensionsPath)\$(MSBuildToolsVersion)\Microsoft.Common.props" />
  <PropertyGroup>
    <OutputType>WinExe</OutputType>
    <TargetFrameworkVersion>v4.8</TargetFrameworkVersion>
    <ProjectTypeGuids>{60dc8134-eba5-43b8-bcc9-bb4bc16c2548};{FAE04EC0-301F-11D3-BF4B-00C04F79EFBC}</ProjectTypeGuids>
  </PropertyGroup>
  <ItemGroup>
    <Reference Include="System" />
    <Reference Include="System.Xaml" />
    <Reference Include="WindowsBase" />
    <Reference Include="PresentationCore" />
    <Reference Include="PresentationFramework" />
  </ItemGroup>
  <ItemGroup>
    <ApplicationDefinition Include="App.xaml">
      <Generator>MSBuild:Compile</Generator>
      <SubType>Designer</SubType>
    </ApplicationDefinition>
    <Page Include="MainWindow.xaml">
      <Generator>MSBuild:Compile</Generator>
      <SubType>Designer</SubType>
    </Page>
    <Compile Include="App.xaml.cs">
      <DependentUpon>App.xaml</DependentUpon>
      <SubType>Code</SubType>
    </Compile>
    <Compile Include="MainWindow.xaml.cs">
      <DependentUpon>MainWindow.xaml</DependentUpon>
      <SubType>Code</SubType>
    </Compile>
  </ItemGroup>
  <Import Project="$(MSBuildToolsPath)\Microsoft.CSharp.targets" />
</Project>
"#;

#[test]
fn test_wpf_app() {
    let items = [
        ("ApplicationDefinition", "App.xaml"),
        ("Page", "MainWindow.xaml"),
        ("Compile", "App.xaml.cs"),
        ("Compile", "MainWindow.xaml.cs"),
    ];
    let fixture = ProjectFixture::new(
        "Viewer.csproj",
        WPF_APP,
        &snapshots(
            snapshot(&[("OutputType", "WinExe"), ("TargetFrameworkVersion", "v4.8")], &items),
            snapshot(
                &[
                    ("TargetFramework", "net8.0-windows"),
                    ("OutputType", "WinExe"),
                    ("UseWPF", "true"),
                ],
                &items,
            ),
        ),
    );

    let converted = convert_in_place(&fixture, &ConvertOptions::default());
    assert_eq!(converted.target_framework, "net8.0-windows");

    let document = ProjectDocument::load(&fixture.project).unwrap();
    assert_eq!(document.sdk(), Some("Microsoft.NET.Sdk.WindowsDesktop"));
    assert_eq!(
        document.unconditioned_property("UseWPF").map(|p| p.value.as_str()),
        Some("true")
    );
    assert!(document.unconditioned_property("UseWindowsForms").is_none());
    assert!(document.unconditioned_property("ProjectTypeGuids").is_none());
    assert_eq!(document.items().count(), 0);
}

// =============================================================================
// OPTIONS
// =============================================================================

const CLASS_LIBRARY: &str = r#"<Project ToolsVersion="15.0">
  <Import Project="$(MSBuildExtensionsPath)\$(MSBuildToolsVersion)\Microsoft.Common.props" />
  <PropertyGroup>
    <OutputType>Library</OutputType>
    <TargetFrameworkVersion>v4.8</TargetFrameworkVersion>
  </PropertyGroup>
  <ItemGroup>
    <Reference Include="System" />
    <Reference Include="System.Configuration" />
  </ItemGroup>
  <ItemGroup>
    <Compile Include="Settings.cs" />
  </ItemGroup>
  <Import Project="$(MSBuildToolsPath)\Microsoft.CSharp.targets" />
</Project>
"#;

fn library_fixture() -> ProjectFixture {
    let items = [("Compile", "Settings.cs")];
    ProjectFixture::new(
        "Library.csproj",
        CLASS_LIBRARY,
        &snapshots(
            snapshot(&[("OutputType", "Library"), ("TargetFrameworkVersion", "v4.8")], &items),
            snapshot(&[("OutputType", "Library")], &items),
        ),
    )
}

#[test]
fn test_options_file_target_properties() {
    let fixture = library_fixture();
    let options_path = fixture.write(
        "sdkify.toml",
        r#"
target_framework = "net6.0"

[[target_property]]
name = "Nullable"
value = "disable"

[[target_property]]
name = "ImplicitUsings"
value = "disable"
"#,
    );
    let options = ConvertOptions::load(&options_path).unwrap();

    let converted = convert_in_place(&fixture, &options);
    assert_eq!(converted.target_framework, "net6.0");

    let document = ProjectDocument::load(&fixture.project).unwrap();
    let group = document.property_groups().next().unwrap();
    let names: Vec<&str> = group.properties.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["TargetFramework", "OutputType", "GenerateAssemblyInfo", "Nullable", "ImplicitUsings"]
    );

    // System.Configuration became its package on .NET
    let packages: Vec<&str> = document
        .items()
        .filter(|i| i.is_type("PackageReference"))
        .map(|i| i.spec.as_str())
        .collect();
    assert_eq!(packages, vec!["System.Configuration.ConfigurationManager"]);
}

#[test]
fn test_keep_current_framework() {
    let fixture = library_fixture();
    let options = ConvertOptions {
        keep_current_tfm: true,
        ..ConvertOptions::default()
    };

    let converted = convert_in_place(&fixture, &options);
    assert_eq!(converted.target_framework, "net48");

    // .NET Framework still ships System.Configuration
    let document = ProjectDocument::load(&fixture.project).unwrap();
    assert!(document.has_reference("System.Configuration"));
    assert!(!document.has_reference("System"));
    assert!(!document.has_item_type("PackageReference"));
}

// =============================================================================
// DIFF REPORT
// =============================================================================

#[test]
fn test_diff_report_leaves_project_alone() {
    let fixture = ProjectFixture::new("Console.csproj", CONSOLE_APP, &console_snapshots());
    let options = ConvertOptions::default();
    let workspace = Workspace::new(&options, &PackagesConfigReader);

    let report = workspace
        .diff_job(&ProjectJob::new(&fixture.project, None))
        .unwrap();
    assert_eq!(fixture.read_project(), CONSOLE_APP);

    let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
    assert_eq!(json["project"], "Console");
    assert_eq!(json["style"], "Default");
    assert_eq!(json["target_framework"], "net8.0");

    let debug = &json["configurations"][0];
    assert_eq!(debug["configuration"], "Debug|AnyCPU");
    let changed: Vec<&str> = debug["changed_properties"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|v| v.as_str())
        .collect();
    assert!(changed.contains(&"DebugType"));
    assert!(changed.contains(&"LangVersion"));

    let text = report.render_text();
    assert!(text.contains("Introduced Compile items:\n    - Tools\\Scratch.cs"));
}
