// tests/cli.rs
//! Command-line behavior: exit codes, batch isolation and report output

mod common;

use common::{ProjectFixture, snapshot, snapshots};
use std::process::Command;

use sdkify::workspace::backup_path;

fn sdkify_cmd() -> Command {
    Command::new(env!("CARGO_BIN_EXE_sdkify"))
}

const LIBRARY: &str = r#"<Project ToolsVersion="15.0">
  <Import Project="$(MSBuildExtensionsPath)\$(MSBuildToolsVersion)\Microsoft.Common.props" />
  <PropertyGroup>
    <OutputType>Library</OutputType>
  </PropertyGroup>
  <ItemGroup>
    <Compile Include="Class1.cs" />
  </ItemGroup>
  <Import Project="$(MSBuildToolsPath)\Microsoft.CSharp.targets" />
</Project>
"#;

fn library(name: &str) -> ProjectFixture {
    let items = [("Compile", "Class1.cs")];
    ProjectFixture::new(
        name,
        LIBRARY,
        &snapshots(
            snapshot(&[("OutputType", "Library")], &items),
            snapshot(&[("TargetFramework", "net8.0"), ("OutputType", "Library")], &items),
        ),
    )
}

#[test]
fn convert_succeeds_and_backs_up() {
    let fixture = library("Lib.csproj");
    let output = sdkify_cmd()
        .arg("convert")
        .arg(&fixture.project)
        .output()
        .expect("failed to run sdkify");

    assert!(
        output.status.success(),
        "convert should exit 0: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(String::from_utf8_lossy(&output.stdout).contains("Target framework: net8.0"));
    assert!(fixture.read_project().contains(r#"Sdk="Microsoft.NET.Sdk""#));
    assert!(backup_path(&fixture.project).exists());
}

#[test]
fn batch_failure_exits_nonzero_and_keeps_other_results() {
    let good = library("Good.csproj");
    let missing = good.path("Missing.csproj");

    let output = sdkify_cmd()
        .arg("convert")
        .arg(&missing)
        .arg(&good.project)
        .arg("--no-backup")
        .output()
        .expect("failed to run sdkify");

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Missing.csproj"));
    assert!(good.read_project().contains("<TargetFramework>net8.0</TargetFramework>"));
    assert!(!backup_path(&good.project).exists());
}

#[test]
fn explicit_output_leaves_project_alone() {
    let fixture = library("Lib.csproj");
    let out = fixture.path("converted.csproj");

    let status = sdkify_cmd()
        .arg("convert")
        .arg(&fixture.project)
        .arg("--output")
        .arg(&out)
        .status()
        .expect("failed to run sdkify");

    assert!(status.success());
    assert_eq!(fixture.read_project(), LIBRARY);
    assert!(common::read(&out).contains("<TargetFramework>net8.0</TargetFramework>"));
}

#[test]
fn diff_prints_json() {
    let fixture = library("Lib.csproj");
    let output = sdkify_cmd()
        .arg("diff")
        .arg(&fixture.project)
        .arg("--json")
        .output()
        .expect("failed to run sdkify");

    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["project"], "Lib");
    assert_eq!(report["configurations"][1]["configuration"], "Release|AnyCPU");
    assert_eq!(report["configurations"][0]["items"][0]["defaulted"][0], "Class1.cs");
    assert_eq!(fixture.read_project(), LIBRARY);
}

#[test]
fn completions_are_generated() {
    let output = sdkify_cmd()
        .args(["completions", "bash"])
        .output()
        .expect("failed to run sdkify");
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("sdkify"));
}
