// build.rs

use clap::{Arg, ArgAction, Command};
use clap_mangen::Man;
use std::env;
use std::fs;
use std::path::PathBuf;

/// Arguments shared by commands that evaluate a project
fn evaluation_args() -> [Arg; 4] {
    [
        Arg::new("snapshots")
            .short('s')
            .long("snapshots")
            .value_name("FILE")
            .help("Recorded snapshots (default: <PROJECT>.snapshots.json next to each project)"),
        Arg::new("config")
            .short('c')
            .long("config")
            .value_name("FILE")
            .help("Options file (TOML)"),
        Arg::new("target_framework")
            .long("target-framework")
            .value_name("TFM")
            .help("Framework moniker for converted projects"),
        Arg::new("keep_current_tfm")
            .long("keep-current-tfm")
            .action(ArgAction::SetTrue)
            .help("Keep the framework the legacy project already targets"),
    ]
}

fn build_cli() -> Command {
    Command::new("sdkify")
        .version(env!("CARGO_PKG_VERSION"))
        .author("sdkify Contributors")
        .about("Migrate legacy MSBuild projects to SDK-style projects")
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Log what every pass removes and adds"),
        )
        .subcommand(
            Command::new("convert")
                .about("Convert one or more legacy projects")
                .arg(
                    Arg::new("projects")
                        .required(true)
                        .num_args(1..)
                        .help("Project files to convert"),
                )
                .args(evaluation_args())
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .value_name("FILE")
                        .help("Write the converted project here instead of in place"),
                )
                .arg(
                    Arg::new("no_backup")
                        .long("no-backup")
                        .action(ArgAction::SetTrue)
                        .help("Do not keep a .old copy of projects converted in place"),
                ),
        )
        .subcommand(
            Command::new("diff")
                .about("Show what conversion would remove, rewrite and suppress")
                .arg(Arg::new("project").required(true).help("Project file to inspect"))
                .args(evaluation_args())
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Print the report as JSON"),
                ),
        )
        .subcommand(
            Command::new("completions")
                .about("Generate shell completions")
                .arg(Arg::new("shell").required(true).help("Shell to generate completions for")),
        )
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    let manifest_dir = match env::var("CARGO_MANIFEST_DIR") {
        Ok(dir) => PathBuf::from(dir),
        Err(e) => {
            println!("cargo:warning=CARGO_MANIFEST_DIR not set: {}", e);
            return;
        }
    };
    let man_dir = manifest_dir.join("man");

    if let Err(e) = fs::create_dir_all(&man_dir) {
        println!("cargo:warning=Failed to create man directory: {}", e);
        return;
    }

    let man = Man::new(build_cli());
    let mut buffer = Vec::new();
    if let Err(e) = man.render(&mut buffer) {
        println!("cargo:warning=Failed to render man page: {}", e);
        return;
    }

    let man_path = man_dir.join("sdkify.1");
    if let Err(e) = fs::write(&man_path, buffer) {
        println!("cargo:warning=Failed to write man page: {}", e);
    }
}
