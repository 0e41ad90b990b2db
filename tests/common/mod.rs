// tests/common/mod.rs

//! Shared test utilities and helpers for integration tests.

#![allow(dead_code)]

use serde_json::{Map, Value, json};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use sdkify::workspace::default_snapshot_path;

/// A project directory on disk. Keep it alive for the duration of the test.
pub struct ProjectFixture {
    pub dir: TempDir,
    pub project: PathBuf,
}

impl ProjectFixture {
    /// Write `name` with `xml` and its recorded snapshots into a fresh directory
    pub fn new(name: &str, xml: &str, snapshots: &Value) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let project = dir.path().join(name);
        fs::write(&project, xml).unwrap();
        fs::write(
            default_snapshot_path(&project),
            serde_json::to_string_pretty(snapshots).unwrap(),
        )
        .unwrap();
        Self { dir, project }
    }

    /// Write a file next to the project
    pub fn write(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.dir.path().join(relative)
    }

    pub fn read_project(&self) -> String {
        read(&self.project)
    }
}

pub fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap()
}

/// One configuration's snapshot: `properties` as name/value pairs and
/// `items` as (type, include) pairs
pub fn snapshot(properties: &[(&str, &str)], items: &[(&str, &str)]) -> Value {
    let properties: Map<String, Value> = properties
        .iter()
        .map(|(name, value)| (name.to_string(), json!(value)))
        .collect();

    let mut by_type: Map<String, Value> = Map::new();
    for (item_type, include) in items {
        let list = by_type
            .entry(item_type.to_string())
            .or_insert_with(|| json!([]));
        if let Value::Array(list) = list {
            list.push(json!({ "include": include }));
        }
    }

    json!({ "properties": properties, "items": by_type })
}

/// Legacy and baseline snapshots, the same for Debug and Release
pub fn snapshots(legacy: Value, baseline: Value) -> Value {
    json!({
        "legacy": { "Debug|AnyCPU": legacy.clone(), "Release|AnyCPU": legacy },
        "baseline": { "Debug|AnyCPU": baseline.clone(), "Release|AnyCPU": baseline },
    })
}

/// Text between `<tag>` and `</tag>`, first occurrence
pub fn element_text<'a>(xml: &'a str, tag: &str) -> Option<&'a str> {
    let open = format!("<{tag}>");
    let close = format!("</{tag}>");
    let start = xml.find(&open)? + open.len();
    let end = xml[start..].find(&close)? + start;
    Some(&xml[start..end])
}
