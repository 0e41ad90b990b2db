// src/diff/mod.rs

//! Comparing a legacy project with its SDK-style baseline

mod differ;
mod report;

pub use differ::{Classification, Differ, Differs, ItemsDiff, PropertiesDiff};
pub use report::{ConfigurationReport, DiffReport, ItemTypeReport, generate_report};
