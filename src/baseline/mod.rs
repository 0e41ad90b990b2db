// src/baseline/mod.rs

//! The SDK-style baseline a legacy project is compared against

mod builder;
mod style;

pub use builder::{BaselineBuilder, BaselineProject, baseline_document};
pub use style::{ProjectStyle, Toolkits, classify_style};
