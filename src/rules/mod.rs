// src/rules/mod.rs

//! Classification rules
//!
//! Pure functions over declarations and fixed fact tables. Nothing here
//! touches the document; the converter decides what to do with a verdict.

pub mod facts;
pub mod globs;
pub mod items;
pub mod packages;
pub mod properties;
pub mod tfm;

pub use globs::ProjectLanguage;
pub use items::{ITEM_RULES, ItemAction, ItemContext, ItemRule, first_matching_rule};
pub use properties::{PropertyContext, PropertyVerdict, classify_property};
pub use tfm::TargetFramework;
