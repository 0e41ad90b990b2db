// src/project/mod.rs

//! Project document model
//!
//! Reading, editing and writing MSBuild project files. The [`ProjectDocument`]
//! is the mutable construction tree the converter works on.

mod document;
pub mod element;

pub use document::{
    Import, Item, ItemGroup, ItemOperation, Metadata, ProjectChild, ProjectDocument, Property,
    PropertyGroup,
};
pub use element::{XmlElement, XmlNode};
