// src/convert/mod.rs

//! Legacy to SDK-style project conversion

mod converter;

pub use converter::{Conversion, ConversionSummary, Converter};
