//! Core library for importing relic scanner snapshots into canonical
//! character and relic records.

pub mod catalog;
pub mod config;
pub mod error;
pub mod file_utils;
pub mod fuzzy;
pub mod models;
pub mod pipeline;
pub mod readers;
pub mod stats;
pub mod trailblazer;
pub mod version;

#[cfg(test)]
pub(crate) mod test_support;

pub use catalog::GameCatalog;
pub use config::ScannerConfig;
pub use error::{ImportError, Result};
pub use pipeline::{ImportOutput, ImportPipeline, ImportSummary, RecordWarning, RelicAugmenter};
