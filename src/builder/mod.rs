//! Builder module for importing dict.cc source files
//!
//! This module reads dict.cc text exports, derives the headword of every
//! phrase and writes the grouped entries into the two direction stores.

pub mod headword;
pub mod source_loader;
pub mod dict_builder;

// Re-export commonly used types for convenience
pub use headword::extract_headword;
pub use source_loader::{DictSourceLoader, PhrasePair, SourceLine, parse_source_line};
pub use dict_builder::{DictBuilder, ImportSummary};
