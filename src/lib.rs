//! # dictcc - German/English dictionary built from dict.cc exports
//!
//! This crate imports the plain-text phrase lists published by dict.cc into two
//! local key-value stores (German→English and English→German) and answers
//! queries against them.
//!
//! ## Features
//!
//! - **Import**: group every phrase under a single lowercase headword, per direction
//! - **Exact queries**: O(1) headword lookup
//! - **Pattern queries** (`:r:`): regular expression over all headwords
//! - **Full-text queries** (`:f:`): regular expression over the rendered entries
//! - **Two output layouts**: `normal` (indented) and `compact` (one line per phrase)
//! - **Compressed stores**: values are stored Deflate or LZ4 compressed with checksums
//!
//! ## Quick Start
//!
//! ```no_run
//! use dictcc::{DictConfig, Dictionary, OutputFormat};
//!
//! # fn main() -> dictcc::Result<()> {
//! let config = DictConfig {
//!     output_format: OutputFormat::Compact,
//!     ..DictConfig::default()
//! };
//! let dictionary = Dictionary::new(config);
//! dictionary.import("/path/to/dict.cc.txt", None)?;
//!
//! let mut stdout = std::io::stdout();
//! dictionary.query("Haus", &mut stdout)?;
//! dictionary.query(":f:front door", &mut stdout)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - **Builder**: [`builder`] reads the source file and writes the stores
//! - **Storage**: [`storage`] holds the entry codec, rendering and store files
//! - **Readers**: [`readers`] parses queries and evaluates them
//! - **Utilities**: [`utils`] for compression, I/O helpers and progress reporting
//!
//! ## Error Handling
//!
//! All fallible operations return a [`Result<T>`] type, where errors are represented by
//! [`DictError`]. The crate uses the `snafu` library for error handling with
//! context and backtraces.

pub mod builder;
pub mod config;
pub mod dictionary;
pub mod error;
pub mod readers;
pub mod storage;
pub mod utils;

// Re-export commonly used types for convenience
pub use config::DictConfig;
pub use dictionary::{Dictionary, StoreInfo};
pub use readers::{Query, QueryMode};
pub use storage::{Direction, OutputFormat};

// Re-export error types for convenience
pub use error::{DictError, Result, snafu};
