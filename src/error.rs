//! Error types and result type for the dictcc crate.
//!
//! Every fallible operation in the crate returns [`Result<T>`], with failures
//! represented by [`DictError`]. The enum is built with `snafu`, so each variant
//! captures a backtrace at the point where it was created.
//!
//! # Examples
//!
//! ```
//! use dictcc::{Result, DictError};
//!
//! fn open_dictionary() -> Result<()> {
//!     Err(DictError::missing_store("/tmp/does-not-exist"))
//! }
//!
//! match open_dictionary() {
//!     Ok(()) => println!("opened"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```
//!
//! # Error Variants
//!
//! - [`DictError::Io`]: I/O errors from file operations
//! - [`DictError::MissingStore`]: the dictionary has not been imported yet
//! - [`DictError::SourceFile`]: the import source cannot be read
//! - [`DictError::Format`]: a stored entry or store file is malformed
//! - [`DictError::CrcMismatch`]: store checksum validation failed
//! - [`DictError::InvalidPattern`]: a pattern query is not a valid regex

use std::io;
use std::path::PathBuf;

use snafu::{Backtrace, Snafu};

// Re-export snafu for context providers
pub use snafu;

/// Main error type for the dictcc crate.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum DictError {
    /// I/O error occurred during file operations.
    #[snafu(display("IO error: {source}"))]
    Io {
        source: io::Error,
        backtrace: Backtrace,
    },

    /// The dictionary directory or one of its stores does not exist.
    #[snafu(display(
        "No dictionary found at {}. Import a dict.cc file first (dictcc --import FILE)",
        path.display()
    ))]
    MissingStore {
        path: PathBuf,
        backtrace: Backtrace,
    },

    /// The import source file could not be opened or read.
    #[snafu(display("Cannot read source file {}: {source}", path.display()))]
    SourceFile {
        path: PathBuf,
        source: io::Error,
        backtrace: Backtrace,
    },

    /// A serialized entry or a store file does not have the expected layout.
    #[snafu(display("Invalid data format: {message}"))]
    Format {
        message: String,
        backtrace: Backtrace,
    },

    /// Store checksum validation failed, indicating data corruption.
    #[snafu(display("CRC mismatch: expected {expected:#x}, got {got:#x}"))]
    CrcMismatch {
        expected: u32,
        got: u32,
        backtrace: Backtrace,
    },

    /// A pattern or full-text query could not be compiled.
    #[snafu(display("Invalid pattern '{pattern}': {source}"))]
    InvalidPattern {
        pattern: String,
        source: regex::Error,
        backtrace: Backtrace,
    },

    /// Error during compression or decompression of a stored value.
    #[snafu(display("Compression error: {message}"))]
    Compression {
        message: String,
        backtrace: Backtrace,
    },

    /// Function was called with invalid parameters.
    #[snafu(display("Invalid parameter: {message}"))]
    InvalidParameter {
        message: String,
        backtrace: Backtrace,
    },

    /// Error parsing JSON configuration.
    #[snafu(display("Parser error: {source}"))]
    ParserError {
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
        backtrace: Backtrace,
    },

    /// Operation was interrupted by the progress callback.
    #[snafu(display("User interrupted"))]
    UserInterrupted {
        backtrace: Backtrace,
    },
}

impl From<io::Error> for DictError {
    fn from(source: io::Error) -> Self {
        Self::Io { source, backtrace: Backtrace::capture() }
    }
}

impl From<serde_json::Error> for DictError {
    fn from(source: serde_json::Error) -> Self {
        Self::ParserError { source: Box::new(source), backtrace: Backtrace::capture() }
    }
}

impl From<std::string::FromUtf8Error> for DictError {
    fn from(source: std::string::FromUtf8Error) -> Self {
        Self::Format { message: format!("Invalid UTF-8 (String): {}", source), backtrace: Backtrace::capture() }
    }
}

impl From<std::str::Utf8Error> for DictError {
    fn from(source: std::str::Utf8Error) -> Self {
        Self::Format { message: format!("Invalid UTF-8 (&str): {}", source), backtrace: Backtrace::capture() }
    }
}

/// Helper methods for creating errors without context providers.
impl DictError {
    /// Creates a `Format` error with the given message.
    ///
    /// # Examples
    ///
    /// ```
    /// use dictcc::DictError;
    ///
    /// let error = DictError::format_error("group without '=<>' separator");
    /// assert!(error.is_format_error());
    /// ```
    pub fn format_error<S: Into<String>>(message: S) -> Self {
        Self::Format {
            message: message.into(),
            backtrace: Backtrace::capture(),
        }
    }

    /// Creates a `MissingStore` error for the given path.
    pub fn missing_store<P: Into<PathBuf>>(path: P) -> Self {
        Self::MissingStore {
            path: path.into(),
            backtrace: Backtrace::capture(),
        }
    }

    /// Creates a `SourceFile` error wrapping the underlying I/O failure.
    pub fn source_file<P: Into<PathBuf>>(path: P, source: io::Error) -> Self {
        Self::SourceFile {
            path: path.into(),
            source,
            backtrace: Backtrace::capture(),
        }
    }

    /// Creates an `InvalidPattern` error for a regex that failed to compile.
    pub fn invalid_pattern<S: Into<String>>(pattern: S, source: regex::Error) -> Self {
        Self::InvalidPattern {
            pattern: pattern.into(),
            source,
            backtrace: Backtrace::capture(),
        }
    }

    /// Creates an `InvalidParameter` error with the given message.
    pub fn invalid_parameter<S: Into<String>>(message: S) -> Self {
        Self::InvalidParameter {
            message: message.into(),
            backtrace: Backtrace::capture(),
        }
    }

    /// Creates a `Compression` error with the given message.
    pub fn compression_error<S: Into<String>>(message: S) -> Self {
        Self::Compression {
            message: message.into(),
            backtrace: Backtrace::capture(),
        }
    }

    /// Creates a `CrcMismatch` error with expected and actual checksum values.
    pub fn crc_mismatch(expected: u32, got: u32) -> Self {
        Self::CrcMismatch {
            expected,
            got,
            backtrace: Backtrace::capture(),
        }
    }

    /// Creates a `UserInterrupted` error.
    pub fn user_interrupted() -> Self {
        Self::UserInterrupted {
            backtrace: Backtrace::capture(),
        }
    }

    /// Checks if this error is a `MissingStore` variant.
    pub fn is_missing_store(&self) -> bool {
        matches!(self, DictError::MissingStore { .. })
    }

    /// Checks if this error is a `Format` variant.
    pub fn is_format_error(&self) -> bool {
        matches!(self, DictError::Format { .. })
    }
}

/// A specialized `Result` type for dictcc operations.
pub type Result<T> = std::result::Result<T, DictError>;
