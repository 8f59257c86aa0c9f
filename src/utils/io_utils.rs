//! I/O utility functions for source files and dictionary paths.
//!
//! This module provides helper functions for:
//! - Reading whole files into memory
//! - Decoding source text with a configurable character encoding
//! - Stripping a UTF-8 byte order mark
//! - Expanding `~` and environment variables in configured paths

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use encoding_rs::Encoding;
use log::debug;

use crate::{DictError, Result};

/// Removes a leading UTF-8 byte order mark, if present.
pub fn skip_utf8_bom(line: &str) -> &str {
    line.strip_prefix('\u{FEFF}').unwrap_or(line)
}

/// Reads all bytes from a file path.
pub fn bytes_from_file<P: AsRef<Path>>(path: P) -> Result<Vec<u8>> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut buffer = Vec::new();
    reader.read_to_end(&mut buffer)?;
    Ok(buffer)
}

/// Gets an encoding object by its label string.
///
/// # Examples
///
/// ```
/// use dictcc::utils::io_utils::get_encoding_object_by_label;
///
/// assert_eq!(get_encoding_object_by_label("UTF-8").unwrap(), encoding_rs::UTF_8);
/// assert_eq!(get_encoding_object_by_label("latin1").unwrap(), encoding_rs::WINDOWS_1252);
/// assert!(get_encoding_object_by_label("klingon").is_err());
/// ```
pub fn get_encoding_object_by_label(label: &str) -> Result<&'static Encoding> {
    let encoding = label.trim().to_lowercase();
    let label = match encoding.as_str() {
        "utf-16" => "utf-16le",
        _ => encoding.as_str(),
    };
    Encoding::for_label(label.as_bytes())
        .ok_or_else(|| DictError::invalid_parameter(format!("Invalid encoding: {}", encoding)))
}

/// Decodes bytes to a string using the specified encoding.
///
/// A byte order mark matching the data overrides `encoding_obj` and is
/// removed from the output.
pub fn decode_bytes_to_string(bytes: &[u8], encoding_obj: &'static Encoding) -> String {
    let (decoded, used_encoding, had_errors) = encoding_obj.decode(bytes);
    if had_errors {
        debug!("Decoding error with: {}", used_encoding.name());
    }
    skip_utf8_bom(&decoded).to_string()
}

/// Expands `~` and `$VARS` in a configured path.
///
/// # Examples
///
/// ```
/// use dictcc::utils::io_utils::expand_path;
///
/// let plain = expand_path("/var/lib/dictcc").unwrap();
/// assert_eq!(plain, std::path::PathBuf::from("/var/lib/dictcc"));
/// ```
pub fn expand_path(path: &str) -> Result<PathBuf> {
    let expanded = shellexpand::full(path)
        .map_err(|e| DictError::invalid_parameter(format!("Cannot expand path {}: {}", path, e)))?;
    Ok(PathBuf::from(expanded.as_ref()))
}
