// Utility functions and helpers
//
// This module provides general-purpose helpers for I/O, source decoding,
// value compression and progress reporting.

pub mod io_utils;
pub mod progress_report;
pub mod compression;

pub use io_utils::{bytes_from_file, decode_bytes_to_string, expand_path, get_encoding_object_by_label, skip_utf8_bom};
pub use progress_report::{ProgressState, ProgressReportFn};
pub use compression::{CompressionMethod, Compressor, get_compressor};
