//! Reader for dict.cc text exports.
//!
//! Source files hold one translation per line:
//!
//! ```text
//! # comment
//! das Haus {n} :: house
//! ```
//!
//! The first `::` separates the German from the English phrase. Blank lines
//! and lines starting with `#` are ignored. Lines without a separator are
//! skipped with a warning.

use std::path::{Path, PathBuf};

use log::{debug, warn};

use crate::utils::io_utils::{bytes_from_file, decode_bytes_to_string, get_encoding_object_by_label};
use crate::utils::progress_report::{ProgressReportFn, ProgressState};
use crate::{DictError, Result};

pub const PHRASE_DELIMITER: &str = "::";

/// One German/English pair read from the source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhrasePair {
    pub german: String,
    pub english: String,
    /// 1-based line number in the source file
    pub line_no: u64,
}

/// Classification of a single source line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceLine<'a> {
    /// Blank line or comment
    Ignored,
    /// German and English halves, untrimmed
    Pair(&'a str, &'a str),
    /// Content without a `::` delimiter
    Malformed,
}

pub fn parse_source_line(line: &str) -> SourceLine<'_> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return SourceLine::Ignored;
    }
    match line.split_once(PHRASE_DELIMITER) {
        Some((german, english)) => SourceLine::Pair(german, english),
        None => SourceLine::Malformed,
    }
}

/// Every phrase pair of a source file, loaded up front.
///
/// The whole file is read before any store is touched, so an unreadable
/// source fails the import without side effects.
#[derive(Debug, Clone)]
pub struct DictSourceLoader {
    pub source_file: PathBuf,
    pub pairs: Vec<PhrasePair>,
    pub skipped_lines: u64,
}

impl DictSourceLoader {
    pub fn new<P: AsRef<Path>>(source_file: P, encoding_label: &str, prog_rpt: Option<ProgressReportFn>) -> Result<Self> {
        let source_file = source_file.as_ref().to_path_buf();
        let encoding = get_encoding_object_by_label(encoding_label)?;
        let bytes = bytes_from_file(&source_file).map_err(|e| match e {
            DictError::Io { source, .. } => DictError::source_file(&source_file, source),
            e => e,
        })?;
        let text = decode_bytes_to_string(&bytes, encoding);
        drop(bytes);

        let line_total = text.lines().count() as u64;
        let mut progress_state = ProgressState::new("Reading source file", line_total, 10, prog_rpt);
        let mut pairs = Vec::with_capacity(line_total as usize);
        let mut skipped_lines = 0u64;

        for (n, line) in text.lines().enumerate() {
            let line_no = n as u64 + 1;
            match parse_source_line(line) {
                SourceLine::Ignored => {}
                SourceLine::Pair(german, english) => pairs.push(PhrasePair {
                    german: german.to_string(),
                    english: english.to_string(),
                    line_no,
                }),
                SourceLine::Malformed => {
                    warn!("{}:{}: no '{}' delimiter, line skipped", source_file.display(), line_no, PHRASE_DELIMITER);
                    skipped_lines += 1;
                }
            }
            if progress_state.report(n as u64) {
                return Err(DictError::user_interrupted());
            }
        }
        debug!("Loaded {} phrase pairs from {}", pairs.len(), source_file.display());
        Ok(Self { source_file, pairs, skipped_lines })
    }
}
