//! Dictionary entries and their serialized store representation.
//!
//! A [`DictEntry`] collects every phrase that reduced to one headword together
//! with the translations found for it. In a store, the entry is kept as a
//! single string:
//!
//! ```text
//! entry        := group ("#<>#" group)*
//! group        := phrase "=<>" translations
//! translations := translation (":<>:" translation)*
//! ```
//!
//! Groups are written shortest phrase first, so the first group of a stored
//! entry is always the closest match for its headword. The delimiters are not
//! escaped: text containing `=<>`, `:<>:` or `#<>#` cannot be stored faithfully.
//!
//! # Examples
//!
//! ```
//! use dictcc::storage::entry::{DictEntry, decode};
//! use dictcc::storage::render::OutputFormat;
//!
//! # fn main() -> dictcc::Result<()> {
//! let mut entry = DictEntry::new();
//! entry.append(" das Haus ", "the house");
//! entry.append("Haus", "house");
//! entry.append("Haus", "home");
//!
//! let stored = entry.encode();
//! assert_eq!(stored, "Haus=<>house:<>:home#<>#das Haus=<>the house");
//!
//! let text = decode(&stored, OutputFormat::Normal)?;
//! assert!(text.starts_with("Haus:\n    - house\n"));
//! # Ok(())
//! # }
//! ```

use indexmap::IndexMap;

use crate::storage::render::{render_groups, OutputFormat};
use crate::{DictError, Result};

pub const GROUP_SEPARATOR: &str = "#<>#";
pub const PHRASE_SEPARATOR: &str = "=<>";
pub const TRANSLATION_SEPARATOR: &str = ":<>:";

/// All translations collected for one headword during an import.
///
/// Phrases keep the order in which they were first seen; translations of a
/// phrase keep the order in which they were appended.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DictEntry {
    groups: IndexMap<String, Vec<String>>,
}

/// One phrase and its translations, as read back from a stored entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryGroup {
    pub phrase: String,
    pub translations: Vec<String>,
}

impl DictEntry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `translation` to the translations of `phrase`.
    ///
    /// Both strings are trimmed. Duplicate translations are kept.
    pub fn append(&mut self, phrase: &str, translation: &str) {
        self.groups
            .entry(phrase.trim().to_string())
            .or_default()
            .push(translation.trim().to_string());
    }

    pub fn phrase_count(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn translations(&self, phrase: &str) -> Option<&[String]> {
        self.groups.get(phrase).map(|v| v.as_slice())
    }

    /// Encodes the entry into its stored string form.
    ///
    /// Groups are ordered by ascending phrase length in characters; phrases of
    /// equal length stay in encounter order.
    pub fn encode(&self) -> String {
        let mut groups: Vec<(&String, &Vec<String>)> = self.groups.iter().collect();
        groups.sort_by_key(|(phrase, _)| phrase.chars().count());

        let mut encoded = String::new();
        for (n, (phrase, translations)) in groups.into_iter().enumerate() {
            if n > 0 {
                encoded.push_str(GROUP_SEPARATOR);
            }
            encoded.push_str(phrase);
            encoded.push_str(PHRASE_SEPARATOR);
            encoded.push_str(&translations.join(TRANSLATION_SEPARATOR));
        }
        encoded
    }
}

/// Splits a stored entry into its phrase groups.
///
/// # Errors
///
/// Returns a `Format` error when a group has no `=<>` separator or the entry
/// is empty. Entries written by [`DictEntry::encode`] never trigger this.
pub fn parse_groups(serialized: &str) -> Result<Vec<EntryGroup>> {
    let serialized = serialized.trim_end_matches(['\r', '\n']);
    if serialized.is_empty() {
        return Err(DictError::format_error("Empty entry"));
    }
    serialized
        .split(GROUP_SEPARATOR)
        .map(|group| {
            let (phrase, translations) = group.split_once(PHRASE_SEPARATOR).ok_or_else(|| {
                DictError::format_error(format!("Group without '{}' separator: {:?}", PHRASE_SEPARATOR, group))
            })?;
            Ok(EntryGroup {
                phrase: phrase.to_string(),
                translations: translations.split(TRANSLATION_SEPARATOR).map(str::to_string).collect(),
            })
        })
        .collect()
}

/// Decodes a stored entry and renders it for display.
pub fn decode(serialized: &str, format: OutputFormat) -> Result<String> {
    let groups = parse_groups(serialized)?;
    Ok(render_groups(&groups, format))
}
