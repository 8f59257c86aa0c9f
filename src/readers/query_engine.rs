//! Query evaluation over the direction stores.
//!
//! Three lookups are supported, selected by the [`Query`] variant:
//!
//! - `Exact`: one key lookup per store, O(1)
//! - `Pattern`: the regex is tested against every key, O(n)
//! - `FullText`: every entry is rendered and its lines are tested, O(n·m)
//!
//! Results are written to any [`Write`] sink. Stores are visited in the order
//! they are supplied, each preceded by its `{DE-EN}` / `{EN-DE}` label.
//! Queries never modify a store.

use std::io::Write;

use log::debug;
use regex::Regex;

use crate::readers::query::Query;
use crate::storage::direction::Direction;
use crate::storage::entry::decode;
use crate::storage::kv_store::KeyValueStore;
use crate::storage::render::OutputFormat;
use crate::{DictError, Result};

/// A query ready to run: patterns are compiled once up front.
#[derive(Debug, Clone)]
pub enum CompiledQuery {
    Exact(String),
    Pattern(Regex),
    FullText(Regex),
}

impl CompiledQuery {
    pub fn compile(query: &Query) -> Result<Self> {
        let compile_pattern = |pattern: &str| {
            Regex::new(pattern).map_err(|e| DictError::invalid_pattern(pattern, e))
        };
        Ok(match query {
            Query::Exact(key) => CompiledQuery::Exact(key.clone()),
            Query::Pattern(pattern) => CompiledQuery::Pattern(compile_pattern(pattern)?),
            Query::FullText(pattern) => CompiledQuery::FullText(compile_pattern(pattern)?),
        })
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct QueryEngine {
    pub output_format: OutputFormat,
}

impl QueryEngine {
    pub fn new(output_format: OutputFormat) -> Self {
        Self { output_format }
    }

    /// Runs `query` against each store in turn.
    ///
    /// Stores are pulled from `stores` one at a time, so a lazily opening
    /// iterator never holds two stores at once. Returns the number of matching
    /// entries (full-text: matching lines) over all stores.
    pub fn query_stores<S, I, W>(&self, query: &Query, stores: I, out: &mut W) -> Result<u64>
    where
        S: KeyValueStore,
        I: IntoIterator<Item = Result<(Direction, S)>>,
        W: Write,
    {
        let compiled = CompiledQuery::compile(query)?;
        let mut total = 0;
        for (n, store) in stores.into_iter().enumerate() {
            let (direction, store) = store?;
            if n > 0 {
                writeln!(out)?;
            }
            writeln!(out, "{{{}}}", direction.label())?;
            let matches = self.run_on(&compiled, &store, out)?;
            debug!("{} '{}': {} matches", direction, query, matches);
            total += matches;
        }
        out.flush()?;
        Ok(total)
    }

    /// Runs a compiled query against a single store.
    pub fn run_on<S: KeyValueStore, W: Write>(&self, query: &CompiledQuery, store: &S, out: &mut W) -> Result<u64> {
        match query {
            CompiledQuery::Exact(key) => self.query_simple(store, key, out),
            CompiledQuery::Pattern(pattern) => self.query_regexp(store, pattern, out),
            CompiledQuery::FullText(pattern) => self.query_fulltext_regexp(store, pattern, out),
        }
    }

    /// Prints the entry stored under `key`, if any.
    pub fn query_simple<S: KeyValueStore, W: Write>(&self, store: &S, key: &str, out: &mut W) -> Result<u64> {
        match store.get(key)? {
            Some(value) => {
                out.write_all(decode(&value, self.output_format)?.as_bytes())?;
                Ok(1)
            }
            None => Ok(0),
        }
    }

    /// Prints every entry whose key matches `pattern`.
    pub fn query_regexp<S: KeyValueStore, W: Write>(&self, store: &S, pattern: &Regex, out: &mut W) -> Result<u64> {
        let mut matches = 0;
        for key in store.keys().filter(|key| pattern.is_match(key)) {
            if let Some(value) = store.get(key)? {
                out.write_all(decode(&value, self.output_format)?.as_bytes())?;
                matches += 1;
            }
        }
        Ok(matches)
    }

    /// Prints the rendered lines of every entry that match `pattern`, plus the
    /// translation lines following a matching heading.
    ///
    /// Per entry, a heading (a non-blank line not starting with whitespace)
    /// clears the match state and is printed if it matches. An indented or
    /// blank line is dropped
    /// unless the current heading matched; if printed, it is tested on its own
    /// too and printed a second time when it matches. Matching is done on the
    /// lowercased line.
    pub fn query_fulltext_regexp<S: KeyValueStore, W: Write>(&self, store: &S, pattern: &Regex, out: &mut W) -> Result<u64> {
        let mut matches = 0;
        for key in store.keys() {
            let Some(value) = store.get(key)? else {
                continue;
            };
            let rendered = decode(&value, self.output_format)?;
            let mut match_line_found = false;
            for line in rendered.lines() {
                if is_continuation_line(line) {
                    if !match_line_found {
                        continue;
                    }
                    writeln!(out, "{}", line)?;
                } else {
                    match_line_found = false;
                }
                if pattern.is_match(&line.to_lowercase()) {
                    writeln!(out, "{}", line)?;
                    match_line_found = true;
                    matches += 1;
                }
            }
        }
        Ok(matches)
    }
}

// Blank lines, like the separators of the compact layout, continue the current phrase.
fn is_continuation_line(line: &str) -> bool {
    line.is_empty() || line.starts_with(char::is_whitespace)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::entry::DictEntry;
    use crate::storage::kv_store::MemoryStore;

    fn store_of(pairs: &[(&str, &str, &str)]) -> MemoryStore {
        let mut entries = indexmap::IndexMap::<String, DictEntry>::new();
        for (key, phrase, translation) in pairs {
            entries.entry(key.to_string()).or_default().append(phrase, translation);
        }
        let mut store = MemoryStore::new();
        for (key, entry) in entries {
            store.insert(key, entry.encode());
        }
        store
    }

    fn run(query: &str, store: &MemoryStore, format: OutputFormat) -> (String, u64) {
        let engine = QueryEngine::new(format);
        let compiled = CompiledQuery::compile(&Query::parse(query)).unwrap();
        let mut out = Vec::new();
        let matches = engine.run_on(&compiled, store, &mut out).unwrap();
        (String::from_utf8(out).unwrap(), matches)
    }

    #[test]
    fn test_exact_lookup() {
        let store = store_of(&[("haus", "Haus", "house"), ("haus", "das Haus", "the house")]);
        let (text, matches) = run("HAUS", &store, OutputFormat::Normal);
        assert_eq!(matches, 1);
        assert_eq!(text, "Haus:\n    - house\ndas Haus:\n    - the house\n");
        assert_eq!(run("maus", &store, OutputFormat::Normal), (String::new(), 0));
    }

    #[test]
    fn test_pattern_lookup_matches_keys() {
        let store = store_of(&[
            ("haus", "Haus", "house"),
            ("hauptbahnhof", "Hauptbahnhof", "central station"),
            ("maus", "Maus", "mouse"),
        ]);
        let (text, matches) = run(":r:^hau", &store, OutputFormat::Compact);
        assert_eq!(matches, 2);
        assert_eq!(text, "- Haus: house\n- Hauptbahnhof: central station\n");
    }

    #[test]
    fn test_fulltext_only_prints_translations_of_matching_heading() {
        let store = store_of(&[("cat", "cat", "feline"), ("dog", "dog", "canine")]);
        let (text, _) = run(":f:cat", &store, OutputFormat::Normal);
        assert_eq!(text, "cat:\n    - feline\n");
        let (text, _) = run(":f:dog", &store, OutputFormat::Normal);
        assert_eq!(text, "dog:\n    - canine\n");
    }

    #[test]
    fn test_fulltext_translation_matching_alone_is_skipped() {
        let store = store_of(&[("cat", "cat", "feline"), ("dog", "dog", "canine")]);
        let (text, matches) = run(":f:feline", &store, OutputFormat::Normal);
        assert_eq!(matches, 0);
        assert_eq!(text, "");
    }

    #[test]
    fn test_fulltext_prints_matching_translation_twice() {
        let store = store_of(&[("cat", "cat", "cat food"), ("cat", "cat", "feline")]);
        let (text, matches) = run(":f:cat", &store, OutputFormat::Normal);
        assert_eq!(matches, 2);
        assert_eq!(text, "cat:\n    - cat food\n    - cat food\n    - feline\n");
    }

    #[test]
    fn test_fulltext_heading_resets_match_state() {
        let store = store_of(&[("katze", "Katze", "cat"), ("katze", "die Katze", "the cat"), ("katze", "Katzenklo", "litter box")]);
        let (text, _) = run(":f:^die", &store, OutputFormat::Normal);
        assert_eq!(text, "die Katze:\n    - the cat\n");
    }

    #[test]
    fn test_fulltext_compact_line_carries_heading_and_translation() {
        let store = store_of(&[("cat", "cat", "feline"), ("cat", "tomcat", "male cat"), ("dog", "dog", "canine")]);
        let (text, matches) = run(":f:feline", &store, OutputFormat::Compact);
        assert_eq!(matches, 1);
        assert_eq!(text, "- cat: feline\n\n");
    }

    #[test]
    fn test_fulltext_blank_lines_never_start_a_match() {
        let store = store_of(&[("haus", "Haus", "house"), ("haus", "das Haus", "the house")]);
        let (text, matches) = run(":f:^$", &store, OutputFormat::Compact);
        assert_eq!(matches, 0);
        assert_eq!(text, "");

        let (text, matches) = run(":f:^$|^- haus:", &store, OutputFormat::Compact);
        assert_eq!(matches, 2);
        assert_eq!(text, "- Haus: house\n\n\n");
    }

    #[test]
    fn test_query_stores_labels_sections() {
        let de = store_of(&[("haus", "Haus", "house")]);
        let en = store_of(&[("house", "house", "Haus")]);
        let engine = QueryEngine::new(OutputFormat::Normal);
        let mut out = Vec::new();
        let stores: Vec<Result<(Direction, MemoryStore)>> = vec![Ok((Direction::DeEn, de)), Ok((Direction::EnDe, en))];
        let total = engine.query_stores(&Query::parse("haus"), stores, &mut out).unwrap();
        assert_eq!(total, 1);
        assert_eq!(String::from_utf8(out).unwrap(), "{DE-EN}\nHaus:\n    - house\n\n{EN-DE}\n");
    }

    #[test]
    fn test_invalid_pattern() {
        let err = CompiledQuery::compile(&Query::parse(":r:(unclosed")).unwrap_err();
        assert!(matches!(err, DictError::InvalidPattern { .. }));
    }
}
