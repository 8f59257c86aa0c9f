//! Dictionary builder: turns a dict.cc source file into the two direction stores.
//!
//! The import runs in three steps:
//! 1. Load every phrase pair of the source file ([`DictSourceLoader`])
//! 2. For each [`Direction`], group the pairs under the headword of their
//!    key-side phrase and write the encoded entries into a sealed temporary store
//! 3. Replace both live stores with the sealed files
//!
//! Nothing in the dictionary directory changes until step 3, so an unreadable
//! source, a failed write or a cancelled import leaves the previous stores in
//! place. Imports always rebuild both stores completely.
//!
//! Step 3 renames each sealed file over its live store, German→English first.
//! Each rename is atomic, the pair is not: if the second rename fails, the
//! German→English store is already new while the English→German store is still
//! the previous one. The error is returned and a re-import restores a
//! consistent pair.
//!
//! # Examples
//!
//! ```no_run
//! use dictcc::builder::DictBuilder;
//! use dictcc::config::DictConfig;
//!
//! # fn main() -> dictcc::Result<()> {
//! let config = DictConfig::default();
//! let summary = DictBuilder::build_with_config(&config, "dict.cc.txt", None)?;
//! println!("{} phrase pairs imported", summary.source_pairs);
//! # Ok(())
//! # }
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use log::*;

use crate::builder::headword::extract_headword;
use crate::builder::source_loader::{DictSourceLoader, PhrasePair};
use crate::config::DictConfig;
use crate::storage::direction::Direction;
use crate::storage::entry::DictEntry;
use crate::storage::kv_store::{SealedStore, StoreWriter};
use crate::utils::compression::CompressionMethod;
use crate::utils::progress_report::{ProgressReportFn, ProgressState};
use crate::{DictError, Result};

/// Outcome of a finished import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSummary {
    /// Phrase pairs read from the source
    pub source_pairs: u64,
    /// Source lines skipped for lacking a `::` delimiter
    pub skipped_lines: u64,
    /// Headwords written per direction
    pub entry_counts: Vec<(Direction, u64)>,
}

#[derive(Debug, Clone)]
pub struct DictBuilder {
    pub dict_dir: PathBuf,
    pub compression_method: CompressionMethod,
}

impl DictBuilder {
    pub fn new<P: Into<PathBuf>>(dict_dir: P, compression_method: CompressionMethod) -> Self {
        Self {
            dict_dir: dict_dir.into(),
            compression_method,
        }
    }

    pub fn from_config(config: &DictConfig) -> Result<Self> {
        Ok(Self::new(config.dict_dir_path()?, config.compression_method))
    }

    /// Groups the pairs under the headword of their key-side phrase.
    ///
    /// Phrases without a headword are left out.
    pub fn collect_entries(pairs: &[PhrasePair], direction: Direction) -> BTreeMap<String, DictEntry> {
        let mut dict = BTreeMap::<String, DictEntry>::new();
        let mut without_headword = 0u64;
        for pair in pairs {
            let (phrase, translation) = direction.orient(&pair.german, &pair.english);
            match extract_headword(phrase) {
                Some(headword) => dict.entry(headword).or_default().append(phrase, translation),
                None => without_headword += 1,
            }
        }
        debug!("{}: {} headwords, {} phrases without headword", direction, dict.len(), without_headword);
        dict
    }

    /// Writes `entries` into a sealed store for `direction`.
    pub fn write_entries(
        &self,
        direction: Direction,
        entries: &BTreeMap<String, DictEntry>,
        prog_rpt: Option<ProgressReportFn>,
    ) -> Result<SealedStore> {
        let path = direction.store_path(&self.dict_dir);
        let mut writer = StoreWriter::create(&path, self.compression_method)?;
        let state_id = format!("Writing {} dictionary", direction);
        let mut progress_state = ProgressState::new(&state_id, entries.len() as u64, 10, prog_rpt);
        for (i, (headword, entry)) in entries.iter().enumerate() {
            writer.put(headword, &entry.encode())?;
            if progress_state.report(i as u64) {
                info!("Writing {} cancelled by user", path.display());
                return Err(DictError::user_interrupted());
            }
        }
        writer.seal()
    }

    /// Builds both direction stores from already loaded source pairs.
    pub fn import(&self, source: &DictSourceLoader, prog_rpt: Option<ProgressReportFn>) -> Result<ImportSummary> {
        if !self.dict_dir.exists() {
            info!("Creating dictionary directory {}", self.dict_dir.display());
            fs::create_dir_all(&self.dict_dir)?;
        }

        let mut sealed_stores = Vec::with_capacity(Direction::ALL.len());
        for direction in Direction::ALL {
            info!("Building {} dictionary...", direction);
            let entries = Self::collect_entries(&source.pairs, direction);
            info!("Built dict with {} entries", entries.len());
            sealed_stores.push((direction, self.write_entries(direction, &entries, prog_rpt)?));
        }

        let mut entry_counts = Vec::with_capacity(sealed_stores.len());
        for (direction, sealed) in sealed_stores {
            entry_counts.push((direction, sealed.commit()?));
        }
        info!("Database building done!");

        Ok(ImportSummary {
            source_pairs: source.pairs.len() as u64,
            skipped_lines: source.skipped_lines,
            entry_counts,
        })
    }

    /// Loads `source_file` and rebuilds the stores in the configured directory.
    pub fn build_with_config<P: AsRef<Path>>(
        config: &DictConfig,
        source_file: P,
        prog_rpt: Option<ProgressReportFn>,
    ) -> Result<ImportSummary> {
        let builder = Self::from_config(config)?;
        info!("Reading dict file {}", source_file.as_ref().display());
        let source = DictSourceLoader::new(source_file, &config.source_encoding, prog_rpt)?;
        builder.import(&source, prog_rpt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::kv_store::{KeyValueStore, StoreReader};

    fn pair(german: &str, english: &str) -> PhrasePair {
        PhrasePair { german: german.into(), english: english.into(), line_no: 0 }
    }

    #[test]
    fn test_collect_entries_per_direction() {
        let pairs = vec![
            pair("Haus {n}", "house"),
            pair("das Haus", "the house"),
            pair("Haus", "home"),
            pair("(nur)", "only"),
        ];
        let de = DictBuilder::collect_entries(&pairs, Direction::DeEn);
        assert_eq!(de.keys().collect::<Vec<_>>(), ["haus"]);
        assert_eq!(de["haus"].encode(), "Haus=<>home#<>#Haus {n}=<>house#<>#das Haus=<>the house");

        let en = DictBuilder::collect_entries(&pairs, Direction::EnDe);
        assert_eq!(en.keys().collect::<Vec<_>>(), ["home", "house", "only"]);
        assert_eq!(en["house"].encode(), "house=<>Haus {n}#<>#the house=<>das Haus");
    }

    #[test]
    fn test_import_writes_both_stores() {
        let dir = tempfile::tempdir().unwrap();
        let dict_dir = dir.path().join("nested").join("dict");
        let source = DictSourceLoader {
            source_file: PathBuf::from("memory"),
            pairs: vec![pair("Katze", "cat"), pair("Hund", "dog")],
            skipped_lines: 2,
        };
        let builder = DictBuilder::new(&dict_dir, CompressionMethod::Deflate);
        let summary = builder.import(&source, None).unwrap();
        assert_eq!(summary.source_pairs, 2);
        assert_eq!(summary.skipped_lines, 2);
        assert_eq!(summary.entry_counts, vec![(Direction::DeEn, 2), (Direction::EnDe, 2)]);

        let en = StoreReader::open(Direction::EnDe.store_path(&dict_dir)).unwrap();
        assert_eq!(en.get("cat").unwrap().as_deref(), Some("cat=<>Katze"));
    }

    fn cancel_en_de(state: &mut ProgressState) -> bool {
        state.state_id == "Writing EN-DE dictionary"
    }

    #[test]
    fn test_cancelled_import_keeps_previous_stores() {
        let dir = tempfile::tempdir().unwrap();
        let dict_dir = dir.path().join("dict");
        let builder = DictBuilder::new(&dict_dir, CompressionMethod::Deflate);
        let old_source = DictSourceLoader {
            source_file: PathBuf::from("old"),
            pairs: vec![pair("Hund", "dog"), pair("Maus", "mouse")],
            skipped_lines: 0,
        };
        builder.import(&old_source, None).unwrap();

        // The German→English store is fully written and sealed before the cancel.
        let new_source = DictSourceLoader {
            source_file: PathBuf::from("new"),
            pairs: vec![pair("Katze", "cat"), pair("Kater", "cat")],
            skipped_lines: 0,
        };
        let err = builder.import(&new_source, Some(cancel_en_de)).unwrap_err();
        assert!(matches!(err, DictError::UserInterrupted { .. }));

        for direction in Direction::ALL {
            let store = StoreReader::open(direction.store_path(&dict_dir)).unwrap();
            assert_eq!(store.len(), 2);
        }
        let de = StoreReader::open(Direction::DeEn.store_path(&dict_dir)).unwrap();
        assert!(de.get("hund").unwrap().is_some());
        assert_eq!(de.get("katze").unwrap(), None);
        let leftovers: Vec<_> = fs::read_dir(&dict_dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .filter(|name| name.ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty(), "{:?}", leftovers);
    }

    #[test]
    fn test_reimport_replaces_both_stores() {
        let dir = tempfile::tempdir().unwrap();
        let builder = DictBuilder::new(dir.path(), CompressionMethod::Lz4);
        let first = DictSourceLoader {
            source_file: PathBuf::from("first"),
            pairs: vec![pair("Hund", "dog")],
            skipped_lines: 0,
        };
        builder.import(&first, None).unwrap();
        let second = DictSourceLoader {
            source_file: PathBuf::from("second"),
            pairs: vec![pair("Maus", "mouse")],
            skipped_lines: 0,
        };
        builder.import(&second, None).unwrap();

        let de = StoreReader::open(Direction::DeEn.store_path(dir.path())).unwrap();
        let en = StoreReader::open(Direction::EnDe.store_path(dir.path())).unwrap();
        assert_eq!(de.keys().collect::<Vec<_>>(), ["maus"]);
        assert_eq!(en.keys().collect::<Vec<_>>(), ["mouse"]);
    }
}
