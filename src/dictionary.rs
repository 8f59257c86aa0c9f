//! The dictionary as seen by callers: import, query and size.
//!
//! [`Dictionary`] ties the configuration to the builder and the query engine.
//! Both direction stores live in the configured directory; queries open them
//! one after the other, German→English first.
//!
//! # Examples
//!
//! ```no_run
//! use dictcc::{DictConfig, Dictionary};
//!
//! # fn main() -> dictcc::Result<()> {
//! let dictionary = Dictionary::new(DictConfig::default());
//! dictionary.import("dict.cc.txt", None)?;
//!
//! let mut stdout = std::io::stdout();
//! dictionary.query("haus", &mut stdout)?;
//! dictionary.query(":r:^hau", &mut stdout)?;
//! # Ok(())
//! # }
//! ```

use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use log::debug;

use crate::builder::dict_builder::{DictBuilder, ImportSummary};
use crate::config::DictConfig;
use crate::readers::query::Query;
use crate::readers::query_engine::QueryEngine;
use crate::storage::direction::Direction;
use crate::storage::kv_store::{KeyValueStore, StoreReader};
use crate::utils::progress_report::ProgressReportFn;
use crate::{DictError, Result};

/// Size information about one direction store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreInfo {
    pub direction: Direction,
    pub entries: u64,
    pub created: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default)]
pub struct Dictionary {
    pub config: DictConfig,
}

impl Dictionary {
    pub fn new(config: DictConfig) -> Self {
        Self { config }
    }

    /// Rebuilds both stores from a dict.cc source file.
    pub fn import<P: AsRef<Path>>(&self, source_file: P, prog_rpt: Option<ProgressReportFn>) -> Result<ImportSummary> {
        DictBuilder::build_with_config(&self.config, source_file, prog_rpt)
    }

    /// Parses `raw` (honouring the `:r:` / `:f:` prefixes) and runs it.
    ///
    /// Returns the number of matches over both stores.
    pub fn query<W: Write>(&self, raw: &str, out: &mut W) -> Result<u64> {
        self.query_with(&Query::parse(raw), out)
    }

    pub fn query_with<W: Write>(&self, query: &Query, out: &mut W) -> Result<u64> {
        let dict_dir = self.existing_dict_dir()?;
        debug!("Query {} in {}", query, dict_dir.display());
        let stores = Direction::ALL.into_iter().map(|direction| {
            StoreReader::open(direction.store_path(&dict_dir)).map(|store| (direction, store))
        });
        QueryEngine::new(self.config.output_format).query_stores(query, stores, out)
    }

    /// Key count and creation time of each store.
    pub fn entry_counts(&self) -> Result<Vec<StoreInfo>> {
        let dict_dir = self.existing_dict_dir()?;
        Direction::ALL
            .into_iter()
            .map(|direction| {
                let store = StoreReader::open(direction.store_path(&dict_dir))?;
                Ok(StoreInfo { direction, entries: store.len(), created: store.created })
            })
            .collect()
    }

    /// Total key count over both stores.
    pub fn entry_count(&self) -> Result<u64> {
        Ok(self.entry_counts()?.iter().map(|info| info.entries).sum())
    }

    fn existing_dict_dir(&self) -> Result<PathBuf> {
        let dict_dir = self.config.dict_dir_path()?;
        if !dict_dir.is_dir() {
            return Err(DictError::missing_store(dict_dir));
        }
        Ok(dict_dir)
    }
}
