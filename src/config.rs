//! Dictionary configuration.
//!
//! [`DictConfig`] carries every setting the importer and the query engine
//! consult. It can be built in code, or loaded from a JSON file whose missing
//! fields fall back to the defaults:
//!
//! ```json
//! {
//!     "dict_dir": "~/.rdictcc",
//!     "output_format": "compact",
//!     "compression_method": "lz4",
//!     "source_encoding": "utf-8"
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::storage::direction::Direction;
use crate::storage::render::OutputFormat;
use crate::utils::compression::CompressionMethod;
use crate::utils::io_utils::expand_path;
use crate::Result;

pub const DEFAULT_DICT_DIR: &str = "~/.rdictcc";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DictConfig {
    /// Directory holding both direction stores; `~` and `$VARS` are expanded
    pub dict_dir: String,
    /// Layout used when rendering entries
    pub output_format: OutputFormat,
    /// Compression applied to stored values on import
    pub compression_method: CompressionMethod,
    /// Character encoding of the import source file
    pub source_encoding: String,
}

impl Default for DictConfig {
    fn default() -> Self {
        Self {
            dict_dir: DEFAULT_DICT_DIR.to_string(),
            output_format: OutputFormat::Normal,
            compression_method: CompressionMethod::Deflate,
            source_encoding: "utf-8".to_string(),
        }
    }
}

impl DictConfig {
    /// Loads a configuration from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json_content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json_content)?)
    }

    /// The dictionary directory with `~` and environment variables expanded.
    pub fn dict_dir_path(&self) -> Result<PathBuf> {
        expand_path(&self.dict_dir)
    }

    pub fn store_path(&self, direction: Direction) -> Result<PathBuf> {
        Ok(direction.store_path(&self.dict_dir_path()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: DictConfig = serde_json::from_str(r#"{"output_format": "compact"}"#).unwrap();
        assert_eq!(config.output_format, OutputFormat::Compact);
        assert_eq!(config.dict_dir, DEFAULT_DICT_DIR);
        assert_eq!(config.compression_method, CompressionMethod::Deflate);
    }

    #[test]
    fn test_from_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dictcc.json");
        fs::write(&path, r#"{"dict_dir": "/srv/dictcc", "compression_method": "lz4"}"#).unwrap();
        let config = DictConfig::from_json_file(&path).unwrap();
        assert_eq!(config.compression_method, CompressionMethod::Lz4);
        assert_eq!(
            config.store_path(Direction::EnDe).unwrap(),
            PathBuf::from("/srv/dictcc/dict_en")
        );
    }

    #[test]
    fn test_unknown_output_format_is_rejected() {
        assert!(serde_json::from_str::<DictConfig>(r#"{"output_format": "fancy"}"#).is_err());
    }
}
