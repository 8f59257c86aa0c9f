//! On-disk key-value store holding one translation direction.
//!
//! A store maps lowercase headwords to serialized entries. It is written once
//! per import by a [`StoreWriter`] and read by a [`StoreReader`]; there are no
//! in-place updates. File layout (big endian):
//!
//! ```text
//! "DCCS" | u8 version | u8 compression | u16 0 | i64 created (unix secs) | u64 record count
//! record* := u16 key length | key bytes | u8 0 | value block
//! ```
//!
//! Value blocks are described in [`crate::storage::store_block`].
//!
//! A writer streams into `<name>.tmp`. [`StoreWriter::seal`] completes and
//! closes that file, and [`SealedStore::commit`] renames it over `<name>`, so
//! readers see either the old or the new store, never a missing one. An import that fails before the commit
//! leaves the previous store untouched. Writers assume exclusive access to the
//! dictionary directory.
//!
//! # Examples
//!
//! ```no_run
//! use dictcc::storage::kv_store::{KeyValueStore, StoreReader, StoreWriter};
//! use dictcc::utils::CompressionMethod;
//!
//! # fn main() -> dictcc::Result<()> {
//! let mut writer = StoreWriter::create("/tmp/dict_de", CompressionMethod::Deflate)?;
//! writer.put("haus", "Haus=<>house")?;
//! writer.finish()?;
//!
//! let reader = StoreReader::open("/tmp/dict_de")?;
//! assert_eq!(reader.get("haus")?.as_deref(), Some("Haus=<>house"));
//! # Ok(())
//! # }
//! ```

use std::fs::{self, File};
use std::io::{BufWriter, Cursor, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use log::{debug, info, warn};

use crate::storage::store_block::StoreBlock;
use crate::utils::compression::CompressionMethod;
use crate::utils::io_utils::bytes_from_file;
use crate::{DictError, Result};

const STORE_MAGIC: &[u8; 4] = b"DCCS";
const STORE_VERSION: u8 = 1;
const RECORD_COUNT_OFFSET: u64 = 16;
const MAX_KEY_LENGTH: usize = u16::MAX as usize;
// Empty key: u16 length and terminating zero, then the 16 byte block header.
const MIN_RECORD_LENGTH: u64 = 2 + 1 + 16;

/// Read access shared by every store implementation.
pub trait KeyValueStore {
    /// Looks up the value stored under `key`.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// All keys, in store order.
    fn keys(&self) -> Box<dyn Iterator<Item = &str> + '_>;

    /// Number of records.
    fn len(&self) -> u64;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn write_key<W: Write>(writer: &mut W, key: &[u8]) -> Result<()> {
    writer.write_u16::<BigEndian>(key.len() as u16)?; // Key length doesn't include the terminating zero
    writer.write_all(key)?;
    writer.write_u8(0)?;
    Ok(())
}

fn read_key<R: Read>(reader: &mut R) -> Result<String> {
    let key_len = reader.read_u16::<BigEndian>()?;
    let mut key = vec![0u8; key_len as usize + 1];
    reader.read_exact(&mut key)?;
    if key.pop() != Some(0) {
        return Err(DictError::format_error("Key is not zero terminated"));
    }
    Ok(String::from_utf8(key)?)
}

fn tmp_path_for(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Streams records into a new store file.
pub struct StoreWriter {
    path: PathBuf,
    tmp_path: PathBuf,
    writer: Option<BufWriter<File>>,
    compression_method: CompressionMethod,
    record_count: u64,
}

impl StoreWriter {
    /// Starts a new store that will replace `path` once finished.
    pub fn create<P: AsRef<Path>>(path: P, compression_method: CompressionMethod) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let tmp_path = tmp_path_for(&path);
        let mut writer = BufWriter::new(File::create(&tmp_path)?);
        writer.write_all(STORE_MAGIC)?;
        writer.write_u8(STORE_VERSION)?;
        writer.write_u8(compression_method as u8)?;
        writer.write_u16::<BigEndian>(0)?; //reserved
        writer.write_i64::<BigEndian>(Utc::now().timestamp())?;
        writer.write_u64::<BigEndian>(0)?; // Rewritten in seal()
        debug!("Writing store {} via {}", path.display(), tmp_path.display());
        Ok(Self {
            path,
            tmp_path,
            writer: Some(writer),
            compression_method,
            record_count: 0,
        })
    }

    /// Appends one record. Keys must be unique within a store.
    pub fn put(&mut self, key: &str, value: &str) -> Result<()> {
        if key.len() > MAX_KEY_LENGTH {
            return Err(DictError::invalid_parameter(format!("Key too long: {} bytes", key.len())));
        }
        let writer = self.writer.as_mut()
            .ok_or_else(|| DictError::invalid_parameter("Store writer already finished"))?;
        write_key(writer, key.as_bytes())?;
        StoreBlock::to_writer(writer, value.as_bytes(), self.compression_method)?;
        self.record_count += 1;
        Ok(())
    }

    pub fn record_count(&self) -> u64 {
        self.record_count
    }

    /// Completes the file and moves it over any previous store at the same path.
    pub fn finish(self) -> Result<u64> {
        self.seal()?.commit()
    }

    /// Completes and closes the temporary file without replacing the store yet.
    pub fn seal(mut self) -> Result<SealedStore> {
        let mut writer = self.writer.take()
            .ok_or_else(|| DictError::invalid_parameter("Store writer already finished"))?;
        let sealed = SealedStore {
            path: self.path.clone(),
            tmp_path: self.tmp_path.clone(),
            record_count: self.record_count,
            committed: false,
        };
        let end_pos = writer.stream_position()?;
        writer.seek(SeekFrom::Start(RECORD_COUNT_OFFSET))?;
        writer.write_u64::<BigEndian>(self.record_count)?;
        writer.seek(SeekFrom::Start(end_pos))?;
        let file = writer.into_inner().map_err(|e| e.into_error())?;
        file.sync_all()?;
        Ok(sealed)
    }
}

impl Drop for StoreWriter {
    fn drop(&mut self) {
        if let Some(writer) = self.writer.take() {
            // Not sealed: discard the partial file and keep the old store.
            drop(writer);
            remove_tmp_file(&self.tmp_path);
        }
    }
}

fn remove_tmp_file(tmp_path: &Path) {
    if let Err(e) = fs::remove_file(tmp_path) {
        warn!("Failed to remove {}: {}", tmp_path.display(), e);
    }
}

/// A fully written store file waiting to replace the live store.
#[derive(Debug)]
pub struct SealedStore {
    path: PathBuf,
    tmp_path: PathBuf,
    record_count: u64,
    committed: bool,
}

impl SealedStore {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn record_count(&self) -> u64 {
        self.record_count
    }

    /// Moves the new file into place, replacing the previous store if any.
    pub fn commit(mut self) -> Result<u64> {
        if self.path.exists() {
            info!("Replacing old database {}", self.path.display());
        }
        fs::rename(&self.tmp_path, &self.path)?;
        self.committed = true;
        info!("Wrote {} records to {}", self.record_count, self.path.display());
        Ok(self.record_count)
    }
}

impl Drop for SealedStore {
    fn drop(&mut self) {
        if !self.committed {
            remove_tmp_file(&self.tmp_path);
        }
    }
}

/// Read-only view of a finished store file.
#[derive(Debug)]
pub struct StoreReader {
    pub path: PathBuf,
    pub created: Option<DateTime<Utc>>,
    pub compression_method: CompressionMethod,
    data: Vec<u8>,
    index: IndexMap<String, u64>,
}

impl StoreReader {
    /// Opens the store at `path` and indexes its keys.
    ///
    /// # Errors
    ///
    /// `MissingStore` when the file does not exist, `Format` when it is not a
    /// store file or is truncated.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if !path.is_file() {
            return Err(DictError::missing_store(path));
        }
        let data = bytes_from_file(&path)?;
        let (created, compression_method, index) = Self::build_index(&data)
            .map_err(|e| match e {
                DictError::Io { source, .. } if source.kind() == std::io::ErrorKind::UnexpectedEof => {
                    DictError::format_error(format!("Truncated store file {}", path.display()))
                }
                e => e,
            })?;
        debug!("Opened store {} with {} keys", path.display(), index.len());
        Ok(Self { path, created, compression_method, data, index })
    }

    fn build_index(data: &[u8]) -> Result<(Option<DateTime<Utc>>, CompressionMethod, IndexMap<String, u64>)> {
        let mut cursor = Cursor::new(data);
        let mut magic = [0u8; 4];
        cursor.read_exact(&mut magic)?;
        if &magic != STORE_MAGIC {
            return Err(DictError::format_error("Not a dictionary store file"));
        }
        let version = cursor.read_u8()?;
        if version != STORE_VERSION {
            return Err(DictError::format_error(format!("Unsupported store version {}", version)));
        }
        let compression_method = CompressionMethod::try_from(cursor.read_u8()?)?;
        let _reserved = cursor.read_u16::<BigEndian>()?;
        let created = DateTime::from_timestamp(cursor.read_i64::<BigEndian>()?, 0);
        let record_count = cursor.read_u64::<BigEndian>()?;
        let remaining = data.len() as u64 - cursor.position();
        if record_count > remaining / MIN_RECORD_LENGTH {
            return Err(DictError::format_error(format!(
                "Record count {} does not fit in {} bytes",
                record_count, remaining
            )));
        }

        let mut index = IndexMap::with_capacity(record_count as usize);
        for _ in 0..record_count {
            let key = read_key(&mut cursor)?;
            let block_offset = cursor.position();
            let block_len = StoreBlock::encoded_length(&data[block_offset as usize..])?;
            if block_offset + block_len > data.len() as u64 {
                return Err(DictError::format_error(format!("Value of '{}' runs past end of file", key)));
            }
            cursor.set_position(block_offset + block_len);
            index.insert(key, block_offset);
        }
        if cursor.position() != data.len() as u64 {
            return Err(DictError::format_error("Trailing bytes after last record"));
        }
        Ok((created, compression_method, index))
    }

    fn value_at(&self, block_offset: u64) -> Result<String> {
        let mut cursor = Cursor::new(&self.data[block_offset as usize..]);
        let block = StoreBlock::from_reader(&mut cursor)?;
        Ok(String::from_utf8(block.data)?)
    }

    /// Iterates over all records in store order, decoding each value.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Result<String>)> + '_ {
        self.index.iter().map(|(key, offset)| (key.as_str(), self.value_at(*offset)))
    }
}

impl KeyValueStore for StoreReader {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.index.get(key).map(|offset| self.value_at(*offset)).transpose()
    }

    fn keys(&self) -> Box<dyn Iterator<Item = &str> + '_> {
        Box::new(self.index.keys().map(String::as_str))
    }

    fn len(&self) -> u64 {
        self.index.len() as u64
    }
}

/// Store kept entirely in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: IndexMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert<K: Into<String>, V: Into<String>>(&mut self, key: K, value: V) {
        self.records.insert(key.into(), value.into());
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.records.get(key).cloned())
    }

    fn keys(&self) -> Box<dyn Iterator<Item = &str> + '_> {
        Box::new(self.records.keys().map(String::as_str))
    }

    fn len(&self) -> u64 {
        self.records.len() as u64
    }
}
