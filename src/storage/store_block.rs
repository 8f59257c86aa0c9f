//! Value blocks inside a store file.
//!
//! Every stored value is written as one self-describing block:
//!
//! ```text
//! u32 original length | u32 block length | u8 compression | u8 0 | u16 0 | u32 adler32 | data
//! ```
//!
//! All integers are big endian. The block length counts the 8 header bytes
//! after it plus the compressed data. The checksum covers the uncompressed
//! value, so a corrupt block is reported as a `CrcMismatch` instead of being
//! returned as text.

use std::io::{Cursor, Read, Write};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};

use crate::utils::compression::{get_compressor, CompressionMethod};
use crate::{DictError, Result};

const BLOCK_HEADER_LENGTH: u32 = 8;

/// A decoded value block.
#[derive(Debug, Clone)]
pub struct StoreBlock {
    /// Decompressed data
    pub data: Vec<u8>,
}

impl StoreBlock {
    /// Reads a block from `reader` and decodes it.
    pub fn from_reader<R: Read>(reader: &mut R) -> Result<Self> {
        let original_data_length = reader.read_u32::<BigEndian>()?;
        let data_block_length = reader.read_u32::<BigEndian>()?;
        let mut raw_data = vec![0u8; data_block_length as usize];
        reader.read_exact(&mut raw_data)?;
        Self::decode_block(&raw_data, original_data_length)
    }

    /// Returns the number of bytes the block starting at `bytes` occupies,
    /// without decoding it.
    pub fn encoded_length(bytes: &[u8]) -> Result<u64> {
        let mut cursor = Cursor::new(bytes);
        let _original_data_length = cursor.read_u32::<BigEndian>()?;
        let data_block_length = cursor.read_u32::<BigEndian>()?;
        Ok(8 + data_block_length as u64)
    }

    /// Decodes the part of a block that follows the two length fields.
    pub fn decode_block(block_data: &[u8], original_data_length: u32) -> Result<Self> {
        if block_data.len() < BLOCK_HEADER_LENGTH as usize {
            return Err(DictError::format_error(format!("Value block too short: {} bytes", block_data.len())));
        }
        let mut cursor = Cursor::new(block_data);
        let compression = cursor.read_u8()?;
        let _reserved1 = cursor.read_u8()?;
        let _reserved2 = cursor.read_u16::<BigEndian>()?;
        let data_crc = cursor.read_u32::<BigEndian>()?;
        let raw_data = &block_data[BLOCK_HEADER_LENGTH as usize..];

        let compression_method = CompressionMethod::try_from(compression)?;
        let data = get_compressor(compression_method).decompress(raw_data, original_data_length as usize)?;
        let adler_crc = adler::adler32_slice(&data);
        if data_crc != adler_crc {
            return Err(DictError::crc_mismatch(data_crc, adler_crc));
        }
        Ok(Self { data })
    }

    /// Compresses `data` and writes it as one block. Returns the number of
    /// bytes written.
    pub fn to_writer<W: Write>(writer: &mut W, data: &[u8], compression_method: CompressionMethod) -> Result<u64> {
        let compressed_data = get_compressor(compression_method).compress(data)?;
        let data_crc = adler::adler32_slice(data);
        writer.write_u32::<BigEndian>(data.len() as u32)?;
        writer.write_u32::<BigEndian>(compressed_data.len() as u32 + BLOCK_HEADER_LENGTH)?;
        writer.write_u8(compression_method as u8)?;
        writer.write_u8(0)?;
        writer.write_u16::<BigEndian>(0)?; //reserved
        writer.write_u32::<BigEndian>(data_crc)?;
        writer.write_all(&compressed_data)?;
        Ok(8 + BLOCK_HEADER_LENGTH as u64 + compressed_data.len() as u64)
    }
}
