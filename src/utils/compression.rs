//! Compression and decompression support for store values.
//!
//! Every value written into a store file is passed through the store's
//! [`CompressionMethod`]. The method id is recorded in the store header so a
//! reader always decodes with the method the writer used. Supported methods:
//! - No compression
//! - Deflate (zlib) compression
//! - LZ4 compression

use std::io::{Read, Write};

use flate2::{read::ZlibDecoder, write::ZlibEncoder, Compression};
use serde::{Deserialize, Serialize};

use crate::{DictError, Result};

/// Compression methods supported by store files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum CompressionMethod {
    /// No compression
    None = 0,
    /// Deflate/zlib compression (default, good balance)
    #[default]
    Deflate = 2,
    /// LZ4 compression (very fast, moderate compression)
    Lz4 = 5,
}

impl TryFrom<u8> for CompressionMethod {
    type Error = DictError;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(CompressionMethod::None),
            2 => Ok(CompressionMethod::Deflate),
            5 => Ok(CompressionMethod::Lz4),
            _ => Err(DictError::invalid_parameter(format!("Invalid compression method:{}", value))),
        }
    }
}

/// Common interface for compression and decompression operations.
pub trait Compressor {
    /// Compresses the input data.
    fn compress(&self, data: &[u8]) -> Result<Vec<u8>>;

    /// Decompresses the input data.
    ///
    /// # Errors
    ///
    /// Returns an error if decompression fails or the output size doesn't
    /// match `original_size`.
    fn decompress(&self, data: &[u8], original_size: usize) -> Result<Vec<u8>>;
}

/// No-op compressor that passes data through unchanged.
pub struct NoCompression;

impl Compressor for NoCompression {
    fn compress(&self, data: &[u8]) -> Result<Vec<u8>> {
        Ok(data.to_vec())
    }

    fn decompress(&self, data: &[u8], original_size: usize) -> Result<Vec<u8>> {
        if data.len() != original_size {
            return Err(DictError::compression_error(format!("expected size {} but got {}", original_size, data.len())));
        }
        Ok(data.to_vec())
    }
}

/// Deflate (zlib) compression implementation.
pub struct DeflateCompressor;

impl Compressor for DeflateCompressor {
    fn compress(&self, data: &[u8]) -> Result<Vec<u8>> {
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(data)
            .map_err(|e| DictError::compression_error(format!("Deflate error: {}", e)))?;
        Ok(encoder.finish()?)
    }

    fn decompress(&self, data: &[u8], original_size: usize) -> Result<Vec<u8>> {
        let mut decoder = ZlibDecoder::new(data);
        let mut decompressed = Vec::with_capacity(original_size);
        decoder.read_to_end(&mut decompressed)
            .map_err(|e| DictError::compression_error(format!("Inflate error: {}", e)))?;
        if decompressed.len() != original_size {
            return Err(DictError::compression_error(format!("expected size {} but got {}", original_size, decompressed.len())));
        }
        Ok(decompressed)
    }
}

/// LZ4 compression implementation.
pub struct Lz4Compressor;

impl Compressor for Lz4Compressor {
    fn compress(&self, data: &[u8]) -> Result<Vec<u8>> {
        let mut compressed = Vec::new();
        let mut encoder = lz4::EncoderBuilder::new().build(&mut compressed)?;
        encoder.write_all(data)
            .map_err(|e| DictError::compression_error(format!("Lz4 Err:{}", e)))?;
        let (_, result) = encoder.finish();
        result?;
        Ok(compressed)
    }

    fn decompress(&self, data: &[u8], original_size: usize) -> Result<Vec<u8>> {
        let mut decompressed = vec![0; original_size];
        let mut decoder = lz4::Decoder::new(data)?;
        decoder.read_exact(&mut decompressed)
            .map_err(|e| DictError::compression_error(format!("Lz4 Err:{}", e)))?;
        Ok(decompressed)
    }
}

pub fn get_compressor(method: CompressionMethod) -> Box<dyn Compressor> {
    match method {
        CompressionMethod::None => Box::new(NoCompression),
        CompressionMethod::Deflate => Box::new(DeflateCompressor),
        CompressionMethod::Lz4 => Box::new(Lz4Compressor),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_method_restores_input() {
        let text = "Haus=<>house:<>:home#<>#das Haus=<>the house".repeat(20);
        for method in [CompressionMethod::None, CompressionMethod::Deflate, CompressionMethod::Lz4] {
            let compressor = get_compressor(method);
            let packed = compressor.compress(text.as_bytes()).unwrap();
            let unpacked = compressor.decompress(&packed, text.len()).unwrap();
            assert_eq!(unpacked, text.as_bytes(), "method {:?}", method);
        }
    }

    #[test]
    fn test_deflate_rejects_wrong_size() {
        let compressor = get_compressor(CompressionMethod::Deflate);
        let packed = compressor.compress(b"feline").unwrap();
        assert!(compressor.decompress(&packed, 3).is_err());
    }

    #[test]
    fn test_unknown_method_id() {
        assert_eq!(CompressionMethod::try_from(2).unwrap(), CompressionMethod::Deflate);
        assert!(CompressionMethod::try_from(1).is_err());
    }
}
