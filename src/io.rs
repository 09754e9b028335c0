// File-level helpers for LZO1X compression/decompression.
//
// The raw LZO1X stream does not record its decompressed size, so files
// carry a small frame: a 4-byte magic, the uncompressed length as a
// little-endian u64, then the compressed payload.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use log::debug;
use thiserror::Error;

use crate::lzo1x::{self, DecompressError};

/// Magic bytes at the start of every framed file.
pub const MAGIC: [u8; 4] = *b"OXLZ";

/// Frame header length: magic plus the u64 uncompressed length.
pub const HEADER_LEN: usize = MAGIC.len() + 8;

// ---------------------------------------------------------------------------
// Stats
// ---------------------------------------------------------------------------

/// Statistics returned by `compress_file()`.
#[derive(Debug, Clone)]
pub struct CompressStats {
    /// Input file size in bytes.
    pub input_size: u64,
    /// Output file size in bytes, frame header included.
    pub output_size: u64,
}

impl CompressStats {
    /// Compressed payload size as a fraction of the input size.
    pub fn ratio(&self) -> f64 {
        if self.input_size == 0 {
            return 1.0;
        }
        (self.output_size.saturating_sub(HEADER_LEN as u64)) as f64 / self.input_size as f64
    }
}

/// Statistics returned by `decompress_file()`.
#[derive(Debug, Clone)]
pub struct DecompressStats {
    /// Input file size in bytes.
    pub input_size: u64,
    /// Reconstructed output size in bytes.
    pub output_size: u64,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Error type for file operations.
#[derive(Debug, Error)]
pub enum IoError {
    /// I/O error (file open, read, write).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// The file does not start with the expected frame header.
    #[error("bad frame header: {0}")]
    BadHeader(&'static str),
    /// The declared uncompressed length does not fit in memory.
    #[error("declared length {0} exceeds addressable memory")]
    LengthOverflow(u64),
    /// Decompression error.
    #[error("decompress error: {0}")]
    Decompress(#[from] DecompressError),
}

// ---------------------------------------------------------------------------
// compress_file
// ---------------------------------------------------------------------------

/// Compress `input_path` into a framed file at `output_path`.
///
/// The input is read fully into memory; the codec is single-pass over
/// whole buffers.
pub fn compress_file(input_path: &Path, output_path: &Path) -> Result<CompressStats, IoError> {
    let input = std::fs::read(input_path)?;
    let compressed = lzo1x::compress(&input);

    let mut writer = BufWriter::new(File::create(output_path)?);
    writer.write_all(&MAGIC)?;
    writer.write_all(&(input.len() as u64).to_le_bytes())?;
    writer.write_all(&compressed)?;
    writer.flush()?;

    let stats = CompressStats {
        input_size: input.len() as u64,
        output_size: (HEADER_LEN + compressed.len()) as u64,
    };
    debug!(
        "compressed {} -> {} bytes (ratio {:.3})",
        stats.input_size,
        stats.output_size,
        stats.ratio()
    );
    Ok(stats)
}

// ---------------------------------------------------------------------------
// decompress_file
// ---------------------------------------------------------------------------

/// Decompress a framed file at `input_path` into `output_path`.
pub fn decompress_file(input_path: &Path, output_path: &Path) -> Result<DecompressStats, IoError> {
    let input = std::fs::read(input_path)?;
    let (expected_len, payload) = parse_header(&input)?;

    let output = lzo1x::decompress(payload, expected_len)?;

    let mut writer = BufWriter::new(File::create(output_path)?);
    writer.write_all(&output)?;
    writer.flush()?;

    debug!("decompressed {} -> {} bytes", input.len(), output.len());
    Ok(DecompressStats {
        input_size: input.len() as u64,
        output_size: output.len() as u64,
    })
}

/// Split a framed buffer into the declared length and the payload.
pub fn parse_header(data: &[u8]) -> Result<(usize, &[u8]), IoError> {
    if data.len() < HEADER_LEN {
        return Err(IoError::BadHeader("file shorter than frame header"));
    }
    if data[..MAGIC.len()] != MAGIC {
        return Err(IoError::BadHeader("missing OXLZ magic"));
    }
    let mut len_bytes = [0u8; 8];
    len_bytes.copy_from_slice(&data[MAGIC.len()..HEADER_LEN]);
    let declared = u64::from_le_bytes(len_bytes);
    let expected_len = usize::try_from(declared).map_err(|_| IoError::LengthOverflow(declared))?;
    Ok((expected_len, &data[HEADER_LEN..]))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let input_path = dir.path().join("input.bin");
        let packed_path = dir.path().join("packed.lzo");
        let output_path = dir.path().join("output.bin");

        let data: Vec<u8> = (0..10_000u32).map(|i| (i % 97) as u8).collect();
        std::fs::write(&input_path, &data).unwrap();

        let cstats = compress_file(&input_path, &packed_path).unwrap();
        assert_eq!(cstats.input_size, data.len() as u64);
        assert!(cstats.output_size < cstats.input_size);

        let dstats = decompress_file(&packed_path, &output_path).unwrap();
        assert_eq!(dstats.output_size, data.len() as u64);
        assert_eq!(std::fs::read(&output_path).unwrap(), data);
    }

    #[test]
    fn header_rejects_wrong_magic() {
        let data = b"NOPE\x00\x00\x00\x00\x00\x00\x00\x00payload";
        assert!(matches!(
            parse_header(data),
            Err(IoError::BadHeader("missing OXLZ magic"))
        ));
    }

    #[test]
    fn header_rejects_short_file() {
        assert!(matches!(
            parse_header(b"OXLZ"),
            Err(IoError::BadHeader(_))
        ));
    }

    #[test]
    fn header_roundtrip() {
        let mut framed = Vec::new();
        framed.extend_from_slice(&MAGIC);
        framed.extend_from_slice(&42u64.to_le_bytes());
        framed.extend_from_slice(b"xyz");
        let (len, payload) = parse_header(&framed).unwrap();
        assert_eq!(len, 42);
        assert_eq!(payload, b"xyz");
    }
}
