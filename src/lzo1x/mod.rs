// LZO1X format implementation.
//
// This module provides compression and decompression of the LZO1X-1
// bitstream, byte-for-byte compatible with miniLZO.
//
// # Modules
//
// - `lengths` — Run-length continuation encoding (255-per-zero-byte escape)
// - `table`   — Per-call 4-byte-prefix match table for the compressor
// - `encoder` — Greedy match search and record emission
// - `decoder` — Tag dispatch state machine reconstructing the output

pub mod decoder;
pub mod encoder;
pub mod lengths;
pub mod table;

// Re-export key items for convenience.
pub use decoder::{DecompressError, decompress};
pub use encoder::{CompressError, compress, compress_into, compress_worst_size};

/// Inputs are processed in segments of at most this many bytes; match
/// offsets are only meaningful within the current segment.
pub const MAX_SEGMENT: usize = 0xC000;

/// The compressor never starts a match search closer than this to the end
/// of a segment, which keeps the 4-byte-at-a-time match extension inside
/// the buffer.
pub const LOOKAHEAD_SLACK: usize = 20;

/// End-of-stream marker appended after the final literal run.
pub const END_MARKER: [u8; 3] = [0x11, 0x00, 0x00];
