//! Oxilzo: LZO1X compression/decompression in Rust.
//!
//! The crate provides:
//! - A pure-Rust LZO1X codec (`lzo1x`), byte-compatible with miniLZO
//! - File-oriented helpers (`io`)
//! - An optional CLI (`cli` feature)
//!
//! # Quick Start
//!
//! ```
//! use oxilzo::lzo1x;
//!
//! let data = b"hello hello hello hello hello";
//! let compressed = lzo1x::compress(data);
//! let decoded = lzo1x::decompress(&compressed, data.len()).unwrap();
//! assert_eq!(decoded, data);
//! ```

pub mod io;
pub mod lzo1x;

#[cfg(feature = "cli")]
pub mod cli;
