// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/jfifpix

//! # jfifpix
//!
//! Pure-Rust baseline JPEG (JFIF) decoder: a T.81 Baseline DCT,
//! Huffman-coded, 8-bit byte stream in, a grayscale or 24-bit RGB pixel
//! buffer out.
//!
//! Supports:
//! - Baseline sequential DCT (SOF0), 8-bit precision
//! - Grayscale (1 component) and YCbCr (3 components), 1×1 sampling
//! - 8-bit and 16-bit quantization tables
//! - Header probing without pixel decoding ([`read_info`])
//!
//! Does NOT support (rejected at parse time with a specific error):
//! - Progressive, extended-sequential, lossless, differential,
//!   hierarchical, and arithmetic-coded variants
//! - 12-bit precision
//! - Chroma subsampling and restart intervals
//! - Multiple frames or scans, embedded thumbnails
//!
//! With the `parallel` feature (default), per-block dequantization and
//! IDCT run on the rayon thread pool after entropy decoding; output is
//! identical either way.
//!
//! # Quick start
//!
//! ```rust,ignore
//! let data = std::fs::read("photo.jpg").unwrap();
//! let image = jfifpix::decode(&data).unwrap();
//! match image.pixels {
//!     jfifpix::PixelData::Gray(buf) => println!("gray, {} px", buf.len()),
//!     jfifpix::PixelData::Rgb(buf) => println!("rgb, {} px", buf.len() / 3),
//! }
//! ```

pub mod bitio;
pub mod block;
pub mod color;
pub mod decoder;
pub mod error;
pub mod frame;
pub mod huffman;
pub mod idct;
pub mod jfif;
pub mod marker;
pub mod scan;
pub mod tables;
pub mod zigzag;

pub use decoder::{read_info, Decoder, Image, Info, PixelData};
pub use error::{DecodeError, Result};
pub use frame::{Component, FrameHeader};
pub use jfif::JfifHeader;
pub use tables::QuantTable;

/// Decode a baseline JPEG byte stream to pixels.
pub fn decode(data: &[u8]) -> Result<Image> {
    Decoder::new(data).decode()
}

/// Format-detection shim: SOI at the start and the ASCII bytes `JFIF` at
/// absolute offset 6 (inside the APP0 segment that must follow SOI).
pub fn is_jpeg(data: &[u8]) -> bool {
    data.len() >= 10 && data[0] == 0xFF && data[1] == 0xD8 && &data[6..10] == b"JFIF"
}
