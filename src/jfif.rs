// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/jfifpix

//! JFIF application header (APP0) validation.
//!
//! A conforming stream opens with SOI and an APP0 segment carrying the
//! `"JFIF\0"` identifier. Embedded thumbnails are a non-goal and are
//! rejected, as is a second APP0 directly after the first (the JFXX
//! extension slot — this decoder is strict about it).

use super::error::{DecodeError, Result};

/// Parsed JFIF APP0 fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JfifHeader {
    pub version_major: u8,
    pub version_minor: u8,
    /// Pixel density unit: 0 = aspect ratio only, 1 = dpi, 2 = dots/cm.
    pub density_unit: u8,
    pub x_density: u16,
    pub y_density: u16,
}

/// Parse and validate an APP0 segment payload (after the 2-byte length).
pub fn parse_app0(data: &[u8]) -> Result<JfifHeader> {
    // "JFIF\0" + version (2) + unit (1) + densities (4) + thumbnail dims (2)
    if data.len() < 14 {
        return Err(DecodeError::InvalidMagicHeader);
    }
    if &data[0..5] != b"JFIF\0" {
        return Err(DecodeError::InvalidMagicHeader);
    }

    let header = JfifHeader {
        version_major: data[5],
        version_minor: data[6],
        density_unit: data[7],
        x_density: u16::from_be_bytes([data[8], data[9]]),
        y_density: u16::from_be_bytes([data[10], data[11]]),
    };

    let thumb_width = data[12];
    let thumb_height = data[13];
    if thumb_width != 0 || thumb_height != 0 {
        return Err(DecodeError::InvalidMagicHeader);
    }

    Ok(header)
}
