// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/jfifpix

//! Quantization and Huffman table segment parsing.
//!
//! Handles DQT (Define Quantization Table) and DHT (Define Huffman Table)
//! marker segments. Both segment kinds may pack several tables back to
//! back; each parsed table replaces any previous occupant of its
//! destination slot.

use super::error::{DecodeError, Result};
use super::zigzag::ZIGZAG_TO_NATURAL;

/// A dequantization table in natural (row-major) order.
///
/// DQT segments carry either 8-bit or 16-bit entries; the two shapes are
/// kept distinct, with [`QuantTable::value`] as the uniform accessor so
/// dequantization reads u16 either way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuantTable {
    Precision8([u8; 64]),
    Precision16([u16; 64]),
}

impl QuantTable {
    /// Quantizer for natural-order coefficient position `i`.
    pub fn value(&self, i: usize) -> u16 {
        match self {
            Self::Precision8(v) => v[i] as u16,
            Self::Precision16(v) => v[i],
        }
    }
}

/// Parse a DQT marker segment body (after the 2-byte length).
///
/// Returns `(destination, table)` pairs. Entries arrive in zigzag order on
/// the wire and are inverted into natural order here, so no further
/// permutation happens downstream.
pub fn parse_dqt(data: &[u8]) -> Result<Vec<(u8, QuantTable)>> {
    let mut tables = Vec::new();
    let mut pos = 0;

    while pos < data.len() {
        let pq_tq = data[pos];
        pos += 1;
        let precision = pq_tq >> 4;
        let dest = pq_tq & 0x0F;

        if dest > 3 {
            return Err(DecodeError::UnknownQuantizationTableReferenced(dest));
        }

        let table = match precision {
            0 => {
                if pos + 64 > data.len() {
                    return Err(DecodeError::UnexpectedEof);
                }
                let mut values = [0u8; 64];
                for zi in 0..64 {
                    values[ZIGZAG_TO_NATURAL[zi]] = data[pos + zi];
                }
                pos += 64;
                QuantTable::Precision8(values)
            }
            1 => {
                if pos + 128 > data.len() {
                    return Err(DecodeError::UnexpectedEof);
                }
                let mut values = [0u16; 64];
                for zi in 0..64 {
                    values[ZIGZAG_TO_NATURAL[zi]] =
                        u16::from_be_bytes([data[pos + zi * 2], data[pos + zi * 2 + 1]]);
                }
                pos += 128;
                QuantTable::Precision16(values)
            }
            p => return Err(DecodeError::UnknownQuantizationTablePrecision(p)),
        };

        tables.push((dest, table));
    }

    Ok(tables)
}

/// Parsed Huffman table definition, as carried by a DHT segment.
#[derive(Debug, Clone)]
pub struct HuffmanSpec {
    /// Table class: 0 = DC, 1 = AC.
    pub class: u8,
    /// Destination slot (0–1 in baseline).
    pub id: u8,
    /// Number of codes of each length 1–16.
    pub counts: [u8; 16],
    /// Symbols in order of increasing code length (T.81 Annex C order).
    pub symbols: Vec<u8>,
}

/// Parse a DHT marker segment body (after the 2-byte length).
///
/// Returns the sub-tables in segment order.
pub fn parse_dht(data: &[u8]) -> Result<Vec<HuffmanSpec>> {
    let mut specs = Vec::new();
    let mut pos = 0;

    while pos < data.len() {
        let tc_th = data[pos];
        pos += 1;
        let class = tc_th >> 4;
        let id = tc_th & 0x0F;

        if class > 1 || id > 1 {
            return Err(DecodeError::InvalidHuffmanTable);
        }

        if pos + 16 > data.len() {
            return Err(DecodeError::IncompleteHuffmanTable);
        }
        let mut counts = [0u8; 16];
        counts.copy_from_slice(&data[pos..pos + 16]);
        pos += 16;

        let total: usize = counts.iter().map(|&c| c as usize).sum();
        if pos + total > data.len() {
            return Err(DecodeError::IncompleteHuffmanTable);
        }
        let symbols = data[pos..pos + total].to_vec();
        pos += total;

        specs.push(HuffmanSpec {
            class,
            id,
            counts,
            symbols,
        });
    }

    Ok(specs)
}
