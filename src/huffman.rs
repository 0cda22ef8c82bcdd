// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/jfifpix

//! Canonical Huffman decoding for baseline JPEG entropy-coded data.

use super::bitio::BitReader;
use super::error::{DecodeError, Result};
use super::tables::HuffmanSpec;

/// Huffman decode table with two-level lookup.
///
/// Level 1: 8-bit fast lookup table (covers most codes).
/// Level 2: slow path for codes longer than 8 bits.
pub struct HuffmanTable {
    /// Fast lookup: indexed by the top 8 bits of the code stream.
    /// Each entry: (symbol, code_length). Length 0 means slow path.
    fast: [(u8, u8); 256],
    /// For codes > 8 bits: (code, length, symbol) sorted by (length, code).
    slow: Vec<(u16, u8, u8)>,
    /// Maximum code length in this table.
    max_len: u8,
}

impl HuffmanTable {
    /// Build a decode table from a parsed DHT definition.
    ///
    /// Codes are assigned per ITU-T T.81 Annex C: sequential within a
    /// length, shifted left by one when moving to the next length. A table
    /// that demands the all-ones code at any length is malformed.
    pub fn build(spec: &HuffmanSpec) -> Result<Self> {
        let mut fast = [(0u8, 0u8); 256];
        let mut slow = Vec::new();
        let mut max_len = 0u8;

        let mut code: u32 = 0;
        let mut si = 0; // index into spec.symbols

        for length in 1..=16u8 {
            let count = spec.counts[(length - 1) as usize] as usize;
            for _ in 0..count {
                if code == (1u32 << length) - 1 {
                    return Err(DecodeError::InvalidHuffmanTable);
                }
                let symbol = match spec.symbols.get(si) {
                    Some(&s) => s,
                    None => return Err(DecodeError::IncompleteHuffmanTable),
                };
                si += 1;
                max_len = length;

                if length <= 8 {
                    // This code, left-aligned to 8 bits, owns 2^(8-length)
                    // consecutive fast entries.
                    let base = (code << (8 - length)) as usize;
                    let fill = 1usize << (8 - length);
                    for entry in &mut fast[base..base + fill] {
                        *entry = (symbol, length);
                    }
                } else {
                    slow.push((code as u16, length, symbol));
                }
                code += 1;
            }
            code <<= 1;
        }

        Ok(Self {
            fast,
            slow,
            max_len,
        })
    }

    /// Decode one symbol from the bit stream.
    ///
    /// Fails with [`DecodeError::NoSuchHuffmanCode`] when no code of length
    /// up to 16 matches the pending bits.
    pub fn decode(&self, reader: &mut BitReader) -> Result<u8> {
        if self.max_len == 0 {
            // A defined table with zero codes can never match.
            return Err(DecodeError::NoSuchHuffmanCode);
        }
        let peek_len = 8.min(self.max_len);
        let peek = reader.peek_bits(peek_len)?;
        let idx = if self.max_len >= 8 {
            peek as usize
        } else {
            (peek << (8 - self.max_len)) as usize
        };

        let (symbol, length) = self.fast[idx];
        if length > 0 {
            reader.skip_bits(length);
            return Ok(symbol);
        }

        self.decode_slow(reader)
    }

    fn decode_slow(&self, reader: &mut BitReader) -> Result<u8> {
        for &(code, length, symbol) in &self.slow {
            let bits = reader.peek_bits(length)?;
            if bits == code {
                reader.skip_bits(length);
                return Ok(symbol);
            }
        }
        Err(DecodeError::NoSuchHuffmanCode)
    }
}

/// Extend a magnitude-category value to its signed coefficient per
/// ITU-T T.81 Table F.1: a high bit of 0 marks a negative value.
pub fn extend(value: u16, size: u8) -> i32 {
    if size == 0 {
        return 0;
    }
    let half = 1i32 << (size - 1);
    if (value as i32) < half {
        value as i32 - (1i32 << size) + 1
    } else {
        value as i32
    }
}
