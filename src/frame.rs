// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/jfifpix

//! Frame header (SOF0) parsing.
//!
//! Extracts sample precision, image dimensions, and per-component
//! descriptors from the baseline Start of Frame segment. This decoder
//! accepts 8-bit precision, 1 or 3 components, and 1×1 sampling only;
//! everything else is rejected here, before any scan data is touched.

use super::error::{DecodeError, Result};

/// One image component as declared by SOF0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Component {
    /// Component id (typically 1=Y, 2=Cb, 3=Cr; matched by SOS, never
    /// interpreted).
    pub id: u8,
    /// Horizontal sampling factor (1–4 on the wire; 1 in this decoder).
    pub h_sampling: u8,
    /// Vertical sampling factor (1–4 on the wire; 1 in this decoder).
    pub v_sampling: u8,
    /// Quantization table selector (0–3).
    pub quant_table_id: u8,
}

/// Frame information parsed from SOF0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameHeader {
    /// Sample precision in bits (always 8 here).
    pub precision: u8,
    /// Image height in samples.
    pub height: u16,
    /// Image width in samples.
    pub width: u16,
    /// Components in declaration order.
    pub components: Vec<Component>,
}

impl FrameHeader {
    /// Number of MCUs (8×8 blocks, since sampling is 1×1) per row.
    pub fn mcus_wide(&self) -> usize {
        (self.width as usize + 7) / 8
    }

    /// Number of MCU rows.
    pub fn mcus_tall(&self) -> usize {
        (self.height as usize + 7) / 8
    }

    /// Index into `components` of the component with the given id.
    pub fn component_index(&self, id: u8) -> Option<usize> {
        self.components.iter().position(|c| c.id == id)
    }
}

/// Parse a SOF0 marker segment body (after the 2-byte length).
pub fn parse_sof(data: &[u8]) -> Result<FrameHeader> {
    if data.len() < 6 {
        return Err(DecodeError::UnexpectedEof);
    }

    let precision = data[0];
    if precision != 8 {
        return Err(DecodeError::UnsupportedPrecision(precision));
    }

    let height = u16::from_be_bytes([data[1], data[2]]);
    let width = u16::from_be_bytes([data[3], data[4]]);
    if width == 0 || height == 0 {
        return Err(DecodeError::InvalidDimensions);
    }

    let component_count = data[5];
    if component_count != 1 && component_count != 3 {
        return Err(DecodeError::InvalidComponentCount(component_count));
    }
    let component_count = component_count as usize;

    // The declared segment length must account for the bytes read exactly.
    if data.len() != 6 + component_count * 3 {
        return Err(DecodeError::InvalidMarkerData("SOF0 length mismatch"));
    }

    let mut components = Vec::with_capacity(component_count);
    for i in 0..component_count {
        let offset = 6 + i * 3;
        let id = data[offset];
        let sampling = data[offset + 1];
        let h_sampling = sampling >> 4;
        let v_sampling = sampling & 0x0F;
        let quant_table_id = data[offset + 2];

        for factor in [h_sampling, v_sampling] {
            if factor == 0 || factor > 4 {
                return Err(DecodeError::InvalidSamplingFactor(factor));
            }
            // Subsampled layouts are a non-goal; the MCU grid assumes one
            // block per component.
            if factor != 1 {
                return Err(DecodeError::InvalidSamplingFactor(factor));
            }
        }
        if quant_table_id > 3 {
            return Err(DecodeError::UnknownQuantizationTableReferenced(
                quant_table_id,
            ));
        }

        components.push(Component {
            id,
            h_sampling,
            v_sampling,
            quant_table_id,
        });
    }

    Ok(FrameHeader {
        precision,
        height,
        width,
        components,
    })
}
