// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/jfifpix

//! Scan header (SOS) parsing and entropy decoding of the scan data.
//!
//! Decodes the single baseline scan into per-component [`CoeffGrid`]s.
//! With 1×1 sampling an MCU is exactly one 8×8 block per scan component,
//! and the MCU grid is ⌈width/8⌉ × ⌈height/8⌉, traversed in raster order.

use super::bitio::BitReader;
use super::block::CoeffGrid;
use super::error::{DecodeError, Result};
use super::frame::FrameHeader;
use super::huffman::{extend, HuffmanTable};
use super::zigzag::ZIGZAG_TO_NATURAL;

/// One component's table bindings within a scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanComponentSpec {
    /// Index into `FrameHeader::components`.
    pub comp_idx: usize,
    /// DC Huffman table selector (0–1).
    pub dc_table: usize,
    /// AC Huffman table selector (0–1).
    pub ac_table: usize,
}

/// Parsed SOS header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanHeader {
    /// Active components in interleave order.
    pub components: Vec<ScanComponentSpec>,
    /// Start of spectral selection (0 for baseline).
    pub ss: u8,
    /// End of spectral selection (63 for baseline).
    pub se: u8,
    /// Successive approximation high bit (0 for baseline).
    pub ah: u8,
    /// Successive approximation low bit (0 for baseline).
    pub al: u8,
}

/// Parse an SOS marker segment body (after the 2-byte length) against the
/// frame it belongs to.
pub fn parse_sos(data: &[u8], frame: &FrameHeader) -> Result<ScanHeader> {
    if data.is_empty() {
        return Err(DecodeError::UnexpectedEof);
    }
    let count = data[0];
    if count == 0 || count > 4 {
        return Err(DecodeError::InvalidComponentCount(count));
    }
    let count = count as usize;
    if data.len() != 1 + count * 2 + 3 {
        return Err(DecodeError::InvalidMarkerData("SOS length mismatch"));
    }

    let mut components = Vec::with_capacity(count);
    for i in 0..count {
        let offset = 1 + i * 2;
        let id = data[offset];
        let td_ta = data[offset + 1];
        let dc = td_ta >> 4;
        let ac = td_ta & 0x0F;

        let comp_idx = frame
            .component_index(id)
            .ok_or(DecodeError::UnknownComponentInScan(id))?;
        if dc > 1 {
            return Err(DecodeError::NonexistentDcHuffmanTableReferenced(dc));
        }
        if ac > 1 {
            return Err(DecodeError::NonexistentAcHuffmanTableReferenced(ac));
        }

        components.push(ScanComponentSpec {
            comp_idx,
            dc_table: dc as usize,
            ac_table: ac as usize,
        });
    }

    let params_offset = 1 + count * 2;
    let ss = data[params_offset];
    let se = data[params_offset + 1];
    let ah_al = data[params_offset + 2];
    let ah = ah_al >> 4;
    let al = ah_al & 0x0F;

    if ss > 63 || se > 63 || se < ss || (ss == 0 && se != 63) {
        return Err(DecodeError::InvalidSpectralSelectionValue);
    }
    if ss != 0 || se != 63 || ah != 0 || al != 0 {
        return Err(DecodeError::UnsupportedFeature("progressive scan parameters"));
    }

    Ok(ScanHeader {
        components,
        ss,
        se,
        ah,
        al,
    })
}

/// Decode the entropy-coded data of one baseline scan.
///
/// `grids` is indexed by frame component; blocks land in natural order via
/// the inverse zigzag permutation. DC predictors start at zero and
/// accumulate the decoded differentials per component.
///
/// Returns the byte position after the scan data and the marker that
/// terminated it (normally EOI), if the bit reader reached one.
pub fn decode_scan(
    data: &[u8],
    scan_start: usize,
    frame: &FrameHeader,
    scan: &ScanHeader,
    dc_tables: &[Option<HuffmanTable>; 2],
    ac_tables: &[Option<HuffmanTable>; 2],
    grids: &mut [CoeffGrid],
) -> Result<(usize, Option<u8>)> {
    // Bind tables up front; a scan naming an empty slot never starts.
    for sc in &scan.components {
        if dc_tables[sc.dc_table].is_none() {
            return Err(DecodeError::NonexistentDcHuffmanTableReferenced(
                sc.dc_table as u8,
            ));
        }
        if ac_tables[sc.ac_table].is_none() {
            return Err(DecodeError::NonexistentAcHuffmanTableReferenced(
                sc.ac_table as u8,
            ));
        }
    }

    let mut predictors = vec![0i32; scan.components.len()];
    let mut reader = BitReader::new(data, scan_start);
    let mut first_mcu = true;

    for mcu_row in 0..frame.mcus_tall() {
        for mcu_col in 0..frame.mcus_wide() {
            // A marker with MCUs still pending means the scan was cut short.
            if !first_mcu && reader.marker_found().is_some() {
                return Err(DecodeError::CorruptScan("marker before end of scan"));
            }
            first_mcu = false;

            for (sci, sc) in scan.components.iter().enumerate() {
                let dc_tab = dc_tables[sc.dc_table].as_ref().unwrap();
                let ac_tab = ac_tables[sc.ac_table].as_ref().unwrap();

                let mut zz = [0i32; 64];

                // DC: magnitude category, then that many raw bits.
                let t = dc_tab.decode(&mut reader)?;
                if t > 11 {
                    return Err(DecodeError::InvalidDcMagnitude(t));
                }
                let diff = if t == 0 {
                    0
                } else {
                    extend(reader.read_bits(t)?, t)
                };
                predictors[sci] += diff;
                zz[0] = predictors[sci];

                // AC: run/size pairs over zigzag positions 1..=63.
                let mut k = 1;
                while k < 64 {
                    let rs = ac_tab.decode(&mut reader)?;
                    let run = (rs >> 4) as usize;
                    let size = rs & 0x0F;

                    if size == 0 {
                        if rs == 0x00 {
                            break; // EOB: the rest stays zero
                        }
                        if rs == 0xF0 {
                            k += 16;
                            if k > 64 {
                                return Err(DecodeError::CorruptScan(
                                    "zero run past end of block",
                                ));
                            }
                            continue;
                        }
                        return Err(DecodeError::CorruptScan("reserved AC run/size symbol"));
                    }
                    if size > 10 {
                        return Err(DecodeError::InvalidAcMagnitude(size));
                    }

                    k += run;
                    if k > 63 {
                        return Err(DecodeError::CorruptScan(
                            "coefficient run past end of block",
                        ));
                    }
                    zz[k] = extend(reader.read_bits(size)?, size);
                    k += 1;
                }

                // Inverse zigzag into natural order.
                let block = grids[sc.comp_idx].block_mut(mcu_row, mcu_col);
                for zi in 0..64 {
                    block[ZIGZAG_TO_NATURAL[zi]] = zz[zi];
                }
            }
        }
    }

    Ok((reader.position(), reader.marker_found()))
}
