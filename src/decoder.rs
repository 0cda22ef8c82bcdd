// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/jfifpix

//! The decoder top loop: marker dispatch from SOI to EOI, then block
//! reconstruction and pixel output.
//!
//! All decoding state (quantization tables, Huffman tables, DC predictors,
//! coefficient grids) lives on the [`Decoder`] instance; nothing is shared
//! between instances or hoisted to process scope.

use super::block::CoeffGrid;
use super::color;
use super::error::{DecodeError, Result};
use super::frame::{parse_sof, FrameHeader};
use super::huffman::HuffmanTable;
use super::idct;
use super::jfif::{parse_app0, JfifHeader};
use super::marker::{self, SegmentCursor};
use super::scan::{decode_scan, parse_sos};
use super::tables::{parse_dht, parse_dqt, QuantTable};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// A decoded image.
#[derive(Debug, Clone)]
pub struct Image {
    /// Width in pixels (samples per row).
    pub width: usize,
    /// Height in pixels (row count).
    pub height: usize,
    /// Row-major pixel storage.
    pub pixels: PixelData,
}

/// Pixel storage: one byte per pixel for grayscale, an R, G, B triple per
/// pixel for colour.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PixelData {
    Gray(Vec<u8>),
    Rgb(Vec<u8>),
}

impl PixelData {
    /// Number of pixels stored.
    pub fn pixel_count(&self) -> usize {
        match self {
            Self::Gray(v) => v.len(),
            Self::Rgb(v) => v.len() / 3,
        }
    }
}

/// Image properties available from the headers alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Info {
    pub width: usize,
    pub height: usize,
    /// 1 (grayscale) or 3 (YCbCr).
    pub components: usize,
}

/// Baseline JPEG decoder over a byte slice.
pub struct Decoder<'a> {
    data: &'a [u8],
    quant_tables: [Option<QuantTable>; 4],
    dc_tables: [Option<HuffmanTable>; 2],
    ac_tables: [Option<HuffmanTable>; 2],
    jfif: Option<JfifHeader>,
    frame: Option<FrameHeader>,
    /// One coefficient grid per frame component, allocated at SOF0.
    grids: Vec<CoeffGrid>,
    scan_done: bool,
}

impl<'a> Decoder<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            quant_tables: [None, None, None, None],
            dc_tables: [None, None],
            ac_tables: [None, None],
            jfif: None,
            frame: None,
            grids: Vec::new(),
            scan_done: false,
        }
    }

    /// The JFIF header, once the prolog has been parsed.
    pub fn jfif_header(&self) -> Option<&JfifHeader> {
        self.jfif.as_ref()
    }

    /// Decode the stream to pixels.
    pub fn decode(mut self) -> Result<Image> {
        let mut cursor = SegmentCursor::new(self.data);
        cursor.expect_soi()?;

        // The JFIF prolog: APP0 directly after SOI, and not a second one
        // right behind it.
        let m = cursor.read_marker()?;
        if m != marker::APP0 {
            return Err(DecodeError::InvalidMagicHeader);
        }
        self.jfif = Some(parse_app0(cursor.read_segment()?)?);

        let resume = cursor.pos();
        if let Ok(next) = cursor.read_marker() {
            if next == marker::APP0 {
                return Err(DecodeError::InvalidMagicHeader);
            }
        }
        cursor.set_pos(resume);

        loop {
            let m = cursor.read_marker()?;
            match m {
                marker::EOI => break,
                marker::DQT => {
                    for (dest, qt) in parse_dqt(cursor.read_segment()?)? {
                        self.quant_tables[dest as usize] = Some(qt);
                    }
                }
                marker::DHT => {
                    for spec in parse_dht(cursor.read_segment()?)? {
                        let table = HuffmanTable::build(&spec)?;
                        if spec.class == 0 {
                            self.dc_tables[spec.id as usize] = Some(table);
                        } else {
                            self.ac_tables[spec.id as usize] = Some(table);
                        }
                    }
                }
                marker::SOF0 => {
                    if self.frame.is_some() {
                        return Err(DecodeError::UnsupportedMultiframe);
                    }
                    let frame = parse_sof(cursor.read_segment()?)?;
                    let (bw, bt) = (frame.mcus_wide(), frame.mcus_tall());
                    self.grids = frame
                        .components
                        .iter()
                        .map(|_| CoeffGrid::new(bw, bt))
                        .collect();
                    self.frame = Some(frame);
                }
                m if marker::is_non_baseline_sof(m) => {
                    if self.frame.is_some() {
                        return Err(DecodeError::UnsupportedMultiframe);
                    }
                    return Err(DecodeError::UnsupportedFrameFormat(m));
                }
                marker::DAC => {
                    return Err(DecodeError::UnsupportedFeature("arithmetic coding"))
                }
                marker::DNL => {
                    return Err(DecodeError::UnsupportedFeature("number-of-lines segment"))
                }
                marker::DRI => return Err(DecodeError::UnsupportedFeature("restart interval")),
                marker::DHP => {
                    return Err(DecodeError::UnsupportedFeature("hierarchical progression"))
                }
                marker::EXP => {
                    return Err(DecodeError::UnsupportedFeature("reference component expansion"))
                }
                marker::SOS => {
                    let frame = self
                        .frame
                        .as_ref()
                        .ok_or(DecodeError::InvalidMarkerData("SOS before SOF0"))?;
                    if self.scan_done {
                        return Err(DecodeError::UnsupportedFeature("multiple scans"));
                    }
                    let scan = parse_sos(cursor.read_segment()?, frame)?;
                    let (end, terminator) = decode_scan(
                        self.data,
                        cursor.pos(),
                        frame,
                        &scan,
                        &self.dc_tables,
                        &self.ac_tables,
                        &mut self.grids,
                    )?;
                    self.scan_done = true;

                    match terminator {
                        // The bit reader already consumed the marker.
                        Some(marker::EOI) => break,
                        Some(m) if marker::is_rst(m) => {
                            return Err(DecodeError::UnsupportedFeature("restart interval"))
                        }
                        Some(m)
                            if m == marker::SOF0 || marker::is_non_baseline_sof(m) =>
                        {
                            return Err(DecodeError::UnsupportedMultiframe)
                        }
                        Some(m) => return Err(DecodeError::UnknownMarkerInFrame(m)),
                        // Scan ended on a byte boundary; the next marker is
                        // still in the stream.
                        None => cursor.set_pos(end),
                    }
                }
                m if marker::is_app(m) || m == marker::COM => {
                    if self.frame.is_some() {
                        return Err(DecodeError::UnknownMarkerInFrame(m));
                    }
                    cursor.skip_segment()?;
                }
                m => {
                    return Err(if self.frame.is_some() {
                        DecodeError::UnknownMarkerInFrame(m)
                    } else {
                        DecodeError::UnknownMarker(m)
                    });
                }
            }
        }

        if !self.scan_done {
            return Err(DecodeError::InvalidMarkerData("EOI before any scan data"));
        }
        self.reconstruct()
    }

    /// Dequantize and inverse-transform every block, then write pixels.
    fn reconstruct(mut self) -> Result<Image> {
        let frame = self
            .frame
            .take()
            .ok_or(DecodeError::InvalidMarkerData("no frame header"))?;

        let mut planes = Vec::with_capacity(frame.components.len());
        for (ci, comp) in frame.components.iter().enumerate() {
            let qt = self.quant_tables[comp.quant_table_id as usize]
                .as_ref()
                .ok_or(DecodeError::UnknownQuantizationTableReferenced(
                    comp.quant_table_id,
                ))?;
            planes.push(reconstruct_plane(&mut self.grids[ci], qt));
        }

        let width = frame.width as usize;
        let height = frame.height as usize;
        let blocks_wide = frame.mcus_wide();

        let pixels = match planes.len() {
            1 => {
                let mut out = Vec::with_capacity(width * height);
                for y in 0..height {
                    for x in 0..width {
                        out.push(color::level_shift(sample(&planes[0], blocks_wide, x, y)));
                    }
                }
                PixelData::Gray(out)
            }
            3 => {
                let mut out = Vec::with_capacity(width * height * 3);
                for y in 0..height {
                    for x in 0..width {
                        let rgb = color::ycbcr_to_rgb(
                            sample(&planes[0], blocks_wide, x, y),
                            sample(&planes[1], blocks_wide, x, y),
                            sample(&planes[2], blocks_wide, x, y),
                        );
                        out.extend_from_slice(&rgb);
                    }
                }
                PixelData::Rgb(out)
            }
            n => return Err(DecodeError::InvalidComponentCount(n as u8)),
        };

        Ok(Image {
            width,
            height,
            pixels,
        })
    }
}

/// Dequantize + IDCT all blocks of one component.
fn reconstruct_plane(grid: &mut CoeffGrid, qt: &QuantTable) -> Vec<[i16; 64]> {
    let reconstruct_block = |block: &mut [i32]| -> [i16; 64] {
        idct::dequantize(block, qt);
        idct::idct_block(block)
    };

    #[cfg(feature = "parallel")]
    {
        grid.coeffs_mut()
            .par_chunks_mut(64)
            .map(reconstruct_block)
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    {
        grid.coeffs_mut()
            .chunks_mut(64)
            .map(reconstruct_block)
            .collect()
    }
}

/// Sample at pixel (x, y) from block-aligned plane storage. Samples past
/// the image extent exist in the edge blocks but are never read.
fn sample(blocks: &[[i16; 64]], blocks_wide: usize, x: usize, y: usize) -> i16 {
    let block = (y / 8) * blocks_wide + x / 8;
    blocks[block][(y % 8) * 8 + (x % 8)]
}

/// Read image dimensions and component count without decoding any pixels.
pub fn read_info(data: &[u8]) -> Result<Info> {
    let mut cursor = SegmentCursor::new(data);
    cursor.expect_soi()?;

    loop {
        let m = cursor.read_marker()?;
        match m {
            marker::SOF0 => {
                let frame = parse_sof(cursor.read_segment()?)?;
                return Ok(Info {
                    width: frame.width as usize,
                    height: frame.height as usize,
                    components: frame.components.len(),
                });
            }
            m if marker::is_non_baseline_sof(m) => {
                return Err(DecodeError::UnsupportedFrameFormat(m))
            }
            marker::EOI | marker::SOS => {
                return Err(DecodeError::InvalidMarkerData("no frame header"))
            }
            m if marker::is_rst(m) || m == marker::SOI => {}
            _ => cursor.skip_segment()?,
        }
    }
}
