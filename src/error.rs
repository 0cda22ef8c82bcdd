// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/jfifpix

//! Error types for JPEG decoding.

use std::fmt;

/// Errors that can occur while decoding a baseline JPEG stream.
///
/// Every error is terminal: the decoder stops at the detection point and
/// returns without producing pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// Input data is too short or truncated.
    UnexpectedEof,
    /// The SOI/APP0/JFIF prolog is missing or malformed, a thumbnail is
    /// present, or a second APP0 immediately follows the first.
    InvalidMagicHeader,
    /// A marker segment has invalid or inconsistent length/content.
    InvalidMarkerData(&'static str),
    /// Image width or height is zero.
    InvalidDimensions,
    /// A marker byte the decoder does not know.
    UnknownMarker(u8),
    /// Inside a frame, a marker other than DHT/DQT/SOS.
    UnknownMarkerInFrame(u8),
    /// A start-of-frame marker other than SOF0 (progressive, lossless,
    /// arithmetic, differential, hierarchical).
    UnsupportedFrameFormat(u8),
    /// A second SOF marker in the same stream.
    UnsupportedMultiframe,
    /// Sample precision other than 8 bits.
    UnsupportedPrecision(u8),
    /// A feature outside the baseline subset (DRI, DNL, DAC, DHP, EXP,
    /// progressive scan parameters, a second scan).
    UnsupportedFeature(&'static str),
    /// Frame component count not 1 or 3, or scan component count not 1–4.
    InvalidComponentCount(u8),
    /// Sampling factor outside 1–4, or not 1 for this decoder.
    InvalidSamplingFactor(u8),
    /// Ss/Se/Ah/Al outside the ranges T.81 permits.
    InvalidSpectralSelectionValue,
    /// DQT precision nibble not 0 (8-bit) or 1 (16-bit).
    UnknownQuantizationTablePrecision(u8),
    /// A quantization table selector names a slot that is empty or out of
    /// range.
    UnknownQuantizationTableReferenced(u8),
    /// Canonical code construction reached an all-ones code, or the table
    /// class nibble is not 0 (DC) or 1 (AC), or the destination is not 0–1.
    InvalidHuffmanTable,
    /// DHT data ends before the 16 code counts or the announced symbols.
    IncompleteHuffmanTable,
    /// 16 bits consumed from the scan without matching any Huffman code.
    NoSuchHuffmanCode,
    /// DC magnitude category above 11.
    InvalidDcMagnitude(u8),
    /// AC magnitude category above 10.
    InvalidAcMagnitude(u8),
    /// A scan names a component id absent from the frame header.
    UnknownComponentInScan(u8),
    /// A scan binds a DC Huffman table slot that is empty or out of range.
    NonexistentDcHuffmanTableReferenced(u8),
    /// A scan binds an AC Huffman table slot that is empty or out of range.
    NonexistentAcHuffmanTableReferenced(u8),
    /// The entropy-coded data itself is malformed (coefficient run past the
    /// end of a block, marker in the middle of a scan).
    CorruptScan(&'static str),
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedEof => write!(f, "unexpected end of JPEG data"),
            Self::InvalidMagicHeader => write!(f, "missing or malformed SOI/JFIF prolog"),
            Self::InvalidMarkerData(msg) => write!(f, "invalid marker data: {msg}"),
            Self::InvalidDimensions => write!(f, "image width or height is zero"),
            Self::UnknownMarker(m) => write!(f, "unknown marker: 0xFF{m:02X}"),
            Self::UnknownMarkerInFrame(m) => write!(f, "unexpected marker inside frame: 0xFF{m:02X}"),
            Self::UnsupportedFrameFormat(m) => write!(f, "unsupported frame format: 0xFF{m:02X}"),
            Self::UnsupportedMultiframe => write!(f, "more than one frame in stream"),
            Self::UnsupportedPrecision(p) => write!(f, "unsupported sample precision: {p}-bit"),
            Self::UnsupportedFeature(what) => write!(f, "unsupported feature: {what}"),
            Self::InvalidComponentCount(n) => write!(f, "invalid component count: {n}"),
            Self::InvalidSamplingFactor(s) => write!(f, "invalid sampling factor: {s}"),
            Self::InvalidSpectralSelectionValue => write!(f, "invalid spectral selection values"),
            Self::UnknownQuantizationTablePrecision(p) => {
                write!(f, "unknown quantization table precision: {p}")
            }
            Self::UnknownQuantizationTableReferenced(id) => {
                write!(f, "quantization table {id} referenced but not defined")
            }
            Self::InvalidHuffmanTable => write!(f, "malformed Huffman table"),
            Self::IncompleteHuffmanTable => write!(f, "Huffman table data is incomplete"),
            Self::NoSuchHuffmanCode => write!(f, "no Huffman code matches the scan bits"),
            Self::InvalidDcMagnitude(t) => write!(f, "invalid DC magnitude category: {t}"),
            Self::InvalidAcMagnitude(s) => write!(f, "invalid AC magnitude category: {s}"),
            Self::UnknownComponentInScan(id) => write!(f, "scan references unknown component: {id}"),
            Self::NonexistentDcHuffmanTableReferenced(id) => {
                write!(f, "DC Huffman table {id} referenced but not defined")
            }
            Self::NonexistentAcHuffmanTableReferenced(id) => {
                write!(f, "AC Huffman table {id} referenced but not defined")
            }
            Self::CorruptScan(msg) => write!(f, "corrupt scan data: {msg}"),
        }
    }
}

impl std::error::Error for DecodeError {}

pub type Result<T> = std::result::Result<T, DecodeError>;
