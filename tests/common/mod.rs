// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/jfifpix

//! Synthetic baseline JFIF streams for integration tests.
//!
//! Assembles complete files from quantized coefficient blocks: marker
//! segments, fixed-length canonical Huffman tables, and entropy-coded data
//! with byte stuffing. The Huffman tables put all 12 DC categories at 5
//! bits and all 162 AC run/size symbols at 9 bits, which keeps the encoder
//! a table index away from the code word.

use jfifpix::zigzag::ZIGZAG_TO_NATURAL;

/// DC table: 12 symbols (categories 0–11), all with 5-bit codes.
fn dc_symbols() -> Vec<u8> {
    (0..12).collect()
}

/// AC table: EOB, ZRL, then every (run, size) pair, all with 9-bit codes.
fn ac_symbols() -> Vec<u8> {
    let mut syms = vec![0x00, 0xF0];
    for run in 0..16u8 {
        for size in 1..=10u8 {
            syms.push((run << 4) | size);
        }
    }
    syms
}

/// Canonical code for the i-th symbol of a single-length table: with every
/// code `len` bits long, the code word is the symbol's index.
fn code_for(index: usize) -> u16 {
    index as u16
}

/// Bit accumulator with JPEG byte stuffing and 1-bit padding.
pub struct BitSink {
    bytes: Vec<u8>,
    acc: u8,
    used: u8,
}

impl BitSink {
    pub fn new() -> Self {
        Self {
            bytes: Vec::new(),
            acc: 0,
            used: 0,
        }
    }

    pub fn put(&mut self, code: u16, len: u8) {
        for i in (0..len).rev() {
            self.acc = (self.acc << 1) | (((code >> i) & 1) as u8);
            self.used += 1;
            if self.used == 8 {
                self.emit();
            }
        }
    }

    pub fn finish(mut self) -> Vec<u8> {
        if self.used > 0 {
            let pad = 8 - self.used;
            self.acc = (self.acc << pad) | ((1 << pad) - 1);
            self.used = 8;
            self.emit();
        }
        self.bytes
    }

    fn emit(&mut self) {
        self.bytes.push(self.acc);
        if self.acc == 0xFF {
            self.bytes.push(0x00);
        }
        self.acc = 0;
        self.used = 0;
    }
}

/// Magnitude bits and category for a coefficient, per T.81 F.1.2.1
/// (negative values in one's complement of the magnitude).
pub fn encode_value(v: i32) -> (u16, u8) {
    if v == 0 {
        return (0, 0);
    }
    let size = (32 - v.unsigned_abs().leading_zeros()) as u8;
    let bits = if v > 0 { v as u16 } else { (v - 1) as u16 };
    (bits & ((1u16 << size) - 1), size)
}

fn segment(marker: u8, payload: &[u8]) -> Vec<u8> {
    let mut out = vec![0xFF, marker];
    out.extend_from_slice(&((payload.len() + 2) as u16).to_be_bytes());
    out.extend_from_slice(payload);
    out
}

fn app0_segment() -> Vec<u8> {
    let mut p = b"JFIF\0".to_vec();
    p.extend_from_slice(&[1, 1]); // version 1.01
    p.push(0); // aspect-ratio density
    p.extend_from_slice(&1u16.to_be_bytes());
    p.extend_from_slice(&1u16.to_be_bytes());
    p.extend_from_slice(&[0, 0]); // no thumbnail
    segment(0xE0, &p)
}

/// One quantization table, given in natural order.
#[derive(Clone)]
pub enum TestQuant {
    Bits8([u8; 64]),
    Bits16([u16; 64]),
}

impl TestQuant {
    pub fn flat(value: u8) -> Self {
        Self::Bits8([value; 64])
    }
}

fn dqt_segment(dest: u8, qt: &TestQuant) -> Vec<u8> {
    let mut p = Vec::new();
    match qt {
        TestQuant::Bits8(natural) => {
            p.push(dest);
            for zi in 0..64 {
                p.push(natural[ZIGZAG_TO_NATURAL[zi]]);
            }
        }
        TestQuant::Bits16(natural) => {
            p.push(0x10 | dest);
            for zi in 0..64 {
                p.extend_from_slice(&natural[ZIGZAG_TO_NATURAL[zi]].to_be_bytes());
            }
        }
    }
    segment(0xDB, &p)
}

fn dht_segment() -> Vec<u8> {
    let mut p = Vec::new();

    p.push(0x00); // DC table 0
    let mut counts = [0u8; 16];
    counts[4] = 12; // all 5-bit codes
    p.extend_from_slice(&counts);
    p.extend_from_slice(&dc_symbols());

    p.push(0x10); // AC table 0
    let mut counts = [0u8; 16];
    counts[8] = 162; // all 9-bit codes
    p.extend_from_slice(&counts);
    p.extend_from_slice(&ac_symbols());

    segment(0xC4, &p)
}

/// A synthetic image: per-component quantized coefficient blocks, one per
/// MCU in raster order, each 64 values in zigzag order.
pub struct TestImage {
    pub width: u16,
    pub height: u16,
    pub components: Vec<Vec<[i32; 64]>>,
    pub qtables: Vec<TestQuant>,
}

impl TestImage {
    /// Grayscale image from per-MCU zigzag blocks, unit quantization.
    pub fn gray(width: u16, height: u16, blocks: Vec<[i32; 64]>) -> Self {
        Self {
            width,
            height,
            components: vec![blocks],
            qtables: vec![TestQuant::flat(1)],
        }
    }

    /// YCbCr image from per-MCU zigzag blocks, unit quantization.
    pub fn ycbcr(
        width: u16,
        height: u16,
        y: Vec<[i32; 64]>,
        cb: Vec<[i32; 64]>,
        cr: Vec<[i32; 64]>,
    ) -> Self {
        Self {
            width,
            height,
            components: vec![y, cb, cr],
            qtables: vec![TestQuant::flat(1); 3],
        }
    }

    /// A DC-only block (zigzag order), AC all zero.
    pub fn dc_block(dc: i32) -> [i32; 64] {
        let mut zz = [0i32; 64];
        zz[0] = dc;
        zz
    }

    /// Assemble the complete JFIF byte stream.
    pub fn build(&self) -> Vec<u8> {
        let mcu_count =
            ((self.width as usize + 7) / 8) * ((self.height as usize + 7) / 8);
        for comp in &self.components {
            assert_eq!(comp.len(), mcu_count, "one block per MCU per component");
        }

        let mut out = vec![0xFF, 0xD8]; // SOI
        out.extend_from_slice(&app0_segment());

        for (i, qt) in self.qtables.iter().enumerate() {
            out.extend_from_slice(&dqt_segment(i as u8, qt));
        }
        out.extend_from_slice(&dht_segment());

        // SOF0: component ids 1..=n, 1x1 sampling, one quant table each.
        let mut sof = vec![8];
        sof.extend_from_slice(&self.height.to_be_bytes());
        sof.extend_from_slice(&self.width.to_be_bytes());
        sof.push(self.components.len() as u8);
        for i in 0..self.components.len() {
            sof.extend_from_slice(&[(i + 1) as u8, 0x11, i as u8]);
        }
        out.extend_from_slice(&segment(0xC0, &sof));

        // SOS: every component bound to DC/AC table 0.
        let mut sos = vec![self.components.len() as u8];
        for i in 0..self.components.len() {
            sos.extend_from_slice(&[(i + 1) as u8, 0x00]);
        }
        sos.extend_from_slice(&[0, 63, 0]);
        out.extend_from_slice(&segment(0xDA, &sos));

        out.extend_from_slice(&self.encode_scan());
        out.extend_from_slice(&[0xFF, 0xD9]); // EOI
        out
    }

    fn encode_scan(&self) -> Vec<u8> {
        let ac_syms = ac_symbols();
        let ac_index = |rs: u8| ac_syms.iter().position(|&s| s == rs).unwrap();

        let mut sink = BitSink::new();
        let mut predictors = vec![0i32; self.components.len()];
        let mcu_count = self.components[0].len();

        for mcu in 0..mcu_count {
            for (ci, blocks) in self.components.iter().enumerate() {
                let zz = &blocks[mcu];

                // DC: category code, then magnitude bits.
                let diff = zz[0] - predictors[ci];
                predictors[ci] = zz[0];
                let (bits, size) = encode_value(diff);
                sink.put(code_for(size as usize), 5);
                if size > 0 {
                    sink.put(bits, size);
                }

                // AC: run/size pairs, ZRL for long runs, EOB for the tail.
                let mut k = 1;
                while k < 64 {
                    let mut run = 0;
                    while k + run < 64 && zz[k + run] == 0 {
                        run += 1;
                    }
                    if k + run >= 64 {
                        sink.put(code_for(ac_index(0x00)), 9);
                        break;
                    }
                    while run >= 16 {
                        sink.put(code_for(ac_index(0xF0)), 9);
                        run -= 16;
                        k += 16;
                    }
                    k += run;
                    let (bits, size) = encode_value(zz[k]);
                    sink.put(code_for(ac_index(((run as u8) << 4) | size)), 9);
                    sink.put(bits, size);
                    k += 1;
                }
            }
        }

        sink.finish()
    }
}
