// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/jfifpix

//! Block reconstruction: dequantization and the 8×8 inverse DCT.
//!
//! The IDCT is the separable formulation of T.81 equation A.3.3: two 1-D
//! passes with normalization 1/√8 for the DC basis and 1/2 otherwise,
//! which equals the direct form's (1/4)·C_u·C_v with C_0 = 1/√2.

use std::sync::OnceLock;

use super::tables::QuantTable;

/// Pre-computed cosine basis. `COSINE[u][x] = cos((2x + 1)·u·π/16)`.
static COSINE: OnceLock<[[f64; 8]; 8]> = OnceLock::new();

/// Normalization constants: 1/√8 for u = 0, 1/2 otherwise.
static NORM: OnceLock<[f64; 8]> = OnceLock::new();

fn cosine_table() -> &'static [[f64; 8]; 8] {
    COSINE.get_or_init(|| {
        let mut table = [[0.0f64; 8]; 8];
        for u in 0..8 {
            for x in 0..8 {
                table[u][x] = ((2 * x + 1) as f64 * u as f64 * std::f64::consts::PI / 16.0).cos();
            }
        }
        table
    })
}

fn norm_table() -> &'static [f64; 8] {
    NORM.get_or_init(|| {
        let mut n = [0.5f64; 8];
        n[0] = 1.0 / (8.0f64).sqrt();
        n
    })
}

/// Multiply each coefficient by its quantizer, in place.
///
/// Both the block and the table are in natural (row-major) order; the
/// zigzag inversion already happened at parse and at scan writeback.
pub fn dequantize(block: &mut [i32], qt: &QuantTable) {
    for (i, coeff) in block.iter_mut().enumerate() {
        *coeff *= qt.value(i) as i32;
    }
}

/// 8×8 inverse DCT of one dequantized block.
///
/// Input in natural order; output samples rounded to nearest and clamped
/// to the signed 8-bit range [−128, 127]. The +128 level shift happens in
/// the colour stage.
pub fn idct_block(coeffs: &[i32]) -> [i16; 64] {
    let cos = cosine_table();
    let c = norm_table();

    // Pass 1: 1-D IDCT down each column.
    let mut temp = [0.0f64; 64];
    for col in 0..8 {
        for y in 0..8 {
            let mut sum = 0.0;
            for v in 0..8 {
                sum += c[v] * coeffs[v * 8 + col] as f64 * cos[v][y];
            }
            temp[y * 8 + col] = sum;
        }
    }

    // Pass 2: 1-D IDCT along each row.
    let mut out = [0i16; 64];
    for row in 0..8 {
        for x in 0..8 {
            let mut sum = 0.0;
            for u in 0..8 {
                sum += c[u] * temp[row * 8 + u] * cos[u][x];
            }
            out[row * 8 + x] = (sum.round() as i32).clamp(-128, 127) as i16;
        }
    }

    out
}
