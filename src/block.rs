// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/jfifpix

//! Coefficient block storage for one image component.

/// Grid of 8×8 DCT coefficient blocks for one component.
///
/// Blocks are stored in block-raster order; within each block the 64
/// coefficients are in natural (row-major) order, index = row * 8 + col.
/// Entries are i32: after dequantization they hold products of a 12-bit
/// coefficient and a 16-bit quantizer.
#[derive(Debug, Clone)]
pub struct CoeffGrid {
    blocks_wide: usize,
    blocks_tall: usize,
    /// Flat storage: blocks_tall * blocks_wide * 64 coefficients.
    coeffs: Vec<i32>,
}

impl CoeffGrid {
    /// Create a zero-initialized grid.
    pub fn new(blocks_wide: usize, blocks_tall: usize) -> Self {
        Self {
            blocks_wide,
            blocks_tall,
            coeffs: vec![0i32; blocks_wide * blocks_tall * 64],
        }
    }

    pub fn blocks_wide(&self) -> usize {
        self.blocks_wide
    }

    pub fn blocks_tall(&self) -> usize {
        self.blocks_tall
    }

    /// Total number of blocks.
    pub fn total_blocks(&self) -> usize {
        self.blocks_wide * self.blocks_tall
    }

    /// The 64-coefficient block at (block_row, block_col).
    pub fn block(&self, br: usize, bc: usize) -> &[i32] {
        let start = (br * self.blocks_wide + bc) * 64;
        &self.coeffs[start..start + 64]
    }

    /// Mutable access to the block at (block_row, block_col).
    pub fn block_mut(&mut self, br: usize, bc: usize) -> &mut [i32] {
        debug_assert!(br < self.blocks_tall && bc < self.blocks_wide);
        let start = (br * self.blocks_wide + bc) * 64;
        &mut self.coeffs[start..start + 64]
    }

    /// Raw mutable access to all coefficients.
    ///
    /// Layout: contiguous 64-element chunks, one per block, in block-raster
    /// order. Used by the parallel reconstruction path (`par_chunks_mut`).
    pub fn coeffs_mut(&mut self) -> &mut [i32] {
        &mut self.coeffs
    }
}
