//! Boundary-aware 3x3 neighborhood filters.
//!
//! Every filter here is built on one primitive: [`accumulate`] sums
//! `kernel[dr, dc] * channel(row + dr, col + dc)` over the in-bounds offsets
//! chosen by [`Neighborhood::at`]. Border pixels therefore see 6 (edge) or 4
//! (corner) neighbors instead of 9; nothing is padded, mirrored or clamped.
//!
//! - [`PixelBuffer::blur`] - box blur, divided by the neighbor count actually used
//! - [`PixelBuffer::sobel_edge`] - per-channel gradient magnitude
//! - [`PixelBuffer::extract_white`] / [`PixelBuffer::glow`] - threshold glow
//! - [`PixelBuffer::bit_map`] / [`PixelBuffer::bitmap`] - block mosaics
//!
//! Filters always read the source and write a separate destination, so a
//! pixel's output never feeds into a neighbor's input. Row-independent
//! filters fill destination rows in parallel.

mod filters;
mod kernel;
mod mosaic;
mod position;

pub use kernel::{Kernel3, BOX, SOBEL_X, SOBEL_Y};
pub use position::{Corner, Neighborhood, PositionClass, Side};

use rayon::prelude::*;

use crate::buffer::PixelBuffer;
use crate::pixel::Pixel;

/// Per-channel kernel sums at one pixel plus the number of neighbors used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Accumulated {
    /// Weighted sums for R, G and B
    pub sums: [i32; 3],
    /// Neighbors visited (9, 6 or 4 for images of at least 2x2)
    pub count: usize,
}

/// Apply `kernel` at `(row, col)` over the in-bounds neighborhood.
///
/// # Panics
///
/// Panics if `(row, col)` is outside `image`.
pub fn accumulate(image: &PixelBuffer, kernel: &Kernel3, row: usize, col: usize) -> Accumulated {
    let neighborhood = Neighborhood::at(row, col, image.width(), image.height());
    let mut sums = [0i32; 3];
    for ((dr, dc), (r, c)) in neighborhood.coords() {
        let weight = kernel.weight(dr, dc);
        if weight == 0 {
            continue;
        }
        let p = image.at(r, c);
        sums[0] += weight * p.r as i32;
        sums[1] += weight * p.g as i32;
        sums[2] += weight * p.b as i32;
    }
    Accumulated {
        sums,
        count: neighborhood.len(),
    }
}

/// Build a same-sized buffer where each output pixel is `f(source, row, col)`.
///
/// Rows are computed in parallel; `f` only ever sees the untouched source.
pub(crate) fn map_positions<F>(source: &PixelBuffer, f: F) -> PixelBuffer
where
    F: Fn(&PixelBuffer, usize, usize) -> Pixel + Sync,
{
    let (width, height) = source.dimensions();
    let mut out = PixelBuffer::new(width, height);
    if out.is_empty() {
        return out;
    }
    out.pixels_mut()
        .par_chunks_mut(width)
        .enumerate()
        .for_each(|(row, dst)| {
            for (col, slot) in dst.iter_mut().enumerate() {
                *slot = f(source, row, col);
            }
        });
    out
}
