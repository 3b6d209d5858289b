//! Block mosaics.
//!
//! [`PixelBuffer::bit_map`] is the fixed 3x3 mosaic built on the shared
//! neighborhood engine; [`PixelBuffer::bitmap`] generalizes the idea to
//! arbitrary square blocks.

use super::{accumulate, Neighborhood, BOX};
use crate::buffer::PixelBuffer;
use crate::error::RasterError;
use crate::pixel::Pixel;

/// Truncating mean, the mosaic's averaging rule.
#[inline]
fn truncated_mean(sums: [i32; 3], count: usize) -> Pixel {
    let n = count as i32;
    Pixel::new((sums[0] / n) as u8, (sums[1] / n) as u8, (sums[2] / n) as u8)
}

impl PixelBuffer {
    /// 3x3 mosaic.
    ///
    /// Starts from a copy of the image. Centers are visited at odd rows and
    /// columns (`1, 3, 5, ...` up to `height - 2` / `width - 2`) in row-major
    /// order; each center's 3x3 neighborhood in the *source* is averaged with
    /// integer truncation and the average is written over that neighborhood.
    /// Border rows and columns are never written.
    ///
    /// Blocks overlap on every even interior row and column, where the block
    /// visited later (below or to the right) wins. When `height - 2` is odd
    /// the last block reaches the bottom border and is cut short there; the
    /// same holds for columns. Images smaller than 3x3 come back unchanged.
    pub fn bit_map(&self) -> PixelBuffer {
        let (width, height) = self.dimensions();
        let mut out = self.clone();
        if width < 3 || height < 3 {
            return out;
        }

        for center_row in (1..height - 1).step_by(2) {
            for center_col in (1..width - 1).step_by(2) {
                let acc = accumulate(self, &BOX, center_row, center_col);
                let average = truncated_mean(acc.sums, acc.count);
                for (_, (row, col)) in Neighborhood::at(center_row, center_col, width, height).coords() {
                    let on_border = row == 0 || col == 0 || row == height - 1 || col == width - 1;
                    if !on_border {
                        out.put(row, col, average);
                    }
                }
            }
        }
        out
    }

    /// Square-block mosaic with blocks of `size x size` pixels.
    ///
    /// Blocks are laid out from the top-left corner; blocks along the right
    /// and bottom edges are cut to fit. Each block is replaced by its
    /// truncated per-channel mean. `size == 1` is the identity.
    pub fn bitmap(&self, size: usize) -> Result<PixelBuffer, RasterError> {
        if size == 0 {
            return Err(RasterError::InvalidBlockSize);
        }
        let (width, height) = self.dimensions();
        let mut out = PixelBuffer::new(width, height);

        for top in (0..height).step_by(size) {
            let bottom = (top + size).min(height);
            for left in (0..width).step_by(size) {
                let right = (left + size).min(width);

                let mut sums = [0u64; 3];
                for row in top..bottom {
                    for col in left..right {
                        let p = self.at(row, col);
                        sums[0] += p.r as u64;
                        sums[1] += p.g as u64;
                        sums[2] += p.b as u64;
                    }
                }
                let n = ((bottom - top) * (right - left)) as u64;
                let average = Pixel::new(
                    (sums[0] / n) as u8,
                    (sums[1] / n) as u8,
                    (sums[2] / n) as u8,
                );

                for row in top..bottom {
                    for col in left..right {
                        out.put(row, col, average);
                    }
                }
            }
        }
        Ok(out)
    }
}
