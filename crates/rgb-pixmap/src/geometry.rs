//! Re-indexing transforms: resize, flips, rotation, cropping.
//!
//! None of these look at pixel values; each output pixel is a copy of
//! exactly one source pixel.

use crate::buffer::PixelBuffer;
use crate::error::RasterError;
use crate::pixel::Pixel;

/// Source index for output position `i` of `out_len` when sampling a source
/// axis of `src_len`. A single output sample uses ratio 0.
#[inline]
fn nearest_index(i: usize, out_len: usize, src_len: usize) -> usize {
    if out_len <= 1 {
        return 0;
    }
    // floor(i / (out_len - 1) * (src_len - 1)) in exact integer arithmetic
    (i * (src_len - 1) / (out_len - 1)).min(src_len - 1)
}

impl PixelBuffer {
    /// Nearest-neighbor resize to `width x height`.
    ///
    /// Output pixel `(i, j)` samples source row
    /// `floor(i / (height - 1) * (src_height - 1))` and the analogous column,
    /// so the first and last rows and columns always map onto each other.
    /// A target of one row (or column) samples source row (column) 0. A
    /// target whose pixel count overflows `usize` is rejected before anything
    /// is allocated.
    pub fn resize(&self, width: usize, height: usize) -> Result<PixelBuffer, RasterError> {
        let mut result = PixelBuffer::try_filled(width, height, Pixel::BLACK)?;
        if result.is_empty() {
            return Ok(result);
        }
        if self.is_empty() {
            return Err(RasterError::EmptySource);
        }

        let cols: Vec<usize> = (0..width)
            .map(|j| nearest_index(j, width, self.width()))
            .collect();
        for i in 0..height {
            let src_row = nearest_index(i, height, self.height());
            for (j, &src_col) in cols.iter().enumerate() {
                result.put(i, j, self.at(src_row, src_col));
            }
        }
        Ok(result)
    }

    /// Mirror rows top-to-bottom: `result[i, j] = self[height - 1 - i, j]`.
    ///
    /// Note the naming: this flips *around the horizontal midline*, which many
    /// graphics libraries call a vertical flip.
    pub fn flip_horizontal(&self) -> PixelBuffer {
        let mut result = PixelBuffer::new(self.width(), self.height());
        for (i, row) in self.rows().rev().enumerate() {
            for (j, &p) in row.iter().enumerate() {
                result.put(i, j, p);
            }
        }
        result
    }

    /// Mirror columns left-to-right: `result[i, j] = self[i, width - 1 - j]`.
    ///
    /// Flips *around the vertical midline*; see the naming note on
    /// [`flip_horizontal`](Self::flip_horizontal).
    pub fn flip_vertical(&self) -> PixelBuffer {
        let mut result = PixelBuffer::new(self.width(), self.height());
        for (i, row) in self.rows().enumerate() {
            for (j, &p) in row.iter().rev().enumerate() {
                result.put(i, j, p);
            }
        }
        result
    }

    /// Rotate 90 degrees counter-clockwise.
    ///
    /// The result is `height x width` with
    /// `result[i, j] = self[j, width - 1 - i]`.
    pub fn rotate90(&self) -> PixelBuffer {
        let (w, h) = self.dimensions();
        let mut result = PixelBuffer::new(h, w);
        for i in 0..w {
            for j in 0..h {
                result.put(i, j, self.at(j, w - 1 - i));
            }
        }
        result
    }

    /// Copy the `width x height` rectangle whose top-left corner is at
    /// column `x`, row `y`.
    ///
    /// The whole rectangle must lie inside the buffer.
    pub fn subimage(
        &self,
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    ) -> Result<PixelBuffer, RasterError> {
        let fits = x
            .checked_add(width)
            .is_some_and(|right| right <= self.width())
            && y.checked_add(height)
                .is_some_and(|bottom| bottom <= self.height());
        if !fits {
            return Err(RasterError::RegionOutOfBounds {
                x,
                y,
                width,
                height,
                source_width: self.width(),
                source_height: self.height(),
            });
        }

        let mut sub = PixelBuffer::new(width, height);
        for i in 0..height {
            for j in 0..width {
                sub.put(i, j, self.at(y + i, x + j));
            }
        }
        Ok(sub)
    }
}
