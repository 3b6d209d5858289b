//! Owned row-major RGB raster.
//!
//! [`PixelBuffer`] is the only storage type in the crate. Every transform
//! reads one or two buffers and returns a freshly allocated one; the only
//! in-place mutators are [`set`](PixelBuffer::set),
//! [`set_index`](PixelBuffer::set_index), [`set_raw`](PixelBuffer::set_raw),
//! [`fill`](PixelBuffer::fill) and [`replace`](PixelBuffer::replace), all of
//! which take `&mut self`.

use crate::error::RasterError;
use crate::pixel::Pixel;

/// An owned, fixed-size, row-major raster of [`Pixel`]s.
///
/// The backing vector always holds exactly `width * height` pixels; a buffer
/// with a zero dimension holds none. `Clone` deep-copies the pixels, so two
/// buffers never share storage.
///
/// # Example
///
/// ```
/// use rgb_pixmap::{Pixel, PixelBuffer};
///
/// let mut image = PixelBuffer::new(4, 3);
/// image.set(1, 2, Pixel::new(255, 0, 0)).unwrap();
///
/// assert_eq!(image.width(), 4);
/// assert_eq!(image.height(), 3);
/// assert_eq!(image.get(1, 2).unwrap(), Pixel::new(255, 0, 0));
/// assert!(image.get(3, 0).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PixelBuffer {
    width: usize,
    height: usize,
    pixels: Vec<Pixel>,
}

impl PixelBuffer {
    /// Allocate a `width x height` buffer of black pixels.
    pub fn new(width: usize, height: usize) -> Self {
        Self::filled(width, height, Pixel::BLACK)
    }

    /// Allocate a `width x height` buffer with every pixel set to `pixel`.
    ///
    /// # Panics
    ///
    /// Panics like any oversized `Vec` allocation if `width * height`
    /// overflows. Use [`try_filled`](Self::try_filled) for untrusted sizes.
    pub fn filled(width: usize, height: usize, pixel: Pixel) -> Self {
        Self {
            width,
            height,
            pixels: vec![pixel; width.saturating_mul(height)],
        }
    }

    /// Like [`filled`](Self::filled), but reports an overflowing size as
    /// [`RasterError::DimensionOverflow`].
    pub fn try_filled(width: usize, height: usize, pixel: Pixel) -> Result<Self, RasterError> {
        let len = pixel_count(width, height)?;
        Ok(Self {
            width,
            height,
            pixels: vec![pixel; len],
        })
    }

    /// Wrap an existing row-major pixel vector.
    pub fn from_pixels(
        width: usize,
        height: usize,
        pixels: Vec<Pixel>,
    ) -> Result<Self, RasterError> {
        let expected = pixel_count(width, height)?;
        if pixels.len() != expected {
            return Err(RasterError::BufferLength {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Build a buffer from flat `[R, G, B, R, G, B, ...]` bytes.
    ///
    /// `bytes` must hold exactly `width * height * 3` values with no row
    /// padding.
    pub fn from_rgb_bytes(width: usize, height: usize, bytes: &[u8]) -> Result<Self, RasterError> {
        let expected = pixel_count(width, height)?
            .checked_mul(3)
            .ok_or(RasterError::DimensionOverflow { width, height })?;
        if bytes.len() != expected {
            return Err(RasterError::BufferLength {
                expected,
                actual: bytes.len(),
            });
        }
        let pixels = bytes
            .chunks_exact(3)
            .map(|c| Pixel::new(c[0], c[1], c[2]))
            .collect();
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Replace dimensions and content with flat RGB bytes.
    ///
    /// On error the buffer is left untouched. The previous storage is dropped
    /// once the new content is in place.
    pub fn set_raw(&mut self, width: usize, height: usize, bytes: &[u8]) -> Result<(), RasterError> {
        *self = Self::from_rgb_bytes(width, height, bytes)?;
        Ok(())
    }

    /// Flat `[R, G, B, ...]` copy of the pixels, `width * height * 3` bytes.
    pub fn to_rgb_bytes(&self) -> Vec<u8> {
        let mut rgb = Vec::with_capacity(self.pixels.len() * 3);
        for p in &self.pixels {
            rgb.extend_from_slice(&p.to_bytes());
        }
        rgb
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// `(width, height)`
    #[inline]
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Number of pixels, `width * height`.
    #[inline]
    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Pixels in row-major order.
    #[inline]
    pub fn pixels(&self) -> &[Pixel] {
        &self.pixels
    }

    /// Iterate over rows, top to bottom.
    pub fn rows(&self) -> impl DoubleEndedIterator<Item = &[Pixel]> + ExactSizeIterator {
        // chunks(0) panics; an empty vector yields no chunks anyway
        self.pixels.chunks(self.width.max(1))
    }

    /// Copy of the pixel at `(row, col)`.
    pub fn get(&self, row: usize, col: usize) -> Result<Pixel, RasterError> {
        self.check(row, col)?;
        Ok(self.at(row, col))
    }

    /// Copy of the pixel at linear `index`.
    pub fn get_index(&self, index: usize) -> Result<Pixel, RasterError> {
        self.pixels
            .get(index)
            .copied()
            .ok_or(RasterError::IndexOutOfBounds {
                index,
                len: self.pixels.len(),
            })
    }

    /// Overwrite the pixel at `(row, col)`.
    pub fn set(&mut self, row: usize, col: usize, pixel: Pixel) -> Result<(), RasterError> {
        self.check(row, col)?;
        let i = self.idx(row, col);
        self.pixels[i] = pixel;
        Ok(())
    }

    /// Overwrite the pixel at linear `index`.
    pub fn set_index(&mut self, index: usize, pixel: Pixel) -> Result<(), RasterError> {
        let len = self.pixels.len();
        let slot = self
            .pixels
            .get_mut(index)
            .ok_or(RasterError::IndexOutOfBounds { index, len })?;
        *slot = pixel;
        Ok(())
    }

    /// Set every pixel to `pixel`.
    pub fn fill(&mut self, pixel: Pixel) {
        self.pixels.fill(pixel);
    }

    /// Paste `source` with its top-left corner at column `x`, row `y`.
    ///
    /// Only `min(height - y, source.height)` rows and
    /// `min(width - x, source.width)` columns are copied, so a source that
    /// would overflow the right or bottom edge is clipped. An offset at or
    /// past the edge copies nothing.
    pub fn replace(&mut self, source: &PixelBuffer, x: usize, y: usize) {
        let rows = self.height.saturating_sub(y).min(source.height);
        let cols = self.width.saturating_sub(x).min(source.width);
        if cols == 0 {
            return;
        }
        for i in 0..rows {
            let dst = self.idx(y + i, x);
            let src = source.idx(i, 0);
            self.pixels[dst..dst + cols].copy_from_slice(&source.pixels[src..src + cols]);
        }
    }

    /// Apply `f` to every pixel, producing a new buffer of the same size.
    pub fn map(&self, f: impl Fn(Pixel) -> Pixel) -> PixelBuffer {
        PixelBuffer {
            width: self.width,
            height: self.height,
            pixels: self.pixels.iter().map(|&p| f(p)).collect(),
        }
    }

    /// Combine two equally sized buffers pixel by pixel.
    pub fn zip_map(
        &self,
        other: &PixelBuffer,
        f: impl Fn(Pixel, Pixel) -> Pixel,
    ) -> Result<PixelBuffer, RasterError> {
        self.ensure_same_size(other)?;
        Ok(PixelBuffer {
            width: self.width,
            height: self.height,
            pixels: self
                .pixels
                .iter()
                .zip(&other.pixels)
                .map(|(&a, &b)| f(a, b))
                .collect(),
        })
    }

    pub(crate) fn ensure_same_size(&self, other: &PixelBuffer) -> Result<(), RasterError> {
        if self.dimensions() != other.dimensions() {
            return Err(RasterError::DimensionMismatch {
                left: self.dimensions(),
                right: other.dimensions(),
            });
        }
        Ok(())
    }

    #[inline]
    pub(crate) fn idx(&self, row: usize, col: usize) -> usize {
        row * self.width + col
    }

    /// Unchecked-by-contract read; callers guarantee `(row, col)` is in range.
    #[inline]
    pub(crate) fn at(&self, row: usize, col: usize) -> Pixel {
        self.pixels[self.idx(row, col)]
    }

    #[inline]
    pub(crate) fn put(&mut self, row: usize, col: usize, pixel: Pixel) {
        let i = self.idx(row, col);
        self.pixels[i] = pixel;
    }

    #[inline]
    pub(crate) fn pixels_mut(&mut self) -> &mut [Pixel] {
        &mut self.pixels
    }

    fn check(&self, row: usize, col: usize) -> Result<(), RasterError> {
        if row >= self.height || col >= self.width {
            return Err(RasterError::OutOfBounds {
                row,
                col,
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }
}

/// `width * height`, or `DimensionOverflow` if it does not fit in `usize`.
pub(crate) fn pixel_count(width: usize, height: usize) -> Result<usize, RasterError> {
    width
        .checked_mul(height)
        .ok_or(RasterError::DimensionOverflow { width, height })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// Buffer whose pixel at (row, col) is (row, col, 0).
    fn coords(width: usize, height: usize) -> PixelBuffer {
        let mut img = PixelBuffer::new(width, height);
        for row in 0..height {
            for col in 0..width {
                img.set(row, col, Pixel::new(row as u8, col as u8, 0)).unwrap();
            }
        }
        img
    }

    #[test]
    fn test_new_is_black_and_sized() {
        let img = PixelBuffer::new(3, 2);
        assert_eq!(img.len(), 6);
        assert!(img.pixels().iter().all(|&p| p == Pixel::BLACK));
    }

    #[test]
    fn test_zero_dimension_is_empty() {
        assert!(PixelBuffer::new(0, 5).is_empty());
        assert!(PixelBuffer::new(5, 0).is_empty());
        assert_eq!(PixelBuffer::new(0, 5).rows().count(), 0);
    }

    #[test]
    fn test_get_set_row_col_and_index_agree() {
        let mut img = PixelBuffer::new(4, 3);
        img.set(2, 1, Pixel::new(1, 2, 3)).unwrap();
        assert_eq!(img.get_index(2 * 4 + 1).unwrap(), Pixel::new(1, 2, 3));

        img.set_index(5, Pixel::new(9, 9, 9)).unwrap();
        assert_eq!(img.get(1, 1).unwrap(), Pixel::new(9, 9, 9));
    }

    #[test]
    fn test_out_of_range_access_is_an_error() {
        let mut img = PixelBuffer::new(2, 2);
        assert_eq!(
            img.get(2, 0),
            Err(RasterError::OutOfBounds {
                row: 2,
                col: 0,
                width: 2,
                height: 2
            })
        );
        assert!(img.get(0, 2).is_err());
        assert_eq!(
            img.get_index(4),
            Err(RasterError::IndexOutOfBounds { index: 4, len: 4 })
        );
        assert!(img.set(5, 5, Pixel::WHITE).is_err());
        assert!(img.set_index(4, Pixel::WHITE).is_err());
        assert_eq!(img, PixelBuffer::new(2, 2));
    }

    #[test]
    fn test_fill_sets_every_pixel() {
        let mut img = coords(3, 3);
        img.fill(Pixel::new(7, 8, 9));
        assert!(img.pixels().iter().all(|&p| p == Pixel::new(7, 8, 9)));
    }

    #[test]
    fn test_clone_does_not_alias() {
        let original = PixelBuffer::new(2, 2);
        let mut copy = original.clone();
        copy.fill(Pixel::WHITE);
        assert_eq!(original.get(0, 0).unwrap(), Pixel::BLACK);
    }

    #[test]
    fn test_rgb_bytes_layout() {
        let img = PixelBuffer::from_pixels(2, 1, vec![Pixel::new(1, 2, 3), Pixel::new(4, 5, 6)])
            .unwrap();
        assert_eq!(img.to_rgb_bytes(), vec![1, 2, 3, 4, 5, 6]);

        let back = PixelBuffer::from_rgb_bytes(2, 1, &img.to_rgb_bytes()).unwrap();
        assert_eq!(back, img);
    }

    #[test]
    fn test_from_rgb_bytes_rejects_wrong_length() {
        assert_eq!(
            PixelBuffer::from_rgb_bytes(2, 2, &[0; 11]),
            Err(RasterError::BufferLength {
                expected: 12,
                actual: 11
            })
        );
    }

    #[test]
    fn test_overflowing_dimensions_are_rejected() {
        let huge = 1usize << (usize::BITS - 1);
        assert_eq!(
            PixelBuffer::from_rgb_bytes(huge, 2, &[]),
            Err(RasterError::DimensionOverflow {
                width: huge,
                height: 2
            })
        );
        // Pixel count fits, byte count does not
        assert_eq!(
            PixelBuffer::from_rgb_bytes(huge, 1, &[]),
            Err(RasterError::DimensionOverflow {
                width: huge,
                height: 1
            })
        );
        assert_eq!(
            PixelBuffer::from_pixels(huge, 2, vec![]),
            Err(RasterError::DimensionOverflow {
                width: huge,
                height: 2
            })
        );
        assert_eq!(
            PixelBuffer::try_filled(usize::MAX, 2, Pixel::WHITE),
            Err(RasterError::DimensionOverflow {
                width: usize::MAX,
                height: 2
            })
        );

        let mut img = PixelBuffer::new(1, 1);
        assert!(img.set_raw(huge, 2, &[]).is_err());
        assert_eq!(img, PixelBuffer::new(1, 1));
    }

    #[test]
    fn test_try_filled_matches_filled() {
        assert_eq!(
            PixelBuffer::try_filled(3, 2, Pixel::gray(5)),
            Ok(PixelBuffer::filled(3, 2, Pixel::gray(5)))
        );
    }

    #[test]
    #[should_panic]
    fn test_filled_panics_instead_of_wrapping() {
        let _ = PixelBuffer::filled(usize::MAX, 2, Pixel::BLACK);
    }

    #[test]
    fn test_set_raw_replaces_or_leaves_untouched() {
        let mut img = PixelBuffer::new(1, 1);
        img.set_raw(2, 1, &[1, 1, 1, 2, 2, 2]).unwrap();
        assert_eq!(img.dimensions(), (2, 1));
        assert_eq!(img.get(0, 1).unwrap(), Pixel::gray(2));

        assert!(img.set_raw(3, 3, &[0; 3]).is_err());
        assert_eq!(img.dimensions(), (2, 1));
    }

    #[test]
    fn test_replace_inside() {
        let mut dst = PixelBuffer::new(4, 4);
        let src = PixelBuffer::filled(2, 2, Pixel::WHITE);
        dst.replace(&src, 1, 2);

        for row in 0..4 {
            for col in 0..4 {
                let expected = if (2..4).contains(&row) && (1..3).contains(&col) {
                    Pixel::WHITE
                } else {
                    Pixel::BLACK
                };
                assert_eq!(dst.get(row, col).unwrap(), expected, "({row}, {col})");
            }
        }
    }

    #[test]
    fn test_replace_clips_overflow() {
        let mut dst = PixelBuffer::new(3, 3);
        let src = coords(4, 4);
        dst.replace(&src, 2, 1);

        // Only a 1-column x 2-row strip fits
        assert_eq!(dst.get(1, 2).unwrap(), Pixel::new(0, 0, 0));
        assert_eq!(dst.get(2, 2).unwrap(), Pixel::new(1, 0, 0));
        assert_eq!(dst.get(0, 2).unwrap(), Pixel::BLACK);
        assert_eq!(dst.get(2, 1).unwrap(), Pixel::BLACK);
    }

    #[test]
    fn test_replace_past_edge_is_noop() {
        let mut dst = PixelBuffer::new(2, 2);
        dst.replace(&PixelBuffer::filled(2, 2, Pixel::WHITE), 2, 0);
        dst.replace(&PixelBuffer::filled(2, 2, Pixel::WHITE), 0, 5);
        assert_eq!(dst, PixelBuffer::new(2, 2));
    }

    #[test]
    fn test_zip_map_checks_dimensions() {
        let a = PixelBuffer::new(2, 2);
        let b = PixelBuffer::new(2, 3);
        assert_eq!(
            a.zip_map(&b, |x, _| x),
            Err(RasterError::DimensionMismatch {
                left: (2, 2),
                right: (2, 3)
            })
        );
    }
}
