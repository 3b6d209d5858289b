//! Blur, edge and glow filters.

use super::{accumulate, map_positions, BOX, SOBEL_X, SOBEL_Y};
use crate::algebra::blend_pixel;
use crate::buffer::PixelBuffer;
use crate::pixel::Pixel;

/// Divisor behind the glow alpha: a fully white mask gives `765 / 1530 = 0.5`.
const GLOW_ALPHA_DIVISOR: f32 = 6.0 * 255.0;

/// `round(sum / count)` for non-negative sums, halves rounding up.
#[inline]
fn rounded_mean(sum: i32, count: usize) -> u8 {
    let n = count as i32;
    ((2 * sum + n) / (2 * n)).clamp(0, 255) as u8
}

#[inline]
fn magnitude(gx: i32, gy: i32) -> u8 {
    let m = ((gx * gx + gy * gy) as f64).sqrt().round();
    m.min(255.0) as u8
}

impl PixelBuffer {
    /// 3x3 box blur.
    ///
    /// Each output channel is the rounded mean of the in-bounds neighborhood:
    /// 9 pixels in the interior, 6 along an edge, 4 in a corner.
    pub fn blur(&self) -> PixelBuffer {
        map_positions(self, |src, row, col| {
            let acc = accumulate(src, &BOX, row, col);
            Pixel::new(
                rounded_mean(acc.sums[0], acc.count),
                rounded_mean(acc.sums[1], acc.count),
                rounded_mean(acc.sums[2], acc.count),
            )
        })
    }

    /// Per-channel gradient magnitude `round(sqrt(gx^2 + gy^2))`, capped at 255.
    ///
    /// Gradients use [`SOBEL_X`] and [`SOBEL_Y`] over the same in-bounds
    /// neighborhoods as [`blur`](Self::blur).
    pub fn sobel_edge(&self) -> PixelBuffer {
        map_positions(self, |src, row, col| {
            let gx = accumulate(src, &SOBEL_X, row, col).sums;
            let gy = accumulate(src, &SOBEL_Y, row, col).sums;
            Pixel::new(
                magnitude(gx[0], gy[0]),
                magnitude(gx[1], gy[1]),
                magnitude(gx[2], gy[2]),
            )
        })
    }

    /// Binary mask: white where every channel is `>= threshold`, else black.
    pub fn extract_white(&self, threshold: u8) -> PixelBuffer {
        self.map(|p| {
            if p.r >= threshold && p.g >= threshold && p.b >= threshold {
                Pixel::WHITE
            } else {
                Pixel::BLACK
            }
        })
    }

    /// Blend a blurred highlight mask back over the image.
    ///
    /// `mask = blur(extract_white(threshold))`, then every pixel is
    /// `alpha_blend(original, mask, alpha)` with
    /// `alpha = (mask.r + mask.g + mask.b) / (6 * 255)`. The divisor caps
    /// alpha at 0.5, so even a saturated highlight keeps half of the
    /// original pixel.
    pub fn glow(&self, threshold: u8) -> PixelBuffer {
        let mask = self.extract_white(threshold).blur();
        let mut result = self.clone();
        for (p, &m) in result.pixels_mut().iter_mut().zip(mask.pixels()) {
            let alpha = m.channel_sum() as f32 / GLOW_ALPHA_DIVISOR;
            *p = blend_pixel(*p, m, alpha);
        }
        result
    }
}
