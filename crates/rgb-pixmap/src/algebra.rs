//! Per-pixel arithmetic.
//!
//! Binary operations combine two equally sized buffers channel by channel;
//! a size mismatch is a [`RasterError::DimensionMismatch`]. Every result is
//! saturated into `0..=255` and, where floating point is involved, rounded to
//! the nearest integer (halves away from zero).

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::buffer::PixelBuffer;
use crate::error::RasterError;
use crate::pixel::Pixel;

/// Grayscale luma weights for R, G and B.
const LUMA: [f64; 3] = [0.3, 0.59, 0.11];

/// Color channel selector for [`PixelBuffer::extract_channel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Red,
    Green,
    Blue,
}

impl Channel {
    /// Map the one-based channel number (1 = red, 2 = green, 3 = blue).
    pub fn from_number(n: u32) -> Option<Self> {
        match n {
            1 => Some(Channel::Red),
            2 => Some(Channel::Green),
            3 => Some(Channel::Blue),
            _ => None,
        }
    }

    fn isolate(self, p: Pixel) -> Pixel {
        match self {
            Channel::Red => Pixel::new(p.r, 0, 0),
            Channel::Green => Pixel::new(0, p.g, 0),
            Channel::Blue => Pixel::new(0, 0, p.b),
        }
    }
}

#[inline]
fn round_to_u8(v: f32) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

/// `round(over * alpha + under * (1 - alpha))`, saturated.
#[inline]
pub(crate) fn blend_channel(under: u8, over: u8, alpha: f32) -> u8 {
    round_to_u8(over as f32 * alpha + under as f32 * (1.0 - alpha))
}

#[inline]
pub(crate) fn blend_pixel(under: Pixel, over: Pixel, alpha: f32) -> Pixel {
    under.zip_map(over, |u, o| blend_channel(u, o, alpha))
}

impl PixelBuffer {
    /// `clamp(a + b, 0, 255)` per channel.
    pub fn add(&self, other: &PixelBuffer) -> Result<PixelBuffer, RasterError> {
        self.zip_map(other, |a, b| a.zip_map(b, u8::saturating_add))
    }

    /// `clamp(a - b, 0, 255)` per channel.
    pub fn subtract(&self, other: &PixelBuffer) -> Result<PixelBuffer, RasterError> {
        self.zip_map(other, |a, b| a.zip_map(b, u8::saturating_sub))
    }

    /// `clamp(a * b, 0, 255)` per channel.
    ///
    /// The product is *not* normalized by 255: any pair whose product
    /// exceeds 255 saturates.
    pub fn multiply(&self, other: &PixelBuffer) -> Result<PixelBuffer, RasterError> {
        self.zip_map(other, |a, b| a.zip_map(b, u8::saturating_mul))
    }

    /// `|a - b|` per channel.
    pub fn difference(&self, other: &PixelBuffer) -> Result<PixelBuffer, RasterError> {
        self.zip_map(other, |a, b| a.zip_map(b, u8::abs_diff))
    }

    /// `max(a, b)` per channel.
    pub fn lightest(&self, other: &PixelBuffer) -> Result<PixelBuffer, RasterError> {
        self.zip_map(other, |a, b| a.zip_map(b, u8::max))
    }

    /// `min(a, b)` per channel.
    pub fn darkest(&self, other: &PixelBuffer) -> Result<PixelBuffer, RasterError> {
        self.zip_map(other, |a, b| a.zip_map(b, u8::min))
    }

    /// `255 - a` per channel.
    pub fn invert(&self) -> PixelBuffer {
        self.map(|p| p.map(|c| 255 - c))
    }

    /// Weighted luma `round(0.3 R + 0.59 G + 0.11 B)` copied into all three
    /// channels.
    pub fn grayscale(&self) -> PixelBuffer {
        self.map(|p| {
            let luma = p.r as f64 * LUMA[0] + p.g as f64 * LUMA[1] + p.b as f64 * LUMA[2];
            Pixel::gray(luma.round().clamp(0.0, 255.0) as u8)
        })
    }

    /// `round(255 * (a / 255) ^ (1 / gamma))` per channel.
    pub fn gamma_correct(&self, gamma: f32) -> Result<PixelBuffer, RasterError> {
        if !gamma.is_finite() || gamma <= 0.0 {
            return Err(RasterError::InvalidGamma(gamma));
        }
        let exponent = 1.0 / gamma;
        let lut: Vec<u8> = (0..=255u16)
            .map(|v| round_to_u8((v as f32 / 255.0).powf(exponent) * 255.0))
            .collect();
        Ok(self.map(|p| p.map(|c| lut[c as usize])))
    }

    /// `round(other * alpha + self * (1 - alpha))` per channel.
    ///
    /// `self` is the background and `other` the foreground.
    pub fn alpha_blend(&self, other: &PixelBuffer, alpha: f32) -> Result<PixelBuffer, RasterError> {
        self.zip_map(other, |under, over| blend_pixel(under, over, alpha))
    }

    /// Rotate channels: red takes green, green takes blue, blue takes red.
    ///
    /// Applying it three times is the identity.
    pub fn swirl(&self) -> PixelBuffer {
        self.map(|p| Pixel::new(p.g, p.b, p.r))
    }

    /// Keep channel `n` (1 = red, 2 = green, 3 = blue) and zero the others.
    ///
    /// An unknown channel number is not an error: it is logged and an
    /// unchanged copy is returned.
    pub fn extract_channel(&self, n: u32) -> PixelBuffer {
        match Channel::from_number(n) {
            Some(channel) => self.map(|p| channel.isolate(p)),
            None => {
                tracing::warn!(channel = n, "Invalid channel number, expected 1-3; image left unchanged");
                self.clone()
            }
        }
    }

    /// Offset every channel by an independent uniform integer in
    /// `[-size, size]`, saturating at `0` and `255`.
    ///
    /// Noise is drawn from a [`StdRng`] seeded with `seed`, in row-major order
    /// and R, G, B order within a pixel, so a given `(image, size, seed)`
    /// always produces the same output. `size == 0` returns a copy.
    pub fn color_jitter(&self, size: u8, seed: u64) -> PixelBuffer {
        if size == 0 {
            return self.clone();
        }
        let mut rng = StdRng::seed_from_u64(seed);
        let span = size as i16;
        let mut jitter = |c: u8| -> u8 {
            let offset: i16 = rng.gen_range(-span..=span);
            (c as i16 + offset).clamp(0, 255) as u8
        };
        let mut result = self.clone();
        for p in result.pixels_mut() {
            p.r = jitter(p.r);
            p.g = jitter(p.g);
            p.b = jitter(p.b);
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

    fn uniform(w: usize, h: usize, p: Pixel) -> PixelBuffer {
        PixelBuffer::filled(w, h, p)
    }

    #[test]
    fn test_add_saturates() {
        let a = uniform(2, 2, Pixel::gray(10));
        let b = uniform(2, 2, Pixel::gray(250));
        assert_eq!(a.add(&b).unwrap(), uniform(2, 2, Pixel::WHITE));

        let c = uniform(1, 1, Pixel::new(100, 0, 5));
        let d = uniform(1, 1, Pixel::new(20, 1, 5));
        assert_eq!(c.add(&d).unwrap().get(0, 0).unwrap(), Pixel::new(120, 1, 10));
    }

    #[test]
    fn test_subtract_clamps_at_zero() {
        let a = uniform(2, 2, Pixel::gray(10));
        let b = uniform(2, 2, Pixel::gray(20));
        assert_eq!(a.subtract(&b).unwrap(), uniform(2, 2, Pixel::BLACK));
        assert_eq!(b.subtract(&a).unwrap(), uniform(2, 2, Pixel::gray(10)));
    }

    #[test]
    fn test_multiply_is_not_normalized() {
        let a = uniform(1, 1, Pixel::new(2, 16, 128));
        let b = uniform(1, 1, Pixel::new(3, 16, 2));
        // 2*3 = 6, 16*16 = 256 -> 255, 128*2 = 256 -> 255
        assert_eq!(
            a.multiply(&b).unwrap().get(0, 0).unwrap(),
            Pixel::new(6, 255, 255)
        );
    }

    #[test]
    fn test_difference_lightest_darkest() {
        let a = uniform(1, 1, Pixel::new(10, 200, 50));
        let b = uniform(1, 1, Pixel::new(30, 100, 50));
        assert_eq!(
            a.difference(&b).unwrap().get(0, 0).unwrap(),
            Pixel::new(20, 100, 0)
        );
        assert_eq!(
            a.lightest(&b).unwrap().get(0, 0).unwrap(),
            Pixel::new(30, 200, 50)
        );
        assert_eq!(
            a.darkest(&b).unwrap().get(0, 0).unwrap(),
            Pixel::new(10, 100, 50)
        );
    }

    #[test]
    fn test_binary_ops_reject_mismatched_sizes() {
        let a = PixelBuffer::new(2, 2);
        let b = PixelBuffer::new(3, 2);
        let expected = Err(RasterError::DimensionMismatch {
            left: (2, 2),
            right: (3, 2),
        });
        assert_eq!(a.add(&b), expected);
        assert_eq!(a.subtract(&b), expected);
        assert_eq!(a.multiply(&b), expected);
        assert_eq!(a.difference(&b), expected);
        assert_eq!(a.lightest(&b), expected);
        assert_eq!(a.darkest(&b), expected);
        assert_eq!(a.alpha_blend(&b, 0.5), expected);
    }

    #[test]
    fn test_invert_single_pixel() {
        let img = uniform(1, 1, Pixel::new(200, 50, 10));
        assert_eq!(img.invert().get(0, 0).unwrap(), Pixel::new(55, 205, 245));
    }

    #[test]
    fn test_grayscale_pure_red_rounds_half_up() {
        let img = uniform(2, 2, Pixel::new(255, 0, 0));
        assert_eq!(img.grayscale(), uniform(2, 2, Pixel::gray(77)));
    }

    #[test]
    fn test_grayscale_weights() {
        let img = uniform(1, 1, Pixel::new(100, 200, 50));
        // 30 + 118 + 5.5 = 153.5 -> 154
        assert_eq!(img.grayscale().get(0, 0).unwrap(), Pixel::gray(154));
    }

    #[test]
    fn test_gamma_identity_and_brightening() {
        let img = uniform(1, 1, Pixel::new(0, 64, 255));
        assert_eq!(img.gamma_correct(1.0).unwrap(), img);

        let brighter = img.gamma_correct(2.0).unwrap().get(0, 0).unwrap();
        // sqrt(64/255) * 255 = 127.75 -> 128
        assert_eq!(brighter, Pixel::new(0, 128, 255));
    }

    #[test]
    fn test_gamma_rejects_non_positive() {
        let img = uniform(1, 1, Pixel::BLACK);
        assert_eq!(img.gamma_correct(0.0), Err(RasterError::InvalidGamma(0.0)));
        assert!(img.gamma_correct(-1.0).is_err());
        assert!(img.gamma_correct(f32::NAN).is_err());
    }

    #[test]
    fn test_alpha_blend() {
        let under = uniform(1, 1, Pixel::new(0, 100, 255));
        let over = uniform(1, 1, Pixel::new(255, 200, 0));
        assert_eq!(under.alpha_blend(&over, 0.0).unwrap(), under);
        assert_eq!(under.alpha_blend(&over, 1.0).unwrap(), over);
        // 255*0.35 = 89.25 -> 89; 200*0.35 + 100*0.65 = 135; 255*0.65 = 165.75 -> 166
        assert_eq!(
            under.alpha_blend(&over, 0.35).unwrap().get(0, 0).unwrap(),
            Pixel::new(89, 135, 166)
        );
    }

    #[test]
    fn test_swirl_cycles_channels() {
        let img = uniform(1, 1, Pixel::new(1, 2, 3));
        assert_eq!(img.swirl().get(0, 0).unwrap(), Pixel::new(2, 3, 1));
        assert_eq!(img.swirl().swirl().swirl(), img);
    }

    #[test]
    fn test_extract_channel() {
        let img = uniform(1, 1, Pixel::new(10, 20, 30));
        assert_eq!(
            img.extract_channel(1).get(0, 0).unwrap(),
            Pixel::new(10, 0, 0)
        );
        assert_eq!(
            img.extract_channel(2).get(0, 0).unwrap(),
            Pixel::new(0, 20, 0)
        );
        assert_eq!(
            img.extract_channel(3).get(0, 0).unwrap(),
            Pixel::new(0, 0, 30)
        );
    }

    /// Counts WARN events seen while installed.
    struct WarnCounter(Arc<AtomicUsize>);

    impl<S: tracing::Subscriber> Layer<S> for WarnCounter {
        fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
            if *event.metadata().level() == tracing::Level::WARN {
                self.0.fetch_add(1, Ordering::SeqCst);
            }
        }
    }

    fn count_warnings<T>(f: impl FnOnce() -> T) -> (T, usize) {
        let count = Arc::new(AtomicUsize::new(0));
        let subscriber = tracing_subscriber::registry().with(WarnCounter(count.clone()));
        let result = tracing::subscriber::with_default(subscriber, f);
        (result, count.load(Ordering::SeqCst))
    }

    #[test]
    fn test_extract_channel_invalid_is_noop() {
        let img = uniform(2, 1, Pixel::new(10, 20, 30));
        assert_eq!(img.extract_channel(0), img);
        assert_eq!(img.extract_channel(4), img);
    }

    #[test]
    fn test_extract_channel_invalid_logs_warning() {
        let img = uniform(2, 1, Pixel::new(10, 20, 30));

        let (result, warnings) = count_warnings(|| img.extract_channel(7));
        assert_eq!(result, img);
        assert_eq!(warnings, 1);

        let (_, warnings) = count_warnings(|| img.extract_channel(2));
        assert_eq!(warnings, 0);
    }

    #[test]
    fn test_color_jitter_bounds_and_determinism() {
        let img = uniform(8, 8, Pixel::gray(128));
        let a = img.color_jitter(5, 42);
        let b = img.color_jitter(5, 42);
        assert_eq!(a, b);
        for p in a.pixels() {
            for c in p.to_bytes() {
                assert!((123..=133).contains(&c), "channel {c} outside +/-5");
            }
        }
        assert_ne!(a, img, "64 pixels of jitter should move at least one");
    }

    #[test]
    fn test_color_jitter_saturates_and_zero_is_copy() {
        let img = uniform(4, 4, Pixel::new(0, 255, 2));
        assert_eq!(img.color_jitter(0, 7), img);
        let jittered = img.color_jitter(255, 7);
        assert_eq!(jittered.dimensions(), (4, 4));

        // Replay the same offsets to check each channel against its clamped sum
        let mut rng = StdRng::seed_from_u64(7);
        for (before, after) in img.pixels().iter().zip(jittered.pixels()) {
            for (c, out) in before.to_bytes().into_iter().zip(after.to_bytes()) {
                let offset: i16 = rng.gen_range(-255..=255);
                let expected = (c as i16 + offset).clamp(0, 255) as u8;
                assert_eq!(out, expected, "channel {c} with offset {offset}");
                if c == 0 && offset < 0 {
                    assert_eq!(out, 0, "0 must not wrap upward");
                }
                if c == 255 && offset > 0 {
                    assert_eq!(out, 255, "255 must not wrap downward");
                }
            }
        }
    }

    #[test]
    fn test_color_jitter_extremes_stay_pinned_on_one_side() {
        let black = uniform(16, 16, Pixel::BLACK).color_jitter(200, 3);
        let white = uniform(16, 16, Pixel::WHITE).color_jitter(200, 3);
        // Every offset in [-200, 200] leaves black in [0, 200] and white in [55, 255]
        for p in black.pixels() {
            assert!(p.to_bytes().iter().all(|&c| c <= 200), "{p:?}");
        }
        for p in white.pixels() {
            assert!(p.to_bytes().iter().all(|&c| c >= 55), "{p:?}");
        }
        // With 768 draws some offsets are negative and must clamp to 0
        assert!(black.pixels().iter().any(|p| p.to_bytes().contains(&0)));
        assert!(white.pixels().iter().any(|p| p.to_bytes().contains(&255)));
    }
}
