//! Error type shared by every raster operation.

use thiserror::Error;

/// Errors returned by [`PixelBuffer`](crate::PixelBuffer) accessors and
/// transforms.
///
/// Every variant describes a contract violation by the caller. None of them
/// leave a buffer partially modified.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RasterError {
    /// `(row, col)` lies outside `[0, height) x [0, width)`
    #[error("pixel ({row}, {col}) out of bounds for {width}x{height} buffer")]
    OutOfBounds {
        row: usize,
        col: usize,
        width: usize,
        height: usize,
    },

    /// Linear index lies outside `[0, width * height)`
    #[error("pixel index {index} out of bounds for buffer of {len} pixels")]
    IndexOutOfBounds { index: usize, len: usize },

    /// A requested rectangle does not fit inside the source buffer
    #[error(
        "region {width}x{height} at ({x}, {y}) exceeds {source_width}x{source_height} buffer"
    )]
    RegionOutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
        source_width: usize,
        source_height: usize,
    },

    /// Binary operations need operands of identical size
    #[error("dimension mismatch: {}x{} vs {}x{}", left.0, left.1, right.0, right.1)]
    DimensionMismatch {
        left: (usize, usize),
        right: (usize, usize),
    },

    /// Raw data does not match `width * height` pixels
    #[error("buffer length mismatch: expected {expected}, got {actual}")]
    BufferLength { expected: usize, actual: usize },

    /// `width * height` (or its byte length) does not fit in `usize`
    #[error("dimensions {width}x{height} overflow the addressable size")]
    DimensionOverflow { width: usize, height: usize },

    /// Block-based filters need a block edge of at least one pixel
    #[error("block size must be at least 1")]
    InvalidBlockSize,

    /// Gamma must be finite and strictly positive
    #[error("invalid gamma {0}: must be finite and > 0")]
    InvalidGamma(f32),

    /// Sampling from a buffer with no pixels
    #[error("cannot sample from an empty buffer")]
    EmptySource,
}
