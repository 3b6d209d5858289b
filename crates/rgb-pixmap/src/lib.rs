//! rgb-pixmap: an owned 8-bit RGB raster and the transforms built on it
//!
//! The crate has no I/O. Images come in and go out as flat
//! `[R, G, B, R, G, B, ...]` bytes; decoding and encoding files is left to
//! the caller.
//!
//! # Quick Start
//!
//! ```
//! use rgb_pixmap::{Pixel, PixelBuffer};
//!
//! let mut image = PixelBuffer::filled(3, 3, Pixel::new(100, 100, 100));
//! image.set(1, 1, Pixel::WHITE).unwrap();
//!
//! let soft = image.blur();
//! let edges = image.grayscale().sobel_edge().invert();
//!
//! assert_eq!(soft.dimensions(), (3, 3));
//! assert_eq!(edges.dimensions(), (3, 3));
//! ```
//!
//! # Operations
//!
//! Every transform borrows its inputs and returns a new [`PixelBuffer`]:
//!
//! - **Geometry** ([`geometry`]): resize, flips, 90 degree rotation, cropping.
//!   Output pixels are copies of source pixels.
//! - **Pixel algebra** ([`algebra`]): saturating add/subtract/multiply,
//!   difference, lightest/darkest, invert, grayscale, gamma, alpha blending,
//!   channel swirl and extraction, seeded color jitter.
//! - **Convolution** ([`convolve`]): blur, Sobel edges, threshold glow and
//!   block mosaics, all sharing one boundary-aware 3x3 neighborhood engine.
//!
//! Binary operations reject operands of different sizes with
//! [`RasterError::DimensionMismatch`]; nothing in the crate panics on user
//! input.
//!
//! # Boundary handling
//!
//! Border pixels use only the neighbors that exist. A corner pixel averages
//! 4 values, an edge pixel 6 and an interior pixel 9. See
//! [`convolve::Neighborhood`] for the offset sets.

pub mod algebra;
pub mod buffer;
pub mod convolve;
pub mod error;
pub mod geometry;
pub mod pixel;


pub use algebra::Channel;
pub use buffer::PixelBuffer;
pub use convolve::{Kernel3, Neighborhood, PositionClass};
pub use error::RasterError;
pub use pixel::{ParsePixelError, Pixel};
