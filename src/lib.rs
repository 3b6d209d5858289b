//! Pixmap Art - RGB raster transforms
//!
//! PNG codec, YAML pipelines and the command-line driver built on the
//! `rgb-pixmap` core crate. This library exposes modules for integration
//! testing.

pub mod codec;
pub mod error;
pub mod models;
pub mod services;

pub use rgb_pixmap;
