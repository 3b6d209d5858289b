//! PNG codec for [`PixelBuffer`].
//!
//! Decoding accepts any PNG color type and bit depth and converts it to
//! 8-bit RGB; alpha is dropped, not composited. Encoding always writes 8-bit
//! RGB. The `flip` flag reverses row order on the way in or out, independent
//! of [`PixelBuffer::flip_horizontal`].

use std::io::Cursor;
use std::path::Path;

use rgb_pixmap::PixelBuffer;

use crate::error::CodecError;

/// Options for writing PNG files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EncodeOptions {
    /// Write rows bottom-up
    pub flip: bool,
    /// Re-compress the encoded file with oxipng
    pub optimize: bool,
}

impl EncodeOptions {
    pub fn flipped(flip: bool) -> Self {
        Self {
            flip,
            ..Default::default()
        }
    }
}

/// Decode the PNG at `path`.
pub fn decode(path: &Path, flip: bool) -> Result<PixelBuffer, CodecError> {
    let bytes = std::fs::read(path)?;
    let image = decode_bytes(&bytes, flip)?;
    tracing::debug!(
        path = %path.display(),
        width = image.width(),
        height = image.height(),
        "Decoded image"
    );
    Ok(image)
}

/// Encode `image` as a PNG file at `path`.
pub fn encode(path: &Path, image: &PixelBuffer, options: EncodeOptions) -> Result<(), CodecError> {
    let bytes = encode_bytes(image, options)?;
    std::fs::write(path, &bytes)?;
    tracing::debug!(path = %path.display(), bytes = bytes.len(), "Encoded image");
    Ok(())
}

/// Decode PNG data held in memory.
pub fn decode_bytes(data: &[u8], flip: bool) -> Result<PixelBuffer, CodecError> {
    let mut decoder = png::Decoder::new(Cursor::new(data));
    decoder.set_transformations(png::Transformations::normalize_to_color8());
    let mut reader = decoder
        .read_info()
        .map_err(|e| CodecError::Decode(e.to_string()))?;

    let mut buf = vec![0; reader.output_buffer_size()];
    let info = reader
        .next_frame(&mut buf)
        .map_err(|e| CodecError::Decode(e.to_string()))?;

    let width = info.width as usize;
    let height = info.height as usize;
    if width == 0 || height == 0 {
        return Err(CodecError::EmptyImage { width, height });
    }

    let data = &buf[..info.buffer_size()];
    let rgb = to_rgb(data, info.color_type)?;
    let image = PixelBuffer::from_rgb_bytes(width, height, &rgb)?;
    Ok(if flip { image.flip_horizontal() } else { image })
}

/// Encode `image` as an 8-bit RGB PNG in memory.
pub fn encode_bytes(image: &PixelBuffer, options: EncodeOptions) -> Result<Vec<u8>, CodecError> {
    let (width, height) = image.dimensions();
    if image.is_empty() {
        return Err(CodecError::EmptyImage { width, height });
    }
    let (w, h) = (dimension(width)?, dimension(height)?);

    let rgb = if options.flip {
        image.flip_horizontal().to_rgb_bytes()
    } else {
        image.to_rgb_bytes()
    };

    let mut buf = Cursor::new(Vec::new());
    {
        let mut encoder = png::Encoder::new(&mut buf, w, h);
        encoder.set_color(png::ColorType::Rgb);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder
            .write_header()
            .map_err(|e| CodecError::Encode(e.to_string()))?;
        writer
            .write_image_data(&rgb)
            .map_err(|e| CodecError::Encode(e.to_string()))?;
    }
    let png_bytes = buf.into_inner();

    if options.optimize {
        Ok(optimize(png_bytes))
    } else {
        Ok(png_bytes)
    }
}

/// Lossless re-compression. Falls back to the input if oxipng fails.
fn optimize(png_bytes: Vec<u8>) -> Vec<u8> {
    match oxipng::optimize_from_memory(
        &png_bytes,
        &oxipng::Options {
            strip: oxipng::StripChunks::Safe,
            optimize_alpha: false,
            ..Default::default()
        },
    ) {
        Ok(optimized) => {
            tracing::debug!(
                before = png_bytes.len(),
                after = optimized.len(),
                "Optimized PNG"
            );
            optimized
        }
        Err(e) => {
            tracing::warn!(%e, "PNG optimization failed, keeping unoptimized data");
            png_bytes
        }
    }
}

fn dimension(v: usize) -> Result<u32, CodecError> {
    u32::try_from(v).map_err(|_| CodecError::Encode(format!("dimension {v} exceeds PNG limits")))
}

/// Expand normalized 8-bit samples to packed RGB.
fn to_rgb(data: &[u8], color_type: png::ColorType) -> Result<Vec<u8>, CodecError> {
    let rgb = match color_type {
        png::ColorType::Rgb => data.to_vec(),
        png::ColorType::Rgba => data
            .chunks_exact(4)
            .flat_map(|px| [px[0], px[1], px[2]])
            .collect(),
        png::ColorType::Grayscale => data.iter().flat_map(|&v| [v, v, v]).collect(),
        png::ColorType::GrayscaleAlpha => data
            .chunks_exact(2)
            .flat_map(|px| [px[0], px[0], px[0]])
            .collect(),
        png::ColorType::Indexed => {
            return Err(CodecError::Decode(
                "indexed data was not expanded to RGB".to_string(),
            ))
        }
    };
    Ok(rgb)
}
