//! PNG output for finished pages.

use std::borrow::Cow;
use std::io::Cursor;

use image::DynamicImage;

use crate::error::PipelineError;
use crate::rendering::PixelBuffer;

pub const PNG_MEDIA_TYPE: &str = "image/png";

/// Encodes pages as PNG. Palette-reduced pages become indexed PNGs at the
/// smallest bit depth that holds their palette.
#[derive(Debug, Clone, Copy, Default)]
pub struct PngEncoder {
    optimize: bool,
}

impl PngEncoder {
    pub fn new(optimize: bool) -> Self {
        Self { optimize }
    }

    pub fn encode(&self, buffer: &PixelBuffer) -> Result<Vec<u8>, PipelineError> {
        let size = buffer.size();
        let (color_type, bit_depth, plte, data) = match buffer.quantized() {
            Some(quantized) => {
                let (depth, bits) = match quantized.palette().len() {
                    0..=2 => (png::BitDepth::One, 1),
                    3..=4 => (png::BitDepth::Two, 2),
                    5..=16 => (png::BitDepth::Four, 4),
                    _ => (png::BitDepth::Eight, 8),
                };
                let plte: Vec<u8> = quantized
                    .palette_u8()
                    .into_iter()
                    .flat_map(|v| [v, v, v])
                    .collect();
                let data = if bits == 8 {
                    Cow::Borrowed(quantized.indices())
                } else {
                    Cow::Owned(pack_nbits(quantized.indices(), size.width, bits))
                };
                (png::ColorType::Indexed, depth, Some(plte), data)
            }
            None => {
                let (color_type, bit_depth, data) = raw_samples(buffer.image());
                (color_type, bit_depth, None, data)
            }
        };

        let compression = if self.optimize {
            png::Compression::Fast
        } else {
            png::Compression::Default
        };
        let png_bytes = encode_png(
            size.width,
            size.height,
            color_type,
            bit_depth,
            plte.as_deref(),
            &data,
            compression,
        )?;

        if !self.optimize {
            return Ok(png_bytes);
        }
        match oxipng::optimize_from_memory(
            &png_bytes,
            &oxipng::Options {
                strip: oxipng::StripChunks::Safe,
                optimize_alpha: false,
                ..Default::default()
            },
        ) {
            Ok(optimized) => Ok(optimized),
            Err(e) => {
                tracing::warn!(%e, "PNG optimization failed, keeping unoptimized output");
                Ok(png_bytes)
            }
        }
    }
}

/// Row data for an unquantized image. 16-bit samples are written big-endian.
fn raw_samples(image: &DynamicImage) -> (png::ColorType, png::BitDepth, Cow<'_, [u8]>) {
    use png::{BitDepth, ColorType};

    match image {
        DynamicImage::ImageLuma8(img) => (ColorType::Grayscale, BitDepth::Eight, Cow::Borrowed(img.as_raw())),
        DynamicImage::ImageLumaA8(img) => {
            (ColorType::GrayscaleAlpha, BitDepth::Eight, Cow::Borrowed(img.as_raw()))
        }
        DynamicImage::ImageRgb8(img) => (ColorType::Rgb, BitDepth::Eight, Cow::Borrowed(img.as_raw())),
        DynamicImage::ImageRgba8(img) => (ColorType::Rgba, BitDepth::Eight, Cow::Borrowed(img.as_raw())),
        DynamicImage::ImageLuma16(img) => (ColorType::Grayscale, BitDepth::Sixteen, big_endian(img.as_raw())),
        DynamicImage::ImageLumaA16(img) => {
            (ColorType::GrayscaleAlpha, BitDepth::Sixteen, big_endian(img.as_raw()))
        }
        DynamicImage::ImageRgb16(img) => (ColorType::Rgb, BitDepth::Sixteen, big_endian(img.as_raw())),
        DynamicImage::ImageRgba16(img) => (ColorType::Rgba, BitDepth::Sixteen, big_endian(img.as_raw())),
        other => (
            ColorType::Rgba,
            BitDepth::Sixteen,
            big_endian(other.to_rgba16().as_raw()),
        ),
    }
}

fn big_endian(samples: &[u16]) -> Cow<'static, [u8]> {
    Cow::Owned(samples.iter().flat_map(|s| s.to_be_bytes()).collect())
}

/// Encode packed pixel data as a PNG.
fn encode_png(
    width: u32,
    height: u32,
    color_type: png::ColorType,
    bit_depth: png::BitDepth,
    plte: Option<&[u8]>,
    packed: &[u8],
    compression: png::Compression,
) -> Result<Vec<u8>, PipelineError> {
    let mut buf = Cursor::new(Vec::new());
    {
        let mut encoder = png::Encoder::new(&mut buf, width, height);
        encoder.set_color(color_type);
        encoder.set_depth(bit_depth);
        encoder.set_compression(compression);
        if let Some(plte) = plte {
            encoder.set_palette(plte);
        }
        let mut writer = encoder
            .write_header()
            .map_err(|e| PipelineError::Encode(e.to_string()))?;
        writer
            .write_image_data(packed)
            .map_err(|e| PipelineError::Encode(e.to_string()))?;
    }
    Ok(buf.into_inner())
}

/// Pack palette indices into N-bit PNG row data (1, 2, or 4 bits per pixel).
fn pack_nbits(indices: &[u8], width: u32, bits: u8) -> Vec<u8> {
    let pixels_per_byte = 8 / bits as usize;
    let bytes_per_row = (width as usize).div_ceil(pixels_per_byte);
    let height = indices.len() / (width as usize).max(1);
    let mask = (1u8 << bits) - 1;
    let mut packed = Vec::with_capacity(bytes_per_row * height);

    for row in indices.chunks(width as usize) {
        let mut byte = 0u8;
        for (i, &idx) in row.iter().enumerate() {
            let shift = (8 - bits) - (i % pixels_per_byte) as u8 * bits;
            byte |= (idx & mask) << shift;

            if (i % pixels_per_byte) == pixels_per_byte - 1 || i == row.len() - 1 {
                packed.push(byte);
                byte = 0;
            }
        }
    }

    packed
}
