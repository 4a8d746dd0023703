//! The single image capability used by every stage: decode, crop, resize,
//! rotate, recolor and composite, backed by the `image` crate.

use std::path::Path;

use gray_dither::QuantizedGray;
use image::imageops::{self, FilterType};
use image::{DynamicImage, GenericImageView, ImageBuffer, ImageResult, Luma, Pixel};

use crate::models::{Color16, Rect, Size};

/// Random access to 16-bit colors, implemented by images and by uniform colors.
pub trait ColorSampler {
    fn color_at(&self, x: u32, y: u32) -> Color16;
}

impl ColorSampler for Color16 {
    fn color_at(&self, _x: u32, _y: u32) -> Color16 {
        *self
    }
}

/// An owned page image.
///
/// Every transform returns a new buffer; callers replace the old one so the
/// previous pixels are released right away. A buffer produced by palette
/// reduction remembers its palette and indices for indexed PNG output.
#[derive(Debug, Clone)]
pub struct PixelBuffer {
    image: DynamicImage,
    quantized: Option<QuantizedGray>,
}

impl PixelBuffer {
    pub fn new(image: DynamicImage) -> Self {
        Self {
            image,
            quantized: None,
        }
    }

    pub fn decode(bytes: &[u8]) -> ImageResult<Self> {
        Ok(Self::new(image::load_from_memory(bytes)?))
    }

    pub fn open(path: &Path) -> ImageResult<Self> {
        Ok(Self::new(image::open(path)?))
    }

    /// An opaque 8-bit RGB canvas filled with `color`.
    pub fn filled(size: Size, color: Color16) -> Self {
        let rgb = image::Rgb([
            (color.r >> 8) as u8,
            (color.g >> 8) as u8,
            (color.b >> 8) as u8,
        ]);
        Self::new(DynamicImage::ImageRgb8(ImageBuffer::from_pixel(
            size.width,
            size.height,
            rgb,
        )))
    }

    /// Rebuild a grayscale buffer from quantizer output.
    pub fn from_quantized(quantized: QuantizedGray) -> Option<Self> {
        let (width, height) = (quantized.width() as u32, quantized.height() as u32);
        let samples = quantized.to_samples();
        let image = if quantized.sample_bits() == 16 {
            DynamicImage::ImageLuma16(ImageBuffer::<Luma<u16>, _>::from_raw(
                width, height, samples,
            )?)
        } else {
            let bytes: Vec<u8> = samples.into_iter().map(|s| s.min(255) as u8).collect();
            DynamicImage::ImageLuma8(ImageBuffer::<Luma<u8>, _>::from_raw(width, height, bytes)?)
        };
        Some(Self {
            image,
            quantized: Some(quantized),
        })
    }

    pub fn size(&self) -> Size {
        Size::new(self.image.width(), self.image.height())
    }

    pub fn rect(&self) -> Rect {
        Rect::from_size(self.size())
    }

    pub fn image(&self) -> &DynamicImage {
        &self.image
    }

    pub fn quantized(&self) -> Option<&QuantizedGray> {
        self.quantized.as_ref()
    }

    /// Bits per channel of the source samples (8 or 16; float images count as 16).
    pub fn bits_per_channel(&self) -> u8 {
        let color = self.image.color();
        let channels = color.channel_count().max(1) as u16;
        match color.bits_per_pixel() / channels {
            0..=8 => 8,
            _ => 16,
        }
    }

    /// Copy out `rect`. `None` when the rect is empty or not inside the image.
    pub fn crop(&self, rect: Rect) -> Option<PixelBuffer> {
        if rect.is_empty() || !self.rect().contains(&rect) {
            return None;
        }
        Some(Self::new(self.image.crop_imm(
            rect.min_x() as u32,
            rect.min_y() as u32,
            rect.size.width,
            rect.size.height,
        )))
    }

    /// Lanczos resample to exactly `size`.
    pub fn resize(&self, size: Size) -> PixelBuffer {
        Self::new(
            self.image
                .resize_exact(size.width, size.height, FilterType::Lanczos3),
        )
    }

    /// Rotate 270 degrees clockwise (90 counter-clockwise).
    pub fn rotate270(&self) -> PixelBuffer {
        Self::new(self.image.rotate270())
    }

    /// Luminance conversion that keeps the source precision.
    pub fn to_gray(&self) -> PixelBuffer {
        match self.bits_per_channel() {
            8 => Self::new(DynamicImage::ImageLuma8(self.image.to_luma8())),
            _ => Self::new(DynamicImage::ImageLuma16(self.image.to_luma16())),
        }
    }

    /// Gray samples widened to `u16`, row-major. 8-bit images keep `0..=255`.
    pub fn gray_samples(&self) -> Vec<u16> {
        match &self.image {
            DynamicImage::ImageLuma8(gray) => gray.as_raw().iter().map(|&v| v as u16).collect(),
            DynamicImage::ImageLuma16(gray) => gray.as_raw().clone(),
            other if self.bits_per_channel() == 8 => {
                other.to_luma8().into_raw().into_iter().map(u16::from).collect()
            }
            other => other.to_luma16().into_raw(),
        }
    }

    /// Place `right` next to this image. The canvas is as tall as the taller
    /// image and uses this image's pixel format; uncovered pixels stay zero.
    pub fn append_horizontally(&self, right: &PixelBuffer) -> PixelBuffer {
        let other = &right.image;
        let merged = match &self.image {
            DynamicImage::ImageLuma8(left) => DynamicImage::ImageLuma8(append(left, &other.to_luma8())),
            DynamicImage::ImageLumaA8(left) => {
                DynamicImage::ImageLumaA8(append(left, &other.to_luma_alpha8()))
            }
            DynamicImage::ImageRgb8(left) => DynamicImage::ImageRgb8(append(left, &other.to_rgb8())),
            DynamicImage::ImageRgba8(left) => {
                DynamicImage::ImageRgba8(append(left, &other.to_rgba8()))
            }
            DynamicImage::ImageLuma16(left) => {
                DynamicImage::ImageLuma16(append(left, &other.to_luma16()))
            }
            DynamicImage::ImageLumaA16(left) => {
                DynamicImage::ImageLumaA16(append(left, &other.to_luma_alpha16()))
            }
            DynamicImage::ImageRgb16(left) => {
                DynamicImage::ImageRgb16(append(left, &other.to_rgb16()))
            }
            DynamicImage::ImageRgba16(left) => {
                DynamicImage::ImageRgba16(append(left, &other.to_rgba16()))
            }
            left => DynamicImage::ImageRgba8(append(&left.to_rgba8(), &other.to_rgba8())),
        };
        Self::new(merged)
    }
}

fn append<P: Pixel>(
    left: &ImageBuffer<P, Vec<P::Subpixel>>,
    right: &ImageBuffer<P, Vec<P::Subpixel>>,
) -> ImageBuffer<P, Vec<P::Subpixel>> {
    let mut canvas = ImageBuffer::new(
        left.width() + right.width(),
        left.height().max(right.height()),
    );
    imageops::replace(&mut canvas, left, 0, 0);
    imageops::replace(&mut canvas, right, left.width() as i64, 0);
    canvas
}

impl ColorSampler for PixelBuffer {
    fn color_at(&self, x: u32, y: u32) -> Color16 {
        match &self.image {
            DynamicImage::ImageLuma16(img) => Color16::gray(img.get_pixel(x, y)[0]),
            DynamicImage::ImageLumaA16(img) => {
                let [v, a] = img.get_pixel(x, y).0;
                Color16::new(v, v, v, a)
            }
            DynamicImage::ImageRgb16(img) => {
                let [r, g, b] = img.get_pixel(x, y).0;
                Color16::opaque(r, g, b)
            }
            DynamicImage::ImageRgba16(img) => {
                let [r, g, b, a] = img.get_pixel(x, y).0;
                Color16::new(r, g, b, a)
            }
            other => Color16::from_rgba8(other.get_pixel(x, y).0),
        }
    }
}
