//! GrayDitherer builder -- the entry point for reducing a grayscale image
//! to a small palette.

use crate::dither::{dither_with_kernel, DitherOptions, FLOYD_STEINBERG};
use crate::error::QuantizeError;
use crate::median_cut::MedianCut;
use crate::output::QuantizedGray;

/// Median-cut quantization followed by Floyd-Steinberg error diffusion.
///
/// `quantize()` takes `&self`, so one ditherer can be reused across pages.
///
/// # Example
///
/// ```
/// use gray_dither::GrayDitherer;
///
/// let ditherer = GrayDitherer::new(4).unwrap();
/// let samples: Vec<u16> = (0..64).map(|i| i * 4).collect();
/// let result = ditherer.quantize(&samples, 8, 8).unwrap();
///
/// assert!(result.palette().len() <= 4);
/// assert_eq!(result.indices().len(), 64);
/// ```
#[derive(Debug, Clone)]
pub struct GrayDitherer {
    quantizer: MedianCut,
    sample_bits: u8,
    options: DitherOptions,
}

impl GrayDitherer {
    /// Create a ditherer producing at most `levels` gray levels from 8-bit samples.
    pub fn new(levels: usize) -> Result<Self, QuantizeError> {
        Ok(Self {
            quantizer: MedianCut::new(levels)?,
            sample_bits: 8,
            options: DitherOptions::new(),
        })
    }

    /// Create a ditherer for `2^bits` levels.
    pub fn with_depth(bits: u8) -> Result<Self, QuantizeError> {
        if bits == 0 || bits > 8 {
            return Err(QuantizeError::UnsupportedLevelCount {
                levels: 1usize << bits.min(16),
            });
        }
        Self::new(1usize << bits)
    }

    /// Declare the bit depth of the input samples (8 or 16).
    #[inline]
    pub fn sample_bits(mut self, bits: u8) -> Self {
        self.sample_bits = bits;
        self
    }

    /// Set serpentine scanning mode.
    #[inline]
    pub fn serpentine(mut self, enabled: bool) -> Self {
        self.options = self.options.serpentine(enabled);
        self
    }

    #[inline]
    pub fn max_levels(&self) -> usize {
        self.quantizer.max_levels()
    }

    /// Quantize row-major grayscale `samples` of a `width x height` image.
    pub fn quantize(
        &self,
        samples: &[u16],
        width: usize,
        height: usize,
    ) -> Result<QuantizedGray, QuantizeError> {
        let max_value = match self.sample_bits {
            8 => u8::MAX as f32,
            16 => u16::MAX as f32,
            bits => return Err(QuantizeError::UnsupportedSampleDepth { bits }),
        };
        if samples.len() != width * height {
            return Err(QuantizeError::DimensionMismatch {
                samples: samples.len(),
                width,
                height,
            });
        }
        if samples.is_empty() {
            return Err(QuantizeError::EmptyImage);
        }

        let palette = self.quantizer.palette(samples)?;
        let indices = dither_with_kernel(
            samples,
            width,
            height,
            max_value,
            &palette,
            &FLOYD_STEINBERG,
            &self.options,
        );

        Ok(QuantizedGray::new(indices, width, height, palette, self.sample_bits))
    }
}
