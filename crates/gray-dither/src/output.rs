//! QuantizedGray -- palette indices plus the palette they index.

use crate::palette::GrayPalette;

/// The output of [`GrayDitherer::quantize`](crate::GrayDitherer::quantize).
///
/// Indices are canonical; `to_samples()` expands them back into gray levels
/// in the input sample range.
#[derive(Debug, Clone)]
pub struct QuantizedGray {
    indices: Vec<u8>,
    width: usize,
    height: usize,
    palette: GrayPalette,
    sample_bits: u8,
}

impl QuantizedGray {
    pub fn new(
        indices: Vec<u8>,
        width: usize,
        height: usize,
        palette: GrayPalette,
        sample_bits: u8,
    ) -> Self {
        debug_assert_eq!(indices.len(), width * height);
        Self {
            indices,
            width,
            height,
            palette,
            sample_bits,
        }
    }

    #[inline]
    pub fn indices(&self) -> &[u8] {
        &self.indices
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn palette(&self) -> &GrayPalette {
        &self.palette
    }

    /// Bit depth of the samples the palette levels are expressed in.
    #[inline]
    pub fn sample_bits(&self) -> u8 {
        self.sample_bits
    }

    /// Gray level of every pixel, row-major.
    pub fn to_samples(&self) -> Vec<u16> {
        self.indices
            .iter()
            .map(|&i| self.palette.level(i as usize))
            .collect()
    }

    /// Palette levels scaled to 8 bits, e.g. for a PNG `PLTE` chunk.
    pub fn palette_u8(&self) -> Vec<u8> {
        self.palette
            .levels()
            .iter()
            .map(|&l| match self.sample_bits {
                16 => ((l as u32 + 128) / 257) as u8,
                _ => l.min(255) as u8,
            })
            .collect()
    }
}
