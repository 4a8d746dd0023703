use gray_dither::GrayDitherer;

use crate::error::PipelineError;
use crate::models::{GrayscaleConfig, Page};
use crate::rendering::PixelBuffer;

/// Converts selected pages to grayscale, reducing the bit depth with median-cut
/// quantization and Floyd-Steinberg dithering when the target depth is lower
/// than the source's.
#[derive(Debug, Clone)]
pub struct GrayscaleQuantizer<'a> {
    config: &'a GrayscaleConfig,
}

impl<'a> GrayscaleQuantizer<'a> {
    pub fn new(config: &'a GrayscaleConfig) -> Self {
        Self { config }
    }

    pub fn apply(&self, page: Page) -> Result<Page, PipelineError> {
        let Some(pages) = &self.config.pages else {
            return Ok(page);
        };
        if !page.is_in(pages) {
            tracing::debug!("Page is not selected for grayscale");
            return Ok(page);
        }

        let source_depth = page.buffer.bits_per_channel();
        let target_depth = self.config.color_depth;
        let gray = page.buffer.to_gray();

        if target_depth >= source_depth {
            tracing::info!(
                source_depth,
                "Converting to grayscale while keeping {source_depth}-bit colors"
            );
            return Ok(page.with_buffer(gray));
        }

        tracing::info!(
            source_depth,
            target_depth,
            "Converting to grayscale {target_depth}-bit colors from {source_depth}-bit colors"
        );
        let size = gray.size();
        let samples = gray.gray_samples();
        drop(gray);

        let quantized = GrayDitherer::with_depth(target_depth)?
            .sample_bits(source_depth)
            .serpentine(self.config.serpentine)
            .quantize(&samples, size.width as usize, size.height as usize)?;
        tracing::debug!(levels = quantized.palette().len(), "Quantized palette");

        let page_no = page.page_no;
        let buffer =
            PixelBuffer::from_quantized(quantized).ok_or_else(|| PipelineError::Computation {
                page: page_no,
                operation: "grayscale",
                rect: page.rect(),
                reason: "quantized samples do not match page size".to_string(),
            })?;
        Ok(page.with_buffer(buffer))
    }
}
