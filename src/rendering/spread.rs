//! Double-page spread detection and merging.
//!
//! Two facing pages form a spread when neither facing edge strip is plain
//! background and the two strips look alike.

use crate::error::PipelineError;
use crate::models::{Color16, Page, Point, Rect, SpreadConfig};
use crate::rendering::compare::rmse_distortion;
use crate::rendering::pixel_buffer::ColorSampler;

#[derive(Debug, Clone)]
pub struct SpreadDetector<'a> {
    config: &'a SpreadConfig,
    background: &'a [Color16],
}

impl<'a> SpreadDetector<'a> {
    pub fn new(config: &'a SpreadConfig, background: &'a [Color16]) -> Self {
        Self { config, background }
    }

    /// Whether `left` and `right` (already in reading order) are one cut spread.
    pub fn is_spread(&self, left: &Page, right: &Page) -> Result<bool, PipelineError> {
        let left_edge = left
            .rect()
            .right_edge(self.config.edge_width, self.config.edge_margin);
        let right_edge = right
            .rect()
            .left_edge(self.config.edge_width, self.config.edge_margin);

        if left_edge.size != right_edge.size {
            tracing::info!(
                left = left.page_no,
                right = right.page_no,
                left_edge = %left_edge.size,
                right_edge = %right_edge.size,
                "Not a spread: edges differ in size"
            );
            return Ok(false);
        }
        if left_edge.size.width == 0 {
            tracing::info!(
                left = left.page_no,
                right = right.page_no,
                "Not a spread: pages are not wide enough"
            );
            return Ok(false);
        }

        for (i, &bg) in self.background.iter().enumerate() {
            let threshold = self.config.background_threshold(i);
            for (page, edge) in [(left, left_edge), (right, right_edge)] {
                let distortion = measure(page, edge, &bg, Point::default())?;
                if distortion <= threshold {
                    tracing::info!(
                        page = page.page_no,
                        background = %bg,
                        distortion,
                        threshold,
                        "Not a spread: edge is background border"
                    );
                    return Ok(false);
                }
                tracing::debug!(
                    page = page.page_no,
                    background = %bg,
                    distortion,
                    threshold,
                    "Edge is not background"
                );
            }
        }

        let distortion = measure(left, left_edge, &right.buffer, right_edge.origin)?;
        let threshold = self.config.left_right_distortion;
        if distortion > threshold {
            tracing::info!(
                left = left.page_no,
                right = right.page_no,
                distortion,
                threshold,
                "Not a spread: edges do not connect"
            );
            return Ok(false);
        }

        tracing::info!(
            left = left.page_no,
            right = right.page_no,
            distortion,
            threshold,
            "Pages form a double-page spread"
        );
        Ok(true)
    }
}

fn measure(
    page: &Page,
    edge: Rect,
    other: &impl ColorSampler,
    origin: Point,
) -> Result<f64, PipelineError> {
    rmse_distortion(&page.buffer, edge, other, origin).ok_or_else(|| PipelineError::Computation {
        page: page.page_no,
        operation: "edge distortion",
        rect: edge,
        reason: "edge strip is empty".to_string(),
    })
}

/// Composite `left` and `right` side by side. Both inputs are consumed.
pub fn merge(left: Page, right: Page) -> Page {
    let buffer = left.buffer.append_horizontally(&right.buffer);
    tracing::debug!(
        left = left.page_no,
        right = right.page_no,
        size = %buffer.size(),
        "Merged pages"
    );
    Page {
        buffer,
        page_no: left.page_no.min(right.page_no),
        paired_no: Some(left.page_no.max(right.page_no)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Size;
    use crate::rendering::PixelBuffer;
    use image::{DynamicImage, ImageBuffer, Rgb};

    fn config() -> SpreadConfig {
        SpreadConfig {
            enabled: true,
            edge_width: 4,
            edge_margin: 2,
            background_distortion: vec![0.4],
            left_right_distortion: 0.1,
        }
    }

    fn solid(width: u32, height: u32, value: u8, no: u32) -> Page {
        let img = ImageBuffer::from_pixel(width, height, Rgb([value, value, value]));
        Page::new(PixelBuffer::new(DynamicImage::ImageRgb8(img)), no)
    }

    #[test]
    fn test_identical_dark_edges_are_spread() {
        let cfg = config();
        let bg = [Color16::WHITE];
        let detector = SpreadDetector::new(&cfg, &bg);
        let left = solid(20, 30, 40, 3);
        let right = solid(20, 30, 40, 4);
        assert!(detector.is_spread(&left, &right).unwrap());
    }

    #[test]
    fn test_background_edge_rejects() {
        let cfg = config();
        let bg = [Color16::WHITE];
        let detector = SpreadDetector::new(&cfg, &bg);
        let left = solid(20, 30, 250, 3);
        let right = solid(20, 30, 250, 4);
        assert!(!detector.is_spread(&left, &right).unwrap());
    }

    #[test]
    fn test_second_background_color_rejects() {
        let cfg = config();
        let bg = [Color16::WHITE, Color16::BLACK];
        let detector = SpreadDetector::new(&cfg, &bg);
        let left = solid(20, 30, 5, 3);
        let right = solid(20, 30, 5, 4);
        assert!(!detector.is_spread(&left, &right).unwrap());
    }

    #[test]
    fn test_mismatched_edges_reject() {
        let cfg = config();
        let bg = [Color16::WHITE];
        let detector = SpreadDetector::new(&cfg, &bg);
        let left = solid(20, 30, 0, 3);
        let right = solid(20, 30, 100, 4);
        assert!(!detector.is_spread(&left, &right).unwrap());
    }

    #[test]
    fn test_size_mismatch_and_narrow_pages_reject() {
        let cfg = config();
        let bg = [Color16::WHITE];
        let detector = SpreadDetector::new(&cfg, &bg);
        assert!(!detector
            .is_spread(&solid(20, 30, 0, 1), &solid(20, 31, 0, 2))
            .unwrap());
        assert!(!detector
            .is_spread(&solid(2, 30, 0, 1), &solid(2, 30, 0, 2))
            .unwrap());
    }

    #[test]
    fn test_merge_numbers_and_size() {
        let merged = merge(solid(20, 30, 0, 8), solid(10, 40, 0, 7));
        assert_eq!(merged.size(), Size::new(30, 40));
        assert_eq!(merged.page_no, 7);
        assert_eq!(merged.paired_no, Some(8));
    }
}
