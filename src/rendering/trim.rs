//! Border trimming against configured background colors.

use crate::error::PipelineError;
use crate::models::{Color16, Page, Rect, Size, TrimConfig};
use crate::rendering::compare::is_color_similar;
use crate::rendering::pixel_buffer::ColorSampler;

/// Removes uniform background borders while keeping at least `min_size` of
/// each page dimension.
#[derive(Debug, Clone)]
pub struct Trimmer<'a> {
    config: &'a TrimConfig,
    background: &'a [Color16],
}

impl<'a> Trimmer<'a> {
    pub fn new(config: &'a TrimConfig, background: &'a [Color16]) -> Self {
        Self { config, background }
    }

    fn is_background(&self, color: Color16) -> bool {
        self.background
            .iter()
            .any(|&bg| is_color_similar(color, bg, self.config.fuzz))
    }

    /// Bounding box of every non-background pixel. Empty for a blank page.
    ///
    /// Scans top-down, bottom-up, then left and right, each pass only covering
    /// what the earlier passes have not already bounded.
    pub fn content_rect(&self, image: &impl ColorSampler, size: Size) -> Rect {
        let (width, height) = (size.width, size.height);
        let is_content = |x: u32, y: u32| !self.is_background(image.color_at(x, y));

        let Some((first_x, top)) =
            (0..height).find_map(|y| (0..width).find(|&x| is_content(x, y)).map(|x| (x, y)))
        else {
            return Rect::default();
        };
        let (mut left, mut right, mut bottom) = (first_x, first_x, top);

        if let Some((x, y)) = (top + 1..height)
            .rev()
            .find_map(|y| (0..width).rev().find(|&x| is_content(x, y)).map(|x| (x, y)))
        {
            bottom = y;
            left = left.min(x);
            right = right.max(x);
        }

        if let Some(x) = (0..left).find(|&x| (top..=bottom).any(|y| is_content(x, y))) {
            left = x;
        }

        if let Some(x) = (right + 1..width)
            .rev()
            .find(|&x| (top..=bottom).rev().any(|y| is_content(x, y)))
        {
            right = x;
        }

        Rect::new(
            left as i64,
            top as i64,
            right - left + 1,
            bottom - top + 1,
        )
    }

    /// Final crop box for a page, or `None` when trimming would be a no-op.
    pub fn trim_box(&self, page_rect: Rect, content: Rect) -> Option<Rect> {
        if content.is_empty() {
            tracing::info!("Entire page is background - skip trimming");
            return None;
        }

        let margin = self.config.margin as i64;
        let mut trim_box = content.inset_by(-margin, -margin).bound_by(&page_rect);
        tracing::debug!(%trim_box, "Trim box");

        if trim_box == page_rect {
            tracing::info!("No trimming needed");
            return None;
        }

        let min_size = page_rect.size.scale_by(self.config.min_size);
        if !min_size.fits_in(trim_box.size) {
            let trimmed = trim_box;
            let gap_x = (min_size.width as i64 - trim_box.size.width as i64).max(0);
            let gap_y = (min_size.height as i64 - trim_box.size.height as i64).max(0);
            trim_box = trim_box
                .inset_by(-(gap_x + 1) / 2, -(gap_y + 1) / 2)
                .move_inside(&page_rect);
            tracing::info!(
                %trimmed,
                %min_size,
                expanded = %trim_box,
                "Trim box is smaller than minimum size - expanding"
            );
            if trim_box == page_rect {
                return None;
            }
        }

        Some(trim_box)
    }

    pub fn apply(&self, page: Page) -> Result<Page, PipelineError> {
        if !self.config.enabled {
            return Ok(page);
        }
        let page_rect = page.rect();
        let content = self.content_rect(&page.buffer, page_rect.size);
        let Some(trim_box) = self.trim_box(page_rect, content) else {
            return Ok(page);
        };

        let cropped = page
            .buffer
            .crop(trim_box)
            .ok_or_else(|| PipelineError::Computation {
                page: page.page_no,
                operation: "trim",
                rect: trim_box,
                reason: format!("trim box is outside page {}", page_rect.size),
            })?;

        let width_pct = trim_box.size.width as f64 * 100.0 / page_rect.size.width as f64;
        let height_pct = trim_box.size.height as f64 * 100.0 / page_rect.size.height as f64;
        tracing::info!(
            page_size = %page_rect.size,
            %trim_box,
            "Trimmed page ({width_pct:.2}% | {height_pct:.2}%)"
        );

        Ok(page.with_buffer(cropped))
    }
}
