use crate::models::{Orientation, Page, Size};

/// Re-orients pages to the screen and shrinks them to fit it.
#[derive(Debug, Clone, Copy)]
pub struct Resizer {
    target: Size,
}

impl Resizer {
    pub fn new(target: Size) -> Self {
        Self { target }
    }

    pub fn apply(&self, page: Page) -> Page {
        let mut page = page;
        let page_orientation = page.size().orientation();
        let target_orientation = self.target.orientation();

        // Always rotates the same way, even where the other direction would be shorter.
        if page_orientation != Orientation::Square && page_orientation != target_orientation {
            tracing::info!(
                size = %page.size(),
                %page_orientation,
                %target_orientation,
                "Rotating page to match screen orientation"
            );
            let rotated = page.buffer.rotate270();
            page = page.with_buffer(rotated);
        }

        let size = page.size();
        if size.fits_in(self.target) {
            tracing::info!(%size, target = %self.target, "Page fits in screen - skip resizing");
            return page;
        }

        let fitted = size.aspect_fit_in(self.target, false);
        tracing::info!(%size, %fitted, target = %self.target, "Resizing page");
        let resized = page.buffer.resize(fitted);
        page.with_buffer(resized)
    }
}
