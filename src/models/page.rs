use crate::models::{PageRange, ReadingDirection, Rect, Size};
use crate::rendering::PixelBuffer;

/// One output page in flight: an owned image plus the input page number(s)
/// it came from. `paired_no` is set once two facing pages are merged.
#[derive(Debug, Clone)]
pub struct Page {
    pub buffer: PixelBuffer,
    pub page_no: u32,
    pub paired_no: Option<u32>,
}

impl Page {
    pub fn new(buffer: PixelBuffer, page_no: u32) -> Self {
        Self {
            buffer,
            page_no,
            paired_no: None,
        }
    }

    pub fn size(&self) -> Size {
        self.buffer.size()
    }

    pub fn rect(&self) -> Rect {
        self.buffer.rect()
    }

    /// Replace the image, keeping the page numbers.
    pub fn with_buffer(self, buffer: PixelBuffer) -> Self {
        Self { buffer, ..self }
    }

    /// Whether this page, or the page merged into it, is in `pages`.
    pub fn is_in(&self, pages: &PageRange) -> bool {
        pages.contains(self.page_no) || self.paired_no.is_some_and(|n| pages.contains(n))
    }

    /// `page-007` or `page-007-008`, zero-padded to the digit count of `total_pages`.
    pub fn file_stem(&self, total_pages: u32) -> String {
        let digits = digit_count(total_pages);
        match self.paired_no {
            Some(paired) => format!(
                "page-{:0digits$}-{:0digits$}",
                self.page_no,
                paired,
                digits = digits
            ),
            None => format!("page-{:0digits$}", self.page_no, digits = digits),
        }
    }

    /// Order two facing pages as (left, right) for the reading direction.
    /// Right-to-left books put the higher page number on the left.
    pub fn left_right(a: Page, b: Page, direction: ReadingDirection) -> (Page, Page) {
        let a_first = a.page_no < b.page_no;
        match (direction, a_first) {
            (ReadingDirection::LeftToRight, true) | (ReadingDirection::RightToLeft, false) => {
                (a, b)
            }
            _ => (b, a),
        }
    }
}

fn digit_count(total: u32) -> usize {
    total.max(1).ilog10() as usize + 1
}
