//! Assertion helpers for tests.

use std::collections::HashSet;
use std::io::Cursor;

use pagefold::models::Size;
use pagefold::rendering::PixelBuffer;
use pretty_assertions::assert_eq;

/// Assert `bytes` is a PNG and return it decoded.
pub fn assert_png(bytes: &[u8]) -> PixelBuffer {
    assert!(
        bytes.starts_with(b"\x89PNG\r\n\x1a\n"),
        "Expected PNG image, got {} bytes starting with {:?}",
        bytes.len(),
        &bytes[..8.min(bytes.len())]
    );
    PixelBuffer::decode(bytes).unwrap()
}

pub fn assert_png_size(bytes: &[u8], expected: Size) {
    let decoded = assert_png(bytes);
    assert_eq!(decoded.size(), expected, "Unexpected page size");
}

/// Assert the PNG is indexed with no more than `max` palette entries.
pub fn assert_indexed_palette(bytes: &[u8], max: usize) {
    let reader = png::Decoder::new(Cursor::new(bytes)).read_info().unwrap();
    let info = reader.info();
    assert_eq!(info.color_type, png::ColorType::Indexed, "Expected indexed PNG");
    let entries = info.palette.as_ref().map(|p| p.len() / 3).unwrap_or(0);
    assert!(
        entries > 0 && entries <= max,
        "Expected 1..={max} palette entries, got {entries}"
    );
}

/// Number of distinct gray levels in a page.
pub fn distinct_levels(buffer: &PixelBuffer) -> usize {
    buffer.gray_samples().into_iter().collect::<HashSet<_>>().len()
}
