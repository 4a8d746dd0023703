//! Page images and inputs for tests.

use std::fs::File;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};

use image::{DynamicImage, ImageBuffer, ImageFormat, Rgb};
use pagefold::models::{Color16, Rect, Size};
use pagefold::rendering::PixelBuffer;
use zip::write::SimpleFileOptions;

/// Screen sizes used across tests.
pub mod screens {
    use pagefold::models::Size;

    pub const PORTRAIT: Size = Size {
        width: 1264,
        height: 1680,
    };

    pub const LANDSCAPE: Size = Size {
        width: 1680,
        height: 1264,
    };
}

/// Uniform page.
pub fn solid_page(size: Size, value: u8) -> PixelBuffer {
    let img = ImageBuffer::from_pixel(size.width, size.height, Rgb([value, value, value]));
    PixelBuffer::new(DynamicImage::ImageRgb8(img))
}

/// White page with black content inside `content`.
pub fn page_with_content(size: Size, content: Rect) -> PixelBuffer {
    let img = ImageBuffer::from_fn(size.width, size.height, |x, y| {
        let (x, y) = (x as i64, y as i64);
        let inside =
            x >= content.min_x() && x < content.max_x() && y >= content.min_y() && y < content.max_y();
        if inside {
            Rgb([0u8, 0, 0])
        } else {
            Rgb([255u8, 255, 255])
        }
    });
    PixelBuffer::new(DynamicImage::ImageRgb8(img))
}

/// Both halves of one dark illustration cut down the middle. The bands run
/// horizontally, so both cut edges carry the same pixels.
pub fn spread_halves(half: Size) -> (PixelBuffer, PixelBuffer) {
    let band = |_x: u32, y: u32| {
        let v = 40 + ((y / 8) % 4) as u8 * 20;
        Rgb([v, v / 2, v])
    };
    let left = ImageBuffer::from_fn(half.width, half.height, band);
    let right = ImageBuffer::from_fn(half.width, half.height, band);
    (
        PixelBuffer::new(DynamicImage::ImageRgb8(left)),
        PixelBuffer::new(DynamicImage::ImageRgb8(right)),
    )
}

/// Horizontal 8-bit gray ramp, identical on every row.
pub fn gray_ramp(size: Size) -> PixelBuffer {
    let width = size.width.max(2);
    let img = ImageBuffer::from_fn(size.width, size.height, |x, _| {
        let v = (x * 255 / (width - 1)) as u8;
        Rgb([v, v, v])
    });
    PixelBuffer::new(DynamicImage::ImageRgb8(img))
}

pub fn png_bytes(buffer: &PixelBuffer) -> Vec<u8> {
    let mut bytes = Vec::new();
    buffer
        .image()
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();
    bytes
}

/// Write pages as `001.png`, `002.png`, ... into `dir`.
pub fn write_page_dir(dir: &Path, pages: &[PixelBuffer]) -> PathBuf {
    std::fs::create_dir_all(dir).unwrap();
    for (i, page) in pages.iter().enumerate() {
        std::fs::write(dir.join(format!("{:03}.png", i + 1)), png_bytes(page)).unwrap();
    }
    dir.to_path_buf()
}

/// Pack pages into a CBZ at `path`, with a `ComicInfo.xml` alongside.
pub fn write_cbz(path: &Path, pages: &[PixelBuffer]) -> PathBuf {
    let mut zip = zip::ZipWriter::new(File::create(path).unwrap());
    let options = SimpleFileOptions::default();
    for (i, page) in pages.iter().enumerate() {
        zip.start_file(format!("{:03}.png", i + 1), options).unwrap();
        zip.write_all(&png_bytes(page)).unwrap();
    }
    zip.start_file("ComicInfo.xml", options).unwrap();
    zip.write_all(b"<ComicInfo/>").unwrap();
    zip.finish().unwrap();
    path.to_path_buf()
}

pub fn white() -> Vec<Color16> {
    vec![Color16::WHITE]
}
