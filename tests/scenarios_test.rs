//! Whole-stage scenarios on realistic page sizes.

mod common;

use common::fixtures::{self, screens};
use pagefold::models::{
    Color16, GrayscaleConfig, Page, PageRange, Rect, ReadingDirection, Size, SpreadConfig,
    TrimConfig,
};
use pagefold::rendering::{
    merge, rmse_distortion, GrayscaleQuantizer, PngEncoder, Resizer, SpreadDetector, Trimmer,
};
use pretty_assertions::assert_eq;

fn trim_config() -> TrimConfig {
    TrimConfig {
        enabled: true,
        min_size: 0.85,
        margin: 10,
        fuzz: 0.1,
    }
}

#[test]
fn test_blank_page_is_not_trimmed() {
    let cfg = trim_config();
    let background = fixtures::white();
    let trimmer = Trimmer::new(&cfg, &background);
    let page = Page::new(fixtures::solid_page(screens::PORTRAIT, 255), 1);

    let content = trimmer.content_rect(&page.buffer, page.size());
    assert!(content.is_empty());
    assert_eq!(trimmer.trim_box(page.rect(), content), None);

    let page = trimmer.apply(page).unwrap();
    assert_eq!(page.size(), Size::new(1264, 1680));
}

#[test]
fn test_small_content_keeps_minimum_size() {
    let cfg = trim_config();
    let background = fixtures::white();
    let trimmer = Trimmer::new(&cfg, &background);
    let size = Size::new(400, 600);
    let page = Page::new(fixtures::page_with_content(size, Rect::new(150, 250, 100, 100)), 1);

    let page = trimmer.apply(page).unwrap();
    assert_eq!(page.size(), Size::new(340, 510));
}

#[test]
fn test_cut_illustration_is_detected_and_merged() {
    let cfg = SpreadConfig {
        enabled: true,
        edge_width: 4,
        edge_margin: 2,
        background_distortion: vec![0.4],
        left_right_distortion: 0.15,
    };
    let background = fixtures::white();
    let detector = SpreadDetector::new(&cfg, &background);
    let half = Size::new(600, 1680);
    let (left, right) = fixtures::spread_halves(half);
    let left = Page::new(left, 7);
    let right = Page::new(right, 8);

    let left_edge = left.rect().right_edge(4, 2);
    let right_edge = right.rect().left_edge(4, 2);
    let between = rmse_distortion(&left.buffer, left_edge, &right.buffer, right_edge.origin);
    assert_eq!(between, Some(0.0));
    let to_white = rmse_distortion(&left.buffer, left_edge, &Color16::WHITE, Default::default());
    assert!(to_white.unwrap() > 0.4);

    assert!(detector.is_spread(&left, &right).unwrap());

    let merged = merge(left, right);
    assert_eq!(merged.size(), Size::new(1200, 1680));
    assert_eq!(merged.page_no, 7);
    assert_eq!(merged.paired_no, Some(8));
}

#[test]
fn test_right_to_left_spread_keeps_page_numbers() {
    let (a, b) = fixtures::spread_halves(Size::new(40, 60));
    let (left, right) = Page::left_right(
        Page::new(a, 3),
        Page::new(b, 4),
        ReadingDirection::RightToLeft,
    );
    assert_eq!((left.page_no, right.page_no), (4, 3));

    let merged = merge(left, right);
    assert_eq!(merged.page_no, 3);
    assert_eq!(merged.paired_no, Some(4));
    assert_eq!(merged.file_stem(120), "page-003-004");
}

#[test]
fn test_four_bit_gradient_is_dithered() {
    let cfg = GrayscaleConfig {
        pages: Some(PageRange::from_bounds(1, 1)),
        color_depth: 4,
        serpentine: false,
    };
    let page = Page::new(fixtures::gray_ramp(Size::new(256, 32)), 1);

    let page = GrayscaleQuantizer::new(&cfg).apply(page).unwrap();
    assert!(common::distinct_levels(&page.buffer) <= 16);

    // A straight rounding would give every column a single level.
    let samples = page.buffer.gray_samples();
    let varying_columns = (0..256usize)
        .filter(|&x| {
            let first = samples[x];
            (1..32usize).any(|y| samples[y * 256 + x] != first)
        })
        .count();
    assert!(
        varying_columns > 32,
        "expected error diffusion across columns, got {varying_columns} varying columns"
    );

    let bytes = PngEncoder::new(false).encode(&page.buffer).unwrap();
    common::assert_indexed_palette(&bytes, 16);
    common::assert_png_size(&bytes, Size::new(256, 32));
}

#[test]
fn test_full_depth_grayscale_is_lossless() {
    let cfg = GrayscaleConfig {
        pages: Some(PageRange::from_bounds(1, 1)),
        color_depth: 8,
        serpentine: false,
    };
    let ramp = fixtures::gray_ramp(Size::new(64, 4));
    let expected = ramp.gray_samples();

    let page = GrayscaleQuantizer::new(&cfg).apply(Page::new(ramp, 1)).unwrap();
    assert!(page.buffer.quantized().is_none());
    assert_eq!(page.buffer.gray_samples(), expected);
}

#[test]
fn test_portrait_page_on_landscape_screen() {
    let resizer = Resizer::new(screens::LANDSCAPE);
    let page = Page::new(fixtures::solid_page(Size::new(800, 1200), 255), 1);
    assert_eq!(resizer.apply(page).size(), Size::new(1200, 800));
}
