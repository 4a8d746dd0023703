//! Pixel geometry for page processing.
//!
//! `Size` is unsigned, `Point` is signed so that rects can be grown past the
//! page origin (negative inset) before being bounded again.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Portrait,
    Landscape,
    Square,
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Orientation::Portrait => write!(f, "portrait"),
            Orientation::Landscape => write!(f, "landscape"),
            Orientation::Square => write!(f, "square"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Scale both dimensions by `factor`, rounding down.
    pub fn scale_by(&self, factor: f64) -> Size {
        debug_assert!(factor >= 0.0, "scale factor cannot be negative");
        Size {
            width: (self.width as f64 * factor).floor() as u32,
            height: (self.height as f64 * factor).floor() as u32,
        }
    }

    pub fn rotated(&self) -> Size {
        Size::new(self.height, self.width)
    }

    pub fn fits_in(&self, frame: Size) -> bool {
        self.width <= frame.width && self.height <= frame.height
    }

    /// Uniformly scale to fit inside `frame`.
    ///
    /// Returns `self` unchanged when it already fits and `enlarge` is false.
    /// A dimension never scales below one pixel.
    pub fn aspect_fit_in(&self, frame: Size, enlarge: bool) -> Size {
        if (self.fits_in(frame) && !enlarge) || self.is_empty() {
            return *self;
        }
        let ratio_w = frame.width as f64 / self.width as f64;
        let ratio_h = frame.height as f64 / self.height as f64;
        let fitted = self.scale_by(ratio_w.min(ratio_h));
        Size {
            width: fitted.width.max(1),
            height: fitted.height.max(1),
        }
    }

    pub fn orientation(&self) -> Orientation {
        match self.width.cmp(&self.height) {
            std::cmp::Ordering::Less => Orientation::Portrait,
            std::cmp::Ordering::Greater => Orientation::Landscape,
            std::cmp::Ordering::Equal => Orientation::Square,
        }
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
    pub x: i64,
    pub y: i64,
}

impl Point {
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    pub fn translate_by(&self, dx: i64, dy: i64) -> Point {
        Point::new(self.x + dx, self.y + dy)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A rectangle; zero width or height means "no content".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    pub origin: Point,
    pub size: Size,
}

impl Rect {
    pub const fn new(x: i64, y: i64, width: u32, height: u32) -> Self {
        Self {
            origin: Point::new(x, y),
            size: Size::new(width, height),
        }
    }

    /// A rect at the origin covering `size`.
    pub const fn from_size(size: Size) -> Self {
        Self {
            origin: Point::new(0, 0),
            size,
        }
    }

    pub fn min_x(&self) -> i64 {
        self.origin.x
    }

    pub fn min_y(&self) -> i64 {
        self.origin.y
    }

    pub fn max_x(&self) -> i64 {
        self.origin.x + self.size.width as i64
    }

    pub fn max_y(&self) -> i64 {
        self.origin.y + self.size.height as i64
    }

    pub fn is_empty(&self) -> bool {
        self.size.is_empty()
    }

    pub fn contains(&self, other: &Rect) -> bool {
        other.min_x() >= self.min_x()
            && other.min_y() >= self.min_y()
            && other.max_x() <= self.max_x()
            && other.max_y() <= self.max_y()
    }

    /// Full-height strip of up to `width` pixels along the left side, `margin`
    /// pixels in from the edge. Zero width when the rect is narrower than `margin`.
    pub fn left_edge(&self, width: u32, margin: u32) -> Rect {
        let remaining = self.size.width.saturating_sub(margin);
        let x = margin.min(self.size.width);
        Rect::new(
            self.min_x() + x as i64,
            self.min_y(),
            remaining.min(width),
            self.size.height,
        )
    }

    /// Mirror of [`Rect::left_edge`] along the right side.
    pub fn right_edge(&self, width: u32, margin: u32) -> Rect {
        let remaining = self.size.width.saturating_sub(margin);
        let x = remaining.saturating_sub(width);
        Rect::new(
            self.min_x() + x as i64,
            self.min_y(),
            remaining.min(width),
            self.size.height,
        )
    }

    /// Shrink by `dx`/`dy` on every side (grow when negative). Sizes floor at zero.
    pub fn inset_by(&self, dx: i64, dy: i64) -> Rect {
        let width = (self.size.width as i64 - 2 * dx).max(0);
        let height = (self.size.height as i64 - 2 * dy).max(0);
        Rect {
            origin: self.origin.translate_by(dx, dy),
            size: Size::new(clamp_u32(width), clamp_u32(height)),
        }
    }

    /// Intersection with `frame`. Disjoint rects collapse to zero size.
    pub fn bound_by(&self, frame: &Rect) -> Rect {
        let x = self.min_x().max(frame.min_x());
        let y = self.min_y().max(frame.min_y());
        let width = (self.max_x().min(frame.max_x()) - x).max(0);
        let height = (self.max_y().min(frame.max_y()) - y).max(0);
        Rect {
            origin: Point::new(x, y),
            size: Size::new(clamp_u32(width), clamp_u32(height)),
        }
    }

    /// Translate so the rect lies inside `frame` where possible, then bound by it.
    pub fn move_inside(&self, frame: &Rect) -> Rect {
        let mut moved = *self;
        if moved.min_x() < frame.min_x() {
            moved.origin.x = frame.min_x();
        }
        if moved.max_x() > frame.max_x() {
            moved.origin.x -= moved.max_x() - frame.max_x();
        }
        if moved.min_y() < frame.min_y() {
            moved.origin.y = frame.min_y();
        }
        if moved.max_y() > frame.max_y() {
            moved.origin.y -= moved.max_y() - frame.max_y();
        }
        moved.bound_by(frame)
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}+{}+{}", self.size, self.origin.x, self.origin.y)
    }
}

fn clamp_u32(value: i64) -> u32 {
    value.clamp(0, u32::MAX as i64) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_orientation() {
        assert_eq!(Size::new(800, 1200).orientation(), Orientation::Portrait);
        assert_eq!(Size::new(1680, 1264).orientation(), Orientation::Landscape);
        assert_eq!(Size::new(10, 10).orientation(), Orientation::Square);
        assert_eq!(Orientation::Landscape.to_string(), "landscape");
    }

    #[test]
    fn test_scale_by_floors() {
        assert_eq!(Size::new(1264, 1680).scale_by(0.85), Size::new(1074, 1428));
        assert_eq!(Size::new(3, 3).scale_by(0.5), Size::new(1, 1));
    }

    #[test]
    fn test_aspect_fit_in_keeps_small_sizes() {
        let size = Size::new(1200, 800);
        assert_eq!(size.aspect_fit_in(Size::new(1680, 1264), false), size);
    }

    #[test]
    fn test_aspect_fit_in_enlarge() {
        let size = Size::new(100, 50);
        assert_eq!(size.aspect_fit_in(Size::new(400, 400), true), Size::new(400, 200));
    }

    #[test]
    fn test_aspect_fit_in_never_exceeds_frame() {
        let frame = Size::new(1264, 1680);
        for (w, h) in [(2000, 3000), (5000, 1000), (1265, 1681), (3000, 1681), (7, 9000)] {
            let fitted = Size::new(w, h).aspect_fit_in(frame, false);
            assert!(fitted.fits_in(frame), "{fitted} exceeds {frame}");

            // aspect ratio holds up to the floor of each dimension
            let ratio = (frame.width as f64 / w as f64).min(frame.height as f64 / h as f64);
            assert!((w as f64 * ratio - fitted.width as f64).abs() < 1.0, "{w}x{h} -> {fitted}");
            assert!((h as f64 * ratio - fitted.height as f64).abs() < 1.0, "{w}x{h} -> {fitted}");
        }
    }

    #[test]
    fn test_aspect_fit_in_keeps_thin_strips_visible() {
        let frame = Size::new(1264, 1680);
        assert_eq!(Size::new(1, 5000).aspect_fit_in(frame, false), Size::new(1, 1680));
        assert_eq!(Size::new(9000, 2).aspect_fit_in(frame, false), Size::new(1264, 1));
    }

    #[test]
    fn test_left_and_right_edges() {
        let page = Rect::from_size(Size::new(600, 1680));
        assert_eq!(page.left_edge(4, 2), Rect::new(2, 0, 4, 1680));
        assert_eq!(page.right_edge(4, 2), Rect::new(594, 0, 4, 1680));
    }

    #[test]
    fn test_edges_on_narrow_page() {
        let page = Rect::from_size(Size::new(5, 20));
        assert_eq!(page.left_edge(4, 2), Rect::new(2, 0, 3, 20));
        assert_eq!(page.right_edge(4, 2), Rect::new(0, 0, 3, 20));

        let too_narrow = Rect::from_size(Size::new(2, 20));
        assert_eq!(too_narrow.left_edge(4, 2).size.width, 0);
        assert_eq!(too_narrow.right_edge(4, 2).size.width, 0);

        let narrower_than_margin = Rect::from_size(Size::new(1, 20));
        assert_eq!(narrower_than_margin.left_edge(4, 2), Rect::new(1, 0, 0, 20));
    }

    #[test]
    fn test_inset_by() {
        let rect = Rect::new(10, 10, 100, 50);
        assert_eq!(rect.inset_by(5, 5), Rect::new(15, 15, 90, 40));
        assert_eq!(rect.inset_by(-10, -10), Rect::new(0, 0, 120, 70));
        assert_eq!(rect.inset_by(60, 30), Rect::new(70, 40, 0, 0));
    }

    #[test]
    fn test_bound_by() {
        let frame = Rect::from_size(Size::new(100, 100));
        assert_eq!(Rect::new(-10, -5, 50, 50).bound_by(&frame), Rect::new(0, 0, 40, 45));
        assert_eq!(Rect::new(80, 90, 50, 50).bound_by(&frame), Rect::new(80, 90, 20, 10));
        assert!(Rect::new(200, 200, 10, 10).bound_by(&frame).is_empty());
    }

    #[test]
    fn test_move_inside() {
        let frame = Rect::from_size(Size::new(100, 100));
        assert_eq!(Rect::new(-10, 20, 50, 50).move_inside(&frame), Rect::new(0, 20, 50, 50));
        assert_eq!(Rect::new(70, 80, 50, 50).move_inside(&frame), Rect::new(50, 50, 50, 50));
        // larger than the frame: pinned to the far side, then bounded
        assert_eq!(Rect::new(-5, 0, 120, 10).move_inside(&frame), Rect::new(0, 0, 100, 10));
    }

    #[test]
    fn test_move_inside_stays_within_frame() {
        let frame = Rect::new(3, 7, 40, 30);
        for x in (-60..80).step_by(7) {
            for y in (-50..60).step_by(9) {
                for (w, h) in [(0, 0), (5, 5), (40, 30), (55, 12), (12, 70)] {
                    let rect = Rect::new(x, y, w, h);
                    let moved = rect.move_inside(&frame);
                    assert!(frame.contains(&moved), "{rect} -> {moved}");
                    if frame.contains(&rect) {
                        assert_eq!(moved, rect);
                    }
                }
            }
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(Rect::new(5, 6, 100, 200).to_string(), "100x200+5+6");
        assert_eq!(Point::new(-1, 2).to_string(), "(-1, 2)");
    }
}
