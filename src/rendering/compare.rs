//! Fuzzy color matching and distortion metrics.

use crate::models::{Color16, Point, Rect, COLOR_RANGE};
use crate::rendering::pixel_buffer::ColorSampler;

const EPSILON: f64 = 1.0e-12;

/// Whether `u` and `v` are within `fuzz` (fraction of the channel range) of each
/// other in linear RGB space, weighting color distance by alpha coverage:
///
/// ```text
/// fuzz^2 >= ((dr^2 + dg^2 + db^2) / 3) * (ua/range) * (va/range) + da^2
/// ```
///
/// A fuzz of zero means exact equality. All fully transparent colors are equal.
pub fn is_color_similar(u: Color16, v: Color16, fuzz: f64) -> bool {
    if fuzz == 0.0 {
        return visible(u) == visible(v);
    }

    let range = COLOR_RANGE as f64;
    let mut fuzz = fuzz * range;
    fuzz *= fuzz;

    let mut scale = 1.0;
    let mut distance = 0.0;

    if !u.is_opaque() || !v.is_opaque() {
        distance = sq_diff(u.a, v.a);
        if distance > fuzz {
            return false;
        }
        if !u.is_opaque() {
            scale *= u.a as f64 / range;
        }
        if !v.is_opaque() {
            scale *= v.a as f64 / range;
        }
        // both effectively transparent
        if scale <= EPSILON {
            return true;
        }
    }

    distance *= 3.0;
    fuzz *= 3.0;

    distance += sq_diff(u.r, v.r) * scale;
    if distance > fuzz {
        return false;
    }
    distance += sq_diff(u.g, v.g) * scale;
    if distance > fuzz {
        return false;
    }
    distance += sq_diff(u.b, v.b) * scale;
    distance <= fuzz
}

/// Mean squared difference of the premultiplied, normalized R, G, B and A channels.
pub fn squared_distortion(u: Color16, v: Color16) -> f64 {
    let range = COLOR_RANGE as f64;
    let (pu, pv) = (u.premultiplied(), v.premultiplied());
    let sum: f64 = pu
        .iter()
        .zip(pv.iter())
        .map(|(&a, &b)| {
            let d = a as f64 / range - b as f64 / range;
            d * d
        })
        .sum();
    sum / 4.0
}

/// Root-mean-square distortion between `region` of `image` and the equally sized
/// area of `other` starting at `origin`.
///
/// Returns `None` for an empty region.
pub fn rmse_distortion(
    image: &impl ColorSampler,
    region: Rect,
    other: &impl ColorSampler,
    origin: Point,
) -> Option<f64> {
    if region.is_empty() {
        return None;
    }
    let (width, height) = (region.size.width, region.size.height);
    let mut total = 0.0;
    for y in 0..height {
        for x in 0..width {
            let c1 = image.color_at(region.min_x() as u32 + x, region.min_y() as u32 + y);
            let c2 = other.color_at(origin.x as u32 + x, origin.y as u32 + y);
            total += squared_distortion(c1, c2);
        }
    }
    Some((total / (width as f64 * height as f64)).sqrt())
}

fn visible(c: Color16) -> Color16 {
    if c.a == 0 {
        Color16::new(0, 0, 0, 0)
    } else {
        c
    }
}

fn sq_diff(x: u16, y: u16) -> f64 {
    let d = x as f64 - y as f64;
    d * d
}
