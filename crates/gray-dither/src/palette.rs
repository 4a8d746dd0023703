//! Grayscale palette with nearest-level lookup.

/// An ascending, duplicate-free list of gray levels.
///
/// Levels are expressed in the sample range of the image they were built
/// from (`0..=255` for 8-bit samples, `0..=65535` for 16-bit samples).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrayPalette {
    levels: Vec<u16>,
}

impl GrayPalette {
    /// Build a palette from arbitrary levels. Levels are sorted and deduplicated.
    ///
    /// Returns `None` when `levels` is empty.
    pub fn new(levels: impl IntoIterator<Item = u16>) -> Option<Self> {
        let mut levels: Vec<u16> = levels.into_iter().collect();
        if levels.is_empty() {
            return None;
        }
        levels.sort_unstable();
        levels.dedup();
        Some(Self { levels })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    #[inline]
    pub fn levels(&self) -> &[u16] {
        &self.levels
    }

    #[inline]
    pub fn level(&self, index: usize) -> u16 {
        self.levels[index]
    }

    /// Index of the level closest to `value`. Ties go to the darker level.
    pub fn nearest(&self, value: f32) -> usize {
        let upper = self.levels.partition_point(|&l| (l as f32) < value);
        if upper == 0 {
            return 0;
        }
        if upper == self.levels.len() {
            return self.levels.len() - 1;
        }
        let below = value - self.levels[upper - 1] as f32;
        let above = self.levels[upper] as f32 - value;
        if above < below {
            upper
        } else {
            upper - 1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_new_sorts_and_dedups() {
        let palette = GrayPalette::new([200, 10, 200, 90]).unwrap();
        assert_eq!(palette.levels(), &[10, 90, 200]);
    }

    #[test]
    fn test_new_empty() {
        assert!(GrayPalette::new(Vec::<u16>::new()).is_none());
    }

    #[test]
    fn test_nearest_bounds_and_midpoints() {
        let palette = GrayPalette::new([0, 100, 255]).unwrap();
        assert_eq!(palette.nearest(-20.0), 0);
        assert_eq!(palette.nearest(49.0), 0);
        assert_eq!(palette.nearest(50.0), 0);
        assert_eq!(palette.nearest(51.0), 1);
        assert_eq!(palette.nearest(180.0), 2);
        assert_eq!(palette.nearest(400.0), 2);
    }
}
