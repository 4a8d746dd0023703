//! Dithering options and configuration.

/// Configuration options for error diffusion dithering.
///
/// # Defaults
///
/// - Serpentine scanning: disabled (classic left-to-right raster order)
///
/// # Example
///
/// ```
/// use gray_dither::DitherOptions;
///
/// let options = DitherOptions::new().serpentine(true);
/// assert!(options.serpentine);
/// ```
#[derive(Debug, Clone, Default)]
pub struct DitherOptions {
    /// Enable serpentine scanning (alternating row direction).
    ///
    /// When enabled, odd rows are processed right-to-left and the diffusion
    /// kernel is horizontally flipped.
    pub serpentine: bool,
}

impl DitherOptions {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set serpentine scanning mode.
    #[inline]
    pub fn serpentine(mut self, enabled: bool) -> Self {
        self.serpentine = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let opts = DitherOptions::default();
        assert!(!opts.serpentine, "serpentine should default to false");
    }

    #[test]
    fn test_builder() {
        assert!(DitherOptions::new().serpentine(true).serpentine);
    }
}
