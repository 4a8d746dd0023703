//! Error types for grayscale quantization.

use std::fmt;

/// Error returned when a quantizer or ditherer cannot be built or run.
#[derive(Debug, Clone, PartialEq)]
pub enum QuantizeError {
    /// Requested palette size is outside `1..=256`
    UnsupportedLevelCount {
        /// The rejected palette size
        levels: usize,
    },
    /// Sample bit depth is neither 8 nor 16
    UnsupportedSampleDepth {
        /// The rejected sample depth in bits
        bits: u8,
    },
    /// Sample buffer length does not match `width * height`
    DimensionMismatch {
        /// Number of samples supplied
        samples: usize,
        /// Declared image width
        width: usize,
        /// Declared image height
        height: usize,
    },
    /// Nothing to quantize
    EmptyImage,
}

impl fmt::Display for QuantizeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuantizeError::UnsupportedLevelCount { levels } => {
                write!(f, "unsupported palette size {} (expected 1..=256)", levels)
            }
            QuantizeError::UnsupportedSampleDepth { bits } => {
                write!(f, "unsupported sample depth {}-bit (expected 8 or 16)", bits)
            }
            QuantizeError::DimensionMismatch {
                samples,
                width,
                height,
            } => write!(
                f,
                "sample count {} does not match {}x{} image",
                samples, width, height
            ),
            QuantizeError::EmptyImage => write!(f, "image has no pixels"),
        }
    }
}

impl std::error::Error for QuantizeError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_level_count() {
        let err = QuantizeError::UnsupportedLevelCount { levels: 512 };
        assert_eq!(
            err.to_string(),
            "unsupported palette size 512 (expected 1..=256)"
        );
    }

    #[test]
    fn test_display_dimension_mismatch() {
        let err = QuantizeError::DimensionMismatch {
            samples: 3,
            width: 2,
            height: 2,
        };
        assert_eq!(err.to_string(), "sample count 3 does not match 2x2 image");
    }
}
