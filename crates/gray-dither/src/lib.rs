//! gray-dither: grayscale palette reduction for e-reader pages
//!
//! Reduces an 8- or 16-bit grayscale image to at most `2^depth` gray levels:
//!
//! 1. [`MedianCut`] picks the palette from the image histogram.
//! 2. Floyd-Steinberg error diffusion maps every pixel to a palette level,
//!    carrying the quantization error to unprocessed neighbors so gradients
//!    survive as dither patterns instead of flat bands.
//!
//! # Quick Start
//!
//! ```
//! use gray_dither::GrayDitherer;
//!
//! let ditherer = GrayDitherer::with_depth(2).unwrap();
//! let gradient: Vec<u16> = (0..256).map(|i| (i % 16) as u16 * 17).collect();
//! let result = ditherer.quantize(&gradient, 16, 16).unwrap();
//!
//! assert!(result.palette().len() <= 4);
//! ```

pub mod api;
pub mod dither;
pub mod error;
pub mod median_cut;
pub mod output;
pub mod palette;


pub use api::GrayDitherer;
pub use dither::{DitherOptions, Kernel, FLOYD_STEINBERG};
pub use error::QuantizeError;
pub use median_cut::MedianCut;
pub use output::QuantizedGray;
pub use palette::GrayPalette;
