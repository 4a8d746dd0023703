//! Pagefold - page normalization for e-readers
//!
//! Trims borders, joins double-page spreads, fits pages to a screen and
//! reduces them to grayscale. This library exposes modules for integration testing.

pub mod error;
pub mod models;
pub mod rendering;
pub mod services;
