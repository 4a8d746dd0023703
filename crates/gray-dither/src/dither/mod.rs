//! Error diffusion over a grayscale palette.
//!
//! Samples stay in their encoded range (`0..=255` or `0..=65535`) for the
//! whole loop: the palette is selected from encoded values, so the error is
//! measured against the same scale.

mod kernel;
mod options;

pub use kernel::{Kernel, FLOYD_STEINBERG};
pub use options::DitherOptions;

use crate::palette::GrayPalette;

/// Sliding window of error rows, `max_dy + 1` rows deep.
///
/// `rows[0]` is the row being processed, `rows[1]` the next one, and so on.
#[derive(Debug)]
pub struct ErrorBuffer {
    rows: Vec<Vec<f32>>,
    width: usize,
}

impl ErrorBuffer {
    pub fn new(width: usize, row_depth: usize) -> Self {
        Self {
            rows: (0..row_depth).map(|_| vec![0.0; width]).collect(),
            width,
        }
    }

    #[inline]
    pub fn get_accumulated(&self, x: usize) -> f32 {
        self.rows[0][x]
    }

    /// Add error to a future pixel. Out-of-bounds targets are ignored.
    #[inline]
    pub fn add_error(&mut self, x: usize, row_offset: usize, error: f32) {
        if x < self.width && row_offset < self.rows.len() {
            self.rows[row_offset][x] += error;
        }
    }

    /// Rotate the window one row down and zero the freshly exposed row.
    pub fn advance_row(&mut self) {
        self.rows.rotate_left(1);
        if let Some(last) = self.rows.last_mut() {
            last.fill(0.0);
        }
    }
}

/// Diffuse quantization error with `kernel` while mapping every sample to
/// its nearest palette level.
///
/// Returns one palette index per sample, row-major.
pub fn dither_with_kernel(
    samples: &[u16],
    width: usize,
    height: usize,
    max_value: f32,
    palette: &GrayPalette,
    kernel: &Kernel,
    options: &DitherOptions,
) -> Vec<u8> {
    let mut output = vec![0u8; width * height];
    let mut error_buf = ErrorBuffer::new(width, kernel.max_dy + 1);
    let divisor = kernel.divisor as f32;

    for y in 0..height {
        let reverse = options.serpentine && y % 2 == 1;

        for step in 0..width {
            let x = if reverse { width - 1 - step } else { step };
            let idx = y * width + x;

            let value = (samples[idx] as f32 + error_buf.get_accumulated(x)).clamp(0.0, max_value);
            let nearest = palette.nearest(value);
            output[idx] = nearest as u8;

            let error = value - palette.level(nearest) as f32;
            if error == 0.0 {
                continue;
            }
            for &(dx, dy, weight) in kernel.entries {
                let effective_dx = if reverse { -dx } else { dx };
                let nx = x as i32 + effective_dx;
                let ny = y + dy as usize;
                if nx >= 0 && (nx as usize) < width && ny < height {
                    error_buf.add_error(nx as usize, dy as usize, error * weight as f32 / divisor);
                }
            }
        }

        error_buf.advance_row();
    }

    output
}
