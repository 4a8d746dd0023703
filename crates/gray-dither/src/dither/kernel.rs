//! Error diffusion kernel definitions.

/// An error diffusion kernel.
///
/// Each entry is `(dx, dy, weight)`; a neighbor receives
/// `error * weight / divisor`. `max_dy` is how many rows ahead the kernel
/// reaches, which sizes the error buffer at `max_dy + 1` rows.
#[derive(Debug, Clone, Copy)]
pub struct Kernel {
    pub entries: &'static [(i32, i32, u8)],
    pub divisor: u8,
    pub max_dy: usize,
}

/// Floyd-Steinberg dithering kernel.
///
/// Distributes error to 4 neighbors with 100% total propagation (16/16).
///
/// ```text
///        X   7
///    3   5   1
/// ```
pub const FLOYD_STEINBERG: Kernel = Kernel {
    entries: &[
        (1, 0, 7),  // right
        (-1, 1, 3), // bottom-left
        (0, 1, 5),  // bottom
        (1, 1, 1),  // bottom-right
    ],
    divisor: 16,
    max_dy: 1,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_floyd_steinberg_propagation_100_percent() {
        let sum: u8 = FLOYD_STEINBERG.entries.iter().map(|(_, _, w)| w).sum();
        assert_eq!(sum, 16, "Floyd-Steinberg weights should sum to 16");
        assert_eq!(FLOYD_STEINBERG.divisor, 16);
    }

    #[test]
    fn test_floyd_steinberg_max_dy() {
        let actual_max_dy = FLOYD_STEINBERG
            .entries
            .iter()
            .map(|(_, dy, _)| *dy as usize)
            .max()
            .unwrap();
        assert_eq!(actual_max_dy, FLOYD_STEINBERG.max_dy);
    }
}
