//! Median-cut palette selection over a grayscale histogram.
//!
//! The histogram is split into boxes of consecutive gray values. Each round
//! the box with the largest `span * population` is cut at its population
//! median, until the requested number of boxes exists or no box can be cut.
//! Every box contributes its population-weighted mean as a palette level.

use crate::error::QuantizeError;
use crate::palette::GrayPalette;

/// Upper bound on the number of palette entries (8-bit indices).
pub const MAX_LEVELS: usize = 256;

/// Median-cut quantizer for grayscale samples.
#[derive(Debug, Clone, Copy)]
pub struct MedianCut {
    max_levels: usize,
}

/// A run of consecutive histogram entries, `start..end`.
#[derive(Debug, Clone, Copy)]
struct CutBox {
    start: usize,
    end: usize,
    population: u64,
}

impl CutBox {
    fn span(&self, entries: &[(u16, u64)]) -> u64 {
        (entries[self.end - 1].0 - entries[self.start].0) as u64
    }

    fn can_split(&self) -> bool {
        self.end - self.start >= 2
    }

    fn mean(&self, entries: &[(u16, u64)]) -> u16 {
        let weighted: u128 = entries[self.start..self.end]
            .iter()
            .map(|&(value, count)| value as u128 * count as u128)
            .sum();
        let population = self.population.max(1) as u128;
        ((weighted + population / 2) / population) as u16
    }
}

impl MedianCut {
    /// Create a quantizer producing at most `max_levels` gray levels.
    pub fn new(max_levels: usize) -> Result<Self, QuantizeError> {
        if max_levels == 0 || max_levels > MAX_LEVELS {
            return Err(QuantizeError::UnsupportedLevelCount { levels: max_levels });
        }
        Ok(Self { max_levels })
    }

    #[inline]
    pub fn max_levels(&self) -> usize {
        self.max_levels
    }

    /// Select a palette for `samples`.
    pub fn palette(&self, samples: &[u16]) -> Result<GrayPalette, QuantizeError> {
        let entries = histogram(samples);
        if entries.is_empty() {
            return Err(QuantizeError::EmptyImage);
        }

        let mut boxes = vec![CutBox {
            start: 0,
            end: entries.len(),
            population: samples.len() as u64,
        }];

        while boxes.len() < self.max_levels {
            let candidate = boxes
                .iter()
                .enumerate()
                .filter(|(_, b)| b.can_split())
                .max_by_key(|(_, b)| b.span(&entries) * b.population)
                .map(|(i, _)| i);
            let Some(index) = candidate else {
                break;
            };
            let (low, high) = split(boxes[index], &entries);
            boxes[index] = low;
            boxes.push(high);
        }

        GrayPalette::new(boxes.iter().map(|b| b.mean(&entries))).ok_or(QuantizeError::EmptyImage)
    }
}

/// Non-empty histogram bins in ascending gray order.
fn histogram(samples: &[u16]) -> Vec<(u16, u64)> {
    let mut bins = vec![0u64; u16::MAX as usize + 1];
    for &s in samples {
        bins[s as usize] += 1;
    }
    bins.iter()
        .enumerate()
        .filter(|(_, &count)| count > 0)
        .map(|(value, &count)| (value as u16, count))
        .collect()
}

/// Cut a box at its population median. Both halves keep at least one entry.
fn split(b: CutBox, entries: &[(u16, u64)]) -> (CutBox, CutBox) {
    let half = b.population / 2;
    let mut cumulative = 0u64;
    let mut cut = b.start + 1;
    for (i, &(_, count)) in entries[b.start..b.end].iter().enumerate() {
        cumulative += count;
        if cumulative >= half {
            cut = b.start + i + 1;
            break;
        }
    }
    let cut = cut.clamp(b.start + 1, b.end - 1);

    let low_population: u64 = entries[b.start..cut].iter().map(|&(_, c)| c).sum();
    (
        CutBox {
            start: b.start,
            end: cut,
            population: low_population,
        },
        CutBox {
            start: cut,
            end: b.end,
            population: b.population - low_population,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_rejects_zero_and_oversized() {
        assert_eq!(
            MedianCut::new(0).unwrap_err(),
            QuantizeError::UnsupportedLevelCount { levels: 0 }
        );
        assert!(MedianCut::new(257).is_err());
        assert!(MedianCut::new(256).is_ok());
    }

    #[test]
    fn test_empty_samples() {
        let quantizer = MedianCut::new(4).unwrap();
        assert_eq!(quantizer.palette(&[]).unwrap_err(), QuantizeError::EmptyImage);
    }

    #[test]
    fn test_few_distinct_values_are_kept_exactly() {
        let quantizer = MedianCut::new(16).unwrap();
        let samples = [10u16, 10, 200, 200, 90, 90, 90];
        let palette = quantizer.palette(&samples).unwrap();
        assert_eq!(palette.levels(), &[10, 90, 200]);
    }

    #[test]
    fn test_gradient_is_reduced_to_requested_levels() {
        let quantizer = MedianCut::new(16).unwrap();
        let samples: Vec<u16> = (0..=255u16).collect();
        let palette = quantizer.palette(&samples).unwrap();
        assert_eq!(palette.len(), 16);
        // Levels of a uniform gradient spread over the whole range
        assert!(palette.level(0) < 16);
        assert!(palette.level(15) > 239);
    }

    #[test]
    fn test_single_level() {
        let quantizer = MedianCut::new(1).unwrap();
        let palette = quantizer.palette(&[0, 100, 200]).unwrap();
        assert_eq!(palette.levels(), &[100]);
    }

    #[test]
    fn test_population_pulls_level() {
        let quantizer = MedianCut::new(1).unwrap();
        let mut samples = vec![0u16; 90];
        samples.extend(vec![100u16; 10]);
        let palette = quantizer.palette(&samples).unwrap();
        assert_eq!(palette.levels(), &[10]);
    }
}
