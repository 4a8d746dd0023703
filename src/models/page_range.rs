//! 1-based page selections such as `"1-3,5,8-"`.

use std::collections::BTreeSet;
use std::fmt;

use crate::error::ConfigError;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageRange {
    pages: BTreeSet<u32>,
}

impl PageRange {
    pub fn new() -> Self {
        Self::default()
    }

    /// All pages in `start..=end`.
    pub fn from_bounds(start: u32, end: u32) -> Self {
        let mut range = Self::new();
        range.add(start, end);
        range
    }

    /// Parse a comma-separated list of pages and ranges, validated against `total`.
    ///
    /// `"a-"` runs to the last page. Whitespace around numbers is ignored.
    pub fn parse(input: &str, total: u32) -> Result<Self, ConfigError> {
        let invalid = |reason: String| ConfigError::PageRange {
            input: input.to_string(),
            reason,
        };

        let mut range = Self::new();
        for part in input.trim().split(',') {
            let (first, second) = match part.split_once('-') {
                Some((first, second)) => (first, Some(second)),
                None => (part, None),
            };

            let start = page_number(first).map_err(&invalid)?;
            if start > total {
                return Err(invalid(format!(
                    "{} is beyond total number of pages({total})",
                    part.trim()
                )));
            }
            let end = match second {
                Some(s) if s.trim().is_empty() => total,
                Some(s) => {
                    let end = page_number(s).map_err(&invalid)?;
                    if end > total {
                        return Err(invalid(format!(
                            "{} is beyond total number of pages({total})",
                            part.trim()
                        )));
                    }
                    end
                }
                None => start,
            };
            if start > end {
                return Err(invalid(format!("{} is invalid range", part.trim())));
            }
            range.add(start, end);
        }
        Ok(range)
    }

    pub fn add(&mut self, start: u32, end: u32) {
        self.pages.extend(start..=end);
    }

    pub fn contains(&self, page: u32) -> bool {
        self.pages.contains(&page)
    }

    pub fn first(&self) -> Option<u32> {
        self.pages.first().copied()
    }

    pub fn last(&self) -> Option<u32> {
        self.pages.last().copied()
    }

    pub fn count(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Pages in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.pages.iter().copied()
    }

    /// Pages in both selections.
    pub fn intersect(&self, other: &PageRange) -> PageRange {
        PageRange {
            pages: self.pages.intersection(&other.pages).copied().collect(),
        }
    }
}

fn page_number(s: &str) -> Result<u32, String> {
    let n: i64 = s
        .trim()
        .parse()
        .map_err(|_| format!("'{s}' is not page number"))?;
    if n <= 0 {
        return Err(format!("{n} is invalid. Page number must be positive number"));
    }
    u32::try_from(n).map_err(|_| format!("{n} is too large"))
}

impl fmt::Display for PageRange {
    /// Collapses consecutive pages, e.g. `[1-3, 5, 8-10]`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut runs: Vec<(u32, u32)> = Vec::new();
        for page in self.iter() {
            match runs.last_mut() {
                Some((_, end)) if *end + 1 == page => *end = page,
                _ => runs.push((page, page)),
            }
        }
        let parts: Vec<String> = runs
            .iter()
            .map(|&(start, end)| {
                if start == end {
                    start.to_string()
                } else {
                    format!("{start}-{end}")
                }
            })
            .collect();
        write!(f, "[{}]", parts.join(", "))
    }
}
