//! Code for working with years.
use anyhow::{Result, ensure};

/// The first year covered by the EIA state energy tables
pub const FIRST_YEAR: u32 = 1960;

/// The last year covered by the EIA state energy tables
pub const LAST_YEAR: u32 = 2022;

/// An inclusive, non-empty range of years.
///
/// Stepping saturates at either end: there is no wraparound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearRange {
    first: u32,
    last: u32,
}

impl Default for YearRange {
    fn default() -> Self {
        Self {
            first: FIRST_YEAR,
            last: LAST_YEAR,
        }
    }
}

impl YearRange {
    /// Create a new range, checking that `first <= last`
    pub fn new(first: u32, last: u32) -> Result<Self> {
        ensure!(
            first <= last,
            "First year ({first}) must not be later than last year ({last})"
        );

        Ok(Self { first, last })
    }

    /// The earliest year in the range
    pub fn first(&self) -> u32 {
        self.first
    }

    /// The latest year in the range
    pub fn last(&self) -> u32 {
        self.last
    }

    /// Whether `year` lies within the range
    pub fn contains(&self, year: u32) -> bool {
        (self.first..=self.last).contains(&year)
    }

    /// Bring `year` into the range
    pub fn clamp(&self, year: u32) -> u32 {
        year.clamp(self.first, self.last)
    }

    /// The year before `year`, or `year` itself if it is already the first
    pub fn previous(&self, year: u32) -> u32 {
        self.clamp(year.saturating_sub(1))
    }

    /// The year after `year`, or `year` itself if it is already the last
    pub fn next(&self, year: u32) -> u32 {
        self.clamp(year.saturating_add(1))
    }
}
