//! Simulation horizon sampling.

use dn_project::SamplingDef;

/// Which hours of the demand series to actually solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SamplingStrategy {
    /// Every hour of the series.
    FullYear,
    /// The first week of each month; annual totals scale by the ratio of
    /// series length to sampled length.
    RepresentativeWeeks,
}

impl From<SamplingDef> for SamplingStrategy {
    fn from(def: SamplingDef) -> Self {
        match def {
            SamplingDef::FullYear => SamplingStrategy::FullYear,
            SamplingDef::RepresentativeWeeks => SamplingStrategy::RepresentativeWeeks,
        }
    }
}

/// First hour of each month in a non-leap 8760-hour year.
const MONTH_START_H: [usize; 12] = [
    0, 744, 1416, 2160, 2880, 3624, 4344, 5088, 5832, 6552, 7296, 8016,
];

const WEEK_H: usize = 168;

impl SamplingStrategy {
    /// The sampled hour indices for a series of `hours` entries.
    ///
    /// Representative weeks fall back to the full series when it is shorter
    /// than a standard year.
    pub fn sample_hours(self, hours: usize) -> Vec<usize> {
        match self {
            SamplingStrategy::FullYear => (0..hours).collect(),
            SamplingStrategy::RepresentativeWeeks => {
                if hours < 8760 {
                    return (0..hours).collect();
                }
                MONTH_START_H
                    .iter()
                    .flat_map(|&start| start..start + WEEK_H)
                    .filter(|&h| h < hours)
                    .collect()
            }
        }
    }

    /// Factor scaling sampled-hour sums up to annual totals.
    pub fn annual_scale(self, hours: usize) -> f64 {
        let sampled = self.sample_hours(hours).len();
        if sampled == 0 {
            return 0.0;
        }
        hours as f64 / sampled as f64
    }
}
