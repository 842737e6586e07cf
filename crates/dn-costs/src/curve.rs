//! Capacity-indexed equipment cost curves.

use tracing::warn;

use crate::annuity::annualized;
use crate::error::{CostError, CostResult};

/// One capacity bracket of a cost curve.
///
/// Within [cap_min, cap_max] the investment cost is
/// a + b·Q^c + (d + e·Q)·ln(Q), with Q in the curve's native capacity unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostBracket {
    pub cap_min: f64,
    pub cap_max: f64,
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
}

impl CostBracket {
    fn investment(&self, capacity: f64) -> f64 {
        self.a + self.b * capacity.powf(self.c) + (self.d + self.e * capacity) * capacity.ln()
    }
}

/// Sizing outcome for one piece of equipment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Investment {
    /// Total investment cost over all units.
    pub capex: f64,
    /// Number of identical units installed.
    pub units: usize,
}

/// A named equipment cost curve with its financing parameters.
#[derive(Debug, Clone)]
pub struct EquipmentCostCurve {
    name: String,
    /// Brackets sorted by cap_min.
    brackets: Vec<CostBracket>,
    pub interest_rate: f64,
    pub lifetime_yr: f64,
    /// Fixed yearly O&M as a fraction of investment.
    pub om_fraction: f64,
}

impl EquipmentCostCurve {
    pub fn new(
        name: impl Into<String>,
        mut brackets: Vec<CostBracket>,
        interest_rate: f64,
        lifetime_yr: f64,
        om_fraction: f64,
    ) -> CostResult<Self> {
        let name = name.into();
        if brackets.is_empty() {
            return Err(CostError::EmptyCurve { name });
        }
        for b in &brackets {
            if !(b.cap_min < b.cap_max) {
                return Err(CostError::BadBracket {
                    name: name.clone(),
                    cap_min: b.cap_min,
                    cap_max: b.cap_max,
                });
            }
        }
        if !(lifetime_yr > 0.0) {
            return Err(CostError::BadLifetime { name, lifetime_yr });
        }
        brackets.sort_by(|x, y| x.cap_min.total_cmp(&y.cap_min));
        Ok(Self {
            name,
            brackets,
            interest_rate,
            lifetime_yr,
            om_fraction,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn smallest(&self) -> &CostBracket {
        &self.brackets[0]
    }

    fn largest(&self) -> &CostBracket {
        self.brackets.last().expect("curve is non-empty")
    }

    fn bracket_for(&self, capacity: f64) -> &CostBracket {
        self.brackets
            .iter()
            .find(|b| capacity <= b.cap_max)
            .unwrap_or_else(|| self.largest())
    }

    /// Size and price the equipment for a required capacity.
    ///
    /// Zero or negative capacity costs nothing. Below the smallest bracket
    /// the capacity is clamped up to its floor with a warning. Above the
    /// largest bracket the load splits across the fewest identical units
    /// that each fit, and the curve prices one unit times the count.
    pub fn investment(&self, capacity: f64) -> Investment {
        if capacity <= 0.0 {
            return Investment {
                capex: 0.0,
                units: 0,
            };
        }

        let cap_max = self.largest().cap_max;
        let units = if capacity > cap_max {
            (capacity / cap_max).ceil() as usize
        } else {
            1
        };
        let mut per_unit = capacity / units as f64;

        let floor = self.smallest().cap_min;
        if per_unit < floor {
            warn!(
                curve = %self.name,
                capacity = per_unit,
                cap_min = floor,
                "capacity below curve range, clamping to smallest bracket"
            );
            per_unit = floor;
        }

        let capex = self.bracket_for(per_unit).investment(per_unit) * units as f64;
        Investment { capex, units }
    }

    /// Annualized capital cost for a required capacity.
    pub fn annualized_capex(&self, capacity: f64) -> f64 {
        annualized(
            self.investment(capacity).capex,
            self.interest_rate,
            self.lifetime_yr,
        )
    }

    /// Fixed yearly O&M cost for a required capacity.
    pub fn fixed_opex(&self, capacity: f64) -> f64 {
        self.investment(capacity).capex * self.om_fraction
    }
}
