//! Capital recovery.

/// Annuity factor IR·(1+IR)^LT / ((1+IR)^LT − 1). Zero interest degenerates
/// to straight-line depreciation 1/LT.
pub fn annuity_factor(interest_rate: f64, lifetime_yr: f64) -> f64 {
    if interest_rate == 0.0 {
        return 1.0 / lifetime_yr;
    }
    let growth = (1.0 + interest_rate).powf(lifetime_yr);
    interest_rate * growth / (growth - 1.0)
}

/// Annualized capital cost of an investment.
pub fn annualized(capex: f64, interest_rate: f64, lifetime_yr: f64) -> f64 {
    capex * annuity_factor(interest_rate, lifetime_yr)
}
