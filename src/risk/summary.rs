use crate::series::{PriceSeries, RiskExtremes};

/// Largest single-day rise and drop of a series.
/// Both extremes are bounded at zero: an all-positive series reports
/// `max_drop = 0`, an all-negative one `max_rise = 0`.
/// Pure function, no side effects.
pub fn summarize_risk(series: &PriceSeries) -> RiskExtremes {
    let mut max_drop: f64 = 0.0;
    let mut max_rise: f64 = 0.0;

    for (_, change) in series.daily_returns() {
        max_drop = max_drop.min(change);
        max_rise = max_rise.max(change);
    }

    RiskExtremes { max_rise, max_drop }
}
