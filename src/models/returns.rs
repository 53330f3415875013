use crate::errors::{EngineError, EngineResult};
use crate::series::{PriceSeries, ReturnStats};
use statrs::statistics::Statistics;

/// Drift and volatility of a historical series.
///
/// mean  = (1/n) * sum(r_i)
/// stdev = sqrt((1/n) * sum((r_i - mean)^2))
///
/// Population variance (divisor n, not n - 1), where r_i are the
/// adjacent fractional returns. Pure function.
pub fn estimate_return_stats(series: &PriceSeries) -> EngineResult<ReturnStats> {
    if series.len() < 2 {
        return Err(EngineError::InsufficientData {
            observations: series.len(),
        });
    }

    let returns: Vec<f64> = series.daily_returns().map(|(_, r)| r).collect();

    let mean = returns.iter().mean();
    let stdev = returns.iter().population_std_dev();

    Ok(ReturnStats { mean, stdev })
}
