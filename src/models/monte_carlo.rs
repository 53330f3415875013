use crate::errors::{EngineError, EngineResult};
use crate::models::path::simulate_future_path;
use crate::models::{trial_seed, NormalSource};
use crate::series::{PriceSeries, ReturnStats, SimulationRequest, TrialMode};
use chrono::NaiveDate;
use rayon::prelude::*;

/// Profit probability over a projected path.
///
/// Dispatches on the request's `TrialMode`:
///   FixedPath          -> every trial re-evaluates `projected`
///   ResampledPerTrial  -> every trial walks a fresh path from `history`
pub struct MonteCarloProfitEstimator {
    request: SimulationRequest,
}

impl MonteCarloProfitEstimator {
    pub fn new(request: SimulationRequest) -> Self {
        Self { request }
    }

    /// `end_date` for resampled paths is the last date of `projected`, or the
    /// kill date when the projection is empty.
    pub fn estimate(
        &self,
        history: &PriceSeries,
        stats: &ReturnStats,
        projected: &PriceSeries,
    ) -> EngineResult<f64> {
        let SimulationRequest { trials, kill_date, mode } = self.request;
        match mode {
            TrialMode::FixedPath => estimate_profit_probability(projected, trials, kill_date),
            TrialMode::ResampledPerTrial { seed } => {
                let end_date = projected.last().map_or(kill_date, |o| o.date);
                estimate_profit_probability_resampled(history, end_date, stats, trials, kill_date, seed)
            }
        }
    }
}

/// Fraction of `trials` whose compounded return up to `kill_date` ends above 1.0.
///
/// The path is not resampled between trials, so all trials share one outcome
/// and the result is either 0.0 or 1.0 regardless of `trials`.
pub fn estimate_profit_probability(
    projected: &PriceSeries,
    trials: i64,
    kill_date: NaiveDate,
) -> EngineResult<f64> {
    let n = validate_trials(trials)?;

    let mut success_count: u64 = 0;
    for _ in 0..n {
        if is_profitable(projected, kill_date) {
            success_count += 1;
        }
    }

    Ok(success_count as f64 / n as f64)
}

/// Monte Carlo with an independently resampled path per trial.
///
/// Trial `k` draws from `NormalSource::seeded(trial_seed(seed, k))`, so the
/// estimate depends only on `seed` and not on how rayon schedules the trials.
/// Successes are counted per worker and summed.
pub fn estimate_profit_probability_resampled(
    history: &PriceSeries,
    end_date: NaiveDate,
    stats: &ReturnStats,
    trials: i64,
    kill_date: NaiveDate,
    seed: u64,
) -> EngineResult<f64> {
    let n = validate_trials(trials)?;

    let success_count: u64 = (0..n)
        .into_par_iter()
        .map(|trial| {
            let mut source = NormalSource::seeded(trial_seed(seed, trial));
            let path = simulate_future_path(history, end_date, stats, &mut source);
            u64::from(is_profitable(&path, kill_date))
        })
        .sum();

    Ok(success_count as f64 / n as f64)
}

#[inline]
fn validate_trials(trials: i64) -> EngineResult<u64> {
    if trials <= 0 {
        return Err(EngineError::InvalidTrialCount(trials));
    }
    Ok(trials as u64)
}

/// One trial: compound daily returns from the second observation onward,
/// stopping at the first date past `kill_date`. Success is strictly > 1.0.
fn is_profitable(path: &PriceSeries, kill_date: NaiveDate) -> bool {
    let mut value = 1.0;
    for (date, change) in path.daily_returns() {
        if date > kill_date {
            break;
        }
        value *= 1.0 + change;
    }
    value > 1.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::fixtures::*;

    #[test]
    fn test_rising_path_is_certain() {
        let path = series_from_closes("2025-01-02", &[100.0, 101.0, 103.0]);
        let p = estimate_profit_probability(&path, 1000, date("2025-01-10")).unwrap();
        assert_eq!(p, 1.0);
    }

    #[test]
    fn test_falling_path_is_zero() {
        let path = series_from_closes("2025-01-02", &[100.0, 99.0, 97.0]);
        let p = estimate_profit_probability(&path, 1000, date("2025-01-10")).unwrap();
        assert_eq!(p, 0.0);
    }

    #[test]
    fn test_flat_path_is_not_success() {
        let path = series_from_closes("2025-01-02", &[100.0, 100.0, 100.0]);
        let p = estimate_profit_probability(&path, 10, date("2025-01-10")).unwrap();
        assert_eq!(p, 0.0, "value == 1.0 must not count as profit");
    }

    #[test]
    fn test_days_after_kill_date_excluded() {
        // Up until 01-03, then a crash on 01-04
        let path = series_from_closes("2025-01-02", &[100.0, 105.0, 50.0]);
        let before = estimate_profit_probability(&path, 5, date("2025-01-03")).unwrap();
        let after = estimate_profit_probability(&path, 5, date("2025-01-04")).unwrap();
        assert_eq!(before, 1.0);
        assert_eq!(after, 0.0);
    }

    #[test]
    fn test_kill_date_before_path_start() {
        let path = series_from_closes("2025-01-02", &[100.0, 120.0]);
        let p = estimate_profit_probability(&path, 5, date("2025-01-01")).unwrap();
        assert_eq!(p, 0.0);
    }

    #[test]
    fn test_empty_and_single_paths() {
        let one = series_from_closes("2025-01-02", &[100.0]);
        assert_eq!(estimate_profit_probability(&PriceSeries::empty(), 3, date("2025-02-01")).unwrap(), 0.0);
        assert_eq!(estimate_profit_probability(&one, 3, date("2025-02-01")).unwrap(), 0.0);
    }

    #[test]
    fn test_invalid_trial_counts() {
        let path = series_from_closes("2025-01-02", &[100.0, 101.0]);
        for trials in [0, -1, -10_000] {
            assert!(
                matches!(
                    estimate_profit_probability(&path, trials, date("2025-01-05")),
                    Err(EngineError::InvalidTrialCount(t)) if t == trials
                ),
                "trials={trials} should be rejected"
            );
        }
    }

    #[test]
    fn test_fixed_path_deterministic() {
        let path = series_from_returns("2025-01-02", &[0.01, -0.02, 0.015, 0.004]);
        let a = estimate_profit_probability(&path, 777, date("2025-01-06")).unwrap();
        let b = estimate_profit_probability(&path, 777, date("2025-01-06")).unwrap();
        assert_eq!(a, b);
        assert!((0.0..=1.0).contains(&a));
    }

    fn history() -> PriceSeries {
        series_from_returns("2024-12-01", &[0.01, -0.015, 0.02, -0.005, 0.012, -0.01, 0.008])
    }

    #[test]
    fn test_resampled_is_fractional_and_reproducible() {
        let stats = ReturnStats { mean: 0.0, stdev: 0.02 };
        let h = history();
        let kill = date("2025-01-08");
        let a = estimate_profit_probability_resampled(&h, kill, &stats, 4000, kill, 21).unwrap();
        let b = estimate_profit_probability_resampled(&h, kill, &stats, 4000, kill, 21).unwrap();
        assert_eq!(a, b, "same seed must give same estimate");

        let single = rayon::ThreadPoolBuilder::new().num_threads(1).build().unwrap();
        let c = single
            .install(|| estimate_profit_probability_resampled(&h, kill, &stats, 4000, kill, 21))
            .unwrap();
        assert_eq!(a.to_bits(), c.to_bits(), "single-threaded run differs: {a} vs {c}");
        assert!(a > 0.3 && a < 0.7, "zero-drift estimate should be near 0.5: {a}");
    }

    #[test]
    fn test_resampled_tracks_drift() {
        let h = history();
        let kill = date("2025-01-08");
        let up = ReturnStats { mean: 0.01, stdev: 0.01 };
        let down = ReturnStats { mean: -0.01, stdev: 0.01 };
        let p_up = estimate_profit_probability_resampled(&h, kill, &up, 2000, kill, 3).unwrap();
        let p_down = estimate_profit_probability_resampled(&h, kill, &down, 2000, kill, 3).unwrap();
        assert!(p_up > 0.9, "positive drift p={p_up}");
        assert!(p_down < 0.1, "negative drift p={p_down}");
    }

    #[test]
    fn test_resampled_rejects_invalid_trials() {
        let stats = ReturnStats { mean: 0.0, stdev: 0.02 };
        let kill = date("2025-01-08");
        let r = estimate_profit_probability_resampled(&history(), kill, &stats, 0, kill, 1);
        assert!(matches!(r, Err(EngineError::InvalidTrialCount(0))));
    }

    #[test]
    fn test_estimator_dispatch() {
        let h = history();
        let kill = date("2025-01-08");
        let stats = ReturnStats { mean: 0.0, stdev: 0.02 };
        let projected = series_from_closes("2024-12-09", &[100.0, 101.0, 102.0]);

        let fixed = MonteCarloProfitEstimator::new(SimulationRequest {
            trials: 100,
            kill_date: kill,
            mode: TrialMode::FixedPath,
        });
        assert_eq!(fixed.estimate(&h, &stats, &projected).unwrap(), 1.0);

        let resampled = MonteCarloProfitEstimator::new(SimulationRequest {
            trials: 2000,
            kill_date: kill,
            mode: TrialMode::ResampledPerTrial { seed: 9 },
        });
        let p = resampled.estimate(&h, &stats, &PriceSeries::empty()).unwrap();
        assert!(p > 0.0 && p < 1.0, "resampled estimate should be fractional: {p}");
    }
}
