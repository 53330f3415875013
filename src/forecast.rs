use crate::config::{AppConfig, TrialModeSetting};
use crate::errors::{EngineError, EngineResult};
use crate::feeds::HistoricalPriceProvider;
use crate::models::monte_carlo::MonteCarloProfitEstimator;
use crate::models::path::simulate_future_path;
use crate::models::returns::estimate_return_stats;
use crate::models::{NormalSource, RandomSource};
use crate::risk::summary::summarize_risk;
use crate::series::{PriceSeries, ReturnStats, RiskExtremes, SimulationRequest, TrialMode};
use chrono::{Days, NaiveDate};

/// Everything one run derives from the historical series.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ForecastReport {
    pub symbol: String,
    pub kill_date: NaiveDate,
    pub trials: i64,
    pub mode: TrialMode,
    pub history_len: usize,
    pub projected_len: usize,
    pub stats: ReturnStats,
    pub probability: f64,
    pub risk: RiskExtremes,
}

/// Fetch, estimate, project, evaluate. Any failure aborts the run.
pub async fn run_forecast<P: HistoricalPriceProvider>(
    provider: &P,
    config: &AppConfig,
    today: NaiveDate,
) -> EngineResult<ForecastReport> {
    let lookback_start = today
        .checked_sub_days(Days::new(config.lookback_days))
        .ok_or_else(|| EngineError::Config(format!("LOOKBACK_DAYS too large: {}", config.lookback_days)))?;

    tracing::info!(symbol = %config.symbol, %lookback_start, end = %today, "fetching historical data");
    let history = provider.fetch(&config.symbol, lookback_start, today).await?;

    // Resampled mode derives its per-trial streams from this seed as well.
    let seed = match config.sim_seed {
        Some(s) => s,
        None => rand::random(),
    };
    tracing::info!(seed, mode = ?config.trial_mode, "simulation seed");

    let mode = match config.trial_mode {
        TrialModeSetting::Fixed => TrialMode::FixedPath,
        TrialModeSetting::Resampled => TrialMode::ResampledPerTrial { seed },
    };
    let request = SimulationRequest {
        trials: config.trials,
        kill_date: config.kill_date,
        mode,
    };

    let mut source = NormalSource::seeded(seed);
    forecast_from_history(&config.symbol, &history, request, &mut source)
}

/// Core pipeline over an already fetched history.
pub fn forecast_from_history<S: RandomSource + ?Sized>(
    symbol: &str,
    history: &PriceSeries,
    request: SimulationRequest,
    source: &mut S,
) -> EngineResult<ForecastReport> {
    let stats = estimate_return_stats(history)?;
    tracing::info!(
        observations = history.len(),
        mean = stats.mean,
        stdev = stats.stdev,
        "return statistics estimated"
    );

    let projected = simulate_future_path(history, request.kill_date, &stats, source);
    if projected.is_empty() {
        tracing::warn!(kill_date = %request.kill_date, "kill date not after last close, projection is empty");
    }

    tracing::info!(trials = request.trials, mode = %request.mode, "running monte carlo on projected data");
    let estimator = MonteCarloProfitEstimator::new(request);
    let probability = estimator.estimate(history, &stats, &projected)?;

    let risk = summarize_risk(&projected);

    Ok(ForecastReport {
        symbol: symbol.to_string(),
        kill_date: request.kill_date,
        trials: request.trials,
        mode: request.mode,
        history_len: history.len(),
        projected_len: projected.len(),
        stats,
        probability,
        risk,
    })
}
