pub mod config;
pub mod errors;
pub mod feeds;
pub mod forecast;
pub mod models;
pub mod risk;
pub mod series;

pub use errors::{EngineError, EngineResult};
pub use feeds::HistoricalPriceProvider;
pub use models::monte_carlo::{
    estimate_profit_probability, estimate_profit_probability_resampled, MonteCarloProfitEstimator,
};
pub use models::path::simulate_future_path;
pub use models::returns::estimate_return_stats;
pub use models::{NormalSource, RandomSource};
pub use risk::summary::summarize_risk;
pub use series::{
    PriceObservation, PriceSeries, ReturnStats, RiskExtremes, SimulationRequest, TrialMode,
};
