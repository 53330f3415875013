pub mod yahoo;

use crate::errors::EngineResult;
use crate::series::PriceSeries;
use chrono::NaiveDate;
use std::future::Future;

/// Source of historical daily closes.
/// Failures are fatal to the pipeline; implementations do not retry.
pub trait HistoricalPriceProvider: Send + Sync {
    fn fetch(
        &self,
        symbol: &str,
        lookback_start: NaiveDate,
        lookback_end: NaiveDate,
    ) -> impl Future<Output = EngineResult<PriceSeries>> + Send;
}
