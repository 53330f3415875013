use crate::errors::{EngineError, EngineResult};
use chrono::NaiveDate;

// ── Price Observations ──

/// One daily close. Invariant: `close > 0` and finite.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct PriceObservation {
    pub date: NaiveDate,
    pub close: f64,
}

impl PriceObservation {
    pub fn new(date: NaiveDate, close: f64) -> EngineResult<Self> {
        if close <= 0.0 || !close.is_finite() {
            return Err(EngineError::DataFormat(format!(
                "invalid close {close} on {date}"
            )));
        }
        Ok(Self { date, close })
    }
}

/// Ordered sequence of observations, strictly ascending by date.
/// Gaps are permitted; projected series are always contiguous.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
#[serde(transparent)]
pub struct PriceSeries {
    observations: Vec<PriceObservation>,
}

impl PriceSeries {
    pub fn new(observations: Vec<PriceObservation>) -> EngineResult<Self> {
        for pair in observations.windows(2) {
            if pair[1].date <= pair[0].date {
                return Err(EngineError::DataFormat(format!(
                    "series not ascending: {} follows {}",
                    pair[1].date, pair[0].date
                )));
            }
        }
        Ok(Self { observations })
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Builder used by the path simulator, which produces dates in order by construction.
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            observations: Vec::with_capacity(capacity),
        }
    }

    pub(crate) fn push_next(&mut self, obs: PriceObservation) {
        debug_assert!(self.last().map_or(true, |l| l.date < obs.date));
        self.observations.push(obs);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    #[inline]
    pub fn first(&self) -> Option<&PriceObservation> {
        self.observations.first()
    }

    #[inline]
    pub fn last(&self) -> Option<&PriceObservation> {
        self.observations.last()
    }

    pub fn observations(&self) -> &[PriceObservation] {
        &self.observations
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PriceObservation> {
        self.observations.iter()
    }

    /// Adjacent fractional returns `(c_i - c_{i-1}) / c_{i-1}`, paired with the date of `c_i`.
    /// Yields nothing for fewer than 2 observations.
    pub fn daily_returns(&self) -> impl Iterator<Item = (NaiveDate, f64)> + '_ {
        self.observations
            .windows(2)
            .map(|w| (w[1].date, fractional_return(w[0].close, w[1].close)))
    }
}

#[inline]
fn fractional_return(prev: f64, curr: f64) -> f64 {
    (curr - prev) / prev
}

// ── Derived Values ──

/// Drift and volatility of historical daily returns.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct ReturnStats {
    pub mean: f64,
    pub stdev: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct RiskExtremes {
    pub max_rise: f64,
    pub max_drop: f64,
}

/// How the trial loop treats the projected path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum TrialMode {
    /// Every trial evaluates the same, already generated path.
    #[default]
    FixedPath,
    /// Every trial regenerates its own path from an independent stream.
    ResampledPerTrial { seed: u64 },
}

impl std::fmt::Display for TrialMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FixedPath => write!(f, "fixed"),
            Self::ResampledPerTrial { .. } => write!(f, "resampled"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationRequest {
    pub trials: i64,
    pub kill_date: NaiveDate,
    pub mode: TrialMode,
}
