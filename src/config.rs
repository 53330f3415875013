use crate::errors::{EngineError, EngineResult};
use chrono::NaiveDate;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrialModeSetting {
    Fixed,
    Resampled,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub symbol: String,
    pub kill_date: NaiveDate,
    pub trials: i64,
    pub lookback_days: u64,
    pub trial_mode: TrialModeSetting,
    pub sim_seed: Option<u64>,
    pub rapidapi_key: String,
    pub rapidapi_host: String,
    pub rapidapi_base_url: String,
    pub http_timeout_secs: u64,
}

impl AppConfig {
    pub fn from_env() -> EngineResult<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup, so tests need not touch the process environment.
    pub fn from_lookup<F>(lookup: F) -> EngineResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env_var = |key: &str| -> EngineResult<String> {
            lookup(key).ok_or_else(|| EngineError::Config(format!("missing env var: {key}")))
        };
        let env_var_or = |key: &str, default: &str| -> String {
            lookup(key).unwrap_or_else(|| default.to_string())
        };

        let kill_date_raw = env_var("KILL_DATE")?;
        let kill_date = NaiveDate::parse_from_str(kill_date_raw.trim(), "%Y-%m-%d")
            .map_err(|e| EngineError::Config(format!("KILL_DATE: {e}")))?;

        let trials = env_var_or("TRIALS", "10000")
            .parse::<i64>()
            .map_err(|e| EngineError::Config(format!("TRIALS: {e}")))?;

        let lookback_days = env_var_or("LOOKBACK_DAYS", "180")
            .parse::<u64>()
            .map_err(|e| EngineError::Config(format!("LOOKBACK_DAYS: {e}")))?;

        let trial_mode = match env_var_or("TRIAL_MODE", "fixed").to_ascii_lowercase().as_str() {
            "fixed" => TrialModeSetting::Fixed,
            "resampled" => TrialModeSetting::Resampled,
            other => {
                return Err(EngineError::Config(format!(
                    "TRIAL_MODE: expected fixed or resampled, got {other}"
                )))
            }
        };

        let sim_seed = lookup("SIM_SEED")
            .map(|s| {
                s.parse::<u64>()
                    .map_err(|e| EngineError::Config(format!("SIM_SEED: {e}")))
            })
            .transpose()?;

        let http_timeout_secs = env_var_or("HTTP_TIMEOUT_SECS", "10")
            .parse::<u64>()
            .map_err(|e| EngineError::Config(format!("HTTP_TIMEOUT_SECS: {e}")))?;

        Ok(Self {
            symbol: env_var_or("SYMBOL", "GILD"),
            kill_date,
            trials,
            lookback_days,
            trial_mode,
            sim_seed,
            rapidapi_key: env_var("RAPIDAPI_KEY")?,
            rapidapi_host: env_var_or("RAPIDAPI_HOST", "apidojo-yahoo-finance-v1.p.rapidapi.com"),
            rapidapi_base_url: env_var_or(
                "RAPIDAPI_BASE_URL",
                "https://apidojo-yahoo-finance-v1.p.rapidapi.com",
            ),
            http_timeout_secs,
        })
    }
}
