use crate::errors::{EngineError, EngineResult};
use crate::feeds::HistoricalPriceProvider;
use crate::series::{PriceObservation, PriceSeries};
use chrono::{DateTime, NaiveDate, NaiveTime};
use reqwest::Client;
use std::collections::BTreeMap;

/// RapidAPI Yahoo Finance timeseries client.
/// Credentials and endpoint come from config; nothing is embedded here.
#[derive(Clone)]
pub struct YahooTimeseriesProvider {
    client: Client,
    base_url: String,
    api_key: String,
    api_host: String,
}

impl YahooTimeseriesProvider {
    pub fn new(base_url: &str, api_key: &str, api_host: &str, timeout_secs: u64) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(timeout_secs))
                .build()
                .unwrap_or_default(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            api_host: api_host.to_string(),
        }
    }
}

impl HistoricalPriceProvider for YahooTimeseriesProvider {
    async fn fetch(
        &self,
        symbol: &str,
        lookback_start: NaiveDate,
        lookback_end: NaiveDate,
    ) -> EngineResult<PriceSeries> {
        if lookback_start >= lookback_end {
            return Err(EngineError::InvalidDateRange {
                start: lookback_start,
                end: lookback_end,
            });
        }

        let url = format!("{}/stock/v2/get-timeseries", self.base_url);
        let period1 = epoch_seconds(lookback_start);
        let period2 = epoch_seconds(lookback_end);

        tracing::debug!(symbol, period1, period2, "requesting timeseries");

        let resp = self
            .client
            .get(&url)
            .query(&[
                ("symbol", symbol.to_string()),
                ("period1", period1.to_string()),
                ("period2", period2.to_string()),
                ("region", "US".to_string()),
            ])
            .header("X-RapidAPI-Key", &self.api_key)
            .header("X-RapidAPI-Host", &self.api_host)
            .send()
            .await
            .map_err(|e| EngineError::Network(format!("request failed: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(EngineError::Network(format!("HTTP {status}: {body}")));
        }

        let body = resp
            .text()
            .await
            .map_err(|e| EngineError::Network(format!("read body: {e}")))?;

        let series = parse_timeseries(&body)?;
        tracing::info!(symbol, observations = series.len(), "historical closes fetched");
        Ok(series)
    }
}

#[inline]
fn epoch_seconds(date: NaiveDate) -> i64 {
    date.and_time(NaiveTime::MIN).and_utc().timestamp()
}

// Response shape (abridged):
// {
//   "timestamp": [1718631000, 1718717400, ...],
//   "indicators": {
//     "quote": [ { "close": [68.12, null, 68.40, ...], ... } ]
//   }
// }

#[derive(serde::Deserialize)]
struct TimeseriesResponse {
    timestamp: Option<Vec<i64>>,
    indicators: Option<Indicators>,
}

#[derive(serde::Deserialize)]
struct Indicators {
    quote: Option<Vec<QuoteBlock>>,
}

#[derive(serde::Deserialize)]
struct QuoteBlock {
    close: Option<Vec<Option<f64>>>,
}

/// Turn a timeseries payload into a date-ascending series.
/// Null or non-positive closes are skipped; a later timestamp on the same UTC date wins.
pub fn parse_timeseries(body: &str) -> EngineResult<PriceSeries> {
    let data: TimeseriesResponse = serde_json::from_str(body)?;

    let timestamps = data
        .timestamp
        .ok_or_else(|| EngineError::DataFormat("missing timestamp array".into()))?;

    let closes = data
        .indicators
        .and_then(|i| i.quote)
        .and_then(|q| q.into_iter().next())
        .and_then(|q| q.close)
        .ok_or_else(|| EngineError::DataFormat("missing indicators.quote[0].close".into()))?;

    let mut points: Vec<(i64, f64)> = timestamps
        .iter()
        .zip(closes.iter())
        .filter_map(|(&ts, close)| close.map(|c| (ts, c)))
        .filter(|&(_, c)| c > 0.0 && c.is_finite())
        .collect();
    points.sort_by_key(|&(ts, _)| ts);

    let mut by_date: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for (ts, close) in points {
        let date = DateTime::from_timestamp(ts, 0)
            .ok_or_else(|| EngineError::DataFormat(format!("timestamp out of range: {ts}")))?
            .date_naive();
        by_date.insert(date, close);
    }

    let observations = by_date
        .into_iter()
        .map(|(date, close)| PriceObservation::new(date, close))
        .collect::<EngineResult<Vec<_>>>()?;

    PriceSeries::new(observations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::fixtures::date;

    #[test]
    fn test_parse_skips_nulls_and_sorts() {
        // 2025-01-03, 2025-01-01, 2025-01-02 (14:30 UTC)
        let body = r#"{
            "timestamp": [1735914600, 1735741800, 1735828200],
            "indicators": { "quote": [ { "close": [63.0, 61.5, null] } ] }
        }"#;
        let s = parse_timeseries(body).unwrap();
        assert_eq!(s.len(), 2);
        assert_eq!(s.observations()[0].date, date("2025-01-01"));
        assert_eq!(s.observations()[0].close, 61.5);
        assert_eq!(s.observations()[1].date, date("2025-01-03"));
        assert_eq!(s.observations()[1].close, 63.0);
    }

    #[test]
    fn test_parse_ignores_excess_timestamps() {
        let body = r#"{
            "timestamp": [1735741800, 1735828200, 1735914600],
            "indicators": { "quote": [ { "close": [61.5, 62.0] } ] }
        }"#;
        let s = parse_timeseries(body).unwrap();
        assert_eq!(s.len(), 2);
    }

    #[test]
    fn test_parse_same_day_last_wins() {
        // Two stamps on 2025-01-01 UTC
        let body = r#"{
            "timestamp": [1735741800, 1735700000],
            "indicators": { "quote": [ { "close": [61.5, 60.0] } ] }
        }"#;
        let s = parse_timeseries(body).unwrap();
        assert_eq!(s.len(), 1);
        assert_eq!(s.observations()[0].close, 61.5);
    }

    #[test]
    fn test_parse_skips_non_positive_closes() {
        let body = r#"{
            "timestamp": [1735741800, 1735828200, 1735914600],
            "indicators": { "quote": [ { "close": [0.0, -1.0, 61.5] } ] }
        }"#;
        let s = parse_timeseries(body).unwrap();
        assert_eq!(s.len(), 1);
        assert_eq!(s.observations()[0].date, date("2025-01-03"));
        assert_eq!(s.observations()[0].close, 61.5);
    }

    #[test]
    fn test_parse_missing_fields() {
        assert!(matches!(
            parse_timeseries(r#"{"indicators": {"quote": [{"close": [1.0]}]}}"#),
            Err(EngineError::DataFormat(_))
        ));
        assert!(matches!(
            parse_timeseries(r#"{"timestamp": [1735741800], "indicators": {}}"#),
            Err(EngineError::DataFormat(_))
        ));
        assert!(matches!(parse_timeseries("not json"), Err(EngineError::DataFormat(_))));
    }

    #[test]
    fn test_epoch_seconds() {
        assert_eq!(epoch_seconds(date("1970-01-02")), 86_400);
    }

    #[tokio::test]
    async fn test_fetch_rejects_inverted_range() {
        let provider = YahooTimeseriesProvider::new("http://127.0.0.1:9", "k", "h", 1);
        let r = provider
            .fetch("GILD", date("2025-02-01"), date("2025-01-01"))
            .await;
        assert!(matches!(r, Err(EngineError::InvalidDateRange { .. })));
    }
}
