use drift_forecast::config::AppConfig;
use drift_forecast::feeds::yahoo::YahooTimeseriesProvider;
use drift_forecast::forecast::run_forecast;

#[tokio::main]
async fn main() {
    // Structured logging on stderr; stdout carries the JSON report
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("drift_forecast starting");

    let cfg = match AppConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            tracing::error!("config error: {e}");
            std::process::exit(1);
        }
    };

    let provider = YahooTimeseriesProvider::new(
        &cfg.rapidapi_base_url,
        &cfg.rapidapi_key,
        &cfg.rapidapi_host,
        cfg.http_timeout_secs,
    );

    let today = chrono::Utc::now().date_naive();
    let report = match run_forecast(&provider, &cfg, today).await {
        Ok(r) => r,
        Err(e) => {
            tracing::error!(symbol = %cfg.symbol, "forecast failed: {e}");
            std::process::exit(1);
        }
    };

    tracing::info!(
        "probability of profit by {}: {:.2}%",
        report.kill_date,
        report.probability * 100.0
    );
    tracing::info!("max daily rise: {:.2}%", report.risk.max_rise * 100.0);
    tracing::info!("max daily drop: {:.2}%", report.risk.max_drop * 100.0);

    match serde_json::to_string(&report) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            tracing::error!("report serialization error: {e}");
            std::process::exit(1);
        }
    }
}
