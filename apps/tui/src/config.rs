use color_eyre::eyre::eyre;
use dotenv::dotenv;
use std::env;
use std::time::Duration;

/// Header name tallied for summary cards and the pie chart when nothing
/// else is configured.
pub const DEFAULT_CATEGORY_COLUMN: &str = "CATEGORY";

const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct Config {
    /// Endpoint returning the sheet payload as a JSON object.
    pub api_url: String,
    /// Header whose values are tallied for the summary/chart display.
    pub category_column: String,
    /// Upper bound on a single fetch. The source behavior is "no timeout";
    /// this is a hardening knob with a generous default.
    pub fetch_timeout: Duration,
}

/// Initializes the application configuration from the environment.
pub fn init_app_config() -> color_eyre::eyre::Result<Config> {
    // Load environment variables from .env file
    dotenv().ok();

    let api_url = env::var("SHEET_API_URL")
        .map_err(|_| eyre!("SHEET_API_URL is not set; point it at the sheet data endpoint"))?;

    if api_url.trim().is_empty() {
        return Err(eyre!("SHEET_API_URL is empty"));
    }

    // Headers are uppercased during normalization, so the configured column
    // name is uppercased too to keep lookups consistent.
    let category_column = env::var("CATEGORY_COLUMN")
        .unwrap_or_else(|_| DEFAULT_CATEGORY_COLUMN.to_string())
        .trim()
        .to_uppercase();

    let fetch_timeout = env::var("FETCH_TIMEOUT_SECS")
        .ok()
        .and_then(|value| value.trim().parse::<u64>().ok())
        .map_or(
            Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
            Duration::from_secs,
        );

    Ok(Config {
        api_url,
        category_column,
        fetch_timeout,
    })
}

pub fn debug_enabled() -> bool {
    env::var("DEBUG").is_ok_and(|value| value == "1")
}
