//! Application configuration loaded from environment variables.
//!
//! Credentials **must** be provided via environment variables:
//! - `BYBIT_API_KEY` — API key for Bybit authentication
//! - `BYBIT_API_SECRET` — API secret used to sign requests
//!
//! Everything else is optional:
//! - `PORT` — listening port (default `3000`)
//! - `BYBIT_BASE_URL` — REST endpoint (default `https://api.bybit.com`)
//! - `P2P_TOKEN` / `P2P_CURRENCY` / `P2P_SIDE` — the book to query
//!   (default `USDT` / `NGN` / `sell`)
//! - `RATE_MODE` — `raw` or `aggregate` (default `aggregate`)
//! - `PRICE_LOWER_BOUND` / `PRICE_UPPER_BOUND` — plausible price band
//!   (default `100` / `2000`, both exclusive)
//! - `PRICE_TOP_N` — how many of the best prices to average (default `20`)
//! - `UPSTREAM_TIMEOUT_SECS` — per-call upstream timeout (default `5`)

use std::str::FromStr;
use std::time::Duration;

use zeroize::Zeroizing;

use crate::P2pRateError;
use crate::models::{AdQuery, DEFAULT_CURRENCY_ID, DEFAULT_TOKEN_ID, Side};

/// Default public REST endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.bybit.com";

/// Default listening port.
pub const DEFAULT_PORT: u16 = 3000;

/// Default lower bound of the plausible price band.
pub const DEFAULT_LOWER_BOUND: f64 = 100.0;

/// Default upper bound of the plausible price band.
pub const DEFAULT_UPPER_BOUND: f64 = 2000.0;

/// Default number of best prices that go into the average.
pub const DEFAULT_TOP_N: usize = 20;

/// Default timeout applied to each upstream call.
pub const DEFAULT_UPSTREAM_TIMEOUT: Duration = Duration::from_secs(5);

/// Top-level application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub mode: RateMode,
    pub upstream: UpstreamConfig,
    pub aggregation: AggregationConfig,
}

/// What `/fetch-price` returns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RateMode {
    /// The normalized ad list, unfiltered.
    Raw,
    /// A single average over the best plausible prices.
    #[default]
    Aggregate,
}

impl FromStr for RateMode {
    type Err = P2pRateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "raw" => Ok(RateMode::Raw),
            "aggregate" => Ok(RateMode::Aggregate),
            other => Err(P2pRateError::Config(format!(
                "RATE_MODE must be `raw` or `aggregate`, got `{other}`"
            ))),
        }
    }
}

/// Bybit connection settings and credentials.
#[derive(Clone)]
pub struct UpstreamConfig {
    pub base_url: String,
    pub api_key: String,
    pub api_secret: Zeroizing<String>,
    pub query: AdQuery,
    pub timeout: Duration,
}

impl std::fmt::Debug for UpstreamConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpstreamConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .field("query", &self.query)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Parameters of the price reduction in aggregate mode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AggregationConfig {
    /// Prices at or below this are discarded.
    pub lower_bound: f64,
    /// Prices at or above this are discarded.
    pub upper_bound: f64,
    /// At most this many of the best remaining prices are averaged.
    pub top_n: usize,
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            lower_bound: DEFAULT_LOWER_BOUND,
            upper_bound: DEFAULT_UPPER_BOUND,
            top_n: DEFAULT_TOP_N,
        }
    }
}

/// Loads the application configuration from environment variables.
///
/// # Errors
///
/// Returns [`P2pRateError::Config`] if a credential is missing, a value
/// cannot be parsed, or the price band is empty.
pub fn fetch_config() -> crate::Result<AppConfig> {
    let api_key = non_empty_var("BYBIT_API_KEY")
        .ok_or_else(|| P2pRateError::Config("BYBIT_API_KEY is missing".to_string()))?;
    let api_secret = non_empty_var("BYBIT_API_SECRET")
        .map(Zeroizing::new)
        .ok_or_else(|| P2pRateError::Config("BYBIT_API_SECRET is missing".to_string()))?;

    let base_url = non_empty_var("BYBIT_BASE_URL")
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
        .trim_end_matches('/')
        .to_string();

    let side = match non_empty_var("P2P_SIDE") {
        Some(raw) => Side::parse(&raw).ok_or_else(|| {
            P2pRateError::Config(format!("P2P_SIDE must be `buy` or `sell`, got `{raw}`"))
        })?,
        None => Side::Sell,
    };
    let query = AdQuery {
        token_id: non_empty_var("P2P_TOKEN").unwrap_or_else(|| DEFAULT_TOKEN_ID.to_string()),
        currency_id: non_empty_var("P2P_CURRENCY")
            .unwrap_or_else(|| DEFAULT_CURRENCY_ID.to_string()),
        side,
    };

    let mode = match non_empty_var("RATE_MODE") {
        Some(raw) => raw.parse()?,
        None => RateMode::default(),
    };

    let aggregation = AggregationConfig {
        lower_bound: parsed_var("PRICE_LOWER_BOUND")?.unwrap_or(DEFAULT_LOWER_BOUND),
        upper_bound: parsed_var("PRICE_UPPER_BOUND")?.unwrap_or(DEFAULT_UPPER_BOUND),
        top_n: parsed_var("PRICE_TOP_N")?.unwrap_or(DEFAULT_TOP_N),
    };
    if !aggregation.lower_bound.is_finite()
        || !aggregation.upper_bound.is_finite()
        || aggregation.lower_bound >= aggregation.upper_bound
    {
        return Err(P2pRateError::Config(format!(
            "PRICE_LOWER_BOUND ({}) must be below PRICE_UPPER_BOUND ({})",
            aggregation.lower_bound, aggregation.upper_bound
        )));
    }
    if aggregation.top_n == 0 {
        return Err(P2pRateError::Config("PRICE_TOP_N must be at least 1".to_string()));
    }

    let timeout = parsed_var::<u64>("UPSTREAM_TIMEOUT_SECS")?
        .map(Duration::from_secs)
        .unwrap_or(DEFAULT_UPSTREAM_TIMEOUT);
    if timeout.is_zero() {
        return Err(P2pRateError::Config("UPSTREAM_TIMEOUT_SECS must be at least 1".to_string()));
    }

    Ok(AppConfig {
        port: parsed_var("PORT")?.unwrap_or(DEFAULT_PORT),
        mode,
        upstream: UpstreamConfig {
            base_url,
            api_key,
            api_secret,
            query,
            timeout,
        },
        aggregation,
    })
}

/// Returns the value of an environment variable if it exists and is non-empty.
fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|s| !s.is_empty())
}

/// Parses a non-empty environment variable, failing on malformed values.
fn parsed_var<T>(name: &str) -> crate::Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    non_empty_var(name)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .map_err(|e| P2pRateError::Config(format!("{name} is invalid (`{raw}`): {e}")))
        })
        .transpose()
}
