//! Reduces an ad book to one representative price.
//!
//! The upstream book can hold typos and stale posts, so prices are
//! first restricted to a plausible band and only the most competitive
//! remaining ones are averaged. For a sell book the most competitive
//! prices are the highest; for a buy book, the lowest.

use tracing::debug;

use crate::config::AggregationConfig;
use crate::models::Side;
use crate::models::listing::AdListing;
use crate::models::rate::AveragePrice;

/// Parses every listing's price, silently dropping the unparseable ones.
pub fn extract_prices(listings: &[AdListing]) -> Vec<f64> {
    listings.iter().filter_map(AdListing::price_value).collect()
}

/// Keeps prices strictly inside `(lower, upper)`, preserving order.
pub fn filter_plausible(prices: &[f64], lower: f64, upper: f64) -> Vec<f64> {
    prices
        .iter()
        .copied()
        .filter(|&p| p > lower && p < upper)
        .collect()
}

/// Returns at most `n` prices, best first for the given side.
pub fn top_n(prices: &[f64], n: usize, side: Side) -> Vec<f64> {
    let mut sorted = prices.to_vec();
    match side {
        Side::Sell => sorted.sort_by(|a, b| b.total_cmp(a)),
        Side::Buy => sorted.sort_by(|a, b| a.total_cmp(b)),
    }
    sorted.truncate(n);
    sorted
}

/// Arithmetic mean, or `None` when there is nothing to average.
pub fn average(prices: &[f64]) -> Option<f64> {
    if prices.is_empty() {
        return None;
    }
    Some(prices.iter().sum::<f64>() / prices.len() as f64)
}

/// Runs the full reduction: extract, band filter, top-N, average.
pub fn summarize(listings: &[AdListing], config: &AggregationConfig, side: Side) -> AveragePrice {
    let prices = extract_prices(listings);
    let plausible = filter_plausible(&prices, config.lower_bound, config.upper_bound);
    let best = top_n(&plausible, config.top_n, side);
    debug!(
        listings = listings.len(),
        parsed = prices.len(),
        plausible = plausible.len(),
        averaged = best.len(),
        "aggregated ad prices"
    );

    match average(&best) {
        Some(mean) => AveragePrice::of(mean, best.len()),
        None => AveragePrice::no_data(),
    }
}
