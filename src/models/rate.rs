//! Response bodies served on `/fetch-price`.

use serde::{Deserialize, Serialize};

use super::listing::AdListing;

/// Note attached to an aggregate response when no price survived filtering.
pub const NO_VALID_PRICES_NOTE: &str = "No valid prices found";

/// Raw-mode response: the normalized ad book.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SellRates {
    pub sell_rates: Vec<AdListing>,
}

/// Aggregate-mode response: one representative price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AveragePrice {
    /// Mean of the selected prices, `null` when there were none.
    pub average_price: Option<f64>,
    /// Number of prices that went into the mean.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    /// Explanation when `average_price` is `null`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl AveragePrice {
    /// An average over `count` prices.
    pub fn of(average: f64, count: usize) -> Self {
        Self {
            average_price: Some(average),
            count: Some(count),
            note: None,
        }
    }

    /// The empty result: no price passed the filters.
    pub fn no_data() -> Self {
        Self {
            average_price: None,
            count: None,
            note: Some(NO_VALID_PRICES_NOTE.to_string()),
        }
    }
}

/// Either response shape, depending on the configured rate mode.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RateResponse {
    Raw(SellRates),
    Aggregate(AveragePrice),
}
