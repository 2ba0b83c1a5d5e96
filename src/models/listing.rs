//! Normalized P2P ad listing.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single ad from the upstream book.
///
/// Fields are carried through exactly as the upstream sent them (Bybit
/// quotes them as decimal strings, but numbers are accepted too). All four
/// fields are required; an item missing one does not deserialize.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdListing {
    /// Quoted unit price in the fiat currency.
    pub price: Value,
    /// Token quantity still available on the ad.
    pub quantity: Value,
    /// Largest order accepted, in fiat.
    pub max_amount: Value,
    /// Smallest order accepted, in fiat.
    pub min_amount: Value,
}

impl AdListing {
    /// Returns the price as a float, or `None` if it is not a finite number.
    ///
    /// String prices are trimmed before parsing; anything else (null,
    /// booleans, objects) has no price.
    pub fn price_value(&self) -> Option<f64> {
        let parsed = match &self.price {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        parsed.filter(|p| p.is_finite())
    }
}
