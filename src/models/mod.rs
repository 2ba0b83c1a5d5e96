//! Shared models for the Bybit P2P API and the service's own responses.
//!
//! Contains the ad-list query sent upstream, the normalized ad listing,
//! and the two response shapes served on `/fetch-price`.

pub mod listing;
pub mod rate;

use serde::Serialize;

/// Token queried when nothing else is configured.
pub const DEFAULT_TOKEN_ID: &str = "USDT";

/// Fiat currency queried when nothing else is configured.
pub const DEFAULT_CURRENCY_ID: &str = "NGN";

/// Book side of the ads being queried.
///
/// Serialized with Bybit's wire codes: `"0"` for buy ads, `"1"` for sell ads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum Side {
    #[serde(rename = "0")]
    Buy,
    #[default]
    #[serde(rename = "1")]
    Sell,
}

impl Side {
    /// Returns the wire-format side code expected by the Bybit API.
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Buy => "0",
            Side::Sell => "1",
        }
    }

    /// Parses a side from its name (`buy`/`sell`, any case) or wire code.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "buy" | "0" => Some(Side::Buy),
            "sell" | "1" => Some(Side::Sell),
            _ => None,
        }
    }
}

/// Body of the `POST /v5/p2p/item/online` request.
///
/// Field order is part of the signing contract: the serialized form of
/// this struct is both signed and transmitted, so it must stay
/// `tokenId`, `currencyId`, `side`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdQuery {
    pub token_id: String,
    pub currency_id: String,
    pub side: Side,
}

impl Default for AdQuery {
    fn default() -> Self {
        Self {
            token_id: DEFAULT_TOKEN_ID.to_string(),
            currency_id: DEFAULT_CURRENCY_ID.to_string(),
            side: Side::Sell,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_query_serializes_in_wire_order() {
        let json = serde_json::to_string(&AdQuery::default()).unwrap();
        assert_eq!(json, r#"{"tokenId":"USDT","currencyId":"NGN","side":"1"}"#);
    }

    #[test]
    fn side_parses_names_and_codes() {
        assert_eq!(Side::parse("sell"), Some(Side::Sell));
        assert_eq!(Side::parse(" BUY "), Some(Side::Buy));
        assert_eq!(Side::parse("1"), Some(Side::Sell));
        assert_eq!(Side::parse("0"), Some(Side::Buy));
        assert_eq!(Side::parse("short"), None);
    }

    #[test]
    fn side_wire_codes_match_serde() {
        for side in [Side::Buy, Side::Sell] {
            let json = serde_json::to_string(&side).unwrap();
            assert_eq!(json, format!("\"{}\"", side.as_str()));
        }
    }
}
