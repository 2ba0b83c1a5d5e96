//! Bybit P2P REST client.
//!
//! Every ad-list fetch makes two sequential calls: the public
//! [server time](https://bybit-exchange.github.io/docs/v5/market/time)
//! endpoint, so the request timestamp is on the upstream's clock, then
//! the signed `POST /v5/p2p/item/online`. Nothing is retried.

use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::auth::{RECV_WINDOW, sign};
use crate::config::UpstreamConfig;
use crate::models::AdQuery;
use crate::models::listing::AdListing;
use crate::{P2pRateError, Result};

/// Public endpoint returning the upstream clock.
pub const SERVER_TIME_PATH: &str = "/v5/market/time";

/// Private endpoint listing the online ads for a token/fiat pair.
pub const ONLINE_ADS_PATH: &str = "/v5/p2p/item/online";

/// Signed client for the Bybit P2P API.
///
/// Holds one pooled [`reqwest::Client`]; cheap to share behind an `Arc`.
#[derive(Debug)]
pub struct P2pClient {
    http: reqwest::Client,
    config: UpstreamConfig,
}

impl P2pClient {
    /// Builds a client whose every request is bounded by `config.timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`P2pRateError::Config`] if the HTTP client cannot be built.
    pub fn new(config: UpstreamConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| P2pRateError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { http, config })
    }

    /// The ad book this client queries.
    pub fn query(&self) -> &AdQuery {
        &self.config.query
    }

    /// Returns the upstream's current time in milliseconds.
    ///
    /// # Errors
    ///
    /// Returns [`P2pRateError::UpstreamUnavailable`] if the call fails,
    /// reports a non-zero `retCode`, or lacks `result.timeNano`.
    pub async fn server_time_ms(&self) -> Result<u64> {
        let url = format!("{}{SERVER_TIME_PATH}", self.config.base_url);
        let body: Value = self
            .http
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        check_ret_code(&body, SERVER_TIME_PATH)?;

        let nanos = match &body["result"]["timeNano"] {
            Value::String(s) => s.trim().parse::<u64>().ok(),
            Value::Number(n) => n.as_u64(),
            _ => None,
        }
        .ok_or_else(|| {
            P2pRateError::UpstreamUnavailable(
                "server time response lacks result.timeNano".to_string(),
            )
        })?;

        Ok(nanos / 1_000_000)
    }

    /// Fetches the current online ads for the configured book.
    ///
    /// The JSON body is serialized once; the same string is signed and
    /// sent, so key order and whitespace always agree with the signature.
    ///
    /// # Errors
    ///
    /// Returns [`P2pRateError::UpstreamUnavailable`] on transport failure,
    /// timeout, non-2xx status, or non-zero `retCode`, and
    /// [`P2pRateError::InvalidUpstreamResponse`] if the payload has no
    /// `result.items` array.
    pub async fn fetch_ad_listings(&self) -> Result<Vec<AdListing>> {
        let timestamp = self.server_time_ms().await?.to_string();
        let payload = serde_json::to_string(&self.config.query)?;
        let signature = sign(
            &self.config.api_key,
            &self.config.api_secret,
            &timestamp,
            &payload,
        )?;
        debug!(%timestamp, %payload, "signed ad list request");

        let url = format!("{}{ONLINE_ADS_PATH}", self.config.base_url);
        let response = self
            .http
            .post(&url)
            .header(CONTENT_TYPE, "application/json")
            .header("X-BAPI-API-KEY", &self.config.api_key)
            .header("X-BAPI-TIMESTAMP", &timestamp)
            .header("X-BAPI-RECV-WINDOW", RECV_WINDOW)
            .header("X-BAPI-SIGN", &signature)
            .body(payload)
            .send()
            .await?
            .error_for_status()?;

        let text = response.text().await?;
        let body: Value = serde_json::from_str(&text).map_err(|e| {
            P2pRateError::InvalidUpstreamResponse(format!("ad list is not valid JSON: {e}"))
        })?;
        check_ret_code(&body, ONLINE_ADS_PATH)?;

        let listings = parse_ad_listings(&body)?;
        info!(
            count = listings.len(),
            token = %self.config.query.token_id,
            currency = %self.config.query.currency_id,
            "fetched P2P ads"
        );
        Ok(listings)
    }
}

/// Extracts the ads under `result.items` of an ad-list response.
///
/// # Errors
///
/// Returns [`P2pRateError::InvalidUpstreamResponse`] if `result.items`
/// is missing, is not an array, or holds an entry that is not an object
/// carrying `price`, `quantity`, `maxAmount` and `minAmount`.
pub fn parse_ad_listings(body: &Value) -> Result<Vec<AdListing>> {
    let items = body["result"]["items"].as_array().ok_or_else(|| {
        P2pRateError::InvalidUpstreamResponse("result.items is missing or not a list".to_string())
    })?;

    items
        .iter()
        .map(|item| {
            AdListing::deserialize(item).map_err(|e| {
                P2pRateError::InvalidUpstreamResponse(format!("malformed ad item: {e}"))
            })
        })
        .collect()
}

/// Fails if the envelope carries a non-zero `retCode`.
///
/// Bybit reports most API-level failures with HTTP 200 and a non-zero
/// `retCode`; a missing code is tolerated.
fn check_ret_code(body: &Value, endpoint: &str) -> Result<()> {
    if let Some(code) = body["retCode"].as_i64()
        && code != 0
    {
        let message = body["retMsg"].as_str().unwrap_or("no message");
        return Err(P2pRateError::UpstreamUnavailable(format!(
            "{endpoint} returned retCode {code}: {message}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn parses_items_verbatim() {
        let body = json!({
            "retCode": 0,
            "retMsg": "SUCCESS",
            "result": {
                "count": 2,
                "items": [
                    { "price": "1540.5", "quantity": "100", "maxAmount": "150000", "minAmount": "2000", "nickName": "a" },
                    { "price": 1538, "quantity": 12.5, "maxAmount": "90000", "minAmount": "1000" }
                ]
            }
        });
        let listings = parse_ad_listings(&body).unwrap();
        assert_eq!(listings.len(), 2);
        assert_eq!(listings[0].price, json!("1540.5"));
        assert_eq!(listings[1].price, json!(1538));
        assert_eq!(listings[1].quantity, json!(12.5));
    }

    #[test]
    fn empty_items_is_an_empty_book() {
        let body = json!({ "result": { "items": [] } });
        assert!(parse_ad_listings(&body).unwrap().is_empty());
    }

    #[test]
    fn rejects_missing_items() {
        let body = json!({ "result": {} });
        assert!(matches!(
            parse_ad_listings(&body),
            Err(P2pRateError::InvalidUpstreamResponse(_))
        ));
    }

    #[test]
    fn rejects_non_array_items() {
        let body = json!({ "result": { "items": "nope" } });
        assert!(matches!(
            parse_ad_listings(&body),
            Err(P2pRateError::InvalidUpstreamResponse(_))
        ));
    }

    #[test]
    fn rejects_non_object_item() {
        let body = json!({ "result": { "items": [42] } });
        assert!(matches!(
            parse_ad_listings(&body),
            Err(P2pRateError::InvalidUpstreamResponse(_))
        ));
    }

    #[test]
    fn rejects_item_missing_a_field() {
        let body = json!({
            "result": {
                "items": [
                    { "price": "1500", "quantity": "10", "maxAmount": "90000", "minAmount": "1000" },
                    { "price": "1500" }
                ]
            }
        });
        assert!(matches!(
            parse_ad_listings(&body),
            Err(P2pRateError::InvalidUpstreamResponse(_))
        ));
    }

    #[test]
    fn ret_code_zero_or_absent_passes() {
        assert!(check_ret_code(&json!({ "retCode": 0 }), ONLINE_ADS_PATH).is_ok());
        assert!(check_ret_code(&json!({}), ONLINE_ADS_PATH).is_ok());
    }

    #[test]
    fn non_zero_ret_code_is_unavailable() {
        let err = check_ret_code(
            &json!({ "retCode": 10003, "retMsg": "API key is invalid." }),
            ONLINE_ADS_PATH,
        )
        .unwrap_err();
        assert!(matches!(err, P2pRateError::UpstreamUnavailable(_)));
        assert!(err.to_string().contains("10003"));
        assert!(err.to_string().contains("API key is invalid."));
    }
}
