//! Shared test utilities: a stubbed Bybit upstream and matching config.

#![allow(dead_code)]

use std::time::Duration;

use serde_json::Value;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};
use zeroize::Zeroizing;

use p2prate::client::{ONLINE_ADS_PATH, SERVER_TIME_PATH};
use p2prate::config::{AggregationConfig, AppConfig, RateMode, UpstreamConfig};
use p2prate::models::AdQuery;

pub const API_KEY: &str = "test-key";
pub const API_SECRET: &str = "test-secret";

pub const SERVER_TIME_JSON: &str = include_str!("../fixtures/server_time.json");
pub const ONLINE_ADS_JSON: &str = include_str!("../fixtures/online_ads.json");
pub const INVALID_ITEMS_JSON: &str = include_str!("../fixtures/online_ads_invalid_items.json");
pub const AUTH_ERROR_JSON: &str = include_str!("../fixtures/auth_error.json");

/// Millisecond timestamp derived from `server_time.json`'s `timeNano`.
pub const SERVER_TIME_MS: &str = "1700000000123";

/// Parses a fixture into a JSON value.
pub fn fixture(json: &str) -> Value {
    serde_json::from_str(json).expect("fixture is valid JSON")
}

/// Upstream config pointing at the stub server.
pub fn upstream_config(base_url: &str) -> UpstreamConfig {
    UpstreamConfig {
        base_url: base_url.to_string(),
        api_key: API_KEY.to_string(),
        api_secret: Zeroizing::new(API_SECRET.to_string()),
        query: AdQuery::default(),
        timeout: Duration::from_secs(2),
    }
}

/// Full application config pointing at the stub server.
pub fn app_config(base_url: &str, mode: RateMode) -> AppConfig {
    AppConfig {
        port: 0,
        mode,
        upstream: upstream_config(base_url),
        aggregation: AggregationConfig::default(),
    }
}

/// Mounts the server-time endpoint with the standard fixture.
pub async fn mount_server_time(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path(SERVER_TIME_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(fixture(SERVER_TIME_JSON)))
        .mount(server)
        .await;
}

/// Mounts the ad-list endpoint with the given response.
pub async fn mount_online_ads(server: &MockServer, response: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path(ONLINE_ADS_PATH))
        .respond_with(response)
        .mount(server)
        .await;
}

/// Starts a stub upstream that answers both endpoints successfully.
pub async fn healthy_upstream() -> MockServer {
    let server = MockServer::start().await;
    mount_server_time(&server).await;
    mount_online_ads(
        &server,
        ResponseTemplate::new(200).set_body_json(fixture(ONLINE_ADS_JSON)),
    )
    .await;
    server
}
