//! HTTP surface of the service.
//!
//! Two routes: `GET /` answers a liveness probe, `GET /fetch-price`
//! performs one full upstream round trip and returns either the raw ad
//! list or an aggregate price depending on [`RateMode`]. Any failure is
//! logged here and turned into a 500 with a generic body.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::get;
use serde_json::json;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::aggregator::summarize;
use crate::client::P2pClient;
use crate::config::{AggregationConfig, AppConfig, RateMode};
use crate::models::rate::{RateResponse, SellRates};
use crate::{P2pRateError, Result};

/// Body text of the liveness route.
pub const LIVENESS_MESSAGE: &str = "Server is running";

/// Error message returned to callers; details stay in the logs.
pub const FETCH_FAILED_MESSAGE: &str = "Failed to fetch rates";

/// Shared, read-only state handed to every request.
#[derive(Clone)]
pub struct AppState {
    pub client: Arc<P2pClient>,
    pub mode: RateMode,
    pub aggregation: AggregationConfig,
}

impl AppState {
    /// Builds the upstream client from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`P2pRateError::Config`] if the HTTP client cannot be built.
    pub fn new(config: &AppConfig) -> Result<Self> {
        Ok(Self {
            client: Arc::new(P2pClient::new(config.upstream.clone())?),
            mode: config.mode,
            aggregation: config.aggregation,
        })
    }
}

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(liveness))
        .route("/fetch-price", get(fetch_price))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Binds `0.0.0.0:{port}` and serves until Ctrl-C.
///
/// # Errors
///
/// Returns an error if the state cannot be built or the listener fails.
pub async fn serve(config: AppConfig) -> Result<()> {
    let state = AppState::new(&config)?;
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, mode = ?config.mode, "Server running");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}

async fn liveness() -> &'static str {
    LIVENESS_MESSAGE
}

async fn fetch_price(State(state): State<AppState>) -> Result<Json<RateResponse>> {
    let listings = state.client.fetch_ad_listings().await?;

    let response = match state.mode {
        RateMode::Raw => RateResponse::Raw(SellRates {
            sell_rates: listings,
        }),
        RateMode::Aggregate => RateResponse::Aggregate(summarize(
            &listings,
            &state.aggregation,
            state.client.query().side,
        )),
    };
    Ok(Json(response))
}

impl IntoResponse for P2pRateError {
    fn into_response(self) -> Response {
        error!(error = %self, "failed to fetch rates");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": FETCH_FAILED_MESSAGE })),
        )
            .into_response()
    }
}
