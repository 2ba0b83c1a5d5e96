use p2prate::P2pRateError;
use p2prate::config::fetch_config;
use p2prate::server::serve;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), P2pRateError> {
    // Initialize tracing subscriber for logging output; RUST_LOG overrides.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let app_config = fetch_config()?;

    serve(app_config).await
}
