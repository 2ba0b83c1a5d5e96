//! P2P market-rate service.
//!
//! Fetches the online ad book for one token/fiat pair from the Bybit P2P
//! API with a signed request, then either returns the normalized ads as
//! they are or reduces their prices to a single average rate.

pub mod aggregator;
pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod server;

pub use error::{P2pRateError, Result};
