//! Bybit v5 request signing.
//!
//! Private endpoints expect an `X-BAPI-SIGN` header carrying
//! `hex(HMAC-SHA256(secret, timestamp + api_key + recv_window + body))`,
//! where `body` is the exact JSON payload sent on the wire. See
//! [Bybit's authentication guide](https://bybit-exchange.github.io/docs/v5/guide#authentication).

use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::Result;

/// Tolerance, in milliseconds, the upstream allows between the request
/// timestamp and its own clock. Sent verbatim and included in the
/// signature.
pub const RECV_WINDOW: &str = "5000";

/// Computes the `X-BAPI-SIGN` header value for a JSON `POST`.
///
/// `timestamp` must be the same string sent in `X-BAPI-TIMESTAMP` and
/// `body` the same bytes sent as the request payload, or the upstream
/// rejects the signature.
///
/// # Errors
///
/// Returns [`P2pRateError::Signing`](crate::P2pRateError::Signing) if
/// the secret is rejected as an HMAC key.
pub fn sign(api_key: &str, api_secret: &str, timestamp: &str, body: &str) -> Result<String> {
    let mut mac = Hmac::<Sha256>::new_from_slice(api_secret.as_bytes())
        .map_err(|e| crate::P2pRateError::Signing(format!("invalid HMAC key: {e}")))?;
    mac.update(timestamp.as_bytes());
    mac.update(api_key.as_bytes());
    mac.update(RECV_WINDOW.as_bytes());
    mac.update(body.as_bytes());
    let result = mac.finalize().into_bytes();

    Ok(hex::encode(result))
}
