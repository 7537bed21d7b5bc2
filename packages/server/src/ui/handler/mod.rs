//! Request handlers.

mod http;
mod websocket;

use std::net::IpAddr;

use axum::http::HeaderMap;

pub use http::{health_check, reserve_room};
pub use websocket::websocket_handler;

/// Best-effort network origin of a caller, used as the rate-limit identity.
///
/// The first `X-Forwarded-For` entry wins, then the socket peer address.
pub(crate) fn client_origin(headers: &HeaderMap, peer: Option<IpAddr>) -> String {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|first| !first.is_empty());

    match (forwarded, peer) {
        (Some(first), _) => first.to_string(),
        (None, Some(ip)) => ip.to_string(),
        (None, None) => "unknown".to_string(),
    }
}
