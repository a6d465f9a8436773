use std::convert::Infallible;
use std::net::SocketAddr;

use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::HeaderMap;
use axum::http::request::Parts;

/// Best-effort identity of the caller, for rate limiting.
///
/// Taken from the first `X-Forwarded-For` address, then `X-Real-IP`, then
/// the socket peer address. `None` when none of these is available.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientKey(pub Option<String>);

impl ClientKey {
    /// The caller key, or a fixed per-form key when the caller is unknown.
    pub fn or_placeholder(&self, form: &str) -> String {
        self.0.clone().unwrap_or_else(|| format!("{form}-form"))
    }
}

fn header_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

pub fn forwarded_ip(headers: &HeaderMap) -> Option<String> {
    if let Some(forwarded) = header_value(headers, "x-forwarded-for")
        && let Some(first) = forwarded.split(',').map(str::trim).find(|s| !s.is_empty())
    {
        return Some(first.to_string());
    }
    header_value(headers, "x-real-ip").map(str::to_string)
}

impl<S> FromRequestParts<S> for ClientKey
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let key = forwarded_ip(&parts.headers).or_else(|| {
            parts
                .extensions
                .get::<ConnectInfo<SocketAddr>>()
                .map(|ConnectInfo(addr)| addr.ip().to_string())
        });
        Ok(Self(key))
    }
}
