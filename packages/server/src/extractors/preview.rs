use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::extract::CookieJar;
use sha2::{Digest, Sha256};

use crate::contentful::ContentMode;
use crate::state::AppState;

/// Name of the cookie that marks a preview session.
pub const PREVIEW_COOKIE: &str = "__site_preview";

/// Cookie value proving the session was opened with the preview secret.
pub fn preview_token(secret: &str) -> String {
    hex::encode(Sha256::digest(secret.as_bytes()))
}

/// Content mode for the current request, derived from the preview cookie.
///
/// Falls back to published content when the cookie is absent, stale, or
/// preview is not configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreviewSession(pub ContentMode);

impl FromRequestParts<AppState> for PreviewSession {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let active = match (
            jar.get(PREVIEW_COOKIE),
            state.config.contentful.preview_secret.as_deref(),
        ) {
            (Some(cookie), Some(secret)) if !secret.is_empty() => cookie.value() == preview_token(secret),
            _ => false,
        };
        Ok(Self(if active {
            ContentMode::Preview
        } else {
            ContentMode::Published
        }))
    }
}
