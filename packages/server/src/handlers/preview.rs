use axum::extract::{Query, State};
use axum::response::Redirect;
use axum_extra::extract::CookieJar;
use axum_extra::extract::cookie::{Cookie, SameSite};
use serde::Deserialize;
use tracing::{info, instrument, warn};
use utoipa::IntoParams;

use crate::error::AppError;
use crate::extractors::preview::{PREVIEW_COOKIE, preview_token};
use crate::state::AppState;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct EnterPreviewQuery {
    /// Must equal the configured preview secret.
    pub secret: Option<String>,
    /// Site path to open once the session is set. Default: `/`.
    pub slug: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ExitPreviewQuery {
    /// Site path to return to. Default: `/`.
    pub redirect: Option<String>,
}

/// Site-relative path check. Rejects protocol-relative `//host` targets.
fn is_site_path(path: &str) -> bool {
    path.starts_with('/') && !path.starts_with("//") && !path.contains('\\')
}

#[utoipa::path(
    get,
    path = "/preview",
    tag = "Preview",
    operation_id = "enterPreview",
    summary = "Start a draft-content session",
    description = "Sets the preview cookie and redirects to `slug`. Page-data requests carrying \
        the cookie read unpublished content and bypass the cache.",
    params(EnterPreviewQuery),
    responses(
        (status = 307, description = "Preview enabled, redirecting"),
        (status = 400, description = "Slug is not a site path", body = crate::error::ErrorBody),
        (status = 401, description = "Wrong secret", body = crate::error::ErrorBody),
        (status = 503, description = "Preview secret not configured", body = crate::error::ErrorBody),
    ),
)]
#[instrument(skip_all, fields(slug = query.slug.as_deref()))]
pub async fn enter_preview(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(query): Query<EnterPreviewQuery>,
) -> Result<(CookieJar, Redirect), AppError> {
    let secret = state
        .config
        .contentful
        .preview_secret
        .as_deref()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::NotConfigured("contentful.preview_secret".into()))?;

    if query.secret.as_deref() != Some(secret) {
        warn!("Rejected preview request with invalid secret");
        return Err(AppError::Unauthorized("Invalid token".into()));
    }

    let target = query.slug.as_deref().unwrap_or("/");
    if !is_site_path(target) {
        return Err(AppError::Validation(
            "slug must be a site-relative path".into(),
        ));
    }

    let cookie = Cookie::build((PREVIEW_COOKIE, preview_token(secret)))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(state.config.site.base_url().starts_with("https://"));

    info!(redirect = target, "Preview session started");
    Ok((jar.add(cookie), Redirect::temporary(target)))
}

#[utoipa::path(
    get,
    path = "/exit-preview",
    tag = "Preview",
    operation_id = "exitPreview",
    summary = "End the draft-content session",
    params(ExitPreviewQuery),
    responses(
        (status = 307, description = "Preview cookie cleared, redirecting"),
    ),
)]
#[instrument(skip_all)]
pub async fn exit_preview(jar: CookieJar, Query(query): Query<ExitPreviewQuery>) -> (CookieJar, Redirect) {
    let target = query
        .redirect
        .as_deref()
        .filter(|path| is_site_path(path))
        .unwrap_or("/");
    (
        jar.remove(Cookie::build(PREVIEW_COOKIE).path("/")),
        Redirect::temporary(target),
    )
}
