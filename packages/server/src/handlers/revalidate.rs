use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use tracing::{error, info, instrument, warn};

use crate::content::tags;
use crate::contentful::slug_value;
use crate::models::revalidate::{RevalidateResponse, WebhookHealth, WebhookPayload};
use crate::state::AppState;

pub const SECRET_HEADER: &str = "x-contentful-webhook-secret";
pub const TOPIC_HEADER: &str = "x-contentful-topic";

const SEO_PAGE: &str = "seoPage";

fn header<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

#[utoipa::path(
    post,
    path = "/revalidate",
    tag = "Revalidation",
    operation_id = "revalidate",
    summary = "CMS webhook: drop cached content",
    description = "Maps the changed entry's content type to cache tags and invalidates them. \
        Unknown content types are acknowledged without invalidating anything. \
        For `seoPage` entries the page-specific `seo-<slug>` tag is dropped as well.",
    request_body = WebhookPayload,
    params(
        ("x-contentful-webhook-secret" = String, Header, description = "Shared webhook secret"),
        ("x-contentful-topic" = Option<String>, Header, description = "CMS event name, logged only"),
    ),
    responses(
        (status = 200, description = "Tags invalidated, or nothing to do", body = RevalidateResponse),
        (status = 400, description = "Body is not valid JSON", body = RevalidateResponse),
        (status = 401, description = "Secret header missing or wrong", body = RevalidateResponse),
        (status = 503, description = "Webhook secret not configured on the server", body = RevalidateResponse),
    ),
)]
#[instrument(skip_all)]
pub async fn revalidate(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, Json<RevalidateResponse>) {
    let Some(expected) = state
        .config
        .contentful
        .revalidate_secret
        .as_deref()
        .filter(|s| !s.is_empty())
    else {
        error!("Revalidation secret not configured");
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(RevalidateResponse::failure("Webhook not configured")),
        );
    };

    if header(&headers, SECRET_HEADER) != Some(expected) {
        warn!("Invalid webhook secret");
        return (
            StatusCode::UNAUTHORIZED,
            Json(RevalidateResponse::failure("Unauthorized")),
        );
    }

    let payload: WebhookPayload = match serde_json::from_slice(&body) {
        Ok(payload) => payload,
        Err(e) => {
            warn!(error = %e, "Malformed webhook payload");
            return (
                StatusCode::BAD_REQUEST,
                Json(RevalidateResponse::failure("Invalid payload")),
            );
        }
    };

    let content_type = payload.content_type();
    info!(
        content_type,
        entry_id = payload.sys.id.as_deref(),
        topic = header(&headers, TOPIC_HEADER),
        "Webhook received"
    );

    let Some(mapped) = content_type.and_then(tags::tags_for) else {
        info!(content_type, "No cache tags configured for content type");
        return (
            StatusCode::OK,
            Json(RevalidateResponse {
                success: true,
                message: "No revalidation needed".into(),
                content_type: content_type.map(str::to_string),
                tags: None,
                timestamp: None,
            }),
        );
    };

    let mut invalidated = tags::owned(mapped);
    if content_type == Some(SEO_PAGE)
        && let Some(slug) = payload.fields.get("slug").and_then(slug_value)
        && !slug.trim().is_empty()
    {
        invalidated.push(tags::seo_slug_tag(slug.trim()));
    }

    for tag in &invalidated {
        let dropped = state.cache.invalidate(tag).await;
        info!(tag = %tag, dropped, "Revalidated cache tag");
    }

    (
        StatusCode::OK,
        Json(RevalidateResponse {
            success: true,
            message: "Cache revalidated".into(),
            content_type: content_type.map(str::to_string),
            tags: Some(invalidated),
            timestamp: Some(chrono::Utc::now()),
        }),
    )
}

#[utoipa::path(
    get,
    path = "/revalidate",
    tag = "Revalidation",
    operation_id = "revalidateHealth",
    summary = "Webhook health check",
    responses(
        (status = 200, description = "Webhook endpoint is up", body = WebhookHealth),
    ),
)]
pub async fn health() -> Json<WebhookHealth> {
    Json(WebhookHealth {
        status: "ok",
        message: "Contentful revalidation webhook is active",
        timestamp: chrono::Utc::now(),
    })
}
