use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use tracing::instrument;

use crate::error::AppError;
use crate::seo::sitemap::{render_robots, render_sitemap};
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/sitemap.xml",
    tag = "SEO",
    operation_id = "sitemap",
    summary = "XML sitemap",
    description = "Static pages plus every published service and blog post.",
    responses((status = 200, description = "Sitemap document", content_type = "application/xml", body = String)),
)]
#[instrument(skip_all)]
pub async fn sitemap(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let (services, posts) = tokio::join!(state.content.service_slugs(), state.content.blog_slugs());
    let xml = render_sitemap(
        state.config.site.base_url(),
        &services,
        &posts,
        chrono::Utc::now().fixed_offset(),
    )
    .map_err(AppError::Internal)?;
    Ok(([(header::CONTENT_TYPE, "application/xml")], xml))
}

#[utoipa::path(
    get,
    path = "/robots.txt",
    tag = "SEO",
    operation_id = "robots",
    summary = "Crawler rules",
    responses((status = 200, description = "robots.txt", content_type = "text/plain", body = String)),
)]
pub async fn robots(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        render_robots(state.config.site.base_url()),
    )
}
