use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::handlers::{forms, pages, preview, revalidate, sitemap};
use crate::state::AppState;

/// Routes mounted under `/api`.
pub fn api_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(revalidate::revalidate, revalidate::health))
        .routes(routes!(preview::enter_preview))
        .routes(routes!(preview::exit_preview))
        .nest("/forms", form_routes())
        .nest("/pages", page_routes())
}

fn form_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(forms::submit_contact))
        .routes(routes!(forms::submit_review))
}

fn page_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(pages::home))
        .routes(routes!(pages::services))
        .routes(routes!(pages::service))
        .routes(routes!(pages::blog))
        .routes(routes!(pages::blog_post))
        .routes(routes!(pages::about))
        .routes(routes!(pages::contacts))
}

/// Crawler-facing documents served from the site root.
pub fn seo_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(sitemap::sitemap))
        .routes(routes!(sitemap::robots))
}
