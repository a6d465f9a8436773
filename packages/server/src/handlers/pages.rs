//! Page-data endpoints. Each composes the content a site page needs, plus
//! the JSON-LD blocks for that page.

use axum::Json;
use axum::extract::{Path, State};
use tracing::instrument;

use crate::error::AppError;
use crate::extractors::preview::PreviewSession;
use crate::models::pages::{
    AboutPage, BlogPage, BlogPostPage, ContactsPage, HomePage, ServicePage, ServicesPage,
};
use crate::seo::structured_data as ld;
use crate::state::AppState;

const HOME: &str = "Главная";

#[utoipa::path(
    get,
    path = "/home",
    tag = "Pages",
    operation_id = "homePage",
    summary = "Home page data",
    responses((status = 200, description = "Home page payload", body = HomePage)),
)]
#[instrument(skip_all, fields(mode = ?mode))]
pub async fn home(
    State(state): State<AppState>,
    PreviewSession(mode): PreviewSession,
) -> Json<HomePage> {
    let content = &state.content;
    let (company, services, advantages, reviews, faqs, seo) = tokio::join!(
        content.company_profile(mode),
        content.services(mode),
        content.advantages(mode),
        content.reviews(mode),
        content.faqs(mode),
        content.seo_page("home", mode),
    );
    let review_stats = common::content::ReviewStats::from_reviews(&reviews);

    let site = &state.config.site;
    let mut structured_data = vec![ld::website(site.base_url(), &site.name)];
    if let Some(company) = &company {
        structured_data.push(ld::local_business(
            company,
            &services,
            review_stats.as_ref(),
            site.base_url(),
        ));
        structured_data.push(ld::organization(company, site.base_url()));
    }
    structured_data.extend(ld::faq_page(&faqs));

    Json(HomePage {
        preview: mode.is_preview(),
        company,
        services,
        advantages,
        reviews,
        review_stats,
        faqs,
        seo,
        structured_data,
    })
}

#[utoipa::path(
    get,
    path = "/services",
    tag = "Pages",
    operation_id = "servicesPage",
    summary = "Service catalog page data",
    responses((status = 200, description = "Service catalog payload", body = ServicesPage)),
)]
#[instrument(skip_all, fields(mode = ?mode))]
pub async fn services(
    State(state): State<AppState>,
    PreviewSession(mode): PreviewSession,
) -> Json<ServicesPage> {
    let content = &state.content;
    let (company, services, seo) = tokio::join!(
        content.company_profile(mode),
        content.services(mode),
        content.seo_page("services", mode),
    );

    let base = state.config.site.base_url();
    let mut structured_data = vec![ld::breadcrumbs(&[(HOME, "/"), ("Услуги", "/services")], base)];
    if let Some(company) = &company {
        structured_data.extend(services.iter().map(|s| ld::service(s, company, base)));
    }

    Json(ServicesPage {
        preview: mode.is_preview(),
        company,
        services,
        seo,
        structured_data,
    })
}

#[utoipa::path(
    get,
    path = "/services/{slug}",
    tag = "Pages",
    operation_id = "servicePage",
    summary = "Service detail page data",
    params(("slug" = String, Path, description = "Service slug")),
    responses(
        (status = 200, description = "Service detail payload", body = ServicePage),
        (status = 404, description = "No service with this slug", body = crate::error::ErrorBody),
    ),
)]
#[instrument(skip_all, fields(mode = ?mode, slug = %slug))]
pub async fn service(
    State(state): State<AppState>,
    PreviewSession(mode): PreviewSession,
    Path(slug): Path<String>,
) -> Result<Json<ServicePage>, AppError> {
    let content = &state.content;
    let (company, services) = tokio::join!(content.company_profile(mode), content.services(mode));

    let (matching, other_services): (Vec<_>, Vec<_>) =
        services.into_iter().partition(|s| s.slug == slug);
    let service = matching
        .into_iter()
        .next()
        .ok_or_else(|| AppError::NotFound("Service not found".into()))?;

    let base = state.config.site.base_url();
    let path = format!("/services/{}", service.slug);
    let mut structured_data = vec![ld::breadcrumbs(
        &[(HOME, "/"), ("Услуги", "/services"), (service.title.as_str(), path.as_str())],
        base,
    )];
    if let Some(company) = &company {
        structured_data.push(ld::service(&service, company, base));
    }

    Ok(Json(ServicePage {
        preview: mode.is_preview(),
        service,
        other_services,
        company,
        structured_data,
    }))
}

#[utoipa::path(
    get,
    path = "/blog",
    tag = "Pages",
    operation_id = "blogPage",
    summary = "Blog index page data",
    responses((status = 200, description = "Blog index payload", body = BlogPage)),
)]
#[instrument(skip_all, fields(mode = ?mode))]
pub async fn blog(
    State(state): State<AppState>,
    PreviewSession(mode): PreviewSession,
) -> Json<BlogPage> {
    let content = &state.content;
    let (posts, seo) = tokio::join!(content.blog_posts(mode), content.seo_page("blog", mode));
    let structured_data = vec![ld::breadcrumbs(
        &[(HOME, "/"), ("Блог", "/blog")],
        state.config.site.base_url(),
    )];

    Json(BlogPage {
        preview: mode.is_preview(),
        posts,
        seo,
        structured_data,
    })
}

#[utoipa::path(
    get,
    path = "/blog/{slug}",
    tag = "Pages",
    operation_id = "blogPostPage",
    summary = "Blog post page data",
    params(("slug" = String, Path, description = "Post slug")),
    responses(
        (status = 200, description = "Blog post payload", body = BlogPostPage),
        (status = 404, description = "No post with this slug", body = crate::error::ErrorBody),
    ),
)]
#[instrument(skip_all, fields(mode = ?mode, slug = %slug))]
pub async fn blog_post(
    State(state): State<AppState>,
    PreviewSession(mode): PreviewSession,
    Path(slug): Path<String>,
) -> Result<Json<BlogPostPage>, AppError> {
    let post = state
        .content
        .blog_post_by_slug(&slug, mode)
        .await
        .ok_or_else(|| AppError::NotFound("Post not found".into()))?;

    let path = format!("/blog/{}", post.slug);
    let structured_data = vec![ld::breadcrumbs(
        &[(HOME, "/"), ("Блог", "/blog"), (post.title.as_str(), path.as_str())],
        state.config.site.base_url(),
    )];

    Ok(Json(BlogPostPage {
        preview: mode.is_preview(),
        post,
        structured_data,
    }))
}

#[utoipa::path(
    get,
    path = "/about",
    tag = "Pages",
    operation_id = "aboutPage",
    summary = "About page data",
    responses((status = 200, description = "About page payload", body = AboutPage)),
)]
#[instrument(skip_all, fields(mode = ?mode))]
pub async fn about(
    State(state): State<AppState>,
    PreviewSession(mode): PreviewSession,
) -> Json<AboutPage> {
    let content = &state.content;
    let (personal_info, company, reviews, seo) = tokio::join!(
        content.personal_info(mode),
        content.company_profile(mode),
        content.reviews(mode),
        content.seo_page("about", mode),
    );
    let review_stats = common::content::ReviewStats::from_reviews(&reviews);

    let base = state.config.site.base_url();
    let mut structured_data = vec![ld::breadcrumbs(&[(HOME, "/"), ("Обо мне", "/about")], base)];
    if let Some(company) = &company {
        structured_data.push(ld::organization(company, base));
    }

    Json(AboutPage {
        preview: mode.is_preview(),
        personal_info,
        company,
        reviews,
        review_stats,
        seo,
        structured_data,
    })
}

#[utoipa::path(
    get,
    path = "/contacts",
    tag = "Pages",
    operation_id = "contactsPage",
    summary = "Contacts page data",
    responses((status = 200, description = "Contacts page payload", body = ContactsPage)),
)]
#[instrument(skip_all, fields(mode = ?mode))]
pub async fn contacts(
    State(state): State<AppState>,
    PreviewSession(mode): PreviewSession,
) -> Json<ContactsPage> {
    let content = &state.content;
    let (company, services, faqs, seo) = tokio::join!(
        content.company_profile(mode),
        content.services(mode),
        content.faqs(mode),
        content.seo_page("contacts", mode),
    );

    let base = state.config.site.base_url();
    let mut structured_data = vec![ld::breadcrumbs(&[(HOME, "/"), ("Контакты", "/contacts")], base)];
    if let Some(company) = &company {
        structured_data.push(ld::local_business(company, &services, None, base));
    }
    structured_data.extend(ld::faq_page(&faqs));

    Json(ContactsPage {
        preview: mode.is_preview(),
        company,
        faqs,
        seo,
        structured_data,
    })
}
