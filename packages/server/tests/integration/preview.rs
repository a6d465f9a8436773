use crate::common::{PREVIEW_SECRET, TestApp, TestOptions, routes, service_fields};

fn preview_url(secret: &str, slug: Option<&str>) -> String {
    match slug {
        Some(slug) => format!("{}?secret={secret}&slug={slug}", routes::PREVIEW),
        None => format!("{}?secret={secret}", routes::PREVIEW),
    }
}

/// The `name=value` part of the first `Set-Cookie` header.
fn cookie_pair(set_cookie: &str) -> String {
    set_cookie.split(';').next().unwrap_or_default().to_string()
}

#[tokio::test]
async fn valid_secret_sets_cookie_and_redirects() {
    let app = TestApp::spawn().await;

    let res = app.get(&preview_url(PREVIEW_SECRET, Some("/services/topo"))).await;

    assert_eq!(res.status, 307);
    assert_eq!(res.header("location"), Some("/services/topo"));
    let cookie = res.header("set-cookie").expect("preview cookie");
    assert!(cookie.starts_with("__site_preview="));
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("SameSite=Lax"));
    assert!(cookie.contains("Path=/"));
}

#[tokio::test]
async fn slug_defaults_to_the_home_page() {
    let app = TestApp::spawn().await;

    let res = app.get(&preview_url(PREVIEW_SECRET, None)).await;

    assert_eq!(res.status, 307);
    assert_eq!(res.header("location"), Some("/"));
}

#[tokio::test]
async fn wrong_secret_is_rejected() {
    let app = TestApp::spawn().await;

    let res = app.get(&preview_url("wrong", Some("/"))).await;

    assert_eq!(res.status, 401);
    assert_eq!(res.body["code"], "UNAUTHORIZED");
    assert_eq!(res.body["message"], "Invalid token");
    assert!(res.header("set-cookie").is_none());
}

#[tokio::test]
async fn off_site_redirect_is_rejected() {
    let app = TestApp::spawn().await;

    let res = app.get(&preview_url(PREVIEW_SECRET, Some("//evil.example"))).await;

    assert_eq!(res.status, 400);
    assert_eq!(res.body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn unconfigured_preview_is_unavailable() {
    let app = TestApp::spawn_with(TestOptions {
        preview_secret: None,
        ..Default::default()
    })
    .await;

    let res = app.get(&preview_url(PREVIEW_SECRET, Some("/"))).await;

    assert_eq!(res.status, 503);
    assert_eq!(res.body["code"], "NOT_CONFIGURED");
}

#[tokio::test]
async fn preview_cookie_switches_pages_to_draft_content() {
    let app = TestApp::spawn().await;
    app.cms.set("service", vec![service_fields("topo", "Опубликовано")]);
    app.drafts.set("service", vec![service_fields("topo", "Черновик")]);

    let published = app.get(routes::SERVICES).await;
    assert_eq!(published.body["preview"], false);
    assert_eq!(published.body["services"][0]["title"], "Опубликовано");

    let enter = app.get(&preview_url(PREVIEW_SECRET, Some("/services"))).await;
    let cookie = cookie_pair(enter.header("set-cookie").expect("preview cookie"));

    let draft = app.get_with_cookie(routes::SERVICES, &cookie).await;
    assert_eq!(draft.body["preview"], true);
    assert_eq!(draft.body["services"][0]["title"], "Черновик");

    // Draft reads are never cached.
    app.drafts.set("service", vec![service_fields("topo", "Черновик 2")]);
    let draft = app.get_with_cookie(routes::SERVICES, &cookie).await;
    assert_eq!(draft.body["services"][0]["title"], "Черновик 2");
}

#[tokio::test]
async fn forged_cookie_reads_published_content() {
    let app = TestApp::spawn().await;
    app.cms.set("service", vec![service_fields("topo", "Опубликовано")]);
    app.drafts.set("service", vec![service_fields("topo", "Черновик")]);

    let res = app
        .get_with_cookie(routes::SERVICES, "__site_preview=forged")
        .await;

    assert_eq!(res.body["preview"], false);
    assert_eq!(res.body["services"][0]["title"], "Опубликовано");
}

#[tokio::test]
async fn exit_clears_cookie_and_redirects() {
    let app = TestApp::spawn().await;

    let res = app
        .get(&format!("{}?redirect=/blog", routes::EXIT_PREVIEW))
        .await;

    assert_eq!(res.status, 307);
    assert_eq!(res.header("location"), Some("/blog"));
    let cookie = res.header("set-cookie").expect("removal cookie");
    assert!(cookie.starts_with("__site_preview="));
    assert!(cookie.contains("Max-Age=0"));
}

#[tokio::test]
async fn exit_with_unsafe_target_goes_home() {
    let app = TestApp::spawn().await;

    let res = app
        .get(&format!("{}?redirect=https://evil.example", routes::EXIT_PREVIEW))
        .await;

    assert_eq!(res.status, 307);
    assert_eq!(res.header("location"), Some("/"));
}
