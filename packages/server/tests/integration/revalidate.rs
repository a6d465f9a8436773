use serde_json::json;

use crate::common::{
    TestApp, TestOptions, WEBHOOK_SECRET, routes, service_fields, webhook_body,
};

mod authorization {
    use super::*;

    #[tokio::test]
    async fn missing_secret_header_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app.webhook(None, &webhook_body("service", json!({}))).await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["success"], false);
        assert_eq!(res.body["message"], "Unauthorized");
    }

    #[tokio::test]
    async fn wrong_secret_is_rejected() {
        let app = TestApp::spawn().await;

        app.cms.set("service", vec![service_fields("topo", "Топосъемка")]);
        app.get(routes::SERVICES).await;
        let warmed = app.cms.calls();

        let res = app
            .webhook(Some("nope"), &webhook_body("service", json!({})))
            .await;
        assert_eq!(res.status, 401);

        app.get(routes::SERVICES).await;
        assert_eq!(app.cms.calls(), warmed, "rejected webhook must not drop cached entries");
    }

    #[tokio::test]
    async fn unconfigured_server_refuses_every_webhook() {
        let app = TestApp::spawn_with(TestOptions {
            webhook_secret: None,
            ..Default::default()
        })
        .await;

        app.cms.set("service", vec![service_fields("topo", "Топосъемка")]);
        app.get(routes::SERVICES).await;
        let warmed = app.cms.calls();

        let res = app
            .webhook(Some(WEBHOOK_SECRET), &webhook_body("service", json!({})))
            .await;
        assert_eq!(res.status, 503);
        assert_eq!(res.body["message"], "Webhook not configured");

        app.get(routes::SERVICES).await;
        assert_eq!(app.cms.calls(), warmed);
    }

    #[tokio::test]
    async fn secret_is_checked_before_the_body_is_parsed() {
        let app = TestApp::spawn().await;

        let res = app.webhook(None, "{not json").await;
        assert_eq!(res.status, 401);

        let res = app.webhook(Some(WEBHOOK_SECRET), "{not json").await;
        assert_eq!(res.status, 400);
        assert_eq!(res.body["success"], false);
    }
}

mod tag_mapping {
    use super::*;

    #[tokio::test]
    async fn service_entry_invalidates_the_services_tags() {
        let app = TestApp::spawn().await;

        let res = app
            .webhook(Some(WEBHOOK_SECRET), &webhook_body("service", json!({})))
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["success"], true);
        assert_eq!(res.body["message"], "Cache revalidated");
        assert_eq!(res.body["contentType"], "service");
        assert_eq!(res.body["tags"], json!(["contentful", "services"]));
        assert!(res.body["timestamp"].is_string());
    }

    #[tokio::test]
    async fn seo_page_adds_the_page_tag() {
        let app = TestApp::spawn().await;

        let res = app
            .webhook(
                Some(WEBHOOK_SECRET),
                &webhook_body("seoPage", json!({ "slug": { "ru": "contacts" } })),
            )
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["tags"], json!(["contentful", "seo", "seo-contacts"]));
    }

    #[tokio::test]
    async fn seo_page_without_slug_uses_the_shared_tags() {
        let app = TestApp::spawn().await;

        let res = app
            .webhook(Some(WEBHOOK_SECRET), &webhook_body("seoPage", json!({})))
            .await;

        assert_eq!(res.body["tags"], json!(["contentful", "seo"]));
    }

    #[tokio::test]
    async fn unknown_content_type_needs_no_revalidation() {
        let app = TestApp::spawn().await;

        let res = app
            .webhook(Some(WEBHOOK_SECRET), &webhook_body("banner", json!({})))
            .await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["success"], true);
        assert_eq!(res.body["message"], "No revalidation needed");
        assert!(res.body.get("tags").is_none());
    }
}

#[tokio::test]
async fn published_change_is_visible_after_revalidation() {
    let app = TestApp::spawn().await;
    app.cms.set("service", vec![service_fields("topo", "Топосъемка")]);

    let first = app.get(routes::SERVICES).await;
    assert_eq!(first.body["services"][0]["title"], "Топосъемка");
    let fetches = app.cms.calls();

    app.cms.set("service", vec![service_fields("topo", "Топографическая съемка")]);
    let cached = app.get(routes::SERVICES).await;
    assert_eq!(cached.body["services"][0]["title"], "Топосъемка");
    assert_eq!(app.cms.calls(), fetches);

    let res = app
        .webhook(Some(WEBHOOK_SECRET), &webhook_body("service", json!({})))
        .await;
    assert_eq!(res.status, 200);

    let fresh = app.get(routes::SERVICES).await;
    assert_eq!(fresh.body["services"][0]["title"], "Топографическая съемка");
}

#[tokio::test]
async fn health_check_reports_ok() {
    let app = TestApp::spawn().await;

    let res = app.get(routes::REVALIDATE).await;

    assert_eq!(res.status, 200);
    assert_eq!(res.body["status"], "ok");
    assert_eq!(res.body["message"], "Contentful revalidation webhook is active");
    assert!(res.body["timestamp"].is_string());
}
