use serde_json::json;

use crate::common::{
    TestApp, blog_fields, company_fields, review_fields, routes, service_fields,
};

fn ld_types(body: &serde_json::Value) -> Vec<String> {
    body["structuredData"]
        .as_array()
        .unwrap()
        .iter()
        .map(|block| block["@type"].as_str().unwrap_or_default().to_string())
        .collect()
}

#[tokio::test]
async fn empty_cms_still_renders_every_page() {
    let app = TestApp::spawn().await;

    for path in [
        routes::HOME,
        routes::SERVICES,
        routes::BLOG,
        routes::ABOUT,
        routes::CONTACTS,
    ] {
        let res = app.get(path).await;
        assert_eq!(res.status, 200, "{path}: {}", res.text);
        assert_eq!(res.body["preview"], false);
    }

    let home = app.get(routes::HOME).await;
    assert!(home.body["company"].is_null());
    assert_eq!(home.body["services"], json!([]));
    assert_eq!(ld_types(&home.body), vec!["WebSite"]);
}

#[tokio::test]
async fn home_page_composes_content_and_structured_data() {
    let app = TestApp::spawn().await;
    app.cms.set("companyInfo", vec![company_fields()]);
    app.cms.set(
        "service",
        vec![
            service_fields("topo", "Топосъемка"),
            service_fields("mezhevanie", "Межевание"),
        ],
    );
    app.cms.set(
        "review",
        vec![
            review_fields("Анна", 5, true),
            review_fields("Олег", 4, true),
            review_fields("Скрытый", 1, false),
        ],
    );
    app.cms.set(
        "faq",
        vec![json!({ "question": "Сколько стоит?", "answer": "От 300 BYN", "order": 1 })],
    );

    let res = app.get(routes::HOME).await;

    assert_eq!(res.status, 200, "{}", res.text);
    assert_eq!(res.body["company"]["name"], "Геодезия Брест");
    assert_eq!(res.body["services"][0]["slug"], "topo");
    assert_eq!(res.body["services"][1]["slug"], "mezhevanie");
    assert_eq!(res.body["reviews"].as_array().unwrap().len(), 2);
    assert_eq!(res.body["reviewStats"]["reviewCount"], 2);
    assert_eq!(res.body["reviewStats"]["ratingValue"], 4.5);

    let types = ld_types(&res.body);
    assert_eq!(types, vec!["WebSite", "LocalBusiness", "Organization", "FAQPage"]);
    let business = &res.body["structuredData"][1];
    assert_eq!(business["aggregateRating"]["reviewCount"], 2);
    assert_eq!(business["geo"]["latitude"], 52.0975);
}

#[tokio::test]
async fn service_detail_page_and_unknown_slug() {
    let app = TestApp::spawn().await;
    app.cms.set("companyInfo", vec![company_fields()]);
    app.cms.set(
        "service",
        vec![
            service_fields("topo", "Топосъемка"),
            service_fields("mezhevanie", "Межевание"),
        ],
    );

    let res = app.get(&routes::service("mezhevanie")).await;
    assert_eq!(res.status, 200, "{}", res.text);
    assert_eq!(res.body["service"]["title"], "Межевание");
    assert_eq!(res.body["otherServices"].as_array().unwrap().len(), 1);
    assert_eq!(ld_types(&res.body), vec!["BreadcrumbList", "Service"]);

    let res = app.get(&routes::service("missing")).await;
    assert_eq!(res.status, 404);
    assert_eq!(res.body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn blog_lists_newest_first_and_serves_posts() {
    let app = TestApp::spawn().await;
    app.cms.set(
        "blogPost",
        vec![
            blog_fields("old", "2023-03-01"),
            blog_fields("new", "2024-06-01"),
        ],
    );

    let res = app.get(routes::BLOG).await;
    assert_eq!(res.status, 200, "{}", res.text);
    assert_eq!(res.body["posts"][0]["slug"], "new");
    assert_eq!(res.body["posts"][1]["slug"], "old");

    let res = app.get(&routes::blog_post("old")).await;
    assert_eq!(res.status, 200);
    assert_eq!(res.body["post"]["title"], "Статья old");

    let res = app.get(&routes::blog_post("nope")).await;
    assert_eq!(res.status, 404);
}

#[tokio::test]
async fn contacts_page_carries_seo_metadata() {
    let app = TestApp::spawn().await;
    app.cms.set(
        "seoPage",
        vec![json!({ "slug": "contacts", "title": "Контакты геодезиста", "description": "Как связаться" })],
    );

    let res = app.get(routes::CONTACTS).await;

    assert_eq!(res.status, 200, "{}", res.text);
    assert_eq!(res.body["seo"]["title"], "Контакты геодезиста");
}

#[tokio::test]
async fn sitemap_lists_static_and_dynamic_pages() {
    let app = TestApp::spawn().await;
    app.cms.set("service", vec![service_fields("topo", "Топосъемка")]);
    app.cms.set("blogPost", vec![blog_fields("kak-vybrat", "2024-01-10")]);

    let res = app.get(routes::SITEMAP).await;

    assert_eq!(res.status, 200);
    assert!(res.header("content-type").unwrap().starts_with("application/xml"));
    assert!(res.text.contains("<loc>https://geodesy.test/</loc>"));
    assert!(res.text.contains("<loc>https://geodesy.test/services/topo</loc>"));
    assert!(res.text.contains("<loc>https://geodesy.test/blog/kak-vybrat</loc>"));
}

#[tokio::test]
async fn robots_points_at_the_sitemap() {
    let app = TestApp::spawn().await;

    let res = app.get(routes::ROBOTS).await;

    assert_eq!(res.status, 200);
    assert!(res.text.contains("Disallow: /api"));
    assert!(res.text.contains("Sitemap: https://geodesy.test/sitemap.xml"));
}

#[tokio::test]
async fn api_reference_is_served() {
    let app = TestApp::spawn().await;

    let res = app.get("/scalar").await;

    assert_eq!(res.status, 200);
}
