use serde_json::{Value, json};

use crate::common::{TestApp, TestOptions, routes};

fn contact() -> Value {
    json!({
        "name": "Иван Петров",
        "phone": "+375 (29) 123-45-67",
        "email": "ivan@example.com",
        "message": "Нужна топографическая съемка участка",
    })
}

fn review() -> Value {
    json!({
        "name": "Анна",
        "location": "Брест",
        "rating": 4,
        "text": "Сделали межевание быстро, всё объяснили.",
    })
}

mod contact {
    use super::*;

    #[tokio::test]
    async fn valid_request_is_mailed() {
        let app = TestApp::spawn().await;

        let res = app.post_from(routes::CONTACT, &contact(), "198.51.100.1").await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["success"], true);
        assert!(res.body.get("errors").is_none());

        let sent = app.mailer.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].subject, "Новая заявка с сайта");
        assert_eq!(sent[0].reply_to.as_deref(), Some("ivan@example.com"));
        assert!(sent[0].text.contains("Нужна топографическая съемка участка"));
    }

    #[tokio::test]
    async fn every_problem_is_reported() {
        let app = TestApp::spawn().await;

        let res = app
            .post_from(
                routes::CONTACT,
                &json!({ "name": "И", "phone": "12", "email": "bad", "message": "коротко" }),
                "198.51.100.2",
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["success"], false);
        assert_eq!(res.body["message"], "Пожалуйста, исправьте ошибки в форме");
        assert_eq!(res.body["errors"].as_array().unwrap().len(), 4);
        assert!(app.mailer.sent().is_empty());
    }

    #[tokio::test]
    async fn html_in_fields_is_escaped_in_the_mail() {
        let app = TestApp::spawn().await;
        let mut body = contact();
        body["name"] = json!("<b>Иван</b>");

        let res = app.post_from(routes::CONTACT, &body, "198.51.100.3").await;
        assert_eq!(res.status, 200, "{}", res.text);

        let html = &app.mailer.sent()[0].html;
        assert!(html.contains("&lt;b&gt;Иван&lt;/b&gt;"));
        assert!(!html.contains("<b>Иван</b>"));
    }

    #[tokio::test]
    async fn delivery_refreshes_the_contacts_page() {
        let app = TestApp::spawn().await;
        app.cms.set(
            "seoPage",
            vec![json!({ "slug": "contacts", "title": "Старый заголовок", "description": "d" })],
        );
        let res = app.get(routes::CONTACTS).await;
        assert_eq!(res.body["seo"]["title"], "Старый заголовок");

        app.cms.set(
            "seoPage",
            vec![json!({ "slug": "contacts", "title": "Новый заголовок", "description": "d" })],
        );
        let res = app.post_from(routes::CONTACT, &contact(), "198.51.100.4").await;
        assert_eq!(res.status, 200, "{}", res.text);

        let res = app.get(routes::CONTACTS).await;
        assert_eq!(res.body["seo"]["title"], "Новый заголовок");
    }

    #[tokio::test]
    async fn unreadable_body_is_a_form_error() {
        let app = TestApp::spawn().await;

        let res = app.post_raw(routes::CONTACT, "{oops").await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["success"], false);
        assert!(res.body["errors"].is_array());
    }
}

mod rate_limiting {
    use super::*;

    #[tokio::test]
    async fn fourth_contact_in_a_window_is_throttled() {
        let app = TestApp::spawn().await;

        for _ in 0..3 {
            let res = app.post_from(routes::CONTACT, &contact(), "203.0.113.9").await;
            assert_eq!(res.status, 200, "{}", res.text);
        }

        let res = app.post_from(routes::CONTACT, &contact(), "203.0.113.9").await;
        assert_eq!(res.status, 429);
        assert_eq!(res.body["success"], false);
        assert_eq!(
            res.body["errors"][0],
            "Превышен лимит запросов (максимум 3 в минуту)"
        );
        let retry_after: u64 = res.header("retry-after").unwrap().parse().unwrap();
        assert!((1..=60).contains(&retry_after));
        assert_eq!(app.mailer.sent().len(), 3);
    }

    #[tokio::test]
    async fn callers_are_counted_separately() {
        let app = TestApp::spawn().await;

        for _ in 0..3 {
            app.post_from(routes::CONTACT, &contact(), "203.0.113.10").await;
        }

        let res = app.post_from(routes::CONTACT, &contact(), "203.0.113.11").await;
        assert_eq!(res.status, 200);
    }

    #[tokio::test]
    async fn rejected_submissions_do_not_use_quota() {
        let app = TestApp::spawn().await;
        let invalid = json!({ "name": "", "phone": "", "message": "" });

        for _ in 0..5 {
            let res = app.post_from(routes::CONTACT, &invalid, "203.0.113.12").await;
            assert_eq!(res.status, 400);
        }

        let res = app.post_from(routes::CONTACT, &contact(), "203.0.113.12").await;
        assert_eq!(res.status, 200);
    }

    #[tokio::test]
    async fn review_form_has_its_own_lower_limit() {
        let app = TestApp::spawn().await;

        for _ in 0..2 {
            let res = app.post_from(routes::REVIEW, &review(), "203.0.113.13").await;
            assert_eq!(res.status, 200, "{}", res.text);
        }
        let res = app.post_from(routes::REVIEW, &review(), "203.0.113.13").await;
        assert_eq!(res.status, 429);

        // The contact window is untouched.
        let res = app.post_from(routes::CONTACT, &contact(), "203.0.113.13").await;
        assert_eq!(res.status, 200);
    }
}

mod review {
    use super::*;

    #[tokio::test]
    async fn valid_review_is_mailed_with_stars() {
        let app = TestApp::spawn().await;

        let res = app.post_from(routes::REVIEW, &review(), "198.51.100.20").await;

        assert_eq!(res.status, 200, "{}", res.text);
        let sent = app.mailer.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].subject, "Новый отзыв с сайта - ★★★★☆ от Анна");
        assert!(sent[0].text.contains("Брест"));
    }

    #[tokio::test]
    async fn rating_out_of_range_is_rejected() {
        let app = TestApp::spawn().await;
        let mut body = review();
        body["rating"] = json!(7);

        let res = app.post_from(routes::REVIEW, &body, "198.51.100.21").await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["errors"], json!(["Поставьте оценку от 1 до 5"]));
    }

    #[tokio::test]
    async fn unreadable_rating_is_reported_with_other_problems() {
        let app = TestApp::spawn().await;

        let res = app
            .post_from(
                routes::REVIEW,
                &json!({ "name": "А", "location": "Б", "rating": "abc", "text": "коротко" }),
                "198.51.100.22",
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(
            res.body["errors"],
            json!([
                "Имя должно содержать от 2 до 100 символов",
                "Город/район должен содержать от 2 до 100 символов",
                "Поставьте оценку от 1 до 5",
                "Отзыв должен содержать от 20 до 1000 символов",
            ])
        );
    }

    #[tokio::test]
    async fn numeric_string_rating_is_accepted() {
        let app = TestApp::spawn().await;
        let mut body = review();
        body["rating"] = json!("5");

        let res = app.post_from(routes::REVIEW, &body, "198.51.100.23").await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert!(app.mailer.sent()[0].subject.contains("★★★★★"));
    }
}

#[tokio::test]
async fn missing_transport_is_reported_without_sending() {
    let app = TestApp::spawn_with(TestOptions {
        smtp: false,
        ..Default::default()
    })
    .await;

    let res = app.post_from(routes::CONTACT, &contact(), "198.51.100.30").await;

    assert_eq!(res.status, 503);
    assert_eq!(res.body["success"], false);
    assert_eq!(res.body["errors"], json!(["SMTP не настроен на сервере"]));
}
