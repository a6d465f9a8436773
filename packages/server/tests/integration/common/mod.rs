use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use async_trait::async_trait;
use reqwest::Client;
use reqwest::redirect::Policy;
use serde_json::{Value, json};

use ::common::cache::MemoryCache;
use server::config::{
    AppConfig, CacheConfig, ContentfulConfig, CorsConfig, RateLimitConfig, ServerConfig,
    SiteConfig, SmtpConfig,
};
use server::contentful::{
    CmsError, ContentMode, EntryCollection, EntryQuery, EntrySource, SourceProvider,
};
use server::mail::{MailError, Mailer, OutgoingMail};
use server::state::AppState;

pub const WEBHOOK_SECRET: &str = "test-webhook-secret";
pub const PREVIEW_SECRET: &str = "test-preview-secret";

pub mod routes {
    pub const REVALIDATE: &str = "/api/revalidate";
    pub const PREVIEW: &str = "/api/preview";
    pub const EXIT_PREVIEW: &str = "/api/exit-preview";
    pub const CONTACT: &str = "/api/forms/contact";
    pub const REVIEW: &str = "/api/forms/review";
    pub const HOME: &str = "/api/pages/home";
    pub const SERVICES: &str = "/api/pages/services";
    pub const BLOG: &str = "/api/pages/blog";
    pub const ABOUT: &str = "/api/pages/about";
    pub const CONTACTS: &str = "/api/pages/contacts";
    pub const SITEMAP: &str = "/sitemap.xml";
    pub const ROBOTS: &str = "/robots.txt";

    pub fn service(slug: &str) -> String {
        format!("/api/pages/services/{slug}")
    }

    pub fn blog_post(slug: &str) -> String {
        format!("/api/pages/blog/{slug}")
    }
}

/// In-memory CMS feed. Entries are stored as `fields` objects per content type.
#[derive(Default)]
pub struct FakeCms {
    entries: RwLock<HashMap<String, Vec<Value>>>,
    calls: AtomicUsize,
}

impl FakeCms {
    pub fn set(&self, content_type: &str, fields: Vec<Value>) {
        self.entries
            .write()
            .unwrap()
            .insert(content_type.to_string(), fields);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EntrySource for FakeCms {
    async fn entries(&self, query: &EntryQuery) -> Result<EntryCollection, CmsError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let fields = self
            .entries
            .read()
            .unwrap()
            .get(&query.content_type)
            .cloned()
            .unwrap_or_default();
        let items: Vec<Value> = fields
            .into_iter()
            .enumerate()
            .map(|(i, fields)| {
                json!({
                    "sys": {
                        "id": format!("{}-{i}", query.content_type),
                        "createdAt": format!("2024-01-{:02}T00:00:00Z", i + 1),
                    },
                    "fields": fields,
                })
            })
            .collect();
        Ok(serde_json::from_value(json!({ "total": items.len(), "items": items }))?)
    }
}

/// Serves the published feed and the draft feed from separate fakes.
pub struct FakeProvider {
    pub published: Arc<FakeCms>,
    pub preview: Arc<FakeCms>,
}

#[async_trait]
impl SourceProvider for FakeProvider {
    async fn source(&self, mode: ContentMode) -> Result<Arc<dyn EntrySource>, CmsError> {
        let source = match mode {
            ContentMode::Published => self.published.clone(),
            ContentMode::Preview => self.preview.clone(),
        };
        Ok(source as Arc<dyn EntrySource>)
    }
}

/// Keeps every message instead of sending it.
#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<OutgoingMail>>,
}

impl RecordingMailer {
    pub fn sent(&self) -> Vec<OutgoingMail> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, mail: OutgoingMail) -> Result<(), MailError> {
        self.sent.lock().unwrap().push(mail);
        Ok(())
    }
}

/// Parsed HTTP response for test assertions.
pub struct TestResponse {
    pub status: u16,
    pub headers: reqwest::header::HeaderMap,
    /// Raw response body as text.
    pub text: String,
    /// Parsed JSON body, or `Null` if the response is not valid JSON.
    pub body: Value,
}

impl TestResponse {
    async fn from_response(res: reqwest::Response) -> Self {
        let status = res.status().as_u16();
        let headers = res.headers().clone();
        let text = res.text().await.expect("Failed to read response body");
        let body = serde_json::from_str(&text).unwrap_or(Value::Null);
        Self {
            status,
            headers,
            text,
            body,
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

/// Knobs for [`TestApp::spawn_with`].
pub struct TestOptions {
    pub smtp: bool,
    pub webhook_secret: Option<&'static str>,
    pub preview_secret: Option<&'static str>,
}

impl Default for TestOptions {
    fn default() -> Self {
        Self {
            smtp: true,
            webhook_secret: Some(WEBHOOK_SECRET),
            preview_secret: Some(PREVIEW_SECRET),
        }
    }
}

/// A running test server.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
    pub cms: Arc<FakeCms>,
    pub drafts: Arc<FakeCms>,
    pub mailer: Arc<RecordingMailer>,
}

fn test_config(options: &TestOptions) -> AppConfig {
    AppConfig {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            cors: CorsConfig {
                allow_origins: vec!["http://localhost:3000".to_string()],
                max_age: 3600,
            },
        },
        contentful: ContentfulConfig {
            revalidate_secret: options.webhook_secret.map(str::to_string),
            preview_secret: options.preview_secret.map(str::to_string),
            ..Default::default()
        },
        cache: CacheConfig::default(),
        smtp: SmtpConfig::default(),
        rate_limit: RateLimitConfig::default(),
        site: SiteConfig {
            url: "https://geodesy.test".to_string(),
            name: "Геодезия Брест".to_string(),
        },
    }
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with(TestOptions::default()).await
    }

    pub async fn spawn_with(options: TestOptions) -> Self {
        let cms = Arc::new(FakeCms::default());
        let drafts = Arc::new(FakeCms::default());
        let mailer = Arc::new(RecordingMailer::default());

        let provider = Arc::new(FakeProvider {
            published: cms.clone(),
            preview: drafts.clone(),
        });
        let state = AppState::new(
            test_config(&options),
            provider,
            Arc::new(MemoryCache::new()),
            options
                .smtp
                .then(|| mailer.clone() as Arc<dyn Mailer>),
        );

        let app = server::build_router(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(
                listener,
                app.into_make_service_with_connect_info::<SocketAddr>(),
            )
            .await
            .unwrap();
        });

        let client = Client::builder()
            .redirect(Policy::none())
            .build()
            .expect("Failed to build HTTP client");

        Self {
            addr,
            client,
            cms,
            drafts,
            mailer,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub async fn get(&self, path: &str) -> TestResponse {
        let res = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("Failed to send GET request");

        TestResponse::from_response(res).await
    }

    pub async fn get_with_cookie(&self, path: &str, cookie: &str) -> TestResponse {
        let res = self
            .client
            .get(self.url(path))
            .header("Cookie", cookie)
            .send()
            .await
            .expect("Failed to send GET request");

        TestResponse::from_response(res).await
    }

    /// POST a JSON body as the caller at `ip`.
    pub async fn post_from(&self, path: &str, body: &Value, ip: &str) -> TestResponse {
        let res = self
            .client
            .post(self.url(path))
            .header("X-Forwarded-For", ip)
            .json(body)
            .send()
            .await
            .expect("Failed to send POST request");

        TestResponse::from_response(res).await
    }

    pub async fn post_raw(&self, path: &str, body: &str) -> TestResponse {
        let res = self
            .client
            .post(self.url(path))
            .header("Content-Type", "application/json")
            .body(body.to_string())
            .send()
            .await
            .expect("Failed to send POST request");

        TestResponse::from_response(res).await
    }

    /// Deliver a CMS webhook. `secret` of `None` omits the header.
    pub async fn webhook(&self, secret: Option<&str>, body: &str) -> TestResponse {
        let mut req = self
            .client
            .post(self.url(routes::REVALIDATE))
            .header("Content-Type", "application/json")
            .header("X-Contentful-Topic", "ContentManagement.Entry.publish")
            .body(body.to_string());
        if let Some(secret) = secret {
            req = req.header("X-Contentful-Webhook-Secret", secret);
        }
        let res = req.send().await.expect("Failed to send webhook");

        TestResponse::from_response(res).await
    }
}

/// Webhook body for an entry of `content_type`.
pub fn webhook_body(content_type: &str, fields: Value) -> String {
    json!({
        "sys": {
            "id": "entry-1",
            "type": "Entry",
            "contentType": { "sys": { "type": "Link", "linkType": "ContentType", "id": content_type } }
        },
        "fields": fields,
    })
    .to_string()
}

pub fn service_fields(slug: &str, title: &str) -> Value {
    json!({
        "title": title,
        "description": "Описание",
        "price": "от 300 BYN",
        "slug": slug,
    })
}

pub fn company_fields() -> Value {
    json!({
        "name": "Геодезия Брест",
        "description": "Геодезические работы в Бресте и области",
        "address": "г. Брест, ул. Советская, 1",
        "phone": "+375 29 123-45-67",
        "email": "info@geodesy.test",
        "workHours": "Пн-Пт 9:00-18:00",
        "telegram": "@geodesy",
    })
}

pub fn blog_fields(slug: &str, published_at: &str) -> Value {
    json!({
        "title": format!("Статья {slug}"),
        "slug": slug,
        "excerpt": "Кратко",
        "publishedAt": published_at,
    })
}

pub fn review_fields(name: &str, rating: u8, active: bool) -> Value {
    json!({
        "authorName": name,
        "rating": rating,
        "text": "Работа выполнена быстро и качественно",
        "publishedAt": "2024-05-01",
        "isActive": active,
    })
}
