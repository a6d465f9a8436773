use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct CorsConfig {
    pub allow_origins: Vec<String>,
    pub max_age: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors: CorsConfig,
}

/// CMS access. Credentials are optional here and checked at first use.
#[derive(Debug, Deserialize, Clone)]
pub struct ContentfulConfig {
    pub space_id: Option<String>,
    /// Environment within the space. Default: "master".
    #[serde(default = "default_environment")]
    pub environment: String,
    /// Token for the published-content delivery API.
    pub access_token: Option<String>,
    /// Token for the draft-content preview API.
    pub preview_access_token: Option<String>,
    #[serde(default = "default_delivery_url")]
    pub delivery_url: String,
    #[serde(default = "default_preview_url")]
    pub preview_url: String,
    /// Shared secret expected in `x-contentful-webhook-secret`.
    pub revalidate_secret: Option<String>,
    /// Shared secret expected by the preview toggle.
    pub preview_secret: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_environment() -> String {
    "master".into()
}
fn default_delivery_url() -> String {
    "https://cdn.contentful.com".into()
}
fn default_preview_url() -> String {
    "https://preview.contentful.com".into()
}
fn default_timeout_secs() -> u64 {
    10
}

impl Default for ContentfulConfig {
    fn default() -> Self {
        Self {
            space_id: None,
            environment: default_environment(),
            access_token: None,
            preview_access_token: None,
            delivery_url: default_delivery_url(),
            preview_url: default_preview_url(),
            revalidate_secret: None,
            preview_secret: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct CacheConfig {
    /// Revalidation window for cached content. Default: one day.
    #[serde(default = "default_cache_ttl_secs")]
    pub ttl_secs: u64,
}

fn default_cache_ttl_secs() -> u64 {
    86_400
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_cache_ttl_secs(),
        }
    }
}

/// Outbound mail. The transport counts as configured only when host, port,
/// user and pass are all present.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct SmtpConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub user: Option<String>,
    pub pass: Option<String>,
    /// Implicit TLS. Port 465 implies it.
    #[serde(default)]
    pub secure: bool,
    /// Sender address. Falls back to `user` when absent.
    pub from: Option<String>,
    /// Recipient of form submissions.
    pub contact_email: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RateLimitConfig {
    #[serde(default = "default_window_secs")]
    pub window_secs: u64,
    /// Accepted contact submissions per window. Default: 3.
    #[serde(default = "default_contact_max")]
    pub contact_max: u32,
    /// Accepted review submissions per window. Default: 2.
    #[serde(default = "default_review_max")]
    pub review_max: u32,
    #[serde(default = "default_cleanup_interval_secs")]
    pub cleanup_interval_secs: u64,
}

fn default_window_secs() -> u64 {
    60
}
fn default_contact_max() -> u32 {
    3
}
fn default_review_max() -> u32 {
    2
}
fn default_cleanup_interval_secs() -> u64 {
    300
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            window_secs: default_window_secs(),
            contact_max: default_contact_max(),
            review_max: default_review_max(),
            cleanup_interval_secs: default_cleanup_interval_secs(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct SiteConfig {
    /// Public base URL, without a trailing slash.
    #[serde(default = "default_site_url")]
    pub url: String,
    #[serde(default = "default_site_name")]
    pub name: String,
}

fn default_site_url() -> String {
    "https://mygeodesy.by".into()
}
fn default_site_name() -> String {
    "Геодезические услуги".into()
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            url: default_site_url(),
            name: default_site_name(),
        }
    }
}

impl SiteConfig {
    /// Base URL with any trailing slash removed.
    pub fn base_url(&self) -> &str {
        self.url.trim_end_matches('/')
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    #[serde(default)]
    pub contentful: ContentfulConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub smtp: SmtpConfig,
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
    #[serde(default)]
    pub site: SiteConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let s = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("server.cors.allow_origins", Vec::<String>::new())?
            .set_default("server.cors.max_age", 3600)?
            // Load from config/config.toml
            .add_source(File::with_name("config/config").required(false))
            // Override from environment (e.g., GEODESY__SMTP__HOST)
            .add_source(
                Environment::with_prefix("GEODESY")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("server.cors.allow_origins")
                    .try_parsing(true),
            )
            .build()?;

        s.try_deserialize()
    }
}
