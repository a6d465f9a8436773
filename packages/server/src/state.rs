use std::sync::Arc;
use std::time::Duration;

use common::cache::TagCache;
use common::rate_limit::RateLimiter;

use crate::config::AppConfig;
use crate::content::ContentService;
use crate::contentful::SourceProvider;
use crate::mail::Mailer;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub content: Arc<ContentService>,
    pub cache: Arc<dyn TagCache>,
    /// `None` when SMTP is not configured.
    pub mailer: Option<Arc<dyn Mailer>>,
    pub contact_limiter: Arc<RateLimiter>,
    pub review_limiter: Arc<RateLimiter>,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        provider: Arc<dyn SourceProvider>,
        cache: Arc<dyn TagCache>,
        mailer: Option<Arc<dyn Mailer>>,
    ) -> Self {
        let window = Duration::from_secs(config.rate_limit.window_secs);
        let content = ContentService::new(
            provider,
            cache.clone(),
            Duration::from_secs(config.cache.ttl_secs),
        );
        Self {
            contact_limiter: Arc::new(RateLimiter::new(config.rate_limit.contact_max, window)),
            review_limiter: Arc::new(RateLimiter::new(config.rate_limit.review_max, window)),
            content: Arc::new(content),
            cache,
            mailer,
            config: Arc::new(config),
        }
    }
}
