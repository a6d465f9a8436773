use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};
use tokio::sync::OnceCell;
use tracing::{debug, info, instrument};

use super::entries::{EntryCollection, EntryQuery};
use super::error::CmsError;
use crate::config::ContentfulConfig;

/// Which content feed to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContentMode {
    /// Published content from the cached CDN endpoint.
    #[default]
    Published,
    /// Draft content from the preview endpoint. Never cached.
    Preview,
}

impl ContentMode {
    pub fn is_preview(self) -> bool {
        matches!(self, Self::Preview)
    }
}

/// Typed entry-query surface over the CMS.
#[async_trait]
pub trait EntrySource: Send + Sync {
    async fn entries(&self, query: &EntryQuery) -> Result<EntryCollection, CmsError>;
}

/// Hands out an [`EntrySource`] for a content mode.
#[async_trait]
pub trait SourceProvider: Send + Sync {
    async fn source(&self, mode: ContentMode) -> Result<Arc<dyn EntrySource>, CmsError>;
}

/// HTTP client for one CMS endpoint and token.
pub struct CmsClient {
    http: reqwest::Client,
    base_url: String,
    space_id: String,
    environment: String,
    mode: ContentMode,
}

impl CmsClient {
    /// Build a client for `mode` from configuration.
    ///
    /// Fails with [`CmsError::MissingConfig`] when the space id or the
    /// mode's access token is absent.
    pub fn from_config(config: &ContentfulConfig, mode: ContentMode) -> Result<Self, CmsError> {
        let space_id = non_empty(config.space_id.as_deref())
            .ok_or(CmsError::MissingConfig("contentful.space_id"))?;
        let (token, base_url) = match mode {
            ContentMode::Published => (
                non_empty(config.access_token.as_deref())
                    .ok_or(CmsError::MissingConfig("contentful.access_token"))?,
                &config.delivery_url,
            ),
            ContentMode::Preview => (
                non_empty(config.preview_access_token.as_deref())
                    .ok_or(CmsError::MissingConfig("contentful.preview_access_token"))?,
                &config.preview_url,
            ),
        };

        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|_| CmsError::MissingConfig("contentful access token is not a valid header value"))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            space_id: space_id.to_string(),
            environment: config.environment.clone(),
            mode,
        })
    }

    pub fn mode(&self) -> ContentMode {
        self.mode
    }

    fn entries_url(&self) -> String {
        format!(
            "{}/spaces/{}/environments/{}/entries",
            self.base_url, self.space_id, self.environment
        )
    }
}

#[async_trait]
impl EntrySource for CmsClient {
    #[instrument(skip(self), fields(content_type = %query.content_type, mode = ?self.mode))]
    async fn entries(&self, query: &EntryQuery) -> Result<EntryCollection, CmsError> {
        let response = self
            .http
            .get(self.entries_url())
            .query(&query.to_params())
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(CmsError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let collection: EntryCollection = serde_json::from_str(&body)?;
        debug!(items = collection.items.len(), "Fetched entries");
        Ok(collection)
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Produces CMS clients.
///
/// The published client is built on first use and reused afterwards.
/// Preview clients are built fresh per call so a preview session never
/// leaks into the shared handle.
pub struct ClientFactory {
    config: ContentfulConfig,
    default_client: OnceCell<Arc<CmsClient>>,
}

impl ClientFactory {
    pub fn new(config: ContentfulConfig) -> Self {
        Self {
            config,
            default_client: OnceCell::new(),
        }
    }

    /// The memoized published-content client.
    pub async fn get_default(&self) -> Result<Arc<CmsClient>, CmsError> {
        self.default_client
            .get_or_try_init(|| async {
                let client = CmsClient::from_config(&self.config, ContentMode::Published)?;
                info!("CMS client initialized");
                Ok::<_, CmsError>(Arc::new(client))
            })
            .await
            .cloned()
    }

    /// A fresh, non-memoized client for `mode`.
    pub fn create(&self, mode: ContentMode) -> Result<CmsClient, CmsError> {
        CmsClient::from_config(&self.config, mode)
    }

    pub fn is_initialized(&self) -> bool {
        self.default_client.initialized()
    }
}

#[async_trait]
impl SourceProvider for ClientFactory {
    async fn source(&self, mode: ContentMode) -> Result<Arc<dyn EntrySource>, CmsError> {
        match mode {
            ContentMode::Published => Ok(self.get_default().await?),
            ContentMode::Preview => Ok(Arc::new(self.create(ContentMode::Preview)?)),
        }
    }
}
