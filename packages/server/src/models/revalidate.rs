use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;

/// CMS webhook body. Only the parts used for tag selection are modelled.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct WebhookPayload {
    #[serde(default)]
    pub sys: WebhookSys,
    /// Entry fields. For `seoPage`, `slug` may be a locale map.
    #[serde(default)]
    #[schema(value_type = Object)]
    pub fields: Map<String, Value>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WebhookSys {
    /// Entry id.
    pub id: Option<String>,
    /// Link object whose `sys.id` names the content type.
    #[schema(value_type = Option<Object>)]
    pub content_type: Option<Value>,
}

impl WebhookPayload {
    pub fn content_type(&self) -> Option<&str> {
        self.sys.content_type.as_ref()?.pointer("/sys/id")?.as_str()
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RevalidateResponse {
    pub success: bool,
    #[schema(example = "Cache revalidated")]
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = "service")]
    pub content_type: Option<String>,
    /// Tags that were invalidated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl RevalidateResponse {
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            content_type: None,
            tags: None,
            timestamp: None,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct WebhookHealth {
    #[schema(example = "ok")]
    pub status: &'static str,
    pub message: &'static str,
    pub timestamp: DateTime<Utc>,
}
