use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

/// Contact form payload. Missing fields count as empty and fail validation.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct ContactRequest {
    /// 2-100 characters.
    #[schema(example = "Иван Иванов")]
    pub name: String,
    /// Optional leading `+`, then 10-20 digits, spaces, hyphens or parentheses.
    #[schema(example = "+375 29 123 45 67")]
    pub phone: String,
    #[schema(example = "ivan@example.com")]
    pub email: Option<String>,
    /// 10-2000 characters.
    #[schema(example = "Нужна топографическая съемка участка")]
    pub message: String,
}

/// Review form payload.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct ReviewRequest {
    /// 2-100 characters.
    pub name: String,
    /// City or district, 2-100 characters when given.
    #[schema(example = "Брест")]
    pub location: Option<String>,
    /// Integer 1-5. Numeric strings and fractional numbers are truncated;
    /// anything unreadable is reported as a missing rating.
    #[serde(deserialize_with = "lenient_rating")]
    #[schema(value_type = i64, example = 5)]
    pub rating: Option<i64>,
    /// 20-1000 characters.
    pub text: String,
}

/// Leading integer of `value`, after optional whitespace and sign.
fn leading_integer(value: &str) -> Option<i64> {
    let value = value.trim_start();
    let sign = usize::from(value.starts_with(['+', '-']));
    let end = value[sign..]
        .find(|c: char| !c.is_ascii_digit())
        .map_or(value.len(), |i| i + sign);
    value[..end].parse().ok()
}

fn lenient_rating<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
        Value::String(s) => leading_integer(&s),
        _ => None,
    })
}

/// Result of a form submission.
#[derive(Debug, Serialize, ToSchema)]
pub struct FormResponse {
    pub success: bool,
    /// Message suitable for showing to the visitor.
    pub message: String,
    /// Individual problems, when there are any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
}

impl FormResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            errors: None,
        }
    }

    pub fn failed(message: impl Into<String>, errors: Vec<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            errors: Some(errors),
        }
    }
}
