//! Wire shapes of the CMS delivery API and link resolution.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use common::content::Asset;
use serde::Deserialize;
use serde_json::{Map, Value};

/// Query parameters for an entries request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryQuery {
    pub content_type: String,
    /// Sort expression, e.g. `sys.createdAt` or `-fields.publishedAt`.
    pub order: Option<String>,
    pub limit: Option<u32>,
    /// Link resolution depth.
    pub include: Option<u8>,
}

impl EntryQuery {
    pub fn new(content_type: impl Into<String>) -> Self {
        Self {
            content_type: content_type.into(),
            order: None,
            limit: None,
            include: None,
        }
    }

    pub fn order(mut self, order: impl Into<String>) -> Self {
        self.order = Some(order.into());
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn include(mut self, depth: u8) -> Self {
        self.include = Some(depth);
        self
    }

    /// Render as URL query pairs.
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![("content_type", self.content_type.clone())];
        if let Some(order) = &self.order {
            params.push(("order", order.clone()));
        }
        if let Some(limit) = self.limit {
            params.push(("limit", limit.to_string()));
        }
        if let Some(include) = self.include {
            params.push(("include", include.to_string()));
        }
        params
    }
}

/// Response body of `GET /spaces/{space}/environments/{env}/entries`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EntryCollection {
    #[serde(default)]
    pub items: Vec<RawEntry>,
    #[serde(default)]
    pub includes: Includes,
}

impl EntryCollection {
    /// Index linked entries and assets for resolution. Top-level items are
    /// indexed too, since the API does not repeat them under `includes`.
    pub fn links(&self) -> Links<'_> {
        let entries = self
            .items
            .iter()
            .chain(self.includes.entries.iter())
            .map(|e| (e.sys.id.as_str(), e))
            .collect();
        let assets = self
            .includes
            .assets
            .iter()
            .map(|a| (a.sys.id.as_str(), a))
            .collect();
        Links { entries, assets }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Includes {
    #[serde(rename = "Entry", default)]
    pub entries: Vec<RawEntry>,
    #[serde(rename = "Asset", default)]
    pub assets: Vec<RawAsset>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawEntry {
    pub sys: EntrySys,
    #[serde(default)]
    pub fields: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntrySys {
    pub id: String,
    pub created_at: Option<DateTime<Utc>>,
    pub content_type: Option<Link>,
}

impl RawEntry {
    pub fn content_type(&self) -> Option<&str> {
        self.sys.content_type.as_ref().map(|l| l.sys.id.as_str())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Link {
    pub sys: LinkSys,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LinkSys {
    pub id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawAsset {
    pub sys: AssetSys,
    #[serde(default)]
    pub fields: AssetFields,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AssetSys {
    pub id: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AssetFields {
    pub title: Option<String>,
    pub file: Option<AssetFile>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetFile {
    pub url: Option<String>,
    pub content_type: Option<String>,
}

impl RawAsset {
    fn to_asset(&self) -> Option<Asset> {
        let file = self.fields.file.as_ref()?;
        let url = absolute_asset_url(file.url.as_deref()?)?;
        Some(Asset {
            url,
            title: self.fields.title.clone(),
            content_type: file.content_type.clone(),
        })
    }
}

/// The delivery API returns protocol-relative file URLs (`//images...`).
pub fn absolute_asset_url(url: &str) -> Option<String> {
    let url = url.trim();
    if url.is_empty() {
        None
    } else if url.starts_with("//") {
        Some(format!("https:{url}"))
    } else {
        Some(url.to_string())
    }
}

/// Lookup tables for resolving link objects found in entry fields.
pub struct Links<'a> {
    entries: HashMap<&'a str, &'a RawEntry>,
    assets: HashMap<&'a str, &'a RawAsset>,
}

impl<'a> Links<'a> {
    fn link_id(value: &Value) -> Option<&str> {
        value.get("sys")?.get("id")?.as_str()
    }

    /// Resolve an asset link. Unresolvable links and assets without a file are `None`.
    pub fn asset(&self, value: Option<&Value>) -> Option<Asset> {
        let value = value?;
        // Already-resolved assets carry their fields inline.
        if value.get("fields").is_some() {
            let raw: RawAsset = serde_json::from_value(value.clone()).ok()?;
            return raw.to_asset();
        }
        self.assets.get(Self::link_id(value)?)?.to_asset()
    }

    /// Resolve an array of entry links, skipping unresolvable ones.
    pub fn entries(&self, value: Option<&Value>) -> Vec<&'a RawEntry> {
        let Some(Value::Array(links)) = value else {
            return Vec::new();
        };
        links
            .iter()
            .filter_map(|link| Self::link_id(link))
            .filter_map(|id| self.entries.get(id).copied())
            .collect()
    }
}

/// Parse a CMS date field. Accepts RFC 3339, minute-precision timestamps
/// with or without an offset, and plain dates (taken as UTC midnight).
pub fn parse_cms_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M%:z") {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
