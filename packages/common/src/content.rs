//! Structured content as fetched from the CMS.
//!
//! All of these are read-only snapshots. The CMS owns and mutates them;
//! the site only renders them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Rich-text document as delivered by the CMS (node tree, rendered by the client).
pub type RichText = serde_json::Value;

/// Icon identifiers the site knows how to render.
pub const ICON_SET: &[&str] = &[
    "Activity", "Aperture", "Award", "BadgePercent", "Binoculars", "Briefcase", "Building",
    "Calculator", "Camera", "CheckCircle", "CircuitBoard", "Clock", "Cog", "Compass", "Cpu",
    "Crosshair", "FileText", "Focus", "Gauge", "HardDrive", "Heart", "Home", "Landmark",
    "Laptop", "LocateFixed", "Lock", "Mail", "Map", "MapPin", "MessageSquare", "Monitor",
    "Mountain", "Navigation", "PenTool", "Phone", "Radio", "Ruler", "Satellite", "Scale", "Scan",
    "ScanLine", "ScanSearch", "Settings", "Shield", "ShieldCheck", "Signal", "Star", "Target",
    "Telescope", "ThumbsUp", "TreePine", "TrendingUp", "UserCheck", "Users", "View", "Wifi",
    "Wrench", "Zap",
];

/// Resolve an icon identifier against [`ICON_SET`].
///
/// Unknown identifiers resolve to `None` and the item renders without an icon.
pub fn resolve_icon(name: &str) -> Option<&'static str> {
    let name = name.trim();
    ICON_SET.iter().copied().find(|icon| *icon == name)
}

/// A resolved media asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    /// Absolute URL of the file.
    #[schema(example = "https://images.ctfassets.net/space/asset/hero.jpg")]
    pub url: String,
    pub title: Option<String>,
    pub content_type: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct GeoPoint {
    #[schema(example = 52.0975)]
    pub latitude: f64,
    #[schema(example = 23.734)]
    pub longitude: f64,
}

/// Messenger handles. Each one is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Messengers {
    pub telegram: Option<String>,
    pub viber: Option<String>,
    pub whatsapp: Option<String>,
    pub instagram: Option<String>,
}

/// Legal entity and banking requisites.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LegalDetails {
    pub legal_name: Option<String>,
    /// Taxpayer registration number.
    pub unp: Option<String>,
    pub bank_name: Option<String>,
    pub bank_account: Option<String>,
    pub bic: Option<String>,
}

impl LegalDetails {
    pub fn is_empty(&self) -> bool {
        self.legal_name.is_none()
            && self.unp.is_none()
            && self.bank_name.is_none()
            && self.bank_account.is_none()
            && self.bic.is_none()
    }
}

/// Company profile singleton. At most one exists; absence is valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompanyProfile {
    pub id: String,
    #[schema(example = "Геодезия Брест")]
    pub name: String,
    pub description: String,
    pub address: String,
    #[schema(example = "+375 29 123 45 67")]
    pub phone: String,
    pub email: String,
    #[schema(example = "Пн-Пт 9:00-18:00")]
    pub work_hours: String,
    pub messengers: Messengers,
    pub coordinates: Option<GeoPoint>,
    pub legal: LegalDetails,
    pub hero_image_desktop: Option<Asset>,
    pub hero_image_mobile: Option<Asset>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: String,
    #[schema(example = "Топографическая съемка")]
    pub title: String,
    pub description: String,
    #[schema(value_type = Option<Object>)]
    pub full_description: Option<RichText>,
    #[schema(example = "от 300 BYN")]
    pub price: String,
    pub timeframe: Option<String>,
    /// Unique, URL-safe lookup key for the detail page.
    #[schema(example = "topographic-survey")]
    pub slug: String,
    pub image: Option<Asset>,
    pub image_alt_text: Option<String>,
    pub meta_description: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Advantage {
    pub id: String,
    pub title: String,
    pub description: String,
    /// Icon identifier, present only when it resolves against the icon set.
    pub icon: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BlogPost {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    #[schema(value_type = Object)]
    pub content: RichText,
    pub cover_image: Option<Asset>,
    pub published_at: DateTime<Utc>,
    pub author: Option<String>,
    /// Estimated reading time in minutes.
    pub reading_time: Option<u32>,
    pub meta_description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: String,
    pub author_name: String,
    pub author_location: Option<String>,
    /// Integer rating, 1-5.
    #[schema(minimum = 1, maximum = 5)]
    pub rating: u8,
    pub text: String,
    pub published_at: DateTime<Utc>,
    /// Inactive reviews are soft-hidden and never surfaced.
    pub is_active: bool,
}

/// Aggregate over the active reviews.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewStats {
    /// Average rating rounded to one decimal.
    #[schema(example = 4.8)]
    pub rating_value: f64,
    pub review_count: usize,
}

impl ReviewStats {
    /// Compute stats over `reviews`. Returns `None` for an empty slice.
    pub fn from_reviews(reviews: &[Review]) -> Option<Self> {
        if reviews.is_empty() {
            return None;
        }
        let total: u32 = reviews.iter().map(|r| u32::from(r.rating)).sum();
        let average = f64::from(total) / reviews.len() as f64;
        Some(Self {
            rating_value: (average * 10.0).round() / 10.0,
            review_count: reviews.len(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Faq {
    pub id: String,
    pub question: String,
    pub answer: String,
    /// Ascending sort key. Entries without one sort last.
    pub order: Option<i32>,
}

/// Per-page SEO override.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct SeoPage {
    pub slug: String,
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Owner {
    pub name: String,
    pub title: String,
    pub photo: Option<Asset>,
    pub story: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BusinessStats {
    pub years_in_business: u32,
    pub projects_completed: u32,
    pub clients_served: u32,
    pub regions_served: String,
}

impl BusinessStats {
    pub fn is_empty(&self) -> bool {
        self.years_in_business == 0
            && self.projects_completed == 0
            && self.clients_served == 0
            && self.regions_served.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct EducationItem {
    pub institution: String,
    pub degree: String,
    pub year: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct CertificationItem {
    pub title: String,
    pub issuer: String,
    pub year: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LicenseItem {
    pub title: String,
    pub number: String,
    pub valid_until: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct EquipmentItem {
    pub name: String,
    pub icon: Option<String>,
    pub model: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Credentials {
    pub education: Vec<EducationItem>,
    pub certifications: Vec<CertificationItem>,
    pub licenses: Vec<LicenseItem>,
}

impl Credentials {
    pub fn is_empty(&self) -> bool {
        self.education.is_empty() && self.certifications.is_empty() && self.licenses.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Equipment {
    pub description: String,
    pub items: Vec<EquipmentItem>,
}

/// Owner bio singleton with its linked credential and equipment entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PersonalInfo {
    pub owner: Owner,
    pub stats: BusinessStats,
    pub credentials: Credentials,
    pub equipment: Equipment,
    pub has_photo: bool,
    pub has_stats: bool,
    pub has_credentials: bool,
    pub has_equipment: bool,
}

impl PersonalInfo {
    /// Assemble the record and derive the `has_*` presence flags.
    pub fn new(owner: Owner, stats: BusinessStats, credentials: Credentials, equipment: Equipment) -> Self {
        let has_photo = owner.photo.is_some();
        let has_stats = !stats.is_empty();
        let has_credentials = !credentials.is_empty();
        let has_equipment = !equipment.items.is_empty() || !equipment.description.is_empty();
        Self {
            owner,
            stats,
            credentials,
            equipment,
            has_photo,
            has_stats,
            has_credentials,
            has_equipment,
        }
    }
}
