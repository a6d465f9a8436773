//! Decoding of raw CMS entries into the content model.

use common::content::{
    Advantage, BlogPost, BusinessStats, CertificationItem, CompanyProfile, Credentials,
    EducationItem, Equipment, EquipmentItem, Faq, GeoPoint, LegalDetails, LicenseItem, Messengers,
    Owner, PersonalInfo, Review, RichText, SeoPage, Service, resolve_icon,
};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

use super::entries::{EntryCollection, Links, RawEntry, parse_cms_date};
use super::error::DecodeError;

/// A content model type backed by one CMS content type.
pub trait FromEntry: Sized {
    /// CMS content type id, e.g. `service`.
    const CONTENT_TYPE: &'static str;

    fn from_entry(entry: &RawEntry, links: &Links<'_>) -> Result<Self, DecodeError>;
}

/// Decode every item of a collection, skipping entries that do not decode.
pub fn decode_all<T: FromEntry>(collection: &EntryCollection) -> Vec<T> {
    let links = collection.links();
    collection
        .items
        .iter()
        .filter_map(|entry| match T::from_entry(entry, &links) {
            Ok(item) => Some(item),
            Err(e) => {
                warn!(error = %e, "Skipping undecodable entry");
                None
            }
        })
        .collect()
}

fn fields<T: DeserializeOwned>(content_type: &'static str, entry: &RawEntry) -> Result<T, DecodeError> {
    serde_json::from_value(Value::Object(entry.fields.clone())).map_err(|source| DecodeError::Fields {
        content_type,
        id: entry.sys.id.clone(),
        source,
    })
}

fn date_field(
    content_type: &'static str,
    entry: &RawEntry,
    field: &'static str,
    raw: &str,
) -> Result<chrono::DateTime<chrono::Utc>, DecodeError> {
    parse_cms_date(raw).ok_or_else(|| DecodeError::InvalidValue {
        content_type,
        id: entry.sys.id.clone(),
        field,
        value: raw.to_string(),
    })
}

/// Empty strings from the CMS editor mean "not set".
fn present(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn icon(value: Option<&str>) -> Option<String> {
    value.and_then(resolve_icon).map(str::to_string)
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CompanyInfoFields {
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    address: String,
    #[serde(default)]
    phone: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    work_hours: String,
    telegram: Option<String>,
    viber: Option<String>,
    whatsapp: Option<String>,
    instagram: Option<String>,
    latitude: Option<f64>,
    longitude: Option<f64>,
    legal_name: Option<String>,
    unp: Option<String>,
    bank_name: Option<String>,
    bank_account: Option<String>,
    bic: Option<String>,
    hero_image_desktop: Option<Value>,
    hero_image_mobile: Option<Value>,
}

impl FromEntry for CompanyProfile {
    const CONTENT_TYPE: &'static str = "companyInfo";

    fn from_entry(entry: &RawEntry, links: &Links<'_>) -> Result<Self, DecodeError> {
        let f: CompanyInfoFields = fields(Self::CONTENT_TYPE, entry)?;
        let coordinates = match (f.latitude, f.longitude) {
            (Some(latitude), Some(longitude)) => Some(GeoPoint { latitude, longitude }),
            _ => None,
        };
        Ok(Self {
            id: entry.sys.id.clone(),
            name: f.name,
            description: f.description,
            address: f.address,
            phone: f.phone,
            email: f.email,
            work_hours: f.work_hours,
            messengers: Messengers {
                telegram: present(f.telegram),
                viber: present(f.viber),
                whatsapp: present(f.whatsapp),
                instagram: present(f.instagram),
            },
            coordinates,
            legal: LegalDetails {
                legal_name: present(f.legal_name),
                unp: present(f.unp),
                bank_name: present(f.bank_name),
                bank_account: present(f.bank_account),
                bic: present(f.bic),
            },
            hero_image_desktop: links.asset(f.hero_image_desktop.as_ref()),
            hero_image_mobile: links.asset(f.hero_image_mobile.as_ref()),
        })
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ServiceFields {
    title: String,
    #[serde(default)]
    description: String,
    full_description: Option<RichText>,
    #[serde(default)]
    price: String,
    timeframe: Option<String>,
    slug: String,
    image: Option<Value>,
    image_alt_text: Option<String>,
    meta_description: Option<String>,
}

impl FromEntry for Service {
    const CONTENT_TYPE: &'static str = "service";

    fn from_entry(entry: &RawEntry, links: &Links<'_>) -> Result<Self, DecodeError> {
        let f: ServiceFields = fields(Self::CONTENT_TYPE, entry)?;
        Ok(Self {
            id: entry.sys.id.clone(),
            title: f.title,
            description: f.description,
            full_description: f.full_description,
            price: f.price,
            timeframe: present(f.timeframe),
            slug: f.slug.trim().to_string(),
            image: links.asset(f.image.as_ref()),
            image_alt_text: present(f.image_alt_text),
            meta_description: present(f.meta_description),
            created_at: entry.sys.created_at,
        })
    }
}

#[derive(Deserialize)]
struct AdvantageFields {
    title: String,
    #[serde(default)]
    description: String,
    icon: Option<String>,
}

impl FromEntry for Advantage {
    const CONTENT_TYPE: &'static str = "advantage";

    fn from_entry(entry: &RawEntry, _links: &Links<'_>) -> Result<Self, DecodeError> {
        let f: AdvantageFields = fields(Self::CONTENT_TYPE, entry)?;
        Ok(Self {
            id: entry.sys.id.clone(),
            title: f.title,
            description: f.description,
            icon: icon(f.icon.as_deref()),
            created_at: entry.sys.created_at,
        })
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct BlogPostFields {
    title: String,
    slug: String,
    #[serde(default)]
    excerpt: String,
    #[serde(default)]
    content: RichText,
    cover_image: Option<Value>,
    published_at: String,
    author: Option<String>,
    reading_time: Option<u32>,
    meta_description: Option<String>,
}

impl FromEntry for BlogPost {
    const CONTENT_TYPE: &'static str = "blogPost";

    fn from_entry(entry: &RawEntry, links: &Links<'_>) -> Result<Self, DecodeError> {
        let f: BlogPostFields = fields(Self::CONTENT_TYPE, entry)?;
        let published_at = date_field(Self::CONTENT_TYPE, entry, "publishedAt", &f.published_at)?;
        Ok(Self {
            id: entry.sys.id.clone(),
            title: f.title,
            slug: f.slug.trim().to_string(),
            excerpt: f.excerpt,
            content: f.content,
            cover_image: links.asset(f.cover_image.as_ref()),
            published_at,
            author: present(f.author),
            reading_time: f.reading_time,
            meta_description: present(f.meta_description),
        })
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReviewFields {
    author_name: String,
    author_location: Option<String>,
    rating: i64,
    #[serde(default)]
    text: String,
    published_at: String,
    #[serde(default)]
    is_active: bool,
}

impl FromEntry for Review {
    const CONTENT_TYPE: &'static str = "review";

    fn from_entry(entry: &RawEntry, _links: &Links<'_>) -> Result<Self, DecodeError> {
        let f: ReviewFields = fields(Self::CONTENT_TYPE, entry)?;
        let rating = u8::try_from(f.rating)
            .ok()
            .filter(|r| (1..=5).contains(r))
            .ok_or_else(|| DecodeError::InvalidValue {
                content_type: Self::CONTENT_TYPE,
                id: entry.sys.id.clone(),
                field: "rating",
                value: f.rating.to_string(),
            })?;
        let published_at = date_field(Self::CONTENT_TYPE, entry, "publishedAt", &f.published_at)?;
        Ok(Self {
            id: entry.sys.id.clone(),
            author_name: f.author_name,
            author_location: present(f.author_location),
            rating,
            text: f.text,
            published_at,
            is_active: f.is_active,
        })
    }
}

#[derive(Deserialize)]
struct FaqFields {
    question: String,
    #[serde(default)]
    answer: String,
    order: Option<i32>,
}

impl FromEntry for Faq {
    const CONTENT_TYPE: &'static str = "faq";

    fn from_entry(entry: &RawEntry, _links: &Links<'_>) -> Result<Self, DecodeError> {
        let f: FaqFields = fields(Self::CONTENT_TYPE, entry)?;
        Ok(Self {
            id: entry.sys.id.clone(),
            question: f.question,
            answer: f.answer,
            order: f.order,
        })
    }
}

#[derive(Deserialize)]
struct SeoPageFields {
    slug: Value,
    title: String,
    #[serde(default)]
    description: String,
}

/// A slug field is a plain string, or a locale map when fetched with `locale=*`.
pub fn slug_value(value: &Value) -> Option<&str> {
    match value {
        Value::String(s) => Some(s.as_str()),
        Value::Object(locales) => locales.values().find_map(Value::as_str),
        _ => None,
    }
}

impl FromEntry for SeoPage {
    const CONTENT_TYPE: &'static str = "seoPage";

    fn from_entry(entry: &RawEntry, _links: &Links<'_>) -> Result<Self, DecodeError> {
        let f: SeoPageFields = fields(Self::CONTENT_TYPE, entry)?;
        let slug = slug_value(&f.slug).ok_or_else(|| DecodeError::InvalidValue {
            content_type: Self::CONTENT_TYPE,
            id: entry.sys.id.clone(),
            field: "slug",
            value: f.slug.to_string(),
        })?;
        Ok(Self {
            slug: slug.trim().to_string(),
            title: f.title,
            description: f.description,
        })
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PersonalInfoFields {
    name: String,
    #[serde(default)]
    title: String,
    photo: Option<Value>,
    story: Option<String>,
    years_in_business: Option<u32>,
    projects_completed: Option<u32>,
    clients_served: Option<u32>,
    regions_served: Option<String>,
    education: Option<Value>,
    certifications: Option<Value>,
    licenses: Option<Value>,
    equipment_description: Option<String>,
    equipment_list: Option<Value>,
}

#[derive(Deserialize)]
struct EducationFields {
    institution: String,
    #[serde(default)]
    degree: String,
    year: Option<String>,
}

#[derive(Deserialize)]
struct CertificationFields {
    title: String,
    issuer: Option<String>,
    year: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LicenseFields {
    title: String,
    number: Option<String>,
    valid_until: Option<String>,
}

#[derive(Deserialize)]
struct EquipmentFields {
    name: String,
    icon: Option<String>,
    model: Option<String>,
    description: Option<String>,
}

/// Decode linked sub-entries, dropping the ones that do not decode.
fn linked<T: DeserializeOwned>(content_type: &'static str, entries: Vec<&RawEntry>) -> Vec<T> {
    entries
        .into_iter()
        .filter_map(|entry| match fields(content_type, entry) {
            Ok(item) => Some(item),
            Err(e) => {
                warn!(error = %e, "Skipping undecodable linked entry");
                None
            }
        })
        .collect()
}

impl FromEntry for PersonalInfo {
    const CONTENT_TYPE: &'static str = "personalInfo";

    fn from_entry(entry: &RawEntry, links: &Links<'_>) -> Result<Self, DecodeError> {
        let f: PersonalInfoFields = fields(Self::CONTENT_TYPE, entry)?;

        let education = linked::<EducationFields>("educationItem", links.entries(f.education.as_ref()))
            .into_iter()
            .map(|e| EducationItem {
                institution: e.institution,
                degree: e.degree,
                year: e.year.unwrap_or_default(),
            })
            .collect();
        let certifications =
            linked::<CertificationFields>("certificationItem", links.entries(f.certifications.as_ref()))
                .into_iter()
                .map(|c| CertificationItem {
                    title: c.title,
                    issuer: c.issuer.unwrap_or_default(),
                    year: c.year.unwrap_or_default(),
                })
                .collect();
        let licenses = linked::<LicenseFields>("licenseItem", links.entries(f.licenses.as_ref()))
            .into_iter()
            .map(|l| LicenseItem {
                title: l.title,
                number: l.number.unwrap_or_default(),
                valid_until: l.valid_until.unwrap_or_default(),
            })
            .collect();
        let items = linked::<EquipmentFields>("equipmentItem", links.entries(f.equipment_list.as_ref()))
            .into_iter()
            .map(|e| EquipmentItem {
                name: e.name,
                icon: icon(e.icon.as_deref()),
                model: e.model.unwrap_or_default(),
                description: e.description.unwrap_or_default(),
            })
            .collect();

        let owner = Owner {
            name: f.name,
            title: f.title,
            photo: links.asset(f.photo.as_ref()),
            story: f.story.unwrap_or_default(),
        };
        let stats = BusinessStats {
            years_in_business: f.years_in_business.unwrap_or(0),
            projects_completed: f.projects_completed.unwrap_or(0),
            clients_served: f.clients_served.unwrap_or(0),
            regions_served: f.regions_served.unwrap_or_default(),
        };
        let credentials = Credentials {
            education,
            certifications,
            licenses,
        };
        let equipment = Equipment {
            description: f.equipment_description.unwrap_or_default(),
            items,
        };

        Ok(PersonalInfo::new(owner, stats, credentials, equipment))
    }
}
