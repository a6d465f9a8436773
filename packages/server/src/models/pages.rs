//! Page payloads: content composed per page, plus its JSON-LD blocks.

use common::content::{
    Advantage, BlogPost, CompanyProfile, Faq, PersonalInfo, Review, ReviewStats, SeoPage, Service,
};
use serde::Serialize;
use serde_json::Value;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HomePage {
    /// `true` when draft content was served.
    pub preview: bool,
    /// Absent when the CMS has no profile; the site renders a fallback.
    pub company: Option<CompanyProfile>,
    pub services: Vec<Service>,
    pub advantages: Vec<Advantage>,
    pub reviews: Vec<Review>,
    pub review_stats: Option<ReviewStats>,
    pub faqs: Vec<Faq>,
    pub seo: Option<SeoPage>,
    #[schema(value_type = Vec<Object>)]
    pub structured_data: Vec<Value>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServicesPage {
    pub preview: bool,
    pub company: Option<CompanyProfile>,
    pub services: Vec<Service>,
    pub seo: Option<SeoPage>,
    #[schema(value_type = Vec<Object>)]
    pub structured_data: Vec<Value>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServicePage {
    pub preview: bool,
    pub service: Service,
    /// The rest of the catalog, for cross-links.
    pub other_services: Vec<Service>,
    pub company: Option<CompanyProfile>,
    #[schema(value_type = Vec<Object>)]
    pub structured_data: Vec<Value>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BlogPage {
    pub preview: bool,
    /// Newest first.
    pub posts: Vec<BlogPost>,
    pub seo: Option<SeoPage>,
    #[schema(value_type = Vec<Object>)]
    pub structured_data: Vec<Value>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BlogPostPage {
    pub preview: bool,
    pub post: BlogPost,
    #[schema(value_type = Vec<Object>)]
    pub structured_data: Vec<Value>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AboutPage {
    pub preview: bool,
    pub personal_info: Option<PersonalInfo>,
    pub company: Option<CompanyProfile>,
    pub reviews: Vec<Review>,
    pub review_stats: Option<ReviewStats>,
    pub seo: Option<SeoPage>,
    #[schema(value_type = Vec<Object>)]
    pub structured_data: Vec<Value>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContactsPage {
    pub preview: bool,
    pub company: Option<CompanyProfile>,
    pub faqs: Vec<Faq>,
    pub seo: Option<SeoPage>,
    #[schema(value_type = Vec<Object>)]
    pub structured_data: Vec<Value>,
}
