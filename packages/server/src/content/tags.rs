//! Cache tags per content type.
//!
//! Shared by the accessors, which attach these tags to what they cache, and
//! by the revalidation webhook, which invalidates them when the CMS reports
//! a change.

/// Attached to everything fetched from the CMS.
pub const SOURCE: &str = "contentful";

pub const COMPANY_INFO: &[&str] = &[SOURCE, "company-info"];
pub const SERVICES: &[&str] = &[SOURCE, "services"];
pub const ADVANTAGES: &[&str] = &[SOURCE, "advantages"];
pub const SEO: &[&str] = &[SOURCE, "seo"];
pub const BLOG_POSTS: &[&str] = &[SOURCE, "blog-posts"];
pub const REVIEWS: &[&str] = &[SOURCE, "reviews"];
pub const FAQS: &[&str] = &[SOURCE, "faqs"];
pub const PERSONAL_INFO: &[&str] = &[SOURCE, "personal-info"];

/// SEO slug of the contacts page, refreshed after a contact submission.
pub const CONTACTS_PAGE: &str = "contacts";

/// Tags to invalidate when an entry of `content_type` changes.
/// Unknown content types map to `None`.
pub fn tags_for(content_type: &str) -> Option<&'static [&'static str]> {
    match content_type {
        "companyInfo" => Some(COMPANY_INFO),
        "service" => Some(SERVICES),
        "advantage" => Some(ADVANTAGES),
        "seoPage" => Some(SEO),
        "blogPost" => Some(BLOG_POSTS),
        "review" => Some(REVIEWS),
        "faq" => Some(FAQS),
        "personalInfo" => Some(PERSONAL_INFO),
        _ => None,
    }
}

/// Per-page SEO tag, so that one page's metadata can be dropped alone.
pub fn seo_slug_tag(slug: &str) -> String {
    format!("seo-{slug}")
}

pub(crate) fn owned(tags: &[&str]) -> Vec<String> {
    tags.iter().map(|t| t.to_string()).collect()
}
