use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use common::cache::{CacheKey, TagCache, TagCacheExt};
use common::content::{
    Advantage, BlogPost, CompanyProfile, Faq, PersonalInfo, Review, ReviewStats, SeoPage, Service,
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{error, instrument};

use super::tags;
use crate::contentful::{CmsError, ContentMode, EntryQuery, FromEntry, SourceProvider, decode_all};

/// Link resolution depth for queries whose entries reference assets or other entries.
const INCLUDE_DEPTH: u8 = 2;

/// Typed, cached access to every content kind.
///
/// Each accessor comes in two flavors. `try_*` surfaces fetch failures as
/// [`CmsError`]. The plain accessor logs the failure and returns the empty
/// shape (`[]` or `None`), which is indistinguishable from "no entries".
///
/// Published reads go through the tagged cache. Preview reads always hit the
/// CMS.
pub struct ContentService {
    provider: Arc<dyn SourceProvider>,
    cache: Arc<dyn TagCache>,
    ttl: Duration,
}

fn or_empty<T: Default>(accessor: &'static str, result: Result<T, CmsError>) -> T {
    result.unwrap_or_else(|e| {
        error!(accessor, error = %e, "Content fetch failed, serving empty result");
        T::default()
    })
}

impl ContentService {
    pub fn new(provider: Arc<dyn SourceProvider>, cache: Arc<dyn TagCache>, ttl: Duration) -> Self {
        Self { provider, cache, ttl }
    }

    pub fn cache(&self) -> &Arc<dyn TagCache> {
        &self.cache
    }

    async fn fetch<T: FromEntry + Send>(
        &self,
        mode: ContentMode,
        query: EntryQuery,
    ) -> Result<Vec<T>, CmsError> {
        let source = self.provider.source(mode).await?;
        let collection = source.entries(&query).await?;
        Ok(decode_all(&collection))
    }

    async fn cached<T, F, Fut>(
        &self,
        mode: ContentMode,
        key: CacheKey,
        tag_set: Vec<String>,
        compute: F,
    ) -> Result<T, CmsError>
    where
        T: Serialize + DeserializeOwned + Send,
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = Result<T, CmsError>> + Send,
    {
        if mode.is_preview() {
            return compute().await;
        }
        self.cache.get_or_compute(key, self.ttl, tag_set, compute).await
    }

    // Company profile

    pub async fn try_company_profile(&self, mode: ContentMode) -> Result<Option<CompanyProfile>, CmsError> {
        let query = EntryQuery::new(CompanyProfile::CONTENT_TYPE)
            .limit(1)
            .include(INCLUDE_DEPTH);
        self.cached(
            mode,
            CacheKey::new(["company-info"]),
            tags::owned(tags::COMPANY_INFO),
            move || async move {
                let profiles: Vec<CompanyProfile> = self.fetch(mode, query).await?;
                Ok(profiles.into_iter().next())
            },
        )
        .await
    }

    #[instrument(skip(self))]
    pub async fn company_profile(&self, mode: ContentMode) -> Option<CompanyProfile> {
        or_empty("company_profile", self.try_company_profile(mode).await)
    }

    // Services

    pub async fn try_services(&self, mode: ContentMode) -> Result<Vec<Service>, CmsError> {
        let query = EntryQuery::new(Service::CONTENT_TYPE)
            .order("sys.createdAt")
            .include(INCLUDE_DEPTH);
        self.cached(
            mode,
            CacheKey::new(["services"]),
            tags::owned(tags::SERVICES),
            move || async move {
                let mut services: Vec<Service> = self.fetch(mode, query).await?;
                services.sort_by_key(|s| s.created_at);
                Ok(services)
            },
        )
        .await
    }

    #[instrument(skip(self))]
    pub async fn services(&self, mode: ContentMode) -> Vec<Service> {
        or_empty("services", self.try_services(mode).await)
    }

    /// Linear scan of the service list. The first match wins.
    pub async fn try_service_by_slug(&self, slug: &str, mode: ContentMode) -> Result<Option<Service>, CmsError> {
        let services = self.try_services(mode).await?;
        Ok(services.into_iter().find(|s| s.slug == slug))
    }

    #[instrument(skip(self))]
    pub async fn service_by_slug(&self, slug: &str, mode: ContentMode) -> Option<Service> {
        or_empty("service_by_slug", self.try_service_by_slug(slug, mode).await)
    }

    /// Slugs of all published services, for detail-page enumeration.
    pub async fn service_slugs(&self) -> Vec<String> {
        self.services(ContentMode::Published)
            .await
            .into_iter()
            .map(|s| s.slug)
            .collect()
    }

    // Advantages

    pub async fn try_advantages(&self, mode: ContentMode) -> Result<Vec<Advantage>, CmsError> {
        let query = EntryQuery::new(Advantage::CONTENT_TYPE).order("sys.createdAt");
        self.cached(
            mode,
            CacheKey::new(["advantages"]),
            tags::owned(tags::ADVANTAGES),
            move || async move {
                let mut advantages: Vec<Advantage> = self.fetch(mode, query).await?;
                advantages.sort_by_key(|a| a.created_at);
                Ok(advantages)
            },
        )
        .await
    }

    #[instrument(skip(self))]
    pub async fn advantages(&self, mode: ContentMode) -> Vec<Advantage> {
        or_empty("advantages", self.try_advantages(mode).await)
    }

    // Blog

    pub async fn try_blog_posts(&self, mode: ContentMode) -> Result<Vec<BlogPost>, CmsError> {
        let query = EntryQuery::new(BlogPost::CONTENT_TYPE)
            .order("-fields.publishedAt")
            .include(INCLUDE_DEPTH);
        self.cached(
            mode,
            CacheKey::new(["blog-posts"]),
            tags::owned(tags::BLOG_POSTS),
            move || async move {
                let mut posts: Vec<BlogPost> = self.fetch(mode, query).await?;
                posts.sort_by(|a, b| b.published_at.cmp(&a.published_at));
                Ok(posts)
            },
        )
        .await
    }

    #[instrument(skip(self))]
    pub async fn blog_posts(&self, mode: ContentMode) -> Vec<BlogPost> {
        or_empty("blog_posts", self.try_blog_posts(mode).await)
    }

    pub async fn try_blog_post_by_slug(&self, slug: &str, mode: ContentMode) -> Result<Option<BlogPost>, CmsError> {
        let posts = self.try_blog_posts(mode).await?;
        Ok(posts.into_iter().find(|p| p.slug == slug))
    }

    #[instrument(skip(self))]
    pub async fn blog_post_by_slug(&self, slug: &str, mode: ContentMode) -> Option<BlogPost> {
        or_empty("blog_post_by_slug", self.try_blog_post_by_slug(slug, mode).await)
    }

    pub async fn blog_slugs(&self) -> Vec<String> {
        self.blog_posts(ContentMode::Published)
            .await
            .into_iter()
            .map(|p| p.slug)
            .collect()
    }

    // Reviews

    /// Active reviews, newest first. The CMS query does not filter on the
    /// active flag, so inactive entries are dropped here.
    pub async fn try_reviews(&self, mode: ContentMode) -> Result<Vec<Review>, CmsError> {
        let query = EntryQuery::new(Review::CONTENT_TYPE).order("-fields.publishedAt");
        self.cached(
            mode,
            CacheKey::new(["reviews"]),
            tags::owned(tags::REVIEWS),
            move || async move {
                let mut reviews: Vec<Review> = self.fetch(mode, query).await?;
                reviews.retain(|r| r.is_active);
                reviews.sort_by(|a, b| b.published_at.cmp(&a.published_at));
                Ok(reviews)
            },
        )
        .await
    }

    #[instrument(skip(self))]
    pub async fn reviews(&self, mode: ContentMode) -> Vec<Review> {
        or_empty("reviews", self.try_reviews(mode).await)
    }

    pub async fn try_review_stats(&self, mode: ContentMode) -> Result<Option<ReviewStats>, CmsError> {
        let reviews = self.try_reviews(mode).await?;
        Ok(ReviewStats::from_reviews(&reviews))
    }

    pub async fn review_stats(&self, mode: ContentMode) -> Option<ReviewStats> {
        or_empty("review_stats", self.try_review_stats(mode).await)
    }

    // Personal info

    pub async fn try_personal_info(&self, mode: ContentMode) -> Result<Option<PersonalInfo>, CmsError> {
        let query = EntryQuery::new(PersonalInfo::CONTENT_TYPE)
            .limit(1)
            .include(INCLUDE_DEPTH);
        self.cached(
            mode,
            CacheKey::new(["personal-info"]),
            tags::owned(tags::PERSONAL_INFO),
            move || async move {
                let infos: Vec<PersonalInfo> = self.fetch(mode, query).await?;
                Ok(infos.into_iter().next())
            },
        )
        .await
    }

    #[instrument(skip(self))]
    pub async fn personal_info(&self, mode: ContentMode) -> Option<PersonalInfo> {
        or_empty("personal_info", self.try_personal_info(mode).await)
    }

    // FAQ

    /// FAQs by ascending `order`; entries without an order come last.
    pub async fn try_faqs(&self, mode: ContentMode) -> Result<Vec<Faq>, CmsError> {
        let query = EntryQuery::new(Faq::CONTENT_TYPE).order("fields.order");
        self.cached(
            mode,
            CacheKey::new(["faqs"]),
            tags::owned(tags::FAQS),
            move || async move {
                let mut faqs: Vec<Faq> = self.fetch(mode, query).await?;
                faqs.sort_by_key(|f| (f.order.is_none(), f.order));
                Ok(faqs)
            },
        )
        .await
    }

    #[instrument(skip(self))]
    pub async fn faqs(&self, mode: ContentMode) -> Vec<Faq> {
        or_empty("faqs", self.try_faqs(mode).await)
    }

    // SEO

    /// SEO override for one page, cached under its own `seo-<slug>` tag.
    pub async fn try_seo_page(&self, slug: &str, mode: ContentMode) -> Result<Option<SeoPage>, CmsError> {
        let query = EntryQuery::new(SeoPage::CONTENT_TYPE);
        let mut tag_set = tags::owned(tags::SEO);
        tag_set.push(tags::seo_slug_tag(slug));
        self.cached(
            mode,
            CacheKey::new(["seo-page", slug]),
            tag_set,
            move || async move {
                let pages: Vec<SeoPage> = self.fetch(mode, query).await?;
                Ok(pages.into_iter().find(|p| p.slug == slug))
            },
        )
        .await
    }

    #[instrument(skip(self))]
    pub async fn seo_page(&self, slug: &str, mode: ContentMode) -> Option<SeoPage> {
        or_empty("seo_page", self.try_seo_page(slug, mode).await)
    }
}
