pub mod cache;
pub mod content;
pub mod rate_limit;

pub use cache::{CacheKey, MemoryCache, TagCache, TagCacheExt};
pub use rate_limit::{RateDecision, RateLimiter};
