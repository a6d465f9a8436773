//! Content accessors over the CMS, with tag-based caching.

mod service;
pub mod tags;

pub use service::ContentService;
