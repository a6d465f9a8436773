//! Search-engine facing output.

pub mod sitemap;
pub mod structured_data;
