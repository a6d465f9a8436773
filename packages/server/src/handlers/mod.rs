pub mod forms;
pub mod pages;
pub mod preview;
pub mod revalidate;
pub mod sitemap;
