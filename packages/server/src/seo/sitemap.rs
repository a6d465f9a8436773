//! `sitemap.xml` and `robots.txt`.

use chrono::{DateTime, FixedOffset};
use ::sitemap::structs::{ChangeFreq, UrlEntry};
use ::sitemap::writer::SiteMapWriter;

/// Static pages and their priorities.
const STATIC_PAGES: &[(&str, f32)] = &[
    ("/", 1.0),
    ("/services", 0.9),
    ("/contacts", 0.9),
    ("/about", 0.8),
    ("/blog", DEFAULT_PRIORITY),
    ("/privacy", DEFAULT_PRIORITY),
];

const DEFAULT_PRIORITY: f32 = 0.7;

/// Render the sitemap for the static pages plus every service and blog post.
pub fn render_sitemap(
    base_url: &str,
    service_slugs: &[String],
    blog_slugs: &[String],
    lastmod: DateTime<FixedOffset>,
) -> Result<String, String> {
    let dynamic = service_slugs
        .iter()
        .map(|slug| format!("/services/{slug}"))
        .chain(blog_slugs.iter().map(|slug| format!("/blog/{slug}")));

    let pages = STATIC_PAGES
        .iter()
        .map(|(path, priority)| (path.to_string(), *priority))
        .chain(dynamic.map(|path| (path, DEFAULT_PRIORITY)));

    let mut output = Vec::new();
    let writer = SiteMapWriter::new(&mut output);
    let mut urls = writer
        .start_urlset()
        .map_err(|e| format!("failed to start urlset: {e:?}"))?;
    for (path, priority) in pages {
        let loc = if path == "/" {
            format!("{base_url}/")
        } else {
            format!("{base_url}{path}")
        };
        urls.url(
            UrlEntry::builder()
                .loc(loc)
                .lastmod(lastmod)
                .changefreq(ChangeFreq::Weekly)
                .priority(priority),
        )
        .map_err(|e| format!("failed to write url {path}: {e:?}"))?;
    }
    urls.end().map_err(|e| format!("failed to close urlset: {e:?}"))?;

    String::from_utf8(output).map_err(|e| format!("sitemap is not UTF-8: {e}"))
}

pub fn render_robots(base_url: &str) -> String {
    format!(
        "User-agent: *\nAllow: /\nDisallow: /api\nDisallow: /admin\n\n\
         User-agent: Googlebot\nAllow: /\n\n\
         User-agent: Yandexbot\nAllow: /\n\n\
         Host: {base_url}\nSitemap: {base_url}/sitemap.xml\n"
    )
}
