//! schema.org JSON-LD blocks for search engines.

use common::content::{CompanyProfile, Faq, GeoPoint, ReviewStats, Service};
use serde_json::{Value, json};

/// Used when the CMS profile carries no coordinates.
pub const BREST: GeoPoint = GeoPoint {
    latitude: 52.0975,
    longitude: 23.734,
};

const LOCALITY: &str = "Брест";
const REGION: &str = "Брестская область";
const COUNTRY: &str = "BY";
const SERVICE_TYPE: &str = "Геодезические работы";

fn postal_address(company: &CompanyProfile) -> Value {
    json!({
        "@type": "PostalAddress",
        "streetAddress": company.address,
        "addressLocality": LOCALITY,
        "addressRegion": REGION,
        "addressCountry": COUNTRY,
    })
}

fn area_served() -> Value {
    json!([
        { "@type": "City", "name": LOCALITY, "@id": "https://www.wikidata.org/wiki/Q2074" },
        { "@type": "AdministrativeArea", "name": REGION },
    ])
}

/// Public profile links derived from messenger handles.
fn same_as(company: &CompanyProfile) -> Vec<String> {
    let m = &company.messengers;
    let handle = |h: &str| h.trim_start_matches('@').to_string();
    let mut links = Vec::new();
    if let Some(telegram) = &m.telegram {
        links.push(format!("https://t.me/{}", handle(telegram)));
    }
    if let Some(whatsapp) = &m.whatsapp {
        let digits: String = whatsapp.chars().filter(char::is_ascii_digit).collect();
        links.push(format!("https://wa.me/{digits}"));
    }
    if let Some(instagram) = &m.instagram {
        links.push(format!("https://instagram.com/{}", handle(instagram)));
    }
    links
}

pub fn local_business(
    company: &CompanyProfile,
    services: &[Service],
    stats: Option<&ReviewStats>,
    site_url: &str,
) -> Value {
    let geo = company.coordinates.unwrap_or(BREST);
    let offers: Vec<Value> = services
        .iter()
        .map(|s| {
            json!({
                "@type": "Offer",
                "itemOffered": { "@type": "Service", "name": s.title, "serviceType": SERVICE_TYPE },
            })
        })
        .collect();

    let mut schema = json!({
        "@context": "https://schema.org",
        "@type": "LocalBusiness",
        "@id": format!("{site_url}/#organization"),
        "name": company.name,
        "description": company.description,
        "url": site_url,
        "telephone": company.phone,
        "email": company.email,
        "address": postal_address(company),
        "openingHours": company.work_hours,
        "priceRange": "$$",
        "geo": { "@type": "GeoCoordinates", "latitude": geo.latitude, "longitude": geo.longitude },
        "areaServed": area_served(),
        "hasOfferCatalog": {
            "@type": "OfferCatalog",
            "name": "Геодезические услуги",
            "itemListElement": offers,
        },
    });

    let links = same_as(company);
    if !links.is_empty() {
        schema["sameAs"] = json!(links);
    }
    if let Some(stats) = stats {
        schema["aggregateRating"] = json!({
            "@type": "AggregateRating",
            "ratingValue": stats.rating_value,
            "reviewCount": stats.review_count,
            "bestRating": 5,
            "worstRating": 1,
        });
    }
    schema
}

pub fn organization(company: &CompanyProfile, site_url: &str) -> Value {
    json!({
        "@context": "https://schema.org",
        "@type": "Organization",
        "@id": format!("{site_url}/#organization"),
        "name": company.name,
        "url": site_url,
        "logo": format!("{site_url}/logo.png"),
        "contactPoint": {
            "@type": "ContactPoint",
            "telephone": company.phone,
            "contactType": "customer service",
            "email": company.email,
            "availableLanguage": ["Russian", "Belarusian"],
            "areaServed": COUNTRY,
        },
    })
}

pub fn website(site_url: &str, site_name: &str) -> Value {
    json!({
        "@context": "https://schema.org",
        "@type": "WebSite",
        "@id": format!("{site_url}/#website"),
        "url": site_url,
        "name": site_name,
        "description": "Профессиональные геодезические услуги в Бресте и Брестской области",
        "inLanguage": "ru",
        "potentialAction": {
            "@type": "SearchAction",
            "target": {
                "@type": "EntryPoint",
                "urlTemplate": format!("{site_url}/services?q={{search_term_string}}"),
            },
            "query-input": "required name=search_term_string",
        },
    })
}

/// `items` are `(name, site-relative path)` pairs, outermost first.
pub fn breadcrumbs(items: &[(&str, &str)], site_url: &str) -> Value {
    let elements: Vec<Value> = items
        .iter()
        .enumerate()
        .map(|(i, (name, path))| {
            json!({
                "@type": "ListItem",
                "position": i + 1,
                "name": name,
                "item": format!("{site_url}{path}"),
            })
        })
        .collect();
    json!({
        "@context": "https://schema.org",
        "@type": "BreadcrumbList",
        "itemListElement": elements,
    })
}

pub fn service(service: &Service, company: &CompanyProfile, site_url: &str) -> Value {
    json!({
        "@context": "https://schema.org",
        "@type": "Service",
        "serviceType": service.title,
        "description": service.meta_description.as_deref().unwrap_or(&service.description),
        "url": format!("{site_url}/services/{}", service.slug),
        "provider": {
            "@type": "LocalBusiness",
            "name": company.name,
            "telephone": company.phone,
            "address": postal_address(company),
        },
        "areaServed": area_served(),
        "availableChannel": {
            "@type": "ServiceChannel",
            "serviceUrl": site_url,
            "servicePhone": {
                "@type": "ContactPoint",
                "telephone": company.phone,
                "contactType": "customer service",
            },
        },
    })
}

/// `None` when there are no questions to mark up.
pub fn faq_page(faqs: &[Faq]) -> Option<Value> {
    if faqs.is_empty() {
        return None;
    }
    let entities: Vec<Value> = faqs
        .iter()
        .map(|f| {
            json!({
                "@type": "Question",
                "name": f.question,
                "acceptedAnswer": { "@type": "Answer", "text": f.answer },
            })
        })
        .collect();
    Some(json!({
        "@context": "https://schema.org",
        "@type": "FAQPage",
        "mainEntity": entities,
    }))
}
