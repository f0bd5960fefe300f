//! Page-level metadata: title, description, icon and the site name.

use crate::domain::normalize_domain;
use crate::selector::{visible_text, CssSelector};
use select::document::Document;
use url::Url;

#[derive(Debug, Default, Clone, PartialEq)]
pub struct SiteMeta {
    pub name: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub icon: Option<String>,
}

pub fn site_meta(doc: &Document, page_url: &str) -> SiteMeta {
    let parsed = Url::parse(page_url).ok();

    let title = doc
        .find(&CssSelector::tag("title"))
        .next()
        .map(|node| visible_text(&node))
        .filter(|t| !t.is_empty());

    let description = doc
        .find(&CssSelector::And(vec![
            CssSelector::tag("meta"),
            CssSelector::attr_eq("name", "description"),
        ]))
        .next()
        .and_then(|node| node.attr("content"))
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty());

    let icon = doc
        .find(&CssSelector::And(vec![
            CssSelector::tag("link"),
            CssSelector::attr_contains("rel", "icon"),
        ]))
        .next()
        .and_then(|node| node.attr("href"))
        .map(str::trim)
        .filter(|href| !href.is_empty())
        .map(|href| absolutize_icon(href, parsed.as_ref()));

    let name = site_name(page_url, parsed.as_ref());

    SiteMeta {
        name,
        title,
        description,
        icon,
    }
}

/// Protocol-relative and root-relative hrefs are resolved against the page;
/// anything else is returned unchanged.
pub fn absolutize_icon(href: &str, page: Option<&Url>) -> String {
    let Some(page) = page else {
        return href.to_string();
    };
    if href.starts_with("//") {
        format!("{}:{}", page.scheme(), href)
    } else if href.starts_with('/') {
        format!("{}://{}{}", page.scheme(), netloc(page), href)
    } else {
        href.to_string()
    }
}

/// Last non-empty path segment, else the host. Segments are read from the
/// raw URL so non-ASCII names are not percent-encoded.
fn site_name(page_url: &str, parsed: Option<&Url>) -> String {
    let Some(url) = parsed else {
        return normalize_domain(page_url);
    };
    let rest = page_url
        .split_once("://")
        .map(|(_, r)| r)
        .unwrap_or(page_url);
    let path = rest
        .split(|c| matches!(c, '?' | '#'))
        .next()
        .and_then(|p| p.split_once('/'))
        .map(|(_, path)| path)
        .unwrap_or_default();
    path.split('/')
        .filter(|s| !s.trim().is_empty())
        .last()
        .map(|s| s.trim().to_string())
        .unwrap_or_else(|| netloc(url))
}

fn netloc(url: &Url) -> String {
    let host = url.host_str().unwrap_or_default();
    match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    }
}
