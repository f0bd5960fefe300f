//! The metric extractor.
//!
//! Metrics pages are not a stable API, so extraction is a chain of independent
//! strategies, each of which may miss. [`MetricExtractor::extract`] never
//! fails: a miss leaves the corresponding field `None`.
//!
//! Strategies:
//! - page metadata (title, meta description, icon, site name)
//! - label-anchored integers for the rank fields
//! - a label-anchored decimal for pages per visit
//! - label-anchored percentages for engagement and traffic-source shares
//! - embedded JSON payloads, consulted for rank and decimal fields the label
//!   search missed

pub mod embedded;
pub mod labels;
pub mod meta;

use crate::config::ScraperConfig;
use crate::domain::normalize_domain;
use crate::record::MetricsRecord;
use embedded::EmbeddedData;
use labels::LabelRule;
use select::document::Document;

pub const GLOBAL_RANK_LABEL: &str = "Global Rank";
pub const COUNTRY_RANK_LABEL: &str = "Country Rank";
pub const CATEGORY_RANK_LABEL: &str = "Category Rank";
pub const PAGES_PER_VISIT_LABEL: &str = "Pages per Visit";

/// Output key and anchor label for each percentage field.
pub const PERCENTAGE_LABELS: &[(&str, &str)] = &[
    ("bounceRate", "Bounce Rate"),
    ("directTraffic", "Direct"),
    ("referralTraffic", "Referrals"),
    ("searchTraffic", "Search"),
    ("socialTraffic", "Social"),
    ("mailTraffic", "Mail"),
    ("displayTraffic", "Display"),
];

/// Turns a target into the metrics page URL to fetch.
///
/// Targets that already point at the metrics platform are used as-is;
/// anything else is normalized to a bare domain and appended to the base URL.
pub fn resolve_page_url(target: &str, config: &ScraperConfig) -> String {
    let target = target.trim();
    let marker = config.platform_marker();
    if !marker.is_empty() && target.to_lowercase().contains(marker) {
        return target.to_string();
    }
    let url = format!("{}/{}", config.base_url, normalize_domain(target));
    log::debug!("Built page URL '{}' from target '{}'", url, target);
    url
}

#[derive(Debug, Clone)]
pub struct MetricExtractor {
    global_rank: LabelRule,
    country_rank: LabelRule,
    category_rank: LabelRule,
    pages_per_visit: LabelRule,
    percentages: Vec<LabelRule>,
}

impl Default for MetricExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricExtractor {
    pub fn new() -> Self {
        Self::with_percentage_labels(PERCENTAGE_LABELS)
    }

    /// Uses a custom set of `(key, label)` pairs for the percentage fields.
    pub fn with_percentage_labels(labels: &[(&str, &str)]) -> Self {
        Self {
            global_rank: LabelRule::new("globalRank", GLOBAL_RANK_LABEL),
            country_rank: LabelRule::new("countryRank", COUNTRY_RANK_LABEL),
            category_rank: LabelRule::new("categoryRank", CATEGORY_RANK_LABEL),
            pages_per_visit: LabelRule::new("pagesPerVisit", PAGES_PER_VISIT_LABEL),
            percentages: labels
                .iter()
                .map(|(key, label)| LabelRule::new(key, label))
                .collect(),
        }
    }

    pub fn extract(&self, html: &str, page_url: &str) -> MetricsRecord {
        let doc = Document::from(html);
        let site = meta::site_meta(&doc, page_url);

        let mut record = MetricsRecord::new(page_url, site.name);
        record.title = site.title;
        record.description = site.description;
        record.icon = site.icon;

        record.global_rank = self.global_rank.integer(&doc);
        record.country_rank = self.country_rank.integer(&doc);
        record.category_rank = self.category_rank.integer(&doc);
        record.pages_per_visit = self.pages_per_visit.decimal(&doc);
        record.percentages = labels::percentages(&doc, &self.percentages);

        let misses = [
            record.global_rank,
            record.country_rank,
            record.category_rank,
        ]
        .iter()
        .any(Option::is_none)
            || record.pages_per_visit.is_none();
        if misses {
            let embedded = EmbeddedData::from_document(&doc);
            if !embedded.is_empty() {
                fill_from_embedded(&mut record, &embedded, self);
            }
        }

        record
    }
}

fn fill_from_embedded(record: &mut MetricsRecord, data: &EmbeddedData, rules: &MetricExtractor) {
    if record.global_rank.is_none() {
        record.global_rank = data.integer(&rules.global_rank.key);
    }
    if record.country_rank.is_none() {
        record.country_rank = data.integer(&rules.country_rank.key);
    }
    if record.category_rank.is_none() {
        record.category_rank = data.integer(&rules.category_rank.key);
    }
    if record.pages_per_visit.is_none() {
        record.pages_per_visit = data.decimal(&rules.pages_per_visit.key);
    }
}
