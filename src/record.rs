use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

/// One site's metrics as scraped from its metrics page.
///
/// Only `url` and `name` are guaranteed; everything else serializes as `null`
/// when extraction missed it.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsRecord {
    pub url: String,
    pub name: String,
    pub title: Option<String>,
    pub description: Option<String>,
    /// Reserved.
    pub category: Option<String>,
    pub icon: Option<String>,
    /// Reserved.
    pub preview_desktop: Option<String>,
    /// Reserved.
    pub preview_mobile: Option<String>,
    pub global_rank: Option<i64>,
    pub country_rank: Option<i64>,
    pub category_rank: Option<i64>,
    pub pages_per_visit: Option<f64>,
    /// Percentage fields keyed by their output name; every configured key is
    /// present.
    #[serde(flatten)]
    pub percentages: BTreeMap<String, Option<f64>>,
    pub snapshot_date: Option<String>,
    pub scraped_at: Option<String>,
}

impl MetricsRecord {
    pub fn new(url: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    /// Fills `snapshotDate` and `scrapedAt` when extraction left them empty.
    /// `snapshot_date` falls back to the UTC date of `now`.
    pub fn stamp(&mut self, snapshot_date: Option<&str>, now: DateTime<Utc>) {
        if self.snapshot_date.is_none() {
            let date = snapshot_date
                .map(str::to_string)
                .unwrap_or_else(|| now.format("%Y-%m-%d").to_string());
            self.snapshot_date = Some(date);
        }
        if self.scraped_at.is_none() {
            self.scraped_at = Some(now.to_rfc3339());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn serializes_missing_fields_as_null() {
        let mut record = MetricsRecord::new("https://www.similarweb.com/website/a.com", "a.com");
        record.percentages.insert("bounceRate".to_string(), None);
        record.global_rank = Some(12);

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["url"], json!("https://www.similarweb.com/website/a.com"));
        assert_eq!(value["globalRank"], json!(12));
        assert_eq!(value["title"], json!(null));
        assert_eq!(value["previewDesktop"], json!(null));
        assert_eq!(value["bounceRate"], json!(null));
        assert!(value.as_object().unwrap().contains_key("snapshotDate"));
    }

    #[test]
    fn stamp_defaults_and_keeps_existing() {
        let now = Utc.with_ymd_and_hms(2024, 5, 17, 8, 30, 0).unwrap();

        let mut fresh = MetricsRecord::new("u", "n");
        fresh.stamp(None, now);
        assert_eq!(fresh.snapshot_date.as_deref(), Some("2024-05-17"));
        assert_eq!(fresh.scraped_at.as_deref(), Some("2024-05-17T08:30:00+00:00"));

        let mut pinned = MetricsRecord::new("u", "n");
        pinned.stamp(Some("2024-01-01"), now);
        assert_eq!(pinned.snapshot_date.as_deref(), Some("2024-01-01"));

        let mut kept = MetricsRecord::new("u", "n");
        kept.snapshot_date = Some("2023-12-31".to_string());
        kept.scraped_at = Some("earlier".to_string());
        kept.stamp(Some("2024-01-01"), now);
        assert_eq!(kept.snapshot_date.as_deref(), Some("2023-12-31"));
        assert_eq!(kept.scraped_at.as_deref(), Some("earlier"));
    }
}
