//! Structured data embedded in `<script>` payloads (JSON-LD, framework state).

use crate::coerce::{safe_float, safe_int};
use crate::selector::CssSelector;
use select::document::Document;
use serde_json::Value;

/// Keys checked inside an object that matched a metric key,
/// e.g. `"globalRank": {"rank": 12}`.
const NESTED_VALUE_KEYS: &[&str] = &["rank", "value"];

#[derive(Debug, Default)]
pub struct EmbeddedData {
    payloads: Vec<Value>,
}

impl EmbeddedData {
    /// Parses every JSON script payload in the document; payloads that do not
    /// parse are skipped.
    pub fn from_document(doc: &Document) -> Self {
        let selector = CssSelector::And(vec![
            CssSelector::tag("script"),
            CssSelector::Or(vec![
                CssSelector::attr_eq("type", "application/ld+json"),
                CssSelector::attr_eq("type", "application/json"),
                CssSelector::attr_eq("id", "__NEXT_DATA__"),
            ]),
        ]);

        let payloads = doc
            .find(&selector)
            .filter_map(|node| serde_json::from_str::<Value>(node.text().trim()).ok())
            .collect();

        Self { payloads }
    }

    pub fn is_empty(&self) -> bool {
        self.payloads.is_empty()
    }

    pub fn integer(&self, key: &str) -> Option<i64> {
        let wanted = fold_key(key);
        self.payloads
            .iter()
            .find_map(|payload| find_scalar(payload, &wanted))
            .and_then(|value| match value {
                Value::Number(n) => n.as_i64().or_else(|| {
                    n.as_f64()
                        .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                        .map(|f| f as i64)
                }),
                Value::String(s) => safe_int(Some(s.replace(',', "").as_str())),
                _ => None,
            })
    }

    pub fn decimal(&self, key: &str) -> Option<f64> {
        let wanted = fold_key(key);
        self.payloads
            .iter()
            .find_map(|payload| find_scalar(payload, &wanted))
            .and_then(|value| match value {
                Value::Number(n) => n.as_f64(),
                Value::String(s) => safe_float(Some(s.as_str())),
                _ => None,
            })
    }
}

/// `globalRank`, `global_rank` and `Global-Rank` all fold to `globalrank`.
fn fold_key(key: &str) -> String {
    key.chars()
        .filter(|c| !matches!(c, '_' | '-' | ' '))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Depth-first search for the first key folding to `wanted` that holds a
/// number or string, directly or under one of [`NESTED_VALUE_KEYS`].
fn find_scalar<'a>(value: &'a Value, wanted: &str) -> Option<&'a Value> {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                if fold_key(key) == wanted {
                    if let Some(scalar) = scalar_of(child) {
                        return Some(scalar);
                    }
                }
            }
            map.values().find_map(|child| find_scalar(child, wanted))
        }
        Value::Array(items) => items.iter().find_map(|item| find_scalar(item, wanted)),
        _ => None,
    }
}

fn scalar_of(value: &Value) -> Option<&Value> {
    match value {
        Value::Number(_) | Value::String(_) => Some(value),
        Value::Object(map) => NESTED_VALUE_KEYS
            .iter()
            .filter_map(|k| map.get(*k))
            .find(|v| matches!(v, Value::Number(_) | Value::String(_))),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_ranks_from_ld_json_and_next_data() {
        let doc = Document::from(
            r#"<html><head>
            <script type="application/ld+json">{"@type": "WebSite", "name": "x"}</script>
            <script id="__NEXT_DATA__" type="application/json">
              {"props": {"pageProps": {"overview": {"global_rank": "1,234", "countryRank": {"rank": 56}, "pagesPerVisit": 2.5}}}}
            </script>
            </head></html>"#,
        );
        let data = EmbeddedData::from_document(&doc);
        assert!(!data.is_empty());
        assert_eq!(data.integer("globalRank"), Some(1234));
        assert_eq!(data.integer("countryRank"), Some(56));
        assert_eq!(data.decimal("pagesPerVisit"), Some(2.5));
        assert_eq!(data.integer("categoryRank"), None);
    }

    #[test]
    fn broken_payloads_are_skipped() {
        let doc = Document::from(
            r#"<script type="application/ld+json">{not json</script><script>{"globalRank": 1}</script>"#,
        );
        let data = EmbeddedData::from_document(&doc);
        assert!(data.is_empty());
        assert_eq!(data.integer("globalRank"), None);
    }
}
