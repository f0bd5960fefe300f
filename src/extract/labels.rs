//! Label-anchored extraction: find a text node matching a label, then read a
//! number out of its parent's visible text.

use crate::coerce::{safe_float, safe_int};
use crate::selector::{visible_text, VisibleText};
use regex::{Regex, RegexBuilder};
use select::document::Document;
use std::collections::BTreeMap;
use std::sync::LazyLock;

static DIGIT_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9][0-9,]*").expect("hardcoded regex pattern is valid"));

static DECIMAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[0-9]+(?:\.[0-9]+)?").expect("hardcoded regex pattern is valid")
});

static PERCENTAGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([0-9]+(?:\.[0-9]+)?)\s*%").expect("hardcoded regex pattern is valid")
});

/// An output key paired with the case-insensitive pattern that anchors it.
#[derive(Debug, Clone)]
pub struct LabelRule {
    pub key: String,
    pattern: Option<Regex>,
}

impl LabelRule {
    /// `label` is treated as a regex; if it does not compile it is matched
    /// literally instead.
    pub fn new(key: &str, label: &str) -> Self {
        let pattern = RegexBuilder::new(label)
            .case_insensitive(true)
            .build()
            .or_else(|_| {
                RegexBuilder::new(&regex::escape(label))
                    .case_insensitive(true)
                    .build()
            })
            .ok();
        Self {
            key: key.to_string(),
            pattern,
        }
    }

    /// Visible text of the parent of the first text node matching the label.
    pub fn anchor_text(&self, doc: &Document) -> Option<String> {
        let pattern = self.pattern.as_ref()?;
        let node = doc
            .find(VisibleText)
            .find(|n| n.as_text().map(|t| pattern.is_match(t)).unwrap_or(false))?;
        let text = match node.parent() {
            Some(parent) => visible_text(&parent),
            None => visible_text(&node),
        };
        Some(text)
    }

    /// First digits-and-commas run near the label, commas stripped.
    pub fn integer(&self, doc: &Document) -> Option<i64> {
        let text = self.anchor_text(doc)?;
        let run = DIGIT_RUN.find(&text)?;
        safe_int(Some(run.as_str().replace(',', "").as_str()))
    }

    /// First plain decimal near the label, e.g. `3.41` in "Pages per Visit 3.41".
    pub fn decimal(&self, doc: &Document) -> Option<f64> {
        let text = self.anchor_text(doc)?;
        let m = DECIMAL.find(&text)?;
        safe_float(Some(m.as_str()))
    }

    /// First number directly followed by `%` near the label.
    pub fn percentage(&self, doc: &Document) -> Option<f64> {
        let text = self.anchor_text(doc)?;
        let caps = PERCENTAGE.captures(&text)?;
        safe_float(caps.get(1).map(|m| m.as_str()))
    }
}

/// Resolves each rule independently. Every rule's key is present in the
/// result, with `None` for misses.
pub fn percentages(doc: &Document, rules: &[LabelRule]) -> BTreeMap<String, Option<f64>> {
    rules
        .iter()
        .map(|rule| (rule.key.clone(), rule.percentage(doc)))
        .collect()
}
