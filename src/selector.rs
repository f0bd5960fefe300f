use select::node::Node;
use select::predicate::Predicate;

/// Tags whose text content is never rendered.
const INVISIBLE_TAGS: &[&str] = &["script", "style", "noscript", "template"];

/// A structured node predicate for the `select` document model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CssSelector {
    /// Matches an HTML tag name (e.g., "title", "link")
    Tag(String),

    /// Matches an exact attribute value (ASCII case-insensitive)
    Attribute { key: String, value: String },

    /// Matches when the attribute value contains `needle`, ignoring case
    AttributeContains { key: String, needle: String },

    /// AND Logic: Matches if ALL sub-selectors match
    And(Vec<CssSelector>),

    /// OR Logic: Matches if ANY sub-selector matches
    Or(Vec<CssSelector>),
}

impl CssSelector {
    pub fn tag(name: &str) -> Self {
        CssSelector::Tag(name.to_string())
    }

    pub fn attr_eq(key: &str, value: &str) -> Self {
        CssSelector::Attribute {
            key: key.to_string(),
            value: value.to_string(),
        }
    }

    pub fn attr_contains(key: &str, needle: &str) -> Self {
        CssSelector::AttributeContains {
            key: key.to_string(),
            needle: needle.to_lowercase(),
        }
    }
}

impl Predicate for CssSelector {
    fn matches(&self, node: &Node) -> bool {
        match self {
            CssSelector::Tag(tag) => node
                .name()
                .map(|name| name.eq_ignore_ascii_case(tag))
                .unwrap_or(false),
            CssSelector::Attribute { key, value } => node
                .attr(key.as_str())
                .map(|actual| actual.trim().eq_ignore_ascii_case(value))
                .unwrap_or(false),
            CssSelector::AttributeContains { key, needle } => node
                .attr(key.as_str())
                .map(|actual| actual.to_lowercase().contains(needle.as_str()))
                .unwrap_or(false),
            CssSelector::And(selectors) => selectors.iter().all(|s| s.matches(node)),
            CssSelector::Or(selectors) => selectors.iter().any(|s| s.matches(node)),
        }
    }
}

impl<'a> Predicate for &'a CssSelector {
    fn matches(&self, node: &Node) -> bool {
        (*self).matches(node)
    }
}

/// Matches text nodes that would be rendered, i.e. not inside `<script>`,
/// `<style>` and friends.
#[derive(Debug, Clone, Copy)]
pub struct VisibleText;

impl Predicate for VisibleText {
    fn matches(&self, node: &Node) -> bool {
        node.as_text().is_some() && !inside_invisible(node)
    }
}

fn inside_invisible(node: &Node) -> bool {
    let mut current = node.parent();
    while let Some(parent) = current {
        if parent
            .name()
            .map(|name| INVISIBLE_TAGS.iter().any(|t| name.eq_ignore_ascii_case(t)))
            .unwrap_or(false)
        {
            return true;
        }
        current = parent.parent();
    }
    false
}

/// Visible text under `node`: every text piece trimmed, empties dropped,
/// joined with single spaces.
pub fn visible_text(node: &Node) -> String {
    if let Some(text) = node.as_text() {
        return text.trim().to_string();
    }
    node.descendants()
        .filter(|n| VisibleText.matches(n))
        .filter_map(|n| n.as_text())
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
