//! The taxonomy node model.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::error::{TaxonomyError, TaxonomyResult};
use crate::walk::{join_path, Walk};

/// Label used wherever a node has no English name.
pub const UNKNOWN_NAME: &str = "Unknown";

/// A label keyed by language code. `en` is the display key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct LocalizedName(IndexMap<String, String>);

impl LocalizedName {
    /// A name with only an English label.
    pub fn en(text: impl Into<String>) -> Self {
        let mut labels = IndexMap::new();
        labels.insert("en".to_string(), text.into());
        Self(labels)
    }

    pub fn get(&self, lang: &str) -> Option<&str> {
        self.0.get(lang).map(String::as_str)
    }

    pub fn insert(&mut self, lang: impl Into<String>, text: impl Into<String>) {
        self.0.insert(lang.into(), text.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The English label when present and non-blank.
    pub fn english(&self) -> Option<&str> {
        self.get("en").filter(|s| !s.trim().is_empty())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawName {
    Plain(String),
    Localized(IndexMap<String, String>),
}

impl<'de> Deserialize<'de> for LocalizedName {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match RawName::deserialize(deserializer)? {
            RawName::Plain(text) => LocalizedName::en(text),
            RawName::Localized(labels) => LocalizedName(labels),
        })
    }
}

/// One node of the taxonomy: a category when it has children, a tool otherwise.
///
/// Fields this model does not know about are kept in `extra` and written
/// back unchanged, so rewriting a fragment never drops data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaxonomyNode {
    #[serde(default, skip_serializing_if = "LocalizedName::is_empty")]
    pub name: LocalizedName,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub tags: Vec<String>,

    /// Label to URL. `null` values are kept and count as blank.
    #[serde(default)]
    pub links: IndexMap<String, Option<String>>,

    /// `None` when the field is absent, which is kept distinct from `[]`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<TaxonomyNode>>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TaxonomyNode {
    /// A node with an English name and nothing else.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: LocalizedName::en(name),
            ..Self::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_link(mut self, label: impl Into<String>, url: impl Into<String>) -> Self {
        self.links.insert(label.into(), Some(url.into()));
        self
    }

    pub fn with_child(mut self, child: TaxonomyNode) -> Self {
        self.children.get_or_insert_with(Vec::new).push(child);
        self
    }

    /// The English name, or [`UNKNOWN_NAME`] when it is missing.
    pub fn display_name(&self) -> &str {
        self.name.english().unwrap_or(UNKNOWN_NAME)
    }

    pub fn children(&self) -> &[TaxonomyNode] {
        self.children.as_deref().unwrap_or(&[])
    }

    /// Length of the trimmed description in characters.
    pub fn description_len(&self) -> usize {
        self.description.trim().chars().count()
    }

    /// True when at least one link has a non-blank URL.
    pub fn has_links(&self) -> bool {
        self.links
            .values()
            .any(|url| url.as_deref().is_some_and(|u| !u.trim().is_empty()))
    }

    /// Replace every link with `links`.
    pub fn set_links(&mut self, links: IndexMap<String, String>) {
        self.links = links.into_iter().map(|(k, v)| (k, Some(v))).collect();
    }

    /// Pre-order walk rooted at this node.
    pub fn walk(&self) -> Walk<'_> {
        Walk::new(self, "")
    }

    /// Pre-order walk whose paths start below `prefix`.
    pub fn walk_from(&self, prefix: &str) -> Walk<'_> {
        Walk::new(self, prefix)
    }

    pub fn node_count(&self) -> usize {
        self.walk().count()
    }

    /// Visit nodes in pre-order and hand every node whose path satisfies
    /// `matches` to `apply`, stopping as soon as `apply` returns true.
    ///
    /// Returns whether `apply` changed any node.
    pub fn update_first<M, A>(&mut self, prefix: &str, matches: M, mut apply: A) -> bool
    where
        M: Fn(&str) -> bool,
        A: FnMut(&mut TaxonomyNode) -> bool,
    {
        fn visit<M, A>(node: &mut TaxonomyNode, parent: &str, matches: &M, apply: &mut A) -> bool
        where
            M: Fn(&str) -> bool,
            A: FnMut(&mut TaxonomyNode) -> bool,
        {
            let path = join_path(parent, node.display_name());
            if matches(&path) && apply(node) {
                return true;
            }
            if let Some(children) = node.children.as_mut() {
                for child in children {
                    if visit(child, &path, matches, apply) {
                        return true;
                    }
                }
            }
            false
        }

        visit(self, prefix, &matches, &mut apply)
    }

    /// Check that every node carries a non-blank English name.
    pub fn validate(&self) -> TaxonomyResult<()> {
        let paths: Vec<String> = self
            .walk()
            .filter(|entry| entry.node.name.english().is_none())
            .map(|entry| entry.path)
            .collect();

        if paths.is_empty() {
            Ok(())
        } else {
            Err(TaxonomyError::UnnamedNodes { paths })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_plain_string_name_reads_as_english() {
        let node: TaxonomyNode = serde_json::from_value(json!({"name": "Processing"})).unwrap();
        assert_eq!(node.display_name(), "Processing");
        assert_eq!(node.name.get("en"), Some("Processing"));
    }

    #[test]
    fn test_missing_fields_default() {
        let node: TaxonomyNode = serde_json::from_value(json!({"name": {"en": "x"}})).unwrap();
        assert_eq!(node.description, "");
        assert!(node.tags.is_empty());
        assert!(node.links.is_empty());
        assert!(node.children.is_none());
        assert!(node.children().is_empty());
    }

    #[test]
    fn test_missing_name_displays_unknown() {
        let node: TaxonomyNode = serde_json::from_value(json!({"description": "d"})).unwrap();
        assert_eq!(node.display_name(), UNKNOWN_NAME);
        let blank = TaxonomyNode::named("  ");
        assert_eq!(blank.display_name(), UNKNOWN_NAME);
    }

    #[test]
    fn test_children_absent_and_empty_are_preserved() {
        let absent: TaxonomyNode = serde_json::from_value(json!({"name": {"en": "a"}})).unwrap();
        let empty: TaxonomyNode =
            serde_json::from_value(json!({"name": {"en": "a"}, "children": []})).unwrap();

        let absent_out = serde_json::to_value(&absent).unwrap();
        let empty_out = serde_json::to_value(&empty).unwrap();
        assert!(absent_out.get("children").is_none());
        assert_eq!(empty_out["children"], json!([]));
    }

    #[test]
    fn test_unknown_fields_round_trip() {
        let input = json!({
            "name": {"en": "Tool", "de": "Werkzeug"},
            "description": "",
            "tags": [],
            "links": {"Site": null},
            "color": "#ff0000",
            "meta": {"added": 2021}
        });
        let node: TaxonomyNode = serde_json::from_value(input).unwrap();
        assert_eq!(node.extra["color"], "#ff0000");

        let output = serde_json::to_value(&node).unwrap();
        assert_eq!(output["meta"]["added"], 2021);
        assert_eq!(output["name"]["de"], "Werkzeug");
        assert_eq!(output["links"]["Site"], Value::Null);
    }

    #[test]
    fn test_has_links_ignores_blank_and_null() {
        let mut node = TaxonomyNode::named("t");
        assert!(!node.has_links());
        node.links.insert("A".into(), None);
        node.links.insert("B".into(), Some("   ".into()));
        assert!(!node.has_links());
        node.links.insert("C".into(), Some("https://x".into()));
        assert!(node.has_links());
    }

    #[test]
    fn test_description_len_counts_trimmed_chars() {
        let node = TaxonomyNode::named("t").with_description("  héllo  ");
        assert_eq!(node.description_len(), 5);
    }

    #[test]
    fn test_update_first_stops_at_first_change() {
        let mut root = TaxonomyNode::named("Root")
            .with_child(TaxonomyNode::named("A").with_child(TaxonomyNode::named("Leaf")))
            .with_child(TaxonomyNode::named("B").with_child(TaxonomyNode::named("Leaf")));

        let mut calls = 0;
        let changed = root.update_first("", |p| p.ends_with("/Leaf"), |node| {
            calls += 1;
            node.description = "set".into();
            true
        });

        assert!(changed);
        assert_eq!(calls, 1);
        assert_eq!(root.children()[0].children()[0].description, "set");
        assert_eq!(root.children()[1].children()[0].description, "");
    }

    #[test]
    fn test_update_first_continues_past_refused_matches() {
        let mut root = TaxonomyNode::named("Root")
            .with_child(TaxonomyNode::named("Leaf").with_description("full"))
            .with_child(TaxonomyNode::named("Leaf"));

        let changed = root.update_first("", |p| p == "Root/Leaf", |node| {
            if node.description.is_empty() {
                node.description = "filled".into();
                true
            } else {
                false
            }
        });

        assert!(changed);
        assert_eq!(root.children()[0].description, "full");
        assert_eq!(root.children()[1].description, "filled");
    }

    #[test]
    fn test_validate_reports_unnamed_paths() {
        let mut unnamed = TaxonomyNode::named("x");
        unnamed.name = LocalizedName::default();
        let root = TaxonomyNode::named("Root")
            .with_child(TaxonomyNode::named("Fine"))
            .with_child(unnamed);

        match root.validate() {
            Err(TaxonomyError::UnnamedNodes { paths }) => {
                assert_eq!(paths, vec![format!("Root/{UNKNOWN_NAME}")]);
            }
            other => panic!("unexpected: {other:?}"),
        }
        assert!(TaxonomyNode::named("ok").validate().is_ok());
    }
}
