//! Menu catalog types.
//!
//! The scripted side of the assistant is a static, acyclic tree of menu
//! nodes loaded once at startup. Options use an `IndexMap` so the rendered
//! order always equals document order.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One node of the menu tree: a message to show and the child options.
///
/// A node with empty `options` is terminal.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MenuNode {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub options: IndexMap<String, MenuNode>,
}

impl MenuNode {
    /// Whether this node has no further options.
    pub fn is_terminal(&self) -> bool {
        self.options.is_empty()
    }

    /// Child option keys in document order.
    pub fn option_keys(&self) -> Vec<String> {
        self.options.keys().cloned().collect()
    }
}

/// Wire shape of the menu document: `{ "menu": { "greeting": <node> } }`.
#[derive(Debug, Clone, Deserialize)]
pub struct MenuCatalog {
    pub menu: MenuRoot,
}

/// The catalog is rooted at a single `greeting` node.
#[derive(Debug, Clone, Deserialize)]
pub struct MenuRoot {
    pub greeting: MenuNode,
}

/// An ordered sequence of option keys from the root.
///
/// Re-derivable by replaying selections; used to render breadcrumbs and to
/// support `back` by popping the most recent key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NavigationPath(Vec<String>);

impl NavigationPath {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn push(&mut self, key: impl Into<String>) {
        self.0.push(key.into());
    }

    pub fn pop(&mut self) -> Option<String> {
        self.0.pop()
    }

    pub fn last(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> &[String] {
        &self.0
    }

    /// A copy of this path extended by one key.
    pub fn child(&self, key: impl Into<String>) -> Self {
        let mut next = self.clone();
        next.push(key);
        next
    }

    /// Keep only the first `depth` keys (used after a truncated resolve).
    pub fn truncate(&mut self, depth: usize) {
        self.0.truncate(depth);
    }
}

impl From<Vec<String>> for NavigationPath {
    fn from(keys: Vec<String>) -> Self {
        Self(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn menu_catalog_deserializes_nested_options_in_order() {
        let raw = r#"{
            "menu": {
                "greeting": {
                    "message": "Hi! How can we help?",
                    "options": {
                        "general_faqs": { "message": "Pick a topic." },
                        "services": {
                            "message": "Our services.",
                            "options": {
                                "web": { "message": "Web work." }
                            }
                        }
                    }
                }
            }
        }"#;
        let catalog: MenuCatalog = serde_json::from_str(raw).unwrap();
        let root = &catalog.menu.greeting;
        assert_eq!(root.option_keys(), vec!["general_faqs", "services"]);
        assert!(root.options["general_faqs"].is_terminal());
        assert!(!root.options["services"].is_terminal());
    }

    #[test]
    fn navigation_path_push_pop() {
        let mut path = NavigationPath::new();
        path.push("services");
        path.push("web");
        assert_eq!(path.len(), 2);
        assert_eq!(path.pop().as_deref(), Some("web"));
        assert_eq!(path.last(), Some("services"));
    }

    #[test]
    fn navigation_path_serde_transparent() {
        let path: NavigationPath = serde_json::from_str(r#"["a","b"]"#).unwrap();
        assert_eq!(path.keys(), ["a".to_string(), "b".to_string()]);
        assert_eq!(serde_json::to_string(&path).unwrap(), r#"["a","b"]"#);
    }
}
