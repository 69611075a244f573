//! Menu tree navigator.
//!
//! Resolves a client-supplied path of option keys against the static catalog.
//! A key that does not exist at its level stops the walk early and the result
//! answers from the deepest node reached -- a stale or malformed path degrades
//! gracefully instead of failing the turn. `Resolved::depth` reports how many
//! steps actually resolved, so truncation is observable rather than silent.

use parley_types::menu::{MenuCatalog, MenuNode, NavigationPath};

/// Immutable menu tree rooted at the catalog's greeting node.
pub struct MenuTree {
    root: MenuNode,
}

/// Outcome of resolving a navigation path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    /// Child option keys of the resolved node, in document order.
    pub options: Vec<String>,
    /// The resolved node's message.
    pub message: String,
    /// Number of path keys that resolved. Equal to the path length when the
    /// whole path was valid; smaller when the walk truncated.
    pub depth: usize,
}

impl MenuTree {
    pub fn new(catalog: MenuCatalog) -> Self {
        Self {
            root: catalog.menu.greeting,
        }
    }

    /// The greeting message shown at bootstrap.
    pub fn greeting(&self) -> &str {
        &self.root.message
    }

    /// Walk `path` from the root, stopping early at the first missing key.
    pub fn resolve(&self, path: &NavigationPath) -> Resolved {
        let (node, depth) = self.node_at(path);
        Resolved {
            options: node.option_keys(),
            message: node.message.clone(),
            depth,
        }
    }

    /// The deepest node reachable along `path`, and how many keys resolved.
    pub fn node_at(&self, path: &NavigationPath) -> (&MenuNode, usize) {
        let mut node = &self.root;
        let mut depth = 0;
        for key in path.keys() {
            match node.options.get(key) {
                Some(child) => {
                    node = child;
                    depth += 1;
                }
                None => break,
            }
        }
        (node, depth)
    }
}
