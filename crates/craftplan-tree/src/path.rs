//! User-selected production paths.
//!
//! A [`ProductionPath`] records which branch the user picked for each item
//! they have visited so far. It is rebuilt from its string form on every
//! request (see [`crate::codec`]), changed by one selection at a time and
//! encoded again.

use crate::codec::MAX_DEPTH;
use crate::tree::ProductionTree;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A node of the user's selection: the item, the chosen source key (if
/// any) and the sub-requirements the user has started resolving.
///
/// An item appears at most once along any root-to-leaf lineage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductionPath {
    item: String,
    source: Option<String>,
    #[serde(default)]
    requirements: Vec<ProductionPath>,
}

impl ProductionPath {
    /// An unselected node.
    pub fn new(item: impl Into<String>) -> Self {
        Self {
            item: item.into(),
            source: None,
            requirements: Vec::new(),
        }
    }

    /// A node with a chosen source.
    pub fn selected(item: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            item: item.into(),
            source: Some(source.into()),
            requirements: Vec::new(),
        }
    }

    /// Assemble a node without lineage checks. The decoder validates lineage
    /// itself.
    pub(crate) fn from_parts(
        item: String,
        source: Option<String>,
        requirements: Vec<ProductionPath>,
    ) -> Self {
        Self {
            item,
            source,
            requirements,
        }
    }

    /// Append a sub-requirement. A child whose subtree mentions this node's
    /// item is dropped, as is one that would nest the path deeper than
    /// [`MAX_DEPTH`].
    pub fn with_requirement(mut self, child: ProductionPath) -> Self {
        if child.all_item_ids().contains(self.item.as_str()) {
            tracing::warn!(item = %child.item, "requirement repeats an ancestor, dropped");
            return self;
        }
        if child.depth() >= MAX_DEPTH {
            tracing::warn!(item = %child.item, max = MAX_DEPTH, "requirement nests too deep, dropped");
            return self;
        }
        self.requirements.push(child);
        self
    }

    pub fn item(&self) -> &str {
        &self.item
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn requirements(&self) -> &[ProductionPath] {
        &self.requirements
    }

    pub fn is_selected(&self) -> bool {
        self.source.is_some()
    }

    // -----------------------------------------------------------------------
    // Lookup
    // -----------------------------------------------------------------------

    /// First node for `item` in depth-first order.
    pub fn find(&self, item: &str) -> Option<&ProductionPath> {
        if self.item == item {
            return Some(self);
        }
        self.requirements.iter().find_map(|child| child.find(item))
    }

    pub fn find_mut(&mut self, item: &str) -> Option<&mut ProductionPath> {
        if self.item == item {
            return Some(self);
        }
        self.requirements
            .iter_mut()
            .find_map(|child| child.find_mut(item))
    }

    pub fn contains(&self, item: &str) -> bool {
        self.find(item).is_some()
    }

    // -----------------------------------------------------------------------
    // Selection
    // -----------------------------------------------------------------------

    /// Record `source` as the choice for `item`.
    ///
    /// The first matching node is updated in place; its children are kept
    /// even when the new source no longer needs them. An item not yet in the
    /// path becomes a new requirement of the root.
    pub fn select(&mut self, item: &str, source: &str) {
        match self.find_mut(item) {
            Some(node) => node.source = Some(source.to_string()),
            None => self.requirements.push(ProductionPath::selected(item, source)),
        }
    }

    /// Clear the selection of `item` and drop everything chosen beneath it.
    /// Returns whether the item was found.
    pub fn reset_subtree(&mut self, item: &str) -> bool {
        match self.find_mut(item) {
            Some(node) => {
                node.source = None;
                node.requirements.clear();
                true
            }
            None => false,
        }
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Number of nodes with a chosen source.
    pub fn count_decisions(&self) -> usize {
        usize::from(self.source.is_some())
            + self
                .requirements
                .iter()
                .map(ProductionPath::count_decisions)
                .sum::<usize>()
    }

    /// Every node has a chosen source.
    pub fn is_complete(&self) -> bool {
        self.source.is_some() && self.requirements.iter().all(ProductionPath::is_complete)
    }

    /// Complete with respect to the alternatives `tree` offers: nodes for
    /// base items need no selection, every other node needs one. Items the
    /// tree never expanded are held to the structural rule.
    pub fn is_complete_against(&self, tree: &ProductionTree) -> bool {
        if tree.find_resolved(&self.item).is_some_and(ProductionTree::is_base) {
            return true;
        }
        self.source.is_some()
            && self
                .requirements
                .iter()
                .all(|child| child.is_complete_against(tree))
    }

    /// Distinct item identifiers anywhere in the path.
    pub fn all_item_ids(&self) -> BTreeSet<&str> {
        let mut ids = BTreeSet::new();
        self.collect_ids(&mut ids);
        ids
    }

    fn collect_ids<'a>(&'a self, ids: &mut BTreeSet<&'a str>) {
        ids.insert(self.item.as_str());
        for child in &self.requirements {
            child.collect_ids(ids);
        }
    }

    /// Nesting depth; a single node has depth 1.
    pub fn depth(&self) -> usize {
        1 + self
            .requirements
            .iter()
            .map(ProductionPath::depth)
            .max()
            .unwrap_or(0)
    }
}

/// Merge one selection into an optional path, creating the path if needed.
pub fn select_source_for_item(
    current: Option<ProductionPath>,
    item: &str,
    source: &str,
) -> ProductionPath {
    match current {
        Some(mut path) => {
            path.select(item, source);
            path
        }
        None => ProductionPath::selected(item, source),
    }
}
