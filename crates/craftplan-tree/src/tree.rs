//! Production trees: every way to obtain an item, expanded recursively.
//!
//! Expansion is bounded by [`TreeLimits`]. Cycles and the depth limit end a
//! branch with a terminal node that records why it stopped; neither is an
//! error.

use crate::index::{KeyedSource, ProductionIndex};
use craftplan_core::id::MinecraftId;
use craftplan_core::source::ResourceSource;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashSet;
use std::sync::Arc;

// ---------------------------------------------------------------------------
// Limits
// ---------------------------------------------------------------------------

/// Bounds on tree expansion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeLimits {
    /// Levels of requirements expanded below the root. At 0 the root still
    /// lists its branches, but their requirements are not expanded.
    pub max_depth: u32,
    /// Branches built per node. The rest are only counted.
    pub max_branches: usize,
}

impl Default for TreeLimits {
    fn default() -> Self {
        Self {
            max_depth: 4,
            max_branches: 5,
        }
    }
}

// ---------------------------------------------------------------------------
// Tree types
// ---------------------------------------------------------------------------

/// Why a node has no branches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stop {
    /// Nothing produces the item.
    Base,
    /// The item already appears higher up in this lineage.
    Cycle,
    /// Expansion ran out of depth.
    DepthLimit,
}

/// Default ordering key for branches. Greater is better: fewer distinct
/// requirements first, then branches needing only base resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BranchScore {
    pub distinct_requirements: usize,
    pub all_base: bool,
}

impl Ord for BranchScore {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .distinct_requirements
            .cmp(&self.distinct_requirements)
            .then(self.all_base.cmp(&other.all_base))
    }
}

impl PartialOrd for BranchScore {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// One way to obtain an item: a source and the trees of its distinct
/// requirements.
#[derive(Debug, Clone, Serialize)]
pub struct ProductionBranch {
    /// Selects this branch among its siblings.
    pub key: String,
    pub source: Arc<ResourceSource>,
    pub score: BranchScore,
    pub requirements: Vec<ProductionTree>,
}

/// All known ways to obtain `item`.
#[derive(Debug, Clone, Serialize)]
pub struct ProductionTree {
    pub item: MinecraftId,
    /// Best first. Empty for base items and cut-off nodes.
    pub branches: Vec<ProductionBranch>,
    /// Alternatives beyond `max_branches` that were not built.
    pub more_available: usize,
    pub stop: Option<Stop>,
}

impl ProductionTree {
    fn terminal(item: MinecraftId, stop: Stop) -> Self {
        Self {
            item,
            branches: Vec::new(),
            more_available: 0,
            stop: Some(stop),
        }
    }

    pub fn item_id(&self) -> &str {
        self.item.id()
    }

    /// No alternatives were listed for this node.
    pub fn is_terminal(&self) -> bool {
        self.branches.is_empty() && self.more_available == 0
    }

    /// Nothing produces this item.
    pub fn is_base(&self) -> bool {
        self.stop == Some(Stop::Base)
    }

    pub fn branch(&self, key: &str) -> Option<&ProductionBranch> {
        self.branches.iter().find(|b| b.key == key)
    }

    /// Number of tree nodes, this one included.
    pub fn node_count(&self) -> usize {
        1 + self
            .branches
            .iter()
            .flat_map(|b| &b.requirements)
            .map(ProductionTree::node_count)
            .sum::<usize>()
    }

    /// First node for `item_id` in depth-first order.
    pub fn find(&self, item_id: &str) -> Option<&ProductionTree> {
        self.find_where(&|t| t.item_id() == item_id)
    }

    /// First node for `item_id` that was either expanded or is a base item,
    /// skipping cycle and depth cut-offs.
    pub fn find_resolved(&self, item_id: &str) -> Option<&ProductionTree> {
        self.find_where(&|t| {
            t.item_id() == item_id && matches!(t.stop, None | Some(Stop::Base))
        })
    }

    fn find_where(&self, pred: &dyn Fn(&ProductionTree) -> bool) -> Option<&ProductionTree> {
        if pred(self) {
            return Some(self);
        }
        self.branches
            .iter()
            .flat_map(|b| &b.requirements)
            .find_map(|child| child.find_where(pred))
    }
}

// ---------------------------------------------------------------------------
// Building
// ---------------------------------------------------------------------------

/// Build the production tree for `item_id`.
pub fn build_tree(index: &ProductionIndex, item_id: &str, limits: TreeLimits) -> ProductionTree {
    build_tree_for(index, index.lookup(item_id), limits)
}

/// Build the production tree for an identifier that already carries its
/// registry data.
pub fn build_tree_for(index: &ProductionIndex, item: MinecraftId, limits: TreeLimits) -> ProductionTree {
    let mut builder = TreeBuilder {
        index,
        limits,
        visited: HashSet::new(),
    };
    builder.node(item, limits.max_depth)
}

/// Score a source against the index.
pub fn score(index: &ProductionIndex, source: &ResourceSource) -> BranchScore {
    let required = source.distinct_required();
    BranchScore {
        distinct_requirements: required.len(),
        all_base: required.iter().all(|id| index.is_base(id)),
    }
}

struct TreeBuilder<'a> {
    index: &'a ProductionIndex,
    limits: TreeLimits,
    /// Items on the current lineage.
    visited: HashSet<String>,
}

impl TreeBuilder<'_> {
    fn node(&mut self, item: MinecraftId, depth_left: u32) -> ProductionTree {
        if self.visited.contains(item.id()) {
            tracing::trace!(item = %item, "cycle, not expanding");
            return ProductionTree::terminal(item, Stop::Cycle);
        }

        let mut alternatives: Vec<(BranchScore, KeyedSource)> = self
            .index
            .keyed_sources(&item)
            .into_iter()
            .map(|keyed| (score(self.index, &keyed.source), keyed))
            .collect();
        if alternatives.is_empty() {
            return ProductionTree::terminal(item, Stop::Base);
        }

        alternatives.sort_by(|a, b| b.0.cmp(&a.0));
        let more_available = alternatives.len().saturating_sub(self.limits.max_branches);
        alternatives.truncate(self.limits.max_branches);

        self.visited.insert(item.id().to_string());
        let mut branches = Vec::with_capacity(alternatives.len());
        for (score, keyed) in alternatives {
            let mut requirements = Vec::new();
            for required in keyed.source.distinct_required() {
                let child = if depth_left == 0 {
                    self.cut_off(required.clone())
                } else {
                    self.node(required.clone(), depth_left - 1)
                };
                requirements.push(child);
            }
            branches.push(ProductionBranch {
                key: keyed.key,
                source: keyed.source,
                score,
                requirements,
            });
        }
        self.visited.remove(item.id());

        ProductionTree {
            item,
            branches,
            more_available,
            stop: None,
        }
    }

    /// Terminal stand-in for a requirement below the depth limit.
    fn cut_off(&self, item: MinecraftId) -> ProductionTree {
        let stop = if self.visited.contains(item.id()) {
            Stop::Cycle
        } else if self.index.is_base(&item) {
            Stop::Base
        } else {
            tracing::trace!(item = %item, "depth limit reached");
            Stop::DepthLimit
        };
        ProductionTree::terminal(item, stop)
    }
}
