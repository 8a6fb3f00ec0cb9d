//! Craftplan Tree -- production graph, trees and path selection.
//!
//! Turns the flat list of [`craftplan_core::source::ResourceSource`] records
//! into something a user can navigate:
//!
//! - [`ProductionIndex`] answers "what produces this item" in one lookup.
//! - [`build_tree`] expands every way to obtain an item into a
//!   [`ProductionTree`], bounded by [`TreeLimits`] and cut at cycles.
//! - [`ProductionPath`] holds the branches a user picked so far and
//!   round-trips through a compact string with [`codec::encode`] and
//!   [`codec::decode`].

pub mod codec;
pub mod index;
pub mod path;
pub mod tree;

pub use codec::{PathDecodeError, decode, encode};
pub use index::{KeyedSource, ProductionIndex};
pub use path::{ProductionPath, select_source_for_item};
pub use tree::{BranchScore, ProductionBranch, ProductionTree, Stop, TreeLimits, build_tree};
