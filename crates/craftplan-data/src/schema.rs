//! Serde data file structs for registry and planner configuration files.
//!
//! These structs define the on-disk format of everything except recipe
//! documents, which are too irregular for fixed structs and are read through
//! the extractor chains in [`crate::recipe`].

use craftplan_core::id::GameVersion;
use craftplan_tree::TreeLimits;
use serde::Deserialize;
use std::path::PathBuf;

// ===========================================================================
// Registry: items
// ===========================================================================

/// An item entry in `items.{ron,toml,json}`.
#[derive(Debug, Clone, Deserialize)]
pub struct ItemData {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
}

// ===========================================================================
// Registry: tags
// ===========================================================================

/// A tag entry in `tags.{ron,toml,json}`.
#[derive(Debug, Clone, Deserialize)]
pub struct TagData {
    pub id: String,
    #[serde(default)]
    pub values: Vec<TagValueData>,
}

/// A vanilla tag file (`tags/item/logs.json`). Its `replace` flag is not
/// read: one registry directory is one pack.
#[derive(Debug, Clone, Deserialize)]
pub struct TagFileData {
    #[serde(default)]
    pub values: Vec<TagValueData>,
}

/// A tag value: either a bare id or the object form used for optional
/// entries.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TagValueData {
    Id(String),
    Entry {
        id: String,
        #[serde(default = "default_true")]
        required: bool,
    },
}

impl TagValueData {
    pub fn id(&self) -> &str {
        match self {
            TagValueData::Id(id) => id,
            TagValueData::Entry { id, .. } => id,
        }
    }

    pub fn is_required(&self) -> bool {
        match self {
            TagValueData::Id(_) => true,
            TagValueData::Entry { required, .. } => *required,
        }
    }
}

fn default_true() -> bool {
    true
}

// ===========================================================================
// Planner configuration
// ===========================================================================

/// Planner configuration file (`planner.{ron,toml,json}`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlannerConfigData {
    #[serde(default)]
    pub default_version: Option<GameVersion>,
    /// Recipe directory relative to a version directory, overriding the
    /// data pack layout.
    #[serde(default)]
    pub recipe_dir: Option<PathBuf>,
    #[serde(default)]
    pub limits: TreeLimits,
}
