use crate::id::MinecraftId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

// ---------------------------------------------------------------------------
// Quantities
// ---------------------------------------------------------------------------

/// A non-negative item count attached to a recipe input or output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceQuantity(pub u32);

impl ResourceQuantity {
    pub const ONE: ResourceQuantity = ResourceQuantity(1);

    pub fn count(self) -> u32 {
        self.0
    }

    /// Quantity for a produced item as declared by a recipe document.
    /// Declarations of zero or less are coerced to one.
    pub fn produced(declared: i64, filename: &str) -> Self {
        if declared <= 0 {
            tracing::warn!(
                file = filename,
                declared,
                "non-positive result count, using 1"
            );
            return Self::ONE;
        }
        Self(u32::try_from(declared).unwrap_or(u32::MAX))
    }

    pub fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }
}

impl Default for ResourceQuantity {
    fn default() -> Self {
        Self::ONE
    }
}

// ---------------------------------------------------------------------------
// Source types
// ---------------------------------------------------------------------------

/// The recipe family a source came from, plus the two sentinels the parsers
/// emit for documents that contribute nothing to the production graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceType {
    CraftingShaped,
    CraftingShapeless,
    Smelting,
    Blasting,
    Smoking,
    CampfireCooking,
    Stonecutting,
    SmithingTransform,
    CraftingTransmute,
    /// Cosmetic or special-cased recipe (armor trims, decorated pots, ...).
    Ignored,
    /// Unrecognized type, missing type, or a document that failed to parse.
    Unknown,
}

impl SourceType {
    pub const ALL: [SourceType; 11] = [
        SourceType::CraftingShaped,
        SourceType::CraftingShapeless,
        SourceType::Smelting,
        SourceType::Blasting,
        SourceType::Smoking,
        SourceType::CampfireCooking,
        SourceType::Stonecutting,
        SourceType::SmithingTransform,
        SourceType::CraftingTransmute,
        SourceType::Ignored,
        SourceType::Unknown,
    ];

    /// Short stable key, also the un-namespaced recipe `type` value.
    pub fn key(self) -> &'static str {
        match self {
            SourceType::CraftingShaped => "crafting_shaped",
            SourceType::CraftingShapeless => "crafting_shapeless",
            SourceType::Smelting => "smelting",
            SourceType::Blasting => "blasting",
            SourceType::Smoking => "smoking",
            SourceType::CampfireCooking => "campfire_cooking",
            SourceType::Stonecutting => "stonecutting",
            SourceType::SmithingTransform => "smithing_transform",
            SourceType::CraftingTransmute => "crafting_transmute",
            SourceType::Ignored => "ignored",
            SourceType::Unknown => "unknown",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.key() == key)
    }

    pub fn is_sentinel(self) -> bool {
        matches!(self, SourceType::Ignored | SourceType::Unknown)
    }
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

// ---------------------------------------------------------------------------
// Resource source
// ---------------------------------------------------------------------------

/// One recipe instance: what it needs and what it yields.
///
/// A document may fan out into several sources (one per ingredient
/// combination). Sources are immutable once the extraction driver has
/// attached registry data to them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceSource {
    pub source_type: SourceType,
    /// Originating document, for diagnostics.
    pub filename: String,
    pub required: Vec<(MinecraftId, ResourceQuantity)>,
    pub produced: Vec<(MinecraftId, ResourceQuantity)>,
}

impl ResourceSource {
    pub fn new(source_type: SourceType, filename: impl Into<String>) -> Self {
        Self {
            source_type,
            filename: filename.into(),
            required: Vec::new(),
            produced: Vec::new(),
        }
    }

    pub fn unknown(filename: impl Into<String>) -> Self {
        Self::new(SourceType::Unknown, filename)
    }

    pub fn ignored(filename: impl Into<String>) -> Self {
        Self::new(SourceType::Ignored, filename)
    }

    pub fn with_required(mut self, id: MinecraftId, quantity: ResourceQuantity) -> Self {
        self.required.push((id, quantity));
        self
    }

    pub fn with_produced(mut self, id: MinecraftId, quantity: ResourceQuantity) -> Self {
        self.produced.push((id, quantity));
        self
    }

    pub fn is_sentinel(&self) -> bool {
        self.source_type.is_sentinel()
    }

    /// Whether this source belongs in the production graph.
    pub fn is_indexable(&self) -> bool {
        !self.is_sentinel() && !self.produced.is_empty()
    }

    pub fn produces(&self, item_id: &str) -> bool {
        self.produced.iter().any(|(id, _)| id.id() == item_id)
    }

    /// Required identifiers in first-seen order, each listed once.
    pub fn distinct_required(&self) -> Vec<&MinecraftId> {
        let mut seen: Vec<&MinecraftId> = Vec::with_capacity(self.required.len());
        for (id, _) in &self.required {
            if !seen.contains(&id) {
                seen.push(id);
            }
        }
        seen
    }

    /// Merge repeated required identifiers into one entry by summing their
    /// quantities. Order of first appearance is kept.
    pub fn consolidate_required(&mut self) {
        let mut merged: Vec<(MinecraftId, ResourceQuantity)> =
            Vec::with_capacity(self.required.len());
        for (id, quantity) in self.required.drain(..) {
            match merged.iter_mut().find(|(existing, _)| *existing == id) {
                Some((_, total)) => *total = total.saturating_add(quantity),
                None => merged.push((id, quantity)),
            }
        }
        self.required = merged;
    }

    /// Total number of required units across all entries.
    pub fn required_units(&self) -> u64 {
        self.required.iter().map(|(_, q)| u64::from(q.count())).sum()
    }

    /// File name without directories or extension (`oak_planks`).
    pub fn file_stem(&self) -> &str {
        Path::new(&self.filename)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(&self.filename)
    }

    /// Rewrite every identifier in both lists.
    pub fn map_ids(mut self, mut f: impl FnMut(MinecraftId) -> MinecraftId) -> Self {
        self.required = self
            .required
            .into_iter()
            .map(|(id, q)| (f(id), q))
            .collect();
        self.produced = self
            .produced
            .into_iter()
            .map(|(id, q)| (f(id), q))
            .collect();
        self
    }
}
