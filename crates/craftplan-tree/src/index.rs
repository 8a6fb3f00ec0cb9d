//! Production graph index: which sources produce a given item.

use craftplan_core::id::MinecraftId;
use craftplan_core::source::ResourceSource;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

/// A source together with the key that selects it among the alternatives
/// for one item.
#[derive(Debug, Clone, Serialize)]
pub struct KeyedSource {
    pub key: String,
    pub source: Arc<ResourceSource>,
}

/// Immutable lookup from produced item to the sources producing it.
///
/// Built once from the extraction output. A source yielding several items
/// is indexed under each of them.
#[derive(Debug, Clone, Default)]
pub struct ProductionIndex {
    sources: Vec<Arc<ResourceSource>>,
    by_item: HashMap<String, Vec<usize>>,
    /// Every identifier seen, with registry data attached. Tags keep the
    /// first occurrence that carried an expansion.
    known: HashMap<String, MinecraftId>,
}

impl ProductionIndex {
    pub fn new(sources: impl IntoIterator<Item = ResourceSource>) -> Self {
        let mut index = Self::default();
        for source in sources {
            index.insert(source);
        }
        tracing::debug!(
            sources = index.sources.len(),
            items = index.by_item.len(),
            "production index built"
        );
        index
    }

    fn insert(&mut self, source: ResourceSource) {
        if !source.is_indexable() {
            tracing::debug!(file = %source.filename, "skipping non-indexable source");
            return;
        }

        let position = self.sources.len();
        for (id, _) in source.required.iter().chain(&source.produced) {
            self.remember(id);
        }
        for (id, _) in &source.produced {
            if id.is_tag() {
                tracing::warn!(file = %source.filename, tag = %id, "tag listed as a recipe output");
                continue;
            }
            let producers = self.by_item.entry(id.id().to_string()).or_default();
            if producers.last() != Some(&position) {
                producers.push(position);
            }
        }
        self.sources.push(Arc::new(source));
    }

    fn remember(&mut self, id: &MinecraftId) {
        match self.known.get(id.id()) {
            Some(MinecraftId::Tag(existing)) if existing.content.is_empty() && !id.item_ids().is_empty() => {}
            Some(_) => return,
            None => {}
        }
        self.known.insert(id.id().to_string(), id.clone());
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Number of distinct items with at least one source.
    pub fn item_count(&self) -> usize {
        self.by_item.len()
    }

    /// The identifier for a raw id, with whatever registry data the index has
    /// seen for it.
    pub fn lookup(&self, raw: &str) -> MinecraftId {
        let raw = raw.trim();
        self.known
            .get(raw)
            .cloned()
            .unwrap_or_else(|| MinecraftId::parse(raw))
    }

    fn positions(&self, id: &MinecraftId) -> Vec<usize> {
        match id {
            MinecraftId::Item(item) => self.by_item.get(&item.id).cloned().unwrap_or_default(),
            MinecraftId::Tag(tag) => {
                let members: Vec<String> = if tag.content.is_empty() {
                    self.lookup(&tag.id).item_ids().into_iter().map(str::to_string).collect()
                } else {
                    tag.content.iter().map(|i| i.id.clone()).collect()
                };
                let mut positions: Vec<usize> = Vec::new();
                for member in &members {
                    for &p in self.by_item.get(member).into_iter().flatten() {
                        if !positions.contains(&p) {
                            positions.push(p);
                        }
                    }
                }
                positions
            }
        }
    }

    /// Every source producing `id`. A tag id (`#...`) yields the sources of
    /// all its members.
    pub fn sources_producing(&self, id: &str) -> Vec<&ResourceSource> {
        self.positions(&self.lookup(id))
            .into_iter()
            .map(|p| &*self.sources[p])
            .collect()
    }

    /// Sources for `id` with their selection keys, in index order.
    pub fn keyed_sources(&self, id: &MinecraftId) -> Vec<KeyedSource> {
        let sources: Vec<Arc<ResourceSource>> = self
            .positions(id)
            .into_iter()
            .map(|p| Arc::clone(&self.sources[p]))
            .collect();
        let keys = assign_keys(sources.iter().map(Arc::as_ref));
        keys.into_iter()
            .zip(sources)
            .map(|(key, source)| KeyedSource { key, source })
            .collect()
    }

    /// Whether nothing known produces `id`.
    pub fn is_base(&self, id: &MinecraftId) -> bool {
        self.positions(id).is_empty()
    }
}

// ===========================================================================
// Source keys
// ===========================================================================

fn sanitize_stem(stem: &str) -> String {
    stem.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c.to_ascii_lowercase() } else { '_' })
        .collect()
}

/// Keys for a list of alternatives: the recipe type key when unique, else
/// `type.stem`, else `type.stem.N` for the N-th repeat.
pub fn assign_keys<'a>(sources: impl IntoIterator<Item = &'a ResourceSource>) -> Vec<String> {
    let sources: Vec<&ResourceSource> = sources.into_iter().collect();

    let mut type_counts: HashMap<&str, usize> = HashMap::new();
    for source in &sources {
        *type_counts.entry(source.source_type.key()).or_default() += 1;
    }

    let mut seen: HashMap<String, usize> = HashMap::new();
    sources
        .iter()
        .map(|source| {
            let type_key = source.source_type.key();
            let base = if type_counts[type_key] == 1 {
                type_key.to_string()
            } else {
                format!("{type_key}.{}", sanitize_stem(source.file_stem()))
            };
            let n = seen.entry(base.clone()).or_default();
            *n += 1;
            if *n == 1 { base } else { format!("{base}.{n}") }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use craftplan_core::test_utils::*;

    fn keys(index: &ProductionIndex, id: &str) -> Vec<String> {
        index
            .keyed_sources(&index.lookup(id))
            .into_iter()
            .map(|k| k.key)
            .collect()
    }

    // -----------------------------------------------------------------------
    // Lookup
    // -----------------------------------------------------------------------

    #[test]
    fn sources_by_produced_item() {
        let index = ProductionIndex::new(wood_sources());
        assert_eq!(index.len(), 10);
        assert_eq!(index.sources_producing("minecraft:torch").len(), 2);
        assert_eq!(index.sources_producing("minecraft:oak_planks").len(), 1);
        assert!(index.sources_producing("minecraft:coal").is_empty());
        assert!(index.is_base(&item("minecraft:coal")));
        assert!(!index.is_base(&item("minecraft:stick")));
    }

    #[test]
    fn tag_lookup_unions_member_sources() {
        let index = ProductionIndex::new(wood_sources());
        let planks = index.sources_producing("#minecraft:planks");
        assert_eq!(planks.len(), 6);
        assert!(planks.iter().all(|s| s.produced[0].0.id().ends_with("_planks")));
        assert!(!index.is_base(&index.lookup("#minecraft:planks")));
    }

    #[test]
    fn sentinels_are_not_indexed() {
        let mut sources = wood_sources();
        sources.push(craftplan_core::source::ResourceSource::unknown("broken.json"));
        let index = ProductionIndex::new(sources);
        assert_eq!(index.len(), 10);
    }

    #[test]
    fn byproducts_index_under_each_output() {
        let source = make_source(
            craftplan_core::source::SourceType::CraftingShapeless,
            "honey_bottle.json",
            &[("minecraft:honey_block", 1)],
            ("minecraft:honey_bottle", 4),
        )
        .with_produced(item("minecraft:glass_bottle"), craftplan_core::source::ResourceQuantity(1));
        let index = ProductionIndex::new([source]);
        assert_eq!(index.item_count(), 2);
        assert_eq!(index.sources_producing("minecraft:glass_bottle").len(), 1);
    }

    #[test]
    fn lookup_prefers_known_names() {
        let index = ProductionIndex::new(wood_sources());
        let tag = index.lookup("#minecraft:planks");
        assert_eq!(tag.item_ids().len(), 6);
        let unknown = index.lookup("minecraft:bedrock");
        assert_eq!(unknown.name(), "Bedrock");
    }

    // -----------------------------------------------------------------------
    // Keys
    // -----------------------------------------------------------------------

    #[test]
    fn unique_types_use_the_type_key() {
        let index = ProductionIndex::new(cyclic_sources());
        let mut ingot = keys(&index, "minecraft:iron_ingot");
        ingot.sort();
        assert_eq!(ingot, vec!["crafting_shapeless", "smelting"]);
        assert_eq!(keys(&index, "minecraft:iron_pickaxe"), vec!["crafting_shaped"]);
    }

    #[test]
    fn colliding_types_add_the_file_stem() {
        let index = ProductionIndex::new(wood_sources());
        assert_eq!(
            keys(&index, "minecraft:torch"),
            vec!["crafting_shaped.torch", "crafting_shaped.torch_charcoal"]
        );
        let planks = keys(&index, "#minecraft:planks");
        assert_eq!(planks[0], "crafting_shapeless.oak_planks");
        assert_eq!(planks.len(), 6);
    }

    #[test]
    fn repeated_stems_get_ordinals() {
        let sources = vec![
            shapeless("dye/red-dye.json", &[("minecraft:poppy", 1)], ("minecraft:red_dye", 1)),
            shapeless("dye/red-dye.json", &[("minecraft:beetroot", 1)], ("minecraft:red_dye", 1)),
            shapeless("dye/red-dye.json", &[("minecraft:rose_bush", 1)], ("minecraft:red_dye", 2)),
        ];
        let index = ProductionIndex::new(sources);
        assert_eq!(
            keys(&index, "minecraft:red_dye"),
            vec![
                "crafting_shapeless.red_dye",
                "crafting_shapeless.red_dye.2",
                "crafting_shapeless.red_dye.3",
            ]
        );
    }
}
