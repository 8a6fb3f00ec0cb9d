use crate::id::{display_name_from_id, tag_id, GameVersion, Item, MinecraftId, Tag, TAG_PREFIX};
use std::collections::{BTreeMap, HashMap, HashSet};

/// An item known to one version's registry.
#[derive(Debug, Clone)]
pub struct ItemDef {
    pub id: String,
    pub name: String,
}

/// A tag as declared in source data: its values may be items or other tags.
#[derive(Debug, Clone)]
pub struct TagDef {
    pub id: String,
    pub values: Vec<String>,
}

/// Builder for one version's immutable [`Registry`].
/// Two-phase lifecycle: registration -> finalization.
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    items: Vec<ItemDef>,
    tags: Vec<TagDef>,
    tag_name_to_index: HashMap<String, usize>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an item. Without a display name, one is derived from the id.
    pub fn register_item(&mut self, id: &str, name: Option<&str>) {
        let id = id.trim().to_string();
        let name = name
            .map(str::to_string)
            .unwrap_or_else(|| display_name_from_id(&id));
        self.items.push(ItemDef { id, name });
    }

    /// Register a tag. Registering the same tag twice appends the new values,
    /// the way stacked data packs extend a tag.
    pub fn register_tag<S: AsRef<str>>(&mut self, id: &str, values: &[S]) {
        let id = tag_id(id);
        let values = values.iter().map(|v| v.as_ref().trim().to_string());
        match self.tag_name_to_index.get(&id) {
            Some(&index) => self.tags[index].values.extend(values),
            None => {
                self.tag_name_to_index.insert(id.clone(), self.tags.len());
                self.tags.push(TagDef {
                    id,
                    values: values.collect(),
                });
            }
        }
    }

    /// Whether `id` has been registered as an item so far.
    pub fn has_item(&self, id: &str) -> bool {
        let id = id.trim();
        self.items.iter().any(|item| item.id == id)
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub fn tag_count(&self) -> usize {
        self.tags.len()
    }

    /// Finalize: validate identifiers and flatten every tag to its concrete
    /// items. Nested tag references that are missing or cyclic are skipped
    /// with a warning.
    pub fn build(self) -> Result<Registry, RegistryError> {
        let mut item_name_to_index = HashMap::with_capacity(self.items.len());
        for (index, item) in self.items.iter().enumerate() {
            if item.id.is_empty() || item.id.starts_with(TAG_PREFIX) {
                return Err(RegistryError::InvalidItemId(item.id.clone()));
            }
            if item_name_to_index.insert(item.id.clone(), index).is_some() {
                return Err(RegistryError::DuplicateItem(item.id.clone()));
            }
        }

        for tag in &self.tags {
            let path = tag.id.rsplit_once(':').map_or("", |(_, path)| path);
            if path.is_empty() {
                return Err(RegistryError::InvalidTagId(tag.id.clone()));
            }
        }

        let mut expanded = HashMap::with_capacity(self.tags.len());
        for tag in &self.tags {
            let mut members = Vec::new();
            let mut seen = HashSet::new();
            let mut visiting = HashSet::new();
            self.expand_into(&tag.id, &mut members, &mut seen, &mut visiting);
            expanded.insert(tag.id.clone(), members);
        }

        Ok(Registry {
            items: self.items,
            item_name_to_index,
            tags: expanded,
        })
    }

    fn expand_into(
        &self,
        tag: &str,
        members: &mut Vec<String>,
        seen: &mut HashSet<String>,
        visiting: &mut HashSet<String>,
    ) {
        let Some(&index) = self.tag_name_to_index.get(tag) else {
            tracing::warn!(tag, "nested tag reference not found");
            return;
        };
        if !visiting.insert(tag.to_string()) {
            tracing::warn!(tag, "tag references itself, skipping nested reference");
            return;
        }
        for value in &self.tags[index].values {
            if value.starts_with(TAG_PREFIX) {
                let nested = tag_id(value);
                self.expand_into(&nested, members, seen, visiting);
            } else if seen.insert(value.clone()) {
                members.push(value.clone());
            }
        }
        visiting.remove(tag);
    }
}

/// Immutable item/tag registry for one game version. Frozen after build().
#[derive(Debug, Clone)]
pub struct Registry {
    items: Vec<ItemDef>,
    item_name_to_index: HashMap<String, usize>,
    /// Tag id -> flattened concrete item ids, in declaration order.
    tags: HashMap<String, Vec<String>>,
}

impl Registry {
    pub fn item_exists(&self, id: &str) -> bool {
        self.item_name_to_index.contains_key(id)
    }

    pub fn tag_exists(&self, id: &str) -> bool {
        self.tags.contains_key(&tag_id(id))
    }

    pub fn get_item(&self, id: &str) -> Option<&ItemDef> {
        self.item_name_to_index.get(id).map(|&i| &self.items[i])
    }

    /// Display name for an item or tag id. Unknown ids get a derived name.
    pub fn display_name(&self, id: &str) -> String {
        match self.get_item(id) {
            Some(item) => item.name.clone(),
            None => display_name_from_id(id),
        }
    }

    /// Concrete items a tag stands for. An unknown tag resolves to nothing;
    /// the caller decides whether that matters.
    pub fn resolve_tag(&self, tag: &str) -> Vec<Item> {
        self.tags
            .get(&tag_id(tag))
            .map(|ids| {
                ids.iter()
                    .map(|id| Item::named(id.clone(), self.display_name(id)))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Attach display names, and for tags the concrete expansion, to an id.
    pub fn resolve(&self, id: MinecraftId) -> MinecraftId {
        match id {
            MinecraftId::Item(item) => {
                let name = self.display_name(&item.id);
                MinecraftId::Item(Item { name, ..item })
            }
            MinecraftId::Tag(tag) => {
                let content = self.resolve_tag(&tag.id);
                MinecraftId::Tag(Tag {
                    name: display_name_from_id(&tag.id),
                    content,
                    id: tag.id,
                })
            }
        }
    }

    pub fn items(&self) -> impl Iterator<Item = &ItemDef> {
        self.items.iter()
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub fn tag_count(&self) -> usize {
        self.tags.len()
    }
}

// ---------------------------------------------------------------------------
// Per-version registries
// ---------------------------------------------------------------------------

/// Registries for every loaded game version.
///
/// Lookups against a version that was never loaded behave like lookups
/// against an empty registry.
#[derive(Debug, Default)]
pub struct RegistrySet {
    registries: BTreeMap<GameVersion, Registry>,
}

impl RegistrySet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, version: GameVersion, registry: Registry) -> Option<Registry> {
        self.registries.insert(version, registry)
    }

    pub fn get(&self, version: &GameVersion) -> Option<&Registry> {
        self.registries.get(version)
    }

    /// Versions in ascending order.
    pub fn versions(&self) -> impl Iterator<Item = &GameVersion> {
        self.registries.keys()
    }

    pub fn latest(&self) -> Option<(&GameVersion, &Registry)> {
        self.registries.iter().next_back()
    }

    pub fn resolve_tag(&self, version: &GameVersion, tag: &str) -> Vec<Item> {
        self.get(version)
            .map(|r| r.resolve_tag(tag))
            .unwrap_or_default()
    }

    pub fn item_exists(&self, version: &GameVersion, id: &str) -> bool {
        self.get(version).is_some_and(|r| r.item_exists(id))
    }

    pub fn display_name(&self, version: &GameVersion, id: &str) -> String {
        match self.get(version) {
            Some(registry) => registry.display_name(id),
            None => display_name_from_id(id),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("duplicate item: {0}")]
    DuplicateItem(String),
    #[error("invalid item id: '{0}'")]
    InvalidItemId(String),
    #[error("invalid tag id: '{0}'")]
    InvalidTagId(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_builder() -> RegistryBuilder {
        let mut b = RegistryBuilder::new();
        b.register_item("minecraft:oak_log", None);
        b.register_item("minecraft:birch_log", Some("Birch Log"));
        b.register_item("minecraft:oak_planks", Some("Oak Planks"));
        b.register_item("minecraft:stripped_oak_log", None);
        b.register_tag("minecraft:oak_logs", &["minecraft:oak_log", "minecraft:stripped_oak_log"]);
        b.register_tag("#minecraft:logs", &["#minecraft:oak_logs", "minecraft:birch_log"]);
        b
    }

    fn ids(items: &[Item]) -> Vec<&str> {
        items.iter().map(|i| i.id.as_str()).collect()
    }

    #[test]
    fn register_and_build() {
        let reg = setup_builder().build().unwrap();
        assert_eq!(reg.item_count(), 4);
        assert_eq!(reg.tag_count(), 2);
        assert!(reg.item_exists("minecraft:oak_log"));
        assert!(!reg.item_exists("minecraft:diamond"));
        assert!(reg.tag_exists("minecraft:logs"));
        assert!(reg.tag_exists("#minecraft:logs"));
    }

    #[test]
    fn nested_tags_flatten_in_order() {
        let reg = setup_builder().build().unwrap();
        let logs = reg.resolve_tag("#minecraft:logs");
        assert_eq!(
            ids(&logs),
            vec![
                "minecraft:oak_log",
                "minecraft:stripped_oak_log",
                "minecraft:birch_log"
            ]
        );
        assert_eq!(logs[2].name, "Birch Log");
    }

    #[test]
    fn unknown_tag_resolves_empty() {
        let reg = setup_builder().build().unwrap();
        assert!(reg.resolve_tag("#minecraft:wool").is_empty());
    }

    #[test]
    fn cyclic_and_missing_nested_tags_are_skipped() {
        let mut b = RegistryBuilder::new();
        b.register_tag("#a:one", &["#a:two", "a:x"]);
        b.register_tag("#a:two", &["#a:one", "#a:missing", "a:y"]);
        let reg = b.build().unwrap();
        assert_eq!(ids(&reg.resolve_tag("#a:one")), vec!["a:y", "a:x"]);
        assert_eq!(ids(&reg.resolve_tag("#a:two")), vec!["a:x", "a:y"]);
    }

    #[test]
    fn has_item_sees_registered_items() {
        let mut b = RegistryBuilder::new();
        assert!(!b.has_item("minecraft:stick"));
        b.register_item(" minecraft:stick ", None);
        assert!(b.has_item("minecraft:stick"));
        assert!(!b.has_item("#minecraft:stick"));
    }

    #[test]
    fn repeated_tag_registration_merges_values() {
        let mut b = RegistryBuilder::new();
        b.register_tag("#minecraft:planks", &["minecraft:oak_planks"]);
        b.register_tag("#minecraft:planks", &["minecraft:birch_planks", "minecraft:oak_planks"]);
        assert_eq!(b.tag_count(), 1);
        let reg = b.build().unwrap();
        assert_eq!(
            ids(&reg.resolve_tag("minecraft:planks")),
            vec!["minecraft:oak_planks", "minecraft:birch_planks"]
        );
    }

    #[test]
    fn display_names_fall_back_to_derived() {
        let reg = setup_builder().build().unwrap();
        assert_eq!(reg.display_name("minecraft:oak_planks"), "Oak Planks");
        assert_eq!(reg.display_name("minecraft:oak_log"), "Oak Log");
        assert_eq!(reg.display_name("minecraft:golden_apple"), "Golden Apple");
    }

    #[test]
    fn resolve_attaches_names_and_content() {
        let reg = setup_builder().build().unwrap();
        let resolved = reg.resolve(MinecraftId::tag("minecraft:oak_logs"));
        assert_eq!(resolved.name(), "Oak Logs");
        assert_eq!(
            resolved.item_ids(),
            vec!["minecraft:oak_log", "minecraft:stripped_oak_log"]
        );

        let item = reg.resolve(MinecraftId::item("minecraft:birch_log"));
        assert_eq!(item.name(), "Birch Log");
    }

    #[test]
    fn duplicate_item_fails() {
        let mut b = RegistryBuilder::new();
        b.register_item("minecraft:stick", None);
        b.register_item("minecraft:stick", None);
        match b.build() {
            Err(RegistryError::DuplicateItem(id)) => assert_eq!(id, "minecraft:stick"),
            other => panic!("expected DuplicateItem, got: {other:?}"),
        }
    }

    #[test]
    fn tag_shaped_item_id_fails() {
        let mut b = RegistryBuilder::new();
        b.register_item("#minecraft:logs", None);
        assert!(matches!(b.build(), Err(RegistryError::InvalidItemId(_))));
    }

    #[test]
    fn empty_tag_id_fails() {
        let mut b = RegistryBuilder::new();
        b.register_tag::<&str>("#", &[]);
        assert!(matches!(b.build(), Err(RegistryError::InvalidTagId(_))));
    }

    #[test]
    fn registry_set_is_keyed_by_version() {
        let mut set = RegistrySet::new();
        set.insert(GameVersion::from("1.20.1"), RegistryBuilder::new().build().unwrap());
        set.insert(GameVersion::from("1.21.4"), setup_builder().build().unwrap());

        let new = GameVersion::from("1.21.4");
        let old = GameVersion::from("1.20.1");
        let missing = GameVersion::from("1.8");

        assert_eq!(set.resolve_tag(&new, "#minecraft:logs").len(), 3);
        assert!(set.resolve_tag(&old, "#minecraft:logs").is_empty());
        assert!(set.resolve_tag(&missing, "#minecraft:logs").is_empty());
        assert!(set.item_exists(&new, "minecraft:oak_log"));
        assert!(!set.item_exists(&old, "minecraft:oak_log"));
        assert_eq!(set.display_name(&missing, "minecraft:oak_log"), "Oak Log");
        assert_eq!(set.latest().map(|(v, _)| v.as_str()), Some("1.21.4"));
        assert_eq!(set.versions().count(), 2);
    }
}
