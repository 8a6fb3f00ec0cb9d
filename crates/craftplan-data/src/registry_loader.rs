//! Load per-version item/tag registries from disk.
//!
//! A registry directory contains:
//!
//! - `items.{ron,toml,json}` (required): list of `{ id, name? }`
//! - `tags.{ron,toml,json}` (optional): list of `{ id, values }`
//! - `tags/item/**.json` (optional): vanilla tag files, one tag per file,
//!   named after the relative path (`tags/item/wooden/slabs.json` is
//!   `#minecraft:wooden/slabs`). `tags/items` is accepted for older packs.

use crate::loader::{DataLoadError, deserialize_list, find_data_file, require_data_file};
use crate::schema::{ItemData, TagData, TagFileData, TagValueData};
use craftplan_core::id::{DEFAULT_NAMESPACE, GameVersion};
use craftplan_core::registry::{Registry, RegistryBuilder, RegistrySet};
use std::path::{Path, PathBuf};

/// Name of the registry directory inside a version directory.
pub const REGISTRY_DIR: &str = "registry";

/// Load one registry directory.
pub fn load_registry(dir: &Path) -> Result<Registry, DataLoadError> {
    let mut builder = RegistryBuilder::new();

    let items_path = require_data_file(dir, "items")?;
    let items: Vec<ItemData> = deserialize_list(&items_path, "items")?;
    for item in &items {
        builder.register_item(&item.id, item.name.as_deref());
    }

    if let Some(tags_path) = find_data_file(dir, "tags")? {
        let tags: Vec<TagData> = deserialize_list(&tags_path, "tags")?;
        for tag in &tags {
            let values = tag_values(&builder, &tag.values);
            builder.register_tag(&tag.id, &values);
        }
    }

    for tag_dir in ["tags/item", "tags/items"].map(|d| dir.join(d)) {
        if tag_dir.is_dir() {
            load_tag_tree(&tag_dir, &mut builder)?;
        }
    }

    tracing::debug!(
        dir = %dir.display(),
        items = builder.item_count(),
        tags = builder.tag_count(),
        "registry loaded"
    );
    builder.build().map_err(|source| DataLoadError::Registry {
        dir: dir.to_path_buf(),
        source,
    })
}

/// Tag member ids. An optional item entry is skipped when the item is not
/// registered; optional tag references are left to nested expansion.
fn tag_values<'a>(builder: &RegistryBuilder, values: &'a [TagValueData]) -> Vec<&'a str> {
    values
        .iter()
        .filter(|value| {
            let id = value.id();
            let keep = value.is_required() || id.starts_with('#') || builder.has_item(id);
            if !keep {
                tracing::debug!(item = id, "skipping optional tag entry for unregistered item");
            }
            keep
        })
        .map(TagValueData::id)
        .collect()
}

fn load_tag_tree(root: &Path, builder: &mut RegistryBuilder) -> Result<(), DataLoadError> {
    for entry in walkdir::WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(std::io::Error::from)?;
        let path = entry.path();
        if !entry.file_type().is_file() || path.extension().and_then(|e| e.to_str()) != Some("json")
        {
            continue;
        }
        let relative = path.strip_prefix(root).unwrap_or(path).with_extension("");
        let name = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        let file: TagFileData = crate::loader::deserialize_file(path)?;
        let values = tag_values(builder, &file.values);
        builder.register_tag(&format!("#{DEFAULT_NAMESPACE}:{name}"), &values);
    }
    Ok(())
}

/// The registry directory for `version` under `base`.
pub fn registry_dir(base: &Path, version: &GameVersion) -> PathBuf {
    base.join(version.as_str()).join(REGISTRY_DIR)
}

/// Version directories under `base` that carry a registry, in version order.
pub fn discover_versions(base: &Path) -> Result<Vec<GameVersion>, DataLoadError> {
    let mut versions = Vec::new();
    for entry in std::fs::read_dir(base)? {
        let entry = entry?;
        if !entry.file_type()?.is_dir() || !entry.path().join(REGISTRY_DIR).is_dir() {
            continue;
        }
        if let Some(name) = entry.file_name().to_str() {
            versions.push(GameVersion::new(name));
        }
    }
    versions.sort();
    Ok(versions)
}

/// Load the registries of the given versions, each from
/// `<base>/<version>/registry`.
pub fn load_registry_set(base: &Path, versions: &[GameVersion]) -> Result<RegistrySet, DataLoadError> {
    let mut set = RegistrySet::new();
    for version in versions {
        let registry = load_registry(&registry_dir(base, version))?;
        tracing::info!(
            version = %version,
            items = registry.item_count(),
            tags = registry.tag_count(),
            "registry ready"
        );
        set.insert(version.clone(), registry);
    }
    Ok(set)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn make_test_dir(suffix: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "craftplan_registry_test_{suffix}_{}",
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn write(path: &Path, content: &str) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    // -----------------------------------------------------------------------
    // load_registry
    // -----------------------------------------------------------------------

    #[test]
    fn items_and_tag_list() {
        let dir = make_test_dir("list");
        write(
            &dir.join("items.ron"),
            r#"[
                (id: "minecraft:oak_planks"),
                (id: "minecraft:birch_planks", name: Some("Birch Wood Planks")),
                (id: "minecraft:stick"),
            ]"#,
        );
        write(
            &dir.join("tags.json"),
            r#"[{"id": "minecraft:planks", "values": ["minecraft:oak_planks", "minecraft:birch_planks"]}]"#,
        );

        let registry = load_registry(&dir).unwrap();
        assert!(registry.item_exists("minecraft:stick"));
        assert_eq!(registry.display_name("minecraft:oak_planks"), "Oak Planks");
        assert_eq!(registry.display_name("minecraft:birch_planks"), "Birch Wood Planks");
        let members: Vec<String> = registry
            .resolve_tag("#minecraft:planks")
            .into_iter()
            .map(|i| i.id)
            .collect();
        assert_eq!(members, vec!["minecraft:oak_planks", "minecraft:birch_planks"]);
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn vanilla_tag_tree_with_nesting() {
        let dir = make_test_dir("tree");
        write(
            &dir.join("items.toml"),
            r#"
[[items]]
id = "minecraft:oak_log"

[[items]]
id = "minecraft:oak_wood"

[[items]]
id = "minecraft:birch_log"
"#,
        );
        write(
            &dir.join("tags/item/oak_logs.json"),
            r#"{"values": ["minecraft:oak_log", "minecraft:oak_wood"]}"#,
        );
        write(
            &dir.join("tags/item/logs.json"),
            r##"{"replace": false, "values": ["#minecraft:oak_logs", {"id": "minecraft:birch_log", "required": false}, {"id": "othermod:ash_log", "required": false}]}"##,
        );
        write(
            &dir.join("tags/item/wooden/slabs.json"),
            r#"{"values": []}"#,
        );

        let registry = load_registry(&dir).unwrap();
        assert_eq!(registry.tag_count(), 3);
        assert!(registry.tag_exists("#minecraft:wooden/slabs"));
        let logs: Vec<String> = registry
            .resolve_tag("minecraft:logs")
            .into_iter()
            .map(|i| i.id)
            .collect();
        assert_eq!(
            logs,
            vec!["minecraft:oak_log", "minecraft:oak_wood", "minecraft:birch_log"]
        );
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn missing_items_file() {
        let dir = make_test_dir("missing");
        assert!(matches!(
            load_registry(&dir),
            Err(DataLoadError::MissingRequired { .. })
        ));
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn duplicate_items_are_rejected() {
        let dir = make_test_dir("dup");
        write(
            &dir.join("items.json"),
            r#"[{"id": "minecraft:stick"}, {"id": "minecraft:stick"}]"#,
        );
        match load_registry(&dir) {
            Err(e @ DataLoadError::Registry { .. }) => {
                assert!(e.to_string().contains("duplicate item: minecraft:stick"))
            }
            other => panic!("expected Registry error, got: {other:?}"),
        }
        let _ = fs::remove_dir_all(&dir);
    }

    // -----------------------------------------------------------------------
    // Version sets
    // -----------------------------------------------------------------------

    #[test]
    fn registry_set_per_version() {
        let base = make_test_dir("set");
        write(
            &base.join("1.20.4/registry/items.json"),
            r#"[{"id": "minecraft:stick"}]"#,
        );
        write(
            &base.join("1.21.4/registry/items.json"),
            r#"[{"id": "minecraft:stick"}, {"id": "minecraft:pale_oak_planks"}]"#,
        );
        write(&base.join("1.9/registry/items.json"), "[]");
        fs::create_dir_all(base.join("scratch")).unwrap();

        let versions = discover_versions(&base).unwrap();
        let names: Vec<&str> = versions.iter().map(GameVersion::as_str).collect();
        assert_eq!(names, vec!["1.9", "1.20.4", "1.21.4"]);

        let set = load_registry_set(&base, &versions).unwrap();
        let v1204 = GameVersion::new("1.20.4");
        let v1214 = GameVersion::new("1.21.4");
        assert!(!set.item_exists(&v1204, "minecraft:pale_oak_planks"));
        assert!(set.item_exists(&v1214, "minecraft:pale_oak_planks"));
        assert_eq!(set.latest().map(|(v, _)| v.as_str()), Some("1.21.4"));
        assert!(!set.item_exists(&GameVersion::new("0.1"), "minecraft:stick"));
        let _ = fs::remove_dir_all(&base);
    }
}
