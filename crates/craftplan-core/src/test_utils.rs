//! Shared test helpers for unit tests, integration tests and benchmarks.
//!
//! Gated behind `#[cfg(any(test, feature = "test-utils"))]`.

use crate::id::{Item, MinecraftId, Tag};
use crate::source::{ResourceQuantity, ResourceSource, SourceType};

// ===========================================================================
// Identifier constructors
// ===========================================================================

pub fn item(id: &str) -> MinecraftId {
    MinecraftId::item(id)
}

/// A tag that already carries its expansion, as the extraction driver
/// would leave it.
pub fn resolved_tag(id: &str, members: &[&str]) -> MinecraftId {
    let mut tag = Tag::new(crate::id::tag_id(id));
    tag.content = members.iter().map(|m| Item::new(*m)).collect();
    MinecraftId::Tag(tag)
}

// ===========================================================================
// Source constructors
// ===========================================================================

/// Build a source from `(id, quantity)` pairs. Ids starting with `#` become
/// unresolved tags.
pub fn make_source(
    source_type: SourceType,
    filename: &str,
    required: &[(&str, u32)],
    produced: (&str, u32),
) -> ResourceSource {
    let mut source = ResourceSource::new(source_type, filename);
    for (id, qty) in required {
        source = source.with_required(MinecraftId::parse(id), ResourceQuantity(*qty));
    }
    source.with_produced(MinecraftId::parse(produced.0), ResourceQuantity(produced.1))
}

pub fn shaped(filename: &str, required: &[(&str, u32)], produced: (&str, u32)) -> ResourceSource {
    make_source(SourceType::CraftingShaped, filename, required, produced)
}

pub fn shapeless(filename: &str, required: &[(&str, u32)], produced: (&str, u32)) -> ResourceSource {
    make_source(SourceType::CraftingShapeless, filename, required, produced)
}

pub fn smelting(filename: &str, input: &str, produced: &str) -> ResourceSource {
    make_source(SourceType::Smelting, filename, &[(input, 1)], (produced, 1))
}

// ===========================================================================
// Fixture graphs
// ===========================================================================

pub const WOOD_TYPES: [&str; 6] = ["oak", "spruce", "birch", "jungle", "acacia", "dark_oak"];

/// The six plank items, in [`WOOD_TYPES`] order.
pub fn plank_ids() -> Vec<String> {
    WOOD_TYPES
        .iter()
        .map(|w| format!("minecraft:{w}_planks"))
        .collect()
}

/// Stick and torch recipes on top of six log -> planks recipes. The stick
/// recipe requires the resolved `#minecraft:planks` tag.
pub fn wood_sources() -> Vec<ResourceSource> {
    let planks = plank_ids();
    let plank_refs: Vec<&str> = planks.iter().map(String::as_str).collect();

    let mut sources: Vec<ResourceSource> = WOOD_TYPES
        .iter()
        .map(|w| {
            let log = format!("minecraft:{w}_log");
            let planks = format!("minecraft:{w}_planks");
            shapeless(&format!("{w}_planks.json"), &[(log.as_str(), 1)], (planks.as_str(), 4))
        })
        .collect();

    sources.push(
        ResourceSource::new(SourceType::CraftingShaped, "stick.json")
            .with_required(
                resolved_tag("minecraft:planks", &plank_refs),
                ResourceQuantity(2),
            )
            .with_produced(item("minecraft:stick"), ResourceQuantity(4)),
    );
    sources.push(shaped(
        "torch.json",
        &[("minecraft:coal", 1), ("minecraft:stick", 1)],
        ("minecraft:torch", 4),
    ));
    sources.push(shaped(
        "torch_charcoal.json",
        &[("minecraft:charcoal", 1), ("minecraft:stick", 1)],
        ("minecraft:torch", 4),
    ));
    sources.push(smelting("charcoal.json", "minecraft:oak_log", "minecraft:charcoal"));
    sources
}

/// Two-way conversion between ingots and blocks, plus an ore route.
pub fn cyclic_sources() -> Vec<ResourceSource> {
    vec![
        shaped(
            "iron_block.json",
            &[("minecraft:iron_ingot", 9)],
            ("minecraft:iron_block", 1),
        ),
        shapeless(
            "iron_ingot_from_iron_block.json",
            &[("minecraft:iron_block", 1)],
            ("minecraft:iron_ingot", 9),
        ),
        smelting(
            "iron_ingot_from_smelting_raw_iron.json",
            "minecraft:raw_iron",
            "minecraft:iron_ingot",
        ),
        shaped(
            "iron_pickaxe.json",
            &[("minecraft:iron_ingot", 3), ("minecraft:stick", 2)],
            ("minecraft:iron_pickaxe", 1),
        ),
    ]
}
