//! Property-based tests for the recipe normalizers.
//!
//! Generates random shaped grids and shapeless slot lists, then checks the
//! quantity and fan-out laws the parsers must satisfy.

use craftplan_data::recipe::try_parse_document;
use proptest::prelude::*;
use serde_json::{Value, json};

// ===========================================================================
// Generators
// ===========================================================================

const SYMBOLS: [char; 5] = ['A', 'B', 'C', '#', 'X'];

/// A 1-3 row pattern of up to 3 columns drawn from a few symbols and spaces,
/// with at least one symbol.
fn arb_pattern() -> impl Strategy<Value = Vec<String>> {
    let cell = prop_oneof![Just(' '), proptest::sample::select(SYMBOLS.to_vec())];
    let row = proptest::collection::vec(cell, 1..=3).prop_map(|c| c.into_iter().collect::<String>());
    proptest::collection::vec(row, 1..=3)
        .prop_filter("pattern needs a symbol", |rows| {
            rows.iter().any(|r| r.chars().any(|c| c != ' '))
        })
}

fn shaped_doc(pattern: &[String], shared_item: bool) -> Value {
    let key: serde_json::Map<String, Value> = SYMBOLS
        .iter()
        .map(|s| {
            let item = if shared_item {
                "minecraft:stick".to_string()
            } else {
                format!("minecraft:item_{}", *s as u32)
            };
            (s.to_string(), Value::String(item))
        })
        .collect();
    json!({
        "type": "minecraft:crafting_shaped",
        "pattern": pattern,
        "key": key,
        "result": {"id": "minecraft:out", "count": 1}
    })
}

/// Shapeless slot sizes, each slot 1-3 alternatives.
fn arb_slot_sizes() -> impl Strategy<Value = Vec<usize>> {
    proptest::collection::vec(1usize..=3, 1..=5)
}

fn shapeless_doc(sizes: &[usize]) -> Value {
    let ingredients: Vec<Value> = sizes
        .iter()
        .enumerate()
        .map(|(slot, &n)| {
            let alternatives: Vec<Value> = (0..n)
                .map(|alt| json!({"item": format!("minecraft:slot{slot}_alt{alt}")}))
                .collect();
            Value::Array(alternatives)
        })
        .collect();
    json!({
        "type": "minecraft:crafting_shapeless",
        "ingredients": ingredients,
        "result": "minecraft:out"
    })
}

// ===========================================================================
// Properties
// ===========================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    /// Required quantities sum to the number of filled grid cells.
    #[test]
    fn shaped_quantities_match_filled_cells(pattern in arb_pattern(), shared in any::<bool>()) {
        let filled = pattern.iter().flat_map(|r| r.chars()).filter(|c| *c != ' ').count() as u64;
        let text = shaped_doc(&pattern, shared).to_string();
        let sources = try_parse_document(&text, "shaped.json").unwrap();
        prop_assert_eq!(sources.len(), 1);
        prop_assert_eq!(sources[0].required_units(), filled);
    }

    /// One source per combination, each picking one alternative per slot.
    #[test]
    fn shapeless_emits_the_cross_product(sizes in arb_slot_sizes()) {
        let expected: usize = sizes.iter().product();
        let text = shapeless_doc(&sizes).to_string();
        let sources = try_parse_document(&text, "shapeless.json").unwrap();
        prop_assert_eq!(sources.len(), expected);

        for source in &sources {
            prop_assert_eq!(source.required.len(), sizes.len());
            for (slot, (id, qty)) in source.required.iter().enumerate() {
                let prefix = format!("minecraft:slot{slot}_");
                prop_assert!(id.id().starts_with(&prefix));
                prop_assert_eq!(qty.count(), 1);
            }
        }

        let mut combos: Vec<Vec<&str>> = sources
            .iter()
            .map(|s| s.required.iter().map(|(id, _)| id.id()).collect())
            .collect();
        combos.sort();
        combos.dedup();
        prop_assert_eq!(combos.len(), expected);
    }
}
