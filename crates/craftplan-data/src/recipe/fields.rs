//! Field extraction shared by every recipe family.
//!
//! Recipe documents spell the same thing several ways depending on the game
//! version that wrote them. Each lookup is an ordered list of named
//! extractors; the first one that yields a value wins.

use super::SchemaError;
use craftplan_core::id::{qualify, tag_id, MinecraftId, TAG_PREFIX};
use craftplan_core::source::ResourceQuantity;
use serde_json::Value;

/// A named, fallible field lookup.
pub type Extractor = fn(&Value) -> Option<&str>;

/// Upper bound on the ingredient combinations one document may fan out to.
pub const MAX_COMBINATIONS: usize = 4096;

fn str_at<'a>(doc: &'a Value, path: &[&str]) -> Option<&'a str> {
    path.iter()
        .try_fold(doc, |value, key| value.get(key))?
        .as_str()
        .filter(|s| !s.trim().is_empty())
}

/// Return the first `(extractor name, value)` pair that matches.
pub fn first_match<'a>(
    doc: &'a Value,
    extractors: &[(&'static str, Extractor)],
) -> Option<(&'static str, &'a str)> {
    extractors
        .iter()
        .find_map(|(name, extract)| extract(doc).map(|value| (*name, value)))
}

// ===========================================================================
// Result identifier
// ===========================================================================

fn result_bare(doc: &Value) -> Option<&str> {
    str_at(doc, &["result"])
}

fn result_id(doc: &Value) -> Option<&str> {
    str_at(doc, &["result", "id"])
}

fn result_item(doc: &Value) -> Option<&str> {
    str_at(doc, &["result", "item"])
}

fn result_value(doc: &Value) -> Option<&str> {
    str_at(doc, &["result", "value"])
}

fn result_key(doc: &Value) -> Option<&str> {
    str_at(doc, &["result", "key"])
}

fn result_value_id(doc: &Value) -> Option<&str> {
    str_at(doc, &["result", "value", "id"])
}

fn top_level_id(doc: &Value) -> Option<&str> {
    str_at(doc, &["id"])
}

/// Result identifier shapes, in priority order.
pub const RESULT_EXTRACTORS: &[(&str, Extractor)] = &[
    ("result", result_bare),
    ("result.id", result_id),
    ("result.item", result_item),
    ("result.value", result_value),
    ("result.key", result_key),
    ("result.value.id", result_value_id),
    ("id", top_level_id),
];

/// Extract the produced item identifier.
pub fn result_identifier(doc: &Value) -> Result<MinecraftId, SchemaError> {
    match first_match(doc, RESULT_EXTRACTORS) {
        Some((_, id)) => Ok(MinecraftId::item(qualify(id))),
        None if doc.get("result").is_some() => Err(SchemaError::UnexpectedShape("result".into())),
        None => Err(SchemaError::MissingField("result".into())),
    }
}

/// Produced quantity: `result.count`, then a top-level `count`, else 1.
pub fn result_count(doc: &Value, filename: &str) -> ResourceQuantity {
    let declared = doc
        .get("result")
        .and_then(|r| r.get("count"))
        .or_else(|| doc.get("count"))
        .and_then(|c| c.as_i64().or_else(|| c.as_f64().map(|f| f as i64)));
    match declared {
        Some(count) => ResourceQuantity::produced(count, filename),
        None => ResourceQuantity::ONE,
    }
}

// ===========================================================================
// Ingredients
// ===========================================================================

fn ingredient_item(value: &Value) -> Option<&str> {
    str_at(value, &["item"])
}

fn ingredient_tag(value: &Value) -> Option<&str> {
    str_at(value, &["tag"])
}

fn ingredient_key(value: &Value) -> Option<&str> {
    str_at(value, &["key"])
}

fn ingredient_value(value: &Value) -> Option<&str> {
    str_at(value, &["value"])
}

/// Object-form ingredient fields, in priority order.
pub const INGREDIENT_EXTRACTORS: &[(&str, Extractor)] = &[
    ("item", ingredient_item),
    ("tag", ingredient_tag),
    ("key", ingredient_key),
    ("value", ingredient_value),
];

fn normalize_id(raw: &str) -> String {
    if raw.trim_start().starts_with(TAG_PREFIX) {
        tag_id(raw)
    } else {
        qualify(raw)
    }
}

/// Every identifier that satisfies one ingredient slot, deduplicated in
/// first-seen order. Tags keep their `#` prefix. Unusable entries inside an
/// array are skipped.
pub fn ingredient_alternatives(value: &Value) -> Vec<String> {
    let mut out = Vec::new();
    collect_alternatives(value, &mut out);
    out
}

fn collect_alternatives(value: &Value, out: &mut Vec<String>) {
    let mut push = |id: String| {
        if !out.contains(&id) {
            out.push(id);
        }
    };
    match value {
        Value::String(raw) if !raw.trim().is_empty() => push(normalize_id(raw)),
        Value::Object(_) => match first_match(value, INGREDIENT_EXTRACTORS) {
            Some(("tag", raw)) => push(tag_id(raw)),
            Some((_, raw)) => push(normalize_id(raw)),
            None => {}
        },
        Value::Array(entries) => {
            for entry in entries {
                collect_alternatives(entry, out);
            }
        }
        _ => {}
    }
}

/// Alternatives for a named slot field. Missing or empty slots are errors.
pub fn slot(doc: &Value, field: &str) -> Result<Vec<String>, SchemaError> {
    let value = doc
        .get(field)
        .ok_or_else(|| SchemaError::MissingField(field.to_string()))?;
    let alternatives = ingredient_alternatives(value);
    if alternatives.is_empty() {
        return Err(SchemaError::UnexpectedShape(field.to_string()));
    }
    Ok(alternatives)
}

// ===========================================================================
// Fan-out
// ===========================================================================

/// Every way of picking one alternative per slot, in slot order.
pub fn cross_product(slots: &[Vec<String>]) -> Result<Vec<Vec<&str>>, SchemaError> {
    let total = slots
        .iter()
        .try_fold(1usize, |acc, slot| acc.checked_mul(slot.len()))
        .unwrap_or(usize::MAX);
    if total > MAX_COMBINATIONS {
        return Err(SchemaError::TooManyCombinations(total));
    }

    let mut combinations: Vec<Vec<&str>> = vec![Vec::with_capacity(slots.len())];
    for slot in slots {
        combinations = combinations
            .into_iter()
            .flat_map(|prefix| {
                slot.iter().map(move |choice| {
                    let mut next = prefix.clone();
                    next.push(choice.as_str());
                    next
                })
            })
            .collect();
    }
    Ok(combinations)
}
