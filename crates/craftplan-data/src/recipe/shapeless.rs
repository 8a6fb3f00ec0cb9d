//! `crafting_shapeless`: an unordered ingredient list.

use super::{SchemaError, fan_out, fields, produced};
use craftplan_core::source::{ResourceQuantity, ResourceSource, SourceType};
use serde_json::Value;

/// Per-slot alternatives for the `ingredients` list.
pub(crate) fn ingredient_slots(doc: &Value) -> Result<Vec<Vec<String>>, SchemaError> {
    let entries = doc
        .get("ingredients")
        .ok_or_else(|| SchemaError::MissingField("ingredients".into()))?
        .as_array()
        .ok_or_else(|| SchemaError::UnexpectedShape("ingredients".into()))?;
    if entries.is_empty() {
        return Err(SchemaError::UnexpectedShape("ingredients".into()));
    }

    entries
        .iter()
        .map(|entry| {
            let alternatives = fields::ingredient_alternatives(entry);
            if alternatives.is_empty() {
                Err(SchemaError::UnexpectedShape("ingredients".into()))
            } else {
                Ok(alternatives)
            }
        })
        .collect()
}

pub(crate) fn parse(doc: &Value, filename: &str) -> Result<Vec<ResourceSource>, SchemaError> {
    let slots = ingredient_slots(doc)?;
    let quantities = vec![ResourceQuantity::ONE; slots.len()];
    let produced = produced(doc, filename)?;
    fan_out(SourceType::CraftingShapeless, filename, &slots, &quantities, &produced)
}
