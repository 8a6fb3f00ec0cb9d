//! `crafting_shaped`: a grid pattern of symbols plus a symbol key.

use super::{SchemaError, fan_out, fields, produced};
use craftplan_core::source::{ResourceQuantity, ResourceSource, SourceType};
use serde_json::Value;

/// Symbols in order of first appearance, with their occurrence counts.
/// Spaces are empty grid cells.
pub(crate) fn symbol_counts(doc: &Value) -> Result<Vec<(char, u32)>, SchemaError> {
    let rows = doc
        .get("pattern")
        .ok_or_else(|| SchemaError::MissingField("pattern".into()))?
        .as_array()
        .ok_or_else(|| SchemaError::UnexpectedShape("pattern".into()))?;

    let mut counts: Vec<(char, u32)> = Vec::new();
    for row in rows {
        let row = row
            .as_str()
            .ok_or_else(|| SchemaError::UnexpectedShape("pattern".into()))?;
        for symbol in row.chars().filter(|c| *c != ' ') {
            match counts.iter_mut().find(|(s, _)| *s == symbol) {
                Some((_, n)) => *n += 1,
                None => counts.push((symbol, 1)),
            }
        }
    }

    if counts.is_empty() {
        return Err(SchemaError::UnexpectedShape("pattern".into()));
    }
    Ok(counts)
}

pub(crate) fn parse(doc: &Value, filename: &str) -> Result<Vec<ResourceSource>, SchemaError> {
    let counts = symbol_counts(doc)?;
    let key = doc
        .get("key")
        .ok_or_else(|| SchemaError::MissingField("key".into()))?
        .as_object()
        .ok_or_else(|| SchemaError::UnexpectedShape("key".into()))?;

    let mut slots = Vec::with_capacity(counts.len());
    let mut quantities = Vec::with_capacity(counts.len());
    for (symbol, count) in &counts {
        let field = format!("key.{symbol}");
        let entry = key
            .get(symbol.to_string().as_str())
            .ok_or_else(|| SchemaError::MissingField(field.clone()))?;
        let alternatives = fields::ingredient_alternatives(entry);
        if alternatives.is_empty() {
            return Err(SchemaError::UnexpectedShape(field));
        }
        slots.push(alternatives);
        quantities.push(ResourceQuantity(*count));
    }

    let produced = produced(doc, filename)?;
    fan_out(SourceType::CraftingShaped, filename, &slots, &quantities, &produced)
}
