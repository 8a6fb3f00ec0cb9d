//! Single-ingredient recipes: smelting, blasting, smoking, campfire cooking
//! and stonecutting.

use super::{SchemaError, fan_out, fields, produced};
use craftplan_core::source::{ResourceQuantity, ResourceSource, SourceType};
use serde_json::Value;

/// An `ingredient` array lists interchangeable inputs; each becomes its own
/// source.
pub(crate) fn parse(
    doc: &Value,
    filename: &str,
    source_type: SourceType,
) -> Result<Vec<ResourceSource>, SchemaError> {
    let slots = [fields::slot(doc, "ingredient")?];
    let produced = produced(doc, filename)?;
    fan_out(source_type, filename, &slots, &[ResourceQuantity::ONE], &produced)
}
