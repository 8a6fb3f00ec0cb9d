//! `crafting_transmute`: recolor an item (`input`) with a `material`.
//!
//! The input usually denotes a family of variants, but it is taken as the
//! identifier it names. Only an explicit `#` makes it a tag.

use super::{SchemaError, fan_out, fields, produced};
use craftplan_core::source::{ResourceQuantity, ResourceSource, SourceType};
use serde_json::Value;

pub(crate) fn parse(doc: &Value, filename: &str) -> Result<Vec<ResourceSource>, SchemaError> {
    let slots = [fields::slot(doc, "input")?, fields::slot(doc, "material")?];
    let produced = produced(doc, filename)?;
    fan_out(
        SourceType::CraftingTransmute,
        filename,
        &slots,
        &[ResourceQuantity::ONE, ResourceQuantity::ONE],
        &produced,
    )
}
