//! `smithing_transform`: template + base + addition -> result.

use super::{SchemaError, fan_out, fields, produced};
use craftplan_core::source::{ResourceQuantity, ResourceSource, SourceType};
use serde_json::Value;

pub(crate) fn parse(doc: &Value, filename: &str) -> Result<Vec<ResourceSource>, SchemaError> {
    let mut slots = Vec::with_capacity(3);
    // Legacy smithing documents have no template.
    if doc.get("template").is_some() {
        slots.push(fields::slot(doc, "template")?);
    }
    slots.push(fields::slot(doc, "base")?);
    slots.push(fields::slot(doc, "addition")?);

    let quantities = vec![ResourceQuantity::ONE; slots.len()];
    let produced = produced(doc, filename)?;
    fan_out(SourceType::SmithingTransform, filename, &slots, &quantities, &produced)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn required(source: &ResourceSource) -> Vec<&str> {
        source.required.iter().map(|(id, _)| id.id()).collect()
    }

    #[test]
    fn netherite_upgrade() {
        let doc = json!({
            "type": "minecraft:smithing_transform",
            "template": "minecraft:netherite_upgrade_smithing_template",
            "base": "minecraft:diamond_pickaxe",
            "addition": "#minecraft:netherite_tool_materials",
            "result": {"id": "minecraft:netherite_pickaxe"}
        });
        let out = parse(&doc, "netherite_pickaxe_smithing.json").unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(
            required(&out[0]),
            vec![
                "minecraft:netherite_upgrade_smithing_template",
                "minecraft:diamond_pickaxe",
                "#minecraft:netherite_tool_materials",
            ]
        );
        assert!(out[0].required.iter().all(|(_, q)| *q == ResourceQuantity::ONE));
    }

    #[test]
    fn legacy_object_inputs() {
        let doc = json!({
            "type": "minecraft:smithing",
            "base": {"item": "minecraft:diamond_sword"},
            "addition": {"key": "minecraft:netherite_ingot"},
            "result": {"item": "minecraft:netherite_sword"}
        });
        let out = parse(&doc, "netherite_sword.json").unwrap();
        assert_eq!(
            required(&out[0]),
            vec!["minecraft:diamond_sword", "minecraft:netherite_ingot"]
        );
        assert_eq!(out[0].produced[0].0.id(), "minecraft:netherite_sword");
    }

    #[test]
    fn missing_addition() {
        let doc = json!({"base": "minecraft:a", "result": "minecraft:b"});
        assert_eq!(
            parse(&doc, "f").unwrap_err(),
            SchemaError::MissingField("addition".into())
        );
    }
}
