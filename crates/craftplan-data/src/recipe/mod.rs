//! Recipe document normalizers.
//!
//! Every recipe family reads a JSON document and returns the list of
//! [`ResourceSource`] records it describes. A document can fan out into
//! several records when its ingredient slots accept alternatives.
//!
//! Parsers never abort a batch. [`parse_document`] turns every
//! [`SchemaError`] into a single `Unknown` sentinel and logs a warning;
//! [`try_parse_document`] exposes the error for callers that want it.

pub mod fields;
mod shaped;
mod shapeless;
mod simple;
mod smithing;
mod transmute;

use craftplan_core::id::{DEFAULT_NAMESPACE, MinecraftId};
use craftplan_core::source::{ResourceQuantity, ResourceSource, SourceType};
use serde_json::Value;

// ===========================================================================
// Errors
// ===========================================================================

/// Why a single recipe document could not be normalized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    #[error("missing field '{0}'")]
    MissingField(String),

    #[error("unexpected shape for field '{0}'")]
    UnexpectedShape(String),

    #[error("invalid JSON: {0}")]
    JsonSyntax(String),

    #[error("{0} ingredient combinations exceed the limit of {max}", max = fields::MAX_COMBINATIONS)]
    TooManyCombinations(usize),
}

// ===========================================================================
// Family dispatch
// ===========================================================================

/// The closed set of recipe families, keyed off the declared `type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecipeFamily {
    Shaped,
    Shapeless,
    /// Single ingredient to single result (furnaces, campfire, stonecutter).
    Simple(SourceType),
    SmithingTransform,
    Transmute,
    /// Decorative or hard-coded recipes that never feed the graph.
    Cosmetic,
    Unrecognized,
}

impl RecipeFamily {
    /// Classify a declared recipe type. Only the default namespace is
    /// stripped; modded namespaces are unrecognized.
    pub fn from_type(raw: &str) -> Self {
        let raw = raw.trim();
        let name = match raw.split_once(':') {
            Some((namespace, name)) if namespace == DEFAULT_NAMESPACE => name,
            Some(_) => return RecipeFamily::Unrecognized,
            None => raw,
        };

        if name.contains("special") || name == "smithing_trim" || name == "crafting_decorated_pot" {
            return RecipeFamily::Cosmetic;
        }

        match name {
            "crafting_shaped" => RecipeFamily::Shaped,
            "crafting_shapeless" => RecipeFamily::Shapeless,
            "smelting" => RecipeFamily::Simple(SourceType::Smelting),
            "blasting" => RecipeFamily::Simple(SourceType::Blasting),
            "smoking" => RecipeFamily::Simple(SourceType::Smoking),
            "campfire_cooking" => RecipeFamily::Simple(SourceType::CampfireCooking),
            "stonecutting" => RecipeFamily::Simple(SourceType::Stonecutting),
            // Pre-1.20 smithing tables had no template slot.
            "smithing_transform" | "smithing" => RecipeFamily::SmithingTransform,
            "crafting_transmute" => RecipeFamily::Transmute,
            _ => RecipeFamily::Unrecognized,
        }
    }
}

// ===========================================================================
// Entry points
// ===========================================================================

/// Normalize an already-parsed document.
///
/// Unknown types and a missing `type` field produce an `Unknown` sentinel
/// rather than an error; cosmetic types produce an `Ignored` sentinel.
pub fn parse_value(doc: &Value, filename: &str) -> Result<Vec<ResourceSource>, SchemaError> {
    let Some(declared) = doc.get("type").and_then(Value::as_str) else {
        tracing::warn!(file = filename, "recipe has no type field");
        return Ok(vec![ResourceSource::unknown(filename)]);
    };

    let family = RecipeFamily::from_type(declared);
    tracing::debug!(file = filename, recipe_type = declared, ?family, "dispatching recipe");

    match family {
        RecipeFamily::Shaped => shaped::parse(doc, filename),
        RecipeFamily::Shapeless => shapeless::parse(doc, filename),
        RecipeFamily::Simple(source_type) => simple::parse(doc, filename, source_type),
        RecipeFamily::SmithingTransform => smithing::parse(doc, filename),
        RecipeFamily::Transmute => transmute::parse(doc, filename),
        RecipeFamily::Cosmetic => {
            tracing::debug!(file = filename, recipe_type = declared, "ignoring cosmetic recipe");
            Ok(vec![ResourceSource::ignored(filename)])
        }
        RecipeFamily::Unrecognized => {
            tracing::warn!(file = filename, recipe_type = declared, "unknown recipe type");
            Ok(vec![ResourceSource::unknown(filename)])
        }
    }
}

/// Parse and normalize a document, surfacing schema errors.
pub fn try_parse_document(text: &str, filename: &str) -> Result<Vec<ResourceSource>, SchemaError> {
    let doc: Value =
        serde_json::from_str(text).map_err(|e| SchemaError::JsonSyntax(e.to_string()))?;
    parse_value(&doc, filename)
}

/// Parse and normalize a document. A malformed document yields a single
/// `Unknown` sentinel.
pub fn parse_document(text: &str, filename: &str) -> Vec<ResourceSource> {
    try_parse_document(text, filename).unwrap_or_else(|error| {
        tracing::warn!(file = filename, %error, "skipping malformed recipe");
        vec![ResourceSource::unknown(filename)]
    })
}

// ===========================================================================
// Shared construction
// ===========================================================================

/// One source per combination of slot alternatives. `quantities[i]` is the
/// amount required of whatever fills slot `i`.
fn fan_out(
    source_type: SourceType,
    filename: &str,
    slots: &[Vec<String>],
    quantities: &[ResourceQuantity],
    produced: &(MinecraftId, ResourceQuantity),
) -> Result<Vec<ResourceSource>, SchemaError> {
    debug_assert_eq!(slots.len(), quantities.len());
    let combinations = fields::cross_product(slots)?;
    Ok(combinations
        .into_iter()
        .map(|choice| {
            choice
                .into_iter()
                .zip(quantities)
                .fold(ResourceSource::new(source_type, filename), |source, (id, qty)| {
                    source.with_required(MinecraftId::parse(id), *qty)
                })
                .with_produced(produced.0.clone(), produced.1)
        })
        .collect())
}

/// The produced `(id, count)` pair shared by every family.
fn produced(doc: &Value, filename: &str) -> Result<(MinecraftId, ResourceQuantity), SchemaError> {
    let id = fields::result_identifier(doc)?;
    Ok((id, fields::result_count(doc, filename)))
}
