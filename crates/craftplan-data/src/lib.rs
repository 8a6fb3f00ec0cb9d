//! Craftplan Data -- loading game data and normalizing recipes.
//!
//! Reads a per-version item registry (`items`, `tags`, vanilla tag trees)
//! and a directory of recipe JSON documents, and turns every document into
//! zero or more [`craftplan_core::source::ResourceSource`] records.
//!
//! Data files use whichever of RON, TOML or JSON is present; see
//! [`loader`]. Recipe documents are always JSON.
//!
//! Enable the `parallel` feature to normalize documents on a rayon pool.

pub mod config;
pub mod driver;
pub mod loader;
pub mod recipe;
pub mod registry_loader;
pub mod schema;

pub use config::{PlannerConfig, load_config};
pub use driver::{
    DatapackLayout, ExtractionSummary, RecipeDocument, RecipePathResolver, extract,
    extract_documents, extract_with_summary, retain_indexable,
};
pub use loader::DataLoadError;
pub use recipe::{SchemaError, parse_document};
pub use registry_loader::{discover_versions, load_registry, load_registry_set};
