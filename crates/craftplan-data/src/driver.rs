//! Recipe extraction: read a version's recipe documents, normalize them and
//! attach registry data.
//!
//! [`extract_documents`] is the I/O-free core. [`extract`] wraps it with
//! directory resolution, document enumeration and the sentinel filter.

use crate::loader::DataLoadError;
use crate::recipe::parse_document;
use craftplan_core::id::{DEFAULT_NAMESPACE, GameVersion, MinecraftId};
use craftplan_core::registry::Registry;
use craftplan_core::source::{ResourceSource, SourceType};
use std::path::{Path, PathBuf};

// ===========================================================================
// Path resolution
// ===========================================================================

/// Maps a game version to the directory holding its recipe documents.
pub trait RecipePathResolver {
    fn recipe_dir(&self, version: &GameVersion, base: &Path) -> PathBuf;
}

/// Vanilla data pack layout: `<base>/<version>/data/minecraft/recipe`, or
/// `recipes` for versions before 1.21.
#[derive(Debug, Clone, Default)]
pub struct DatapackLayout {
    /// Recipe directory relative to `<base>/<version>`, replacing the data
    /// pack lookup.
    pub override_dir: Option<PathBuf>,
}

impl DatapackLayout {
    pub fn with_override(dir: impl Into<PathBuf>) -> Self {
        Self {
            override_dir: Some(dir.into()),
        }
    }
}

impl RecipePathResolver for DatapackLayout {
    fn recipe_dir(&self, version: &GameVersion, base: &Path) -> PathBuf {
        let version_dir = base.join(version.as_str());
        if let Some(dir) = &self.override_dir {
            return version_dir.join(dir);
        }
        let data = version_dir.join("data").join(DEFAULT_NAMESPACE);
        let current = data.join("recipe");
        let legacy = data.join("recipes");
        if !current.is_dir() && legacy.is_dir() {
            legacy
        } else {
            current
        }
    }
}

// ===========================================================================
// Documents
// ===========================================================================

/// One recipe document read from disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeDocument {
    /// Path relative to the recipe directory, `/`-separated.
    pub filename: String,
    pub text: String,
}

impl RecipeDocument {
    pub fn new(filename: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            text: text.into(),
        }
    }
}

/// Read every `.json` document under `dir`, recursively, sorted by path. A
/// document that is not UTF-8 is kept with empty text.
pub fn read_documents(dir: &Path) -> Result<Vec<RecipeDocument>, DataLoadError> {
    let mut documents = Vec::new();
    for entry in walkdir::WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.map_err(std::io::Error::from)?;
        let path = entry.path();
        if !entry.file_type().is_file() || path.extension().and_then(|e| e.to_str()) != Some("json")
        {
            continue;
        }
        let relative = path.strip_prefix(dir).unwrap_or(path);
        let filename = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        let text = match String::from_utf8(std::fs::read(path)?) {
            Ok(text) => text,
            Err(error) => {
                // Empty text parses as a syntax error, so the file still
                // yields an `Unknown` source.
                tracing::warn!(file = %filename, %error, "recipe is not UTF-8");
                String::new()
            }
        };
        documents.push(RecipeDocument { filename, text });
    }
    Ok(documents)
}

// ===========================================================================
// Extraction
// ===========================================================================

/// Counts describing one extraction run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractionSummary {
    pub documents: usize,
    /// Sources emitted by the parsers, sentinels included.
    pub emitted: usize,
    /// Sources that survived [`retain_indexable`].
    pub kept: usize,
    pub unknown: usize,
    pub ignored: usize,
    /// Non-sentinel sources without a produced item.
    pub empty_output: usize,
}

impl ExtractionSummary {
    pub fn tally(documents: usize, sources: &[ResourceSource]) -> Self {
        let mut summary = Self {
            documents,
            emitted: sources.len(),
            ..Self::default()
        };
        for source in sources {
            match source.source_type {
                SourceType::Unknown => summary.unknown += 1,
                SourceType::Ignored => summary.ignored += 1,
                _ if source.produced.is_empty() => summary.empty_output += 1,
                _ => summary.kept += 1,
            }
        }
        summary
    }
}

/// Rewrite every identifier of a parsed source against one version's
/// registry and merge repeated requirements.
pub fn attach_registry(registry: &Registry, source: ResourceSource) -> ResourceSource {
    let filename = source.filename.clone();
    let mut source = source.map_ids(|id| {
        let resolved = registry.resolve(id);
        if let MinecraftId::Tag(tag) = &resolved {
            if tag.content.is_empty() {
                tracing::warn!(file = %filename, tag = %tag.id, "tag resolves to no items");
            }
        }
        resolved
    });
    source.consolidate_required();
    source
}

/// Normalize a batch of documents against `registry`. Sentinels are kept;
/// see [`retain_indexable`].
pub fn extract_documents(registry: &Registry, documents: &[RecipeDocument]) -> Vec<ResourceSource> {
    let parsed = parse_all(documents);
    parsed
        .into_iter()
        .map(|source| attach_registry(registry, source))
        .collect()
}

#[cfg(feature = "parallel")]
fn parse_all(documents: &[RecipeDocument]) -> Vec<ResourceSource> {
    use rayon::prelude::*;
    documents
        .par_iter()
        .flat_map_iter(|doc| parse_document(&doc.text, &doc.filename))
        .collect()
}

#[cfg(not(feature = "parallel"))]
fn parse_all(documents: &[RecipeDocument]) -> Vec<ResourceSource> {
    documents
        .iter()
        .flat_map(|doc| parse_document(&doc.text, &doc.filename))
        .collect()
}

/// Drop sentinels and sources that produce nothing.
pub fn retain_indexable(mut sources: Vec<ResourceSource>) -> Vec<ResourceSource> {
    sources.retain(ResourceSource::is_indexable);
    sources
}

/// Extract the indexable sources for `version`, with run counts.
pub fn extract_with_summary(
    registry: &Registry,
    version: &GameVersion,
    base: &Path,
    resolver: &dyn RecipePathResolver,
) -> Result<(Vec<ResourceSource>, ExtractionSummary), DataLoadError> {
    let dir = resolver.recipe_dir(version, base);
    if !dir.is_dir() {
        return Err(DataLoadError::MissingRecipeDir {
            version: version.to_string(),
            dir,
        });
    }

    let documents = read_documents(&dir)?;
    let sources = extract_documents(registry, &documents);
    let summary = ExtractionSummary::tally(documents.len(), &sources);
    tracing::info!(
        version = %version,
        documents = summary.documents,
        emitted = summary.emitted,
        kept = summary.kept,
        unknown = summary.unknown,
        ignored = summary.ignored,
        empty_output = summary.empty_output,
        "extracted recipes"
    );
    Ok((retain_indexable(sources), summary))
}

/// Extract the indexable sources for `version` from `base`.
pub fn extract(
    registry: &Registry,
    version: &GameVersion,
    base: &Path,
    resolver: &dyn RecipePathResolver,
) -> Result<Vec<ResourceSource>, DataLoadError> {
    extract_with_summary(registry, version, base, resolver).map(|(sources, _)| sources)
}
