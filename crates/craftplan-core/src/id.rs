use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Prefix marking a tag reference in a raw identifier (`#minecraft:logs`).
pub const TAG_PREFIX: char = '#';

/// Namespace assumed for identifiers written without one.
pub const DEFAULT_NAMESPACE: &str = "minecraft";

// ---------------------------------------------------------------------------
// Game version
// ---------------------------------------------------------------------------

/// Opaque, ordered game version key (`1.21.4`, `1.20.1`, `24w14a`).
///
/// Ordering compares `.`/`-` separated segments numerically when both sides
/// are numbers and lexically otherwise, so `1.9 < 1.10`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GameVersion(String);

impl GameVersion {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split(['.', '-'])
    }
}

impl Ord for GameVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        let mut a = self.segments();
        let mut b = other.segments();
        loop {
            match (a.next(), b.next()) {
                (None, None) => return self.0.cmp(&other.0),
                (None, Some(_)) => return Ordering::Less,
                (Some(_), None) => return Ordering::Greater,
                (Some(x), Some(y)) => {
                    let ord = match (x.parse::<u64>(), y.parse::<u64>()) {
                        (Ok(x), Ok(y)) => x.cmp(&y),
                        _ => x.cmp(y),
                    };
                    if ord != Ordering::Equal {
                        return ord;
                    }
                }
            }
        }
    }
}

impl PartialOrd for GameVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for GameVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for GameVersion {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

// ---------------------------------------------------------------------------
// Items and tags
// ---------------------------------------------------------------------------

/// A concrete item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    pub name: String,
}

impl Item {
    /// An item whose display name is derived from its identifier.
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        let name = display_name_from_id(&id);
        Self { id, name }
    }

    pub fn named(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// A named set of items. `content` is empty until the tag is resolved
/// against one version's registry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tag {
    /// Raw identifier, including the leading `#`.
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub content: Vec<Item>,
}

impl Tag {
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        let name = display_name_from_id(&id);
        Self {
            id,
            name,
            content: Vec::new(),
        }
    }
}

/// An identifier appearing in a recipe: either a concrete item or a tag.
///
/// Equality, ordering and hashing only look at the raw identifier string, so
/// a resolved tag compares equal to the bare reference it was built from.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MinecraftId {
    Item(Item),
    Tag(Tag),
}

impl MinecraftId {
    /// Parse a raw identifier. A leading `#` makes it a tag.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.starts_with(TAG_PREFIX) {
            MinecraftId::Tag(Tag::new(raw))
        } else {
            MinecraftId::Item(Item::new(raw))
        }
    }

    pub fn item(id: impl Into<String>) -> Self {
        MinecraftId::Item(Item::new(id))
    }

    pub fn tag(id: &str) -> Self {
        MinecraftId::Tag(Tag::new(tag_id(id)))
    }

    pub fn id(&self) -> &str {
        match self {
            MinecraftId::Item(item) => &item.id,
            MinecraftId::Tag(tag) => &tag.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            MinecraftId::Item(item) => &item.name,
            MinecraftId::Tag(tag) => &tag.name,
        }
    }

    pub fn is_tag(&self) -> bool {
        matches!(self, MinecraftId::Tag(_))
    }

    /// Concrete item identifiers this id stands for: itself for an item, the
    /// resolved content for a tag (empty if unresolved).
    pub fn item_ids(&self) -> Vec<&str> {
        match self {
            MinecraftId::Item(item) => vec![item.id.as_str()],
            MinecraftId::Tag(tag) => tag.content.iter().map(|i| i.id.as_str()).collect(),
        }
    }
}

impl PartialEq for MinecraftId {
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

impl Eq for MinecraftId {}

impl Hash for MinecraftId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id().hash(state);
    }
}

impl Ord for MinecraftId {
    fn cmp(&self, other: &Self) -> Ordering {
        self.id().cmp(other.id())
    }
}

impl PartialOrd for MinecraftId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for MinecraftId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

// ---------------------------------------------------------------------------
// Identifier helpers
// ---------------------------------------------------------------------------

/// Add the default namespace to a bare path (`stick` -> `minecraft:stick`).
/// Tag prefixes are preserved.
pub fn qualify(raw: &str) -> String {
    let raw = raw.trim();
    let (prefix, body) = match raw.strip_prefix(TAG_PREFIX) {
        Some(body) => ("#", body),
        None => ("", raw),
    };
    if body.contains(':') {
        format!("{prefix}{body}")
    } else {
        format!("{prefix}{DEFAULT_NAMESPACE}:{body}")
    }
}

/// Normalize a tag identifier so it carries exactly one leading `#` and a
/// namespace.
pub fn tag_id(raw: &str) -> String {
    let body = raw.trim().trim_start_matches(TAG_PREFIX);
    qualify(&format!("#{body}"))
}

/// Human-readable name derived from an identifier:
/// `minecraft:oak_planks` -> `Oak Planks`, `#minecraft:wooden/slabs` -> `Slabs`.
pub fn display_name_from_id(id: &str) -> String {
    let body = id.trim_start_matches(TAG_PREFIX);
    let path = body.rsplit_once(':').map_or(body, |(_, path)| path);
    let last = path.rsplit('/').next().unwrap_or(path);
    last.split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
