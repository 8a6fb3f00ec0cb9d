//! Craftplan Core -- the canonical resource-production model.
//!
//! Every recipe family a game ships (crafting grids, furnaces, stonecutters,
//! smithing tables) is normalized into one record shape, [`source::ResourceSource`]:
//! what goes in, what comes out, and which file it came from. The planner
//! crates build on top of this model.
//!
//! # Key Types
//!
//! - [`id::MinecraftId`] -- An item or a tag. Identity is the raw identifier
//!   string; tags carry their concrete expansion once resolved.
//! - [`id::GameVersion`] -- Opaque ordered key selecting the active item universe.
//! - [`source::ResourceSource`] -- One recipe instance with required and
//!   produced `(MinecraftId, ResourceQuantity)` lists.
//! - [`registry::Registry`] -- Immutable per-version item/tag registry, built
//!   through [`registry::RegistryBuilder`].
//! - [`registry::RegistrySet`] -- Registries for every known version.

pub mod id;
pub mod registry;
pub mod source;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
