//! Core domain types for shoal.
//!
//! This module contains the fundamental types used throughout the engine:
//! - `Cell`, `Pixel`, `Point` - grid, world and screen coordinates
//! - `Direction` - the canonical neighbor direction table
//! - `Item`, `Catalog` - placeable things and their names
//! - `Tile` - the facet bundle stored per occupied cell
//! - `VariantTable` - registered land variants

mod cell;
mod direction;
mod item;
mod tile;
mod variant;

pub use cell::{cell_at, Cell, Pixel, Point, TILE_SIZE};
pub use direction::{variant_key, Direction};
pub use item::{
    Catalog, CatalogEntry, Item, ItemId, ItemKind, ObjectEntry, ObjectLayer, COIN_TYPES,
    ENEMY_TYPES, PALM_TYPES,
};
pub use tile::Tile;
pub use variant::{VariantTable, FALLBACK_KEY};
