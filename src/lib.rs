//! shoal - sparse tile-grid engine for a 2D platformer level editor
//!
//! Stores placed terrain and items per grid cell, keeps each tile's
//! neighbor context up to date for autotiling, and reads and writes the
//! eight-layer level files the game runtime consumes.

pub mod canvas;
pub mod cli;
pub mod config;
pub mod document;
pub mod error;
pub mod grid;
pub mod output;
pub mod parser;
pub mod store;
pub mod types;
pub mod validation;

pub use canvas::{Canvas, EntityId, EntityKind, PlacedObject, Placement};
pub use config::{CatalogConfig, Config};
pub use document::{LevelDocument, ObjectRef, Spawn, WaterSurface};
pub use error::{LevelError, Result};
pub use grid::GridStore;
pub use parser::parse_level;
pub use store::LevelStore;
pub use types::{
    Catalog, Cell, Direction, Item, ItemId, ItemKind, ObjectEntry, ObjectLayer, Pixel, Point,
    Tile, VariantTable,
};
pub use validation::{validate_level, Diagnostic, Severity, ValidationResult};
