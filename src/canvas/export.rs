//! Flattening the canvas into a level document.

use tracing::{debug, info, warn};

use crate::document::{LevelDocument, ObjectRef, WaterSurface};
use crate::error::{LevelError, Result};
use crate::grid::recompute;
use crate::types::{Catalog, Cell, Item, ObjectEntry, ObjectLayer, Pixel, VariantTable, FALLBACK_KEY};

use super::{Canvas, EntityKind};

impl Canvas {
    /// Rebuild every tile's object lists from the live prop entities.
    ///
    /// Each prop lands in the cell containing its world position, with the
    /// remainder as its offset inside that cell. Tiles left holding nothing
    /// once the props have moved on are dropped.
    pub fn rebuild_object_cache(&mut self) -> Result<()> {
        self.grid.clear_objects();

        let tile_size = self.tile_size;
        for prop in &self.props {
            let EntityKind::Prop { item, layer } = prop.kind else {
                continue;
            };
            let world = prop.displacement();
            let cell = Cell::containing(world, tile_size);
            let offset = cell
                .top_left(tile_size)
                .and_then(|corner| world.checked_sub(corner))
                .ok_or_else(|| outside_grid("prop", cell))?;

            let created = !self.grid.contains(cell);
            self.grid.set_facet(cell, Item::Object(ObjectEntry { id: item, layer, offset }));
            if created {
                recompute(&mut self.grid, cell);
            }
        }

        let pruned = self.grid.prune_empty();
        if pruned > 0 {
            debug!(pruned, "dropped tiles left empty by moved props");
        }
        Ok(())
    }

    /// Serialize the canvas.
    ///
    /// Rebuilds the object cache first, so the document always reflects
    /// where props currently sit.
    pub fn to_document(&mut self, catalog: &Catalog, variants: &VariantTable) -> Result<LevelDocument> {
        self.rebuild_object_cache()?;

        let t = self.tile_size;
        let mut doc = LevelDocument::new(self.player.displacement(), self.sky_handle.displacement());
        let mut fallbacks = 0usize;
        let mut collisions = 0usize;

        for (cell, tile) in self.grid.iter() {
            let origin = cell.top_left(t).ok_or_else(|| outside_grid("tile", cell))?;

            if tile.has_water {
                doc.water
                    .insert(origin, WaterSurface::from_bottom(tile.water_bottom()));
            }
            if tile.has_land {
                let key = tile.variant_key();
                let resolved = variants.resolve(&key);
                if resolved == FALLBACK_KEY {
                    fallbacks += 1;
                }
                doc.land.insert(origin, resolved.to_string());
            }
            if let Some(id) = tile.coin {
                let (_, subtype) = catalog.identity(id)?;
                let key = coin_key(cell, t).ok_or_else(|| outside_grid("coin", cell))?;
                doc.coin.insert(key, subtype.to_string());
            }
            if let Some(id) = tile.enemy {
                let (_, subtype) = catalog.identity(id)?;
                let key = enemy_key(cell, t).ok_or_else(|| outside_grid("enemy", cell))?;
                doc.enemy.insert(key, subtype.to_string());
            }

            for entry in tile
                .foreground_objects()
                .iter()
                .chain(tile.background_objects())
            {
                let (category, subtype) = catalog.identity(entry.id)?;
                let key = origin
                    .checked_add(entry.offset)
                    .ok_or_else(|| outside_grid("object", cell))?;
                let layer = match entry.layer {
                    ObjectLayer::Foreground => &mut doc.foreground,
                    ObjectLayer::Background => &mut doc.background,
                };
                if layer.insert(key, ObjectRef::new(category, subtype)).is_some() {
                    collisions += 1;
                }
            }
        }

        if collisions > 0 {
            debug!(collisions, "objects sharing a position were collapsed");
        }
        if fallbacks > 0 && fallbacks * 2 > doc.land.len() {
            warn!(
                fallbacks,
                land = doc.land.len(),
                "most land tiles have no registered variant"
            );
        }
        info!(
            tiles = self.grid.len(),
            props = self.props.len(),
            "exported level"
        );
        Ok(doc)
    }

    /// Serialize straight to level file text.
    pub fn to_text(&mut self, catalog: &Catalog, variants: &VariantTable) -> Result<String> {
        Ok(self.to_document(catalog, variants)?.to_text())
    }
}

/// Coins are keyed by the centre of their cell.
fn coin_anchor(tile_size: i32) -> Pixel {
    Pixel::new(tile_size / 2, tile_size / 2)
}

/// Enemies are keyed by the middle of their cell's bottom edge.
fn enemy_anchor(tile_size: i32) -> Pixel {
    Pixel::new(tile_size / 2, tile_size)
}

/// Document key of a coin in `cell`, if it fits in `i32`.
pub(crate) fn coin_key(cell: Cell, tile_size: i32) -> Option<Pixel> {
    cell.top_left(tile_size)?.checked_add(coin_anchor(tile_size))
}

/// Document key of an enemy in `cell`, if it fits in `i32`.
pub(crate) fn enemy_key(cell: Cell, tile_size: i32) -> Option<Pixel> {
    cell.top_left(tile_size)?.checked_add(enemy_anchor(tile_size))
}

/// Cell a coin key belongs to: the one containing it, as for a click.
pub(crate) fn coin_cell(key: Pixel, tile_size: i32) -> Cell {
    Cell::containing(key, tile_size)
}

/// Cell an enemy key belongs to. Keys sit on the bottom edge, so the pixel
/// just above decides. `None` for a key on the top edge of the grid.
pub(crate) fn enemy_cell(key: Pixel, tile_size: i32) -> Option<Cell> {
    let above = Pixel::new(key.x, key.y.checked_sub(1)?);
    Some(Cell::containing(above, tile_size))
}

fn outside_grid(what: &str, cell: Cell) -> LevelError {
    LevelError::InvalidFormat {
        message: format!("{} in cell {} has no position that fits in 32 bits", what, cell),
        help: Some("Move it closer to the origin before exporting".to_string()),
    }
}
