//! Live editor state.
//!
//! A `Canvas` owns the grid store, the placed-object entities and the pan
//! origin. Every tile edit goes through it so the neighbor recompute can
//! never be skipped, and it is the only thing that imports or exports
//! levels.
//!
//! # Example
//!
//! ```ignore
//! use shoal::{Canvas, Catalog, Cell, Item, VariantTable};
//!
//! let catalog = Catalog::standard();
//! let mut canvas = Canvas::default();
//! canvas.place(Cell::new(0, 0), Item::Land);
//! canvas.place(Cell::new(1, 0), Item::Land);
//!
//! let doc = canvas.to_document(&catalog, &VariantTable::default())?;
//! println!("{}", doc.to_text());
//! ```

mod entity;
mod export;
mod import;

use tracing::debug;

use crate::error::{LevelError, Result};
use crate::grid::{recompute, GridStore};
use crate::types::{cell_at, Catalog, Cell, Item, ItemId, ItemKind, ObjectLayer, Pixel, Point, Tile, TILE_SIZE};

pub use entity::{EntityId, EntityKind, PlacedObject};
pub(crate) use export::{coin_cell, coin_key, enemy_cell, enemy_key};

/// Default world position of the player marker on a fresh canvas.
pub const DEFAULT_PLAYER_START: Pixel = Pixel::new(200, 300);
/// Default world position of the sky handle on a fresh canvas.
pub const DEFAULT_SKY_HANDLE_START: Pixel = Pixel::new(640, 360);

/// What an interactive placement produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Tile(Cell),
    Prop(EntityId),
}

/// The editor's level under construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Canvas {
    grid: GridStore,
    player: PlacedObject,
    sky_handle: PlacedObject,
    props: Vec<PlacedObject>,
    origin: Point,
    tile_size: i32,
    next_id: u64,
}

impl Canvas {
    /// Empty canvas with the player and sky handle at the given world
    /// positions and the origin at (0, 0).
    pub fn new(tile_size: i32, player_start: Pixel, sky_handle_start: Pixel) -> Self {
        let origin = Point::default();
        Self {
            grid: GridStore::new(),
            player: PlacedObject::at_world(EntityId(0), EntityKind::Player, player_start, origin),
            sky_handle: PlacedObject::at_world(
                EntityId(1),
                EntityKind::SkyHandle,
                sky_handle_start,
                origin,
            ),
            props: Vec::new(),
            origin,
            tile_size,
            next_id: 2,
        }
    }

    pub fn grid(&self) -> &GridStore {
        &self.grid
    }

    pub fn origin(&self) -> Point {
        self.origin
    }

    pub fn tile_size(&self) -> i32 {
        self.tile_size
    }

    pub fn player(&self) -> &PlacedObject {
        &self.player
    }

    pub fn sky_handle(&self) -> &PlacedObject {
        &self.sky_handle
    }

    /// Decorative props in placement order.
    pub fn props(&self) -> &[PlacedObject] {
        &self.props
    }

    /// Any entity by id.
    pub fn entity(&self, id: EntityId) -> Option<&PlacedObject> {
        self.entities().find(|e| e.id == id)
    }

    /// Player, sky handle, then props.
    pub fn entities(&self) -> impl Iterator<Item = &PlacedObject> {
        [&self.player, &self.sky_handle]
            .into_iter()
            .chain(self.props.iter())
    }

    /// Cell under a screen point.
    pub fn cell_at(&self, screen: Point) -> Cell {
        cell_at(screen, self.origin, self.tile_size)
    }

    /// Apply an item to a cell and refresh the surrounding window.
    pub fn place(&mut self, cell: Cell, item: Item) {
        self.grid.set_facet(cell, item);
        recompute(&mut self.grid, cell);
    }

    /// Delete a whole cell and refresh the surrounding window. Entities
    /// standing on the cell are left alone.
    pub fn erase(&mut self, cell: Cell) -> Option<Tile> {
        let removed = self.grid.remove_cell(cell);
        if removed.is_some() {
            recompute(&mut self.grid, cell);
        }
        removed
    }

    /// Interactive left click: place catalog item `id` under `screen`.
    ///
    /// Terrain, coins and enemies go into the tile; decorative objects
    /// become new prop entities at the clicked point.
    pub fn paint(&mut self, catalog: &Catalog, screen: Point, id: ItemId) -> Result<Placement> {
        let entry = catalog.get(id).ok_or_else(|| LevelError::UnknownItem {
            category: "?".to_string(),
            subtype: id.to_string(),
        })?;

        let cell = self.cell_at(screen);
        let item = match entry.kind {
            ItemKind::Land => Item::Land,
            ItemKind::Water => Item::Water,
            ItemKind::Coin => Item::Coin(id),
            ItemKind::Enemy => Item::Enemy(id),
            ItemKind::Object(layer) => {
                return Ok(Placement::Prop(self.spawn_prop(id, layer, screen)));
            }
        };

        debug!(%cell, item = %id, "paint");
        self.place(cell, item);
        Ok(Placement::Tile(cell))
    }

    /// Interactive right click: delete the cell under `screen`.
    pub fn erase_at(&mut self, screen: Point) -> Option<Tile> {
        let cell = self.cell_at(screen);
        self.erase(cell)
    }

    /// Create a prop entity at a screen point.
    pub fn spawn_prop(&mut self, item: ItemId, layer: ObjectLayer, screen: Point) -> EntityId {
        let id = self.allocate_id();
        self.props.push(PlacedObject::new(
            id,
            EntityKind::Prop { item, layer },
            screen,
            self.origin,
        ));
        id
    }

    /// Create a prop entity at a world pixel.
    pub fn spawn_prop_at_world(&mut self, item: ItemId, layer: ObjectLayer, world: Pixel) -> EntityId {
        let id = self.allocate_id();
        self.props.push(PlacedObject::at_world(
            id,
            EntityKind::Prop { item, layer },
            world,
            self.origin,
        ));
        id
    }

    /// Delete a prop. The player and sky handle are not deletable and
    /// yield `None`.
    pub fn remove_prop(&mut self, id: EntityId) -> Option<PlacedObject> {
        if !self.entity(id)?.is_deletable() {
            debug!(%id, "entity cannot be deleted");
            return None;
        }
        let index = self.props.iter().position(|p| p.id == id)?;
        Some(self.props.remove(index))
    }

    /// Finish a drag: drop an entity at a screen point.
    pub fn move_entity(&mut self, id: EntityId, screen: Point) -> bool {
        let origin = self.origin;
        match self.entity_mut(id) {
            Some(entity) => {
                entity.move_to(screen, origin);
                true
            }
            None => false,
        }
    }

    /// Move the pan origin; entities follow on screen.
    pub fn pan_to(&mut self, origin: Point) {
        self.origin = origin;
        self.player.update_position(origin);
        self.sky_handle.update_position(origin);
        for prop in &mut self.props {
            prop.update_position(origin);
        }
    }

    /// Shift the pan origin by a screen delta.
    pub fn pan_by(&mut self, dx: f32, dy: f32) {
        self.pan_to(Point::new(self.origin.x + dx, self.origin.y + dy));
    }

    fn entity_mut(&mut self, id: EntityId) -> Option<&mut PlacedObject> {
        if self.player.id == id {
            return Some(&mut self.player);
        }
        if self.sky_handle.id == id {
            return Some(&mut self.sky_handle);
        }
        self.props.iter_mut().find(|p| p.id == id)
    }

    fn allocate_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new(TILE_SIZE, DEFAULT_PLAYER_START, DEFAULT_SKY_HANDLE_START)
    }
}
