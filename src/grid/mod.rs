//! Sparse grid storage.
//!
//! Only occupied cells are materialized: memory grows with the number of
//! placed tiles, not with the size of the world. The store itself never
//! touches derived neighbor state; callers run [`recompute`] after edits.

mod neighbors;

use std::collections::HashMap;

use crate::types::{Cell, Item, Tile};

pub use neighbors::{recompute, recompute_all};

/// Mapping from cell to tile; a missing key is an empty cell.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GridStore {
    tiles: HashMap<Cell, Tile>,
}

impl GridStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply an item to a cell, creating the tile if absent.
    pub fn set_facet(&mut self, cell: Cell, item: Item) {
        self.tiles
            .entry(cell)
            .and_modify(|tile| tile.apply(item))
            .or_insert_with(|| Tile::with_item(item));
    }

    /// Delete the whole tile at `cell`; no-op when empty.
    pub fn remove_cell(&mut self, cell: Cell) -> Option<Tile> {
        self.tiles.remove(&cell)
    }

    pub fn get(&self, cell: Cell) -> Option<&Tile> {
        self.tiles.get(&cell)
    }

    pub(crate) fn get_mut(&mut self, cell: Cell) -> Option<&mut Tile> {
        self.tiles.get_mut(&cell)
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.tiles.contains_key(&cell)
    }

    /// Number of occupied cells.
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Occupied cells and their tiles, sorted by cell.
    pub fn iter(&self) -> impl Iterator<Item = (Cell, &Tile)> {
        let mut cells: Vec<&Cell> = self.tiles.keys().collect();
        cells.sort();
        cells.into_iter().map(move |cell| (*cell, &self.tiles[cell]))
    }

    /// Occupied cells in arbitrary order.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.tiles.keys().copied()
    }

    pub fn clear(&mut self) {
        self.tiles.clear();
    }

    /// Empty every tile's cached object lists.
    pub fn clear_objects(&mut self) {
        for tile in self.tiles.values_mut() {
            tile.clear_objects();
        }
    }

    /// Drop tiles left with nothing on them; returns how many went.
    ///
    /// Empty tiles carry no land or water, so neighbors need no recompute.
    pub fn prune_empty(&mut self) -> usize {
        let before = self.tiles.len();
        self.tiles.retain(|_, tile| !tile.is_empty());
        before - self.tiles.len()
    }

    pub(crate) fn has_land(&self, cell: Cell) -> bool {
        self.tiles.get(&cell).is_some_and(|t| t.has_land)
    }

    pub(crate) fn has_water(&self, cell: Cell) -> bool {
        self.tiles.get(&cell).is_some_and(|t| t.has_water)
    }
}
