//! Per-cell facet bundle.

use super::direction::{variant_key, Direction};
use super::item::{Item, ItemId, ObjectEntry, ObjectLayer};

/// Everything placed on one occupied cell.
///
/// Land, water, coin and enemy are independent facets. `land_neighbors`
/// and `water_bottom` are derived from the surrounding cells and are only
/// written by the neighbor resolver.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Tile {
    pub has_land: bool,
    pub has_water: bool,
    pub coin: Option<ItemId>,
    pub enemy: Option<ItemId>,

    land_neighbors: Vec<Direction>,
    water_bottom: bool,

    background_objects: Vec<ObjectEntry>,
    foreground_objects: Vec<ObjectEntry>,
}

impl Tile {
    /// A tile holding a single item.
    pub fn with_item(item: Item) -> Self {
        let mut tile = Tile::default();
        tile.apply(item);
        tile
    }

    /// Set a facet, or add an object unless an equal one is present.
    pub fn apply(&mut self, item: Item) {
        match item {
            Item::Land => self.has_land = true,
            Item::Water => self.has_water = true,
            Item::Coin(id) => self.coin = Some(id),
            Item::Enemy(id) => self.enemy = Some(id),
            Item::Object(entry) => {
                let list = match entry.layer {
                    ObjectLayer::Foreground => &mut self.foreground_objects,
                    ObjectLayer::Background => &mut self.background_objects,
                };
                if !list.contains(&entry) {
                    list.push(entry);
                }
            }
        }
    }

    /// Directions with a land neighbor, in canonical order.
    pub fn land_neighbors(&self) -> &[Direction] {
        &self.land_neighbors
    }

    /// Water here and water directly north.
    pub fn water_bottom(&self) -> bool {
        self.water_bottom
    }

    /// Concatenated neighbor codes.
    pub fn variant_key(&self) -> String {
        variant_key(&self.land_neighbors)
    }

    /// `"bottom"` or `"top"`, as stored in the water layer.
    pub fn water_surface(&self) -> &'static str {
        if self.water_bottom {
            "bottom"
        } else {
            "top"
        }
    }

    pub fn foreground_objects(&self) -> &[ObjectEntry] {
        &self.foreground_objects
    }

    pub fn background_objects(&self) -> &[ObjectEntry] {
        &self.background_objects
    }

    /// Drop cached object lists ahead of a rebuild.
    pub fn clear_objects(&mut self) {
        self.foreground_objects.clear();
        self.background_objects.clear();
    }

    /// True when no facet and no object is set.
    pub fn is_empty(&self) -> bool {
        !self.has_land
            && !self.has_water
            && self.coin.is_none()
            && self.enemy.is_none()
            && self.foreground_objects.is_empty()
            && self.background_objects.is_empty()
    }

    pub(crate) fn reset_derived(&mut self) {
        self.land_neighbors.clear();
        self.water_bottom = false;
    }

    pub(crate) fn push_land_neighbor(&mut self, direction: Direction) {
        self.land_neighbors.push(direction);
    }

    pub(crate) fn set_water_bottom(&mut self) {
        self.water_bottom = true;
    }
}
