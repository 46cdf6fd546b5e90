//! Placeable items and the catalog that names them.
//!
//! Every placeable thing has a stable [`ItemId`] (its position in the
//! catalog) and a `(category, subtype)` identity used in level files, for
//! example `("coin", "gold")` or `("palm_bg", "large")`.

use std::fmt;

use crate::error::{LevelError, Result};

use super::cell::Pixel;

/// Catalog index of a placeable item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(pub usize);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Which object list (and level layer) a decorative object belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ObjectLayer {
    Foreground,
    Background,
}

impl ObjectLayer {
    pub fn name(self) -> &'static str {
        match self {
            ObjectLayer::Foreground => "foreground",
            ObjectLayer::Background => "background",
        }
    }
}

/// What a catalog entry does when placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    Land,
    Water,
    Coin,
    Enemy,
    /// Decorative prop; the layer is where interactive placement puts it.
    Object(ObjectLayer),
}

/// A decorative object cached on a tile: which item, in which list, and
/// where inside the tile (pixels from the tile's top-left corner).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectEntry {
    pub id: ItemId,
    pub layer: ObjectLayer,
    pub offset: Pixel,
}

/// A single facet edit applied to one cell of the grid store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Item {
    Land,
    Water,
    Coin(ItemId),
    Enemy(ItemId),
    Object(ObjectEntry),
}

impl Item {
    /// Whether the edit changes terrain (and so the neighbor state).
    pub fn is_terrain(&self) -> bool {
        matches!(self, Item::Land | Item::Water)
    }
}

/// One named entry of the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub category: String,
    pub subtype: String,
    pub kind: ItemKind,
}

/// Default coin subtypes.
pub const COIN_TYPES: [&str; 3] = ["gold", "silver", "diamond"];
/// Default enemy subtypes.
pub const ENEMY_TYPES: [&str; 4] = ["spikes", "tooth", "shell_left", "shell_right"];
/// Default palm subtypes, offered in both foreground and background.
pub const PALM_TYPES: [&str; 4] = ["small", "large", "left", "right"];

/// The table of everything that can be placed, in menu order.
///
/// Constructed once by the application and passed by reference to the
/// canvas, serializer and decoder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    /// Build a catalog from the subtype lists. Terrain always comes first
    /// (land, then water). Spaces in names become underscores.
    pub fn from_lists<S: AsRef<str>>(coins: &[S], enemies: &[S], palms: &[S]) -> Self {
        let mut entries = vec![
            entry("terrain", "land", ItemKind::Land),
            entry("terrain", "water", ItemKind::Water),
        ];
        entries.extend(coins.iter().map(|s| entry("coin", s.as_ref(), ItemKind::Coin)));
        entries.extend(enemies.iter().map(|s| entry("enemy", s.as_ref(), ItemKind::Enemy)));
        entries.extend(
            palms
                .iter()
                .map(|s| entry("palm_fg", s.as_ref(), ItemKind::Object(ObjectLayer::Foreground))),
        );
        entries.extend(
            palms
                .iter()
                .map(|s| entry("palm_bg", s.as_ref(), ItemKind::Object(ObjectLayer::Background))),
        );
        Self { entries }
    }

    /// The stock catalog.
    pub fn standard() -> Self {
        Self::from_lists(&COIN_TYPES, &ENEMY_TYPES, &PALM_TYPES)
    }

    pub fn get(&self, id: ItemId) -> Option<&CatalogEntry> {
        self.entries.get(id.0)
    }

    /// Find an item by identity.
    pub fn find(&self, category: &str, subtype: &str) -> Option<ItemId> {
        self.entries
            .iter()
            .position(|e| e.category == category && e.subtype == subtype)
            .map(ItemId)
    }

    /// Resolve an identity, failing with `UnknownItem`.
    pub fn resolve(&self, category: &str, subtype: &str) -> Result<ItemId> {
        self.find(category, subtype)
            .ok_or_else(|| LevelError::UnknownItem {
                category: category.to_string(),
                subtype: subtype.to_string(),
            })
    }

    /// Identity of an item, failing for ids outside the catalog.
    pub fn identity(&self, id: ItemId) -> Result<(&str, &str)> {
        self.get(id)
            .map(|e| (e.category.as_str(), e.subtype.as_str()))
            .ok_or_else(|| LevelError::UnknownItem {
                category: "?".to_string(),
                subtype: id.to_string(),
            })
    }

    pub fn land(&self) -> ItemId {
        ItemId(0)
    }

    pub fn water(&self) -> ItemId {
        ItemId(1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries with their ids.
    pub fn iter(&self) -> impl Iterator<Item = (ItemId, &CatalogEntry)> {
        self.entries.iter().enumerate().map(|(i, e)| (ItemId(i), e))
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::standard()
    }
}

fn entry(category: &str, subtype: &str, kind: ItemKind) -> CatalogEntry {
    CatalogEntry {
        category: category.to_string(),
        subtype: subtype.trim().replace(' ', "_"),
        kind,
    }
}
