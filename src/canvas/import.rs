//! Rebuilding a canvas from a level document.
//!
//! Import never mutates the live canvas until it has succeeded: the level
//! is rebuilt into a staging canvas and swapped in at the end. Any failure
//! drops the staging canvas and leaves the original exactly as it was.

use tracing::{debug, info};

use crate::document::{LevelDocument, ObjectRef};
use crate::error::{LevelError, Result};
use crate::parser::parse_level;
use crate::types::{Catalog, Cell, Item, ItemId, ItemKind, ObjectLayer, Pixel};

use super::export::{coin_cell, coin_key, enemy_cell, enemy_key};
use super::Canvas;

impl Canvas {
    /// Replace this canvas with the level described by `doc`.
    ///
    /// The tile size is kept and the pan origin is reset to `(0, 0)`.
    pub fn import(&mut self, doc: &LevelDocument, catalog: &Catalog) -> Result<()> {
        let staging = Self::from_document(doc, catalog, self.tile_size)?;
        info!(
            tiles = staging.grid.len(),
            props = staging.props.len(),
            "imported level"
        );
        *self = staging;
        Ok(())
    }

    /// Parse level text and import it.
    pub fn import_str(&mut self, source: &str, catalog: &Catalog) -> Result<()> {
        let doc = parse_level(source)?;
        self.import(&doc, catalog)
    }

    /// A fresh canvas holding the level described by `doc`.
    pub fn from_document(doc: &LevelDocument, catalog: &Catalog, tile_size: i32) -> Result<Self> {
        let t = tile_size;
        let mut staging = Canvas::new(t, doc.player.position, doc.sky_handle.position);

        debug!(entries = doc.water.len(), "importing water");
        for pixel in doc.water.keys() {
            let cell = containing_cell("water", *pixel, t)?;
            staging.place(cell, Item::Water);
        }

        debug!(entries = doc.land.len(), "importing land");
        for pixel in doc.land.keys() {
            let cell = containing_cell("land", *pixel, t)?;
            staging.place(cell, Item::Land);
        }

        debug!(entries = doc.coin.len(), "importing coins");
        for (pixel, subtype) in &doc.coin {
            let id = resolve_kind(catalog, "coin", subtype, ItemKind::Coin)?;
            let cell = keyed_cell("coin", *pixel, Some(coin_cell(*pixel, t)), |c| coin_key(c, t))?;
            staging.place(cell, Item::Coin(id));
        }

        debug!(entries = doc.enemy.len(), "importing enemies");
        for (pixel, subtype) in &doc.enemy {
            let id = resolve_kind(catalog, "enemy", subtype, ItemKind::Enemy)?;
            let cell = keyed_cell("enemy", *pixel, enemy_cell(*pixel, t), |c| enemy_key(c, t))?;
            staging.place(cell, Item::Enemy(id));
        }

        debug!(
            foreground = doc.foreground.len(),
            background = doc.background.len(),
            "importing objects"
        );
        for (layer, objects, name) in [
            (ObjectLayer::Foreground, &doc.foreground, "foreground"),
            (ObjectLayer::Background, &doc.background, "background"),
        ] {
            for (pixel, object) in objects {
                let id = resolve_object(catalog, object)?;
                containing_cell(name, *pixel, t)?;
                staging.spawn_prop_at_world(id, layer, *pixel);
            }
        }

        Ok(staging)
    }
}

/// The cell a layer key maps to, provided the cell can be written back out.
///
/// `written` gives the key export would produce for the cell; keys near the
/// ends of the `i32` range can map to cells whose key does not fit.
fn keyed_cell(
    layer: &str,
    key: Pixel,
    cell: Option<Cell>,
    written: impl Fn(Cell) -> Option<Pixel>,
) -> Result<Cell> {
    cell.filter(|cell| written(*cell).is_some())
        .ok_or_else(|| LevelError::InvalidFormat {
            message: format!("{} key {} is outside the grid", layer, key),
            help: Some("Keys need room for a whole tile within 32-bit coordinates".to_string()),
        })
}

/// Terrain and objects: the cell containing the key.
fn containing_cell(layer: &str, key: Pixel, tile_size: i32) -> Result<Cell> {
    let cell = Cell::containing(key, tile_size);
    keyed_cell(layer, key, Some(cell), |c| c.top_left(tile_size))
}

fn resolve_kind(catalog: &Catalog, category: &str, subtype: &str, kind: ItemKind) -> Result<ItemId> {
    let id = catalog.resolve(category, subtype)?;
    match catalog.get(id) {
        Some(entry) if entry.kind == kind => Ok(id),
        _ => Err(LevelError::UnknownItem {
            category: category.to_string(),
            subtype: subtype.to_string(),
        }),
    }
}

/// Object layers accept only decorative items.
fn resolve_object(catalog: &Catalog, object: &ObjectRef) -> Result<ItemId> {
    let id = catalog.resolve(&object.category, &object.subtype)?;
    match catalog.get(id).map(|e| e.kind) {
        Some(ItemKind::Object(_)) => Ok(id),
        _ => Err(LevelError::InvalidFormat {
            message: format!(
                "'{}' item '{}' is not a decorative object",
                object.category, object.subtype
            ),
            help: Some("Object layers hold palm_fg and palm_bg items".to_string()),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::WaterSurface;
    use crate::grid::recompute_all;
    use crate::types::{Point, VariantTable};
    use pretty_assertions::assert_eq;

    fn sample_canvas(catalog: &Catalog) -> Canvas {
        let mut canvas = Canvas::default();
        for col in -2..=2 {
            canvas.place(Cell::new(col, 3), Item::Land);
        }
        canvas.place(Cell::new(0, 2), Item::Land);
        canvas.place(Cell::new(4, 1), Item::Water);
        canvas.place(Cell::new(4, 2), Item::Water);
        canvas.place(Cell::new(0, 2), Item::Coin(catalog.find("coin", "silver").unwrap()));
        canvas.place(Cell::new(-1, 2), Item::Enemy(catalog.find("enemy", "spikes").unwrap()));
        let palm = catalog.find("palm_fg", "left").unwrap();
        canvas.spawn_prop(palm, ObjectLayer::Foreground, Point::new(-20.0, 150.0));
        let palm = catalog.find("palm_bg", "right").unwrap();
        canvas.spawn_prop(palm, ObjectLayer::Background, Point::new(130.0, 140.0));
        let player = canvas.player().id;
        canvas.move_entity(player, Point::new(10.0, 100.0));
        canvas
    }

    #[test]
    fn test_round_trip() {
        let catalog = Catalog::standard();
        let variants = VariantTable::default();
        let mut canvas = sample_canvas(&catalog);
        let first = canvas.to_document(&catalog, &variants).unwrap();

        let mut reloaded = Canvas::default();
        reloaded.import(&first, &catalog).unwrap();
        let second = reloaded.to_document(&catalog, &variants).unwrap();

        assert_eq!(first, second);
        assert_eq!(second.player.position, Pixel::new(10, 100));
    }

    #[test]
    fn test_import_recomputes_like_editing() {
        let catalog = Catalog::standard();
        let mut canvas = sample_canvas(&catalog);
        let doc = canvas.to_document(&catalog, &VariantTable::default()).unwrap();

        let imported = Canvas::from_document(&doc, &catalog, 64).unwrap();
        let mut rescanned = imported.grid().clone();
        recompute_all(&mut rescanned);
        assert_eq!(imported.grid(), &rescanned);

        for (cell, tile) in canvas.grid().iter().filter(|(_, t)| t.has_land) {
            let other = imported.grid().get(cell).unwrap();
            assert_eq!(tile.land_neighbors(), other.land_neighbors());
        }
    }

    #[test]
    fn test_stale_values_are_recomputed() {
        let catalog = Catalog::standard();
        let mut doc = LevelDocument::new(Pixel::new(0, 0), Pixel::new(0, 0));
        doc.land.insert(Pixel::new(0, 0), "ABCDEFGH".to_string());
        doc.land.insert(Pixel::new(64, 0), "X".to_string());
        doc.water.insert(Pixel::new(0, 128), WaterSurface::Bottom);

        let mut canvas = Canvas::from_document(&doc, &catalog, 64).unwrap();
        let out = canvas.to_document(&catalog, &VariantTable::default()).unwrap();
        assert_eq!(out.land.get(&Pixel::new(0, 0)).map(String::as_str), Some("C"));
        assert_eq!(out.land.get(&Pixel::new(64, 0)).map(String::as_str), Some("G"));
        assert_eq!(out.water.get(&Pixel::new(0, 128)), Some(&WaterSurface::Top));
    }

    #[test]
    fn test_anchor_inversion() {
        let catalog = Catalog::standard();
        let mut doc = LevelDocument::new(Pixel::new(0, 0), Pixel::new(0, 0));
        doc.coin.insert(Pixel::new(96, 96), "gold".to_string());
        doc.enemy.insert(Pixel::new(-32, 64), "tooth".to_string());

        let canvas = Canvas::from_document(&doc, &catalog, 64).unwrap();
        let gold = catalog.find("coin", "gold").unwrap();
        let tooth = catalog.find("enemy", "tooth").unwrap();
        assert_eq!(canvas.grid().get(Cell::new(1, 1)).unwrap().coin, Some(gold));
        assert_eq!(canvas.grid().get(Cell::new(-1, 0)).unwrap().enemy, Some(tooth));
    }

    #[test]
    fn test_off_centre_items_use_containing_cell() {
        let catalog = Catalog::standard();
        let mut doc = LevelDocument::new(Pixel::new(0, 0), Pixel::new(0, 0));
        doc.coin.insert(Pixel::new(10, 10), "gold".to_string());
        doc.coin.insert(Pixel::new(-1, 63), "silver".to_string());
        doc.enemy.insert(Pixel::new(70, 1), "tooth".to_string());
        doc.enemy.insert(Pixel::new(0, 0), "spikes".to_string());

        let mut canvas = Canvas::from_document(&doc, &catalog, 64).unwrap();
        let grid = canvas.grid();
        assert_eq!(grid.get(Cell::new(0, 0)).unwrap().coin, catalog.find("coin", "gold"));
        assert_eq!(grid.get(Cell::new(-1, 0)).unwrap().coin, catalog.find("coin", "silver"));
        assert_eq!(grid.get(Cell::new(1, 0)).unwrap().enemy, catalog.find("enemy", "tooth"));
        // a key on the top edge belongs to the cell above
        assert_eq!(grid.get(Cell::new(0, -1)).unwrap().enemy, catalog.find("enemy", "spikes"));

        // export moves them onto their anchors
        let out = canvas.to_document(&catalog, &VariantTable::default()).unwrap();
        assert!(out.coin.contains_key(&Pixel::new(32, 32)));
        assert!(out.coin.contains_key(&Pixel::new(-32, 32)));
        assert!(out.enemy.contains_key(&Pixel::new(96, 64)));
        assert!(out.enemy.contains_key(&Pixel::new(32, 0)));
    }

    #[test]
    fn test_keys_at_coordinate_limits() {
        let catalog = Catalog::standard();
        let base = || LevelDocument::new(Pixel::new(0, 0), Pixel::new(0, 0));

        let mut doc = base();
        doc.coin.insert(Pixel::new(i32::MIN, i32::MAX), "gold".to_string());
        doc.enemy.insert(Pixel::new(i32::MAX, i32::MIN + 1), "tooth".to_string());
        doc.land.insert(Pixel::new(i32::MIN, i32::MIN), "X".to_string());
        doc.water.insert(Pixel::new(i32::MAX, i32::MAX), WaterSurface::Top);
        doc.foreground
            .insert(Pixel::new(i32::MAX, i32::MIN), ObjectRef::new("palm_fg", "left"));

        let mut canvas = Canvas::from_document(&doc, &catalog, 64).unwrap();
        let out = canvas.to_document(&catalog, &VariantTable::default()).unwrap();
        assert!(out.coin.contains_key(&Pixel::new(i32::MIN + 32, i32::MAX - 31)));
        assert!(out.enemy.contains_key(&Pixel::new(i32::MAX - 31, i32::MIN + 64)));
        assert!(out.land.contains_key(&Pixel::new(i32::MIN, i32::MIN)));
        assert!(out.water.contains_key(&Pixel::new(i32::MAX - 63, i32::MAX - 63)));
        assert!(out.foreground.contains_key(&Pixel::new(i32::MAX, i32::MIN)));

        // an enemy on the top edge of the grid, or in the last row, has
        // no key that fits
        for key in [Pixel::new(0, i32::MIN), Pixel::new(0, i32::MAX)] {
            let mut doc = base();
            doc.enemy.insert(key, "tooth".to_string());
            let err = Canvas::from_document(&doc, &catalog, 64).unwrap_err();
            assert!(err.is_invalid_format(), "{}", err);
        }

        // with a tile size that does not divide 2^31 the first cell's
        // corner is out of range
        let mut doc = base();
        doc.land.insert(Pixel::new(i32::MIN, 0), "X".to_string());
        assert!(Canvas::from_document(&doc, &catalog, 48).unwrap_err().is_invalid_format());
        let mut doc = base();
        doc.background
            .insert(Pixel::new(0, i32::MIN), ObjectRef::new("palm_bg", "small"));
        assert!(Canvas::from_document(&doc, &catalog, 48).unwrap_err().is_invalid_format());
    }

    #[test]
    fn test_out_of_range_key_rolls_back() {
        let catalog = Catalog::standard();
        let mut canvas = sample_canvas(&catalog);
        let before = canvas.clone();

        let source = "{'player': {(0, 0): 'idle_right'}, 'sky_handle': {(0, 0): 'sky_handle'}, \
            'water': {}, 'land': {(0, 0): 'X'}, 'coin': {}, \
            'enemy': {(0, -2147483648): 'tooth'}, 'foreground': {}, 'background': {}}";
        let err = canvas.import_str(source, &catalog).unwrap_err();
        assert!(err.is_invalid_format());
        assert_eq!(canvas, before);
    }

    #[test]
    fn test_unknown_item_rolls_back() {
        let catalog = Catalog::standard();
        let mut canvas = sample_canvas(&catalog);
        canvas.pan_by(12.0, -7.5);
        let before = canvas.clone();

        let mut doc = LevelDocument::new(Pixel::new(0, 0), Pixel::new(0, 0));
        doc.land.insert(Pixel::new(0, 0), "X".to_string());
        doc.coin.insert(Pixel::new(32, 32), "ruby".to_string());

        let err = canvas.import(&doc, &catalog).unwrap_err();
        assert!(matches!(err, LevelError::UnknownItem { .. }));
        assert_eq!(canvas, before);
    }

    #[test]
    fn test_wrong_object_kind_rolls_back() {
        let catalog = Catalog::standard();
        let mut canvas = sample_canvas(&catalog);
        let before = canvas.clone();

        let mut doc = LevelDocument::new(Pixel::new(0, 0), Pixel::new(0, 0));
        doc.foreground
            .insert(Pixel::new(1, 1), ObjectRef::new("coin", "gold"));

        let err = canvas.import(&doc, &catalog).unwrap_err();
        assert!(err.is_invalid_format());
        assert_eq!(canvas, before);
    }

    #[test]
    fn test_syntax_error_rolls_back() {
        let catalog = Catalog::standard();
        let mut canvas = sample_canvas(&catalog);
        let before = canvas.clone();

        assert!(canvas.import_str("{'player': {(0, 0): ", &catalog).is_err());
        assert_eq!(canvas, before);
    }

    #[test]
    fn test_import_resets_origin_and_entities() {
        let catalog = Catalog::standard();
        let mut canvas = sample_canvas(&catalog);
        canvas.pan_by(50.0, 50.0);

        let doc = LevelDocument::new(Pixel::new(1, 2), Pixel::new(3, 4));
        canvas.import(&doc, &catalog).unwrap();

        assert_eq!(canvas.origin(), Point::new(0.0, 0.0));
        assert!(canvas.grid().is_empty());
        assert!(canvas.props().is_empty());
        assert_eq!(canvas.player().position(), Point::new(1.0, 2.0));
        assert_eq!(canvas.sky_handle().displacement(), Pixel::new(3, 4));
    }
}
