//! Individual level checks.
//!
//! Each check compares a decoded document against the canvas rebuilt from
//! it and returns a `ValidationResult`.

use std::collections::BTreeMap;

use crate::canvas::{coin_cell, enemy_cell, Canvas};
use crate::document::{LevelDocument, WaterSurface};
use crate::types::{Cell, Pixel, VariantTable, FALLBACK_KEY};

use super::warning::{Diagnostic, ValidationResult};

const REBUILD_HELP: &str = "Run `shoal rebuild` to write a copy with fresh derived values";

/// Land values that differ from what the neighbors now produce.
pub fn check_stale_land(doc: &LevelDocument, canvas: &Canvas, variants: &VariantTable) -> ValidationResult {
    let mut result = ValidationResult::new();
    let t = canvas.tile_size();

    for (key, stored) in &doc.land {
        let Some(tile) = canvas.grid().get(Cell::containing(*key, t)) else {
            continue;
        };
        let computed = tile.variant_key();
        let expected = variants.resolve(&computed);
        if stored != expected {
            result.push(
                Diagnostic::warning(
                    "shoal::validate::stale-land",
                    format!("land stored as '{}', neighbors give '{}'", stored, expected),
                )
                .at(*key)
                .with_help(REBUILD_HELP),
            );
        }
    }

    result
}

/// Water surfaces that differ from what the cell above now produces.
pub fn check_stale_water(doc: &LevelDocument, canvas: &Canvas) -> ValidationResult {
    let mut result = ValidationResult::new();
    let t = canvas.tile_size();

    for (key, stored) in &doc.water {
        let Some(tile) = canvas.grid().get(Cell::containing(*key, t)) else {
            continue;
        };
        let expected = WaterSurface::from_bottom(tile.water_bottom());
        if *stored != expected {
            result.push(
                Diagnostic::warning(
                    "shoal::validate::stale-water",
                    format!("water stored as '{}', should be '{}'", stored, expected),
                )
                .at(*key)
                .with_help(REBUILD_HELP),
            );
        }
    }

    result
}

/// Land cells with no registered variant.
pub fn check_fallback_variants(canvas: &Canvas, variants: &VariantTable) -> ValidationResult {
    let mut result = ValidationResult::new();
    let t = canvas.tile_size();

    for (cell, tile) in canvas.grid().iter().filter(|(_, tile)| tile.has_land) {
        let key = tile.variant_key();
        // isolated tiles are meant to use the fallback
        if !key.is_empty() && variants.resolve(&key) == FALLBACK_KEY {
            let mut diagnostic = Diagnostic::warning(
                "shoal::validate::fallback-variant",
                format!("no land variant for neighbors {}, drawn as '{}'", key, FALLBACK_KEY),
            )
            .with_help("Add the key to land_variants in shoal.yaml or reshape the terrain");
            if let Some(corner) = cell.top_left(t) {
                diagnostic = diagnostic.at(corner);
            }
            result.push(diagnostic);
        }
    }

    result
}

/// Foreground and background objects at the same position.
pub fn check_overlapping_objects(doc: &LevelDocument) -> ValidationResult {
    let mut result = ValidationResult::new();

    for (key, front) in &doc.foreground {
        if let Some(back) = doc.background.get(key) {
            result.push(
                Diagnostic::warning(
                    "shoal::validate::overlapping-objects",
                    format!(
                        "{} '{}' covers {} '{}'",
                        front.category, front.subtype, back.category, back.subtype
                    ),
                )
                .at(*key),
            );
        }
    }

    result
}

/// Terrain keys that do not sit on a cell corner.
pub fn check_terrain_keys(doc: &LevelDocument, tile_size: i32) -> ValidationResult {
    let mut result = ValidationResult::new();

    for (layer, keys) in [
        ("water", doc.water.keys().copied().collect::<Vec<_>>()),
        ("land", doc.land.keys().copied().collect()),
    ] {
        for key in &keys {
            let message = match Cell::containing(*key, tile_size).top_left(tile_size) {
                Some(corner) if corner == *key => continue,
                Some(corner) => {
                    format!("{} key is not on a cell corner (cell starts at {})", layer, corner)
                }
                None => format!("{} key is not on a cell corner", layer),
            };
            result.push(Diagnostic::warning("shoal::validate::misaligned-key", message).at(*key));
        }
    }

    result
}

/// Coins or enemies that land in the same cell; only the last survives an
/// import.
pub fn check_item_collisions(doc: &LevelDocument, tile_size: i32) -> ValidationResult {
    let mut result = ValidationResult::new();

    let coins = doc.coin.keys().map(|key| (*key, Some(coin_cell(*key, tile_size))));
    let enemies = doc.enemy.keys().map(|key| (*key, enemy_cell(*key, tile_size)));
    let layers: [(&str, Vec<(Pixel, Option<Cell>)>); 2] =
        [("coin", coins.collect()), ("enemy", enemies.collect())];

    for (layer, keys) in layers {
        let mut cells: BTreeMap<Cell, Pixel> = BTreeMap::new();
        for (key, cell) in keys {
            // keys without a cell never import
            let Some(cell) = cell else {
                continue;
            };
            if let Some(first) = cells.insert(cell, key) {
                result.push(
                    Diagnostic::error(
                        "shoal::validate::item-collision",
                        format!("{} at {} and {} share cell {}", layer, first, key, cell),
                    )
                    .at(key)
                    .with_help("A cell holds one coin and one enemy; move or remove one of them"),
                );
            }
        }
    }

    result
}

/// A level with no terrain at all.
pub fn check_empty_level(doc: &LevelDocument) -> ValidationResult {
    let mut result = ValidationResult::new();

    if doc.land.is_empty() && doc.water.is_empty() {
        result.push(
            Diagnostic::warning("shoal::validate::empty-level", "level has no land or water")
                .with_help("The player will fall forever"),
        );
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::ObjectRef;
    use crate::types::Catalog;

    fn doc() -> LevelDocument {
        LevelDocument::new(Pixel::new(0, 0), Pixel::new(0, 0))
    }

    fn canvas(doc: &LevelDocument) -> Canvas {
        Canvas::from_document(doc, &Catalog::standard(), 64).unwrap()
    }

    #[test]
    fn test_stale_land() {
        let mut d = doc();
        d.land.insert(Pixel::new(0, 0), "C".to_string());
        d.land.insert(Pixel::new(64, 0), "A".to_string());

        let result = check_stale_land(&d, &canvas(&d), &VariantTable::default());
        let found: Vec<_> = result.iter().collect();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].at, Some(Pixel::new(64, 0)));
        assert!(found[0].message.contains("neighbors give 'G'"));
    }

    #[test]
    fn test_stale_water() {
        let mut d = doc();
        d.water.insert(Pixel::new(0, 0), WaterSurface::Top);
        d.water.insert(Pixel::new(0, 64), WaterSurface::Top);

        let result = check_stale_water(&d, &canvas(&d));
        assert_eq!(result.warning_count(), 1);
        assert_eq!(result.iter().next().unwrap().at, Some(Pixel::new(0, 64)));
    }

    #[test]
    fn test_fallback_variant() {
        let mut d = doc();
        d.land.insert(Pixel::new(0, 0), "X".to_string());
        d.land.insert(Pixel::new(64, 64), "X".to_string());
        d.land.insert(Pixel::new(640, 0), "X".to_string());

        // diagonal-only neighbors are not blob keys
        let result = check_fallback_variants(&canvas(&d), &VariantTable::default());
        assert_eq!(result.warning_count(), 2);
        assert!(result.iter().any(|r| r.message.contains("neighbors D")));
    }

    #[test]
    fn test_overlapping_objects() {
        let mut d = doc();
        d.foreground
            .insert(Pixel::new(5, 5), ObjectRef::new("palm_fg", "small"));
        d.background
            .insert(Pixel::new(5, 5), ObjectRef::new("palm_bg", "large"));
        d.background
            .insert(Pixel::new(6, 5), ObjectRef::new("palm_bg", "large"));

        let result = check_overlapping_objects(&d);
        assert_eq!(result.warning_count(), 1);
    }

    #[test]
    fn test_terrain_keys() {
        let mut d = doc();
        d.land.insert(Pixel::new(0, 0), "X".to_string());
        d.water.insert(Pixel::new(-10, 70), WaterSurface::Top);

        let result = check_terrain_keys(&d, 64);
        let found: Vec<_> = result.iter().collect();
        assert_eq!(found.len(), 1);
        assert!(found[0].message.contains("(-64, 64)"));
    }

    #[test]
    fn test_item_collisions() {
        let mut d = doc();
        d.coin.insert(Pixel::new(32, 32), "gold".to_string());
        d.coin.insert(Pixel::new(40, 40), "silver".to_string());
        d.enemy.insert(Pixel::new(32, 64), "tooth".to_string());

        let result = check_item_collisions(&d, 64);
        assert_eq!(result.error_count(), 1);
    }

    #[test]
    fn test_item_collisions_use_containing_cell() {
        let mut d = doc();
        // (10, 10) and (60, 60) share cell (0, 0); (70, 10) is next door
        d.coin.insert(Pixel::new(10, 10), "gold".to_string());
        d.coin.insert(Pixel::new(60, 60), "silver".to_string());
        d.coin.insert(Pixel::new(70, 10), "gold".to_string());
        // (32, 64) and (1, 1) are both in row 0; (32, 0) is in row -1
        d.enemy.insert(Pixel::new(32, 64), "tooth".to_string());
        d.enemy.insert(Pixel::new(1, 1), "spikes".to_string());
        d.enemy.insert(Pixel::new(32, 0), "tooth".to_string());
        d.enemy.insert(Pixel::new(0, i32::MIN), "tooth".to_string());

        let result = check_item_collisions(&d, 64);
        assert_eq!(result.error_count(), 2);
    }

    #[test]
    fn test_misaligned_key_near_limits() {
        let mut d = doc();
        d.land.insert(Pixel::new(i32::MIN, 0), "X".to_string());
        d.land.insert(Pixel::new(i32::MAX, 0), "X".to_string());

        assert_eq!(check_terrain_keys(&d, 64).warning_count(), 1);
        assert_eq!(check_terrain_keys(&d, 48).warning_count(), 2);
    }

    #[test]
    fn test_empty_level() {
        assert_eq!(check_empty_level(&doc()).warning_count(), 1);

        let mut d = doc();
        d.water.insert(Pixel::new(0, 0), WaterSurface::Top);
        assert!(check_empty_level(&d).is_ok());
    }
}
