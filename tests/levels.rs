//! End-to-end tests over level files in tests/fixtures.

use std::fs;
use std::path::PathBuf;
use std::time::{Duration, UNIX_EPOCH};

use pretty_assertions::assert_eq;
use tempfile::TempDir;

use shoal::grid::recompute_all;
use shoal::store::{load, scan};
use shoal::{
    parse_level, validate_level, Canvas, Catalog, Cell, Config, Item, LevelError, LevelStore,
    ObjectLayer, Pixel, Point, VariantTable, WaterSurface,
};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn read(name: &str) -> String {
    fs::read_to_string(fixture(name)).unwrap()
}

#[test]
fn test_fixture_round_trips_byte_for_byte() {
    let catalog = Catalog::standard();
    let source = read("harbour.txt");

    let mut canvas = Canvas::default();
    canvas.import_str(&source, &catalog).unwrap();
    let text = canvas.to_text(&catalog, &VariantTable::default()).unwrap();

    assert_eq!(text, source);
}

#[test]
fn test_imported_grid_matches_full_rescan() {
    let catalog = Catalog::standard();
    let doc = load(&fixture("harbour.txt")).unwrap();
    let canvas = Canvas::from_document(&doc, &catalog, 64).unwrap();

    let mut rescanned = canvas.grid().clone();
    recompute_all(&mut rescanned);
    assert_eq!(canvas.grid(), &rescanned);
    assert_eq!(canvas.props().len(), 4);
}

#[test]
fn test_handwritten_level() {
    let catalog = Catalog::standard();
    let doc = load(&fixture("handwritten.txt")).unwrap();
    assert_eq!(doc.player.position, Pixel::new(64, 100));

    let mut canvas = Canvas::from_document(&doc, &catalog, 64).unwrap();
    let coin = canvas.grid().get(Cell::new(1, 2)).unwrap();
    assert_eq!(coin.coin, catalog.find("coin", "gold"));
    let enemy = canvas.grid().get(Cell::new(2, 2)).unwrap();
    assert_eq!(enemy.enemy, catalog.find("enemy", "spikes"));

    let variants = VariantTable::default();
    let out = canvas.to_document(&catalog, &variants).unwrap();
    assert_eq!(out.land, doc.land);
    assert_eq!(out.foreground, doc.foreground);
    assert!(validate_level(&doc, &canvas, &variants).is_ok());
}

#[test]
fn test_stale_level_warnings() {
    let catalog = Catalog::standard();
    let variants = VariantTable::default();
    let doc = load(&fixture("stale.txt")).unwrap();
    let canvas = Canvas::from_document(&doc, &catalog, 64).unwrap();

    let result = validate_level(&doc, &canvas, &variants);
    assert!(!result.has_errors());
    assert_eq!(result.with_code("shoal::validate::stale-land").count(), 3);
    assert_eq!(result.with_code("shoal::validate::stale-water").count(), 2);
}

#[test]
fn test_code_in_level_is_rejected() {
    let err = load(&fixture("broken.txt")).unwrap_err();
    assert!(err.is_invalid_format());
    assert!(err.to_string().contains("2:32"), "{}", err);
}

#[test]
fn test_unknown_item_leaves_canvas_untouched() {
    let catalog = Catalog::standard();
    let mut canvas = Canvas::default();
    canvas.import_str(&read("harbour.txt"), &catalog).unwrap();
    canvas.pan_by(-100.0, 40.0);
    let before = canvas.clone();

    let err = canvas
        .import_str(&read("unknown_item.txt"), &catalog)
        .unwrap_err();

    assert!(matches!(err, LevelError::UnknownItem { .. }));
    assert_eq!(canvas, before);
}

#[test]
fn test_missing_sky_handle_is_rejected() {
    let catalog = Catalog::standard();
    let source = read("unknown_item.txt").replace("'sky_handle': {(640, 360): 'sky_handle'}, ", "");
    let mut canvas = Canvas::default();
    canvas.place(Cell::new(0, 0), Item::Water);
    let before = canvas.clone();

    let err = canvas.import_str(&source, &catalog).unwrap_err();
    assert!(err.is_invalid_format());
    assert_eq!(canvas, before);
}

fn level_with(layer: &str, entries: &str) -> String {
    let mut layers = vec![
        ("player", "{(0, 0): 'idle_right'}".to_string()),
        ("sky_handle", "{(0, 0): 'sky_handle'}".to_string()),
    ];
    for name in ["water", "land", "coin", "enemy", "foreground", "background"] {
        let value = if name == layer { format!("{{{}}}", entries) } else { "{}".to_string() };
        layers.push((name, value));
    }
    let body: Vec<String> = layers
        .iter()
        .map(|(name, value)| format!("'{}': {}", name, value))
        .collect();
    format!("{{{}}}", body.join(", "))
}

#[test]
fn test_extreme_keys_never_panic() {
    let catalog = Catalog::standard();
    let variants = VariantTable::default();
    let cases = [
        ("coin", "(-2147483648, -2147483648): 'gold'", true),
        ("coin", "(2147483647, 2147483647): 'gold'", true),
        ("enemy", "(0, -2147483648): 'tooth'", false),
        ("enemy", "(-2147483648, 2147483647): 'tooth'", false),
        ("enemy", "(2147483647, -2147483647): 'tooth'", true),
        ("land", "(-2147483648, 2147483647): 'X'", true),
        ("water", "(2147483647, -2147483648): 'top'", true),
        ("foreground", "(2147483647, 2147483647): ('palm_fg', 'left')", true),
        ("background", "(-2147483648, -2147483648): ('palm_bg', 'small')", true),
    ];

    for (layer, entries, accepted) in cases {
        let source = level_with(layer, entries);
        let mut canvas = Canvas::default();
        match canvas.import_str(&source, &catalog) {
            Ok(()) => {
                assert!(accepted, "{} should be rejected", entries);
                let doc = canvas.to_document(&catalog, &variants).unwrap();
                assert_eq!(doc.layer_len(layer), Some(1), "{}", entries);
            }
            Err(err) => {
                assert!(!accepted, "{}: {}", entries, err);
                assert!(err.is_invalid_format(), "{}", err);
                assert_eq!(canvas, Canvas::default());
            }
        }
    }
}

#[test]
fn test_handwritten_coin_lands_in_clicked_cell() {
    let catalog = Catalog::standard();
    let mut canvas = Canvas::default();
    canvas
        .import_str(&level_with("coin", "(10, 10): 'gold'"), &catalog)
        .unwrap();
    assert_eq!(canvas.grid().get(Cell::new(0, 0)).unwrap().coin, catalog.find("coin", "gold"));
    assert!(canvas.grid().get(Cell::new(-1, -1)).is_none());

    let doc = canvas.to_document(&catalog, &VariantTable::default()).unwrap();
    assert_eq!(doc.coin.get(&Pixel::new(32, 32)).map(String::as_str), Some("gold"));
}

#[test]
fn test_edit_session_export_and_reload() {
    let temp = TempDir::new().unwrap();
    let config = Config::default();
    let catalog = config.catalog();
    let variants = config.variants();

    // build a small level the way the editor would
    let mut canvas = config.canvas();
    for col in 0..4 {
        canvas.paint(&catalog, Point::new(col as f32 * 64.0 + 5.0, 260.0), catalog.land()).unwrap();
    }
    canvas.paint(&catalog, Point::new(300.0, 200.0), catalog.water()).unwrap();
    let shell = catalog.find("enemy", "shell_right").unwrap();
    canvas.paint(&catalog, Point::new(70.0, 200.0), shell).unwrap();
    let palm = catalog.find("palm_bg", "small").unwrap();
    let prop = canvas.spawn_prop(palm, ObjectLayer::Background, Point::new(130.0, 220.0));
    canvas.pan_by(-37.5, 12.0);
    canvas.move_entity(prop, Point::new(100.0, 250.0));

    let store = LevelStore::new(temp.path().join("levels"));
    let time = UNIX_EPOCH + Duration::from_secs(1_700_000_000);
    let doc = canvas.to_document(&catalog, &variants).unwrap();
    let path = store.export(&doc, time).unwrap();

    let loaded = load(&path).unwrap();
    assert_eq!(loaded, doc);
    assert_eq!(loaded.land.len(), 4);
    assert_eq!(loaded.land.get(&Pixel::new(0, 256)).map(String::as_str), Some("C"));
    assert_eq!(loaded.land.get(&Pixel::new(64, 256)).map(String::as_str), Some("CG"));
    assert_eq!(loaded.water.get(&Pixel::new(256, 192)), Some(&WaterSurface::Top));
    assert!(loaded.enemy.contains_key(&Pixel::new(96, 256)));
    // the prop was dropped at screen (100, 250) with the origin at (-37.5, 12)
    assert!(loaded.background.contains_key(&Pixel::new(137, 238)));

    // a second export in the same second refuses to overwrite
    let err = store.export(&doc, time).unwrap_err();
    assert!(matches!(err, LevelError::ExportConflict { .. }));
    assert_eq!(scan(&[temp.path().to_path_buf()], &config), vec![path]);
}

#[test]
fn test_every_fixture_parses_or_fails_cleanly() {
    let files = scan(&[fixture("")], &Config::default());
    assert_eq!(files.len(), 5);

    for file in files {
        let source = fs::read_to_string(&file).unwrap();
        if let Err(err) = parse_level(&source) {
            assert!(err.is_invalid_format(), "{}: {}", file.display(), err);
        }
    }
}
