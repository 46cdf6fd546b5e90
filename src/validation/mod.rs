//! Non-fatal checks over level files.
//!
//! A level that decodes and imports cleanly can still be stale or odd:
//! derived values written by an older layout, variants without artwork,
//! items that collapse onto one cell. Used by `shoal validate`.

mod checks;
mod warning;

pub use warning::{Diagnostic, Severity, ValidationResult};

use crate::canvas::Canvas;
use crate::document::LevelDocument;
use crate::output::Printer;
use crate::types::VariantTable;

/// Run every check on a document and the canvas imported from it.
pub fn validate_level(doc: &LevelDocument, canvas: &Canvas, variants: &VariantTable) -> ValidationResult {
    let mut result = ValidationResult::new();
    let t = canvas.tile_size();

    result.merge(checks::check_item_collisions(doc, t));
    result.merge(checks::check_terrain_keys(doc, t));
    result.merge(checks::check_stale_land(doc, canvas, variants));
    result.merge(checks::check_stale_water(doc, canvas));
    result.merge(checks::check_fallback_variants(canvas, variants));
    result.merge(checks::check_overlapping_objects(doc));
    result.merge(checks::check_empty_level(doc));

    result
}

/// Print diagnostics to stderr.
pub fn print_diagnostics(printer: &Printer, result: &ValidationResult) {
    for d in result.iter() {
        let label = printer.severity(&d.severity.to_string(), d.severity == Severity::Error);
        let location = d.at.map(|at| format!(" at {}", at)).unwrap_or_default();
        eprintln!("  {}[{}]: {}{}", label, d.code, d.message, printer.dim(&location));
        if let Some(help) = &d.help {
            eprintln!("    help: {}", help);
        }
    }
}
