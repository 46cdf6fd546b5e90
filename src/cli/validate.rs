//! Validate command implementation.
//!
//! Loads each level the way the editor does (parse, decode, import into a
//! fresh canvas), then runs the level checks on the result.

use std::path::{Path, PathBuf};

use clap::Args;
use tracing::debug;

use crate::error::{LevelError, Result};
use crate::output::{display_path, plural, Printer};
use crate::store::{load, scan};
use crate::types::{Catalog, VariantTable};
use crate::validation::{print_diagnostics, validate_level, ValidationResult};
use crate::Canvas;

use super::Project;

/// Check level files for errors and stale values
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Level files or directories (default: the levels directory)
    pub paths: Vec<PathBuf>,

    /// Treat warnings as errors
    #[arg(long)]
    pub strict: bool,
}

/// Outcome for one file.
#[derive(Debug)]
enum Checked {
    Valid(ValidationResult),
    Invalid(LevelError),
}

pub fn run(args: ValidateArgs, project: &Project, printer: &Printer) -> Result<()> {
    let roots = if args.paths.is_empty() {
        vec![project.levels_dir()]
    } else {
        args.paths.clone()
    };

    let files = scan(&roots, &project.config);
    if files.is_empty() {
        printer.warning("Skipping", "no level files found");
        return Ok(());
    }

    let catalog = project.config.catalog();
    let variants = project.config.variants();
    let mut failed = 0;
    let mut warned = 0;

    for file in &files {
        match check_file(file, project.config.tile_size, &catalog, &variants) {
            Checked::Invalid(err) => {
                failed += 1;
                printer.error("Invalid", &display_path(file));
                printer.detail(&err.to_string());
            }
            Checked::Valid(result) => {
                if result.has_errors() {
                    failed += 1;
                    printer.error("Failed", &display_path(file));
                } else if result.has_warnings() {
                    warned += 1;
                    printer.warning("Checked", &display_path(file));
                } else {
                    printer.status("Checked", &display_path(file));
                }
                print_diagnostics(printer, &result);
            }
        }
    }

    let total = files.len();
    if failed > 0 || (args.strict && warned > 0) {
        return Err(LevelError::Command {
            message: format!(
                "validation failed: {} of {}",
                failed + if args.strict { warned } else { 0 },
                plural(total, "level", "levels")
            ),
            help: (failed == 0).then(|| "Warnings count as failures with --strict".to_string()),
        });
    }

    printer.status("Finished", &format!("{} valid", plural(total, "level", "levels")));
    Ok(())
}

fn check_file(path: &Path, tile_size: i32, catalog: &Catalog, variants: &VariantTable) -> Checked {
    let doc = match load(path) {
        Ok(doc) => doc,
        Err(e) => return Checked::Invalid(e),
    };
    let canvas = match Canvas::from_document(&doc, catalog, tile_size) {
        Ok(canvas) => canvas,
        Err(e) => return Checked::Invalid(e),
    };
    debug!(path = %path.display(), tiles = canvas.grid().len(), "imported for validation");
    Checked::Valid(validate_level(&doc, &canvas, variants))
}
