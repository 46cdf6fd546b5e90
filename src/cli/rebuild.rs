//! Rebuild command implementation.
//!
//! Imports a level and exports it again as a new file, so land variants and
//! water surfaces are recomputed from the current neighbor rules and
//! variant table. The source file is never modified.

use std::path::PathBuf;
use std::time::SystemTime;

use clap::Args;

use crate::error::Result;
use crate::output::{display_path, plural, Printer};
use crate::store::{load, LevelStore};

use super::Project;

/// Re-export a level with freshly computed land and water values
#[derive(Args, Debug)]
pub struct RebuildArgs {
    /// Level file to rebuild
    pub file: PathBuf,

    /// Directory for the new file (default: the levels directory)
    #[arg(long, short)]
    pub output: Option<PathBuf>,
}

pub fn run(args: RebuildArgs, project: &Project, printer: &Printer) -> Result<()> {
    run_at(args, project, printer, SystemTime::now()).map(|_| ())
}

fn run_at(args: RebuildArgs, project: &Project, printer: &Printer, time: SystemTime) -> Result<PathBuf> {
    let config = &project.config;
    let catalog = config.catalog();

    let doc = load(&args.file)?;
    let mut canvas = config.canvas();
    canvas.import(&doc, &catalog)?;
    let rebuilt = canvas.to_document(&catalog, &config.variants())?;

    let changed = rebuilt
        .land
        .iter()
        .filter(|(key, value)| doc.land.get(*key) != Some(*value))
        .count()
        + rebuilt
            .water
            .iter()
            .filter(|(key, value)| doc.water.get(*key) != Some(*value))
            .count();

    let dir = args.output.unwrap_or_else(|| project.levels_dir());
    let path = LevelStore::new(dir).export(&rebuilt, time)?;

    printer.status(
        "Rebuilt",
        &format!(
            "{} -> {} ({} changed)",
            display_path(&args.file),
            display_path(&path),
            plural(changed, "value", "values")
        ),
    );
    Ok(path)
}
