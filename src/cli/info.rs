//! Info command implementation.
//!
//! Prints per-layer entry counts and land variant usage for a level file,
//! or the whole document as JSON.

use std::collections::BTreeMap;
use std::path::PathBuf;

use clap::Args;

use crate::document::{LevelDocument, LAYER_NAMES};
use crate::error::{LevelError, Result};
use crate::output::{display_path, plural, Printer};
use crate::store::load;

/// Summarize a level file
#[derive(Args, Debug)]
pub struct InfoArgs {
    /// Level file
    pub file: PathBuf,

    /// Print the level as JSON to stdout
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: InfoArgs, printer: &Printer) -> Result<()> {
    let doc = load(&args.file)?;

    if args.json {
        let json = serde_json::to_string_pretty(&doc.to_json()).map_err(|e| LevelError::Command {
            message: format!("Failed to encode JSON: {}", e),
            help: None,
        })?;
        println!("{}", json);
        return Ok(());
    }

    printer.info("Level", &display_path(&args.file));
    for name in LAYER_NAMES {
        let count = doc.layer_len(name).unwrap_or(0);
        printer.detail(&format!("{:<12}{}", name, printer.dim(&count.to_string())));
    }

    let usage = variant_usage(&doc);
    if !usage.is_empty() {
        let listed: Vec<String> = usage
            .iter()
            .map(|(key, n)| format!("{} x{}", key, n))
            .collect();
        printer.info(
            "Variants",
            &format!("{}: {}", plural(usage.len(), "key", "keys"), listed.join(", ")),
        );
    }

    Ok(())
}

/// How many land tiles use each variant key.
pub fn variant_usage(doc: &LevelDocument) -> BTreeMap<&str, usize> {
    let mut usage = BTreeMap::new();
    for key in doc.land.values() {
        *usage.entry(key.as_str()).or_insert(0) += 1;
    }
    usage
}
