//! Init command implementation.
//!
//! Writes a `shoal.yaml` with the stock settings and creates the levels
//! directory.

use std::fs;
use std::path::PathBuf;

use clap::Args;

use crate::config::{Config, CONFIG_FILE};
use crate::error::{LevelError, Result};
use crate::output::{display_path, Printer};

const HEADER: &str = "# shoal project configuration\n\
# land_variants: [A, C, AC, ...]  restricts the registered land variants\n";

/// Initialize a shoal project by generating a shoal.yaml
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Project directory (default: current directory)
    #[arg(long, default_value = ".")]
    pub dir: PathBuf,

    /// Overwrite an existing shoal.yaml
    #[arg(long)]
    pub force: bool,
}

pub fn run(args: InitArgs, printer: &Printer) -> Result<()> {
    let config_path = args.dir.join(CONFIG_FILE);

    if config_path.exists() && !args.force {
        return Err(LevelError::Command {
            message: format!("{} already exists", display_path(&config_path)),
            help: Some("Use --force to overwrite".to_string()),
        });
    }

    let config = Config::default();
    let yaml = format!("{}{}", HEADER, config.to_yaml()?);

    fs::create_dir_all(&args.dir).map_err(|e| LevelError::Io {
        path: args.dir.clone(),
        message: format!("Failed to create project directory: {}", e),
    })?;
    fs::write(&config_path, yaml).map_err(|e| LevelError::Io {
        path: config_path.clone(),
        message: format!("Failed to write config: {}", e),
    })?;

    let levels = args.dir.join(&config.levels_dir);
    fs::create_dir_all(&levels).map_err(|e| LevelError::Io {
        path: levels.clone(),
        message: format!("Failed to create levels directory: {}", e),
    })?;

    printer.status("Created", &display_path(&config_path));
    printer.info("Levels", &display_path(&levels));

    Ok(())
}
