pub mod completions;
pub mod info;
pub mod init;
pub mod new;
pub mod rebuild;
pub mod validate;

use std::path::{Path, PathBuf};

use clap::{ArgAction, Parser, Subcommand};

use crate::config::Config;
use crate::error::Result;

/// shoal - tile-grid level files for a 2D platformer editor
#[derive(Parser, Debug)]
#[command(name = "shoal")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Project configuration (default: ./shoal.yaml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// More logging (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize a shoal project (generates shoal.yaml)
    Init(init::InitArgs),

    /// Export an empty level with default spawn positions
    New(new::NewArgs),

    /// Check level files for errors and stale values
    Validate(validate::ValidateArgs),

    /// Summarize a level file
    Info(info::InfoArgs),

    /// Re-export a level with freshly computed land and water values
    Rebuild(rebuild::RebuildArgs),

    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}

/// The project a command runs against.
#[derive(Debug, Clone)]
pub struct Project {
    /// Directory relative paths in the config resolve against.
    pub root: PathBuf,
    pub config: Config,
}

impl Project {
    /// Load the project from an explicit config file, or from `shoal.yaml`
    /// in the current directory, falling back to defaults.
    pub fn load(config: Option<&Path>) -> Result<Self> {
        match config {
            Some(path) => Ok(Self {
                root: path
                    .parent()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| PathBuf::from(".")),
                config: Config::load(path)?,
            }),
            None => Self::discover(Path::new(".")),
        }
    }

    /// Project rooted at `dir`, using its `shoal.yaml` if there is one.
    pub fn discover(dir: &Path) -> Result<Self> {
        Ok(Self {
            root: dir.to_path_buf(),
            config: Config::load_or_default(dir)?,
        })
    }

    /// The configured levels directory.
    pub fn levels_dir(&self) -> PathBuf {
        self.root.join(&self.config.levels_dir)
    }
}
