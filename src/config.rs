//! Project configuration (shoal.yaml) parsing.
//!
//! The configuration defines the grid tile size, where levels are written,
//! default spawn positions, the placeable catalog and, optionally, the set
//! of land variants the project has artwork for.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::canvas::{Canvas, DEFAULT_PLAYER_START, DEFAULT_SKY_HANDLE_START};
use crate::error::{LevelError, Result};
use crate::types::{Catalog, Pixel, VariantTable, COIN_TYPES, ENEMY_TYPES, PALM_TYPES, TILE_SIZE};

/// File name looked up in a project directory.
pub const CONFIG_FILE: &str = "shoal.yaml";

/// Project configuration loaded from shoal.yaml.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Edge length of a tile in pixels.
    pub tile_size: i32,

    /// Directory level files are exported to.
    pub levels_dir: PathBuf,

    /// Player position on a new level.
    pub player_start: [i32; 2],

    /// Sky handle position on a new level.
    pub sky_handle_start: [i32; 2],

    /// Registered land variant keys. Uses the blob set when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub land_variants: Option<Vec<String>>,

    /// Placeable item names.
    pub catalog: CatalogConfig,

    /// Patterns to skip when scanning for level files.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub excludes: Vec<String>,
}

/// Subtype lists for the catalog, in menu order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub coins: Vec<String>,
    pub enemies: Vec<String>,
    pub palms: Vec<String>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        fn owned(names: &[&str]) -> Vec<String> {
            names.iter().map(|s| s.to_string()).collect()
        }

        Self {
            coins: owned(&COIN_TYPES),
            enemies: owned(&ENEMY_TYPES),
            palms: owned(&PALM_TYPES),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tile_size: TILE_SIZE,
            levels_dir: PathBuf::from("levels"),
            player_start: [DEFAULT_PLAYER_START.x, DEFAULT_PLAYER_START.y],
            sky_handle_start: [DEFAULT_SKY_HANDLE_START.x, DEFAULT_SKY_HANDLE_START.y],
            land_variants: None,
            catalog: CatalogConfig::default(),
            excludes: vec![],
        }
    }
}

impl Config {
    /// Load configuration from a shoal.yaml file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| LevelError::Io {
            path: path.to_path_buf(),
            message: format!("Failed to read config: {}", e),
        })?;

        Self::parse(&content)
    }

    /// Parse configuration from a YAML string.
    pub fn parse(content: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(content).map_err(|e| LevelError::Config {
            message: format!("Invalid config: {}", e),
            help: Some(format!("Check {} syntax", CONFIG_FILE)),
        })?;
        config.check()?;
        Ok(config)
    }

    /// Load `shoal.yaml` from `dir`, or use defaults when there is none.
    pub fn load_or_default(dir: &Path) -> Result<Self> {
        let path = dir.join(CONFIG_FILE);
        if path.exists() {
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    fn check(&self) -> Result<()> {
        if self.tile_size <= 0 {
            return Err(LevelError::Config {
                message: format!("tile_size must be positive, got {}", self.tile_size),
                help: Some("The stock tile size is 64".to_string()),
            });
        }
        if let Some(dup) = first_duplicate(
            self.catalog
                .coins
                .iter()
                .chain(&self.catalog.enemies)
                .chain(&self.catalog.palms),
        ) {
            return Err(LevelError::Config {
                message: format!("catalog lists '{}' more than once", dup),
                help: Some("Subtype names must be unique across the catalog".to_string()),
            });
        }
        Ok(())
    }

    /// The catalog described by the `catalog` section.
    pub fn catalog(&self) -> Catalog {
        Catalog::from_lists(
            &self.catalog.coins,
            &self.catalog.enemies,
            &self.catalog.palms,
        )
    }

    /// The registered land variants.
    pub fn variants(&self) -> VariantTable {
        match &self.land_variants {
            Some(keys) => VariantTable::new(keys.iter().cloned()),
            None => VariantTable::blob(),
        }
    }

    /// An empty canvas with the configured tile size and spawn positions.
    pub fn canvas(&self) -> Canvas {
        Canvas::new(
            self.tile_size,
            Pixel::from(self.player_start),
            Pixel::from(self.sky_handle_start),
        )
    }

    /// Check if a path should be skipped based on exclude patterns.
    pub fn is_excluded(&self, path: &Path) -> bool {
        let path_str = path.to_string_lossy();
        self.excludes
            .iter()
            .any(|pattern| matches_pattern(&path_str, pattern))
    }

    /// Serialize back to YAML.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| LevelError::Config {
            message: format!("Failed to serialize config: {}", e),
            help: None,
        })
    }
}

fn first_duplicate<'a>(names: impl Iterator<Item = &'a String>) -> Option<&'a str> {
    let mut seen = std::collections::HashSet::new();
    names.map(String::as_str).find(|name| !seen.insert(*name))
}

/// Simple glob matching: `*.ext` matches a suffix, `dir/*` matches a
/// directory's contents, anything else matches as a substring.
fn matches_pattern(path: &str, pattern: &str) -> bool {
    if let Some(suffix) = pattern.strip_prefix('*') {
        if !suffix.contains('/') {
            return path.ends_with(suffix);
        }
    }

    if let Some(prefix) = pattern.strip_suffix("/*") {
        let prefix = prefix.trim_start_matches("**/");
        return path.starts_with(&format!("{}/", prefix))
            || path.contains(&format!("/{}/", prefix));
    }

    path.contains(pattern)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_minimal_config() {
        let config = Config::parse("levels_dir: maps").unwrap();

        assert_eq!(config.levels_dir, PathBuf::from("maps"));
        assert_eq!(config.tile_size, 64);
        assert_eq!(config.player_start, [200, 300]);
        assert!(config.land_variants.is_none());
    }

    #[test]
    fn test_parse_empty_config() {
        let config = Config::parse("").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_parse_full_config() {
        let yaml = r#"
tile_size: 32
levels_dir: data/levels
player_start: [10, 20]
sky_handle_start: [0, 400]
land_variants: [A, C, AC]
catalog:
  coins: [gold]
  enemies: [tooth, "big crab"]
  palms: [small]
excludes:
  - "*.bak"
  - "**/old/*"
"#;
        let config = Config::parse(yaml).unwrap();

        assert_eq!(config.tile_size, 32);
        assert_eq!(config.sky_handle_start, [0, 400]);
        assert_eq!(config.variants().len(), 3);

        let catalog = config.catalog();
        assert_eq!(catalog.len(), 2 + 1 + 2 + 2);
        assert!(catalog.find("enemy", "big_crab").is_some());

        let canvas = config.canvas();
        assert_eq!(canvas.tile_size(), 32);
        assert_eq!(canvas.player().displacement(), Pixel::new(10, 20));
    }

    #[test]
    fn test_invalid_tile_size() {
        let err = Config::parse("tile_size: 0").unwrap_err();
        assert!(err.to_string().contains("tile_size must be positive"));
    }

    #[test]
    fn test_duplicate_subtype() {
        let err = Config::parse("catalog:\n  coins: [gold, gold]").unwrap_err();
        assert!(err.to_string().contains("'gold' more than once"));
    }

    #[test]
    fn test_invalid_yaml() {
        let err = Config::parse("tile_size: [").unwrap_err();
        assert!(matches!(err, LevelError::Config { .. }));
    }

    #[test]
    fn test_default_variants_are_blob() {
        assert_eq!(Config::default().variants(), VariantTable::blob());
    }

    #[test]
    fn test_yaml_round_trip() {
        let config = Config::default();
        let yaml = config.to_yaml().unwrap();
        assert!(!yaml.contains("land_variants"));
        assert_eq!(Config::parse(&yaml).unwrap(), config);
    }

    #[test]
    fn test_is_excluded() {
        let config = Config {
            excludes: vec!["*.bak".to_string(), "**/old/*".to_string()],
            ..Default::default()
        };

        assert!(config.is_excluded(Path::new("levels/level_1.bak")));
        assert!(config.is_excluded(Path::new("levels/old/level_1.txt")));
        assert!(config.is_excluded(Path::new("old/level_1.txt")));
        assert!(!config.is_excluded(Path::new("levels/level_1.txt")));
    }

    #[test]
    fn test_load_or_default() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(Config::load_or_default(dir.path()).unwrap(), Config::default());

        std::fs::write(dir.path().join(CONFIG_FILE), "tile_size: 16").unwrap();
        assert_eq!(Config::load_or_default(dir.path()).unwrap().tile_size, 16);
    }
}
