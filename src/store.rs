//! Level files on disk.
//!
//! Exports are written as `level_YYYYMMDD_HHMMSS.txt` (UTC) and never
//! overwrite an existing file.

use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::{debug, info};
use walkdir::WalkDir;

use crate::config::Config;
use crate::document::LevelDocument;
use crate::error::{LevelError, Result};
use crate::parser::parse_level;

/// Extension of level files.
pub const LEVEL_EXTENSION: &str = "txt";

/// A directory of level files.
#[derive(Debug, Clone)]
pub struct LevelStore {
    dir: PathBuf,
}

impl LevelStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The store for a project's configured levels directory.
    pub fn for_project(root: &Path, config: &Config) -> Self {
        Self::new(root.join(&config.levels_dir))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write `doc` to a file named after `time`.
    ///
    /// Fails with `ExportConflict` if that file already exists; nothing is
    /// written in that case.
    pub fn export(&self, doc: &LevelDocument, time: SystemTime) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.dir).map_err(|e| LevelError::Io {
            path: self.dir.clone(),
            message: format!("Failed to create levels directory: {}", e),
        })?;

        let path = self.dir.join(level_file_name(time));
        let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                return Err(LevelError::ExportConflict { path });
            }
            Err(e) => {
                return Err(LevelError::Io {
                    path,
                    message: format!("Failed to create level file: {}", e),
                })
            }
        };

        file.write_all(doc.to_text().as_bytes())
            .map_err(|e| LevelError::Io {
                path: path.clone(),
                message: format!("Failed to write level: {}", e),
            })?;

        info!(path = %path.display(), "wrote level");
        Ok(path)
    }

    /// Write `doc` to a file named after the current time.
    pub fn export_now(&self, doc: &LevelDocument) -> Result<PathBuf> {
        self.export(doc, SystemTime::now())
    }

    /// Level files in this store, sorted by path.
    pub fn levels(&self) -> Vec<PathBuf> {
        scan(&[self.dir.clone()], &Config::default())
    }
}

/// Read and decode a level file.
pub fn load(path: &Path) -> Result<LevelDocument> {
    let source = std::fs::read_to_string(path).map_err(|e| LevelError::Io {
        path: path.to_path_buf(),
        message: format!("Failed to read level: {}", e),
    })?;
    debug!(path = %path.display(), bytes = source.len(), "loaded level");
    parse_level(&source)
}

/// Collect level files from a mix of files and directories.
///
/// Files are taken as given; directories are walked recursively for
/// `*.txt`. The result is sorted and free of duplicates.
pub fn scan(paths: &[PathBuf], config: &Config) -> Vec<PathBuf> {
    let mut found = Vec::new();

    for root in paths {
        if root.is_file() {
            found.push(root.clone());
            continue;
        }

        for entry in WalkDir::new(root)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if !entry.file_type().is_file() || config.is_excluded(path) {
                continue;
            }
            if path.extension().is_some_and(|ext| ext == LEVEL_EXTENSION) {
                found.push(path.to_path_buf());
            }
        }
    }

    found.sort();
    found.dedup();
    found
}

/// `level_YYYYMMDD_HHMMSS.txt` for a UTC time.
///
/// Names use UTC rather than the local clock, so the same moment gives the
/// same name on every machine and names sort in export order across a
/// daylight-saving change.
pub fn level_file_name(time: SystemTime) -> String {
    let secs = match time.duration_since(UNIX_EPOCH) {
        Ok(d) => d.as_secs() as i64,
        Err(e) => -(e.duration().as_secs() as i64),
    };

    let days = secs.div_euclid(86_400);
    let rem = secs.rem_euclid(86_400);
    let (year, month, day) = civil_from_days(days);

    format!(
        "level_{:04}{:02}{:02}_{:02}{:02}{:02}.{}",
        year,
        month,
        day,
        rem / 3600,
        (rem % 3600) / 60,
        rem % 60,
        LEVEL_EXTENSION
    )
}

/// Gregorian date for a count of days since 1970-01-01.
fn civil_from_days(days: i64) -> (i64, u32, u32) {
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z.rem_euclid(146_097);
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = (doy - (153 * mp + 2) / 5 + 1) as u32;
    let month = (if mp < 10 { mp + 3 } else { mp - 9 }) as u32;
    let year = yoe + era * 400 + i64::from(month <= 2);
    (year, month, day)
}
