//! New command implementation.
//!
//! Exports a level holding only the player and the sky handle, which is
//! what the editor starts from.

use std::time::SystemTime;

use clap::Args;

use crate::error::Result;
use crate::output::{display_path, Printer};
use crate::store::LevelStore;

use super::Project;

/// Export an empty level with default spawn positions
#[derive(Args, Debug)]
pub struct NewArgs {
    /// Print the level to stdout instead of writing a file
    #[arg(long)]
    pub stdout: bool,
}

pub fn run(args: NewArgs, project: &Project, printer: &Printer) -> Result<()> {
    run_at(args, project, printer, SystemTime::now()).map(|_| ())
}

/// Returns the level text and, unless printing, the file written.
fn run_at(
    args: NewArgs,
    project: &Project,
    printer: &Printer,
    time: SystemTime,
) -> Result<(String, Option<std::path::PathBuf>)> {
    let config = &project.config;
    let mut canvas = config.canvas();
    let doc = canvas.to_document(&config.catalog(), &config.variants())?;
    let text = doc.to_text();

    if args.stdout {
        println!("{}", text);
        return Ok((text, None));
    }

    let store = LevelStore::new(project.levels_dir());
    let path = store.export(&doc, time)?;
    printer.status("Created", &display_path(&path));
    Ok((text, Some(path)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CONFIG_FILE;
    use crate::error::LevelError;
    use std::time::{Duration, UNIX_EPOCH};
    use tempfile::tempdir;

    #[test]
    fn test_new_uses_configured_spawns() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE),
            "levels_dir: out\nplayer_start: [1, 2]\nsky_handle_start: [3, 4]\n",
        )
        .unwrap();
        let project = Project::discover(dir.path()).unwrap();
        let time = UNIX_EPOCH + Duration::from_secs(1_700_000_000);

        let (text, path) = run_at(NewArgs { stdout: false }, &project, &Printer::with_color(false), time).unwrap();

        let path = path.unwrap();
        assert_eq!(path, dir.path().join("out/level_20231114_221320.txt"));
        assert!(text.starts_with("{'player': {(1, 2): 'idle_right'}, 'sky_handle': {(3, 4): 'sky_handle'}"));
        assert_eq!(std::fs::read_to_string(path).unwrap(), text);
    }

    #[test]
    fn test_new_twice_in_one_second_conflicts() {
        let dir = tempdir().unwrap();
        let project = Project::discover(dir.path()).unwrap();
        let printer = Printer::with_color(false);
        let time = UNIX_EPOCH + Duration::from_secs(60);

        run_at(NewArgs { stdout: false }, &project, &printer, time).unwrap();
        let err = run_at(NewArgs { stdout: false }, &project, &printer, time).unwrap_err();
        assert!(matches!(err, LevelError::ExportConflict { .. }));
    }
}
