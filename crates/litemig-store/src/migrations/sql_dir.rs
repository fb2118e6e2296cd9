//! Loading migration steps from a directory of SQL files
//!
//! Every `*.sql` file in the directory becomes one step. The file name
//! carries the transition: `<from>_<to>[_<name>].sql`, for example
//! `0000_0001_create_user.sql`. Files are taken in file-name order, which is
//! the order the runner scans them in.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use litemig_core::{MigrationStep, Version};
use rusqlite::Connection;

use crate::errors::{invalid_input, io_error, Result};
use crate::migrations::sql_step::sql_step;

const OP: &str = "load_sql_dir";

/// Transition encoded in a migration file name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepFileName<'a> {
    pub from: Version,
    pub to: Version,
    pub label: Option<&'a str>,
}

/// Parse a file stem of the form `<from>_<to>[_<label>]`
///
/// Versions are plain decimal digits. Returns `None` for anything else.
pub fn parse_step_file_name(stem: &str) -> Option<StepFileName<'_>> {
    let mut parts = stem.splitn(3, '_');
    let from = parse_version(parts.next()?)?;
    let to = parse_version(parts.next()?)?;
    let label = parts.next().filter(|l| !l.is_empty());
    Some(StepFileName { from, to, label })
}

fn parse_version(s: &str) -> Option<Version> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

/// Load every `*.sql` file under `dir` as a migration step
///
/// Each step is named after its file stem.
///
/// # Errors
///
/// - `Io` when the directory or a file cannot be read
/// - `InvalidInput` when a `.sql` file name does not encode a transition
pub fn load_sql_dir(dir: impl AsRef<Path>) -> Result<Vec<MigrationStep<Connection>>> {
    let dir = dir.as_ref();
    let entries = fs::read_dir(dir).map_err(|e| io_error(OP, e))?;
    let files = sql_files(entries.map(|entry| entry.map(|e| e.path())))?;

    let steps = files
        .iter()
        .map(|path| load_sql_file(path))
        .collect::<Result<Vec<_>>>()?;

    tracing::debug!(
        component = module_path!(),
        op = OP,
        dir = %dir.display(),
        steps = steps.len() as u64,
        "loaded migration steps"
    );
    Ok(steps)
}

/// Keep the `.sql` files among `entries`, sorted by path
///
/// The first entry that could not be read fails the whole listing.
fn sql_files(entries: impl Iterator<Item = io::Result<PathBuf>>) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| io_error(OP, e))?;
        if path.is_file() && path.extension().map(|ext| ext == "sql").unwrap_or(false) {
            files.push(path);
        }
    }
    // Sorted for determinism
    files.sort();
    Ok(files)
}

fn load_sql_file(path: &Path) -> Result<MigrationStep<Connection>> {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| invalid_input(OP, format!("{} has no UTF-8 file name", path.display())))?;

    let parsed = parse_step_file_name(stem).ok_or_else(|| {
        invalid_input(
            OP,
            format!(
                "{} is not named <from>_<to>[_<name>].sql",
                path.display()
            ),
        )
    })?;

    let sql = fs::read_to_string(path).map_err(|e| io_error(OP, e))?;
    Ok(sql_step(parsed.from, parsed.to, stem, sql))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_with_label() {
        let parsed = parse_step_file_name("0000_0001_create_user").unwrap();
        assert_eq!(parsed.from, 0);
        assert_eq!(parsed.to, 1);
        assert_eq!(parsed.label, Some("create_user"));
    }

    #[test]
    fn test_parse_without_label() {
        let parsed = parse_step_file_name("3_4").unwrap();
        assert_eq!((parsed.from, parsed.to, parsed.label), (3, 4, None));
    }

    #[test]
    fn test_parse_trailing_underscore_has_no_label() {
        let parsed = parse_step_file_name("3_4_").unwrap();
        assert_eq!(parsed.label, None);
    }

    #[test]
    fn test_unreadable_entry_fails_listing() {
        let entries = vec![
            Ok(PathBuf::from("does_not_matter.sql")),
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "entry unreadable")),
        ];

        let err = sql_files(entries.into_iter()).unwrap_err();

        assert_eq!(err.kind(), litemig_core::ExErrorKind::Io);
        assert_eq!(err.op(), Some(OP));
        assert_eq!(err.message(), "entry unreadable");
    }

    #[test]
    fn test_sql_files_sorted_and_filtered() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["0001_0002.sql", "0000_0001.sql", "notes.txt"] {
            fs::write(dir.path().join(name), "").unwrap();
        }
        let entries = vec![
            Ok(dir.path().join("0001_0002.sql")),
            Ok(dir.path().join("notes.txt")),
            Ok(dir.path().join("0000_0001.sql")),
            Ok(dir.path().join("missing.sql")),
        ];

        let files = sql_files(entries.into_iter()).unwrap();

        assert_eq!(
            files,
            vec![dir.path().join("0000_0001.sql"), dir.path().join("0001_0002.sql")]
        );
    }

    #[test]
    fn test_parse_rejects_malformed_names() {
        assert_eq!(parse_step_file_name("create_user"), None);
        assert_eq!(parse_step_file_name("1"), None);
        assert_eq!(parse_step_file_name("1_x_label"), None);
        assert_eq!(parse_step_file_name("+1_2"), None);
        assert_eq!(parse_step_file_name("_1_2"), None);
        assert_eq!(parse_step_file_name("1_99999999999"), None);
    }
}
