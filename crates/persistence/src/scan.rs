//! Input-directory discovery.

use crate::error::Result;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};

/// Event files of the 2024 PbPb production for run 274156, chunks 0..499.
pub const DEFAULT_PATTERN: &str = r"^00274156_00000[0-4][0-9][0-9]_1\.tuple_pbpb2024\.evs$";

/// Regular files in `dir` whose name matches `pattern`, sorted by path.
/// Subdirectories are skipped without descending into them.
pub fn filtered_files(dir: impl AsRef<Path>, pattern: &Regex) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            tracing::debug!(path = %entry.path().display(), "skipping non-UTF-8 file name");
            continue;
        };
        if pattern.is_match(name) {
            files.push(entry.path());
        }
    }
    files.sort();
    Ok(files)
}
