//! File utility functions.

use crate::error::{ImportError, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Recursively find files with the given extension under a directory,
/// sorted by path.
pub fn find_files_with_extension(dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(ImportError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("Directory not found: {}", dir.display()),
        )));
    }

    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| {
            e.path()
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case(extension))
        })
        .map(|e| e.into_path())
        .collect();
    files.sort();
    Ok(files)
}

/// Read a UTF-8 file, naming the path in the error.
pub fn read_utf8_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| {
        ImportError::Io(std::io::Error::new(
            e.kind(),
            format!("Failed to read {}: {}", path.display(), e),
        ))
    })
}
