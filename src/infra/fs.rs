//! Filesystem utilities for reading one-line metadata files and normalizing paths.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

/// Reads a file as UTF-8 and returns its first non-blank line, trimmed.
///
/// The whole file is read and the handle is dropped before returning, so no
/// descriptor outlives the call on any path.
///
/// # Returns
///
/// `Ok(Some(line))` for a file with content, `Ok(None)` for a file that is
/// empty or whitespace only, and the I/O error otherwise (including
/// `InvalidData` for non-UTF-8 content).
pub fn read_first_line<P: AsRef<Path>>(path: P) -> io::Result<Option<String>> {
    let content = fs::read_to_string(path.as_ref())?;

    Ok(content
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(str::to_string))
}

/// Resolves `path` to an absolute, canonical path.
///
/// Canonicalization failure is not fatal: the path is made absolute against
/// the current directory instead and the failure is logged.
pub fn absolutize<P: AsRef<Path>>(path: P) -> PathBuf {
    let path = path.as_ref();

    match path.canonicalize() {
        Ok(canonical) => canonical,
        Err(e) => {
            debug!(path = %path.display(), error = %e, "failed to canonicalize path");
            if path.is_absolute() {
                path.to_path_buf()
            } else {
                std::env::current_dir()
                    .map(|cwd| cwd.join(path))
                    .unwrap_or_else(|_| path.to_path_buf())
            }
        }
    }
}

/// Short human-readable reason for an I/O failure, used in error messages.
pub fn io_reason(e: &io::Error) -> String {
    match e.kind() {
        io::ErrorKind::NotFound => "file not found".to_string(),
        io::ErrorKind::PermissionDenied => "permission denied".to_string(),
        io::ErrorKind::InvalidData => "file is not valid UTF-8".to_string(),
        _ => e.to_string(),
    }
}
