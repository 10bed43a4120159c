//! Atomic artifact writing.
//!
//! Every artifact is written to a temporary sibling first and renamed into
//! place, so a reader never observes a half-written bundle or archive. A
//! plain output and its source map are committed together: if either write
//! fails, neither is left behind. Renames are not transactional, so a file
//! the pair replaces is gone once the first rename lands.
//!
//! Output paths are resolved against the project root and must stay inside it.

use std::fs;
use std::path::{Path, PathBuf};

use path_clean::PathClean;

use crate::archive::Archive;
use crate::model::Bundle;
use crate::{Error, Result};

/// Resolve an output path against the project root.
///
/// # Security
///
/// Rejects paths that escape `root` after normalization, such as
/// `../../etc/passwd` or `dist/../../x`, and paths containing null bytes.
pub fn resolve_output_path(root: &Path, file: &Path) -> Result<PathBuf> {
    if file.to_string_lossy().contains('\0') {
        return Err(Error::InvalidOutputPath(
            "Filename contains null byte".to_string(),
        ));
    }

    let root = root.clean();
    let full_path = root.join(file).clean();

    if !full_path.starts_with(&root) {
        return Err(Error::InvalidOutputPath(format!(
            "Path '{}' escapes project root '{}' (resolved to '{}')",
            file.display(),
            root.display(),
            full_path.display()
        )));
    }

    Ok(full_path)
}

/// Write a bundle as a plain text file, prefixed by `banner` and a newline.
///
/// A source map carried by the bundle is written to `<path>.map`. When the
/// banner is a shebang the file is made executable (Unix only).
///
/// Returns the number of bytes written to `path`.
pub fn write_plain(path: &Path, banner: Option<&str>, bundle: &Bundle) -> Result<u64> {
    let contents = match banner {
        Some(banner) => format!("{}\n{}", banner, bundle.code),
        None => bundle.code.clone(),
    };

    let mut operations = vec![(path.to_path_buf(), contents.as_bytes())];
    if let Some(map) = &bundle.source_map {
        operations.push((source_map_path(path), map.as_bytes()));
    }

    write_files_atomic(&operations)?;

    if banner.is_some_and(|b| b.starts_with("#!")) {
        mark_executable(path)?;
    }

    Ok(contents.len() as u64)
}

/// Write an archive's encoded bytes to `path`.
///
/// Returns the number of bytes written.
pub fn write_archive(path: &Path, archive: &Archive) -> Result<u64> {
    write_files_atomic(&[(path.to_path_buf(), archive.payload())])?;
    Ok(archive.payload().len() as u64)
}

fn source_map_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".map");
    PathBuf::from(name)
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

/// Writes multiple files atomically with automatic rollback on failure.
///
/// Phase 1 writes every file to a `.tmp` sibling; phase 2 renames them into
/// place. Any failure removes the temporary files written so far, and a failed
/// rename also removes the targets already renamed into place.
fn write_files_atomic(operations: &[(PathBuf, &[u8])]) -> Result<()> {
    let mut temp_files = Vec::new();

    for (target_path, content) in operations {
        if let Some(parent) = target_path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                cleanup_temp_files(&temp_files);
                Error::WriteFailure(format!(
                    "Failed to create directory '{}': {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let temp = temp_path(target_path);
        fs::write(&temp, content).map_err(|e| {
            cleanup_temp_files(&temp_files);
            Error::WriteFailure(format!(
                "Failed to write temporary file '{}': {}",
                temp.display(),
                e
            ))
        })?;

        temp_files.push((temp, target_path.clone()));
    }

    for (committed, (temp, target_path)) in temp_files.iter().enumerate() {
        fs::rename(temp, target_path).map_err(|e| {
            cleanup_temp_files(&temp_files);
            remove_committed(&temp_files[..committed]);
            Error::WriteFailure(format!(
                "Failed to rename '{}' to '{}': {}",
                temp.display(),
                target_path.display(),
                e
            ))
        })?;
    }

    Ok(())
}

/// Best-effort cleanup; we're already in an error state.
fn cleanup_temp_files(temp_files: &[(PathBuf, PathBuf)]) {
    for (temp, _) in temp_files {
        if temp.exists() {
            if let Err(e) = fs::remove_file(temp) {
                tracing::warn!(
                    path = %temp.display(),
                    error = %e,
                    "failed to clean up temporary file"
                );
            }
        }
    }
}

fn remove_committed(committed: &[(PathBuf, PathBuf)]) {
    for (_, target_path) in committed {
        if let Err(e) = fs::remove_file(target_path) {
            tracing::warn!(
                path = %target_path.display(),
                error = %e,
                "failed to remove partially committed output"
            );
        }
    }
}

#[cfg(unix)]
fn mark_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let mut permissions = fs::metadata(path)?.permissions();
    permissions.set_mode(permissions.mode() | 0o111);
    fs::set_permissions(path, permissions)?;
    Ok(())
}

#[cfg(not(unix))]
fn mark_executable(_path: &Path) -> Result<()> {
    Ok(())
}
