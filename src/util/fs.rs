//! Filesystem utilities.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Remove a directory and all its contents, if it exists.
///
/// Returns whether anything was removed.
pub fn remove_dir_all_if_exists(path: &Path) -> Result<bool> {
    if !path.exists() {
        return Ok(false);
    }
    fs::remove_dir_all(path)
        .with_context(|| format!("failed to remove directory: {}", path.display()))?;
    Ok(true)
}

/// Ensure a directory exists, creating it if necessary.
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)
            .with_context(|| format!("failed to create directory: {}", path.display()))?;
    }
    Ok(())
}

/// Size of a file in bytes.
pub fn file_size(path: &Path) -> Result<u64> {
    let meta = fs::metadata(path)
        .with_context(|| format!("failed to read metadata: {}", path.display()))?;
    Ok(meta.len())
}

/// Copy `src` into `dst_dir`, keeping its file name. Returns the new path.
pub fn copy_into(src: &Path, dst_dir: &Path) -> Result<PathBuf> {
    let name = src
        .file_name()
        .with_context(|| format!("not a file path: {}", src.display()))?;
    let dst = dst_dir.join(name);
    fs::copy(src, &dst).with_context(|| {
        format!("failed to copy {} to {}", src.display(), dst.display())
    })?;
    Ok(dst)
}

/// Mark a script as executable (`0o755`).
#[cfg(unix)]
pub fn make_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    fs::set_permissions(path, fs::Permissions::from_mode(0o755))
        .with_context(|| format!("failed to make {} executable", path.display()))
}

#[cfg(not(unix))]
pub fn make_executable(_path: &Path) -> Result<()> {
    Ok(())
}

/// Regular files directly inside `dir`, sorted by name, with their sizes.
///
/// A missing directory yields an empty list.
pub fn list_files(dir: &Path) -> Result<Vec<(String, u64)>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    for entry in fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
    {
        let entry = entry?;
        let meta = entry.metadata()?;
        if meta.is_file() {
            files.push((entry.file_name().to_string_lossy().into_owned(), meta.len()));
        }
    }

    files.sort();
    Ok(files)
}

/// Format a byte count the way the build summary shows it.
pub fn format_size(bytes: u64) -> String {
    format!("{:.2} MB", bytes as f64 / (1024.0 * 1024.0))
}
