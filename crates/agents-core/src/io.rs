use crate::error::{InstallerError, Result};
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Atomically write `data` to `path` using a tempfile in the same directory.
/// Parent directories are created first; an existing file is replaced.
pub fn atomic_write(path: &Path, data: &[u8]) -> Result<()> {
    write_in_place(path, data).map_err(|source| InstallerError::Write {
        path: path.display().to_string(),
        source,
    })
}

fn write_in_place(path: &Path, data: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(data)?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Create a directory and all parents, idempotent.
pub fn ensure_dir(path: &Path) -> Result<()> {
    std::fs::create_dir_all(path).map_err(|source| InstallerError::CreateDir {
        path: path.display().to_string(),
        source,
    })
}

/// Read a text file. Invalid UTF-8 is reported as `Ok(None)` so callers can
/// treat it as a per-file parse failure instead of a fatal I/O error.
pub fn read_text(path: &Path) -> Result<Option<String>> {
    match std::fs::read_to_string(path) {
        Ok(text) => Ok(Some(text)),
        Err(e) if e.kind() == std::io::ErrorKind::InvalidData => Ok(None),
        Err(e) => Err(e.into()),
    }
}
