//! Persistence for the base version file, plus the atomic write used for
//! every file oam-tag modifies.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::Path;

use tempfile::NamedTempFile;

use crate::domain::BaseVersion;
use crate::error::{OamTagError, Result};

/// Result of reading the base version file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadedVersion {
    /// Parsed from the file
    Stored(BaseVersion),
    /// The file does not exist, so the default `1.1` applies
    Default(BaseVersion),
}

impl LoadedVersion {
    pub fn version(&self) -> BaseVersion {
        match self {
            LoadedVersion::Stored(v) | LoadedVersion::Default(v) => *v,
        }
    }
}

/// Read the base version stored at `path`.
///
/// # Returns
/// * `Ok(LoadedVersion::Stored)` - The file holds `<major>.<minor>`
/// * `Ok(LoadedVersion::Default)` - The file does not exist
/// * `Err(MalformedBaseVersion)` - The file holds anything else
pub fn load_base_version(path: &Path) -> Result<LoadedVersion> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Ok(LoadedVersion::Default(BaseVersion::default()))
        }
        Err(e) => return Err(e.into()),
    };

    content
        .parse::<BaseVersion>()
        .map(LoadedVersion::Stored)
        .map_err(|_| OamTagError::MalformedBaseVersion {
            path: path.to_path_buf(),
            content: content.trim().to_string(),
        })
}

/// Overwrite the base version file with `<major>.<minor>`
pub fn save_base_version(path: &Path, version: &BaseVersion) -> Result<()> {
    write_atomic(path, format!("{}\n", version).as_bytes())
}

/// Replace `path` with `contents` so that readers see either the old or the
/// new file, never a partial one.
///
/// The data is written to a temporary file next to `path` and renamed over
/// it. On failure the temporary file is removed when it is dropped.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| OamTagError::write(path, e))?;

    if let Ok(metadata) = fs::metadata(path) {
        tmp.as_file()
            .set_permissions(metadata.permissions())
            .map_err(|e| OamTagError::write(path, e))?;
    }

    tmp.write_all(contents)
        .and_then(|_| tmp.as_file().sync_all())
        .map_err(|e| OamTagError::write(path, e))?;

    tmp.persist(path)
        .map_err(|e| OamTagError::write(path, e.error))?;

    Ok(())
}
