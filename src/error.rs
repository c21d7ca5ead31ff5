use std::path::PathBuf;

use thiserror::Error;

/// Unified error type for oam-tag operations
#[derive(Error, Debug)]
pub enum OamTagError {
    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Malformed base version in {path}: '{content}' (expected <major>.<minor>)")]
    MalformedBaseVersion { path: PathBuf, content: String },

    #[error("Manifest not found: {0}")]
    ManifestNotFound(PathBuf),

    #[error("No component block '- name: {service}' in {path}")]
    ServiceBlockNotFound { service: String, path: PathBuf },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in oam-tag
pub type Result<T> = std::result::Result<T, OamTagError>;

impl OamTagError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        OamTagError::Config(msg.into())
    }

    /// Wrap an I/O failure that happened while writing `path`
    pub fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        OamTagError::Write {
            path: path.into(),
            source,
        }
    }
}
