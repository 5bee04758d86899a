//! Error types for indexing operations.

use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors reading a meta file.
///
/// Cloneable so parsed results can be cached and handed out more than once.
#[derive(Debug, Clone, Error)]
pub enum MetaError {
    /// Meta file does not exist.
    #[error("Meta file not found: {path}")]
    NotFound { path: PathBuf },

    /// Permission denied for a meta file.
    #[error("Permission denied: {path}")]
    PermissionDenied { path: PathBuf },

    /// Generic I/O error.
    #[error("I/O error reading meta file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: Arc<std::io::Error>,
    },
}

impl MetaError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied { path },
            std::io::ErrorKind::NotFound => Self::NotFound { path },
            _ => Self::Io {
                path,
                source: Arc::new(source),
            },
        }
    }

    /// Path of the meta file that failed.
    pub fn path(&self) -> &PathBuf {
        match self {
            Self::NotFound { path } | Self::PermissionDenied { path } | Self::Io { path, .. } => {
                path
            }
        }
    }
}

/// Contract violations when registering resources in the index.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IndexError {
    /// Category value was empty after trimming.
    #[error("Empty category value for category type '{category_type}'")]
    EmptyCategoryValue { category_type: String },

    /// Category type name was empty after trimming.
    #[error("Empty category type name")]
    EmptyCategoryType,
}

/// Errors that abort scanning a root directory.
#[derive(Debug, Error)]
pub enum ScanError {
    /// Permission denied for a path.
    #[error("Permission denied: {path}")]
    PermissionDenied { path: PathBuf },

    /// Path not found.
    #[error("Path not found: {path}")]
    NotFound { path: PathBuf },

    /// Generic I/O error.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Root path is not a directory.
    #[error("Root path is not a directory: {path}")]
    NotADirectory { path: PathBuf },

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// The walker tried an invalid index registration.
    #[error(transparent)]
    Index(#[from] IndexError),
}

impl ScanError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied { path },
            std::io::ErrorKind::NotFound => Self::NotFound { path },
            _ => Self::Io { path, source },
        }
    }
}

/// Errors loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read.
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for this schema.
    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// A setting failed validation.
    #[error("Invalid configuration: {message}")]
    Invalid { message: String },
}

/// Kind of scan warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WarningKind {
    /// Error reading a directory entry.
    ReadError,
    /// Meta file could not be opened or read.
    UnreadableMeta,
    /// Meta file parsed but defines no categories.
    EmptyMeta,
    /// Folder meta file found in a folder without media.
    EmptyFolder,
    /// A configured root could not be scanned.
    SkippedRoot,
}

/// Non-fatal warning encountered during scan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanWarning {
    /// Path where the warning occurred.
    pub path: PathBuf,
    /// Human-readable message.
    pub message: String,
    /// Kind of warning.
    pub kind: WarningKind,
}

impl ScanWarning {
    /// Create a new scan warning.
    pub fn new(path: impl Into<PathBuf>, message: impl Into<String>, kind: WarningKind) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
            kind,
        }
    }

    /// Create a warning for a meta file that failed to load.
    pub fn unreadable_meta(error: &MetaError) -> Self {
        Self {
            path: error.path().clone(),
            message: error.to_string(),
            kind: WarningKind::UnreadableMeta,
        }
    }

    /// Create a warning for a meta file without categories.
    pub fn empty_meta(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            message: format!("Meta file does not define any categories: {}", path.display()),
            path,
            kind: WarningKind::EmptyMeta,
        }
    }

    /// Create a warning for a folder meta file with nothing to reference.
    pub fn empty_folder(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            message: format!(
                "Folder meta file does not have any content to reference: {}",
                path.display()
            ),
            path,
            kind: WarningKind::EmptyFolder,
        }
    }

    /// Create a read error warning.
    pub fn read_error(path: impl Into<PathBuf>, error: impl std::fmt::Display) -> Self {
        let path = path.into();
        Self {
            message: format!("Read error: {error}"),
            path,
            kind: WarningKind::ReadError,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meta_error_io() {
        let err = MetaError::io(
            "/lib/a.mp4.meta",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert!(matches!(err, MetaError::NotFound { .. }));
        assert_eq!(err.path(), &PathBuf::from("/lib/a.mp4.meta"));
    }

    #[test]
    fn test_scan_error_io() {
        let err = ScanError::io(
            "/test/path",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(matches!(err, ScanError::PermissionDenied { .. }));
    }

    #[test]
    fn test_warning_creation() {
        let warning = ScanWarning::empty_meta("/lib/folder.meta");
        assert_eq!(warning.kind, WarningKind::EmptyMeta);
        assert!(warning.message.contains("folder.meta"));

        let err = MetaError::io(
            "/lib/x.meta",
            std::io::Error::new(std::io::ErrorKind::Other, "boom"),
        );
        let warning = ScanWarning::unreadable_meta(&err);
        assert_eq!(warning.kind, WarningKind::UnreadableMeta);
        assert!(warning.message.contains("boom"));

        let warning = ScanWarning::read_error("/lib/locked", "Permission denied");
        assert_eq!(warning.kind, WarningKind::ReadError);
        assert_eq!(warning.message, "Read error: Permission denied");
    }
}
