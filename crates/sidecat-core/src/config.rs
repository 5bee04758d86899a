//! Library configuration types.

use std::path::{Path, PathBuf};

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Default name of the folder-level meta file.
pub const DEFAULT_FOLDER_META_NAME: &str = "folder.meta";

/// Default extension appended to media file names to find their meta file.
pub const DEFAULT_META_EXTENSION: &str = "meta";

/// Default name of the rendered root folder.
pub const DEFAULT_ROOT_NAME: &str = "Categories";

/// Configuration for building a category library.
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
#[serde(default)]
pub struct LibraryConfig {
    /// Shared directories to scan (empty = all filesystem roots).
    #[builder(default)]
    pub shared_directories: Vec<PathBuf>,

    /// Fallback folder searched for `<file>.meta` when none sits beside the file.
    #[builder(default)]
    pub alternate_meta_folder: Option<PathBuf>,

    /// Fallback folder searched for thumbnails.
    #[builder(default)]
    pub alternate_thumbnail_folder: Option<PathBuf>,

    /// Name of the folder-level meta file.
    #[builder(default = "DEFAULT_FOLDER_META_NAME.to_string()")]
    pub folder_meta_name: String,

    /// Extension of per-file meta files.
    #[builder(default = "DEFAULT_META_EXTENSION.to_string()")]
    pub meta_extension: String,

    /// Name of the rendered root folder.
    #[builder(default = "DEFAULT_ROOT_NAME.to_string()")]
    pub root_name: String,

    /// Follow symbolic links.
    #[builder(default = "false")]
    pub follow_symlinks: bool,

    /// Include hidden files (starting with .).
    #[builder(default = "true")]
    pub include_hidden: bool,

    /// Maximum depth to traverse (None = unlimited).
    #[builder(default)]
    pub max_depth: Option<u32>,

    /// Patterns to ignore (glob syntax, matched against entry names).
    #[builder(default)]
    pub ignore_patterns: Vec<String>,

    /// Number of threads for directory listing (0 = auto-detect).
    #[builder(default = "0")]
    pub threads: usize,
}

impl LibraryConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        if let Some(name) = &self.folder_meta_name {
            if name.trim().is_empty() {
                return Err("Folder meta name cannot be empty".to_string());
            }
        }
        if let Some(ext) = &self.meta_extension {
            if ext.trim().is_empty() {
                return Err("Meta extension cannot be empty".to_string());
            }
        }
        Ok(())
    }
}

impl LibraryConfig {
    /// Create a new config builder.
    pub fn builder() -> LibraryConfigBuilder {
        LibraryConfigBuilder::default()
    }

    /// Create a simple config scanning the given directories.
    pub fn new<I, P>(shared_directories: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            shared_directories: shared_directories.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Parse a config from TOML text.
    pub fn from_toml_str(text: &str, origin: &Path) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: origin.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text, path)
    }

    /// Load the user's config file if it exists, otherwise the defaults.
    pub fn load_default() -> Result<Self, ConfigError> {
        match Self::default_path() {
            Some(path) if path.is_file() => Self::load(path),
            _ => Ok(Self::default()),
        }
    }

    /// Location of the user's config file.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("sidecat").join("config.toml"))
    }

    /// Check settings that deserialization cannot enforce.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.folder_meta_name.trim().is_empty() || self.meta_extension.trim().is_empty() {
            return Err(ConfigError::Invalid {
                message: "Meta file names cannot be empty".to_string(),
            });
        }
        Ok(())
    }

    /// Roots to scan: the shared directories, or every filesystem root.
    pub fn scan_roots(&self) -> Vec<PathBuf> {
        if self.shared_directories.is_empty() {
            filesystem_roots()
        } else {
            self.shared_directories.clone()
        }
    }

    /// File name of the per-file meta file for `media_path`.
    pub fn meta_file_name(&self, media_path: &Path) -> Option<String> {
        let name = media_path.file_name()?.to_string_lossy();
        Some(format!("{name}.{}", self.meta_extension))
    }
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            shared_directories: Vec::new(),
            alternate_meta_folder: None,
            alternate_thumbnail_folder: None,
            folder_meta_name: DEFAULT_FOLDER_META_NAME.to_string(),
            meta_extension: DEFAULT_META_EXTENSION.to_string(),
            root_name: DEFAULT_ROOT_NAME.to_string(),
            follow_symlinks: false,
            include_hidden: true,
            max_depth: None,
            ignore_patterns: Vec::new(),
            threads: 0,
        }
    }
}

/// All filesystem roots available on this machine.
#[cfg(unix)]
pub fn filesystem_roots() -> Vec<PathBuf> {
    vec![PathBuf::from("/")]
}

/// All filesystem roots available on this machine.
#[cfg(windows)]
pub fn filesystem_roots() -> Vec<PathBuf> {
    (b'A'..=b'Z')
        .map(|letter| PathBuf::from(format!("{}:\\", letter as char)))
        .filter(|root| root.is_dir())
        .collect()
}

/// All filesystem roots available on this machine.
#[cfg(not(any(unix, windows)))]
pub fn filesystem_roots() -> Vec<PathBuf> {
    Vec::new()
}
