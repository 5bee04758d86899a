//! Core types and traits for sidecat.
//!
//! This crate provides the fundamental data structures shared by the
//! indexing and scanning crates: media kinds, the classifier seam,
//! resource handles, configuration and error types.

mod classify;
mod config;
mod error;
mod kind;
mod resource;

pub use classify::{
    AUDIO_EXTENSIONS, ExtensionClassifier, IMAGE_EXTENSIONS, MediaClassifier, VIDEO_EXTENSIONS,
};
pub use config::{
    DEFAULT_FOLDER_META_NAME, DEFAULT_META_EXTENSION, DEFAULT_ROOT_NAME, LibraryConfig,
    LibraryConfigBuilder, filesystem_roots,
};
pub use error::{ConfigError, IndexError, MetaError, ScanError, ScanWarning, WarningKind};
pub use kind::{KindSet, MediaKind};
pub use resource::{Resource, ResourceKind, ResourceRef};
