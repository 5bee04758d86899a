//! Directory walking and meta file parsing for sidecat.
//!
//! This crate turns a set of shared directories into a populated
//! [`CategoryIndex`].
//!
//! # Overview
//!
//! Media files carry their categories in sidecar meta files:
//!
//! - `<file>.meta` beside a media file (or in the alternate meta folder)
//!   describes that file;
//! - `folder.meta` inside a directory describes the directory as a whole,
//!   optionally restricted to some media kinds with `Filter=...`.
//!
//! Each line is a `Type=Value` pair. The reserved `Master` key groups the
//! remaining facts under named master categories.
//!
//! - **Parallel listing** via jwalk
//! - **Parallel meta parsing** via rayon into a concurrent cache
//! - **Deterministic indexing** in a single sequential pass
//! - **Progress updates** via broadcast channels
//!
//! # Example
//!
//! ```rust,no_run
//! use sidecat_scan::{LibraryBuilder, LibraryConfig};
//!
//! let config = LibraryConfig::new(["/media/movies"]);
//! let library = LibraryBuilder::new(config).build().unwrap();
//!
//! println!("Indexed {} media files", library.report.stats.media_files());
//! for (name, path) in library.leaf_resources() {
//!     println!("{name}: {}", path.display());
//! }
//! ```
//!
//! # Progress Monitoring
//!
//! ```rust,no_run
//! use sidecat_scan::{LibraryBuilder, LibraryConfig};
//!
//! let builder = LibraryBuilder::new(LibraryConfig::default());
//! let mut progress_rx = builder.subscribe();
//!
//! std::thread::spawn(move || {
//!     while let Ok(progress) = progress_rx.blocking_recv() {
//!         println!("Listed {} files", progress.files_scanned);
//!     }
//! });
//! ```

mod cache;
mod directive;
mod encoding;
mod library;
mod meta;
mod progress;
mod walker;

pub use cache::MetaCache;
pub use directive::{Directives, FILTER_KEY, MASTER_KEY, resolve_filter, take_special};
pub use encoding::{Encoding, decode_text, sniff_bom};
pub use library::{Library, ScanReport, ScanStats, format_duration};
pub use meta::{CategoryMap, parse_meta_file, parse_meta_lines, parse_meta_str, title_case};
pub use progress::ScanProgress;
pub use walker::LibraryBuilder;

// Re-export core types for convenience
pub use sidecat_core::{
    KindSet, LibraryConfig, MediaClassifier, MediaKind, MetaError, ResourceRef, ScanError,
    ScanWarning, WarningKind,
};
pub use sidecat_index::{CategoryIndex, Folder, Node, TreeRenderer};
