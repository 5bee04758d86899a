//! Scan results: the built library and its report.

use std::path::PathBuf;
use std::time::{Duration, SystemTime};

use serde::Serialize;

use sidecat_core::{MediaKind, ScanWarning};
use sidecat_index::{CategoryIndex, Folder, TreeRenderer};

/// Counters collected while building a library.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanStats {
    /// Directories visited.
    pub dirs_scanned: u64,
    /// Video files found.
    pub video_files: u64,
    /// Audio files found.
    pub audio_files: u64,
    /// Image files found.
    pub image_files: u64,
    /// Files skipped because their kind is unknown.
    pub unknown_files: u64,
    /// Per-file meta files applied.
    pub file_meta_parsed: u64,
    /// Folder meta files applied.
    pub folder_meta_parsed: u64,
    /// Category facts newly registered in the index.
    pub facts_registered: u64,
}

impl ScanStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a classified file.
    pub fn record_file(&mut self, kind: MediaKind) {
        match kind {
            MediaKind::Video => self.video_files += 1,
            MediaKind::Audio => self.audio_files += 1,
            MediaKind::Image => self.image_files += 1,
            MediaKind::Unknown => self.unknown_files += 1,
        }
    }

    pub fn record_dir(&mut self) {
        self.dirs_scanned += 1;
    }

    /// Media files of indexable kinds.
    pub fn media_files(&self) -> u64 {
        self.video_files + self.audio_files + self.image_files
    }

    /// Files found of `kind`.
    pub fn files_of(&self, kind: MediaKind) -> u64 {
        match kind {
            MediaKind::Video => self.video_files,
            MediaKind::Audio => self.audio_files,
            MediaKind::Image => self.image_files,
            MediaKind::Unknown => self.unknown_files,
        }
    }

    /// Meta files applied, file and folder level together.
    pub fn meta_files_parsed(&self) -> u64 {
        self.file_meta_parsed + self.folder_meta_parsed
    }

    pub(crate) fn merge(&mut self, other: &ScanStats) {
        self.dirs_scanned += other.dirs_scanned;
        self.video_files += other.video_files;
        self.audio_files += other.audio_files;
        self.image_files += other.image_files;
        self.unknown_files += other.unknown_files;
        self.file_meta_parsed += other.file_meta_parsed;
        self.folder_meta_parsed += other.folder_meta_parsed;
        self.facts_registered += other.facts_registered;
    }
}

/// Summary of one library build.
#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    /// Roots that were scanned, canonicalized.
    pub roots: Vec<PathBuf>,
    pub stats: ScanStats,
    /// Non-fatal problems, in the order they were found.
    pub warnings: Vec<ScanWarning>,
    pub scan_duration: Duration,
    pub scanned_at: SystemTime,
}

impl ScanReport {
    pub(crate) fn new() -> Self {
        Self {
            roots: Vec::new(),
            stats: ScanStats::new(),
            warnings: Vec::new(),
            scan_duration: Duration::ZERO,
            scanned_at: SystemTime::now(),
        }
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Scan duration in words.
    pub fn duration_text(&self) -> String {
        format_duration(self.scan_duration)
    }
}

/// A populated category index together with the report of its build.
#[derive(Debug, Clone)]
pub struct Library {
    pub index: CategoryIndex,
    pub report: ScanReport,
    root_name: String,
}

impl Library {
    pub(crate) fn new(index: CategoryIndex, report: ScanReport, root_name: String) -> Self {
        Self {
            index,
            report,
            root_name,
        }
    }

    /// Render the index into a folder tree.
    pub fn render(&self) -> Folder {
        TreeRenderer::with_root_name(self.root_name.clone()).render(&self.index)
    }

    /// `(display name, absolute path)` of every rendered resource.
    pub fn leaf_resources(&self) -> Vec<(String, PathBuf)> {
        self.render().leaf_resources()
    }

    pub fn root_name(&self) -> &str {
        &self.root_name
    }
}

/// Describe a duration in words, at second or minute resolution.
pub fn format_duration(duration: Duration) -> String {
    let seconds = duration.as_secs();
    match seconds {
        0 => "less than a second".to_string(),
        1 => "one second".to_string(),
        2..=59 => format!("{seconds} seconds"),
        _ => match seconds / 60 {
            1 => "one minute".to_string(),
            minutes => format!("{minutes} minutes"),
        },
    }
}
