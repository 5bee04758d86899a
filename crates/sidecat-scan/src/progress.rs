//! Scan progress reporting.

use std::path::PathBuf;
use std::time::Duration;

/// Progress information during a scan.
#[derive(Debug, Clone)]
pub struct ScanProgress {
    /// Number of files listed so far.
    pub files_scanned: u64,
    /// Number of directories listed so far.
    pub dirs_scanned: u64,
    /// Number of meta files parsed so far.
    pub meta_files_parsed: u64,
    /// Path most recently visited.
    pub current_path: PathBuf,
    /// Number of warnings encountered.
    pub warnings_count: u64,
    /// Time elapsed since the scan started.
    pub elapsed: Duration,
}
