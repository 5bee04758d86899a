//! Mapping file paths to media kinds.

use std::path::Path;

use crate::kind::MediaKind;

pub const VIDEO_EXTENSIONS: &[&str] = &[
    "mp4", "m4v", "mov", "avi", "mkv", "wmv", "webm", "flv", "mpg", "mpeg", "3gp", "3g2", "ts",
    "mts", "m2ts", "vob", "divx", "ogv", "asf", "rm", "rmvb",
];

pub const AUDIO_EXTENSIONS: &[&str] = &[
    "mp3", "wav", "flac", "aac", "ogg", "oga", "opus", "wma", "m4a", "alac", "aiff", "aif", "ape",
    "mpc", "wv", "dsf", "mka",
];

pub const IMAGE_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "gif", "bmp", "tif", "tiff", "webp", "heic", "heif", "raw", "arw", "cr2",
    "nef", "orf", "raf", "dng",
];

/// Decides which media kind a file belongs to.
///
/// Implementations must be deterministic and stateless from the
/// scanner's point of view.
pub trait MediaClassifier: Send + Sync {
    fn classify(&self, path: &Path) -> MediaKind;
}

impl<F> MediaClassifier for F
where
    F: Fn(&Path) -> MediaKind + Send + Sync,
{
    fn classify(&self, path: &Path) -> MediaKind {
        self(path)
    }
}

/// Classifier driven by lower-cased file extensions.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExtensionClassifier;

impl ExtensionClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Classify a bare extension (without the dot).
    pub fn classify_extension(ext: &str) -> MediaKind {
        let ext = ext.to_ascii_lowercase();
        let ext = ext.as_str();
        if VIDEO_EXTENSIONS.contains(&ext) {
            MediaKind::Video
        } else if AUDIO_EXTENSIONS.contains(&ext) {
            MediaKind::Audio
        } else if IMAGE_EXTENSIONS.contains(&ext) {
            MediaKind::Image
        } else {
            MediaKind::Unknown
        }
    }
}

impl MediaClassifier for ExtensionClassifier {
    fn classify(&self, path: &Path) -> MediaKind {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(Self::classify_extension)
            .unwrap_or(MediaKind::Unknown)
    }
}
