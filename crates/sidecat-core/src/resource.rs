//! Shared handles to indexed media resources.

use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use compact_str::CompactString;
use serde::{Serialize, Serializer};

use crate::kind::{KindSet, MediaKind};

/// What a resource points at.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResourceKind {
    /// A single media file.
    File { kind: MediaKind },
    /// A directory aggregating every media file beneath it.
    Directory {
        kinds: KindSet,
        children: Vec<ResourceRef>,
    },
}

/// A concrete media file or an aggregated directory.
///
/// Resources are immutable once created and are shared between the
/// category index and any rendered tree through [`ResourceRef`].
#[derive(Debug, Clone, Serialize)]
pub struct Resource {
    /// Display name (file or directory name).
    pub name: CompactString,
    /// Absolute path on disk.
    pub path: PathBuf,
    #[serde(flatten)]
    pub kind: ResourceKind,
    #[serde(skip)]
    sort_key: String,
}

impl Resource {
    pub fn is_dir(&self) -> bool {
        matches!(self.kind, ResourceKind::Directory { .. })
    }

    /// Case-insensitive key used to order resources by display name.
    pub fn sort_key(&self) -> &str {
        &self.sort_key
    }

    /// Media kinds represented by this resource.
    pub fn kinds(&self) -> KindSet {
        match &self.kind {
            ResourceKind::File { kind } => [*kind].into_iter().collect(),
            ResourceKind::Directory { kinds, .. } => *kinds,
        }
    }

    /// Child resources of a directory (empty for files).
    pub fn children(&self) -> &[ResourceRef] {
        match &self.kind {
            ResourceKind::File { .. } => &[],
            ResourceKind::Directory { children, .. } => children,
        }
    }

    /// Number of media files contained, counting a file resource as one.
    pub fn file_count(&self) -> usize {
        match &self.kind {
            ResourceKind::File { .. } => 1,
            ResourceKind::Directory { children, .. } => {
                children.iter().map(|child| child.file_count()).sum()
            }
        }
    }

    /// Locate a thumbnail image for this resource.
    ///
    /// Files look for `<base>.png`, `<base>.jpg`, `<name>.cover.png` and
    /// `<name>.cover.jpg` beside themselves, then in `alternate_folder`,
    /// then fall back to `folder.png`/`folder.jpg` in their directory.
    /// Directories only look for `folder.png`/`folder.jpg` inside themselves.
    pub fn find_thumbnail(&self, alternate_folder: Option<&Path>) -> Option<PathBuf> {
        if self.is_dir() {
            return folder_thumbnail(&self.path);
        }

        let parent = self.path.parent()?;
        let file_name = self.path.file_name()?.to_string_lossy();
        let base_name = self
            .path
            .file_stem()
            .map(|stem| stem.to_string_lossy())
            .unwrap_or_else(|| file_name.clone());

        let candidates = [
            format!("{base_name}.png"),
            format!("{base_name}.jpg"),
            format!("{file_name}.cover.png"),
            format!("{file_name}.cover.jpg"),
        ];

        let search_dirs = std::iter::once(parent).chain(alternate_folder.filter(|p| p.is_dir()));
        for dir in search_dirs {
            if let Some(found) = candidates
                .iter()
                .map(|name| dir.join(name))
                .find(|path| path.is_file())
            {
                return Some(found);
            }
        }

        folder_thumbnail(parent)
    }
}

fn folder_thumbnail(dir: &Path) -> Option<PathBuf> {
    ["folder.png", "folder.jpg"]
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.is_file())
}

/// Shared, immutable handle to a [`Resource`].
///
/// Two handles are equal when they refer to the same allocation, or to
/// the same path with the same resource kind. This equality is the
/// de-duplication key inside a category.
#[derive(Debug, Clone)]
pub struct ResourceRef(Arc<Resource>);

impl ResourceRef {
    /// Create a handle for a single media file.
    pub fn file(path: impl Into<PathBuf>, kind: MediaKind) -> Self {
        let path = path.into();
        let name = display_name(&path);
        Self::from_parts(name, path, ResourceKind::File { kind })
    }

    /// Create a handle for a directory aggregating `children`.
    pub fn directory(path: impl Into<PathBuf>, kinds: KindSet, children: Vec<ResourceRef>) -> Self {
        let path = path.into();
        let name = display_name(&path);
        Self::from_parts(name, path, ResourceKind::Directory { kinds, children })
    }

    /// Create a handle with an explicit display name.
    pub fn from_parts(name: impl Into<CompactString>, path: PathBuf, kind: ResourceKind) -> Self {
        let name = name.into();
        let sort_key = name.as_str().to_lowercase();
        Self(Arc::new(Resource {
            name,
            path,
            kind,
            sort_key,
        }))
    }

    /// Whether both handles share one allocation.
    pub fn ptr_eq(&self, other: &ResourceRef) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

fn display_name(path: &Path) -> CompactString {
    path.file_name()
        .map(|name| CompactString::new(name.to_string_lossy()))
        .unwrap_or_else(|| CompactString::new(path.to_string_lossy()))
}

impl Deref for ResourceRef {
    type Target = Resource;

    fn deref(&self) -> &Resource {
        &self.0
    }
}

impl PartialEq for ResourceRef {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || (self.path == other.path && self.is_dir() == other.is_dir())
    }
}

impl Eq for ResourceRef {}

impl Serialize for ResourceRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_file_resource() {
        let resource = ResourceRef::file("/lib/MovieA.mp4", MediaKind::Video);
        assert_eq!(resource.name.as_str(), "MovieA.mp4");
        assert_eq!(resource.sort_key(), "moviea.mp4");
        assert!(!resource.is_dir());
        assert_eq!(resource.file_count(), 1);
    }

    #[test]
    fn test_equality_by_path_and_kind() {
        let a = ResourceRef::file("/lib/a.mp4", MediaKind::Video);
        let b = ResourceRef::file("/lib/a.mp4", MediaKind::Video);
        let c = ResourceRef::file("/lib/c.mp4", MediaKind::Video);
        assert_eq!(a, b);
        assert!(!a.ptr_eq(&b));
        assert_ne!(a, c);

        let dir = ResourceRef::directory("/lib/a.mp4", KindSet::empty(), Vec::new());
        assert_ne!(a, dir);
    }

    #[test]
    fn test_directory_aggregates() {
        let inner = ResourceRef::directory(
            "/lib/sub",
            [MediaKind::Audio].into_iter().collect(),
            vec![ResourceRef::file("/lib/sub/song.mp3", MediaKind::Audio)],
        );
        let kinds: KindSet = [MediaKind::Video, MediaKind::Audio].into_iter().collect();
        let outer = ResourceRef::directory(
            "/lib",
            kinds,
            vec![ResourceRef::file("/lib/a.mp4", MediaKind::Video), inner],
        );

        assert!(outer.is_dir());
        assert_eq!(outer.file_count(), 2);
        assert_eq!(outer.children().len(), 2);
        assert_eq!(outer.kinds(), kinds);
    }

    #[test]
    fn test_find_thumbnail() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::write(root.join("Movie.mp4"), "").unwrap();
        let resource = ResourceRef::file(root.join("Movie.mp4"), MediaKind::Video);

        assert_eq!(resource.find_thumbnail(None), None);

        fs::write(root.join("folder.jpg"), "").unwrap();
        assert_eq!(resource.find_thumbnail(None), Some(root.join("folder.jpg")));

        let alt = root.join("thumbs");
        fs::create_dir(&alt).unwrap();
        fs::write(alt.join("Movie.mp4.cover.png"), "").unwrap();
        assert_eq!(
            resource.find_thumbnail(Some(&alt)),
            Some(alt.join("Movie.mp4.cover.png"))
        );

        fs::write(root.join("Movie.png"), "").unwrap();
        assert_eq!(resource.find_thumbnail(Some(&alt)), Some(root.join("Movie.png")));
    }
}
