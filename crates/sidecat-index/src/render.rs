//! Rendering a category index into a sorted folder hierarchy.
//!
//! The produced tree has, from the root down:
//!
//! 1. one folder per media kind, only when more than one kind has content
//!    (Video, Audio, Image order);
//! 2. one folder per master category, only when the kind has more than one;
//! 3. one folder per category type, by name;
//! 4. one folder per category value, by value;
//! 5. the resources filed under that value, by case-insensitive display name.
//!
//! Rendering never mutates the index, so rendering an unchanged index
//! twice yields identical trees.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use itertools::Itertools;
use serde::Serialize;

use sidecat_core::{DEFAULT_ROOT_NAME, MediaKind, ResourceRef};

use crate::category::CategoryType;
use crate::index::CategoryIndex;

/// A node in a rendered tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "node", rename_all = "snake_case")]
pub enum Node {
    Folder(Folder),
    Resource(ResourceRef),
}

impl Node {
    pub fn name(&self) -> &str {
        match self {
            Node::Folder(folder) => &folder.name,
            Node::Resource(resource) => &resource.name,
        }
    }

    pub fn as_folder(&self) -> Option<&Folder> {
        match self {
            Node::Folder(folder) => Some(folder),
            Node::Resource(_) => None,
        }
    }

    pub fn as_resource(&self) -> Option<&ResourceRef> {
        match self {
            Node::Folder(_) => None,
            Node::Resource(resource) => Some(resource),
        }
    }
}

/// A named folder of rendered nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Folder {
    pub name: String,
    pub children: Vec<Node>,
}

impl Folder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            children: Vec::new(),
        }
    }

    /// Direct child folders.
    pub fn folders(&self) -> impl Iterator<Item = &Folder> {
        self.children.iter().filter_map(Node::as_folder)
    }

    /// Direct child resources.
    pub fn resources(&self) -> impl Iterator<Item = &ResourceRef> {
        self.children.iter().filter_map(Node::as_resource)
    }

    /// Direct child folder named `name`.
    pub fn folder(&self, name: &str) -> Option<&Folder> {
        self.folders().find(|folder| folder.name == name)
    }

    /// Follow a path of folder names from this folder.
    pub fn descend(&self, path: &[&str]) -> Option<&Folder> {
        path.iter().try_fold(self, |folder, name| folder.folder(name))
    }

    /// Names of direct children, in order.
    pub fn child_names(&self) -> Vec<&str> {
        self.children.iter().map(Node::name).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Every resource leaf, depth-first in render order, each path listed once.
    pub fn unique_resources(&self) -> Vec<&ResourceRef> {
        let mut seen = HashSet::new();
        let mut leaves = Vec::new();
        self.collect_resources(&mut seen, &mut leaves);
        leaves
    }

    /// `(display name, absolute path)` of every resource leaf, in the
    /// order of [`Folder::unique_resources`].
    pub fn leaf_resources(&self) -> Vec<(String, PathBuf)> {
        self.unique_resources()
            .into_iter()
            .map(|resource| (resource.name.to_string(), resource.path.clone()))
            .collect()
    }

    fn collect_resources<'a>(
        &'a self,
        seen: &mut HashSet<&'a Path>,
        leaves: &mut Vec<&'a ResourceRef>,
    ) {
        for child in &self.children {
            match child {
                Node::Folder(folder) => folder.collect_resources(seen, leaves),
                Node::Resource(resource) => {
                    if seen.insert(resource.path.as_path()) {
                        leaves.push(resource);
                    }
                }
            }
        }
    }
}

/// Renders a [`CategoryIndex`] into a [`Folder`] tree.
#[derive(Debug, Clone)]
pub struct TreeRenderer {
    root_name: String,
}

impl TreeRenderer {
    pub fn new() -> Self {
        Self::with_root_name(DEFAULT_ROOT_NAME)
    }

    pub fn with_root_name(root_name: impl Into<String>) -> Self {
        Self {
            root_name: root_name.into(),
        }
    }

    /// Render every media kind with content under one root folder.
    pub fn render(&self, index: &CategoryIndex) -> Folder {
        let mut root = Folder::new(self.root_name.clone());
        let kinds = index.kinds_with_content();

        if let [kind] = kinds.as_slice() {
            root.children = render_kind(index, *kind);
            return root;
        }

        for kind in kinds {
            let mut section = Folder::new(kind.display_name());
            section.children = render_kind(index, kind);
            root.children.push(Node::Folder(section));
        }
        root
    }
}

impl Default for TreeRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Render the folders for one media kind.
///
/// Master category folders are only produced when there is more than one
/// master; otherwise category type folders are returned directly.
pub fn render_kind(index: &CategoryIndex, kind: MediaKind) -> Vec<Node> {
    let masters = index.master_categories(kind);
    let nest_masters = masters.len() > 1;
    let mut nodes = Vec::new();

    for master in masters {
        let Some(types) = index.category_types(kind, master) else {
            continue;
        };
        let type_folders = types
            .values()
            .map(|category| Node::Folder(render_category_type(category)));

        if nest_masters {
            let mut master_folder = Folder::new(master);
            master_folder.children.extend(type_folders);
            nodes.push(Node::Folder(master_folder));
        } else {
            nodes.extend(type_folders);
        }
    }
    nodes
}

/// Render one category type: a folder per value holding its resources.
pub fn render_category_type(category: &CategoryType) -> Folder {
    let mut folder = Folder::new(category.name());
    for (value, resources) in category.entries() {
        let mut value_folder = Folder::new(value);
        value_folder.children = resources
            .iter()
            .cloned()
            .sorted_by(|a, b| a.sort_key().cmp(b.sort_key()))
            .map(Node::Resource)
            .collect();
        folder.children.push(Node::Folder(value_folder));
    }
    folder
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(path: &str, kind: MediaKind) -> ResourceRef {
        ResourceRef::file(path, kind)
    }

    #[test]
    fn test_single_kind_attaches_to_root() {
        let mut index = CategoryIndex::new();
        index
            .register(MediaKind::Video, None, "Genre", "Action", file("/lib/a.mp4", MediaKind::Video))
            .unwrap();

        let tree = TreeRenderer::new().render(&index);
        assert_eq!(tree.name, DEFAULT_ROOT_NAME);
        assert_eq!(tree.child_names(), vec!["Genre"]);
        let action = tree.descend(&["Genre", "Action"]).unwrap();
        assert_eq!(action.child_names(), vec!["a.mp4"]);
    }

    #[test]
    fn test_multiple_kinds_get_sections() {
        let mut index = CategoryIndex::new();
        index
            .register(MediaKind::Image, None, "Event", "Wedding", file("/p/w.jpg", MediaKind::Image))
            .unwrap();
        index
            .register(MediaKind::Audio, None, "Genre", "Rock", file("/m/r.mp3", MediaKind::Audio))
            .unwrap();
        index
            .register(MediaKind::Video, None, "Genre", "Action", file("/v/a.mp4", MediaKind::Video))
            .unwrap();

        let tree = TreeRenderer::with_root_name("root").render(&index);
        assert_eq!(tree.child_names(), vec!["Videos", "Music", "Photos"]);
        assert!(tree.descend(&["Music", "Genre", "Rock"]).is_some());
    }

    #[test]
    fn test_multiple_masters_nest() {
        let mut index = CategoryIndex::new();
        let movie = file("/lib/a.mp4", MediaKind::Video);
        index
            .register(MediaKind::Video, Some("Library B"), "Genre", "Action", movie.clone())
            .unwrap();
        index
            .register(MediaKind::Video, Some("Library A"), "Year", "1999", movie)
            .unwrap();

        let tree = TreeRenderer::new().render(&index);
        assert_eq!(tree.child_names(), vec!["Library A", "Library B"]);
        assert!(tree.descend(&["Library A", "Year", "1999"]).is_some());
    }

    #[test]
    fn test_resources_sorted_case_insensitively() {
        let mut category = CategoryType::new("Genre");
        for name in ["b.mp4", "C.mp4", "a.mp4"] {
            category
                .add_resource(file(&format!("/lib/{name}"), MediaKind::Video), "Action")
                .unwrap();
        }

        let folder = render_category_type(&category);
        let action = folder.folder("Action").unwrap();
        assert_eq!(action.child_names(), vec!["a.mp4", "b.mp4", "C.mp4"]);
        // The index keeps insertion order.
        assert_eq!(category.resources("Action").unwrap()[0].name.as_str(), "b.mp4");
    }

    #[test]
    fn test_leaf_resources_unique_by_path() {
        let mut index = CategoryIndex::new();
        let movie = file("/lib/a.mp4", MediaKind::Video);
        index
            .register(MediaKind::Video, None, "Genre", "Action", movie.clone())
            .unwrap();
        index
            .register(MediaKind::Video, None, "Genre", "Comedy", movie)
            .unwrap();

        let tree = TreeRenderer::new().render(&index);
        assert_eq!(
            tree.leaf_resources(),
            vec![("a.mp4".to_string(), PathBuf::from("/lib/a.mp4"))]
        );
    }

    #[test]
    fn test_empty_index_renders_empty_root() {
        let tree = TreeRenderer::new().render(&CategoryIndex::new());
        assert!(tree.is_empty());
    }
}
