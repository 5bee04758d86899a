//! Category index and hierarchy rendering for sidecat.
//!
//! The [`CategoryIndex`] accumulates (media kind, master category,
//! category type, category value, resource) facts during a scan. A
//! [`TreeRenderer`] later turns a populated index into a nested,
//! deterministically sorted [`Folder`] tree.
//!
//! ```rust
//! use sidecat_core::{MediaKind, ResourceRef};
//! use sidecat_index::{CategoryIndex, TreeRenderer};
//!
//! let mut index = CategoryIndex::new();
//! let movie = ResourceRef::file("/lib/MovieA.mp4", MediaKind::Video);
//! index
//!     .acquire_category_type(MediaKind::Video, None, "Genre")
//!     .add_resource(movie, "Action")
//!     .unwrap();
//!
//! let tree = TreeRenderer::new().render(&index);
//! assert!(tree.descend(&["Genre", "Action"]).is_some());
//! ```

mod category;
mod index;
mod render;

pub use category::CategoryType;
pub use index::{CategoryIndex, CategoryTypeMap, KindStats, MasterCategoryMap, UNCATEGORIZED};
pub use render::{Folder, Node, TreeRenderer, render_category_type, render_kind};

// Re-export core types
pub use sidecat_core::{IndexError, MediaKind, ResourceRef};
