//! The category index: media kind → master category → category type.

use std::collections::BTreeMap;

use serde::Serialize;

use sidecat_core::{IndexError, MediaKind, ResourceRef};

use crate::category::CategoryType;

/// Master category label used when a fact names no master.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Category types of one master category, keyed by type name.
pub type CategoryTypeMap = BTreeMap<String, CategoryType>;

/// Master categories of one media kind, keyed by master name.
pub type MasterCategoryMap = BTreeMap<String, CategoryTypeMap>;

/// Summary counts for one media kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct KindStats {
    pub masters: usize,
    pub category_types: usize,
    pub category_values: usize,
    pub resources: usize,
}

/// In-memory index of category facts gathered during a scan.
///
/// Created once per library build. [`CategoryIndex::reset`] clears it in
/// place before a rescan; rendered trees keep their own resource handles
/// and are unaffected.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryIndex {
    kinds: BTreeMap<MediaKind, MasterCategoryMap>,
}

impl CategoryIndex {
    pub fn new() -> Self {
        Self {
            kinds: MediaKind::ALL
                .into_iter()
                .map(|kind| (kind, MasterCategoryMap::new()))
                .collect(),
        }
    }

    /// Get or create the category type for (kind, master, type name).
    ///
    /// A missing master is filed under [`UNCATEGORIZED`]. Repeated calls
    /// with the same arguments return the same category type; its
    /// resources are never cleared by re-acquisition.
    pub fn acquire_category_type(
        &mut self,
        kind: MediaKind,
        master: Option<&str>,
        type_name: &str,
    ) -> &mut CategoryType {
        let master = master.unwrap_or(UNCATEGORIZED);
        self.kinds
            .entry(kind)
            .or_default()
            .entry(master.to_string())
            .or_default()
            .entry(type_name.to_string())
            .or_insert_with(|| CategoryType::new(type_name))
    }

    /// File `resource` under (kind, master, type name, value).
    ///
    /// Returns whether the resource was newly added.
    pub fn register(
        &mut self,
        kind: MediaKind,
        master: Option<&str>,
        type_name: &str,
        value: &str,
        resource: ResourceRef,
    ) -> Result<bool, IndexError> {
        if type_name.trim().is_empty() {
            return Err(IndexError::EmptyCategoryType);
        }
        if value.trim().is_empty() {
            return Err(IndexError::EmptyCategoryValue {
                category_type: type_name.to_string(),
            });
        }
        self.acquire_category_type(kind, master, type_name)
            .add_resource(resource, value)
    }

    /// True if at least one master category exists for `kind`.
    pub fn has_content(&self, kind: MediaKind) -> bool {
        self.kinds.get(&kind).is_some_and(|masters| !masters.is_empty())
    }

    /// Kinds that have content, in rendering order (Unknown excluded).
    pub fn kinds_with_content(&self) -> Vec<MediaKind> {
        MediaKind::INDEXABLE
            .into_iter()
            .filter(|kind| self.has_content(*kind))
            .collect()
    }

    /// Master category names for `kind`, ascending.
    pub fn master_categories(&self, kind: MediaKind) -> Vec<&str> {
        self.kinds
            .get(&kind)
            .map(|masters| masters.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Category type names under `master` for `kind`, ascending.
    ///
    /// `None` if the master category does not exist.
    pub fn categories_for_master(&self, kind: MediaKind, master: &str) -> Option<Vec<&str>> {
        self.category_types(kind, master)
            .map(|types| types.keys().map(String::as_str).collect())
    }

    /// Category types under `master` for `kind`.
    pub fn category_types(&self, kind: MediaKind, master: &str) -> Option<&CategoryTypeMap> {
        self.kinds.get(&kind)?.get(master)
    }

    /// Look up one category type without creating it.
    pub fn category_type(
        &self,
        kind: MediaKind,
        master: Option<&str>,
        type_name: &str,
    ) -> Option<&CategoryType> {
        self.category_types(kind, master.unwrap_or(UNCATEGORIZED))?
            .get(type_name)
    }

    /// Full master map for `kind`.
    pub fn master_map(&self, kind: MediaKind) -> Option<&MasterCategoryMap> {
        self.kinds.get(&kind)
    }

    /// Clear every kind bucket in place.
    pub fn reset(&mut self) {
        for masters in self.kinds.values_mut() {
            masters.clear();
        }
    }

    /// True if no kind has content.
    pub fn is_empty(&self) -> bool {
        self.kinds.values().all(BTreeMap::is_empty)
    }

    /// Summary counts for `kind`.
    pub fn stats(&self, kind: MediaKind) -> KindStats {
        let Some(masters) = self.kinds.get(&kind) else {
            return KindStats::default();
        };

        let mut stats = KindStats {
            masters: masters.len(),
            ..KindStats::default()
        };
        for category in masters.values().flat_map(BTreeMap::values) {
            stats.category_types += 1;
            stats.category_values += category.value_count();
            stats.resources += category.resource_count();
        }
        stats
    }
}

impl Default for CategoryIndex {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movie(name: &str) -> ResourceRef {
        ResourceRef::file(format!("/lib/{name}"), MediaKind::Video)
    }

    #[test]
    fn test_acquire_is_idempotent() {
        let mut index = CategoryIndex::new();
        index
            .acquire_category_type(MediaKind::Video, None, "Genre")
            .add_resource(movie("a.mp4"), "Action")
            .unwrap();

        let genre = index.acquire_category_type(MediaKind::Video, None, "Genre");
        assert_eq!(genre.name(), "Genre");
        assert_eq!(genre.resources("Action").unwrap().len(), 1);
    }

    #[test]
    fn test_missing_master_is_uncategorized() {
        let mut index = CategoryIndex::new();
        index.acquire_category_type(MediaKind::Audio, None, "Artist");

        assert_eq!(index.master_categories(MediaKind::Audio), vec![UNCATEGORIZED]);
        assert!(index.category_type(MediaKind::Audio, Some(UNCATEGORIZED), "Artist").is_some());
    }

    #[test]
    fn test_has_content_per_kind() {
        let mut index = CategoryIndex::new();
        assert!(!index.has_content(MediaKind::Video));
        index.acquire_category_type(MediaKind::Video, Some("Library A"), "Genre");

        assert!(index.has_content(MediaKind::Video));
        assert!(!index.has_content(MediaKind::Audio));
        assert!(!index.has_content(MediaKind::Image));
        assert!(!index.has_content(MediaKind::Unknown));
        assert_eq!(index.kinds_with_content(), vec![MediaKind::Video]);
    }

    #[test]
    fn test_masters_and_types_sorted() {
        let mut index = CategoryIndex::new();
        for (master, type_name) in [("b", "Year"), ("B", "Genre"), ("a", "Actor"), ("b", "Actor")] {
            index.acquire_category_type(MediaKind::Video, Some(master), type_name);
        }

        assert_eq!(index.master_categories(MediaKind::Video), vec!["B", "a", "b"]);
        assert_eq!(
            index.categories_for_master(MediaKind::Video, "b"),
            Some(vec!["Actor", "Year"])
        );
        assert_eq!(index.categories_for_master(MediaKind::Video, "missing"), None);
    }

    #[test]
    fn test_reset_clears_all_kinds() {
        let mut index = CategoryIndex::new();
        index
            .register(MediaKind::Video, None, "Genre", "Action", movie("a.mp4"))
            .unwrap();
        index
            .register(
                MediaKind::Audio,
                None,
                "Genre",
                "Rock",
                ResourceRef::file("/lib/s.mp3", MediaKind::Audio),
            )
            .unwrap();
        assert!(!index.is_empty());

        index.reset();
        assert!(index.is_empty());
        assert!(!index.has_content(MediaKind::Video));
        assert!(index.master_categories(MediaKind::Audio).is_empty());
    }

    #[test]
    fn test_register_rejects_empty_type() {
        let mut index = CategoryIndex::new();
        let err = index
            .register(MediaKind::Video, None, " ", "Action", movie("a.mp4"))
            .unwrap_err();
        assert_eq!(err, IndexError::EmptyCategoryType);
        assert!(!index.has_content(MediaKind::Video));
    }

    #[test]
    fn test_stats() {
        let mut index = CategoryIndex::new();
        index
            .register(MediaKind::Video, None, "Genre", "Action", movie("a.mp4"))
            .unwrap();
        index
            .register(MediaKind::Video, None, "Genre", "Comedy", movie("a.mp4"))
            .unwrap();
        index
            .register(MediaKind::Video, Some("Kids"), "Rating", "G", movie("b.mp4"))
            .unwrap();

        assert_eq!(
            index.stats(MediaKind::Video),
            KindStats {
                masters: 2,
                category_types: 2,
                category_values: 3,
                resources: 3,
            }
        );
        assert_eq!(index.stats(MediaKind::Image), KindStats::default());
    }
}
