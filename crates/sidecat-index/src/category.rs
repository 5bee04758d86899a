//! Category types and their value buckets.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::trace;

use sidecat_core::{IndexError, ResourceRef};

/// A named axis of classification (e.g. "Genre").
///
/// Owns a mapping from category value ("Action") to the distinct
/// resources filed under it.
///
/// ```text
/// Video                      (media kind)
///   Genre                    (category type)
///     Action                 (category value)
///       MyActionMovie.avi    (resource)
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct CategoryType {
    name: String,
    values: BTreeMap<String, Vec<ResourceRef>>,
}

impl CategoryType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            values: BTreeMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// File `resource` under `value`.
    ///
    /// Returns `Ok(false)` without changing anything when an equal
    /// resource is already filed under that value.
    pub fn add_resource(&mut self, resource: ResourceRef, value: &str) -> Result<bool, IndexError> {
        if value.trim().is_empty() {
            return Err(IndexError::EmptyCategoryValue {
                category_type: self.name.clone(),
            });
        }

        let resources = self.values.entry(value.to_string()).or_default();
        if resources.contains(&resource) {
            return Ok(false);
        }

        trace!(
            category = %self.name,
            value,
            resource = %resource.name,
            "adding resource to category"
        );
        resources.push(resource);
        Ok(true)
    }

    /// Category values in ascending order.
    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Resources filed under `value`, in insertion order.
    pub fn resources(&self, value: &str) -> Option<&[ResourceRef]> {
        self.values.get(value).map(Vec::as_slice)
    }

    /// Every (value, resources) pair in ascending value order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &[ResourceRef])> {
        self.values
            .iter()
            .map(|(value, resources)| (value.as_str(), resources.as_slice()))
    }

    pub fn value_count(&self) -> usize {
        self.values.len()
    }

    /// Total number of (value, resource) registrations.
    pub fn resource_count(&self) -> usize {
        self.values.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sidecat_core::MediaKind;

    #[test]
    fn test_add_resource_deduplicates() {
        let mut genre = CategoryType::new("Genre");
        let movie = ResourceRef::file("/lib/MovieA.mp4", MediaKind::Video);

        assert!(genre.add_resource(movie.clone(), "Action").unwrap());
        assert!(!genre.add_resource(movie.clone(), "Action").unwrap());
        assert!(genre.add_resource(movie, "Comedy").unwrap());

        assert_eq!(genre.resources("Action").unwrap().len(), 1);
        assert_eq!(genre.value_count(), 2);
        assert_eq!(genre.resource_count(), 2);
    }

    #[test]
    fn test_equal_paths_are_duplicates() {
        let mut genre = CategoryType::new("Genre");
        genre
            .add_resource(ResourceRef::file("/lib/a.mp4", MediaKind::Video), "Action")
            .unwrap();
        genre
            .add_resource(ResourceRef::file("/lib/a.mp4", MediaKind::Video), "Action")
            .unwrap();
        assert_eq!(genre.resources("Action").unwrap().len(), 1);
    }

    #[test]
    fn test_empty_value_rejected() {
        let mut genre = CategoryType::new("Genre");
        let movie = ResourceRef::file("/lib/MovieA.mp4", MediaKind::Video);

        let err = genre.add_resource(movie.clone(), "").unwrap_err();
        assert_eq!(
            err,
            IndexError::EmptyCategoryValue {
                category_type: "Genre".to_string()
            }
        );
        assert!(genre.add_resource(movie, "   ").is_err());
        assert!(genre.is_empty());
    }

    #[test]
    fn test_values_sorted() {
        let mut genre = CategoryType::new("Genre");
        let movie = ResourceRef::file("/lib/MovieA.mp4", MediaKind::Video);
        for value in ["Drama", "Action", "Comedy"] {
            genre.add_resource(movie.clone(), value).unwrap();
        }
        assert_eq!(
            genre.values().collect::<Vec<_>>(),
            vec!["Action", "Comedy", "Drama"]
        );
    }
}
