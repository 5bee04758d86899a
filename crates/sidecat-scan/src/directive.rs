//! Reserved `Master` and `Filter` directives inside meta files.

use sidecat_core::{KindSet, MediaKind};

use crate::meta::CategoryMap;

/// Key naming the master categories a meta file's facts belong to.
pub const MASTER_KEY: &str = "Master";

/// Key restricting which media kinds a folder meta file applies to.
pub const FILTER_KEY: &str = "Filter";

/// Remove `key` from `categories` and return its values.
///
/// When the key is absent the result is a single `None`, so callers that
/// iterate the result still run exactly once with the directive unset.
pub fn take_special(categories: &mut CategoryMap, key: &str) -> Vec<Option<String>> {
    match categories.shift_remove(key) {
        Some(values) => values.into_iter().map(Some).collect(),
        None => vec![None],
    }
}

/// Resolve filter tokens to the set of kinds a folder meta file applies to.
///
/// Tokens are matched case-insensitively against each kind's internal or
/// display name; unmatched tokens are ignored. With no match at all the
/// filter allows every kind.
pub fn resolve_filter(values: &[Option<String>]) -> KindSet {
    let matched: KindSet = values
        .iter()
        .flatten()
        .filter_map(|token| MediaKind::from_token(token))
        .collect();

    if matched.is_empty() {
        KindSet::all()
    } else {
        matched
    }
}

/// Meta file contents with the reserved directives pulled out.
#[derive(Debug, Clone)]
pub struct Directives {
    /// Master sections; a single `None` when no master was given.
    pub masters: Vec<Option<String>>,
    /// Raw filter values; a single `None` when no filter was given.
    pub filters: Vec<Option<String>>,
    /// The remaining category facts.
    pub categories: CategoryMap,
}

impl Directives {
    /// Split a parsed meta file into directives and category facts.
    pub fn extract(mut categories: CategoryMap) -> Self {
        let masters = take_special(&mut categories, MASTER_KEY);
        let filters = take_special(&mut categories, FILTER_KEY);
        Self {
            masters,
            filters,
            categories,
        }
    }

    /// Kinds allowed by the filter directive.
    pub fn kind_filter(&self) -> KindSet {
        resolve_filter(&self.filters)
    }

    /// Number of (master, type, value) facts this file contributes per kind.
    pub fn fact_count(&self) -> usize {
        self.masters.len() * self.categories.values().map(Vec::len).sum::<usize>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::meta::parse_meta_str;

    #[test]
    fn test_take_master() {
        let mut map = CategoryMap::new();
        map.insert(
            "Master".to_string(),
            vec!["Library A".to_string(), "Library B".to_string()],
        );
        map.insert("Genre".to_string(), vec!["Action".to_string()]);

        let masters = take_special(&mut map, MASTER_KEY);
        assert_eq!(
            masters,
            vec![Some("Library A".to_string()), Some("Library B".to_string())]
        );
        assert_eq!(map.len(), 1);
        assert_eq!(map["Genre"], vec!["Action"]);
    }

    #[test]
    fn test_take_absent_key() {
        let mut map = parse_meta_str("Genre=Action");
        assert_eq!(take_special(&mut map, FILTER_KEY), vec![None]);
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_special_keys_are_case_sensitive_after_title_case() {
        // "master" title-cases to "Master"; "MASTER" stays as written.
        let directives = Directives::extract(parse_meta_str("master=A\nMASTER=B"));
        assert_eq!(directives.masters, vec![Some("A".to_string())]);
        assert_eq!(directives.categories["MASTER"], vec!["B"]);
    }

    #[test]
    fn test_resolve_filter() {
        let video_only = resolve_filter(&[Some("Video".to_string())]);
        assert_eq!(video_only.iter().collect::<Vec<_>>(), vec![MediaKind::Video]);

        let mixed = resolve_filter(&[
            Some("photos".to_string()),
            Some("Nonsense".to_string()),
            Some("AUDIO".to_string()),
        ]);
        assert_eq!(
            mixed.iter().collect::<Vec<_>>(),
            vec![MediaKind::Audio, MediaKind::Image]
        );

        assert_eq!(resolve_filter(&[Some("Nonsense".to_string())]), KindSet::all());
        assert_eq!(resolve_filter(&[None]), KindSet::all());
    }

    #[test]
    fn test_fact_count() {
        let directives =
            Directives::extract(parse_meta_str("Master=A\nMaster=B\nGenre=X\nGenre=Y\nYear=1"));
        assert_eq!(directives.fact_count(), 6);
    }
}
