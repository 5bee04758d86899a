//! Concurrent cache of parsed meta files.

use std::path::{Path, PathBuf};

use dashmap::DashMap;
use rayon::prelude::*;
use tracing::debug;

use sidecat_core::MetaError;

use crate::meta::{CategoryMap, parse_meta_file};

/// Parsed meta files keyed by path.
///
/// Failures are cached as well, so each file is read at most once per scan.
#[derive(Debug, Default)]
pub struct MetaCache {
    entries: DashMap<PathBuf, Result<CategoryMap, MetaError>>,
}

impl MetaCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse every path not already cached, in parallel on the current
    /// rayon pool. Returns the number of files newly parsed.
    pub fn preload(&self, paths: Vec<PathBuf>) -> usize {
        paths
            .into_par_iter()
            .filter(|path| !self.entries.contains_key(path))
            .map(|path| {
                let parsed = parse_meta_file(&path);
                debug!(path = %path.display(), ok = parsed.is_ok(), "Parsed meta file");
                self.entries.insert(path, parsed);
            })
            .count()
    }

    /// Parsed contents of `path`, reading it now if it was not preloaded.
    pub fn load(&self, path: &Path) -> Result<CategoryMap, MetaError> {
        if let Some(cached) = self.entries.get(path) {
            return cached.value().clone();
        }
        let parsed = parse_meta_file(path);
        self.entries.insert(path.to_path_buf(), parsed.clone());
        parsed
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
