//! Library builder: walks shared directories and fills a category index.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use compact_str::CompactString;
use globset::{Glob, GlobSet, GlobSetBuilder};
use jwalk::{Parallelism, WalkDir};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use sidecat_core::{
    ExtensionClassifier, KindSet, LibraryConfig, MediaClassifier, MediaKind, ResourceRef,
    ScanError, ScanWarning, WarningKind,
};
use sidecat_index::CategoryIndex;

use crate::cache::MetaCache;
use crate::directive::Directives;
use crate::library::{Library, ScanReport, ScanStats, format_duration};
use crate::meta::CategoryMap;
use crate::progress::ScanProgress;

/// Builds a [`Library`] from the directories named in a [`LibraryConfig`].
///
/// Each root is listed with jwalk, its meta files are parsed in parallel,
/// and the index is then filled in a single sequential pass: files before
/// the folder meta file of their directory, subdirectories before their
/// parent.
pub struct LibraryBuilder {
    config: LibraryConfig,
    classifier: Arc<dyn MediaClassifier>,
    progress_tx: broadcast::Sender<ScanProgress>,
}

impl LibraryBuilder {
    /// Create a builder using the extension-based classifier.
    pub fn new(config: LibraryConfig) -> Self {
        let (progress_tx, _) = broadcast::channel(100);
        Self {
            config,
            classifier: Arc::new(ExtensionClassifier::new()),
            progress_tx,
        }
    }

    /// Replace the media classifier.
    pub fn with_classifier(mut self, classifier: impl MediaClassifier + 'static) -> Self {
        self.classifier = Arc::new(classifier);
        self
    }

    pub fn config(&self) -> &LibraryConfig {
        &self.config
    }

    /// Subscribe to scan progress updates.
    pub fn subscribe(&self) -> broadcast::Receiver<ScanProgress> {
        self.progress_tx.subscribe()
    }

    /// Scan every configured root into a fresh library.
    ///
    /// Roots that are missing or not directories are skipped with a
    /// warning. With no shared directories configured, every filesystem
    /// root is scanned.
    pub fn build(&self) -> Result<Library, ScanError> {
        self.build_from(&self.config.scan_roots(), false)
    }

    /// Scan a single root into a fresh library.
    ///
    /// Unlike [`LibraryBuilder::build`], a root that cannot be scanned is
    /// an error.
    pub fn scan_root(&self, root: impl AsRef<Path>) -> Result<Library, ScanError> {
        self.build_from(&[root.as_ref().to_path_buf()], true)
    }

    /// Rescan the configured roots and replace `library` with the result.
    ///
    /// On error `library` is left untouched.
    pub fn rebuild(&self, library: &mut Library) -> Result<(), ScanError> {
        *library = self.build()?;
        Ok(())
    }

    fn build_from(&self, roots: &[PathBuf], strict: bool) -> Result<Library, ScanError> {
        let start = Instant::now();
        let ignore = build_ignore_set(&self.config.ignore_patterns)?;
        let alternate_meta_folder = self.alternate_meta_folder();
        let mut index = CategoryIndex::new();
        let mut report = ScanReport::new();

        info!(roots = roots.len(), "Building category library");

        for root in roots {
            let root_path = match canonical_dir(root) {
                Ok(path) => path,
                Err(err) if strict => return Err(err),
                Err(err) => {
                    let warning = ScanWarning::new(root, err.to_string(), WarningKind::SkippedRoot);
                    warn!(path = %root.display(), "{}", warning.message);
                    report.warnings.push(warning);
                    continue;
                }
            };

            let mut session = ScanSession::new(self, &ignore, alternate_meta_folder, start);
            session.scan(&root_path, &mut index)?;

            report.stats.merge(&session.stats);
            report.warnings.append(&mut session.warnings);
            report.roots.push(root_path);
        }

        report.scan_duration = start.elapsed();
        info!(
            files = report.stats.media_files(),
            meta_files = report.stats.meta_files_parsed(),
            warnings = report.warnings.len(),
            "Built category library in {}",
            format_duration(report.scan_duration)
        );

        Ok(Library::new(index, report, self.config.root_name.clone()))
    }

    /// The configured alternate meta folder, if it is an existing directory.
    fn alternate_meta_folder(&self) -> Option<&Path> {
        let folder = self.config.alternate_meta_folder.as_deref()?;
        if folder.is_dir() {
            Some(folder)
        } else {
            warn!(path = %folder.display(), "Alternate meta folder is not a directory, ignoring it");
            None
        }
    }
}

/// Resolve `root` to an existing directory.
fn canonical_dir(root: &Path) -> Result<PathBuf, ScanError> {
    let path = root.canonicalize().map_err(|e| ScanError::io(root, e))?;
    if !path.is_dir() {
        return Err(ScanError::NotADirectory { path });
    }
    Ok(path)
}

/// Compile ignore patterns into a matcher for entry names.
fn build_ignore_set(patterns: &[String]) -> Result<GlobSet, ScanError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).map_err(|e| ScanError::InvalidConfig {
            message: format!("Invalid ignore pattern '{pattern}': {e}"),
        })?;
        builder.add(glob);
    }
    builder.build().map_err(|e| ScanError::InvalidConfig {
        message: format!("Invalid ignore patterns: {e}"),
    })
}

/// Listed directory entry.
struct EntryInfo {
    name: CompactString,
    path: PathBuf,
    is_dir: bool,
    kind: MediaKind,
    meta: Option<PathBuf>,
}

/// State for scanning one root.
struct ScanSession<'a> {
    config: &'a LibraryConfig,
    classifier: &'a dyn MediaClassifier,
    progress_tx: &'a broadcast::Sender<ScanProgress>,
    ignore: &'a GlobSet,
    alternate_meta_folder: Option<&'a Path>,
    start: Instant,
    entries_by_parent: HashMap<PathBuf, Vec<EntryInfo>>,
    folder_metas: HashMap<PathBuf, PathBuf>,
    cache: MetaCache,
    files_listed: u64,
    dirs_listed: u64,
    stats: ScanStats,
    warnings: Vec<ScanWarning>,
}

impl<'a> ScanSession<'a> {
    fn new(
        builder: &'a LibraryBuilder,
        ignore: &'a GlobSet,
        alternate_meta_folder: Option<&'a Path>,
        start: Instant,
    ) -> Self {
        Self {
            config: &builder.config,
            classifier: builder.classifier.as_ref(),
            progress_tx: &builder.progress_tx,
            ignore,
            alternate_meta_folder,
            start,
            entries_by_parent: HashMap::new(),
            folder_metas: HashMap::new(),
            cache: MetaCache::new(),
            files_listed: 0,
            dirs_listed: 0,
            stats: ScanStats::new(),
            warnings: Vec::new(),
        }
    }

    fn scan(&mut self, root: &Path, index: &mut CategoryIndex) -> Result<(), ScanError> {
        debug!(root = %root.display(), "Scanning root");

        self.collect_entries(root);
        let meta_paths = self.resolve_meta_files();
        let parsed = self.preload(meta_paths);
        debug!(root = %root.display(), meta_files = parsed, "Parsed meta files");

        self.index_directory(root, index)?;
        self.send_progress(root);
        Ok(())
    }

    /// List the root with jwalk, grouping entries by parent directory.
    fn collect_entries(&mut self, root: &Path) {
        let parallelism = match self.config.threads {
            0 => Parallelism::RayonDefaultPool {
                busy_timeout: Duration::from_millis(100),
            },
            n => Parallelism::RayonNewPool(n),
        };

        let walker = WalkDir::new(root)
            .parallelism(parallelism)
            .sort(true)
            .skip_hidden(!self.config.include_hidden)
            .follow_links(self.config.follow_symlinks)
            .min_depth(1)
            .max_depth(
                self.config
                    .max_depth
                    .map(|d| d as usize)
                    .unwrap_or(usize::MAX),
            );

        for entry_result in walker {
            let entry = match entry_result {
                Ok(e) => e,
                Err(err) => {
                    let path = err.path().map(|p| p.to_path_buf()).unwrap_or_default();
                    self.warn(ScanWarning::read_error(path, &err));
                    continue;
                }
            };

            let file_name = entry.file_name().to_string_lossy().to_string();
            if self.ignore.is_match(&file_name) {
                continue;
            }

            let path = entry.path();
            let file_type = entry.file_type();
            let Some(parent) = path.parent().map(Path::to_path_buf) else {
                continue;
            };

            // Links to files count as files; `follow_symlinks` only governs
            // descending into linked directories.
            let is_file = file_type.is_file()
                || (file_type.is_symlink() && fs::metadata(&path).is_ok_and(|m| m.is_file()));

            let info = if file_type.is_dir() {
                self.dirs_listed += 1;
                EntryInfo {
                    name: file_name.into(),
                    path,
                    is_dir: true,
                    kind: MediaKind::Unknown,
                    meta: None,
                }
            } else if is_file {
                let kind = self.classifier.classify(&path);
                self.files_listed += 1;
                if self.files_listed % 1000 == 0 {
                    self.send_progress(&path);
                }
                EntryInfo {
                    name: file_name.into(),
                    path,
                    is_dir: false,
                    kind,
                    meta: None,
                }
            } else {
                continue;
            };

            self.entries_by_parent.entry(parent).or_default().push(info);
        }
    }

    /// Locate the meta file of every indexable file and of every directory.
    fn resolve_meta_files(&mut self) -> Vec<PathBuf> {
        let config = self.config;
        let alternate_meta_folder = self.alternate_meta_folder;
        let mut meta_paths = Vec::new();

        for (dir, children) in self.entries_by_parent.iter_mut() {
            let siblings: HashSet<CompactString> = children
                .iter()
                .filter(|entry| !entry.is_dir)
                .map(|entry| entry.name.clone())
                .collect();

            if siblings.contains(config.folder_meta_name.as_str()) {
                let folder_meta = dir.join(&config.folder_meta_name);
                meta_paths.push(folder_meta.clone());
                self.folder_metas.insert(dir.clone(), folder_meta);
            }

            for entry in children
                .iter_mut()
                .filter(|entry| !entry.is_dir && entry.kind.is_indexable())
            {
                entry.meta =
                    locate_file_meta(config, alternate_meta_folder, dir, &entry.path, &siblings);
                if let Some(meta) = &entry.meta {
                    meta_paths.push(meta.clone());
                }
            }
        }

        meta_paths
    }

    /// Parse meta files in parallel, honouring the configured thread count.
    fn preload(&self, meta_paths: Vec<PathBuf>) -> usize {
        if self.config.threads == 0 {
            return self.cache.preload(meta_paths);
        }
        match rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.threads)
            .build()
        {
            Ok(pool) => {
                let cache = &self.cache;
                pool.install(|| cache.preload(meta_paths))
            }
            Err(err) => {
                warn!("Could not build parse thread pool, using default: {err}");
                self.cache.preload(meta_paths)
            }
        }
    }

    /// Index `dir` and everything beneath it.
    ///
    /// Returns the aggregate resource for the directory, or `None` if no
    /// media file lies beneath it.
    fn index_directory(
        &mut self,
        dir: &Path,
        index: &mut CategoryIndex,
    ) -> Result<Option<ResourceRef>, ScanError> {
        self.stats.record_dir();
        let children = self.entries_by_parent.remove(dir).unwrap_or_default();

        let mut kinds = KindSet::empty();
        let mut contents = Vec::new();

        for entry in children {
            if entry.is_dir {
                if let Some(aggregate) = self.index_directory(&entry.path, index)? {
                    kinds = kinds.union(aggregate.kinds());
                    contents.push(aggregate);
                }
                continue;
            }

            self.stats.record_file(entry.kind);
            if !entry.kind.is_indexable() {
                continue;
            }

            let resource = ResourceRef::file(&entry.path, entry.kind);
            if let Some(meta_path) = &entry.meta {
                self.apply_file_meta(meta_path, &resource, index)?;
            }
            kinds.insert(entry.kind);
            contents.push(resource);
        }

        let aggregate = (!contents.is_empty()).then(|| ResourceRef::directory(dir, kinds, contents));

        if let Some(meta_path) = self.folder_metas.remove(dir) {
            self.apply_folder_meta(&meta_path, aggregate.as_ref(), index)?;
        }

        Ok(aggregate)
    }

    /// Register a file's own meta facts under its single kind.
    ///
    /// A `Filter` directive is stripped and has no effect at file level.
    fn apply_file_meta(
        &mut self,
        meta_path: &Path,
        resource: &ResourceRef,
        index: &mut CategoryIndex,
    ) -> Result<(), ScanError> {
        let Some(categories) = self.load_meta(meta_path) else {
            return Ok(());
        };
        self.stats.file_meta_parsed += 1;

        let directives = Directives::extract(categories);
        if directives.categories.is_empty() {
            self.warn(ScanWarning::empty_meta(meta_path));
            return Ok(());
        }

        for kind in resource.kinds().iter() {
            self.register_facts(index, kind, &directives, resource)?;
        }
        Ok(())
    }

    /// Register a folder meta file's facts against the directory aggregate,
    /// once per kind found beneath it and allowed by its filter.
    fn apply_folder_meta(
        &mut self,
        meta_path: &Path,
        aggregate: Option<&ResourceRef>,
        index: &mut CategoryIndex,
    ) -> Result<(), ScanError> {
        let Some(categories) = self.load_meta(meta_path) else {
            return Ok(());
        };
        self.stats.folder_meta_parsed += 1;

        let directives = Directives::extract(categories);
        if directives.categories.is_empty() {
            self.warn(ScanWarning::empty_meta(meta_path));
            return Ok(());
        }
        let Some(aggregate) = aggregate else {
            self.warn(ScanWarning::empty_folder(meta_path));
            return Ok(());
        };

        let allowed = aggregate.kinds().intersection(directives.kind_filter());
        for kind in allowed.iter() {
            self.register_facts(index, kind, &directives, aggregate)?;
        }
        Ok(())
    }

    fn register_facts(
        &mut self,
        index: &mut CategoryIndex,
        kind: MediaKind,
        directives: &Directives,
        resource: &ResourceRef,
    ) -> Result<(), ScanError> {
        for master in &directives.masters {
            for (type_name, values) in &directives.categories {
                for value in values {
                    if index.register(kind, master.as_deref(), type_name, value, resource.clone())? {
                        self.stats.facts_registered += 1;
                    }
                }
            }
        }
        Ok(())
    }

    fn load_meta(&mut self, meta_path: &Path) -> Option<CategoryMap> {
        match self.cache.load(meta_path) {
            Ok(categories) => Some(categories),
            Err(err) => {
                self.warn(ScanWarning::unreadable_meta(&err));
                None
            }
        }
    }

    fn warn(&mut self, warning: ScanWarning) {
        warn!(path = %warning.path.display(), "{}", warning.message);
        self.warnings.push(warning);
    }

    fn send_progress(&self, current_path: &Path) {
        let _ = self.progress_tx.send(ScanProgress {
            files_scanned: self.files_listed,
            dirs_scanned: self.dirs_listed,
            meta_files_parsed: self.cache.len() as u64,
            current_path: current_path.to_path_buf(),
            warnings_count: self.warnings.len() as u64,
            elapsed: self.start.elapsed(),
        });
    }
}

/// Find the meta file for `media_path`: beside it first, then in the
/// alternate meta folder.
fn locate_file_meta(
    config: &LibraryConfig,
    alternate_meta_folder: Option<&Path>,
    dir: &Path,
    media_path: &Path,
    siblings: &HashSet<CompactString>,
) -> Option<PathBuf> {
    let meta_name = config.meta_file_name(media_path)?;
    if siblings.contains(meta_name.as_str()) {
        return Some(dir.join(meta_name));
    }
    alternate_meta_folder
        .map(|folder| folder.join(&meta_name))
        .filter(|candidate| candidate.is_file())
}
