use camino::Utf8Path;
use globset::GlobSet;
use packscan_settings::{Settings, build_globset};
use packscan_types::{Error, MANIFEST_FILE, RepoPath, Result, SETTINGS_FILE};
use std::collections::BTreeSet;
use tracing::debug;
use walkdir::{DirEntry, WalkDir};

/// Discover package directories for the repository rooted at `repo_root`.
///
/// Behavior:
/// - every directory matched by a `package_paths` pattern is a candidate
/// - candidates matched by an `exclude` pattern (as a directory or through their
///   manifest path) are dropped
/// - only candidates containing a `package.yml` are kept
/// - the root is kept whenever it has a `package.yml`, whatever the patterns say
///
/// Hidden directories are never descended into. Results are deduplicated and
/// sorted, but callers should not rely on the order.
pub fn discover_package_dirs(repo_root: &Utf8Path, settings: &Settings) -> Result<Vec<RepoPath>> {
    let matcher = PackageMatcher::new(settings)?;

    let mut out: BTreeSet<RepoPath> = BTreeSet::new();

    // The root manifest is never missed, whatever `package_paths` says.
    if repo_root.join(MANIFEST_FILE).is_file() {
        out.insert(RepoPath::root());
    }

    let mut candidates = 0usize;
    let walker = WalkDir::new(repo_root)
        .min_depth(1)
        .into_iter()
        .filter_entry(|e| !is_hidden(e));

    for entry in walker {
        let entry = entry.map_err(walk_error)?;
        if !entry.file_type().is_dir() {
            continue;
        }
        let Some(abs) = Utf8Path::from_path(entry.path()) else {
            continue;
        };
        let rel = RepoPath::new(abs.strip_prefix(repo_root).unwrap_or(abs).as_str());
        if !matcher.includes(&rel) {
            continue;
        }
        candidates += 1;

        if !abs.join(MANIFEST_FILE).is_file() {
            continue;
        }
        if matcher.excludes(&rel) {
            debug!(package = %rel, "package excluded by pattern");
            continue;
        }

        debug!(package = %rel, "package discovered");
        out.insert(rel);
    }

    debug!(
        candidates,
        packages = out.len(),
        root = %repo_root,
        "package discovery finished"
    );

    Ok(out.into_iter().collect())
}

/// Compiled `package_paths` and `exclude` patterns.
pub(crate) struct PackageMatcher {
    include: GlobSet,
    exclude: GlobSet,
}

impl PackageMatcher {
    pub(crate) fn new(settings: &Settings) -> Result<Self> {
        let include = build_globset(&settings.package_paths)
            .map_err(|e| Error::config(SETTINGS_FILE, format!("invalid package_paths glob: {e}")))?;
        let exclude = build_globset(&settings.exclude)
            .map_err(|e| Error::config(SETTINGS_FILE, format!("invalid exclude glob: {e}")))?;
        Ok(PackageMatcher { include, exclude })
    }

    pub(crate) fn includes(&self, dir: &RepoPath) -> bool {
        self.include.is_match(dir.as_str())
    }

    /// Excluded as a directory or through its manifest path.
    pub(crate) fn excludes(&self, dir: &RepoPath) -> bool {
        self.exclude.is_match(dir.as_str())
            || self.exclude.is_match(dir.join(MANIFEST_FILE).as_str())
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.starts_with('.'))
}

fn walk_error(err: walkdir::Error) -> Error {
    let path = err
        .path()
        .and_then(Utf8Path::from_path)
        .map(|p| p.to_path_buf())
        .unwrap_or_default();
    let source = err
        .into_io_error()
        .unwrap_or_else(|| std::io::Error::other("filesystem loop while walking"));
    Error::io(path, source)
}
