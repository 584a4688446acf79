//! Repository adapters: discover packages, read manifests and ledgers, write manifests.
//!
//! This crate is the only one that touches the filesystem. Every call reads fresh;
//! nothing is cached between calls.

#![forbid(unsafe_code)]

mod discover;
mod ledger;
mod manifest;
mod write;

use camino::Utf8Path;
use packscan_settings::{ResolveOptions, Settings, parse_settings_yaml, resolve_settings};
use packscan_types::{
    DeprecatedReferences, Error, MANIFEST_FILE, Package, RepoPath, Result, SETTINGS_FILE,
};
use tracing::debug;

pub use discover::discover_package_dirs;
pub use ledger::parse_deprecated_references;
pub use manifest::parse_package;
pub use write::{render_manifest, write_manifest};

/// Fuzz-friendly API for testing parsing robustness without filesystem access.
/// These functions are designed to never panic on any input.
pub mod fuzz {
    use super::*;

    /// Parse arbitrary text as a `package.yml`.
    ///
    /// **Never panics** on any input.
    pub fn parse_manifest(text: &str) -> anyhow::Result<()> {
        let _ = manifest::parse_package(&RepoPath::new("packs/fuzz"), text)?;
        Ok(())
    }

    /// Parse arbitrary text as a `deprecated_references.yml`.
    ///
    /// **Never panics** on any input.
    pub fn parse_ledger(text: &str) -> anyhow::Result<()> {
        let path = RepoPath::new("packs/fuzz/deprecated_references.yml");
        let _ = ledger::parse_deprecated_references(&path, text)?;
        Ok(())
    }

    /// Parse arbitrary text as `packwerk.yml` and resolve it.
    ///
    /// **Never panics** on any input.
    pub fn parse_settings(text: &str) -> anyhow::Result<()> {
        let _ = packscan_settings::settings_from_yaml(text)?;
        Ok(())
    }

    /// Apply discovery's include/exclude decision to `dirs` (repo-relative) without
    /// touching the filesystem. Returns the accepted directories, normalized.
    ///
    /// **Never panics** on any input.
    pub fn select_package_dirs(
        package_paths: &[String],
        exclude: &[String],
        dirs: &[String],
    ) -> anyhow::Result<Vec<String>> {
        let settings = Settings {
            package_paths: package_paths.to_vec(),
            exclude: exclude.to_vec(),
        };
        let matcher = discover::PackageMatcher::new(&settings)?;
        Ok(dirs
            .iter()
            .map(RepoPath::new)
            .filter(|dir| matcher.includes(dir) && !matcher.excludes(dir))
            .map(|dir| dir.as_str().to_string())
            .collect())
    }

    /// Render a package, then parse the text back.
    ///
    /// Returns an error if the parsed package differs from the input.
    pub fn render_then_parse(package: &Package) -> anyhow::Result<()> {
        let text = write::render_manifest(package);
        let parsed = manifest::parse_package(&package.directory(), &text)?;
        anyhow::ensure!(
            &parsed == package,
            "render/parse mismatch:\n{text}\nparsed: {parsed:?}"
        );
        Ok(())
    }
}

/// A package together with its deprecated-references ledger.
#[derive(Clone, Debug, PartialEq)]
pub struct PackageEntry {
    pub package: Package,
    pub deprecated_references: DeprecatedReferences,
}

/// Resolve the effective settings of the repository at `repo_root`.
///
/// A missing `packwerk.yml` means all defaults.
pub fn load_settings(repo_root: &Utf8Path) -> Result<Settings> {
    load_settings_with(repo_root, &ResolveOptions::default())
}

pub fn load_settings_with(repo_root: &Utf8Path, options: &ResolveOptions) -> Result<Settings> {
    let path = repo_root.join(SETTINGS_FILE);
    let raw = match read_optional(&path)? {
        Some(text) => {
            debug!(path = %path, "settings file found");
            parse_settings_yaml(&text)?
        }
        None => {
            debug!(path = %path, "no settings file, using defaults");
            Default::default()
        }
    };
    resolve_settings(raw, options)
}

/// Every package directory of the repository, using its own settings.
pub fn package_directories(repo_root: &Utf8Path) -> Result<Vec<RepoPath>> {
    let settings = load_settings(repo_root)?;
    discover::discover_package_dirs(repo_root, &settings)
}

/// Read the package whose manifest lives in `dir` (repo-relative).
pub fn read_package(repo_root: &Utf8Path, dir: &RepoPath) -> Result<Package> {
    let path = repo_root.join(dir.join(MANIFEST_FILE).as_str());
    let text = std::fs::read_to_string(&path).map_err(|e| Error::io(&path, e))?;
    manifest::parse_package(dir, &text)
}

/// Read a ledger file (repo-relative path). A missing file yields no violations.
pub fn read_deprecated_references(
    repo_root: &Utf8Path,
    path: &RepoPath,
) -> Result<DeprecatedReferences> {
    let abs = repo_root.join(path.as_str());
    match read_optional(&abs)? {
        Some(text) => ledger::parse_deprecated_references(path, &text),
        None => {
            debug!(path = %path, "no deprecated references");
            Ok(DeprecatedReferences::empty(path.clone()))
        }
    }
}

/// Every package in the repository.
///
/// Order is unspecified; sort by `name` when a stable order matters. Any manifest
/// that fails to parse fails the whole call.
pub fn all(repo_root: &Utf8Path) -> Result<Vec<Package>> {
    package_directories(repo_root)?
        .iter()
        .map(|dir| read_package(repo_root, dir))
        .collect()
}

/// Every package in the repository, each with its parsed ledger.
pub fn all_with_deprecated_references(repo_root: &Utf8Path) -> Result<Vec<PackageEntry>> {
    all(repo_root)?
        .into_iter()
        .map(|package| {
            let deprecated_references =
                read_deprecated_references(repo_root, &package.deprecated_references_path())?;
            Ok(PackageEntry {
                package,
                deprecated_references,
            })
        })
        .collect()
}

/// The discovered package called `name`, if there is one.
pub fn find_package(repo_root: &Utf8Path, name: &str) -> Result<Option<Package>> {
    let wanted = RepoPath::new(name);
    let dirs = package_directories(repo_root)?;
    match dirs.into_iter().find(|d| *d == wanted) {
        Some(dir) => read_package(repo_root, &dir).map(Some),
        None => Ok(None),
    }
}

/// The package owning `file` (repo-relative): the one with the deepest directory
/// containing it. Files outside every package belong to the root package, if any.
pub fn package_for_file<'a>(packages: &'a [Package], file: &str) -> Option<&'a Package> {
    let file = RepoPath::new(file);
    packages
        .iter()
        .filter(|p| file.is_within(&p.directory()))
        .max_by_key(|p| {
            if p.is_root() {
                0
            } else {
                p.directory().as_str().split('/').count()
            }
        })
}

fn read_optional(path: &Utf8Path) -> Result<Option<String>> {
    match std::fs::read_to_string(path) {
        Ok(text) => Ok(Some(text)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(Error::io(path, e)),
    }
}
