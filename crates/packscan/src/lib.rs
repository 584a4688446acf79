//! Read and write the configuration of a package-partitioned monorepo.
//!
//! - `packwerk.yml` at the root decides where packages are searched for
//! - each `package.yml` declares a package's enforcement flags, dependencies and metadata
//! - each `deprecated_references.yml` records boundary violations that are tolerated
//!
//! ```no_run
//! use camino::Utf8Path;
//!
//! let root = Utf8Path::new(".");
//! let mut packages = packscan::all(root)?;
//! packages.sort_by(|a, b| a.name.cmp(&b.name));
//! for package in &packages {
//!     let refs = packscan::read_deprecated_references(root, &package.deprecated_references_path())?;
//!     println!("{}: {} known violations", package.name, refs.violations.len());
//! }
//! # Ok::<(), packscan::Error>(())
//! ```

#![forbid(unsafe_code)]

pub use packscan_repo::{
    PackageEntry, all, all_with_deprecated_references, discover_package_dirs, find_package,
    load_settings, load_settings_with, package_directories, package_for_file,
    parse_deprecated_references, parse_package, read_deprecated_references, read_package,
    render_manifest, write_manifest,
};
pub use packscan_settings::{
    DEFAULT_EXCLUDE, DEFAULT_PACKAGE_PATHS, DEFAULT_VENDOR_PATH, RawSettings, ResolveOptions,
    Settings, parse_settings_yaml, resolve_settings,
};
pub use packscan_types::{
    DEPENDENCY_VIOLATION, DEPRECATED_REFERENCES_FILE, DeprecatedReferences, Error, MANIFEST_FILE,
    Metadata, PRIVACY_VIOLATION, Package, RepoPath, Result, SETTINGS_FILE, Violation,
};

/// Values held in package metadata.
pub use serde_yaml::Value as MetadataValue;
