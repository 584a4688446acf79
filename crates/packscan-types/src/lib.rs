//! Shared value types for the packscan workspace.
//!
//! This crate does no IO:
//! - package and violation records
//! - canonical repo-relative path handling
//! - the error taxonomy used by every other crate
//! - YAML 1.1 loading and scalar typing

#![forbid(unsafe_code)]

pub mod error;
pub mod package;
pub mod path;
pub mod references;
pub mod yaml;

pub use error::{Error, Result};
pub use package::{Metadata, Package};
pub use path::RepoPath;
pub use references::{DEPENDENCY_VIOLATION, DeprecatedReferences, PRIVACY_VIOLATION, Violation};

/// Root settings file, optional.
pub const SETTINGS_FILE: &str = "packwerk.yml";
/// Per-package manifest; its presence makes a directory a package.
pub const MANIFEST_FILE: &str = "package.yml";
/// Per-package ledger of known violations, optional.
pub const DEPRECATED_REFERENCES_FILE: &str = "deprecated_references.yml";
