use crate::RepoPath;
use serde::{Deserialize, Serialize};

pub const DEPENDENCY_VIOLATION: &str = "dependency";
pub const PRIVACY_VIOLATION: &str = "privacy";

/// One recorded boundary crossing from a deprecated-references ledger.
///
/// `violation_type` is an open set; `dependency` and `privacy` are the
/// categories known today.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    #[serde(rename = "type")]
    pub violation_type: String,
    pub to_package_name: String,
    pub class_name: String,
    /// Offending files in ledger order, duplicates kept.
    pub files: Vec<String>,
}

impl Violation {
    pub fn is_dependency(&self) -> bool {
        self.violation_type == DEPENDENCY_VIOLATION
    }

    pub fn is_privacy(&self) -> bool {
        self.violation_type == PRIVACY_VIOLATION
    }
}

/// Parsed `deprecated_references.yml` of one package.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeprecatedReferences {
    pub path: RepoPath,
    pub violations: Vec<Violation>,
}

impl DeprecatedReferences {
    pub fn empty(path: RepoPath) -> Self {
        DeprecatedReferences {
            path,
            violations: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }
}
