use crate::{DEPRECATED_REFERENCES_FILE, MANIFEST_FILE, RepoPath};
use serde::{Deserialize, Serialize};
use serde_yaml::Mapping;

/// Caller-defined package data: an ordered YAML mapping of arbitrary nesting.
pub type Metadata = Mapping;

/// One package as declared by its `package.yml`.
///
/// `name` is the package directory relative to the repository root (`.` for the
/// root package) and uniquely identifies the package within a repository.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Package {
    pub name: String,
    pub enforce_dependencies: bool,
    pub enforce_privacy: bool,
    /// Declared dependencies, in declaration order.
    #[serde(default)]
    pub dependencies: Vec<String>,
    /// Caller-defined data, kept in declaration order with its nested shape.
    #[serde(default)]
    pub metadata: Metadata,
}

impl Package {
    /// A package with every field at its manifest default.
    pub fn new(name: impl AsRef<str>) -> Self {
        Package {
            name: RepoPath::new(name).as_str().to_string(),
            ..Package::default()
        }
    }

    pub fn directory(&self) -> RepoPath {
        RepoPath::new(&self.name)
    }

    pub fn manifest_path(&self) -> RepoPath {
        self.directory().join(MANIFEST_FILE)
    }

    pub fn deprecated_references_path(&self) -> RepoPath {
        self.directory().join(DEPRECATED_REFERENCES_FILE)
    }

    pub fn is_root(&self) -> bool {
        self.directory().is_root()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_package_paths() {
        let root = Package::new(".");
        assert!(root.is_root());
        assert_eq!(root.directory().as_str(), ".");
        assert_eq!(root.manifest_path().as_str(), "package.yml");
        assert_eq!(
            root.deprecated_references_path().as_str(),
            "deprecated_references.yml"
        );
    }

    #[test]
    fn nested_package_paths() {
        let pkg = Package::new("./packs/example_pack/");
        assert_eq!(pkg.name, "packs/example_pack");
        assert!(!pkg.is_root());
        assert_eq!(pkg.manifest_path().as_str(), "packs/example_pack/package.yml");
    }

    #[test]
    fn defaults_are_permissive_and_empty() {
        let pkg = Package::new("packs/a");
        assert!(!pkg.enforce_dependencies);
        assert!(!pkg.enforce_privacy);
        assert!(pkg.dependencies.is_empty());
        assert!(pkg.metadata.is_empty());
    }

    #[test]
    fn serializes_metadata_as_json_object() {
        let mut pkg = Package::new("packs/a");
        pkg.metadata.insert("owner".into(), "Team".into());
        let json = serde_json::to_value(&pkg).expect("json");
        assert_eq!(json["metadata"]["owner"], "Team");
        assert_eq!(json["name"], "packs/a");
    }
}
