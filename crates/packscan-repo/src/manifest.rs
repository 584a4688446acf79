use packscan_types::yaml::{self, yaml11_bool};
use packscan_types::{Error, Package, RepoPath, Result};
use serde_yaml::{Mapping, Value};

const ENFORCE_DEPENDENCIES: &str = "enforce_dependencies";
const ENFORCE_PRIVACY: &str = "enforce_privacy";
const DEPENDENCIES: &str = "dependencies";
const METADATA: &str = "metadata";
/// Accepted but not surfaced on `Package`.
const PUBLIC_PATH: &str = "public_path";

/// Parse the text of a `package.yml` living in `dir`.
///
/// Plain scalars are typed the YAML 1.1 way (`no` is `false`, `'no'` stays a string).
/// Missing keys take their defaults. The `metadata` mapping is kept as declared,
/// followed by any unrecognized top-level keys that it does not already contain.
pub fn parse_package(dir: &RepoPath, text: &str) -> Result<Package> {
    let manifest_path = dir.join(packscan_types::MANIFEST_FILE);
    let bad = |message: String| Error::config(manifest_path.as_str(), message);

    let doc = yaml::from_str(text).map_err(|e| bad(e.to_string()))?;
    let doc = match doc {
        Value::Null => Mapping::new(),
        Value::Mapping(m) => m,
        _ => return Err(bad("top level is not a mapping".to_string())),
    };

    let mut package = Package::new(dir.as_str());
    let mut extra: Vec<(Value, Value)> = Vec::new();

    for (key, value) in doc {
        let name = key.as_str().map(str::to_owned);
        match name.as_deref() {
            Some(ENFORCE_DEPENDENCIES) => {
                package.enforce_dependencies = parse_flag(&value)
                    .ok_or_else(|| bad(format!("`{ENFORCE_DEPENDENCIES}` must be a boolean")))?;
            }
            Some(ENFORCE_PRIVACY) => {
                package.enforce_privacy = parse_flag(&value)
                    .ok_or_else(|| bad(format!("`{ENFORCE_PRIVACY}` must be a boolean")))?;
            }
            Some(DEPENDENCIES) => {
                package.dependencies = parse_dependencies(value).map_err(bad)?;
            }
            Some(METADATA) => match value {
                Value::Null => {}
                Value::Mapping(m) => package.metadata = m,
                _ => return Err(bad(format!("`{METADATA}` must be a mapping"))),
            },
            Some(PUBLIC_PATH) => {}
            _ => extra.push((key, value)),
        }
    }

    for (key, value) in extra {
        if !package.metadata.contains_key(&key) {
            package.metadata.insert(key, value);
        }
    }

    Ok(package)
}

/// Truthiness of an enforcement flag. `None` for collections.
fn parse_flag(value: &Value) -> Option<bool> {
    match value {
        Value::Null => Some(false),
        Value::Bool(b) => Some(*b),
        Value::String(s) => Some(yaml11_bool(s).unwrap_or(true)),
        Value::Number(_) => Some(true),
        Value::Tagged(tagged) => parse_flag(&tagged.value),
        Value::Sequence(_) | Value::Mapping(_) => None,
    }
}

fn parse_dependencies(value: Value) -> std::result::Result<Vec<String>, String> {
    match value {
        Value::Null => Ok(Vec::new()),
        Value::Sequence(items) => items
            .into_iter()
            .map(|item| match item {
                Value::String(s) => Ok(s),
                other => Err(format!(
                    "`{DEPENDENCIES}` entries must be package names, found {other:?}"
                )),
            })
            .collect(),
        _ => Err(format!("`{DEPENDENCIES}` must be a list")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn root() -> RepoPath {
        RepoPath::root()
    }

    #[test]
    fn empty_manifest_uses_defaults() {
        let pkg = parse_package(&RepoPath::new("packs/a"), "").expect("parse");
        assert_eq!(pkg, Package::new("packs/a"));
    }

    #[test]
    fn generated_root_manifest_with_bare_dependencies_key() {
        let text = "# This file represents the root package of the application\n\
                    enforce_dependencies: false\n\
                    enforce_privacy: false\n\
                    # public_path: app/public/\n\
                    dependencies:\n";
        let pkg = parse_package(&root(), text).expect("parse");
        assert_eq!(pkg.name, ".");
        assert!(!pkg.enforce_dependencies);
        assert!(!pkg.enforce_privacy);
        assert!(pkg.dependencies.is_empty());
        assert!(pkg.metadata.is_empty());
    }

    #[test]
    fn dependencies_keep_declaration_order() {
        let text = "enforce_dependencies: true\ndependencies:\n  - packs/z\n  - packs/a\n";
        let pkg = parse_package(&root(), text).expect("parse");
        assert!(pkg.enforce_dependencies);
        assert_eq!(pkg.dependencies, vec!["packs/z", "packs/a"]);
    }

    #[test]
    fn metadata_scalars_follow_yaml11_typing() {
        let text = "enforce_dependencies: true\n\
                    enforce_privacy: true\n\
                    metadata:\n  \
                      string_key: this_is_a_string\n  \
                      obviously_a_boolean_key: false\n  \
                      not_obviously_a_boolean_key: no\n  \
                      numeric_key: 123\n";
        let pkg = parse_package(&RepoPath::new("packs/package_1"), text).expect("parse");

        let keys: Vec<&str> = pkg.metadata.keys().filter_map(|k| k.as_str()).collect();
        assert_eq!(
            keys,
            vec![
                "string_key",
                "obviously_a_boolean_key",
                "not_obviously_a_boolean_key",
                "numeric_key"
            ]
        );
        assert_eq!(
            pkg.metadata.get("string_key"),
            Some(&Value::String("this_is_a_string".to_string()))
        );
        assert_eq!(pkg.metadata.get("obviously_a_boolean_key"), Some(&Value::Bool(false)));
        assert_eq!(pkg.metadata.get("not_obviously_a_boolean_key"), Some(&Value::Bool(false)));
        assert_eq!(pkg.metadata.get("numeric_key").and_then(Value::as_u64), Some(123));
    }

    #[test]
    fn quoted_metadata_scalars_stay_strings() {
        let text = "metadata:\n  \
                      answer: 'no'\n  \
                      count: \"123\"\n  \
                      plain_answer: no\n  \
                      size: n\n  \
                      shout: yEs\n  \
                      budget: 1_000\n";
        let pkg = parse_package(&root(), text).expect("parse");
        let m = &pkg.metadata;
        assert_eq!(m.get("answer"), Some(&Value::String("no".to_string())));
        assert_eq!(m.get("count"), Some(&Value::String("123".to_string())));
        assert_eq!(m.get("plain_answer"), Some(&Value::Bool(false)));
        assert_eq!(m.get("size"), Some(&Value::String("n".to_string())));
        assert_eq!(m.get("shout"), Some(&Value::Bool(true)));
        assert_eq!(m.get("budget").and_then(Value::as_u64), Some(1000));
    }

    #[test]
    fn flags_accept_yaml11_literals_and_truthy_values() {
        let pkg = parse_package(&root(), "enforce_dependencies: no\nenforce_privacy: strict\n")
            .expect("parse");
        assert!(!pkg.enforce_dependencies);
        assert!(pkg.enforce_privacy);

        let pkg = parse_package(&root(), "enforce_dependencies: On\nenforce_privacy:\n")
            .expect("parse");
        assert!(pkg.enforce_dependencies);
        assert!(!pkg.enforce_privacy);
    }

    #[test]
    fn public_path_is_accepted_and_dropped() {
        let pkg = parse_package(&root(), "public_path: app/public/\n").expect("parse");
        assert_eq!(pkg, Package::new("."));
    }

    #[test]
    fn unrecognized_top_level_keys_land_in_metadata() {
        let text = "owner: Team A\nmetadata:\n  owner: Team B\n  slack: '#team-b'\nextra: [1, 2]\n";
        let pkg = parse_package(&root(), text).expect("parse");
        let keys: Vec<&str> = pkg.metadata.keys().filter_map(|k| k.as_str()).collect();
        assert_eq!(keys, vec!["owner", "slack", "extra"]);
        assert_eq!(pkg.metadata.get("owner").and_then(Value::as_str), Some("Team B"));
    }

    #[test]
    fn non_mapping_manifest_is_a_config_error() {
        let err = parse_package(&RepoPath::new("packs/a"), "- a\n- b\n").unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
        assert!(err.to_string().contains("packs/a/package.yml"));
    }

    #[test]
    fn wrongly_shaped_recognized_keys_are_config_errors() {
        for text in [
            "dependencies: packs/a\n",
            "dependencies:\n  - 3\n",
            "enforce_privacy: [true]\n",
            "metadata: owner\n",
            "enforce_dependencies: [\n",
        ] {
            let err = parse_package(&root(), text).unwrap_err();
            assert!(matches!(err, Error::Config { .. }), "{text:?} -> {err}");
        }
    }
}
