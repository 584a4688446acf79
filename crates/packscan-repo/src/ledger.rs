use packscan_types::{DeprecatedReferences, Error, RepoPath, Result, Violation};
use serde_yaml::{Mapping, Value};

/// Parse the text of a `deprecated_references.yml`.
///
/// Layout: `to_package -> class_name -> { violations: [type, ..], files: [path, ..] }`.
/// Each listed type yields its own `Violation`, all sharing the entry's files.
/// Output follows declaration order of packages, then classes, then types.
pub fn parse_deprecated_references(path: &RepoPath, text: &str) -> Result<DeprecatedReferences> {
    let bad = |message: String| Error::ledger(path.as_str(), message);

    let doc: Value = serde_yaml::from_str(text).map_err(|e| bad(e.to_string()))?;
    let packages = match doc {
        Value::Null => return Ok(DeprecatedReferences::empty(path.clone())),
        Value::Mapping(m) => m,
        _ => return Err(bad("top level is not a mapping".to_string())),
    };

    let mut violations = Vec::new();
    for (to_package, classes) in &packages {
        let to_package_name = to_package
            .as_str()
            .ok_or_else(|| bad(format!("package name {to_package:?} is not a string")))?;
        let classes = classes
            .as_mapping()
            .ok_or_else(|| bad(format!("`{to_package_name}` is not a mapping of constants")))?;

        for (class, entry) in classes {
            let class_name = class.as_str().ok_or_else(|| {
                bad(format!(
                    "constant {class:?} under `{to_package_name}` is not a string"
                ))
            })?;
            let entry = entry.as_mapping().ok_or_else(|| {
                bad(format!("`{to_package_name}` / `{class_name}` is not a mapping"))
            })?;

            let types = string_list(entry, "violations")
                .map_err(|m| bad(format!("`{to_package_name}` / `{class_name}`: {m}")))?;
            let files = string_list(entry, "files")
                .map_err(|m| bad(format!("`{to_package_name}` / `{class_name}`: {m}")))?;

            violations.extend(types.into_iter().map(|violation_type| Violation {
                violation_type,
                to_package_name: to_package_name.to_string(),
                class_name: class_name.to_string(),
                files: files.clone(),
            }));
        }
    }

    Ok(DeprecatedReferences {
        path: path.clone(),
        violations,
    })
}

fn string_list(entry: &Mapping, key: &str) -> std::result::Result<Vec<String>, String> {
    let items = match entry.get(key) {
        None => return Err(format!("missing `{key}`")),
        Some(Value::Sequence(items)) => items,
        Some(_) => return Err(format!("`{key}` is not a list")),
    };
    items
        .iter()
        .map(|item| {
            item.as_str()
                .map(str::to_string)
                .ok_or_else(|| format!("`{key}` contains non-string entry {item:?}"))
        })
        .collect()
}
