use camino::{Utf8Path, Utf8PathBuf};
use packscan_types::yaml;
use packscan_types::{Error, Package, Result};
use serde_yaml::{Mapping, Number, Value};
use tracing::debug;

const INDENT: &str = "  ";

/// Render the canonical `package.yml` text for `package`.
///
/// Key order is fixed: `enforce_dependencies`, `enforce_privacy`, then
/// `dependencies` and `metadata` when non-empty. Nested levels indent by two
/// spaces and list items use `- `.
pub fn render_manifest(package: &Package) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "enforce_dependencies: {}\n",
        package.enforce_dependencies
    ));
    out.push_str(&format!("enforce_privacy: {}\n", package.enforce_privacy));

    if !package.dependencies.is_empty() {
        out.push_str("dependencies:\n");
        for dep in &package.dependencies {
            out.push_str(&format!("{INDENT}- {}\n", render_str(dep)));
        }
    }

    if !package.metadata.is_empty() {
        out.push_str("metadata:\n");
        write_mapping(&mut out, &package.metadata, 1);
    }

    out
}

/// Write `package` to `<repo_root>/<package dir>/package.yml`, replacing whatever is there.
pub fn write_manifest(repo_root: &Utf8Path, package: &Package) -> Result<Utf8PathBuf> {
    let path = repo_root.join(package.manifest_path().as_str());
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }
    std::fs::write(&path, render_manifest(package)).map_err(|e| Error::io(&path, e))?;
    debug!(package = %package.name, path = %path, "manifest written");
    Ok(path)
}

fn write_mapping(out: &mut String, map: &Mapping, indent: usize) {
    let pad = INDENT.repeat(indent);
    for (key, value) in map {
        write_node(out, &format!("{pad}{}:", render_key(key)), value, indent + 1);
    }
}

fn write_sequence(out: &mut String, items: &[Value], indent: usize) {
    let pad = INDENT.repeat(indent);
    for item in items {
        // Collections start on the dash line: `- key: value` / `- - item`.
        let nested = match item {
            Value::Mapping(m) if !m.is_empty() => {
                let mut s = String::new();
                write_mapping(&mut s, m, indent + 1);
                Some(s)
            }
            Value::Sequence(s) if !s.is_empty() => {
                let mut buf = String::new();
                write_sequence(&mut buf, s, indent + 1);
                Some(buf)
            }
            _ => None,
        };
        match nested {
            Some(s) => {
                out.push_str(&pad);
                out.push_str("- ");
                out.push_str(&s[(indent + 1) * INDENT.len()..]);
            }
            None => write_node(out, &format!("{pad}-"), item, indent + 1),
        }
    }
}

/// `prefix` is the key (or dash) part of the line; children go at `child_indent`.
fn write_node(out: &mut String, prefix: &str, value: &Value, child_indent: usize) {
    match value {
        Value::Null => {
            out.push_str(prefix);
            out.push('\n');
        }
        Value::Mapping(m) if m.is_empty() => out.push_str(&format!("{prefix} {{}}\n")),
        Value::Sequence(s) if s.is_empty() => out.push_str(&format!("{prefix} []\n")),
        Value::Mapping(m) => {
            out.push_str(prefix);
            out.push('\n');
            write_mapping(out, m, child_indent);
        }
        Value::Sequence(s) => {
            out.push_str(prefix);
            out.push('\n');
            write_sequence(out, s, child_indent);
        }
        Value::Tagged(tagged) => {
            write_node(
                out,
                &format!("{prefix} {}", tagged.tag),
                &tagged.value,
                child_indent,
            );
        }
        scalar => out.push_str(&format!("{prefix} {}\n", render_scalar(scalar))),
    }
}

fn render_key(key: &Value) -> String {
    match key {
        Value::Mapping(_) | Value::Sequence(_) | Value::Tagged(_) => render_flow(key),
        scalar => render_scalar(scalar),
    }
}

fn render_scalar(value: &Value) -> String {
    match value {
        Value::Null => "~".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => render_number(n),
        Value::String(s) => render_str(s),
        other => render_flow(other),
    }
}

/// Single-line form, used only for keys that are themselves collections.
fn render_flow(value: &Value) -> String {
    match value {
        Value::Sequence(items) => {
            let parts: Vec<String> = items.iter().map(render_flow).collect();
            format!("[{}]", parts.join(", "))
        }
        Value::Mapping(map) => {
            let parts: Vec<String> = map
                .iter()
                .map(|(k, v)| format!("{}: {}", render_flow(k), render_flow(v)))
                .collect();
            format!("{{{}}}", parts.join(", "))
        }
        Value::Tagged(tagged) => format!("{} {}", tagged.tag, render_flow(&tagged.value)),
        Value::String(s) if s.contains([',', '[', ']', '{', '}']) => quote(s),
        scalar => render_scalar(scalar),
    }
}

/// Floats always carry a `.` and a signed exponent, so YAML 1.1 readers see a float.
fn render_number(n: &Number) -> String {
    let text = n.to_string();
    if !n.is_f64() || text.contains('.') {
        return text;
    }
    let Some(at) = text.find(['e', 'E']) else {
        return text;
    };
    let (mantissa, exponent) = (&text[..at], &text[at + 1..]);
    if exponent.starts_with(['-', '+']) {
        format!("{mantissa}.0e{exponent}")
    } else {
        format!("{mantissa}.0e+{exponent}")
    }
}

/// Plain when a YAML 1.1 reader gets the same string back, quoted otherwise.
fn render_str(s: &str) -> String {
    if needs_quotes(s) { quote(s) } else { s.to_string() }
}

fn needs_quotes(s: &str) -> bool {
    if s.is_empty() || s.trim() != s || s.chars().any(needs_escape) || yaml::is_timestamp(s) {
        return true;
    }
    !matches!(yaml::from_str(s), Ok(Value::String(ref parsed)) if parsed == s)
}

/// Characters YAML treats as line breaks or does not allow unescaped.
fn needs_escape(c: char) -> bool {
    c.is_control() || matches!(c, '\u{2028}' | '\u{2029}' | '\u{feff}' | '\u{fffe}' | '\u{ffff}')
}

fn quote(s: &str) -> String {
    if !s.chars().any(needs_escape) {
        return format!("'{}'", s.replace('\'', "''"));
    }
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            c if needs_escape(c) => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pack() -> Package {
        let mut p = Package::new("packs/example_pack");
        p.enforce_dependencies = true;
        p.enforce_privacy = true;
        p
    }

    fn mapping(text: &str) -> Mapping {
        serde_yaml::from_str(text).expect("yaml mapping")
    }

    #[test]
    fn simple_package() {
        assert_eq!(
            render_manifest(&pack()),
            "enforce_dependencies: true\nenforce_privacy: true\n"
        );
    }

    #[test]
    fn false_flags_render_as_bare_tokens() {
        assert_eq!(
            render_manifest(&Package::new(".")),
            "enforce_dependencies: false\nenforce_privacy: false\n"
        );
    }

    #[test]
    fn dependencies_render_as_indented_block_list() {
        let mut p = pack();
        p.dependencies = vec!["my_other_pack1".to_string(), "my_other_pack2".to_string()];
        assert_eq!(
            render_manifest(&p),
            "enforce_dependencies: true\n\
             enforce_privacy: true\n\
             dependencies:\n  \
               - my_other_pack1\n  \
               - my_other_pack2\n"
        );
    }

    #[test]
    fn metadata_renders_nested_mapping() {
        let mut p = pack();
        p.metadata = mapping(
            "owner: Mission > Team\n\
             protections:\n  \
               prevent_untyped_api: fail_if_any\n  \
               prevent_violations: false\n",
        );
        assert_eq!(
            render_manifest(&p),
            "enforce_dependencies: true\n\
             enforce_privacy: true\n\
             metadata:\n  \
               owner: Mission > Team\n  \
               protections:\n    \
                 prevent_untyped_api: fail_if_any\n    \
                 prevent_violations: false\n"
        );
    }

    #[test]
    fn metadata_lists_and_empty_collections() {
        let mut p = Package::new(".");
        p.metadata = mapping(
            "owners: [a, b]\n\
             reviewers:\n  - name: x\n    slack: y\n  - z\n\
             empty_map: {}\n\
             empty_list: []\n\
             nothing: ~\n",
        );
        assert_eq!(
            render_manifest(&p),
            "enforce_dependencies: false\n\
             enforce_privacy: false\n\
             metadata:\n  \
               owners:\n    \
                 - a\n    \
                 - b\n  \
               reviewers:\n    \
                 - name: x\n      \
                   slack: y\n    \
                 - z\n  \
               empty_map: {}\n  \
               empty_list: []\n  \
               nothing:\n"
        );
    }

    #[test]
    fn ambiguous_strings_are_quoted() {
        assert_eq!(render_str("plain text"), "plain text");
        assert_eq!(render_str("Mission > Team"), "Mission > Team");
        assert_eq!(render_str("no"), "'no'");
        assert_eq!(render_str("123"), "'123'");
        assert_eq!(render_str("null"), "'null'");
        assert_eq!(render_str("a: b"), "'a: b'");
        assert_eq!(render_str("#channel"), "'#channel'");
        assert_eq!(render_str("- item"), "'- item'");
        assert_eq!(render_str(""), "''");
        assert_eq!(render_str("it's: here"), "'it''s: here'");
        assert_eq!(render_str("two\nlines"), "\"two\\nlines\"");
    }

    #[test]
    fn yaml11_typed_plain_scalars_are_quoted() {
        for s in ["Off", "yEs", "1_000", "0777", "0x1F", "1:30", "1,000", "2024-01-01", "NULL", ".inf"] {
            assert_eq!(render_str(s), format!("'{s}'"), "{s:?}");
        }
        for s in ["y", "n", "v1.2.3", "1.2.3", "packs/a", "fail_if_any"] {
            assert_eq!(render_str(s), s, "{s:?}");
        }
    }

    #[test]
    fn floats_render_with_a_dot_and_signed_exponent() {
        assert_eq!(render_number(&Number::from(2.5)), "2.5");
        assert_eq!(render_number(&Number::from(7u64)), "7");
        let big = render_number(&Number::from(1e20));
        assert!(big.contains('.'), "{big}");
        assert_eq!(yaml::resolve_plain(&big).as_f64(), Some(1e20));
    }

    #[test]
    fn quoted_output_parses_back_to_the_same_string() {
        for s in [
            "no",
            "123",
            "a: b",
            "#x",
            "- y",
            "",
            " padded ",
            "it's: here",
            "two\nlines",
            "[x",
            "tab\there \"quoted\" \\ back",
            "line\u{2028}separator",
            "2024-01-01",
            "1_000",
            "~",
        ] {
            let parsed = yaml::from_str(&render_str(s)).expect("yaml");
            assert_eq!(parsed, Value::String(s.to_string()), "{s:?}");
        }
    }
}
