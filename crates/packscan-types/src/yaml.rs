//! YAML 1.1 loading for package manifests.
//!
//! Manifests are written by tools that type plain scalars the YAML 1.1 way: `no` and
//! `off` are booleans, `1_000` and `0777` are integers. `serde_yaml` follows YAML 1.2
//! and drops scalar style, so it cannot tell `no` from `'no'`. This module builds a
//! `serde_yaml::Value` from the parser's event stream instead, typing plain untagged
//! scalars with YAML 1.1 rules and keeping quoted, block and tagged scalars as strings.

use regex::Regex;
use serde_yaml::{Mapping, Number, Value};
use std::collections::HashMap;
use std::sync::LazyLock;
use yaml_rust2::parser::{Event, EventReceiver, Parser};
use yaml_rust2::scanner::TScalarStyle;

/// Collections nested deeper than this are rejected.
pub const MAX_DEPTH: usize = 128;

/// Upper bound on nodes copied in by alias expansion.
pub const MAX_ALIAS_NODES: usize = 100_000;

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error(transparent)]
    Syntax(#[from] yaml_rust2::ScanError),

    #[error("collections nested deeper than {} levels", MAX_DEPTH)]
    TooDeep,

    #[error("aliases expand to more than {} nodes", MAX_ALIAS_NODES)]
    TooManyAliases,
}

static DECIMAL_INT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[-+]?(0|[1-9][0-9_,]*)$").expect("valid decimal regex"));
static RADIX_INT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[-+]?0(b[01_]+|o[0-7_]+|x[0-9a-fA-F_]+|[0-7_]+)$").expect("valid radix regex")
});
static SEXAGESIMAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[-+]?[0-9][0-9_]*(:[0-5]?[0-9])+(\.[0-9_]*)?$").expect("valid base 60 regex")
});
static FLOAT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[-+]?([0-9][0-9_,]*)?\.[0-9_]*([eE][-+]?[0-9]+)?$|^[-+]?[0-9][0-9_]*[eE][-+]?[0-9]+$")
        .expect("valid float regex")
});
static SPECIAL_FLOAT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([-+]?\.(inf|Inf|INF)|\.(nan|NaN|NAN))$").expect("valid special float regex")
});
static TIMESTAMP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[0-9]{4}-[0-9]{1,2}-[0-9]{1,2}(([Tt]|[ \t]+)[0-9]{1,2}:[0-9]{2}:[0-9]{2}(\.[0-9]*)?([ \t]*(Z|[-+][0-9]{1,2}(:?[0-9]{2})?))?)?$",
    )
    .expect("valid timestamp regex")
});

/// Boolean meaning of a YAML 1.1 boolean word (`yes|true|on`, `no|false|off`, any case).
pub fn yaml11_bool(s: &str) -> Option<bool> {
    const TRUE_WORDS: [&str; 3] = ["yes", "true", "on"];
    const FALSE_WORDS: [&str; 3] = ["no", "false", "off"];
    if TRUE_WORDS.iter().any(|w| s.eq_ignore_ascii_case(w)) {
        Some(true)
    } else if FALSE_WORDS.iter().any(|w| s.eq_ignore_ascii_case(w)) {
        Some(false)
    } else {
        None
    }
}

/// True for plain scalars a YAML 1.1 reader loads as a date or time.
///
/// These are kept as strings by [`resolve_plain`], but must be quoted when written.
pub fn is_timestamp(s: &str) -> bool {
    TIMESTAMP.is_match(s)
}

/// Type one plain, untagged scalar the YAML 1.1 way.
///
/// Numbers that do not fit `i64`/`u64`/`f64` and timestamps stay strings.
pub fn resolve_plain(s: &str) -> Value {
    if s.is_empty() || s == "~" || s.eq_ignore_ascii_case("null") {
        return Value::Null;
    }
    if let Some(b) = yaml11_bool(s) {
        return Value::Bool(b);
    }
    if !s.bytes().any(|b| b.is_ascii_digit()) && !SPECIAL_FLOAT.is_match(s) {
        return Value::String(s.to_string());
    }
    let number = if DECIMAL_INT.is_match(s) {
        parse_int(&strip_separators(s), 10)
    } else if RADIX_INT.is_match(s) {
        parse_radix(s)
    } else if SEXAGESIMAL.is_match(s) {
        parse_sexagesimal(s)
    } else if FLOAT.is_match(s) || SPECIAL_FLOAT.is_match(s) {
        parse_float(s)
    } else {
        None
    };
    number.map_or_else(|| Value::String(s.to_string()), Value::Number)
}

/// Parse the first document of `text`.
///
/// An empty or comment-only document is `Null`. Duplicate keys keep the last value;
/// aliases expand to a copy of their anchored node.
pub fn from_str(text: &str) -> Result<Value, LoadError> {
    let mut builder = Builder::default();
    Parser::new_from_str(text).load(&mut builder, false)?;
    builder.finish()
}

fn strip_separators(s: &str) -> String {
    s.chars().filter(|c| *c != '_' && *c != ',').collect()
}

fn parse_int(digits: &str, radix: u32) -> Option<Number> {
    let (negative, body) = match digits.as_bytes().first() {
        Some(b'-') => (true, &digits[1..]),
        Some(b'+') => (false, &digits[1..]),
        _ => (false, digits),
    };
    let magnitude = u64::from_str_radix(body, radix).ok()?;
    if negative {
        let value = 0i64.checked_sub_unsigned(magnitude)?;
        Some(Number::from(value))
    } else {
        Some(Number::from(magnitude))
    }
}

fn parse_radix(s: &str) -> Option<Number> {
    let cleaned = strip_separators(s);
    let (sign, body) = match cleaned.strip_prefix(['-', '+']) {
        Some(rest) => (&cleaned[..1], rest),
        None => ("", cleaned.as_str()),
    };
    let (radix, digits) = if let Some(d) = body.strip_prefix("0b") {
        (2, d)
    } else if let Some(d) = body.strip_prefix("0x") {
        (16, d)
    } else if let Some(d) = body.strip_prefix("0o") {
        (8, d)
    } else {
        (8, &body[1..])
    };
    if digits.is_empty() {
        return None;
    }
    parse_int(&format!("{sign}{digits}"), radix)
}

fn parse_sexagesimal(s: &str) -> Option<Number> {
    let cleaned = s.replace('_', "");
    let (negative, body) = match cleaned.strip_prefix('-') {
        Some(rest) => (true, rest.to_string()),
        None => (false, cleaned.trim_start_matches('+').to_string()),
    };
    if body.contains('.') {
        let mut total = 0f64;
        for part in body.split(':') {
            total = total * 60.0 + part.parse::<f64>().ok()?;
        }
        return Some(Number::from(if negative { -total } else { total }));
    }
    let mut total: i64 = 0;
    for part in body.split(':') {
        total = total.checked_mul(60)?.checked_add(part.parse::<i64>().ok()?)?;
    }
    Some(Number::from(if negative { -total } else { total }))
}

fn parse_float(s: &str) -> Option<Number> {
    let lower = s.to_ascii_lowercase();
    let value = match lower.as_str() {
        ".inf" | "+.inf" => f64::INFINITY,
        "-.inf" => f64::NEG_INFINITY,
        ".nan" => f64::NAN,
        _ => {
            let cleaned = strip_separators(s).replace(".e", "e").replace(".E", "E");
            cleaned.trim_end_matches('.').parse::<f64>().ok()?
        }
    };
    Some(Number::from(value))
}

enum Frame {
    Sequence { anchor: usize, items: Vec<Value> },
    Mapping { anchor: usize, map: Mapping, key: Option<Value> },
}

#[derive(Default)]
struct Builder {
    stack: Vec<Frame>,
    anchors: HashMap<usize, Value>,
    root: Option<Value>,
    alias_nodes: usize,
    failed: Option<LoadError>,
}

impl Builder {
    fn open(&mut self, frame: Frame) {
        if self.stack.len() >= MAX_DEPTH {
            self.failed = Some(LoadError::TooDeep);
        } else {
            self.stack.push(frame);
        }
    }

    fn close(&mut self) {
        let Some(frame) = self.stack.pop() else {
            return;
        };
        let (value, anchor) = match frame {
            Frame::Sequence { anchor, items } => (Value::Sequence(items), anchor),
            Frame::Mapping { anchor, map, .. } => (Value::Mapping(map), anchor),
        };
        self.node(value, anchor);
    }

    fn node(&mut self, value: Value, anchor: usize) {
        if anchor > 0 {
            self.anchors.insert(anchor, value.clone());
        }
        match self.stack.last_mut() {
            Some(Frame::Sequence { items, .. }) => items.push(value),
            Some(Frame::Mapping { map, key, .. }) => match key.take() {
                Some(k) => {
                    map.insert(k, value);
                }
                None => *key = Some(value),
            },
            None => {
                if self.root.is_none() {
                    self.root = Some(value);
                }
            }
        }
    }

    fn finish(self) -> Result<Value, LoadError> {
        match self.failed {
            Some(err) => Err(err),
            None => Ok(self.root.unwrap_or(Value::Null)),
        }
    }
}

fn node_count(value: &Value) -> usize {
    match value {
        Value::Sequence(items) => 1 + items.iter().map(node_count).sum::<usize>(),
        Value::Mapping(map) => {
            1 + map
                .iter()
                .map(|(k, v)| node_count(k) + node_count(v))
                .sum::<usize>()
        }
        Value::Tagged(tagged) => 1 + node_count(&tagged.value),
        _ => 1,
    }
}

impl EventReceiver for Builder {
    fn on_event(&mut self, ev: Event) {
        if self.failed.is_some() {
            return;
        }
        match ev {
            Event::Scalar(text, style, anchor, tag) => {
                let value = if matches!(style, TScalarStyle::Plain) && tag.is_none() {
                    resolve_plain(&text)
                } else {
                    Value::String(text)
                };
                self.node(value, anchor);
            }
            Event::SequenceStart(anchor, ..) => self.open(Frame::Sequence {
                anchor,
                items: Vec::new(),
            }),
            Event::MappingStart(anchor, ..) => self.open(Frame::Mapping {
                anchor,
                map: Mapping::new(),
                key: None,
            }),
            Event::SequenceEnd | Event::MappingEnd => self.close(),
            Event::Alias(id) => {
                let value = self.anchors.get(&id).cloned().unwrap_or(Value::Null);
                self.alias_nodes += node_count(&value);
                if self.alias_nodes > MAX_ALIAS_NODES {
                    self.failed = Some(LoadError::TooManyAliases);
                    return;
                }
                self.node(value, 0);
            }
            _ => {}
        }
    }
}
