//! Fuzz target for manifest rendering.
//!
//! Goal: Any package whose metadata holds strings, booleans and integers must read
//! back exactly as it was written, whatever those strings look like.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_manifest_roundtrip
//! ```

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use packscan_types::Package;
use serde_yaml::Value;

#[derive(Arbitrary, Debug)]
struct PackageInput {
    segments: Vec<String>,
    enforce_dependencies: bool,
    enforce_privacy: bool,
    dependencies: Vec<String>,
    metadata: Vec<(String, MetadataInput)>,
}

#[derive(Arbitrary, Debug)]
enum MetadataInput {
    Text(String),
    Flag(bool),
    Count(i64),
}

impl From<MetadataInput> for Value {
    fn from(input: MetadataInput) -> Self {
        match input {
            MetadataInput::Text(s) => Value::String(s),
            MetadataInput::Flag(b) => Value::Bool(b),
            MetadataInput::Count(n) => Value::Number(n.into()),
        }
    }
}

fuzz_target!(|input: PackageInput| {
    if input.segments.len() > 4 || input.dependencies.len() > 20 || input.metadata.len() > 20 {
        return;
    }
    // Directory names must survive path normalization unchanged.
    let segments: Vec<&str> = input
        .segments
        .iter()
        .map(|s| s.as_str())
        .filter(|s| !s.is_empty() && !s.contains(['/', '\\']) && *s != "." && *s != "..")
        .collect();

    let mut package = Package::new(segments.join("/"));
    package.enforce_dependencies = input.enforce_dependencies;
    package.enforce_privacy = input.enforce_privacy;
    package.dependencies = input.dependencies;
    for (key, value) in input.metadata {
        package.metadata.insert(Value::String(key), value.into());
    }

    if let Err(e) = packscan_repo::fuzz::render_then_parse(&package) {
        panic!("{e}");
    }
});
