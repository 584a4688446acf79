//! `packwerk.yml` parsing and resolution of the package search settings.
//!
//! This crate is IO-free: it parses and resolves configuration provided as strings.
//! Reading the file (and treating its absence as "all defaults") is the repo crate's job.

#![forbid(unsafe_code)]

mod model;
mod patterns;
mod resolve;

use packscan_types::{Error, Result, SETTINGS_FILE};
use serde_yaml::Value;

pub use model::{RawSettings, StringOrList};
pub use patterns::{build_globset, normalize_pattern};
pub use resolve::{
    DEFAULT_EXCLUDE, DEFAULT_PACKAGE_PATHS, DEFAULT_VENDOR_PATH, ResolveOptions, Settings,
    resolve_settings,
};

/// Parse the text of `packwerk.yml` into its raw model.
///
/// An empty (or comment-only) document yields all-`None`; any other non-mapping
/// document is rejected.
pub fn parse_settings_yaml(input: &str) -> Result<RawSettings> {
    let value: Value = serde_yaml::from_str(input)
        .map_err(|e| Error::config(SETTINGS_FILE, e.to_string()))?;
    match value {
        Value::Null => Ok(RawSettings::default()),
        Value::Mapping(_) => serde_yaml::from_value(value)
            .map_err(|e| Error::config(SETTINGS_FILE, e.to_string())),
        _ => Err(Error::config(SETTINGS_FILE, "top level is not a mapping")),
    }
}

/// Parse and resolve in one step, with default options.
pub fn settings_from_yaml(input: &str) -> Result<Settings> {
    resolve_settings(parse_settings_yaml(input)?, &ResolveOptions::default())
}
