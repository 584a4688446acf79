use serde::Deserialize;

/// `packwerk.yml` as written by users.
///
/// Only the keys that influence package discovery are modelled; everything else in
/// the file belongs to other tools and is ignored.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct RawSettings {
    #[serde(default)]
    pub package_paths: Option<StringOrList>,

    #[serde(default)]
    pub exclude: Option<StringOrList>,
}

/// A key that accepts either a single pattern or a list of patterns.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum StringOrList {
    One(String),
    Many(Vec<String>),
}

impl StringOrList {
    pub fn into_vec(self) -> Vec<String> {
        match self {
            StringOrList::One(s) => vec![s],
            StringOrList::Many(v) => v,
        }
    }
}
