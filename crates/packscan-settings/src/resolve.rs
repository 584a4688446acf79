use crate::model::RawSettings;
use crate::patterns::build_globset;
use packscan_types::{Error, Result, SETTINGS_FILE};

/// Patterns searched for packages when `package_paths` is not configured.
pub const DEFAULT_PACKAGE_PATHS: &[&str] = &["**/", "."];

/// Conventional non-package directories skipped when `exclude` is not configured.
pub const DEFAULT_EXCLUDE: &str = "{bin,node_modules,script,tmp,vendor}/**/*";

/// Where the dependency vendoring tool installs third-party code by default.
pub const DEFAULT_VENDOR_PATH: &str = "vendor/bundle";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolveOptions {
    /// Dependency vendoring directory; always excluded from discovery.
    pub vendor_path: String,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        ResolveOptions {
            vendor_path: DEFAULT_VENDOR_PATH.to_string(),
        }
    }
}

/// Effective discovery settings, normalized to ordered pattern lists.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    pub package_paths: Vec<String>,
    pub exclude: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            package_paths: default_package_paths(),
            exclude: vec![
                vendor_pattern(DEFAULT_VENDOR_PATH),
                DEFAULT_EXCLUDE.to_string(),
            ],
        }
    }
}

/// Resolve raw settings into effective pattern lists.
///
/// Configured `package_paths` are taken verbatim: unlike packwerk, `.` is not
/// appended. Discovery checks the root on its own, so a root `package.yml` is found
/// either way.
pub fn resolve_settings(raw: RawSettings, options: &ResolveOptions) -> Result<Settings> {
    let package_paths = raw
        .package_paths
        .map(|v| v.into_vec())
        .unwrap_or_else(default_package_paths);

    let mut exclude = vec![vendor_pattern(&options.vendor_path)];
    match raw.exclude {
        Some(configured) => exclude.extend(configured.into_vec()),
        None => exclude.push(DEFAULT_EXCLUDE.to_string()),
    }

    validate_patterns("package_paths", &package_paths)?;
    validate_patterns("exclude", &exclude)?;

    Ok(Settings {
        package_paths,
        exclude,
    })
}

fn default_package_paths() -> Vec<String> {
    DEFAULT_PACKAGE_PATHS.iter().map(|s| s.to_string()).collect()
}

fn vendor_pattern(vendor_path: &str) -> String {
    format!("{}/**", vendor_path.trim_end_matches('/'))
}

fn validate_patterns(key: &str, patterns: &[String]) -> Result<()> {
    build_globset(patterns)
        .map(|_| ())
        .map_err(|e| Error::config(SETTINGS_FILE, format!("invalid {key} glob: {e}")))
}
