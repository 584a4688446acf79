use globset::{GlobBuilder, GlobSet, GlobSetBuilder};

/// Bring a configured pattern into the form matched against repo-relative paths.
///
/// Leading `./` and trailing `/` are dropped, so `**/` means "every directory" and
/// `./` means the root (`.`).
pub fn normalize_pattern(pattern: &str) -> String {
    let mut p = pattern.trim();
    while let Some(rest) = p.strip_prefix("./") {
        p = rest;
    }
    let p = p.trim_end_matches('/');
    if p.is_empty() {
        ".".to_string()
    } else {
        p.to_string()
    }
}

/// Compile patterns with path-aware semantics: `*` stays within one segment,
/// `**` spans segments and `{a,b}` alternates.
pub fn build_globset(patterns: &[String]) -> Result<GlobSet, globset::Error> {
    let mut b = GlobSetBuilder::new();
    for p in patterns {
        b.add(
            GlobBuilder::new(&normalize_pattern(p))
                .literal_separator(true)
                .build()?,
        );
    }
    b.build()
}
