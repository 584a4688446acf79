//! Fuzz target for the package selection rules of discovery.
//!
//! Checks, for arbitrary `package_paths`, `exclude` and directory lists:
//! - selection never panics (invalid patterns are errors)
//! - only given directories are ever selected
//! - excluding everything selects nothing
//! - widening `package_paths` never drops a selected directory
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_glob_expansion
//! ```

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use packscan_repo::fuzz::select_package_dirs;
use packscan_types::RepoPath;

#[derive(Arbitrary, Debug)]
struct SelectionInput {
    package_paths: Vec<String>,
    exclude: Vec<String>,
    dirs: Vec<String>,
}

fuzz_target!(|input: SelectionInput| {
    if input.package_paths.len() > 16 || input.exclude.len() > 16 || input.dirs.len() > 64 {
        return;
    }
    if input
        .package_paths
        .iter()
        .chain(&input.exclude)
        .any(|p| p.len() > 128)
    {
        return;
    }

    let Ok(selected) = select_package_dirs(&input.package_paths, &input.exclude, &input.dirs)
    else {
        return;
    };

    let known: Vec<String> = input
        .dirs
        .iter()
        .map(|d| RepoPath::new(d).as_str().to_string())
        .collect();
    assert!(selected.iter().all(|s| known.contains(s)), "{selected:?}");

    let mut everything = input.exclude.clone();
    everything.push("**".to_string());
    let none = select_package_dirs(&input.package_paths, &everything, &input.dirs)
        .expect("patterns already compiled once");
    assert!(none.is_empty(), "{none:?}");

    let mut wider = input.package_paths.clone();
    wider.push("**".to_string());
    let more = select_package_dirs(&wider, &input.exclude, &input.dirs)
        .expect("patterns already compiled once");
    assert!(selected.iter().all(|s| more.contains(s)), "{selected:?} vs {more:?}");
});
