//! Shared test utilities for the packscan workspace.
//!
//! Several crates build small on-disk repositories in their tests; a `#[cfg(test)]`
//! helper inside one crate would not be visible to the others, hence this crate.

use camino::{Utf8Path, Utf8PathBuf};
use tempfile::TempDir;

/// A throwaway repository root that is deleted on drop.
pub struct TempRepo {
    _dir: TempDir,
    root: Utf8PathBuf,
}

impl TempRepo {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("temp dir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf8 path");
        TempRepo { _dir: dir, root }
    }

    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    /// Write `contents` to the repo-relative `path`, creating parent directories.
    pub fn write(&self, path: &str, contents: &str) -> Utf8PathBuf {
        let abs = self.root.join(path);
        if let Some(parent) = abs.parent() {
            std::fs::create_dir_all(parent).expect("create parent");
        }
        std::fs::write(&abs, contents).expect("write file");
        abs
    }

    /// Contents of the repo-relative `path`.
    pub fn read(&self, path: &str) -> String {
        std::fs::read_to_string(self.root.join(path)).expect("read file")
    }
}

impl Default for TempRepo {
    fn default() -> Self {
        Self::new()
    }
}

/// Sorted names, for comparing discovery results that carry no ordering guarantee.
pub fn sorted<I, S>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out: Vec<String> = names.into_iter().map(|s| s.as_ref().to_string()).collect();
    out.sort();
    out
}
