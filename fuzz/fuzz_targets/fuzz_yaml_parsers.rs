//! Fuzz target for the YAML readers (`package.yml`, `deprecated_references.yml`, `packwerk.yml`).
//!
//! Goal: The parsers should **never panic** on any input.
//! They may return errors, but panics are unacceptable.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_yaml_parsers
//! ```

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // The files are UTF-8; anything else is rejected before parsing.
    if let Ok(text) = std::str::from_utf8(data) {
        let _ = packscan_repo::fuzz::parse_manifest(text);
        let _ = packscan_repo::fuzz::parse_ledger(text);
        let _ = packscan_repo::fuzz::parse_settings(text);
    }
});
