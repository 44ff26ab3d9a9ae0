//! Shared test harness utilities for defaults-table crates.

use std::fs;
use std::io::Write;
use std::path::Path;

use defaults_table_catalog::DefaultValue::{Sentences, Text, TrueIf};
use defaults_table_catalog::OptionEntry;
use defaults_table_config::Config;

/// Returns a baseline configuration for tests.
pub fn test_config() -> Config {
    Config::builtin()
}

/// Same as [`test_config`] but resolving relative paths against `dir`.
pub fn test_config_in(dir: &Path) -> Config {
    let mut config = Config::builtin();
    config.sources.working_directory = dir.to_path_buf();
    config
}

/// Small entry set exercising shared links, anchors that differ from names,
/// and plain text values.
pub const SAMPLE_ENTRIES: &[OptionEntry] = &[
    OptionEntry {
        name: "strict",
        default: Text("`false`"),
    },
    OptionEntry {
        name: "alwaysStrict",
        default: TrueIf("strict"),
    },
    OptionEntry {
        name: "allowSyntheticDefaultImports",
        default: Sentences(&[
            "`true` if [`module`](#module) is `system`, or [`moduleResolution`](#module-resolution) is `bundler`;",
            "`false` otherwise.",
        ]),
    },
    OptionEntry {
        name: "module",
        default: Text("`CommonJS`"),
    },
];

pub fn write_file(dir: &Path, relative: &str, contents: &str) {
    let path = dir.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent directory");
    }
    let mut file = fs::File::create(&path).expect("create file");
    file.write_all(contents.as_bytes()).expect("write file");
}
