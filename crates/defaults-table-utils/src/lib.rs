//! Shared utilities for defaults-table crates.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use tempfile::Builder;

/// Replace `path` with `contents` so a docs build never reads a half-written
/// table. Goes through a sibling temp file and a rename.
pub fn atomic_write(path: &Path, contents: &str) -> io::Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => Path::new(".").to_path_buf(),
    };
    fs::create_dir_all(&parent)?;

    let mut tmp = Builder::new()
        .prefix(".defaults-table")
        .tempfile_in(&parent)?;

    tmp.as_file_mut().write_all(contents.as_bytes())?;
    tmp.as_file_mut().sync_all()?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if let Ok(metadata) = fs::metadata(path) {
            let perm = metadata.permissions().mode();
            let _ = fs::set_permissions(tmp.path(), fs::Permissions::from_mode(perm));
        }
    }

    tmp.persist(path).map(|_| ()).map_err(|err| err.error)
}

/// Detect the line terminator used by `contents`, defaulting to `\n`.
pub fn detect_line_ending(contents: &str) -> &'static str {
    match contents.find('\n') {
        Some(idx) if idx > 0 && contents.as_bytes()[idx - 1] == b'\r' => "\r\n",
        _ => "\n",
    }
}
