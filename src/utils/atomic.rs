//! Whole-file rewrites that never leave a partial file behind
//!
//! Content goes to a sibling `.tmp` file, is synced, then renamed over the
//! target. A crash leaves either the old or the new file.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::Path;

/// Replace the contents of `path` with `content`
pub fn atomic_write<P: AsRef<Path>>(path: P, content: &str) -> io::Result<()> {
    let path = path.as_ref();
    let temp_path = path.with_extension("tmp");

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut file = File::create(&temp_path)?;
    file.write_all(content.as_bytes())?;
    file.sync_all()?;
    drop(file);

    if let Err(e) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(e);
    }
    Ok(())
}
