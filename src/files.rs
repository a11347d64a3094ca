//! Filesystem primitives shared by the walker and the output host.

use std::fs;
use std::io;
use std::path::Path;
use walkdir::WalkDir;

/// Write `bytes` to `path`, creating parent directories as needed.
pub fn write_file(path: &Path, bytes: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, bytes)
}

/// Copy one file byte for byte, creating parent directories as needed.
pub fn copy_file(src: &Path, dst: &Path) -> io::Result<()> {
    if let Some(parent) = dst.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::copy(src, dst)?;
    Ok(())
}

/// Copy a directory tree verbatim into `dst`, merging with what is already
/// there. Returns the number of files copied.
pub fn copy_tree(src: &Path, dst: &Path) -> io::Result<usize> {
    if !src.is_dir() {
        return Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("not a directory: {}", src.display()),
        ));
    }
    fs::create_dir_all(dst)?;
    let mut copied = 0;
    for entry in WalkDir::new(src).min_depth(1).follow_links(true) {
        let entry = entry?;
        let rel = entry
            .path()
            .strip_prefix(src)
            .map_err(|e| io::Error::other(e.to_string()))?;
        let target = dst.join(rel);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            copy_file(entry.path(), &target)?;
            copied += 1;
        }
    }
    Ok(copied)
}
