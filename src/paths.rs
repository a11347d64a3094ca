//! Path normalization and relative link prefixes.
//!
//! Two small jobs that everything else leans on:
//!
//! - [`normalize_root`] turns a configured documentation root (relative or
//!   absolute, `/` or `\` separated) into an absolute, forward-slash path.
//! - [`relative_prefix`] computes the `./` / `../` prefix a rendered page needs
//!   to reach the render root, from the page's own output path.
//!
//! ## Prefix Rules
//!
//! ```text
//! index.html               depth 0  →  "./"
//! Guide/intro.html         depth 1  →  "../"
//! Guide/deep/notes.html    depth 2  →  "../../"
//! ```

use std::path::{Component, Path, PathBuf};

/// Resolve a configured root against `base` into an absolute, lexically
/// cleaned path with forward slashes.
///
/// `.` components are dropped and `..` pops the previous component. The
/// filesystem is never consulted, so a missing root normalizes fine and is
/// reported later by the walker. Normalizing an already normalized path
/// returns it unchanged.
pub fn normalize_root(configured: &str, base: &Path) -> PathBuf {
    let slashed = configured.replace('\\', "/");
    let configured = Path::new(&slashed);
    let joined = if configured.is_absolute() {
        configured.to_path_buf()
    } else {
        base.join(configured)
    };

    let mut cleaned = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                cleaned.pop();
            }
            other => cleaned.push(other.as_os_str()),
        }
    }
    PathBuf::from(to_slash(&cleaned))
}

/// Render a path with `/` separators regardless of platform.
pub fn to_slash(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Number of directories between the render root and the file at `output_rel`.
pub fn output_depth(output_rel: &str) -> usize {
    output_rel
        .split('/')
        .filter(|segment| !segment.is_empty() && *segment != ".")
        .count()
        .saturating_sub(1)
}

/// Link prefix for a page written at `output_rel` below the render root.
pub fn relative_prefix(output_rel: &str) -> String {
    match output_depth(output_rel) {
        0 => "./".to_string(),
        depth => "../".repeat(depth),
    }
}
