//! Shared test utilities for the mdocset test suite.
//!
//! Builds throwaway documentation trees and runs the walker over them.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let run = walk_tree(&[
//!     ("intro.md", "# Intro"),
//!     ("Sample/hello.md", "# Hello"),
//! ]);
//! assert_eq!(entry_names(&run.entries, DocumentType::Sample), ["hello"]);
//! assert!(run.read("Sample/hello.html").contains("../static/"));
//! ```

use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::doctype::DocumentType;
use crate::entries::EntriesIndex;
use crate::markdown::MarkdownRenderer;
use crate::walk::{WalkStats, Walker};

// =========================================================================
// Fixture setup
// =========================================================================

/// Write `content` to `path`, creating parent directories.
pub fn write(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, content).unwrap();
}

/// Copy `fixtures/project/` to a temp directory and return it.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/project");
    crate::files::copy_tree(&fixtures, tmp.path()).unwrap();
    tmp
}

/// Outcome of [`walk_tree`]. Holds the temp directories alive.
pub struct WalkRun {
    _project: TempDir,
    render: TempDir,
    pub entries: EntriesIndex,
    pub stats: WalkStats,
}

impl WalkRun {
    pub fn render_root(&self) -> PathBuf {
        self.render.path().to_path_buf()
    }

    /// Read a rendered file as text. Panics with the available files on miss.
    pub fn read(&self, rel: &str) -> String {
        let path = self.render.path().join(rel);
        std::fs::read_to_string(&path).unwrap_or_else(|e| {
            let files: Vec<String> = walkdir::WalkDir::new(self.render.path())
                .into_iter()
                .filter_map(Result::ok)
                .filter(|e| e.file_type().is_file())
                .map(|e| e.path().display().to_string())
                .collect();
            panic!("cannot read {rel}: {e}. Available: {files:?}")
        })
    }
}

/// Create `docs/` from `(relative path, content)` pairs and walk it with the
/// default `Guide` type and no index page.
pub fn walk_tree(files: &[(&str, &str)]) -> WalkRun {
    let project = TempDir::new().unwrap();
    let docs = project.path().join("docs");
    std::fs::create_dir_all(&docs).unwrap();
    for (rel, content) in files {
        write(&docs.join(rel), content);
    }

    let render = TempDir::new().unwrap();
    let renderer = MarkdownRenderer::default();
    let mut walker = Walker::new(
        &docs,
        render.path(),
        DocumentType::Guide,
        &renderer,
        "markdown",
    );
    walker.walk().unwrap();
    let (entries, stats) = walker.finish();

    WalkRun {
        _project: project,
        render,
        entries,
        stats,
    }
}

// =========================================================================
// Entries lookups
// =========================================================================

/// Entry names in a bucket, sorted. Empty if the bucket does not exist.
pub fn entry_names(entries: &EntriesIndex, doc_type: DocumentType) -> Vec<&str> {
    entries
        .bucket(doc_type)
        .map(|bucket| bucket.keys().map(String::as_str).collect())
        .unwrap_or_default()
}

/// Type names that have at least one entry, sorted.
pub fn type_names(entries: &EntriesIndex) -> Vec<&'static str> {
    entries.types.keys().map(|t| t.as_str()).collect()
}
