//! The entries index handed to the docset packager.
//!
//! Maps each document type to its entries (`entry name → output path`) and
//! carries one optional `index` pointer for the docset's landing page:
//!
//! ```json
//! {
//!   "index": "markdown/index.html",
//!   "Guide": { "Getting Started": "markdown/Guide/Getting%20Started.html" },
//!   "Sample": { "hello": "markdown/Sample/hello.html" }
//! }
//! ```
//!
//! Paths are prefixed with the logical mount name rather than the real temp
//! directory, so the packager can address them wherever the files end up.
//!
//! ## Invariants
//!
//! - A path that is the `index` never also appears in a type bucket.
//! - Entry names are unique per bucket; a later record with the same name
//!   replaces the earlier one.

use crate::doctype::DocumentType;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Entry name → mount-prefixed output path.
pub type Bucket = BTreeMap<String, String>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntriesIndex {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<String>,
    #[serde(flatten)]
    pub types: BTreeMap<DocumentType, Bucket>,
}

impl EntriesIndex {
    /// Path recorded for `name` under `doc_type`.
    pub fn get(&self, doc_type: DocumentType, name: &str) -> Option<&str> {
        self.types
            .get(&doc_type)
            .and_then(|bucket| bucket.get(name))
            .map(String::as_str)
    }

    pub fn bucket(&self, doc_type: DocumentType) -> Option<&Bucket> {
        self.types.get(&doc_type)
    }

    /// Number of typed entries, not counting the index pointer.
    pub fn entry_count(&self) -> usize {
        self.types.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_none() && self.entry_count() == 0
    }

    /// Whether any bucket points at `path`.
    pub fn contains_path(&self, path: &str) -> bool {
        self.types
            .values()
            .any(|bucket| bucket.values().any(|p| p == path))
    }
}

/// Accumulates an [`EntriesIndex`] during one traversal.
#[derive(Debug)]
pub struct EntriesBuilder {
    mount_name: String,
    entries: EntriesIndex,
}

impl EntriesBuilder {
    pub fn new(mount_name: impl Into<String>) -> Self {
        Self {
            mount_name: mount_name.into(),
            entries: EntriesIndex::default(),
        }
    }

    /// Logical path for a file written at `output_rel` below the render root.
    pub fn mount_path(&self, output_rel: &str) -> String {
        format!("{}/{}", self.mount_name, output_rel.trim_start_matches("./"))
    }

    /// Point the index at `output_rel` and drop any bucket entry for it.
    pub fn record_index(&mut self, output_rel: &str) {
        let path = self.mount_path(output_rel);
        self.entries.index = Some(path);
        self.sweep_index();
    }

    /// Insert or replace `name` in the `doc_type` bucket. No-op without a type.
    pub fn record_entry(&mut self, doc_type: Option<DocumentType>, name: &str, output_rel: &str) {
        let Some(doc_type) = doc_type else {
            return;
        };
        let path = self.mount_path(output_rel);
        if self.entries.index.as_deref() == Some(path.as_str()) {
            tracing::debug!(%path, "Not listing the index page under a type");
            return;
        }
        let previous = self
            .entries
            .types
            .entry(doc_type)
            .or_default()
            .insert(name.to_string(), path);
        if let Some(previous) = previous {
            tracing::debug!(%doc_type, name, %previous, "Entry replaced by a later page");
        }
    }

    /// Final sweep, then hand the index over.
    pub fn finish(mut self) -> EntriesIndex {
        self.sweep_index();
        self.entries
    }

    fn sweep_index(&mut self) {
        let Some(index) = self.entries.index.clone() else {
            return;
        };
        for bucket in self.entries.types.values_mut() {
            bucket.retain(|_, path| *path != index);
        }
        self.entries.types.retain(|_, bucket| !bucket.is_empty());
    }
}
