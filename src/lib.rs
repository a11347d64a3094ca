//! # mdocset
//!
//! Compiles a tree of Markdown files into HTML pages plus an entries index
//! suitable for a documentation-set browser. The directory layout is the data
//! source: a top-level directory named after a document type (`Sample`,
//! `Class`, `Guide`, ...) classifies every page inside it, and loose pages at
//! the root fall under the configured default type.
//!
//! # Pipeline
//!
//! One compile runs these steps in order:
//!
//! ```text
//! 1. Validate   docset.toml + default type           (fatal on failure)
//! 2. Index      README / docs/index.md  →  index.html
//! 3. Walk       docs/                   →  <Type>/<page>.html, assets/, copies
//! 4. Include    static bundle, render root  →  host output under the mount name
//! ```
//!
//! The result is an [`entries::EntriesIndex`]: a map from document type to
//! `{entry name → output path}`, plus the index page path. Every path is
//! prefixed with the mount name so it resolves inside the packaged output.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`compile`] | Entry point: validation, index page, walk, includes |
//! | [`walk`] | Directory traversal, classification, per-file rendering |
//! | [`markdown`] | Markdown → HTML with front matter, emoji, highlight hooks |
//! | [`template`] | The HTML page shell around rendered Markdown |
//! | [`entries`] | The entries index and its builder |
//! | [`doctype`] | The closed set of document types and lookup |
//! | [`naming`] | Entry names and output file names from raw basenames |
//! | [`paths`] | Docs root normalization and relative link prefixes |
//! | [`host`] | Temp folders and output mounting (`DocsetHost`) |
//! | [`files`] | Filesystem copy/write primitives |
//! | [`config`] | `docset.toml` loading, defaults, and validation |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Closed Type Set
//!
//! Document types are an enum, not strings. A directory whose name is not a
//! type is skipped with a warning instead of inventing a new bucket, and a
//! bad default type fails the compile before anything is written. Lookup is
//! case-insensitive; the canonical spelling is what appears in the output.
//!
//! ## One Level of Classification
//!
//! Only the first directory level is interpreted. Anything nested below a
//! type directory is copied as-is and never listed, so `Sample/data/` can hold
//! fixtures next to the pages that use them.
//!
//! ## Host Owns the Output
//!
//! The compiler renders into folders it asks the [`host::DocsetHost`] for and
//! hands them back with a mount name. It never writes to a final location
//! itself, which keeps packaging (a docset bundle, a plain directory) out of
//! the compile logic.
//!
//! ## Deterministic Output
//!
//! Buckets are ordered maps and pages depend only on their source and output
//! path, so compiling the same tree twice yields identical entries and bytes.

pub mod compile;
pub mod config;
pub mod doctype;
pub mod entries;
pub mod files;
pub mod host;
pub mod markdown;
pub mod naming;
pub mod output;
pub mod paths;
pub mod template;
pub mod walk;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use compile::{CompileError, CompileOutput, compile, compile_with_renderer};
pub use config::DocsetConfig;
pub use doctype::DocumentType;
pub use entries::EntriesIndex;
pub use host::{DirectoryHost, DocsetHost};
