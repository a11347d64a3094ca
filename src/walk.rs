//! Documentation tree traversal.
//!
//! Walks the documentation root, decides for every entry whether to descend,
//! render, copy, or skip it, and records rendered pages in the entries index.
//!
//! ## Directory Structure
//!
//! ```text
//! README.md                    # Index page (working directory, first spelling wins)
//! docs/                        # Documentation root
//! ├── index.md                 # Index candidate when no README exists
//! ├── Getting%20Started.md     # Default type   → Guide/Getting%20Started.html
//! ├── logo.png                 # Pass-through   → logo.png
//! ├── assets/                  # Verbatim copy  → assets/...
//! ├── Sample/                  # Type directory
//! │   ├── hello.md             #                → Sample/hello.html
//! │   ├── hello.rs             # Pass-through   → Sample/hello.rs
//! │   └── data/                # Too deep: copied verbatim → Sample/data/...
//! └── Drafts/                  # Not a type: skipped with a warning
//! ```
//!
//! ## Depth Cap
//!
//! Only one level of type directory is recognized. Traversal carries an
//! explicit [`Level`]: at [`Level::Root`] a directory named after a type is
//! descended into; at [`Level::Typed`] directories are never classified and
//! are copied through as plain files.
//!
//! ## Ordering
//!
//! Entries are visited in directory-listing order. No sort is imposed.

use crate::doctype::{self, DocumentType, ResolvedType};
use crate::entries::{EntriesBuilder, EntriesIndex};
use crate::files;
use crate::markdown::MarkdownRenderer;
use crate::naming;
use crate::paths::relative_prefix;
use crate::template;
use std::borrow::Cow;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// README spellings looked up in the working directory, in priority order.
pub const README_CANDIDATES: &[&str] = &[
    "README.md",
    "README.markdown",
    "Readme.md",
    "Readme.markdown",
    "readme.md",
    "readme.markdown",
];

/// Index spellings looked up in the documentation root after the READMEs.
pub const DOCS_INDEX_CANDIDATES: &[&str] = &["index.md", "index.markdown"];

/// Directory in the docs root copied verbatim instead of walked.
pub const ASSETS_DIR: &str = "assets";

/// Output path of the designated index page, relative to the render root.
pub const INDEX_OUTPUT: &str = "index.html";

#[derive(Error, Debug)]
pub enum WalkError {
    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

fn io_at(path: &Path) -> impl FnOnce(std::io::Error) -> WalkError + '_ {
    move |source| WalkError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// What the render step does with one source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderRole {
    /// Rendered to the render root as the docset landing page.
    IndexPage,
    /// Rendered under its type directory and listed in the index.
    ClassifiedEntry { doc_type: DocumentType, name: String },
    /// Copied byte for byte, never listed.
    PassThrough,
}

/// A rendered page ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderTarget {
    pub role: RenderRole,
    /// Path below the render root, `/` separated.
    pub output_path: String,
    pub html: Vec<u8>,
}

/// Render Markdown `source` for `role` into a full page at `output_path`.
///
/// The page's link prefix is derived from `output_path`, so the same source
/// rendered at different depths yields different links.
pub fn render_target(
    renderer: &MarkdownRenderer,
    role: RenderRole,
    source: &str,
    fallback_title: &str,
    output_path: String,
) -> RenderTarget {
    let rendered = renderer.render(source);
    let title = rendered.title().unwrap_or(fallback_title);
    let prefix = relative_prefix(&output_path);
    let html = template::page_bytes(title, &rendered.html, &prefix);
    RenderTarget {
        role,
        output_path,
        html,
    }
}

/// Traversal position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level<'a> {
    /// Directly in the documentation root; files get the default type.
    Root,
    /// Inside a type directory. Nothing below this is classified.
    Typed {
        dir: &'a str,
        doc_type: DocumentType,
    },
}

/// Why an entry was left out of the build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    UnknownType(String),
    MissingRoot,
    /// A pass-through file whose output path is taken by the index page.
    IndexCollision,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Skipped {
    pub path: PathBuf,
    pub reason: SkipReason,
}

/// Counters for one traversal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WalkStats {
    pub pages: usize,
    pub copied: usize,
    pub skipped: Vec<Skipped>,
}

/// First existing index candidate: READMEs in `working_dir`, then (when
/// `docs_index` is set) `index.md`/`index.markdown` in `docs_root`.
pub fn find_index_candidate(
    working_dir: &Path,
    docs_root: &Path,
    docs_index: bool,
) -> Option<PathBuf> {
    let readmes = README_CANDIDATES.iter().map(|name| working_dir.join(name));
    let docs = DOCS_INDEX_CANDIDATES
        .iter()
        .filter(|_| docs_index)
        .map(|name| docs_root.join(name));
    readmes.chain(docs).find(|path| path.is_file())
}

pub struct Walker<'a> {
    docs_root: &'a Path,
    render_root: &'a Path,
    default_type: DocumentType,
    renderer: &'a MarkdownRenderer,
    entries: EntriesBuilder,
    index_source: Option<PathBuf>,
    stats: WalkStats,
}

impl<'a> Walker<'a> {
    pub fn new(
        docs_root: &'a Path,
        render_root: &'a Path,
        default_type: DocumentType,
        renderer: &'a MarkdownRenderer,
        mount_name: &str,
    ) -> Self {
        Self {
            docs_root,
            render_root,
            default_type,
            renderer,
            entries: EntriesBuilder::new(mount_name),
            index_source: None,
            stats: WalkStats::default(),
        }
    }

    /// Render `src` as the docset index page.
    ///
    /// If `src` lives in the documentation root the walk will not list it again.
    pub fn render_index(&mut self, src: &Path) -> Result<(), WalkError> {
        self.emit(RenderRole::IndexPage, src, INDEX_OUTPUT.to_string())?;
        self.index_source = Some(src.to_path_buf());
        Ok(())
    }

    /// Walk the documentation root. A missing root is logged, not an error.
    pub fn walk(&mut self) -> Result<(), WalkError> {
        if !self.docs_root.is_dir() {
            tracing::warn!(
                path = %self.docs_root.display(),
                "markdown docs path does not exist"
            );
            self.stats.skipped.push(Skipped {
                path: self.docs_root.to_path_buf(),
                reason: SkipReason::MissingRoot,
            });
            return Ok(());
        }
        let root = self.docs_root;
        self.walk_dir(Level::Root, root)
    }

    pub fn finish(self) -> (EntriesIndex, WalkStats) {
        (self.entries.finish(), self.stats)
    }

    fn walk_dir(&mut self, level: Level<'_>, dir: &Path) -> Result<(), WalkError> {
        let listing = fs::read_dir(dir).map_err(io_at(dir))?;
        for entry in listing {
            let entry = entry.map_err(io_at(dir))?;
            let raw_name = entry.file_name().to_string_lossy().into_owned();
            let path = entry.path();

            if naming::is_hidden(&raw_name) {
                tracing::debug!(path = %path.display(), "Skipping hidden entry");
                continue;
            }

            match level {
                Level::Root => self.visit_root_entry(&raw_name, &path)?,
                Level::Typed { dir, doc_type } => {
                    self.visit_typed_entry(dir, doc_type, &raw_name, &path)?
                }
            }
        }
        Ok(())
    }

    fn visit_root_entry(&mut self, raw_name: &str, path: &Path) -> Result<(), WalkError> {
        if path.is_dir() {
            if raw_name == ASSETS_DIR {
                let copied = files::copy_tree(path, &self.render_root.join(ASSETS_DIR))
                    .map_err(io_at(path))?;
                tracing::debug!(files = copied, "Copied assets");
                self.stats.copied += copied;
                return Ok(());
            }
            return match doctype::resolve(Some(raw_name), self.default_type.as_str()) {
                ResolvedType::Known(doc_type) => self.walk_dir(
                    Level::Typed {
                        dir: raw_name,
                        doc_type,
                    },
                    path,
                ),
                ResolvedType::Unresolved(name) => {
                    tracing::warn!(
                        path = %path.display(),
                        doc_type = %name,
                        "Skipping directory with invalid type"
                    );
                    self.stats.skipped.push(Skipped {
                        path: path.to_path_buf(),
                        reason: SkipReason::UnknownType(name),
                    });
                    Ok(())
                }
            };
        }

        if self.index_source.as_deref() == Some(path) {
            tracing::debug!(path = %path.display(), "Already rendered as index");
            return Ok(());
        }

        if naming::is_markdown(raw_name) {
            let role = RenderRole::ClassifiedEntry {
                doc_type: self.default_type,
                name: naming::entry_name(raw_name),
            };
            let output = format!("{}/{}", self.default_type, naming::html_file_name(raw_name));
            self.emit(role, path, output)
        } else if self.index_source.is_some() && raw_name.eq_ignore_ascii_case(INDEX_OUTPUT) {
            tracing::warn!(
                path = %path.display(),
                "Skipping file that would overwrite the index page"
            );
            self.stats.skipped.push(Skipped {
                path: path.to_path_buf(),
                reason: SkipReason::IndexCollision,
            });
            Ok(())
        } else {
            self.emit(RenderRole::PassThrough, path, raw_name.to_string())
        }
    }

    fn visit_typed_entry(
        &mut self,
        dir: &str,
        doc_type: DocumentType,
        raw_name: &str,
        path: &Path,
    ) -> Result<(), WalkError> {
        if path.is_dir() {
            // one level of type directories only
            tracing::debug!(
                path = %path.display(),
                parent = dir,
                "Copying nested directory without classifying"
            );
            let dest = self.render_root.join(doc_type.as_str()).join(raw_name);
            let copied = files::copy_tree(path, &dest).map_err(io_at(path))?;
            self.stats.copied += copied;
            return Ok(());
        }

        if naming::is_markdown(raw_name) {
            let role = RenderRole::ClassifiedEntry {
                doc_type,
                name: naming::entry_name(raw_name),
            };
            let output = format!("{}/{}", doc_type, naming::html_file_name(raw_name));
            self.emit(role, path, output)
        } else {
            let output = format!("{}/{}", doc_type, raw_name);
            self.emit(RenderRole::PassThrough, path, output)
        }
    }

    fn emit(&mut self, role: RenderRole, src: &Path, output_path: String) -> Result<(), WalkError> {
        let dest = self.render_root.join(&output_path);

        if role == RenderRole::PassThrough {
            files::copy_file(src, &dest).map_err(io_at(src))?;
            self.stats.copied += 1;
            return Ok(());
        }

        let bytes = fs::read(src).map_err(io_at(src))?;
        let source = String::from_utf8_lossy(&bytes);
        if let Cow::Owned(_) = source {
            tracing::warn!(path = %src.display(), "Replaced invalid UTF-8 in Markdown source");
        }
        let fallback_title = src
            .file_name()
            .map(|n| naming::entry_name(&n.to_string_lossy()))
            .unwrap_or_default();
        let target = render_target(self.renderer, role, &source, &fallback_title, output_path);
        files::write_file(&dest, &target.html).map_err(io_at(&dest))?;
        self.stats.pages += 1;

        match target.role {
            RenderRole::IndexPage => self.entries.record_index(&target.output_path),
            RenderRole::ClassifiedEntry { doc_type, name } => {
                self.entries
                    .record_entry(Some(doc_type), &name, &target.output_path)
            }
            RenderRole::PassThrough => {}
        }
        tracing::debug!(src = %src.display(), output = %target.output_path, "Rendered page");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;
    use tempfile::TempDir;

    #[test]
    fn render_target_prefix_follows_output_depth() {
        let renderer = MarkdownRenderer::default();
        let root = render_target(&renderer, RenderRole::IndexPage, "# Hi", "x", "index.html".into());
        let nested = render_target(
            &renderer,
            RenderRole::ClassifiedEntry {
                doc_type: DocumentType::Guide,
                name: "page".into(),
            },
            "# Hi",
            "x",
            "Guide/deep/page.html".into(),
        );
        let root = String::from_utf8(root.html).unwrap();
        let nested = String::from_utf8(nested.html).unwrap();
        assert!(root.contains(r#"href="./static/markdown.css""#));
        assert!(nested.contains(r#"href="../../static/markdown.css""#));
    }

    #[test]
    fn render_target_title_falls_back() {
        let renderer = MarkdownRenderer::default();
        let target = render_target(&renderer, RenderRole::IndexPage, "no heading", "README", "index.html".into());
        assert!(String::from_utf8(target.html).unwrap().contains("<title>README</title>"));
    }

    #[test]
    fn readme_wins_over_docs_index() {
        let tmp = TempDir::new().unwrap();
        let docs = tmp.path().join("docs");
        write(&docs.join("index.md"), "# Docs index");
        write(&tmp.path().join("README.md"), "# Readme");

        let found = find_index_candidate(tmp.path(), &docs, true).unwrap();
        assert_eq!(found, tmp.path().join("README.md"));
    }

    #[test]
    fn readme_spellings_follow_priority() {
        let tmp = TempDir::new().unwrap();
        write(&tmp.path().join("Readme.markdown"), "b");
        write(&tmp.path().join("README.markdown"), "a");

        let found = find_index_candidate(tmp.path(), tmp.path(), false).unwrap();
        assert_eq!(found.file_name().unwrap(), "README.markdown");
    }

    #[test]
    fn docs_index_used_without_readme() {
        let tmp = TempDir::new().unwrap();
        let docs = tmp.path().join("docs");
        write(&docs.join("index.markdown"), "# Docs");

        let found = find_index_candidate(tmp.path(), &docs, true).unwrap();
        assert_eq!(found, docs.join("index.markdown"));
    }

    #[test]
    fn docs_index_ignored_when_disabled() {
        let tmp = TempDir::new().unwrap();
        let docs = tmp.path().join("docs");
        write(&docs.join("index.md"), "# Docs");
        assert_eq!(find_index_candidate(tmp.path(), &docs, false), None);
    }

    #[test]
    fn root_markdown_gets_default_type() {
        let run = walk_tree(&[("intro.md", "# Intro")]);
        assert_eq!(
            run.entries.get(DocumentType::Guide, "intro"),
            Some("markdown/Guide/intro.html")
        );
        assert!(run.render_root().join("Guide/intro.html").is_file());
    }

    #[test]
    fn type_directory_sets_type() {
        let run = walk_tree(&[("Sample/hello.md", "# Hello"), ("sample/bye.md", "# Bye")]);
        assert_eq!(
            run.entries.get(DocumentType::Sample, "hello"),
            Some("markdown/Sample/hello.html")
        );
        // lowercase directory resolves to the canonical type directory
        assert_eq!(
            run.entries.get(DocumentType::Sample, "bye"),
            Some("markdown/Sample/bye.html")
        );
    }

    #[test]
    fn typed_page_links_one_level_up() {
        let run = walk_tree(&[("Sample/hello.md", "# Hello")]);
        let page = run.read("Sample/hello.html");
        assert!(page.contains(r#"href="../static/markdown.css""#));
        assert!(page.contains("<title>Hello</title>"));
    }

    #[test]
    fn unknown_type_directory_is_skipped() {
        let run = walk_tree(&[("NotAType/x.md", "# X")]);
        assert!(run.entries.is_empty());
        assert!(!run.render_root().join("NotAType").exists());
        assert_eq!(run.stats.pages, 0);
        assert_eq!(
            run.stats.skipped[0].reason,
            SkipReason::UnknownType("NotAType".into())
        );
    }

    #[test]
    fn nested_directories_are_never_classified() {
        let run = walk_tree(&[
            ("Guide/sub/sub/file.md", "# Deep"),
            ("Guide/sub/diagram.png", "png"),
        ]);
        assert_eq!(run.entries.entry_count(), 0);
        // copied through as-is, not rendered
        assert!(run.render_root().join("Guide/sub/sub/file.md").is_file());
        assert!(!run.render_root().join("Guide/sub/sub/file.html").exists());
        assert!(run.render_root().join("Guide/sub/diagram.png").is_file());
    }

    #[test]
    fn assets_copied_verbatim_and_not_indexed() {
        let run = walk_tree(&[("assets/logo.png", "\u{89}PNG-bytes"), ("assets/css/x.md", "# no")]);
        assert_eq!(
            std::fs::read(run.render_root().join("assets/logo.png")).unwrap(),
            "\u{89}PNG-bytes".as_bytes()
        );
        assert!(run.render_root().join("assets/css/x.md").is_file());
        assert!(run.entries.is_empty());
    }

    #[test]
    fn non_markdown_files_pass_through() {
        let run = walk_tree(&[("logo.svg", "<svg/>"), ("Sample/main.rs", "fn main() {}")]);
        assert!(run.render_root().join("logo.svg").is_file());
        assert_eq!(run.read("Sample/main.rs"), "fn main() {}");
        assert!(run.entries.is_empty());
        assert_eq!(run.stats.copied, 2);
    }

    #[test]
    fn percent_encoded_names_are_decoded() {
        let run = walk_tree(&[("My%20Guide.md", "# Mine")]);
        assert_eq!(
            run.entries.get(DocumentType::Guide, "My Guide"),
            Some("markdown/Guide/My%20Guide.html")
        );
    }

    #[test]
    fn hidden_entries_are_ignored() {
        let run = walk_tree(&[(".draft.md", "# no"), (".git/config", "x"), ("ok.md", "# ok")]);
        assert_eq!(run.entries.entry_count(), 1);
        assert!(!run.render_root().join(".git").exists());
    }

    #[test]
    fn missing_root_is_not_an_error() {
        let tmp = TempDir::new().unwrap();
        let render = TempDir::new().unwrap();
        let renderer = MarkdownRenderer::default();
        let missing = tmp.path().join("nope");
        let mut walker = Walker::new(&missing, render.path(), DocumentType::Guide, &renderer, "markdown");
        walker.walk().unwrap();
        let (entries, stats) = walker.finish();
        assert!(entries.is_empty());
        assert_eq!(stats.skipped[0].reason, SkipReason::MissingRoot);
    }

    #[test]
    fn docs_index_is_not_listed_twice() {
        let tmp = TempDir::new().unwrap();
        let docs = tmp.path().join("docs");
        write(&docs.join("index.md"), "# Welcome");
        write(&docs.join("intro.md"), "# Intro");
        let render = TempDir::new().unwrap();
        let renderer = MarkdownRenderer::default();

        let mut walker = Walker::new(&docs, render.path(), DocumentType::Guide, &renderer, "markdown");
        let index = find_index_candidate(tmp.path(), &docs, true).unwrap();
        walker.render_index(&index).unwrap();
        walker.walk().unwrap();
        let (entries, _) = walker.finish();

        assert_eq!(entries.index.as_deref(), Some("markdown/index.html"));
        assert_eq!(entries.get(DocumentType::Guide, "index"), None);
        assert!(entries.get(DocumentType::Guide, "intro").is_some());
        assert!(render.path().join("index.html").is_file());
        assert!(!render.path().join("Guide/index.html").exists());
    }

    #[test]
    fn invalid_utf8_is_replaced_not_fatal() {
        let tmp = TempDir::new().unwrap();
        let docs = tmp.path().join("docs");
        std::fs::create_dir_all(&docs).unwrap();
        std::fs::write(docs.join("caf.md"), b"# Caf\xe9\n").unwrap();
        write(&docs.join("good.md"), "# Good");
        let render = TempDir::new().unwrap();
        let renderer = MarkdownRenderer::default();

        let mut walker = Walker::new(&docs, render.path(), DocumentType::Guide, &renderer, "markdown");
        walker.walk().unwrap();
        let (entries, stats) = walker.finish();

        assert_eq!(stats.pages, 2);
        assert!(entries.get(DocumentType::Guide, "good").is_some());
        let page = std::fs::read_to_string(render.path().join("Guide/caf.html")).unwrap();
        assert!(page.contains("Caf\u{FFFD}"));
    }

    #[test]
    fn missing_markdown_source_propagates_io_error() {
        let tmp = TempDir::new().unwrap();
        let render = TempDir::new().unwrap();
        let renderer = MarkdownRenderer::default();
        let mut walker = Walker::new(tmp.path(), render.path(), DocumentType::Guide, &renderer, "markdown");

        let err = walker.render_index(&tmp.path().join("README.md")).unwrap_err();
        assert!(err.to_string().contains("README.md"));
    }

    #[test]
    fn root_file_cannot_overwrite_index_page() {
        let tmp = TempDir::new().unwrap();
        let docs = tmp.path().join("docs");
        write(&tmp.path().join("README.md"), "# Landing");
        write(&docs.join("index.html"), "RAW LEGACY FILE");
        write(&docs.join("intro.md"), "# Intro");
        let render = TempDir::new().unwrap();
        let renderer = MarkdownRenderer::default();

        let mut walker = Walker::new(&docs, render.path(), DocumentType::Guide, &renderer, "markdown");
        let index = find_index_candidate(tmp.path(), &docs, true).unwrap();
        walker.render_index(&index).unwrap();
        walker.walk().unwrap();
        let (entries, stats) = walker.finish();

        assert_eq!(entries.index.as_deref(), Some("markdown/index.html"));
        let page = std::fs::read_to_string(render.path().join("index.html")).unwrap();
        assert!(page.contains("Landing"));
        assert!(!page.contains("RAW LEGACY FILE"));
        assert_eq!(stats.skipped.len(), 1);
        assert_eq!(stats.skipped[0].reason, SkipReason::IndexCollision);
    }

    #[test]
    fn root_index_html_copied_when_no_index_page() {
        let run = walk_tree(&[("index.html", "RAW LEGACY FILE")]);
        assert_eq!(run.read("index.html"), "RAW LEGACY FILE");
        assert!(run.stats.skipped.is_empty());
    }
}
