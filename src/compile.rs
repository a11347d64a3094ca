//! The compile entry point.
//!
//! Ties the pieces together for one invocation:
//!
//! ```text
//! 1. Validate      config, default type        (fatal on failure)
//! 2. Allocate      render root via the host
//! 3. Index page    first README / docs index candidate → index.html
//! 4. Walk          docs root → <Type>/*.html, assets/, pass-through files
//! 5. Include       static bundle, then render root, both under the mount name
//! ```
//!
//! The returned [`CompileOutput::entries`] is the only durable result; the
//! rendered files belong to whatever the host did with the includes.

use crate::config::{ConfigError, DocsetConfig};
use crate::doctype::{self, ResolvedType};
use crate::entries::EntriesIndex;
use crate::files;
use crate::host::DocsetHost;
use crate::markdown::MarkdownRenderer;
use crate::paths::normalize_root;
use crate::walk::{self, WalkError, WalkStats, Walker};
use std::path::{Path, PathBuf};
use thiserror::Error;

const MARKDOWN_CSS: &str = include_str!("../static/markdown.css");
const HIGHLIGHT_CSS: &str = include_str!("../static/highlight.css");

/// Static bundle shipped with every docset, relative to the mount root.
pub const STATIC_FILES: &[(&str, &str)] = &[
    ("static/markdown.css", MARKDOWN_CSS),
    ("static/highlight.css", HIGHLIGHT_CSS),
];

#[derive(Error, Debug)]
pub enum CompileError {
    #[error("Invalid type \"{0}\"")]
    InvalidType(String),
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Walk(#[from] WalkError),
    #[error("Output host error: {0}")]
    Host(#[source] std::io::Error),
}

/// Result of one compile.
#[derive(Debug, Clone)]
pub struct CompileOutput {
    pub entries: EntriesIndex,
    /// Directory the pages were rendered into (host-owned).
    pub render_root: PathBuf,
    /// Normalized documentation root that was walked.
    pub docs_root: PathBuf,
    /// Index page source, if one was found.
    pub index_source: Option<PathBuf>,
    pub stats: WalkStats,
}

/// Compile with a renderer built from `config.converter`.
///
/// `working_dir` is where READMEs are looked up and `docs_path` is resolved.
pub fn compile<H: DocsetHost>(
    config: &DocsetConfig,
    working_dir: &Path,
    host: &mut H,
) -> Result<CompileOutput, CompileError> {
    let renderer = MarkdownRenderer::new(config.converter.clone());
    compile_with_renderer(config, working_dir, &renderer, host)
}

/// Compile with a caller-supplied renderer (custom highlighter and so on).
pub fn compile_with_renderer<H: DocsetHost>(
    config: &DocsetConfig,
    working_dir: &Path,
    renderer: &MarkdownRenderer,
    host: &mut H,
) -> Result<CompileOutput, CompileError> {
    config.validate()?;
    let default_type = match doctype::resolve(None, &config.docs_type) {
        ResolvedType::Known(t) => t,
        ResolvedType::Unresolved(name) => return Err(CompileError::InvalidType(name)),
    };

    let docs_root = normalize_root(&config.docs_path, working_dir);
    let render_root = host.create_temp_folder().map_err(CompileError::Host)?;
    tracing::info!(
        docs = %docs_root.display(),
        render_root = %render_root.display(),
        %default_type,
        "Compiling documentation"
    );

    let mut walker = Walker::new(
        &docs_root,
        &render_root,
        default_type,
        renderer,
        &config.mount_name,
    );

    let index_source = walk::find_index_candidate(working_dir, &docs_root, config.docs_index);
    if let Some(src) = &index_source {
        tracing::info!(src = %src.display(), "Rendering index page");
        walker.render_index(src)?;
    }
    walker.walk()?;
    let (entries, stats) = walker.finish();

    let static_dir = host.create_temp_folder().map_err(CompileError::Host)?;
    write_static_bundle(&static_dir).map_err(CompileError::Host)?;
    host.include_in_output(&static_dir, &config.mount_name)
        .map_err(CompileError::Host)?;
    host.include_in_output(&render_root, &config.mount_name)
        .map_err(CompileError::Host)?;

    Ok(CompileOutput {
        entries,
        render_root,
        docs_root,
        index_source,
        stats,
    })
}

/// Write the shipped stylesheets below `dir`.
pub fn write_static_bundle(dir: &Path) -> std::io::Result<()> {
    for (rel, content) in STATIC_FILES {
        files::write_file(&dir.join(rel), content.as_bytes())?;
    }
    Ok(())
}
