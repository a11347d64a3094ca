//! Build configuration.
//!
//! Handles loading, validating, and merging `docset.toml`. Stock defaults are
//! the base layer; a user file only needs the keys it wants to change, and CLI
//! flags override both.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! docs_path = "docs"       # Documentation root, relative to the working directory
//! docs_type = "Guide"      # Type for pages directly in the docs root
//! docs_index = true        # Let docs/index.md act as the docset index page
//! mount_name = "markdown"  # Logical root the entries index paths are written under
//!
//! [converter]
//! tables = true
//! strikethrough = true
//! simple_line_breaks = true
//! metadata = true
//! emoji = true
//! highlight = true
//! tasklists = false
//! footnotes = false
//! smart_punctuation = false
//! heading_ids = false
//! ```
//!
//! ## Converter Overrides
//!
//! The `[converter]` table is merged key by key over the stock converter
//! options, so embedding callers can pass just `{ emoji = false }` through
//! [`ConverterOptions::with_overrides`] and keep every other default.
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name looked up in the working directory when no `--config` is given.
pub const CONFIG_FILE_NAME: &str = "docset.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Top-level build configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DocsetConfig {
    /// Documentation root, resolved against the working directory.
    pub docs_path: String,
    /// Document type for pages directly in the documentation root.
    pub docs_type: String,
    /// Consider `index.md` / `index.markdown` in the docs root as index candidates.
    pub docs_index: bool,
    /// Logical mount name prefixed to every path in the entries index.
    pub mount_name: String,
    /// Markdown converter feature switches.
    pub converter: ConverterOptions,
}

impl Default for DocsetConfig {
    fn default() -> Self {
        Self {
            docs_path: "docs".to_string(),
            docs_type: "Guide".to_string(),
            docs_index: true,
            mount_name: "markdown".to_string(),
            converter: ConverterOptions::default(),
        }
    }
}

impl DocsetConfig {
    /// Validate values that deserialize fine but cannot be built with.
    ///
    /// The default type is checked later by the compiler, which owns that
    /// failure mode.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.docs_path.trim().is_empty() {
            return Err(ConfigError::Validation(
                "docs_path must not be empty".into(),
            ));
        }
        if self.mount_name.is_empty()
            || self.mount_name.contains(['/', '\\'])
            || self.mount_name == "."
            || self.mount_name == ".."
        {
            return Err(ConfigError::Validation(format!(
                "mount_name must be a single path segment, got {:?}",
                self.mount_name
            )));
        }
        Ok(())
    }
}

/// Markdown converter feature switches.
///
/// The first six are on by default and form the baseline every docset gets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConverterOptions {
    /// GitHub-style pipe tables.
    pub tables: bool,
    /// `~~strikethrough~~`.
    pub strikethrough: bool,
    /// Single newlines inside a paragraph become `<br />`.
    pub simple_line_breaks: bool,
    /// Parse a leading YAML front-matter block instead of rendering it.
    pub metadata: bool,
    /// Expand `:shortcode:` emoji outside code.
    pub emoji: bool,
    /// Route fenced code blocks through the highlighter.
    pub highlight: bool,
    /// `- [ ]` / `- [x]` task list items.
    pub tasklists: bool,
    /// `[^note]` footnotes.
    pub footnotes: bool,
    /// Typographic quotes, dashes and ellipses.
    pub smart_punctuation: bool,
    /// `# Heading {#custom-id}` attributes.
    pub heading_ids: bool,
}

impl Default for ConverterOptions {
    fn default() -> Self {
        Self {
            tables: true,
            strikethrough: true,
            simple_line_breaks: true,
            metadata: true,
            emoji: true,
            highlight: true,
            tasklists: false,
            footnotes: false,
            smart_punctuation: false,
            heading_ids: false,
        }
    }
}

impl ConverterOptions {
    /// Stock options with `overrides` merged on top, key by key.
    pub fn with_overrides(overrides: toml::Value) -> Result<Self, ConfigError> {
        let base = toml::Value::try_from(ConverterOptions::default())
            .map_err(|e| ConfigError::Validation(e.to_string()))?;
        Ok(merge_toml(base, overrides).try_into()?)
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the base layer user overrides are merged onto.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(DocsetConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Read a config file as a raw TOML value.
pub fn load_raw_config(config_path: &Path) -> Result<toml::Value, ConfigError> {
    let content = fs::read_to_string(config_path).map_err(|source| ConfigError::Io {
        path: config_path.to_path_buf(),
        source,
    })?;
    Ok(toml::from_str(&content)?)
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<DocsetConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: DocsetConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load `docset.toml` from `dir`, falling back to stock defaults when the
/// file does not exist.
pub fn load_config(dir: &Path) -> Result<DocsetConfig, ConfigError> {
    let config_path = dir.join(CONFIG_FILE_NAME);
    let overlay = if config_path.exists() {
        Some(load_raw_config(&config_path)?)
    } else {
        None
    };
    resolve_config(stock_defaults_value(), overlay)
}

/// Load an explicitly named config file. A missing file is an error.
pub fn load_config_file(config_path: &Path) -> Result<DocsetConfig, ConfigError> {
    let overlay = load_raw_config(config_path)?;
    resolve_config(stock_defaults_value(), Some(overlay))
}

/// Returns a fully-commented stock `docset.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# mdocset Configuration
# =====================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
# Unknown keys will cause an error.

# Documentation root, relative to the working directory.
docs_path = "docs"

# Document type for pages placed directly in the docs root. Subdirectories
# named after a type (docs/Class/, docs/Sample/, ...) use that type instead.
docs_type = "Guide"

# Consider docs/index.md and docs/index.markdown as the docset index page.
# A README in the working directory still takes precedence.
docs_index = true

# Logical root every path in the entries index is written under.
mount_name = "markdown"

# ---------------------------------------------------------------------------
# Markdown converter
# ---------------------------------------------------------------------------
[converter]
# GitHub-style pipe tables.
tables = true
# ~~strikethrough~~
strikethrough = true
# Single newlines inside a paragraph become line breaks.
simple_line_breaks = true
# Parse a leading YAML front-matter block (its `title` names the page).
metadata = true
# Expand :shortcode: emoji outside code.
emoji = true
# Mark fenced code blocks for syntax highlighting.
highlight = true
# - [ ] task list items
tasklists = false
# [^note] footnotes
footnotes = false
# Typographic quotes, dashes and ellipses.
smart_punctuation = false
# "# Heading {#custom-id}" attributes.
heading_ids = false
"##
}
