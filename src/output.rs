//! CLI output formatting for a compile.
//!
//! # Information-First Display
//!
//! Output is an inventory of the docset, not a file log. Each entry leads with
//! its positional index and name, followed by `→` and the index path it was
//! recorded under. Source files appear only as indented `Source:` context.
//!
//! # Output Format
//!
//! ```text
//! Index → markdown/index.html
//!     Source: README.md
//!
//! Class (1 entry)
//!     001 Walker → markdown/Class/Walker.html
//! Guide (2 entries)
//!     001 Getting Started → markdown/Guide/Getting%20Started.html
//!     002 index → markdown/Guide/index.html
//!
//! Skipped
//!     docs/Drafts/ (unknown type "Drafts")
//!
//! Rendered 5 pages, copied 4 files, skipped 1
//! ```
//!
//! # Architecture
//!
//! Each view has a `format_*` function (returns `Vec<String>`) for testability
//! and a `print_*` wrapper that writes to stdout. Format functions are pure:
//! no I/O, no side effects.

use crate::compile::CompileOutput;
use crate::entries::EntriesIndex;
use crate::walk::{SkipReason, Skipped};
use std::path::Path;

// ============================================================================
// Shared display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// `1 entry`, `2 entries`.
fn count_label(n: usize, singular: &str, plural: &str) -> String {
    if n == 1 {
        format!("{} {}", n, singular)
    } else {
        format!("{} {}", n, plural)
    }
}

/// Show `path` relative to `base` when possible, with forward slashes.
fn display_path(path: &Path, base: &Path) -> String {
    let rel = path.strip_prefix(base).unwrap_or(path);
    crate::paths::to_slash(rel)
}

fn skip_reason(reason: &SkipReason) -> String {
    match reason {
        SkipReason::UnknownType(name) => format!("unknown type \"{}\"", name),
        SkipReason::MissingRoot => "docs path does not exist".to_string(),
        SkipReason::IndexCollision => "would overwrite the index page".to_string(),
    }
}

/// Types with their entries, one block per type.
///
/// ```text
/// Guide (2 entries)
///     001 FAQ → markdown/Guide/FAQ.html
///     002 install → markdown/Guide/install.html
/// ```
fn entries_lines(entries: &EntriesIndex) -> Vec<String> {
    let mut lines = Vec::new();
    for (doc_type, bucket) in &entries.types {
        lines.push(format!(
            "{} ({})",
            doc_type,
            count_label(bucket.len(), "entry", "entries")
        ));
        for (i, (name, path)) in bucket.iter().enumerate() {
            lines.push(format!(
                "{}{} {} \u{2192} {}",
                indent(1),
                format_index(i + 1),
                name,
                path
            ));
        }
    }
    lines
}

/// `Skipped` section, empty when nothing was skipped. Directories get a
/// trailing `/`.
fn skipped_lines(skipped: &[Skipped], base: &Path) -> Vec<String> {
    if skipped.is_empty() {
        return Vec::new();
    }
    let mut lines = vec![String::new(), "Skipped".to_string()];
    for skip in skipped {
        let slash = match skip.reason {
            SkipReason::IndexCollision => "",
            SkipReason::UnknownType(_) | SkipReason::MissingRoot => "/",
        };
        lines.push(format!(
            "{}{}{} ({})",
            indent(1),
            display_path(&skip.path, base),
            slash,
            skip_reason(&skip.reason)
        ));
    }
    lines
}

// ============================================================================
// Build
// ============================================================================

/// Format the result of a compile.
///
/// `base` is the working directory; source paths are shown relative to it.
pub fn format_build_output(output: &CompileOutput, base: &Path) -> Vec<String> {
    let mut lines = Vec::new();
    let entries = &output.entries;

    match &entries.index {
        Some(index) => {
            lines.push(format!("Index \u{2192} {}", index));
            if let Some(src) = &output.index_source {
                lines.push(format!("{}Source: {}", indent(1), display_path(src, base)));
            }
        }
        None => lines.push("Index (none)".to_string()),
    }

    if !entries.types.is_empty() {
        lines.push(String::new());
    }
    lines.extend(entries_lines(entries));
    lines.extend(skipped_lines(&output.stats.skipped, base));

    lines.push(String::new());
    lines.push(format!(
        "Rendered {}, copied {}, skipped {}",
        count_label(output.stats.pages, "page", "pages"),
        count_label(output.stats.copied, "file", "files"),
        output.stats.skipped.len()
    ));

    lines
}

/// Print build output to stdout.
pub fn print_build_output(output: &CompileOutput, base: &Path) {
    for line in format_build_output(output, base) {
        println!("{}", line);
    }
}

// ============================================================================
// Check
// ============================================================================

/// What would be indexed, what was skipped, and a one-line verdict.
///
/// ```text
/// Guide (1 entry)
///     001 install → markdown/Guide/install.html
///
/// OK: 1 entry in 1 type, 0 skipped
/// ```
pub fn format_check_output(output: &CompileOutput, base: &Path) -> Vec<String> {
    let mut lines = entries_lines(&output.entries);
    lines.extend(skipped_lines(&output.stats.skipped, base));
    if !lines.is_empty() {
        lines.push(String::new());
    }
    lines.push(format!(
        "OK: {} in {}, {} skipped",
        count_label(output.entries.entry_count(), "entry", "entries"),
        count_label(output.entries.types.len(), "type", "types"),
        output.stats.skipped.len()
    ));
    lines
}

/// Print check output to stdout.
pub fn print_check_output(output: &CompileOutput, base: &Path) {
    for line in format_check_output(output, base) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doctype::DocumentType;
    use crate::entries::EntriesBuilder;
    use crate::walk::WalkStats;
    use std::path::PathBuf;

    fn sample_output() -> CompileOutput {
        let mut builder = EntriesBuilder::new("markdown");
        builder.record_index("index.html");
        builder.record_entry(Some(DocumentType::Guide), "install", "Guide/install.html");
        builder.record_entry(Some(DocumentType::Guide), "FAQ", "Guide/FAQ.html");
        builder.record_entry(Some(DocumentType::Sample), "hello", "Sample/hello.html");

        CompileOutput {
            entries: builder.finish(),
            render_root: PathBuf::from("/tmp/render"),
            docs_root: PathBuf::from("/proj/docs"),
            index_source: Some(PathBuf::from("/proj/README.md")),
            stats: WalkStats {
                pages: 4,
                copied: 1,
                skipped: vec![Skipped {
                    path: PathBuf::from("/proj/docs/Drafts"),
                    reason: SkipReason::UnknownType("Drafts".into()),
                }],
            },
        }
    }

    // =========================================================================
    // Helper tests
    // =========================================================================

    #[test]
    fn format_index_pads_to_three_digits() {
        assert_eq!(format_index(1), "001");
        assert_eq!(format_index(42), "042");
        assert_eq!(format_index(1000), "1000");
    }

    #[test]
    fn indent_levels() {
        assert_eq!(indent(0), "");
        assert_eq!(indent(2), "        ");
    }

    #[test]
    fn count_label_pluralizes() {
        assert_eq!(count_label(1, "page", "pages"), "1 page");
        assert_eq!(count_label(0, "page", "pages"), "0 pages");
        assert_eq!(count_label(3, "entry", "entries"), "3 entries");
    }

    #[test]
    fn display_path_outside_base_kept_whole() {
        assert_eq!(
            display_path(Path::new("/elsewhere/README.md"), Path::new("/proj")),
            "/elsewhere/README.md"
        );
    }

    // =========================================================================
    // Build output
    // =========================================================================

    #[test]
    fn build_output_lists_index_and_source() {
        let lines = format_build_output(&sample_output(), Path::new("/proj"));
        assert_eq!(lines[0], "Index \u{2192} markdown/index.html");
        assert_eq!(lines[1], "    Source: README.md");
    }

    #[test]
    fn build_output_groups_entries_by_type() {
        let lines = format_build_output(&sample_output(), Path::new("/proj"));
        let guide = lines.iter().position(|l| l == "Guide (2 entries)").unwrap();
        assert_eq!(lines[guide + 1], "    001 FAQ \u{2192} markdown/Guide/FAQ.html");
        assert_eq!(
            lines[guide + 2],
            "    002 install \u{2192} markdown/Guide/install.html"
        );
        assert!(lines.contains(&"Sample (1 entry)".to_string()));
    }

    #[test]
    fn build_output_reports_skips_and_summary() {
        let lines = format_build_output(&sample_output(), Path::new("/proj"));
        assert!(lines.contains(&"    docs/Drafts/ (unknown type \"Drafts\")".to_string()));
        assert_eq!(
            lines.last().unwrap(),
            "Rendered 4 pages, copied 1 file, skipped 1"
        );
    }

    #[test]
    fn build_output_without_index() {
        let mut output = sample_output();
        output.entries.index = None;
        output.index_source = None;
        let lines = format_build_output(&output, Path::new("/proj"));
        assert_eq!(lines[0], "Index (none)");
        assert_eq!(lines[1], "");
    }

    #[test]
    fn missing_root_reason() {
        assert_eq!(
            skip_reason(&SkipReason::MissingRoot),
            "docs path does not exist"
        );
    }

    #[test]
    fn index_collision_reason_has_no_slash() {
        let skipped = [Skipped {
            path: PathBuf::from("/proj/docs/index.html"),
            reason: SkipReason::IndexCollision,
        }];
        assert_eq!(
            skipped_lines(&skipped, Path::new("/proj"))[2],
            "    docs/index.html (would overwrite the index page)"
        );
    }

    // =========================================================================
    // Check output
    // =========================================================================

    #[test]
    fn check_output_lists_entries_then_verdict() {
        let lines = format_check_output(&sample_output(), Path::new("/proj"));
        assert_eq!(lines[0], "Guide (2 entries)");
        assert!(lines.contains(&"    001 hello \u{2192} markdown/Sample/hello.html".to_string()));
        assert!(lines.contains(&"    docs/Drafts/ (unknown type \"Drafts\")".to_string()));
        assert_eq!(lines.last().unwrap(), "OK: 3 entries in 2 types, 1 skipped");
    }

    #[test]
    fn check_output_for_empty_docset() {
        let mut output = sample_output();
        output.entries = EntriesIndex::default();
        output.stats = WalkStats::default();
        assert_eq!(
            format_check_output(&output, Path::new("/proj")),
            ["OK: 0 entries in 0 types, 0 skipped"]
        );
    }
}
