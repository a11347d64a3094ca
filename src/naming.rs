//! Entry naming for rendered pages.
//!
//! Source filenames map to two different things:
//!
//! - the **entry name** shown in the docset index: percent-decoded, one
//!   trailing extension stripped (`My%20Guide.md` → `My Guide`);
//! - the **output filename** on disk: the raw basename with its last extension
//!   swapped for `.html` (`My%20Guide.md` → `My%20Guide.html`).
//!
//! Two encoded spellings of the same logical name share an entry name and
//! therefore collide in the index; the later one wins.

use percent_encoding::percent_decode_str;

const MARKDOWN_EXTENSIONS: &[&str] = &["md", "markdown"];

/// Percent-decode a basename. Invalid UTF-8 sequences are replaced.
pub fn decode_name(raw: &str) -> String {
    percent_decode_str(raw).decode_utf8_lossy().into_owned()
}

/// Strip a single trailing `.ext` from `name`.
///
/// A leading dot is not an extension separator and an empty extension is
/// kept, so `.hidden` and `notes.` come back unchanged.
pub fn strip_extension(name: &str) -> &str {
    match name.rfind('.') {
        Some(pos) if pos > 0 && pos + 1 < name.len() => &name[..pos],
        _ => name,
    }
}

/// Index entry name for a source basename.
pub fn entry_name(raw_basename: &str) -> String {
    strip_extension(&decode_name(raw_basename)).to_string()
}

/// Output filename for a rendered page.
pub fn html_file_name(raw_basename: &str) -> String {
    format!("{}.html", strip_extension(raw_basename))
}

/// Whether a file is rendered as Markdown (by extension, case-insensitive).
pub fn is_markdown(file_name: &str) -> bool {
    let stem = strip_extension(file_name);
    if stem.len() == file_name.len() {
        return false;
    }
    let ext = &file_name[stem.len() + 1..];
    MARKDOWN_EXTENSIONS
        .iter()
        .any(|known| ext.eq_ignore_ascii_case(known))
}

/// Dot-files never take part in a build.
pub fn is_hidden(file_name: &str) -> bool {
    file_name.starts_with('.')
}
