//! Markdown to HTML conversion.
//!
//! Wraps [pulldown-cmark](https://docs.rs/pulldown-cmark) with the feature set
//! every docset page gets, switchable through [`ConverterOptions`]:
//!
//! - GitHub-style tables and `~~strikethrough~~`
//! - simplified line breaks (a single newline inside a paragraph is a `<br />`)
//! - YAML front matter, parsed into [`RenderedMarkdown::metadata`] and never
//!   emitted as body content
//! - `:shortcode:` emoji expansion outside code
//! - fenced code routed through a pluggable [`Highlighter`]
//!
//! Rendering is a pure function of the source text and the options: it knows
//! nothing about where the page ends up.

use crate::config::ConverterOptions;
use maud::{Markup, PreEscaped, html};
use pulldown_cmark::{
    CodeBlockKind, CowStr, Event, HeadingLevel, Options, Parser, Tag, TagEnd, TextMergeStream,
    html as md_html,
};
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::sync::LazyLock;
use syntect::html::{ClassStyle, ClassedHTMLGenerator};
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;

/// Turns the contents of a code block into HTML.
///
/// `language` is the first word of the fence info string, if any. The
/// returned markup replaces the whole block, `<pre>` included.
pub trait Highlighter {
    fn highlight(&self, language: Option<&str>, code: &str) -> String;
}

static SYNTAXES: LazyLock<SyntaxSet> = LazyLock::new(SyntaxSet::load_defaults_newlines);

/// Class prefix for token spans; `static/highlight.css` styles these.
pub const TOKEN_CLASS_PREFIX: &str = "hljs-";

/// Default highlighter: tokenizes with syntect's bundled grammars and emits
/// `<span class="hljs-…">` per scope atom, inside a `<code>` tagged with
/// `hljs` and `language-*`.
///
/// Unknown languages fall back to plain text. Output is always escaped.
#[derive(Debug, Clone, Copy, Default)]
pub struct SyntaxHighlighter;

impl SyntaxHighlighter {
    fn tokens(language: Option<&str>, code: &str) -> Result<String, syntect::Error> {
        let syntaxes = &*SYNTAXES;
        let syntax = language
            .and_then(|lang| syntaxes.find_syntax_by_token(lang))
            .unwrap_or_else(|| syntaxes.find_syntax_plain_text());
        let mut generator = ClassedHTMLGenerator::new_with_class_style(
            syntax,
            syntaxes,
            ClassStyle::SpacedPrefixed {
                prefix: TOKEN_CLASS_PREFIX,
            },
        );
        for line in LinesWithEndings::from(code) {
            generator.parse_html_for_line_which_includes_newline(line)?;
        }
        Ok(generator.finalize())
    }
}

impl Highlighter for SyntaxHighlighter {
    fn highlight(&self, language: Option<&str>, code: &str) -> String {
        let class = match language {
            Some(lang) => format!("hljs language-{lang}"),
            None => "hljs".to_string(),
        };
        let body: Markup = match Self::tokens(language, code) {
            Ok(tokens) => PreEscaped(tokens),
            Err(e) => {
                tracing::warn!(
                    language = language.unwrap_or(""),
                    error = %e,
                    "Highlighting failed, emitting plain code"
                );
                html! { (code) }
            }
        };
        html! {
            pre { code class=(class) { (body) } }
        }
        .into_string()
    }
}

/// Output of a single conversion.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RenderedMarkdown {
    pub html: String,
    /// Scalar front-matter values, stringified. Empty when metadata is off.
    pub metadata: BTreeMap<String, String>,
    /// Text of the first level-one heading.
    pub first_heading: Option<String>,
}

impl RenderedMarkdown {
    /// Page title: front-matter `title`, else the first `# heading`.
    pub fn title(&self) -> Option<&str> {
        self.metadata
            .get("title")
            .or(self.first_heading.as_ref())
            .map(String::as_str)
            .filter(|t| !t.trim().is_empty())
    }
}

pub struct MarkdownRenderer {
    options: ConverterOptions,
    highlighter: Box<dyn Highlighter>,
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new(ConverterOptions::default())
    }
}

impl MarkdownRenderer {
    pub fn new(options: ConverterOptions) -> Self {
        Self {
            options,
            highlighter: Box::new(SyntaxHighlighter),
        }
    }

    /// Replace the code block highlighter.
    #[must_use]
    pub fn with_highlighter<H: Highlighter + 'static>(mut self, highlighter: H) -> Self {
        self.highlighter = Box::new(highlighter);
        self
    }

    /// Parser options for the enabled features.
    pub fn parser_options(&self) -> Options {
        let mut options = Options::empty();
        let switches = [
            (self.options.tables, Options::ENABLE_TABLES),
            (self.options.strikethrough, Options::ENABLE_STRIKETHROUGH),
            (self.options.metadata, Options::ENABLE_YAML_STYLE_METADATA_BLOCKS),
            (self.options.tasklists, Options::ENABLE_TASKLISTS),
            (self.options.footnotes, Options::ENABLE_FOOTNOTES),
            (self.options.smart_punctuation, Options::ENABLE_SMART_PUNCTUATION),
            (self.options.heading_ids, Options::ENABLE_HEADING_ATTRIBUTES),
        ];
        for (enabled, flag) in switches {
            if enabled {
                options.insert(flag);
            }
        }
        options
    }

    pub fn render(&self, source: &str) -> RenderedMarkdown {
        let parser = TextMergeStream::new(Parser::new_ext(source, self.parser_options()));

        let mut events: Vec<Event<'_>> = Vec::new();
        let mut metadata_text: Option<String> = None;
        let mut metadata = BTreeMap::new();
        let mut code: Option<(Option<String>, String)> = None;
        let mut in_code_block = false;
        let mut heading: Option<String> = None;
        let mut first_heading = None;

        for event in parser {
            match event {
                Event::Start(Tag::MetadataBlock(_)) => metadata_text = Some(String::new()),
                Event::End(TagEnd::MetadataBlock(_)) => {
                    if let Some(text) = metadata_text.take() {
                        metadata = parse_front_matter(&text);
                    }
                }
                Event::Text(text) if metadata_text.is_some() => {
                    if let Some(buf) = metadata_text.as_mut() {
                        buf.push_str(&text);
                    }
                }

                Event::Start(Tag::CodeBlock(kind)) if self.options.highlight => {
                    code = Some((fence_language(&kind), String::new()));
                }
                Event::Text(text) if code.is_some() => {
                    if let Some((_, buf)) = code.as_mut() {
                        buf.push_str(&text);
                    }
                }
                Event::End(TagEnd::CodeBlock) if code.is_some() => {
                    if let Some((language, buf)) = code.take() {
                        let highlighted = self.highlighter.highlight(language.as_deref(), &buf);
                        events.push(Event::Html(highlighted.into()));
                    }
                }
                Event::Start(Tag::CodeBlock(kind)) => {
                    in_code_block = true;
                    events.push(Event::Start(Tag::CodeBlock(kind)));
                }
                Event::End(TagEnd::CodeBlock) => {
                    in_code_block = false;
                    events.push(Event::End(TagEnd::CodeBlock));
                }

                Event::Start(Tag::Heading {
                    level: HeadingLevel::H1,
                    id,
                    classes,
                    attrs,
                }) => {
                    if first_heading.is_none() {
                        heading = Some(String::new());
                    }
                    events.push(Event::Start(Tag::Heading {
                        level: HeadingLevel::H1,
                        id,
                        classes,
                        attrs,
                    }));
                }
                Event::End(TagEnd::Heading(HeadingLevel::H1)) => {
                    if let Some(text) = heading.take() {
                        first_heading = Some(text.trim().to_string());
                    }
                    events.push(Event::End(TagEnd::Heading(HeadingLevel::H1)));
                }

                Event::Text(text) => {
                    let expanded = match expand_emoji(&text) {
                        Cow::Owned(s) if self.options.emoji && !in_code_block => Some(s),
                        _ => None,
                    };
                    let text = expanded.map(CowStr::from).unwrap_or(text);
                    if let Some(buf) = heading.as_mut() {
                        buf.push_str(&text);
                    }
                    events.push(Event::Text(text));
                }
                Event::Code(text) => {
                    if let Some(buf) = heading.as_mut() {
                        buf.push_str(&text);
                    }
                    events.push(Event::Code(text));
                }
                Event::SoftBreak if self.options.simple_line_breaks => {
                    events.push(Event::HardBreak);
                }
                other => events.push(other),
            }
        }

        let mut html = String::with_capacity(source.len() * 3 / 2);
        md_html::push_html(&mut html, events.into_iter());

        RenderedMarkdown {
            html,
            metadata,
            first_heading,
        }
    }
}

fn fence_language(kind: &CodeBlockKind<'_>) -> Option<String> {
    match kind {
        CodeBlockKind::Fenced(info) => info.split_whitespace().next().map(str::to_string),
        CodeBlockKind::Indented => None,
    }
}

/// Parse a front-matter block into scalar key/value pairs.
///
/// Nested values are dropped; unparsable YAML yields no metadata.
fn parse_front_matter(text: &str) -> BTreeMap<String, String> {
    let value: serde_yaml::Value = match serde_yaml::from_str(text) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(error = %e, "Ignoring unparsable front matter");
            return BTreeMap::new();
        }
    };
    let serde_yaml::Value::Mapping(mapping) = value else {
        return BTreeMap::new();
    };

    mapping
        .into_iter()
        .filter_map(|(key, value)| Some((scalar_to_string(key)?, scalar_to_string(value)?)))
        .collect()
}

fn scalar_to_string(value: serde_yaml::Value) -> Option<String> {
    match value {
        serde_yaml::Value::String(s) => Some(s),
        serde_yaml::Value::Bool(b) => Some(b.to_string()),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn is_shortcode_char(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '_' | '+' | '-')
}

/// Replace GitHub `:shortcode:` sequences with their emoji. Unknown codes are
/// left untouched.
pub fn expand_emoji(text: &str) -> Cow<'_, str> {
    if !text.contains(':') {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    let mut changed = false;

    while let Some(start) = rest.find(':') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        let code_len = after
            .char_indices()
            .find(|&(_, c)| !is_shortcode_char(c))
            .map(|(i, _)| i)
            .unwrap_or(after.len());

        let closed = after[code_len..].starts_with(':');
        match emojis::get_by_shortcode(&after[..code_len]).filter(|_| code_len > 0 && closed) {
            Some(emoji) => {
                out.push_str(emoji.as_str());
                rest = &after[code_len + 1..];
                changed = true;
            }
            None => {
                out.push(':');
                rest = after;
            }
        }
    }
    out.push_str(rest);

    if changed {
        Cow::Owned(out)
    } else {
        Cow::Borrowed(text)
    }
}
