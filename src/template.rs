//! Page shell around rendered Markdown.
//!
//! Every page links the shared stylesheets through a relative `prefix` so the
//! same static bundle works from `index.html` (`./`) and from pages one or more
//! directories down (`../`, `../../`). The prefix must come from the page's own
//! output path; see [`crate::paths::relative_prefix`].
//!
//! Uses [maud](https://maud.lambda.xyz/) for compile-time HTML templating, so
//! the title is escaped and the body is inserted as-is.

use maud::{DOCTYPE, Markup, PreEscaped, html};

/// Stylesheets in the static bundle, relative to the render root.
pub const STYLESHEETS: &[&str] = &["static/markdown.css", "static/highlight.css"];

/// Wrap rendered HTML in a complete page.
pub fn wrap(title: &str, content_html: &str, prefix: &str) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                @for sheet in STYLESHEETS {
                    link rel="stylesheet" href={ (prefix) (sheet) };
                }
            }
            body {
                article.markdown-body {
                    (PreEscaped(content_html))
                }
            }
        }
    }
}

/// [`wrap`] as bytes ready to write.
pub fn page_bytes(title: &str, content_html: &str, prefix: &str) -> Vec<u8> {
    wrap(title, content_html, prefix).into_string().into_bytes()
}
