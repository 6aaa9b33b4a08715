//! Rendering of restored replies as HTML-safe text.
//!
//! Runs strictly after restoration: tokens are gone by the time anything is
//! escaped or formatted, and markdown inside restored values is formatted
//! like the rest of the reply.

use crate::safety::Restored;
use regex::Regex;
use std::sync::LazyLock;

static EMPHASIS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*\*(.*?)\*\*").unwrap());

/// Render a restored reply for an HTML display sink.
///
/// Text is escaped, each restored value is optionally wrapped in a
/// `restored-data` span whose title carries the original value, then
/// `**text**` becomes `<strong>` and newlines become `<br>`.
pub fn render_html(restored: &Restored, annotate: bool) -> String {
    let mut html = String::with_capacity(restored.text.len());
    let mut last = 0;

    for span in &restored.spans {
        html.push_str(&escape_html(&restored.text[last..span.start]));
        let value = &restored.text[span.start..span.end];
        if annotate {
            html.push_str(&format!(
                r#"<span class="restored-data" title="Original value restored: {}">{}</span>"#,
                escape_attribute(value),
                escape_html(value)
            ));
        } else {
            html.push_str(&escape_html(value));
        }
        last = span.end;
    }
    html.push_str(&escape_html(&restored.text[last..]));

    let html = EMPHASIS.replace_all(&html, "<strong>${1}</strong>");
    html.replace('\n', "<br>")
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

// Attribute values must survive the emphasis and newline passes untouched.
fn escape_attribute(text: &str) -> String {
    escape_html(text)
        .replace('*', "&#42;")
        .replace('\n', "&#10;")
}
