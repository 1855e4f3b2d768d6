//! Inline `**bold**` handling for paragraph and list item text.
//!
//! Matching is non-greedy between successive `**` pairs and never crosses a line
//! break. An unterminated `**` is left in the text and rendered literally.

use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;

static BOLD_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\*\*(.+?)\*\*").expect("bold pattern is a valid regex"));

/// A run of text with uniform emphasis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineSpan<'a> {
    pub text: &'a str,
    pub bold: bool,
}

impl<'a> InlineSpan<'a> {
    pub fn plain(text: &'a str) -> Self {
        Self { text, bold: false }
    }

    pub fn bold(text: &'a str) -> Self {
        Self { text, bold: true }
    }
}

/// Splits text into plain and bold spans. Empty plain runs are omitted.
pub fn spans(text: &str) -> Vec<InlineSpan<'_>> {
    let mut out = Vec::new();
    let mut last = 0;
    for caps in BOLD_PATTERN.captures_iter(text) {
        let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        if whole.start() > last {
            out.push(InlineSpan::plain(&text[last..whole.start()]));
        }
        out.push(InlineSpan::bold(inner.as_str()));
        last = whole.end();
    }
    if last < text.len() {
        out.push(InlineSpan::plain(&text[last..]));
    }
    out
}

/// Replaces every bold span with `open` + inner text + `close`.
pub fn emphasize<'a>(text: &'a str, open: &str, close: &str) -> Cow<'a, str> {
    BOLD_PATTERN.replace_all(text, |caps: &regex::Captures<'_>| {
        format!("{}{}{}", open, &caps[1], close)
    })
}
