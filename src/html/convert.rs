//! Markdown to XHTML conversion.

use pulldown_cmark::{CowStr, Event, Options, Parser, html};

/// Extensions the bridge enables: tables, footnotes, strikethrough, task
/// lists and typographic punctuation.
pub fn markdown_options() -> Options {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);
    options.insert(Options::ENABLE_SMART_PUNCTUATION);
    options
}

/// Converts markdown to an XHTML body fragment. Raw HTML in the input is
/// emitted as escaped text and characters XML cannot carry are dropped, so
/// the fragment is always well-formed.
pub fn markdown_to_xhtml(markdown: &str) -> String {
    let parser = Parser::new_ext(markdown, markdown_options()).map(|event| match event {
        Event::Html(raw) => Event::Text(xml_safe(raw)),
        Event::Text(text) => Event::Text(xml_safe(text)),
        Event::Code(code) => Event::Code(xml_safe(code)),
        other => other,
    });
    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}

/// XML 1.0 `Char` production.
fn is_xml_char(ch: char) -> bool {
    matches!(
        ch,
        '\t' | '\n' | '\r'
            | '\u{20}'..='\u{D7FF}'
            | '\u{E000}'..='\u{FFFD}'
            | '\u{10000}'..='\u{10FFFF}'
    )
}

fn xml_safe(text: CowStr<'_>) -> CowStr<'_> {
    if text.chars().all(is_xml_char) {
        return text;
    }
    let kept: String = text.chars().filter(|&ch| is_xml_char(ch)).collect();
    log::debug!("Dropped {} non-XML characters", text.chars().count() - kept.chars().count());
    CowStr::from(kept)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emphasis_and_headings() {
        let html = markdown_to_xhtml("# Title\n\nSome **bold** text");
        assert!(html.contains("<h1>Title</h1>"));
        assert!(html.contains("<strong>bold</strong>"));
    }

    #[test]
    fn test_raw_html_is_escaped() {
        let html = markdown_to_xhtml("<script>alert(1)</script>\n\ntext <b>x</b>");
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("&lt;b&gt;"));
    }

    #[test]
    fn test_non_xml_characters_are_dropped() {
        let html = markdown_to_xhtml(
            "page\u{000C}break and vtab\u{000B} here\u{FFFE}\n\n`co\u{0001}de` <i\u{0008}>",
        );
        assert!(html.contains("pagebreak and vtab here"));
        assert!(html.contains("<code>code</code>"));
        assert!(html.contains("&lt;i&gt;"));
        assert!(html.chars().all(is_xml_char));
        let wrapped = format!("<body>{}</body>", html);
        assert!(roxmltree::Document::parse(&wrapped).is_ok());
    }

    #[test]
    fn test_extensions_are_enabled() {
        let html = markdown_to_xhtml("| a | b |\n|---|---|\n| 1 | 2 |\n\n~~gone~~\n\n- [x] done");
        assert!(html.contains("<table>"));
        assert!(html.contains("<del>gone</del>"));
        assert!(html.contains("checkbox"));
    }

    #[test]
    fn test_void_elements_are_self_closed() {
        let html = markdown_to_xhtml("line  \nbreak\n\n---");
        assert!(html.contains("<br />"));
        assert!(html.contains("<hr />"));
    }
}
