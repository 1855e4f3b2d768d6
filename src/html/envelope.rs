//! The XHTML document wrapped around converted markdown.

use quire_layout::EmbeddedFont;
use std::path::Path;

const BASE_CSS: &str = r#"
  h1 { font-size: 18pt; margin-bottom: 6pt; margin-top: 12pt; }
  h2 { font-size: 16pt; margin-bottom: 6pt; margin-top: 10pt; }
  h3 { font-size: 14pt; margin-bottom: 6pt; margin-top: 8pt; }
  p  { margin-bottom: 6pt; }
  ul, ol { margin-bottom: 6pt; margin-left: 20px; }
  li { margin-bottom: 4pt; }
  code {
    font-family: monospace;
    background-color: #f0f0f0;
    padding: 2px 4px;
    border-radius: 4px;
  }
  pre {
    background-color: #f7f7f7;
    padding: 8px;
    overflow-x: auto;
    font-size: 10pt;
  }
"#;

/// A `file://` URL for `path`.
pub fn file_url(path: &Path) -> String {
    let raw = path.to_string_lossy().replace('\\', "/");
    let encoded = raw.replace('%', "%25").replace(' ', "%20");
    if encoded.starts_with('/') {
        format!("file://{}", encoded)
    } else {
        format!("file:///{}", encoded)
    }
}

/// The embedded stylesheet. With a registered font the body uses it ahead
/// of the serif fallback and an `@font-face` rule points at its file.
pub fn stylesheet(font: Option<&EmbeddedFont>) -> String {
    let mut css = String::new();
    let family = match font {
        Some(font) => {
            css.push_str(&format!(
                "\n  @font-face {{\n    font-family: \"{}\";\n    src: url(\"{}\");\n  }}",
                font.name(),
                file_url(font.path())
            ));
            format!("\"{}\", serif", font.name())
        }
        None => "serif".to_string(),
    };
    css.push_str(&format!(
        "\n  body {{\n    font-family: {};\n    line-height: 1.6;\n    font-size: 12pt;\n    margin: 0;\n    padding: 10pt 20pt;\n  }}",
        family
    ));
    css.push_str(BASE_CSS);
    css
}

/// Escapes text for an XML element body or attribute value.
pub fn xml_escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

/// A complete XHTML document with `body_html` as the body.
pub fn wrap(body_html: &str, css: &str, title: &str) -> String {
    format!(
        "<html xmlns=\"http://www.w3.org/1999/xhtml\" lang=\"zh-CN\">\n\
         <head>\n\
         <meta charset=\"utf-8\" />\n\
         <title>{}</title>\n\
         <style>{}</style>\n\
         </head>\n\
         <body>\n{}</body>\n\
         </html>\n",
        xml_escape(title),
        xml_escape(css),
        body_html
    )
}
