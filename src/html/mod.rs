//! The HTML-bridge renderer: markdown converted to XHTML, wrapped in a styled
//! envelope and rasterized onto pages.

pub mod computed;
pub mod convert;
pub mod css;
pub mod envelope;
pub mod rasterize;

use crate::config::RenderConfig;
use quire_layout::{FontLibrary, LaidOutDocument};
use quire_render_core::{DocumentRenderer, RenderError, Report, ReportRenderer};
use quire_render_lopdf::LopdfRenderer;
use quire_style::PageGeometry;

const ENVELOPE_TITLE: &str = "Markdown to PDF";

pub struct HtmlBridgeRenderer {
    geometry: PageGeometry,
    fonts: &'static FontLibrary,
}

impl Default for HtmlBridgeRenderer {
    fn default() -> Self {
        Self::with_config(&RenderConfig::default())
    }
}

impl HtmlBridgeRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: &RenderConfig) -> Self {
        Self {
            geometry: config.page,
            fonts: config.install_fonts(),
        }
    }

    pub fn geometry(&self) -> &PageGeometry {
        &self.geometry
    }

    /// The complete XHTML document for `markdown`, stylesheet included.
    pub fn envelope(&self, markdown: &str) -> String {
        let body = convert::markdown_to_xhtml(markdown);
        let css = envelope::stylesheet(self.fonts.embedded());
        envelope::wrap(&body, &css, ENVELOPE_TITLE)
    }

    pub fn layout_xhtml(&self, xhtml: &str) -> Result<LaidOutDocument, RenderError> {
        rasterize::rasterize(xhtml, self.fonts, self.geometry)
    }

    pub fn layout_markdown(&self, markdown: &str) -> Result<LaidOutDocument, RenderError> {
        self.layout_xhtml(&self.envelope(markdown))
    }

    /// Renders an already built XHTML document.
    pub fn render_xhtml(&self, xhtml: &str) -> Result<Vec<u8>, RenderError> {
        let document = self.layout_xhtml(xhtml)?;
        LopdfRenderer::new(self.fonts).render_document(&document)
    }

    pub fn render_markdown(&self, markdown: &str) -> Result<Vec<u8>, RenderError> {
        let bytes = self.render_xhtml(&self.envelope(markdown))?;
        log::debug!(
            "HTML bridge rendered {} bytes of markdown to {} PDF bytes",
            markdown.len(),
            bytes.len()
        );
        Ok(bytes)
    }
}

impl ReportRenderer for HtmlBridgeRenderer {
    fn name(&self) -> &'static str {
        "html-bridge"
    }

    /// Renders the markdown only. Callers that want the title and info lines
    /// on the page pass `Report::to_markdown_document()` as the markdown.
    fn render(&self, report: &Report) -> Result<Vec<u8>, RenderError> {
        self.render_markdown(&report.markdown)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn renderer() -> HtmlBridgeRenderer {
        HtmlBridgeRenderer::new()
    }

    #[test]
    fn test_envelope_parses_as_xml() {
        let xhtml = renderer().envelope("# T\n\n<script>alert(1)</script>\n\n- [x] done");
        let doc = roxmltree::Document::parse(&xhtml).unwrap();
        assert_eq!(doc.root_element().tag_name().name(), "html");
        assert!(!doc.descendants().any(|n| n.tag_name().name() == "script"));
    }

    #[test]
    fn test_markdown_layout() {
        let doc = renderer()
            .layout_markdown("# Title\n\nBody with **bold**.\n\n1. one\n2. two\n")
            .unwrap();
        assert_eq!(doc.outline.len(), 1);
        assert_eq!(doc.outline[0].title, "Title");
        let text = doc.page_text(0).concat();
        assert!(text.contains("Title"));
        assert!(text.contains("1.one"));
        assert!(text.contains("2.two"));
        assert_eq!(doc.title.as_deref(), Some(ENVELOPE_TITLE));
    }

    #[test]
    fn test_body_padding_offsets_content() {
        let r = renderer();
        let doc = r.layout_markdown("text").unwrap();
        let first = &doc.pages[0].elements[0];
        // padding: 10pt 20pt
        assert!((first.x - (r.geometry().margins.left + 20.0)).abs() < 1e-3);
        assert!(first.y >= r.geometry().content_top() + 10.0);
    }

    #[test]
    fn test_report_header_is_ignored() {
        let r = renderer();
        let report = Report::new("body").with_title("Ignored title");
        let bytes = r.render(&report).unwrap();
        assert!(bytes.starts_with(b"%PDF-"));
        let doc = r.layout_markdown(&report.markdown).unwrap();
        assert!(!doc.page_text(0).concat().contains("Ignored"));
        assert_eq!(r.name(), "html-bridge");
    }

    #[test]
    fn test_long_markdown_paginates() {
        let markdown: String = (0..200).map(|i| format!("Paragraph number {}\n\n", i)).collect();
        let doc = renderer().layout_markdown(&markdown).unwrap();
        assert!(doc.page_count() > 1);
    }

    #[test]
    fn test_invalid_xhtml_is_an_html_error() {
        let err = renderer().render_xhtml("<html><body>").unwrap_err();
        assert!(matches!(err, RenderError::Html(_)));
    }
}
