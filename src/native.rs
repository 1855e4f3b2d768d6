//! The native flow renderer: parsed blocks laid out directly onto pages.

use crate::config::RenderConfig;
use quire_layout::{
    FontLibrary, LaidOutDocument, LineLayout, PageFlow, StyleRegistry, StyledSpan, TextStyle,
    WrapOptions, layout_text,
};
use quire_markdown::{Block, inline};
use quire_render_core::{DocumentRenderer, RenderError, Report, ReportRenderer};
use quire_render_lopdf::LopdfRenderer;
use quire_style::{BlockKind, PageGeometry, ParagraphStyle, StyleSet};
use std::sync::Arc;

const BULLET: &str = "\u{2022}";

/// Renders reports by walking the block sequence in order: header first,
/// then one paragraph group per block, flowing onto new pages as they fill.
pub struct NativeFlowRenderer {
    geometry: PageGeometry,
    fonts: &'static FontLibrary,
    styles: Arc<StyleSet>,
}

impl Default for NativeFlowRenderer {
    fn default() -> Self {
        Self::with_config(&RenderConfig::default())
    }
}

impl NativeFlowRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Initializes the process font library if nobody has yet, then takes
    /// the shared style set.
    pub fn with_config(config: &RenderConfig) -> Self {
        let fonts = config.install_fonts();
        Self {
            geometry: config.page,
            fonts,
            styles: StyleRegistry::resolve(),
        }
    }

    pub fn geometry(&self) -> &PageGeometry {
        &self.geometry
    }

    pub fn styles(&self) -> &StyleSet {
        &self.styles
    }

    /// Lays out the header and `blocks` without serializing them.
    pub fn layout_blocks(
        &self,
        title: &str,
        info_lines: &[String],
        blocks: &[Block],
    ) -> Result<LaidOutDocument, RenderError> {
        let title = title.trim();
        let mut flow = PageFlow::new(self.geometry)?;
        if !title.is_empty() {
            flow = flow.with_title(title);
        }
        let width = flow.content_width();
        let spacing = self.styles.spacing;

        if !title.is_empty() {
            let style = self.styles.get(BlockKind::Title);
            let lines = self.wrap(vec![plain(title, style)], style, width);
            flow.push_paragraph(&lines, 0.0, style.space_after);
            flow.push_spacer(spacing.after_title);
        }

        let info = self.styles.get(BlockKind::Info);
        for line in info_lines {
            // Embedded newlines reach the shaper as hard breaks.
            let lines = self.wrap(vec![plain(line, info)], info, width);
            flow.push_paragraph(&lines, 0.0, info.space_after);
        }
        if !title.is_empty() || !info_lines.is_empty() {
            flow.push_spacer(spacing.after_header);
        }

        for block in blocks {
            match block {
                Block::Heading { level, text } => {
                    let style = self.styles.get(BlockKind::Heading(level.depth()));
                    let lines = self.wrap(vec![plain(text, style)], style, width);
                    if let Some(anchor) = flow.push_paragraph(&lines, 0.0, style.space_after) {
                        flow.add_outline(level.depth(), text.as_str(), anchor);
                    }
                }
                Block::Paragraph { text } => {
                    let style = self.styles.get(BlockKind::Body);
                    let lines = self.wrap(emphasized(text, style), style, width);
                    flow.push_paragraph(&lines, 0.0, style.space_after);
                }
                Block::BulletList { items } => {
                    let style = self.styles.get(BlockKind::ListItem);
                    let indent = spacing.list_indent;
                    for item in items {
                        let mut lines = self.wrap(emphasized(item, style), style, width - indent);
                        self.hang_marker(&mut lines, BULLET, style, indent);
                        flow.push_paragraph(&lines, indent, style.space_after);
                    }
                }
                Block::Blank => flow.push_spacer(spacing.blank_line),
            }
        }

        let document = flow.finish();
        log::debug!(
            "Native flow laid out {} block(s) onto {} page(s)",
            blocks.len(),
            document.page_count()
        );
        Ok(document)
    }

    /// Lays out and serializes the header and `blocks` to PDF bytes.
    pub fn render_blocks(
        &self,
        title: &str,
        info_lines: &[String],
        blocks: &[Block],
    ) -> Result<Vec<u8>, RenderError> {
        let document = self.layout_blocks(title, info_lines, blocks)?;
        LopdfRenderer::new(self.fonts).render_document(&document)
    }

    fn wrap(&self, spans: Vec<StyledSpan>, style: &ParagraphStyle, width: f32) -> Vec<LineLayout> {
        layout_text(self.fonts, &spans, &wrap_options(style, width))
    }

    /// Puts `marker` in the indent to the left of the first line.
    fn hang_marker(
        &self,
        lines: &mut Vec<LineLayout>,
        marker: &str,
        style: &ParagraphStyle,
        indent: f32,
    ) {
        let mut marker_lines = self.wrap(vec![plain(marker, style)], style, f32::INFINITY);
        if marker_lines.is_empty() {
            return;
        }
        let mut marker_line = marker_lines.remove(0);
        for item in &mut marker_line.items {
            item.x -= indent;
        }
        match lines.first_mut() {
            Some(first) => {
                first.height = first.height.max(marker_line.height);
                first.baseline = first.baseline.max(marker_line.baseline);
                first.items.splice(0..0, marker_line.items);
            }
            None => lines.push(marker_line),
        }
    }
}

impl ReportRenderer for NativeFlowRenderer {
    fn name(&self) -> &'static str {
        "native-flow"
    }

    fn render(&self, report: &Report) -> Result<Vec<u8>, RenderError> {
        let blocks = quire_markdown::parse(&report.markdown);
        self.render_blocks(&report.title, &report.info_lines, &blocks)
    }
}

fn wrap_options(style: &ParagraphStyle, width: f32) -> WrapOptions {
    WrapOptions {
        max_width: width,
        align: style.alignment,
        leading: style.leading,
        preserve_spaces: false,
    }
}

fn plain(text: &str, style: &ParagraphStyle) -> StyledSpan {
    StyledSpan::new(text, TextStyle::from_paragraph(style))
}

/// Paragraph text split into its `**bold**` spans.
fn emphasized(text: &str, style: &ParagraphStyle) -> Vec<StyledSpan> {
    inline::spans(text)
        .into_iter()
        .map(|span| {
            StyledSpan::new(
                span.text,
                TextStyle::from_paragraph(style).bold(span.bold || style.is_bold()),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use quire_markdown::HeadingLevel;
    use quire_style::{Margins, PageSize};

    fn renderer() -> NativeFlowRenderer {
        NativeFlowRenderer::new()
    }

    #[test]
    fn test_empty_report_is_one_blank_page() {
        let doc = renderer().layout_blocks("", &[], &[]).unwrap();
        assert_eq!(doc.page_count(), 1);
        assert!(doc.pages[0].elements.is_empty());
        assert!(doc.outline.is_empty());
    }

    #[test]
    fn test_title_sits_at_the_top_margin() {
        let r = renderer();
        let doc = r.layout_blocks("Annual Report", &[], &[]).unwrap();
        let first = &doc.pages[0].elements[0];
        assert_eq!(first.y, r.geometry().content_top());
        assert_eq!(first.x, r.geometry().margins.left);
        assert_eq!(doc.title.as_deref(), Some("Annual Report"));
    }

    #[test]
    fn test_info_line_breaks_become_separate_lines() {
        let info = vec!["Date: 2025-06-01\nName: Ada".to_string()];
        let doc = renderer().layout_blocks("T", &info, &[]).unwrap();
        let text = doc.page_text(0);
        assert_eq!(text, vec!["T", "Date: 2025-06-01", "Name: Ada"]);
        let ys: Vec<f32> = doc.pages[0].elements.iter().map(|e| e.y).collect();
        assert!(ys[1] < ys[2]);
    }

    #[test]
    fn test_bullets_are_indented_with_a_hung_marker() {
        let r = renderer();
        let blocks = vec![Block::bullets(["first", "second"])];
        let doc = r.layout_blocks("", &[], &blocks).unwrap();
        let elements = &doc.pages[0].elements;
        let left = r.geometry().margins.left;
        let indent = r.styles().spacing.list_indent;

        assert_eq!(doc.page_text(0), vec![BULLET, "first", BULLET, "second"]);
        assert_eq!(elements[0].x, left);
        assert_eq!(elements[1].x, left + indent);
        assert_eq!(elements[0].y, elements[1].y);
    }

    #[test]
    fn test_bold_spans_use_a_bold_face() {
        let blocks = vec![Block::paragraph("a **b** c")];
        let doc = renderer().layout_blocks("", &[], &blocks).unwrap();
        let runs: Vec<_> = doc.pages[0].texts().collect();
        let contents: Vec<&str> = runs.iter().map(|r| r.content.as_str()).collect();
        assert_eq!(contents, vec!["a ", "b", " c"]);
        assert!(runs[1].face != runs[0].face || runs[1].synthetic_bold);
        assert_eq!(runs[0].face, runs[2].face);
    }

    #[test]
    fn test_unterminated_bold_is_literal() {
        let blocks = vec![Block::paragraph("a **b c")];
        let doc = renderer().layout_blocks("", &[], &blocks).unwrap();
        assert_eq!(doc.page_text(0), vec!["a **b c"]);
    }

    #[test]
    fn test_headings_become_outline_entries() {
        let blocks = vec![
            Block::heading(HeadingLevel::H1, "Overview"),
            Block::paragraph("text"),
            Block::heading(HeadingLevel::H2, "Details"),
        ];
        let doc = renderer().layout_blocks("", &[], &blocks).unwrap();
        let titles: Vec<(u8, &str)> = doc
            .outline
            .iter()
            .map(|e| (e.level, e.title.as_str()))
            .collect();
        assert_eq!(titles, vec![(1, "Overview"), (2, "Details")]);
    }

    #[test]
    fn test_blank_adds_fixed_spacing() {
        let r = renderer();
        let tight = r
            .layout_blocks("", &[], &[Block::paragraph("a"), Block::paragraph("b")])
            .unwrap();
        let spaced = r
            .layout_blocks(
                "",
                &[],
                &[Block::paragraph("a"), Block::Blank, Block::paragraph("b")],
            )
            .unwrap();
        let gap = spaced.pages[0].elements[1].y - tight.pages[0].elements[1].y;
        assert!((gap - r.styles().spacing.blank_line).abs() < 1e-3);
    }

    #[test]
    fn test_long_content_paginates() {
        let blocks: Vec<Block> = (0..120)
            .map(|i| Block::paragraph(format!("Paragraph number {}", i)))
            .collect();
        let doc = renderer().layout_blocks("Long", &[], &blocks).unwrap();
        assert!(doc.page_count() > 1);
        let total: usize = (0..doc.page_count()).map(|p| doc.page_text(p).len()).sum();
        assert_eq!(total, 121);
    }

    #[test]
    fn test_geometry_without_content_area_fails() {
        let config = RenderConfig {
            page: PageGeometry {
                size: PageSize::Custom {
                    width: 100.0,
                    height: 100.0,
                },
                margins: Margins::all(60.0),
            },
            font_path: None,
        };
        let r = NativeFlowRenderer::with_config(&config);
        assert!(matches!(
            r.render_blocks("T", &[], &[]),
            Err(RenderError::Layout(_))
        ));
    }

    #[test]
    fn test_rendered_bytes_are_a_pdf() {
        let report = Report::new("## Section\n- item").with_title("Report");
        let bytes = renderer().render(&report).unwrap();
        assert!(bytes.starts_with(b"%PDF-"));
    }
}
