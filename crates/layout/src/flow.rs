//! Vertical page flow.
//!
//! `PageFlow` stacks lines, spacers and rules down the content area and starts
//! a new page whenever the next piece does not fit. Pages are never broken
//! explicitly by content type; only accumulated height decides.

use crate::error::LayoutError;
use crate::output::{
    LaidOutDocument, LaidOutPage, LayoutElement, OutlineEntry, PositionedElement, TextRun,
};
use crate::text::LineLayout;
use quire_style::{Color, PageGeometry};

const EPSILON: f32 = 0.01;

/// Where a piece of content landed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Anchor {
    pub page_index: usize,
    pub y: f32,
}

#[derive(Debug, Clone)]
struct OpenBackground {
    fill: Color,
    x: f32,
    width: f32,
    padding: f32,
    top: f32,
    insert_at: usize,
}

pub struct PageFlow {
    geometry: PageGeometry,
    pages: Vec<LaidOutPage>,
    current: LaidOutPage,
    cursor: f32,
    outline: Vec<OutlineEntry>,
    title: Option<String>,
    background: Option<OpenBackground>,
}

impl PageFlow {
    pub fn new(geometry: PageGeometry) -> Result<Self, LayoutError> {
        if !geometry.has_content_area() {
            return Err(LayoutError::InvalidGeometry {
                width: geometry.page_width(),
                height: geometry.page_height(),
            });
        }
        Ok(Self {
            cursor: geometry.content_top(),
            geometry,
            pages: Vec::new(),
            current: LaidOutPage::default(),
            outline: Vec::new(),
            title: None,
            background: None,
        })
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn geometry(&self) -> &PageGeometry {
        &self.geometry
    }

    pub fn content_width(&self) -> f32 {
        self.geometry.content_width()
    }

    /// Space left on the current page.
    pub fn remaining(&self) -> f32 {
        (self.geometry.content_bottom() - self.cursor).max(0.0)
    }

    fn is_fresh(&self) -> bool {
        self.current.elements.is_empty() && self.cursor <= self.geometry.content_top() + EPSILON
    }

    fn fits(&self, height: f32) -> bool {
        self.cursor + height <= self.geometry.content_bottom() + EPSILON
    }

    fn push_element(&mut self, element: PositionedElement) {
        self.current.elements.push(element);
    }

    /// Starts a new page. An empty page is reused rather than emitted.
    pub fn break_page(&mut self) {
        self.close_background_segment();
        if !self.current.elements.is_empty() {
            self.pages.push(std::mem::take(&mut self.current));
        }
        self.cursor = self.geometry.content_top();
        if let Some(bg) = self.background.as_mut() {
            bg.top = self.cursor;
            bg.insert_at = 0;
        }
    }

    /// Fixed vertical space. A spacer that does not fit ends the page and is
    /// dropped.
    pub fn push_spacer(&mut self, height: f32) {
        if height <= 0.0 {
            return;
        }
        if self.fits(height) {
            self.cursor += height;
        } else {
            self.cursor = self.geometry.content_bottom();
        }
    }

    /// Places one line `indent` points right of the left margin.
    pub fn push_line(&mut self, line: &LineLayout, indent: f32) -> Anchor {
        if !self.fits(line.height) && !self.is_fresh() {
            self.break_page();
        }

        let top = self.cursor;
        let left = self.geometry.margins.left + indent;
        for item in &line.items {
            let size = item.style.size;
            let x = left + item.x;
            self.push_element(PositionedElement {
                x,
                y: top,
                width: item.width,
                height: line.height,
                element: LayoutElement::Text(TextRun {
                    content: item.text.clone(),
                    face: item.face,
                    size,
                    color: item.style.color,
                    synthetic_bold: item.synthetic_bold,
                    baseline: line.baseline,
                }),
            });
            let color = item.style.color;
            if item.style.underline {
                let y = top + line.baseline + size * 0.1;
                self.push_decoration(x, y, item.width, size, color);
            }
            if item.style.strike {
                let y = top + line.baseline - size * 0.3;
                self.push_decoration(x, y, item.width, size, color);
            }
        }
        self.cursor += line.height;

        Anchor {
            page_index: self.pages.len(),
            y: top,
        }
    }

    fn push_decoration(&mut self, x: f32, y: f32, width: f32, size: f32, color: Color) {
        self.push_element(PositionedElement {
            x,
            y,
            width,
            height: (size * 0.06).max(0.5),
            element: LayoutElement::Rectangle { fill: color },
        });
    }

    /// Places `lines` in order and returns where the first one landed.
    pub fn push_lines(&mut self, lines: &[LineLayout], indent: f32) -> Option<Anchor> {
        let mut first = None;
        for line in lines {
            let anchor = self.push_line(line, indent);
            first.get_or_insert(anchor);
        }
        first
    }

    /// Lines followed by the paragraph's trailing space.
    pub fn push_paragraph(
        &mut self,
        lines: &[LineLayout],
        indent: f32,
        space_after: f32,
    ) -> Option<Anchor> {
        let anchor = self.push_lines(lines, indent);
        self.push_spacer(space_after);
        anchor
    }

    /// A horizontal rule of `thickness` spanning `width` from `indent`.
    pub fn push_rule(&mut self, indent: f32, width: f32, thickness: f32, color: Color) {
        if !self.fits(thickness) && !self.is_fresh() {
            self.break_page();
        }
        self.push_element(PositionedElement {
            x: self.geometry.margins.left + indent,
            y: self.cursor,
            width,
            height: thickness,
            element: LayoutElement::Rectangle { fill: color },
        });
        self.cursor += thickness;
    }

    /// Opens a filled box behind everything placed until `end_background`.
    /// A box that crosses a page break is drawn in one piece per page.
    pub fn begin_background(&mut self, fill: Color, indent: f32, width: f32, padding: f32) {
        self.end_background();
        if !self.fits(padding * 2.0) && !self.is_fresh() {
            self.break_page();
        }
        self.background = Some(OpenBackground {
            fill,
            x: self.geometry.margins.left + indent,
            width,
            padding,
            top: self.cursor,
            insert_at: self.current.elements.len(),
        });
        self.cursor += padding;
    }

    pub fn end_background(&mut self) {
        if let Some(bg) = &self.background {
            let bottom = (self.cursor + bg.padding).min(self.geometry.content_bottom());
            self.cursor = bottom;
        }
        self.close_background_segment();
        self.background = None;
    }

    fn close_background_segment(&mut self) {
        let Some(bg) = self.background.as_ref() else {
            return;
        };
        let height = self.cursor - bg.top;
        if height <= 0.0 {
            return;
        }
        let rect = PositionedElement {
            x: bg.x,
            y: bg.top,
            width: bg.width,
            height,
            element: LayoutElement::Rectangle { fill: bg.fill },
        };
        let at = bg.insert_at.min(self.current.elements.len());
        self.current.elements.insert(at, rect);
    }

    /// Records a bookmark for a heading placed at `anchor`.
    pub fn add_outline(&mut self, level: u8, title: impl Into<String>, anchor: Anchor) {
        self.outline.push(OutlineEntry {
            level,
            title: title.into(),
            page_index: anchor.page_index,
            y: anchor.y,
        });
    }

    /// Ends the flow. A document always has at least one page.
    pub fn finish(mut self) -> LaidOutDocument {
        self.end_background();
        if !self.current.elements.is_empty() || self.pages.is_empty() {
            self.pages.push(std::mem::take(&mut self.current));
        }
        log::debug!(
            "Flow finished with {} page(s), {} outline entries",
            self.pages.len(),
            self.outline.len()
        );
        LaidOutDocument {
            geometry: self.geometry,
            pages: self.pages,
            outline: self.outline,
            title: self.title,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fonts::FontLibrary;
    use crate::style::{StyledSpan, TextStyle};
    use crate::text::{WrapOptions, layout_text};
    use quire_style::{Margins, PageSize, TextAlign};

    fn small_page() -> PageGeometry {
        PageGeometry {
            size: PageSize::Custom {
                width: 200.0,
                height: 100.0,
            },
            margins: Margins::all(10.0),
        }
    }

    fn line(text: &str) -> LineLayout {
        let library = FontLibrary::builtin();
        let spans = [StyledSpan::new(text, TextStyle::new("Helvetica", 10.0))];
        let options = WrapOptions {
            max_width: 180.0,
            align: TextAlign::Left,
            leading: 20.0,
            preserve_spaces: false,
        };
        layout_text(&library, &spans, &options).remove(0)
    }

    #[test]
    fn test_rejects_geometry_without_content_area() {
        let geometry = PageGeometry {
            size: PageSize::Custom {
                width: 0.0,
                height: 0.0,
            },
            margins: Margins::default(),
        };
        assert!(matches!(
            PageFlow::new(geometry),
            Err(LayoutError::InvalidGeometry { .. })
        ));
    }

    #[test]
    fn test_empty_flow_yields_one_page() {
        let doc = PageFlow::new(small_page()).unwrap().finish();
        assert_eq!(doc.page_count(), 1);
        assert!(doc.pages[0].elements.is_empty());
    }

    #[test]
    fn test_lines_flow_onto_new_pages() {
        let mut flow = PageFlow::new(small_page()).unwrap();
        // Content area is 80pt tall: four 20pt lines per page.
        for i in 0..6 {
            flow.push_line(&line(&format!("line {}", i)), 0.0);
        }
        let doc = flow.finish();
        assert_eq!(doc.page_count(), 2);
        assert_eq!(doc.page_text(0).len(), 4);
        assert_eq!(doc.page_text(1), vec!["line 4", "line 5"]);
        assert_eq!(doc.pages[1].elements[0].y, 10.0);
    }

    #[test]
    fn test_spacer_that_does_not_fit_is_dropped() {
        let mut flow = PageFlow::new(small_page()).unwrap();
        flow.push_line(&line("first"), 0.0);
        flow.push_spacer(500.0);
        let anchor = flow.push_line(&line("second"), 0.0);
        assert_eq!(anchor.page_index, 1);
        assert_eq!(anchor.y, 10.0);
        assert_eq!(flow.finish().page_count(), 2);
    }

    #[test]
    fn test_trailing_spacer_does_not_add_a_page() {
        let mut flow = PageFlow::new(small_page()).unwrap();
        flow.push_line(&line("only"), 0.0);
        flow.push_spacer(500.0);
        assert_eq!(flow.finish().page_count(), 1);
    }

    #[test]
    fn test_indent_shifts_lines() {
        let mut flow = PageFlow::new(small_page()).unwrap();
        flow.push_line(&line("indented"), 12.0);
        let doc = flow.finish();
        assert_eq!(doc.pages[0].elements[0].x, 22.0);
    }

    #[test]
    fn test_background_is_drawn_behind_lines_on_each_page() {
        let mut flow = PageFlow::new(small_page()).unwrap();
        flow.begin_background(Color::gray(240), 0.0, 180.0, 2.0);
        for i in 0..5 {
            flow.push_line(&line(&format!("code {}", i)), 0.0);
        }
        flow.end_background();
        let doc = flow.finish();
        assert_eq!(doc.page_count(), 2);
        for page in &doc.pages {
            assert!(matches!(
                page.elements[0].element,
                LayoutElement::Rectangle { .. }
            ));
        }
    }

    #[test]
    fn test_outline_records_anchor() {
        let mut flow = PageFlow::new(small_page()).unwrap();
        for _ in 0..4 {
            flow.push_line(&line("filler"), 0.0);
        }
        let anchor = flow.push_line(&line("Heading"), 0.0);
        flow.add_outline(1, "Heading", anchor);
        let doc = flow.finish();
        assert_eq!(doc.outline.len(), 1);
        assert_eq!(doc.outline[0].page_index, 1);
        assert_eq!(doc.outline[0].y, 10.0);
    }
}
