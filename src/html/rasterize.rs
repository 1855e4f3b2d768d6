//! Lays out an XHTML envelope onto pages.
//!
//! Block elements become paragraphs in a [`PageFlow`]; everything between
//! them is collected as inline spans and wrapped by the shared text layout.
//! Vertical margins of adjacent blocks collapse to the larger one.

use super::computed::{ComputedStyle, StyleResolver};
use super::css::parse_stylesheet;
use quire_layout::{
    FontLibrary, LaidOutDocument, LineLayout, PageFlow, StyledSpan, WrapOptions, layout_text,
};
use quire_render_core::RenderError;
use quire_style::{Color, PageGeometry};
use roxmltree::{Document, Node};

const RULE_THICKNESS: f32 = 0.75;
const RULE_COLOR: Color = Color::gray(160);
/// Space between a list marker and the item text.
const MARKER_GAP: f32 = 4.0;
const ROOT_FAMILY: &str = "serif";

#[derive(Debug, Clone, Copy)]
struct Frame {
    indent: f32,
    width: f32,
}

impl Frame {
    fn inset(self, left: f32, right: f32) -> Frame {
        Frame {
            indent: self.indent + left,
            width: (self.width - left - right).max(1.0),
        }
    }
}

struct ListState {
    start: u64,
    index: usize,
}

fn html_error(err: impl std::fmt::Display) -> RenderError {
    RenderError::Html(err.to_string())
}

/// Parses `xhtml` and lays it out on pages of `geometry`.
pub fn rasterize(
    xhtml: &str,
    fonts: &FontLibrary,
    geometry: PageGeometry,
) -> Result<LaidOutDocument, RenderError> {
    let document = Document::parse(xhtml).map_err(html_error)?;
    let root = document.root_element();
    if root.tag_name().name() != "html" {
        return Err(RenderError::Html(format!(
            "document root is <{}>, expected <html>",
            root.tag_name().name()
        )));
    }

    let head = child_element(root, "head");
    let css: String = head
        .into_iter()
        .flat_map(|head| head.children().filter(|n| n.tag_name().name() == "style"))
        .map(text_content)
        .collect();
    let sheet = parse_stylesheet(&css).map_err(html_error)?;
    let title = head
        .and_then(|head| child_element(head, "title"))
        .map(text_content)
        .unwrap_or_default();
    let body = child_element(root, "body")
        .ok_or_else(|| RenderError::Html("document has no <body>".to_string()))?;

    let mut flow = PageFlow::new(geometry)?;
    if !title.trim().is_empty() {
        flow = flow.with_title(title.trim());
    }
    let frame = Frame {
        indent: 0.0,
        width: flow.content_width(),
    };
    let mut rasterizer = Rasterizer {
        fonts,
        resolver: StyleResolver::new(sheet, fonts),
        flow,
        spans: Vec::new(),
        pending_margin: 0.0,
        pending_marker: None,
        pending_heading: None,
        lists: Vec::new(),
    };
    rasterizer.block(body, &ComputedStyle::root(ROOT_FAMILY), frame)?;

    let document = rasterizer.flow.finish();
    log::debug!(
        "Rasterized XHTML ({} bytes) onto {} page(s)",
        xhtml.len(),
        document.page_count()
    );
    Ok(document)
}

struct Rasterizer<'a> {
    fonts: &'a FontLibrary,
    resolver: StyleResolver<'a>,
    flow: PageFlow,
    spans: Vec<StyledSpan>,
    pending_margin: f32,
    pending_marker: Option<(String, ComputedStyle)>,
    pending_heading: Option<u8>,
    lists: Vec<ListState>,
}

impl Rasterizer<'_> {
    fn compute(&self, node: Node, parent: &ComputedStyle) -> Result<ComputedStyle, RenderError> {
        self.resolver
            .compute(node.tag_name().name(), node.attribute("style"), parent)
            .map_err(html_error)
    }

    fn block(
        &mut self,
        node: Node,
        parent: &ComputedStyle,
        frame: Frame,
    ) -> Result<(), RenderError> {
        let tag = node.tag_name().name();
        let style = self.compute(node, parent)?;
        self.collapse_margin(style.margin.top);

        match tag {
            "hr" => {
                self.place_pending_margin();
                let rule = frame.inset(style.margin.left, style.margin.right);
                self.flow
                    .push_rule(rule.indent, rule.width, RULE_THICKNESS, RULE_COLOR);
            }
            "table" => self.table(node, &style, frame)?,
            "ul" | "ol" => {
                let start = node
                    .attribute("start")
                    .and_then(|s| s.trim().parse().ok())
                    .unwrap_or(1);
                self.lists.push(ListState { start, index: 0 });
                let result = self.container(node, &style, frame);
                self.lists.pop();
                result?;
            }
            "li" => {
                if let Some(list) = self.lists.last_mut() {
                    let marker = style.list_style.marker(list.index, list.start);
                    list.index += 1;
                    self.pending_marker = marker.map(|m| (m, style.clone()));
                }
                self.container(node, &style, frame)?;
                self.pending_marker = None;
            }
            _ => {
                if let Some(level) = heading_level(tag) {
                    self.pending_heading = Some(level);
                }
                self.container(node, &style, frame)?;
                self.pending_heading = None;
            }
        }

        self.collapse_margin(style.margin.bottom);
        Ok(())
    }

    /// A generic block box: padding, optional background, then content.
    fn container(
        &mut self,
        node: Node,
        style: &ComputedStyle,
        frame: Frame,
    ) -> Result<(), RenderError> {
        let border_box = frame.inset(style.margin.left, style.margin.right);
        let content = border_box.inset(style.padding.left, style.padding.right);

        if let Some(fill) = style.background {
            self.place_pending_margin();
            self.flow
                .begin_background(fill, border_box.indent, border_box.width, style.padding.top);
        } else if style.padding.top > 0.0 {
            self.place_pending_margin();
            self.flow.push_spacer(style.padding.top);
        }

        self.children(node, style, content)?;

        if style.background.is_some() {
            self.flow.end_background();
        } else if style.padding.bottom > 0.0 {
            self.place_pending_margin();
            self.flow.push_spacer(style.padding.bottom);
        }
        Ok(())
    }

    fn children(
        &mut self,
        node: Node,
        style: &ComputedStyle,
        frame: Frame,
    ) -> Result<(), RenderError> {
        for child in node.children() {
            if child.is_element() && is_block(child.tag_name().name()) {
                self.flush(style, frame, style.preserve_whitespace)?;
                self.block(child, style, frame)?;
            } else {
                self.inline(child, style)?;
            }
        }
        self.flush(style, frame, style.preserve_whitespace)
    }

    /// One line per row, cells separated by a tab.
    fn table(
        &mut self,
        node: Node,
        style: &ComputedStyle,
        frame: Frame,
    ) -> Result<(), RenderError> {
        let content = frame.inset(style.margin.left, style.margin.right);
        self.flush(style, frame, false)?;
        let rows = node
            .descendants()
            .filter(|n| n.is_element() && n.tag_name().name() == "tr");
        for row in rows {
            let row_style = self.compute(row, style)?;
            let cells = row
                .children()
                .filter(|n| matches!(n.tag_name().name(), "td" | "th"));
            for (index, cell) in cells.enumerate() {
                let cell_style = self.compute(cell, &row_style)?;
                if index > 0 {
                    self.spans
                        .push(StyledSpan::new("\t", row_style.text_style()));
                }
                let start = self.spans.len();
                for child in cell.children() {
                    self.inline(child, &cell_style)?;
                }
                trim_spans(&mut self.spans[start..]);
            }
            self.flush(&row_style, content, true)?;
        }
        Ok(())
    }

    fn inline(&mut self, node: Node, style: &ComputedStyle) -> Result<(), RenderError> {
        if node.is_text() {
            let text = node.text().unwrap_or_default();
            if style.preserve_whitespace {
                self.push_text(text.to_string(), style);
            } else {
                let collapsed = collapse_whitespace(text, self.at_break());
                self.push_text(collapsed, style);
            }
            return Ok(());
        }
        if !node.is_element() {
            return Ok(());
        }

        match node.tag_name().name() {
            "br" => self.push_text("\n".to_string(), style),
            "img" => {
                if let Some(alt) = node.attribute("alt") {
                    let alt = collapse_whitespace(alt, self.at_break());
                    self.push_text(alt, style);
                }
            }
            "input" if node.attribute("type") == Some("checkbox") => {
                let mark = if node.has_attribute("checked") { "[x] " } else { "[ ] " };
                self.push_text(mark.to_string(), style);
            }
            "script" | "style" | "head" => {}
            _ => {
                let inner = self.compute(node, style)?;
                for child in node.children() {
                    self.inline(child, &inner)?;
                }
            }
        }
        Ok(())
    }

    fn push_text(&mut self, text: String, style: &ComputedStyle) {
        if !text.is_empty() {
            self.spans.push(StyledSpan::new(text, style.text_style()));
        }
    }

    /// True at the start of a line, where collapsible spaces are dropped.
    fn at_break(&self) -> bool {
        self.spans
            .last()
            .and_then(|span| span.text.chars().last())
            .is_none_or(char::is_whitespace)
    }

    /// Wraps and places the collected inline spans as one paragraph.
    fn flush(
        &mut self,
        style: &ComputedStyle,
        frame: Frame,
        preserve: bool,
    ) -> Result<(), RenderError> {
        let mut spans = std::mem::take(&mut self.spans);
        if preserve {
            if let Some(last) = spans.last_mut()
                && last.text.ends_with('\n')
            {
                last.text.pop();
            }
        } else {
            trim_spans(&mut spans);
        }
        spans.retain(|span| !span.text.is_empty());
        // An item's marker waits for its first text, which may be in a child block.
        if spans.is_empty() {
            return Ok(());
        }

        let options = WrapOptions {
            max_width: frame.width,
            align: style.align,
            leading: style.leading(),
            preserve_spaces: preserve,
        };
        let mut lines = layout_text(self.fonts, &spans, &options);
        if let Some((marker, marker_style)) = self.pending_marker.take() {
            self.hang_marker(&mut lines, &marker, &marker_style);
        }
        if lines.is_empty() {
            return Ok(());
        }

        self.place_pending_margin();
        let anchor = self.flow.push_lines(&lines, frame.indent);
        if let (Some(level), Some(anchor)) = (self.pending_heading.take(), anchor) {
            let title: String = spans.iter().map(|span| span.text.as_str()).collect();
            self.flow.add_outline(level, title.trim(), anchor);
        }
        Ok(())
    }

    /// Puts `marker` to the left of the first line, outside the text box.
    fn hang_marker(&self, lines: &mut Vec<LineLayout>, marker: &str, style: &ComputedStyle) {
        let options = WrapOptions {
            max_width: f32::INFINITY,
            align: Default::default(),
            leading: style.leading(),
            preserve_spaces: false,
        };
        let spans = [StyledSpan::new(marker, style.text_style())];
        let Some(mut marker_line) = layout_text(self.fonts, &spans, &options).into_iter().next()
        else {
            return;
        };
        let shift = marker_line.width + MARKER_GAP;
        for item in &mut marker_line.items {
            item.x -= shift;
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

    fn collapse_margin(&mut self, margin: f32) {
        self.pending_margin = self.pending_margin.max(margin);
    }

    fn place_pending_margin(&mut self) {
        let margin = std::mem::take(&mut self.pending_margin);
        self.flow.push_spacer(margin);
    }
}

fn child_element<'a, 'input>(node: Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    node.children()
        .find(|n| n.is_element() && n.tag_name().name() == name)
}

fn text_content(node: Node) -> String {
    node.descendants()
        .filter(|n| n.is_text())
        .filter_map(|n| n.text())
        .collect()
}

fn heading_level(tag: &str) -> Option<u8> {
    match tag {
        "h1" => Some(1),
        "h2" => Some(2),
        "h3" => Some(3),
        "h4" => Some(4),
        "h5" => Some(5),
        "h6" => Some(6),
        _ => None,
    }
}

fn is_block(tag: &str) -> bool {
    heading_level(tag).is_some()
        || matches!(
            tag,
            "address"
                | "article"
                | "aside"
                | "blockquote"
                | "body"
                | "dd"
                | "div"
                | "dl"
                | "dt"
                | "figure"
                | "footer"
                | "header"
                | "hr"
                | "li"
                | "main"
                | "nav"
                | "ol"
                | "p"
                | "pre"
                | "section"
                | "table"
                | "ul"
        )
}

/// Runs of whitespace become one space; a leading space is dropped when
/// the previous text already ended in whitespace.
fn collapse_whitespace(text: &str, at_break: bool) -> String {
    let mut out = String::with_capacity(text.len());
    let mut space = at_break;
    for ch in text.chars() {
        if ch.is_whitespace() {
            if !space {
                out.push(' ');
                space = true;
            }
        } else {
            out.push(ch);
            space = false;
        }
    }
    out
}

/// Strips whitespace from the outer edges of a span sequence.
fn trim_spans(spans: &mut [StyledSpan]) {
    for span in spans.iter_mut() {
        let trimmed = span.text.trim_start();
        if trimmed.len() != span.text.len() {
            span.text = trimmed.to_string();
        }
        if !span.text.is_empty() {
            break;
        }
    }
    for span in spans.iter_mut().rev() {
        let trimmed = span.text.trim_end();
        if trimmed.len() != span.text.len() {
            span.text = trimmed.to_string();
        }
        if !span.text.is_empty() {
            break;
        }
    }
}
