use crate::fonts::FontResources;
use crate::writer::StreamingPdfWriter;
use lopdf::content::{Content, Operation};
use lopdf::{Object, ObjectId, StringFormat, dictionary};
use quire_layout::{LayoutElement, OutlineEntry, PositionedElement, TextRun};
use quire_render_core::RenderError;
use quire_render_core::utils::flip_y;
use quire_style::Color;
use std::collections::HashMap;
use std::io::{Seek, Write};

/// Stroke width of synthetic bold, as a fraction of the font size.
const SYNTHETIC_BOLD_STROKE: f32 = 0.03;

/// A PDF text string: literal when ASCII, UTF-16BE with a byte order mark
/// otherwise.
pub fn text_string(text: &str) -> Object {
    if text.is_ascii() {
        return Object::String(text.as_bytes().to_vec(), StringFormat::Literal);
    }
    let mut bytes = vec![0xFE, 0xFF];
    for unit in text.encode_utf16() {
        bytes.extend_from_slice(&unit.to_be_bytes());
    }
    Object::String(bytes, StringFormat::Hexadecimal)
}

struct FlatOutlineItem {
    id: ObjectId,
    title: String,
    dest: Vec<Object>,
    parent_idx: Option<usize>,
}

struct NodeOutlineItem {
    id: ObjectId,
    title: String,
    dest: Vec<Object>,
    children: Vec<NodeOutlineItem>,
}

/// Buffers the bookmark tree for `entries` and returns its root. Headings
/// nest under the closest preceding heading of a lower level.
pub fn build_outlines<W: Write + Seek>(
    writer: &mut StreamingPdfWriter<W>,
    entries: &[OutlineEntry],
    page_ids: &[ObjectId],
    page_height: f32,
) -> Option<ObjectId> {
    let mut flat_list: Vec<FlatOutlineItem> = Vec::new();
    let mut level_stack: Vec<(u8, usize)> = Vec::new();

    for entry in entries {
        let Some(&page_id) = page_ids.get(entry.page_index) else {
            log::warn!(
                "Outline entry '{}' points at missing page {}",
                entry.title,
                entry.page_index
            );
            continue;
        };
        let dest = vec![
            Object::Reference(page_id),
            "FitH".into(),
            flip_y(entry.y, page_height).into(),
        ];
        while level_stack.last().is_some_and(|(level, _)| *level >= entry.level) {
            level_stack.pop();
        }
        let parent_idx = level_stack.last().map(|(_, idx)| *idx);
        let idx = flat_list.len();
        flat_list.push(FlatOutlineItem {
            id: writer.new_object_id(),
            title: entry.title.clone(),
            dest,
            parent_idx,
        });
        level_stack.push((entry.level, idx));
    }

    let mut children_map: HashMap<usize, Vec<NodeOutlineItem>> = HashMap::new();
    let mut root_items = Vec::new();
    for (i, flat) in flat_list.into_iter().enumerate().rev() {
        let mut children = children_map.remove(&i).unwrap_or_default();
        children.reverse();
        let node = NodeOutlineItem {
            id: flat.id,
            title: flat.title,
            dest: flat.dest,
            children,
        };
        match flat.parent_idx {
            Some(parent) => children_map.entry(parent).or_default().push(node),
            None => root_items.push(node),
        }
    }
    root_items.reverse();

    let (first, last) = match (root_items.first(), root_items.last()) {
        (Some(first), Some(last)) => (first.id, last.id),
        _ => return None,
    };
    let outline_root_id = writer.new_object_id();
    writer.buffer_object_at_id(
        outline_root_id,
        dictionary! {
            "Type" => "Outlines",
            "First" => first,
            "Last" => last,
            "Count" => count_visible(&root_items),
        }
        .into(),
    );
    buffer_outline_level(&root_items, outline_root_id, writer);
    Some(outline_root_id)
}

fn count_visible(items: &[NodeOutlineItem]) -> i64 {
    items
        .iter()
        .map(|item| 1 + count_visible(&item.children))
        .sum()
}

fn buffer_outline_level<W: Write + Seek>(
    items: &[NodeOutlineItem],
    parent_id: ObjectId,
    writer: &mut StreamingPdfWriter<W>,
) {
    for (i, item) in items.iter().enumerate() {
        let mut dict = dictionary! {
            "Title" => text_string(&item.title),
            "Parent" => parent_id,
            "Dest" => item.dest.clone(),
        };
        if i > 0 {
            dict.set("Prev", items[i - 1].id);
        }
        if let Some(next) = items.get(i + 1) {
            dict.set("Next", next.id);
        }
        if let (Some(first), Some(last)) = (item.children.first(), item.children.last()) {
            dict.set("First", first.id);
            dict.set("Last", last.id);
            dict.set("Count", count_visible(&item.children));
            buffer_outline_level(&item.children, item.id, writer);
        }
        writer.buffer_object_at_id(item.id, dict.into());
    }
}

/// Turns one page's positioned elements into content stream operations.
pub struct PageContext<'r, 'f> {
    page_height: f32,
    content: Content,
    fonts: &'r mut FontResources<'f>,
}

impl<'r, 'f> PageContext<'r, 'f> {
    pub fn new(page_height: f32, fonts: &'r mut FontResources<'f>) -> Self {
        Self {
            page_height,
            content: Content { operations: vec![] },
            fonts,
        }
    }

    pub fn finish(self) -> Content {
        self.content
    }

    fn op(&mut self, operator: &str, operands: Vec<Object>) {
        self.content.operations.push(Operation::new(operator, operands));
    }

    fn color_operands(color: Color) -> Vec<Object> {
        color.to_unit().iter().map(|c| (*c).into()).collect()
    }

    pub fn draw_element(&mut self, el: &PositionedElement) -> Result<(), RenderError> {
        match &el.element {
            LayoutElement::Text(run) => self.draw_text(run, el),
            LayoutElement::Rectangle { fill } => {
                self.draw_rectangle(el, *fill);
                Ok(())
            }
        }
    }

    fn draw_rectangle(&mut self, el: &PositionedElement, fill: Color) {
        if el.width <= 0.0 || el.height <= 0.0 {
            return;
        }
        let y = flip_y(el.y + el.height, self.page_height);
        self.op("q", vec![]);
        self.op("rg", Self::color_operands(fill));
        self.op(
            "re",
            vec![el.x.into(), y.into(), el.width.into(), el.height.into()],
        );
        self.op("f", vec![]);
        self.op("Q", vec![]);
    }

    fn draw_text(&mut self, run: &TextRun, el: &PositionedElement) -> Result<(), RenderError> {
        if run.content.trim().is_empty() {
            return Ok(());
        }
        if !run.size.is_finite() || run.size <= 0.0 {
            return Err(RenderError::Pdf(format!(
                "invalid font size {} for text '{}'",
                run.size, run.content
            )));
        }
        let font_name = self.fonts.resource_name(run.face);
        let text = self.fonts.encode(run.face, &run.content);
        let baseline_y = flip_y(el.y + run.baseline, self.page_height);

        if run.synthetic_bold {
            self.op("q", vec![]);
            self.op("RG", Self::color_operands(run.color));
            self.op("w", vec![(run.size * SYNTHETIC_BOLD_STROKE).into()]);
        }
        self.op("BT", vec![]);
        self.op("Tf", vec![Object::Name(font_name), run.size.into()]);
        self.op("rg", Self::color_operands(run.color));
        if run.synthetic_bold {
            self.op("Tr", vec![2.into()]);
        }
        self.op("Td", vec![el.x.into(), baseline_y.into()]);
        self.op("Tj", vec![text]);
        self.op("ET", vec![]);
        if run.synthetic_bold {
            self.op("Q", vec![]);
        }
        Ok(())
    }
}
