use super::shaper::Item;
use crate::fonts::{FaceKey, FontLibrary};
use crate::style::{StyledSpan, TextStyle};
use quire_style::TextAlign;

const FIT_EPSILON: f32 = 1e-3;

#[derive(Debug, Clone, PartialEq)]
pub struct LineLayout {
    pub items: Vec<LineItem>,
    /// Width of the set text, before alignment.
    pub width: f32,
    pub height: f32,
    /// Distance from the top of the line box to the baseline.
    pub baseline: f32,
}

impl LineLayout {
    pub fn text(&self) -> String {
        self.items.iter().map(|i| i.text.as_str()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineItem {
    pub text: String,
    pub face: FaceKey,
    pub style: TextStyle,
    /// Bold requested but the face has no bold variant.
    pub synthetic_bold: bool,
    pub x: f32,
    pub width: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WrapOptions {
    pub max_width: f32,
    pub align: TextAlign,
    /// Height of every line box.
    pub leading: f32,
    pub preserve_spaces: bool,
}

/// Greedy line breaking. Words wider than the whole line are split between
/// characters.
pub fn break_lines(
    library: &FontLibrary,
    items: &[Item],
    spans: &[StyledSpan],
    options: &WrapOptions,
) -> Vec<LineLayout> {
    let max_width = options.max_width;
    let mut lines = Vec::new();
    let mut current: Vec<LineItem> = Vec::new();
    let mut current_width = 0.0f32;
    let mut soft_start = false;

    for item in items {
        match item {
            Item::Newline => {
                lines.push(finalize_line(library, current, options));
                current = Vec::new();
                current_width = 0.0;
                soft_start = false;
            }
            Item::Glue { span, face, width } => {
                if current.is_empty() && (soft_start || !options.preserve_spaces) {
                    continue;
                }
                if current_width + width > max_width + FIT_EPSILON && !current.is_empty() {
                    lines.push(finalize_line(library, current, options));
                    current = Vec::new();
                    current_width = 0.0;
                    soft_start = true;
                    continue;
                }
                current.push(line_item(
                    " ".to_string(),
                    *face,
                    &spans[*span].style,
                    current_width,
                    *width,
                ));
                current_width += width;
            }
            Item::Word { fragments, width } => {
                if current_width + width > max_width + FIT_EPSILON && !current.is_empty() {
                    lines.push(finalize_line(library, current, options));
                    current = Vec::new();
                    current_width = 0.0;
                    soft_start = true;
                }

                if *width > max_width + FIT_EPSILON {
                    for fragment in fragments {
                        let style = &spans[fragment.span].style;
                        for ch in fragment.text.chars() {
                            let char_width =
                                library.advance(fragment.face, ch) * style.size / 1000.0;
                            if current_width + char_width > max_width + FIT_EPSILON
                                && !current.is_empty()
                            {
                                lines.push(finalize_line(library, current, options));
                                current = Vec::new();
                                current_width = 0.0;
                                soft_start = true;
                            }
                            current.push(line_item(
                                ch.to_string(),
                                fragment.face,
                                style,
                                current_width,
                                char_width,
                            ));
                            current_width += char_width;
                        }
                    }
                } else {
                    for fragment in fragments {
                        let style = &spans[fragment.span].style;
                        current.push(line_item(
                            fragment.text.clone(),
                            fragment.face,
                            style,
                            current_width,
                            fragment.width,
                        ));
                        current_width += fragment.width;
                    }
                }
            }
        }
    }

    if !current.is_empty() {
        lines.push(finalize_line(library, current, options));
    }
    lines
}

fn line_item(text: String, face: FaceKey, style: &TextStyle, x: f32, width: f32) -> LineItem {
    LineItem {
        text,
        face,
        synthetic_bold: style.bold && face.is_embedded(),
        style: style.clone(),
        x,
        width,
    }
}

fn finalize_line(
    library: &FontLibrary,
    mut items: Vec<LineItem>,
    options: &WrapOptions,
) -> LineLayout {
    while items.last().is_some_and(|item| item.text == " ") {
        items.pop();
    }

    if !items.is_empty() {
        let mut merged = Vec::with_capacity(items.len());
        let mut current = items[0].clone();

        for next in items.iter().skip(1) {
            if next.face == current.face
                && next.style == current.style
                && (next.x - (current.x + current.width)).abs() < 0.05
            {
                current.text.push_str(&next.text);
                current.width += next.width;
            } else {
                merged.push(current);
                current = next.clone();
            }
        }
        merged.push(current);
        items = merged;
    }

    let width = items.last().map(|i| i.x + i.width).unwrap_or(0.0);
    let largest = items.iter().map(|i| i.style.size).fold(0.0f32, f32::max);
    let height = options.leading.max(largest);

    let baseline = items
        .iter()
        .map(|item| {
            let ascent = library.ascent(item.face) * item.style.size / 1000.0;
            let descent = library.descent(item.face).abs() * item.style.size / 1000.0;
            (height + ascent - descent) / 2.0
        })
        .fold(None, |acc: Option<f32>, b| Some(acc.map_or(b, |a| a.max(b))))
        .unwrap_or(height * 0.8);

    if options.max_width.is_finite() {
        let offset = options.align.offset(width, options.max_width);
        if offset > 0.0 {
            for item in &mut items {
                item.x += offset;
            }
        }
    }

    LineLayout {
        items,
        width,
        height,
        baseline,
    }
}
