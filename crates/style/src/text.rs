use serde::{Deserialize, Serialize};

/// Horizontal alignment of lines inside a paragraph box.
///
/// Reports are left aligned; center and right exist for the HTML bridge's
/// `text-align` declarations.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "kebab-case")]
pub enum TextAlign {
    #[default]
    Left,
    Right,
    Center,
}

impl TextAlign {
    /// Horizontal offset of a line of `line_width` inside `box_width`.
    pub fn offset(self, line_width: f32, box_width: f32) -> f32 {
        let free = (box_width - line_width).max(0.0);
        match self {
            TextAlign::Left => 0.0,
            TextAlign::Right => free,
            TextAlign::Center => free / 2.0,
        }
    }

    pub fn from_css(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "left" | "start" | "justify" => Some(TextAlign::Left),
            "right" | "end" => Some(TextAlign::Right),
            "center" => Some(TextAlign::Center),
            _ => None,
        }
    }
}

/// A `line-height` value, either relative to the font size or absolute.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub enum LineHeight {
    Multiple(f32),
    Points(f32),
}

impl LineHeight {
    pub fn resolve(self, font_size: f32) -> f32 {
        match self {
            LineHeight::Multiple(m) => font_size * m,
            LineHeight::Points(pt) => pt,
        }
    }
}
