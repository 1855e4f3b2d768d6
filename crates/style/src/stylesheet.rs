//! Paragraph styles for each kind of report block, and the set that maps
//! block kinds to them.

use crate::font::FontWeight;
use crate::text::TextAlign;
use serde::{Deserialize, Serialize};

/// The kinds of block a report is made of, as far as styling is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BlockKind {
    Title,
    Info,
    /// Heading depth, 1-based. Depths past 3 use the level 3 style.
    Heading(u8),
    Body,
    ListItem,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParagraphStyle {
    pub font_name: String,
    #[serde(default)]
    pub font_weight: FontWeight,
    pub font_size: f32,
    /// Baseline-to-baseline distance in points.
    pub leading: f32,
    /// Vertical space after the paragraph in points.
    pub space_after: f32,
    #[serde(default)]
    pub alignment: TextAlign,
}

impl ParagraphStyle {
    fn new(font_name: &str, font_weight: FontWeight, size: f32, leading: f32, after: f32) -> Self {
        Self {
            font_name: font_name.to_string(),
            font_weight,
            font_size: size,
            leading,
            space_after: after,
            alignment: TextAlign::Left,
        }
    }

    pub fn is_bold(&self) -> bool {
        self.font_weight.is_bold()
    }
}

/// Fixed gaps the flow renderer inserts between structural parts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowSpacing {
    pub after_title: f32,
    pub after_header: f32,
    pub blank_line: f32,
    pub list_indent: f32,
}

impl Default for FlowSpacing {
    fn default() -> Self {
        Self {
            after_title: 6.0,
            after_header: 12.0,
            blank_line: 6.0,
            list_indent: 12.0,
        }
    }
}

/// Resolved styles for every block kind. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleSet {
    pub title: ParagraphStyle,
    pub info: ParagraphStyle,
    pub heading1: ParagraphStyle,
    pub heading2: ParagraphStyle,
    pub heading3: ParagraphStyle,
    pub body: ParagraphStyle,
    pub list_item: ParagraphStyle,
    #[serde(default)]
    pub spacing: FlowSpacing,
}

impl StyleSet {
    /// Builds the report styles with every entry using `font_name`.
    pub fn for_font(font_name: &str) -> Self {
        use FontWeight::{Bold, Regular};
        Self {
            title: ParagraphStyle::new(font_name, Bold, 18.0, 22.0, 12.0),
            heading1: ParagraphStyle::new(font_name, Bold, 16.0, 20.0, 10.0),
            heading2: ParagraphStyle::new(font_name, Bold, 14.0, 18.0, 8.0),
            heading3: ParagraphStyle::new(font_name, Bold, 12.0, 16.0, 6.0),
            body: ParagraphStyle::new(font_name, Regular, 11.0, 14.0, 6.0),
            list_item: ParagraphStyle::new(font_name, Regular, 11.0, 14.0, 6.0),
            info: ParagraphStyle::new(font_name, Regular, 11.0, 14.0, 6.0),
            spacing: FlowSpacing::default(),
        }
    }

    pub fn get(&self, kind: BlockKind) -> &ParagraphStyle {
        match kind {
            BlockKind::Title => &self.title,
            BlockKind::Info => &self.info,
            BlockKind::Heading(0 | 1) => &self.heading1,
            BlockKind::Heading(2) => &self.heading2,
            BlockKind::Heading(_) => &self.heading3,
            BlockKind::Body => &self.body,
            BlockKind::ListItem => &self.list_item,
        }
    }

    /// The family shared by all entries.
    pub fn font_name(&self) -> &str {
        &self.body.font_name
    }
}
