//! Inline text styles fed to the shaper.

use quire_style::{Color, ParagraphStyle};
use std::sync::Arc;

/// Everything needed to measure and draw a run of text.
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    pub family: Arc<str>,
    pub size: f32,
    pub bold: bool,
    pub italic: bool,
    pub color: Color,
    pub underline: bool,
    pub strike: bool,
}

impl TextStyle {
    pub fn new(family: &str, size: f32) -> Self {
        Self {
            family: Arc::from(family),
            size,
            bold: false,
            italic: false,
            color: Color::BLACK,
            underline: false,
            strike: false,
        }
    }

    /// The regular-weight style of a paragraph.
    pub fn from_paragraph(style: &ParagraphStyle) -> Self {
        Self {
            bold: style.is_bold(),
            ..Self::new(&style.font_name, style.font_size)
        }
    }

    pub fn bold(mut self, bold: bool) -> Self {
        self.bold = bold;
        self
    }

    pub fn italic(mut self, italic: bool) -> Self {
        self.italic = italic;
        self
    }
}

/// A piece of text in one style.
#[derive(Debug, Clone, PartialEq)]
pub struct StyledSpan {
    pub text: String,
    pub style: TextStyle,
}

impl StyledSpan {
    pub fn new(text: impl Into<String>, style: TextStyle) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }
}
