//! Output types from the layout engine.
//!
//! A `LaidOutDocument` holds every page's positioned elements in top-down
//! point coordinates, ready for a renderer to serialize.

use crate::fonts::FaceKey;
use quire_style::{Color, PageGeometry};

#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub content: String,
    pub face: FaceKey,
    pub size: f32,
    pub color: Color,
    pub synthetic_bold: bool,
    /// Baseline position below the element's top edge.
    pub baseline: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LayoutElement {
    Text(TextRun),
    /// A filled rectangle: rules, backgrounds, text decorations.
    Rectangle { fill: Color },
}

#[derive(Debug, Clone, PartialEq)]
pub struct PositionedElement {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub element: LayoutElement,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LaidOutPage {
    pub elements: Vec<PositionedElement>,
}

impl LaidOutPage {
    pub fn texts(&self) -> impl Iterator<Item = &TextRun> {
        self.elements.iter().filter_map(|el| match &el.element {
            LayoutElement::Text(run) => Some(run),
            _ => None,
        })
    }
}

/// A heading that becomes a document bookmark.
#[derive(Debug, Clone, PartialEq)]
pub struct OutlineEntry {
    pub level: u8,
    pub title: String,
    pub page_index: usize,
    /// Top of the heading, measured from the top of the page.
    pub y: f32,
}

/// The result of laying out one report.
#[derive(Debug, Clone, PartialEq)]
pub struct LaidOutDocument {
    pub geometry: PageGeometry,
    pub pages: Vec<LaidOutPage>,
    pub outline: Vec<OutlineEntry>,
    pub title: Option<String>,
}

impl LaidOutDocument {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// All text on `page`, one entry per run, in drawing order.
    pub fn page_text(&self, page: usize) -> Vec<&str> {
        self.pages
            .get(page)
            .map(|p| p.texts().map(|run| run.content.as_str()).collect())
            .unwrap_or_default()
    }

    /// True when any run is drawn with the embedded font.
    pub fn uses_embedded_font(&self) -> bool {
        self.pages
            .iter()
            .flat_map(|p| p.texts())
            .any(|run| run.face.is_embedded())
    }
}
