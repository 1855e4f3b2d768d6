use serde::Serialize;

/// Heading depth recognised by the dialect. Deeper markers are not headings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HeadingLevel {
    H1,
    H2,
    H3,
}

impl HeadingLevel {
    /// Maps a run of `#` characters to a level. Only 1 to 3 are valid.
    pub fn from_marker_len(len: usize) -> Option<Self> {
        match len {
            1 => Some(HeadingLevel::H1),
            2 => Some(HeadingLevel::H2),
            3 => Some(HeadingLevel::H3),
            _ => None,
        }
    }

    pub fn depth(self) -> u8 {
        match self {
            HeadingLevel::H1 => 1,
            HeadingLevel::H2 => 2,
            HeadingLevel::H3 => 3,
        }
    }
}

/// One structural unit of a parsed report, in document order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Block {
    /// Marker and surrounding whitespace are stripped. Never scanned for bold spans.
    Heading { level: HeadingLevel, text: String },
    /// A single non-blank line. Emphasis markers are kept for the renderer.
    Paragraph { text: String },
    /// A run of consecutive `- ` lines, markers stripped.
    BulletList { items: Vec<String> },
    /// An empty or whitespace-only line.
    Blank,
}

impl Block {
    pub fn heading(level: HeadingLevel, text: impl Into<String>) -> Self {
        Block::Heading {
            level,
            text: text.into(),
        }
    }

    pub fn paragraph(text: impl Into<String>) -> Self {
        Block::Paragraph { text: text.into() }
    }

    pub fn bullets<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Block::BulletList {
            items: items.into_iter().map(Into::into).collect(),
        }
    }

    /// The text carried by this block, one entry per source line.
    pub fn lines(&self) -> Vec<&str> {
        match self {
            Block::Heading { text, .. } | Block::Paragraph { text } => vec![text.as_str()],
            Block::BulletList { items } => items.iter().map(String::as_str).collect(),
            Block::Blank => vec![""],
        }
    }
}
