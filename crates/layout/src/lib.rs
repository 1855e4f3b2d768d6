mod error;
pub mod flow;
pub mod fonts;
pub mod metrics;
pub mod output;
pub mod registry;
pub mod style;
pub mod text;

pub use self::error::LayoutError;
pub use self::flow::{Anchor, PageFlow};
pub use self::fonts::{
    CJK_FONT_FILE, CJK_FONT_NAME, DEFAULT_FONT_NAME, EmbeddedFont, FaceKey, FontConfig,
    FontLibrary, Glyph,
};
pub use self::metrics::StandardFont;
pub use self::output::{
    LaidOutDocument, LaidOutPage, LayoutElement, OutlineEntry, PositionedElement, TextRun,
};
pub use self::registry::StyleRegistry;
pub use self::style::{StyledSpan, TextStyle};
pub use self::text::{LineItem, LineLayout, WrapOptions, layout_text};
