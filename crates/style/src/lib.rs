pub mod color;
pub mod dimension;
pub mod font;
pub mod list;
pub mod parsers;
pub mod stylesheet;
pub mod text;

pub use color::Color;
pub use dimension::{Margins, PageGeometry, PageSize, MM_TO_PT};
pub use font::{FontStyle, FontWeight};
pub use list::ListStyleType;
pub use parsers::StyleParseError;
pub use stylesheet::{BlockKind, FlowSpacing, ParagraphStyle, StyleSet};
pub use text::{LineHeight, TextAlign};
