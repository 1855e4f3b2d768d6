pub mod shaper;
pub mod wrapper;

pub use shaper::{Fragment, Item, is_cjk, shape};
pub use wrapper::{LineItem, LineLayout, WrapOptions, break_lines};

use crate::fonts::FontLibrary;
use crate::style::StyledSpan;

/// Shapes and wraps `spans` into lines.
pub fn layout_text(
    library: &FontLibrary,
    spans: &[StyledSpan],
    options: &WrapOptions,
) -> Vec<LineLayout> {
    let items = shape(library, spans, options.preserve_spaces);
    break_lines(library, &items, spans, options)
}
