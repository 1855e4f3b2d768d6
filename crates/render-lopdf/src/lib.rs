//! PDF serialization of laid-out quire documents.
//!
//! The renderer walks a `LaidOutDocument` page by page, buffers every object
//! in a streaming writer, and embeds the registered font file only when some
//! text is drawn with it.

mod fonts;
mod helpers;
mod renderer;
mod writer;

pub use fonts::FontResources;
pub use helpers::{PageContext, build_outlines, text_string};
pub use renderer::LopdfRenderer;
pub use writer::StreamingPdfWriter;
