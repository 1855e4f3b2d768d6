//! Block parser for the restricted markdown dialect used in generated reports.
//!
//! The dialect is line oriented: every input line is classified once by
//! [`classify`] and folded into an ordered sequence of [`Block`]s by [`parse`].
//! Inline `**bold**` spans are left in the block text and resolved at render
//! time through the [`inline`] module.
//!
//! Parsing is total. Any input, including the empty string, produces a block
//! sequence and there is no error path.

mod block;
mod classify;
pub mod inline;
mod parser;

pub use block::{Block, HeadingLevel};
pub use classify::{LineKind, classify};
pub use inline::InlineSpan;
pub use parser::parse;
