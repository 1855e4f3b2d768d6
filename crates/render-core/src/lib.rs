//! Core rendering abstractions for quire reports.
//!
//! This crate provides the contract shared by the report backends:
//! - `ReportRenderer`, implemented by every backend a caller can select
//! - `DocumentRenderer`, for serializing a laid-out document to PDF bytes
//! - `Report`, the markdown and header a render call consumes
//! - Error types for rendering operations

mod error;
mod traits;
mod types;
pub mod utils;

pub use error::RenderError;
pub use traits::{DocumentRenderer, ReportRenderer};
pub use types::Report;
