use crate::error::RenderError;
use crate::types::Report;
use quire_layout::LaidOutDocument;

/// The contract both report backends implement: markdown and header in,
/// PDF bytes out.
pub trait ReportRenderer: Send + Sync {
    /// Short backend name for logs and diagnostics.
    fn name(&self) -> &'static str;

    fn render(&self, report: &Report) -> Result<Vec<u8>, RenderError>;
}

/// Serializes an already laid-out document.
pub trait DocumentRenderer: Send + Sync {
    fn render_document(&self, document: &LaidOutDocument) -> Result<Vec<u8>, RenderError>;
}
