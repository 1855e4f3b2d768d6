use quire_layout::LayoutError;
use thiserror::Error;

/// A failed render call. Fatal for that call; nothing partial is returned.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("PDF generation error: {0}")]
    Pdf(String),
    #[error("Layout error: {0}")]
    Layout(#[from] LayoutError),
    #[error("HTML/CSS rendering defect: {0}")]
    Html(String),
    #[error("Other rendering error: {0}")]
    Other(String),
}

impl From<lopdf::Error> for RenderError {
    fn from(err: lopdf::Error) -> Self {
        RenderError::Pdf(err.to_string())
    }
}
