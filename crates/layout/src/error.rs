use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LayoutError {
    #[error("Page of {width:.2}x{height:.2}pt leaves no content area inside its margins.")]
    InvalidGeometry { width: f32, height: f32 },
    #[error("Generic layout error: {0}")]
    Generic(String),
}
