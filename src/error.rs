use quire_render_core::RenderError;
use thiserror::Error;

/// Errors surfaced to the CLI and to callers that load configuration.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Rendering failed: {0}")]
    Render(#[from] RenderError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration is invalid: {0}")]
    Config(#[from] serde_json::Error),
}
