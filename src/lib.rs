//! # quire
//!
//! Markdown-to-PDF report rendering.
//!
//! A report is a block of model-generated markdown plus a title and header
//! lines. Two interchangeable backends turn it into PDF bytes:
//! - **native**: the line-oriented block parser feeding a flow layout
//! - **html**: markdown converted to XHTML, styled by an embedded
//!   stylesheet and rasterized onto the same page flow
//!
//! Both share the font library and style registry in `quire-layout` and the
//! PDF writer in `quire-render-lopdf`.

pub use quire_layout as layout;
pub use quire_markdown as markdown;
pub use quire_style as style;

pub mod config;
pub mod error;
pub mod html;
pub mod native;

pub use config::RenderConfig;
pub use error::PipelineError;
pub use html::HtmlBridgeRenderer;
pub use native::NativeFlowRenderer;
pub use quire_layout::{FontLibrary, StyleRegistry};
pub use quire_markdown::{Block, parse};
pub use quire_render_core::{RenderError, Report, ReportRenderer};

use std::str::FromStr;

/// Selects which renderer turns a report into PDF bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Backend {
    /// Block parser and flow layout. Reads title and info lines.
    #[default]
    NativeFlow,
    /// Markdown converted to XHTML. Renders the markdown only.
    HtmlBridge,
}

impl Backend {
    /// Builds the renderer for this backend.
    pub fn renderer(self, config: &RenderConfig) -> Box<dyn ReportRenderer> {
        match self {
            Backend::NativeFlow => Box::new(NativeFlowRenderer::with_config(config)),
            Backend::HtmlBridge => Box::new(HtmlBridgeRenderer::with_config(config)),
        }
    }

    /// Renders `report` with a renderer built from `config`.
    pub fn render(self, report: &Report, config: &RenderConfig) -> Result<Vec<u8>, RenderError> {
        self.renderer(config).render(report)
    }
}

impl FromStr for Backend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "native" | "native-flow" | "flow" => Ok(Backend::NativeFlow),
            "html" | "html-bridge" | "xhtml" => Ok(Backend::HtmlBridge),
            other => Err(format!("Unknown backend '{}': expected 'native' or 'html'", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_from_str() {
        assert_eq!("native".parse::<Backend>(), Ok(Backend::NativeFlow));
        assert_eq!("HTML".parse::<Backend>(), Ok(Backend::HtmlBridge));
        assert!("pdf".parse::<Backend>().is_err());
    }

    #[test]
    fn test_default_backend_is_native() {
        assert_eq!(Backend::default(), Backend::NativeFlow);
    }
}
