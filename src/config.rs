//! Renderer configuration.
//!
//! Page geometry and the font location are fixed when a renderer is built;
//! there is no per-call override.

use crate::error::PipelineError;
use quire_layout::{FontConfig, FontLibrary};
use quire_style::PageGeometry;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RenderConfig {
    /// Page size and margins. A4 with 20mm margins unless set.
    pub page: PageGeometry,
    /// Font file to register instead of probing the asset directories.
    pub font_path: Option<PathBuf>,
}

impl RenderConfig {
    pub fn from_json(json: &str) -> Result<Self, PipelineError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, PipelineError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_json(&text)?;
        log::debug!("Loaded render configuration from {}", path.as_ref().display());
        Ok(config)
    }

    pub fn font_config(&self) -> FontConfig {
        match &self.font_path {
            Some(path) => FontConfig::with_font_path(path.clone()),
            None => FontConfig::default(),
        }
    }

    /// Initializes the process font library from this configuration, or
    /// returns the one an earlier caller already initialized.
    pub fn install_fonts(&self) -> &'static FontLibrary {
        match FontLibrary::install(self.font_config()) {
            Ok(library) => library,
            Err(existing) => {
                if self.font_path.is_some() {
                    log::warn!(
                        "Font library already initialized as '{}'; ignoring configured font path",
                        existing.family()
                    );
                }
                existing
            }
        }
    }
}
