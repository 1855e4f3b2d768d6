pub mod pdf_assertions;

use lopdf::Document as LopdfDocument;
use quire::{Backend, RenderConfig, RenderError, Report};

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

/// Wrapper around a generated PDF with helper methods
pub struct GeneratedPdf {
    pub bytes: Vec<u8>,
    pub doc: LopdfDocument,
}

impl GeneratedPdf {
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, Box<dyn std::error::Error>> {
        let doc = LopdfDocument::load_mem(&bytes)?;
        Ok(Self { bytes, doc })
    }

    pub fn page_count(&self) -> usize {
        self.doc.get_pages().len()
    }

    /// Save PDF to a file for manual debugging
    #[allow(dead_code)]
    pub fn save_for_debug(&self, name: &str) -> std::io::Result<()> {
        std::fs::write(format!("test_output_{}.pdf", name), &self.bytes)
    }
}

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Renders `report` with `backend` and the default configuration.
pub fn render_with(backend: Backend, report: &Report) -> Result<GeneratedPdf, RenderError> {
    let bytes = backend.render(report, &RenderConfig::default())?;
    GeneratedPdf::from_bytes(bytes).map_err(|e| RenderError::Other(e.to_string()))
}

#[allow(dead_code)]
pub fn render_native(report: &Report) -> Result<GeneratedPdf, RenderError> {
    render_with(Backend::NativeFlow, report)
}

#[allow(dead_code)]
pub fn render_html(markdown: &str) -> Result<GeneratedPdf, RenderError> {
    render_with(Backend::HtmlBridge, &Report::new(markdown))
}

/// A report long enough to need several pages.
#[allow(dead_code)]
pub fn long_markdown(paragraphs: usize) -> String {
    (0..paragraphs)
        .map(|i| format!("## Section {}\nParagraph {} of the report body.\n\n", i, i))
        .collect()
}
