use clap::Parser;
use quire::{Backend, PipelineError, RenderConfig, Report, ReportRenderer};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Renders markdown reports to PDF.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Markdown files to render.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Output file, or output directory when several inputs are given.
    /// Defaults to each input with a `.pdf` extension.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// `native` (block parser and flow layout) or `html` (XHTML bridge).
    #[arg(long, default_value = "native")]
    backend: Backend,

    /// Report title (native backend).
    #[arg(long, default_value = "")]
    title: String,

    /// Header line under the title; repeatable. `\n` starts a new line.
    #[arg(long = "info")]
    info_lines: Vec<String>,

    /// Font file to register, overriding the configuration.
    #[arg(long)]
    font: Option<PathBuf>,

    /// JSON render configuration.
    #[arg(long)]
    config: Option<PathBuf>,
}

impl Args {
    fn render_config(&self) -> Result<RenderConfig, PipelineError> {
        let mut config = match &self.config {
            Some(path) => RenderConfig::from_file(path)?,
            None => RenderConfig::default(),
        };
        if let Some(font) = &self.font {
            config.font_path = Some(font.clone());
        }
        Ok(config)
    }

    fn output_for(&self, input: &Path) -> PathBuf {
        match &self.output {
            Some(out) if self.inputs.len() == 1 => out.clone(),
            Some(dir) => dir.join(pdf_name(input)),
            None => input.with_extension("pdf"),
        }
    }

    fn report(&self, markdown: String) -> Report {
        Report {
            title: self.title.clone(),
            info_lines: self.info_lines.iter().map(|l| l.replace("\\n", "\n")).collect(),
            markdown,
        }
    }
}

fn pdf_name(input: &Path) -> PathBuf {
    let stem = input.file_stem().unwrap_or(input.as_os_str());
    PathBuf::from(stem).with_extension("pdf")
}

fn render_one(
    args: &Args,
    renderer: &dyn ReportRenderer,
    input: &Path,
) -> Result<(), PipelineError> {
    let markdown = fs::read_to_string(input)?;
    let bytes = renderer.render(&args.report(markdown))?;
    let output = args.output_for(input);
    fs::write(&output, &bytes)?;
    log::info!(
        "{} -> {} ({} bytes, {})",
        input.display(),
        output.display(),
        bytes.len(),
        renderer.name()
    );
    Ok(())
}

fn main() -> Result<(), PipelineError> {
    if env::var("RUST_LOG").is_err() {
        unsafe {
            env::set_var("RUST_LOG", "quire=info");
        }
    }
    env_logger::init();

    let args = Args::parse();
    let config = args.render_config()?;
    if let Some(dir) = args.output.as_ref().filter(|_| args.inputs.len() > 1) {
        fs::create_dir_all(dir)?;
    }
    let renderer = args.backend.renderer(&config);

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        args.inputs
            .par_iter()
            .try_for_each(|input| render_one(&args, renderer.as_ref(), input))?;
    }
    #[cfg(not(feature = "parallel"))]
    {
        for input in &args.inputs {
            render_one(&args, renderer.as_ref(), input)?;
        }
    }

    Ok(())
}
