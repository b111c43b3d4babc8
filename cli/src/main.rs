//! pdfstruct CLI - PDF structure extraction tool

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use pdfstruct::plugins::{parse_plugin_list, PluginRegistry};
use pdfstruct::render::{self, JsonFormat, MarkdownOptions};
use pdfstruct::{
    ExtractOptions, ExtractionResult, Extractor, JsonLayoutDocument, LayoutTableSource,
    PdfLayoutSource,
};

#[derive(Parser, Debug)]
#[command(name = "pdfstruct")]
#[command(version)]
#[command(
    about = "Extract sections, paragraphs, tables and footnotes from a PDF as JSON",
    long_about = None
)]
struct Cli {
    /// Input PDF file (or layout dump with --layout-json)
    #[arg(value_name = "FILE")]
    input: PathBuf,

    /// Output JSON file
    #[arg(long, value_name = "FILE", default_value = "output.json")]
    out: PathBuf,

    /// Font size ratio over the body size at which a line is a heading
    #[arg(long, value_name = "RATIO", default_value_t = 1.15)]
    min_heading_ratio: f64,

    /// Write compact JSON
    #[arg(long)]
    no_pretty: bool,

    /// Keep every line as its own paragraph
    #[arg(long)]
    no_merge_lines: bool,

    /// Largest line gap, relative to line height, that still merges lines
    #[arg(long, value_name = "RATIO", default_value_t = 0.6)]
    merge_gap_ratio: f64,

    /// Run OCR on images (requires the tesseract binary)
    #[arg(long)]
    enable_ocr: bool,

    /// Also write Markdown to this file
    #[arg(long, value_name = "FILE")]
    markdown_out: Option<PathBuf>,

    /// Comma separated plugin names to run after extraction
    #[arg(long, value_name = "NAMES", default_value = "")]
    enable_plugins: String,

    /// Process pages in parallel
    #[arg(long)]
    parallel: bool,

    /// Skip table detection
    #[arg(long)]
    no_tables: bool,

    /// Treat the input as a JSON layout dump instead of a PDF
    #[arg(long)]
    layout_json: bool,

    /// Logging level
    #[arg(
        long,
        value_enum,
        ignore_case = true,
        default_value = "info",
        env = "PDFSTRUCT_LOG_LEVEL"
    )]
    log_level: LogLevel,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum LogLevel {
    /// Errors only
    Error,
    /// Warnings and errors
    #[value(alias = "warning")]
    Warn,
    /// Progress information (default)
    Info,
    /// Detector decisions and per-page counts
    Debug,
    /// Everything
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

impl Cli {
    fn extract_options(&self) -> ExtractOptions {
        ExtractOptions::new()
            .with_heading_ratio(self.min_heading_ratio)
            .with_merge_lines(!self.no_merge_lines)
            .with_merge_gap_ratio(self.merge_gap_ratio)
            .with_ocr(self.enable_ocr)
            .with_parallel(self.parallel)
            .with_tables(!self.no_tables)
    }

    fn json_format(&self) -> JsonFormat {
        if self.no_pretty {
            JsonFormat::Compact
        } else {
            JsonFormat::Pretty
        }
    }
}

fn main() {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.log_level.into())
        .parse_default_env()
        .init();

    if let Err(e) = run(&cli) {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::with_template("{spinner:.green} {msg}")?);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message(format!("Reading {}...", cli.input.display()));

    let mut result = extract(cli)?;

    let plugins = parse_plugin_list(&cli.enable_plugins);
    if !plugins.is_empty() {
        pb.set_message("Running plugins...");
        log::info!("Running plugins: {}", plugins.join(", "));
        PluginRegistry::with_defaults().run(&mut result, &plugins);
    }

    pb.set_message("Writing output...");
    write_json(&result, &cli.out, cli.json_format())?;
    let markdown = match &cli.markdown_out {
        Some(path) => {
            let markdown = render::to_markdown(&result, &MarkdownOptions::default())?;
            fs::write(path, markdown)?;
            Some(path)
        }
        None => None,
    };
    pb.finish_and_clear();

    println!("{} {}", "Wrote".green(), cli.out.display());
    if let Some(path) = markdown {
        println!("{} {}", "Wrote".green(), path.display());
    }

    Ok(())
}

fn extract(cli: &Cli) -> Result<ExtractionResult, Box<dyn std::error::Error>> {
    let extractor = Extractor::new(cli.extract_options())?;

    let result = if cli.layout_json {
        let layout = JsonLayoutDocument::open(&cli.input)?;
        extractor.extract(&layout)
    } else {
        let pdf = PdfLayoutSource::open(&cli.input)?;
        extractor.extract_with_tables(&pdf, &LayoutTableSource::new(&pdf))
    };

    log::debug!(
        "Extracted {} blocks from {} pages",
        result.blocks().count(),
        result.page_count()
    );
    Ok(result)
}

fn write_json(
    result: &ExtractionResult,
    path: &Path,
    format: JsonFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut writer = BufWriter::new(File::create(path)?);
    render::to_writer(result, &mut writer, format)?;
    writer.flush()?;
    Ok(())
}
