//! # pdfstruct
//!
//! Reconstructs the logical structure of PDF documents from page layout.
//!
//! Positioned text spans and image placements are turned into a sequence of
//! typed content blocks per page (paragraphs, tables, chart placeholders and
//! footnotes), each tagged with the section and sub-section it belongs to.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pdfstruct::{extract_file, render, ExtractOptions};
//!
//! fn main() -> pdfstruct::Result<()> {
//!     let result = extract_file("paper.pdf", &ExtractOptions::default())?;
//!
//!     let json = render::to_json(&result, render::JsonFormat::Pretty)?;
//!     let markdown = render::to_markdown(&result, &render::MarkdownOptions::default())?;
//!     println!("{}\n{}", json, markdown);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Pipeline
//!
//! - **Headings**: lines set noticeably larger than the page's body text
//! - **Sections**: numbered (`2.1 Method`) and plain headings carried forward
//!   over the following content, across pages
//! - **Paragraphs**: adjacent lines of the same section merged, with
//!   hyphenated line breaks re-joined
//! - **Footnotes**: text in the bottom tenth of a page
//! - **Tables and charts**: interleaved with the text in reading order
//!
//! Layout can come from a PDF ([`PdfLayoutSource`]), a JSON layout dump
//! ([`JsonLayoutDocument`]) or any other [`LayoutSource`].

pub mod detect;
pub mod error;
pub mod layout;
pub mod model;
pub mod plugins;
pub mod render;
pub mod structure;

// Re-export commonly used types
pub use detect::{check_pdf_bytes, check_pdf_path, is_pdf, PdfHeader};
pub use error::{Error, Result};
pub use layout::{
    JsonLayoutDocument, LayoutSource, LayoutTableSource, MemoryLayout, NoTables, OcrEngine,
    PageLayout, PdfLayoutSource, TableSource, TesseractOcr,
};
pub use model::{
    BBox, BlockInfo, BlockKind, ContentBlock, ExtractionResult, PageResult, TableGrid,
};
pub use plugins::{Plugin, PluginRegistry, WordCountPlugin};
pub use render::{JsonFormat, MarkdownOptions};
pub use structure::{ExtractOptions, Extractor};

use std::path::Path;

/// Extract the structure of a PDF file.
///
/// Tables are detected from text alignment on each page.
///
/// # Example
///
/// ```no_run
/// use pdfstruct::{extract_file, ExtractOptions};
///
/// let result = extract_file("document.pdf", &ExtractOptions::default()).unwrap();
/// for page in &result.pages {
///     println!("page {}: {} blocks", page.page_number, page.content.len());
/// }
/// ```
pub fn extract_file<P: AsRef<Path>>(path: P, options: &ExtractOptions) -> Result<ExtractionResult> {
    let extractor = Extractor::new(options.clone())?;
    let pdf = PdfLayoutSource::open(path)?;
    Ok(extractor.extract_with_tables(&pdf, &LayoutTableSource::new(&pdf)))
}

/// Extract the structure of a PDF held in memory.
///
/// # Example
///
/// ```no_run
/// use pdfstruct::{extract_bytes, ExtractOptions};
///
/// let data = std::fs::read("document.pdf").unwrap();
/// let result = extract_bytes(&data, &ExtractOptions::default()).unwrap();
/// ```
pub fn extract_bytes(data: &[u8], options: &ExtractOptions) -> Result<ExtractionResult> {
    let extractor = Extractor::new(options.clone())?;
    let pdf = PdfLayoutSource::from_bytes(data)?;
    Ok(extractor.extract_with_tables(&pdf, &LayoutTableSource::new(&pdf)))
}

/// Extract the structure described by a JSON layout dump.
///
/// Tables are taken from the dump's per-page `tables` arrays.
pub fn extract_layout_json<P: AsRef<Path>>(
    path: P,
    options: &ExtractOptions,
) -> Result<ExtractionResult> {
    let extractor = Extractor::new(options.clone())?;
    let layout = JsonLayoutDocument::open(path)?;
    Ok(extractor.extract(&layout))
}
