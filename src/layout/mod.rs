//! Page layout input.
//!
//! A [`LayoutSource`] yields one [`PageLayout`] per page: blocks of text lines
//! made of positioned [`Span`]s, plus image placements. Two sources ship with
//! the crate, [`PdfLayoutSource`] (content streams via lopdf) and
//! [`JsonLayoutDocument`] (a renderer's JSON dump). Tables come from a
//! separate [`TableSource`]; [`LayoutTableSource`] derives them from text
//! alignment.

mod collect;
mod json;
mod ocr;
mod pdf;
mod source;
mod tables;
mod types;

pub use collect::{CollectedPage, PageElement, PageImage, TextLine};
pub use json::JsonLayoutDocument;
pub use ocr::{chart_description, OcrEngine, TesseractOcr, CHART_PLACEHOLDER};
pub use pdf::PdfLayoutSource;
pub use source::{collect_tables, LayoutSource, MemoryLayout, NoTables, TableSource};
pub use tables::{LayoutTableSource, StreamTableDetector, TableDetectorConfig};
pub use types::{ImageData, ImageFormat, LayoutBlock, Line, PageLayout, Span};
