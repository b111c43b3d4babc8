//! The extraction pipeline.
//!
//! Pages are collected and scanned for headings independently, optionally on
//! the rayon pool. Everything after that needs document order and runs on
//! the calling thread: section assignment, merging, footnote
//! classification, then composition with the page's tables.

use std::collections::{BTreeMap, HashSet};

use rayon::prelude::*;

use crate::error::Result;
use crate::layout::{
    chart_description, collect_tables, CollectedPage, LayoutSource, OcrEngine, PageElement,
    TableSource, TesseractOcr,
};
use crate::model::{BBox, BlockInfo, ContentBlock, ExtractionResult, PageResult, TableGrid};

use super::compose::LayoutComposer;
use super::footnote::FootnoteClassifier;
use super::heading::{HeadingCandidate, HeadingDetector};
use super::merge::{ParagraphMerger, PlacedBlock};
use super::options::ExtractOptions;
use super::section::{assign_sections, SectionState};

/// Page size assumed for pages whose layout could not be read.
const FALLBACK_PAGE_SIZE: (f32, f32) = (612.0, 792.0);

/// One page after the per-page pass.
struct PageAnalysis {
    page: CollectedPage,
    headings: Vec<HeadingCandidate>,
    /// Descriptions of the page's images, in element order
    charts: Vec<String>,
}

/// A non-heading element in document order.
struct Item<'a> {
    page: u32,
    bbox: BBox,
    kind: ItemKind<'a>,
}

enum ItemKind<'a> {
    Line(&'a str),
    Chart(&'a str),
}

/// Reconstructs document structure from a layout source.
///
/// # Example
///
/// ```no_run
/// use pdfstruct::{ExtractOptions, Extractor, LayoutTableSource, PdfLayoutSource};
///
/// let pdf = PdfLayoutSource::open("paper.pdf")?;
/// let extractor = Extractor::new(ExtractOptions::default())?;
/// let result = extractor.extract_with_tables(&pdf, &LayoutTableSource::new(&pdf));
/// println!("{} pages", result.page_count());
/// # Ok::<(), pdfstruct::Error>(())
/// ```
pub struct Extractor {
    options: ExtractOptions,
    ocr: Option<Box<dyn OcrEngine>>,
}

impl std::fmt::Debug for Extractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Extractor")
            .field("options", &self.options)
            .field("ocr", &self.ocr.is_some())
            .finish()
    }
}

impl Extractor {
    /// Create an extractor, validating the options.
    ///
    /// With OCR enabled the `tesseract` command line tool is used unless
    /// another engine is supplied with [`with_ocr_engine`](Self::with_ocr_engine).
    pub fn new(options: ExtractOptions) -> Result<Self> {
        options.validate()?;
        let ocr: Option<Box<dyn OcrEngine>> = if options.enable_ocr {
            Some(Box::new(TesseractOcr::new()))
        } else {
            None
        };
        Ok(Self { options, ocr })
    }

    /// Use a specific OCR engine. Has no effect unless OCR is enabled.
    pub fn with_ocr_engine(mut self, engine: impl OcrEngine + 'static) -> Self {
        if self.options.enable_ocr {
            self.ocr = Some(Box::new(engine));
        }
        self
    }

    /// The options in use.
    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    /// Extract from a source that also provides its own tables.
    pub fn extract<S>(&self, source: &S) -> ExtractionResult
    where
        S: LayoutSource + TableSource + ?Sized,
    {
        self.extract_with_tables(source, source)
    }

    /// Extract with tables from a separate source.
    ///
    /// Per-page failures never abort the run: a page whose layout cannot be
    /// read comes out empty and a page whose tables fail has none.
    pub fn extract_with_tables<S, T>(&self, source: &S, tables: &T) -> ExtractionResult
    where
        S: LayoutSource + ?Sized,
        T: TableSource + ?Sized,
    {
        let page_count = source.page_count();
        let tables = if self.options.extract_tables {
            collect_tables(tables, page_count)
        } else {
            BTreeMap::new()
        };

        let analyses: Vec<PageAnalysis> = if self.options.parallel && page_count > 1 {
            (1..=page_count)
                .into_par_iter()
                .map(|number| self.analyze_page(source, number))
                .collect()
        } else {
            (1..=page_count)
                .map(|number| self.analyze_page(source, number))
                .collect()
        };

        self.assemble(analyses, tables)
    }

    fn analyze_page<S: LayoutSource + ?Sized>(&self, source: &S, number: u32) -> PageAnalysis {
        let mut page = match source.page_layout(number) {
            Ok(layout) => CollectedPage::collect(layout),
            Err(e) => {
                log::warn!("Page {}: layout unavailable, page left empty: {}", number, e);
                CollectedPage::empty(number, FALLBACK_PAGE_SIZE.0, FALLBACK_PAGE_SIZE.1)
            }
        };
        page.number = number;
        if !page.has_text() {
            log::warn!("Page {}: no text", number);
        }

        let headings = HeadingDetector::new(self.options.heading_ratio).detect(&page);
        let ocr = self.ocr.as_deref();
        let charts = page
            .elements
            .iter()
            .filter_map(|element| match element {
                PageElement::Image(image) => Some(chart_description(ocr, image.data.as_ref())),
                PageElement::Line(_) => None,
            })
            .collect();

        PageAnalysis {
            page,
            headings,
            charts,
        }
    }

    fn assemble(
        &self,
        mut analyses: Vec<PageAnalysis>,
        mut tables: BTreeMap<u32, Vec<TableGrid>>,
    ) -> ExtractionResult {
        let mut headings: BTreeMap<u32, Vec<HeadingCandidate>> = BTreeMap::new();
        let mut heading_elements: Vec<HashSet<usize>> = Vec::with_capacity(analyses.len());
        for analysis in &mut analyses {
            heading_elements.push(analysis.headings.iter().map(|h| h.element).collect());
            headings.insert(analysis.page.number, std::mem::take(&mut analysis.headings));
        }

        let items: Vec<Item<'_>> = analyses
            .iter()
            .zip(&heading_elements)
            .flat_map(|(analysis, skip)| page_items(analysis, skip))
            .collect();
        let states = assign_sections(items.iter().map(|i| (i.page, i.bbox.top())), &headings);

        let merger = ParagraphMerger::new(self.options.merge_gap_ratio);
        let mut cursor = items.iter().zip(states).peekable();
        let mut carried = SectionState::default();
        let mut result = ExtractionResult::new();

        for analysis in &analyses {
            let number = analysis.page.number;
            let entering = carried.clone();
            let mut text = Vec::new();
            let mut charts = Vec::new();

            while let Some((item, state)) = cursor.next_if(|(item, _)| item.page == number) {
                let info = BlockInfo::new(number)
                    .with_sections(state.section.clone(), state.sub_section.clone());
                match item.kind {
                    ItemKind::Line(line) => text.push(PlacedBlock::new(
                        item.bbox,
                        ContentBlock::paragraph(info, line),
                    )),
                    ItemKind::Chart(description) => charts.push(PlacedBlock::new(
                        item.bbox,
                        ContentBlock::chart(info, Some(description.to_string())),
                    )),
                }
                carried = state;
            }

            if self.options.merge_lines {
                text = merger.merge(text);
            }
            FootnoteClassifier::for_page_height(analysis.page.height).classify(&mut text);

            let page_tables = tables
                .remove(&number)
                .unwrap_or_default()
                .into_iter()
                .map(|grid| ContentBlock::table(BlockInfo::new(number), grid))
                .collect();

            let mut content = LayoutComposer::new()
                .tables(page_tables)
                .text(text)
                .charts(charts)
                .compose();
            inherit_table_sections(&mut content, &entering);

            log::debug!("Page {}: {} content blocks", number, content.len());
            result.add_page(PageResult {
                page_number: number,
                content,
            });
        }

        result
    }
}

/// Non-heading lines and images of a page, in emission order.
fn page_items<'a>(
    analysis: &'a PageAnalysis,
    headings: &'a HashSet<usize>,
) -> impl Iterator<Item = Item<'a>> + 'a {
    let number = analysis.page.number;
    let mut charts = analysis.charts.iter();

    analysis
        .page
        .elements
        .iter()
        .enumerate()
        .filter_map(move |(index, element)| match element {
            PageElement::Line(_) if headings.contains(&index) => None,
            PageElement::Line(line) => Some(Item {
                page: number,
                bbox: line.bbox,
                kind: ItemKind::Line(&line.text),
            }),
            PageElement::Image(image) => Some(Item {
                page: number,
                bbox: image.bbox,
                kind: ItemKind::Chart(charts.next().map_or("", String::as_str)),
            }),
        })
}

/// Give each table the section context of the block before it, or the
/// context the page was entered with.
fn inherit_table_sections(blocks: &mut [ContentBlock], entering: &SectionState) {
    let mut current = entering.clone();
    for block in blocks {
        if block.is_table() {
            block.info.section = current.section.clone();
            block.info.sub_section = current.sub_section.clone();
        } else {
            current = SectionState {
                section: block.info.section.clone(),
                sub_section: block.info.sub_section.clone(),
            };
        }
    }
}
