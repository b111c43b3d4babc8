//! Collaborator traits: where page layouts and tables come from.

use std::collections::BTreeMap;

use crate::error::{Error, Result};
use crate::model::TableGrid;

use super::PageLayout;

/// A provider of per-page layout primitives.
///
/// Implementations must tolerate concurrent read-only calls to
/// [`page_layout`](LayoutSource::page_layout) when parallel extraction is on.
pub trait LayoutSource: Sync {
    /// Number of pages in the document.
    fn page_count(&self) -> u32;

    /// Layout of a page (1-indexed).
    fn page_layout(&self, page_number: u32) -> Result<PageLayout>;
}

/// A provider of raw tables per page.
pub trait TableSource {
    /// Tables on a page (1-indexed), in extraction order.
    fn page_tables(&self, page_number: u32) -> Result<Vec<TableGrid>>;
}

/// A table source that never finds anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTables;

impl TableSource for NoTables {
    fn page_tables(&self, _page_number: u32) -> Result<Vec<TableGrid>> {
        Ok(Vec::new())
    }
}

/// Run a table source over every page and build the page → tables map.
///
/// A page whose extraction fails contributes no tables; the failure is
/// logged and the remaining pages are still processed. Pages without tables
/// are absent from the map.
pub fn collect_tables<T: TableSource + ?Sized>(
    source: &T,
    page_count: u32,
) -> BTreeMap<u32, Vec<TableGrid>> {
    let mut tables = BTreeMap::new();
    for page_number in 1..=page_count {
        match source.page_tables(page_number) {
            Ok(found) if !found.is_empty() => {
                log::debug!("Page {}: {} table(s)", page_number, found.len());
                tables.insert(page_number, found);
            }
            Ok(_) => {}
            Err(e) => {
                log::warn!("Skipping tables on page {}: {}", page_number, e);
            }
        }
    }
    tables
}

/// An in-memory document: pages built by hand or by another tool.
#[derive(Debug, Clone, Default)]
pub struct MemoryLayout {
    pages: Vec<PageLayout>,
    tables: BTreeMap<u32, Vec<TableGrid>>,
}

impl MemoryLayout {
    /// Create from page layouts; pages are renumbered 1..=n in order.
    pub fn new(pages: Vec<PageLayout>) -> Self {
        let pages = pages
            .into_iter()
            .enumerate()
            .map(|(i, mut page)| {
                page.number = i as u32 + 1;
                page
            })
            .collect();
        Self {
            pages,
            tables: BTreeMap::new(),
        }
    }

    /// Attach tables to a page.
    pub fn with_tables(mut self, page_number: u32, tables: Vec<TableGrid>) -> Self {
        self.tables.insert(page_number, tables);
        self
    }

    /// The pages.
    pub fn pages(&self) -> &[PageLayout] {
        &self.pages
    }
}

impl LayoutSource for MemoryLayout {
    fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    fn page_layout(&self, page_number: u32) -> Result<PageLayout> {
        page_number
            .checked_sub(1)
            .and_then(|i| self.pages.get(i as usize))
            .cloned()
            .ok_or(Error::PageOutOfRange(page_number, self.page_count()))
    }
}

impl TableSource for MemoryLayout {
    fn page_tables(&self, page_number: u32) -> Result<Vec<TableGrid>> {
        Ok(self.tables.get(&page_number).cloned().unwrap_or_default())
    }
}
