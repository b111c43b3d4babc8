//! Document-level result.

use super::{ContentBlock, PageResult};
use serde::Serialize;

/// The reconstructed structure of a whole document.
///
/// Contains one [`PageResult`] per source page, ascending from page 1.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExtractionResult {
    /// Pages in document order
    pub pages: Vec<PageResult>,
}

impl ExtractionResult {
    /// Create an empty result.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of pages.
    pub fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    /// Get a page by number (1-indexed).
    pub fn get_page(&self, page_number: u32) -> Option<&PageResult> {
        if page_number == 0 {
            return None;
        }
        self.pages.get((page_number - 1) as usize)
    }

    /// Add a page.
    pub fn add_page(&mut self, page: PageResult) {
        self.pages.push(page);
    }

    /// Check if the result has no pages.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// All blocks in document order.
    pub fn blocks(&self) -> impl Iterator<Item = &ContentBlock> {
        self.pages.iter().flat_map(|p| p.content.iter())
    }

    /// All blocks in document order, mutably.
    pub fn blocks_mut(&mut self) -> impl Iterator<Item = &mut ContentBlock> {
        self.pages.iter_mut().flat_map(|p| p.content.iter_mut())
    }

    /// Plain text of all pages.
    pub fn plain_text(&self) -> String {
        self.pages
            .iter()
            .map(|p| p.plain_text())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}
