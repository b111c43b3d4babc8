//! Page-level result.

use super::ContentBlock;
use serde::Serialize;

/// The reconstructed content of one source page, in reading order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PageResult {
    /// Page number (1-indexed)
    pub page_number: u32,

    /// Content blocks in final reading order
    pub content: Vec<ContentBlock>,
}

impl PageResult {
    /// Create an empty page result.
    pub fn new(page_number: u32) -> Self {
        Self {
            page_number,
            content: Vec::new(),
        }
    }

    /// Append a block. The block must belong to this page.
    pub fn push(&mut self, block: ContentBlock) {
        debug_assert_eq!(block.page_number(), self.page_number);
        self.content.push(block);
    }

    /// Check if the page has no content.
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Number of blocks on the page.
    pub fn block_count(&self) -> usize {
        self.content.len()
    }

    /// Paragraph blocks on the page.
    pub fn paragraphs(&self) -> impl Iterator<Item = &ContentBlock> {
        self.content.iter().filter(|b| b.is_paragraph())
    }

    /// Footnote blocks on the page.
    pub fn footnotes(&self) -> impl Iterator<Item = &ContentBlock> {
        self.content.iter().filter(|b| b.is_footnote())
    }

    /// Text of paragraphs and footnotes joined by blank lines.
    pub fn plain_text(&self) -> String {
        self.content
            .iter()
            .filter_map(|b| b.text())
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BlockInfo;

    #[test]
    fn test_page_result() {
        let mut page = PageResult::new(2);
        assert!(page.is_empty());

        page.push(ContentBlock::paragraph(BlockInfo::new(2), "Body"));
        page.push(ContentBlock::footnote(BlockInfo::new(2), "Note"));
        page.push(ContentBlock::table(BlockInfo::new(2), vec![]));

        assert_eq!(page.block_count(), 3);
        assert_eq!(page.paragraphs().count(), 1);
        assert_eq!(page.footnotes().count(), 1);
        assert_eq!(page.plain_text(), "Body\n\nNote");
    }

    #[test]
    fn test_page_serialization() {
        let mut page = PageResult::new(1);
        page.push(ContentBlock::paragraph(BlockInfo::new(1), "Body"));
        let value = serde_json::to_value(&page).unwrap();
        assert_eq!(value["page_number"], 1);
        assert_eq!(value["content"][0]["text"], "Body");
    }
}
