//! Content blocks: the units of the reconstructed document.

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;
use std::collections::BTreeMap;

/// A table as returned by a table source: rows of cells, row-major.
///
/// Missing cells are represented by empty strings.
pub type TableGrid = Vec<Vec<String>>;

/// Open key-value metadata attached to a block.
pub type BlockMetadata = BTreeMap<String, Value>;

/// Fields shared by every content block.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlockInfo {
    /// Page number (1-indexed)
    pub page_number: u32,
    /// Current top-level section heading
    pub section: Option<String>,
    /// Current sub-section heading
    pub sub_section: Option<String>,
    /// Classification confidence, when the block came from a heuristic
    pub confidence: Option<f64>,
    /// Free-form metadata (plugins, classifier tags)
    pub metadata: BlockMetadata,
}

impl BlockInfo {
    /// Create block info for a page with no section context.
    pub fn new(page_number: u32) -> Self {
        Self {
            page_number,
            ..Default::default()
        }
    }

    /// Set the section context.
    pub fn with_sections(mut self, section: Option<String>, sub_section: Option<String>) -> Self {
        self.section = section;
        self.sub_section = sub_section;
        self
    }
}

/// Variant payload of a content block.
#[derive(Debug, Clone, PartialEq)]
pub enum BlockKind {
    /// Running text
    Paragraph {
        /// Paragraph text
        text: String,
    },
    /// A table from the table source
    Table {
        /// Rows of cells
        table_data: TableGrid,
        /// Optional caption or description
        description: Option<String>,
    },
    /// An image or chart placeholder
    Chart {
        /// Placeholder description (possibly with an OCR excerpt)
        description: Option<String>,
        /// Data recovered from the chart, if any
        extracted_data: Option<TableGrid>,
    },
    /// Text in the footnote band at the bottom of a page
    Footnote {
        /// Footnote text
        text: String,
    },
}

/// A block of content on a page.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentBlock {
    /// Common fields
    pub info: BlockInfo,
    /// Variant payload
    pub kind: BlockKind,
}

impl ContentBlock {
    /// Create a paragraph block.
    pub fn paragraph(info: BlockInfo, text: impl Into<String>) -> Self {
        Self {
            info,
            kind: BlockKind::Paragraph { text: text.into() },
        }
    }

    /// Create a table block.
    pub fn table(info: BlockInfo, table_data: TableGrid) -> Self {
        Self {
            info,
            kind: BlockKind::Table {
                table_data,
                description: None,
            },
        }
    }

    /// Create a chart placeholder block.
    pub fn chart(info: BlockInfo, description: Option<String>) -> Self {
        Self {
            info,
            kind: BlockKind::Chart {
                description,
                extracted_data: None,
            },
        }
    }

    /// Create a footnote block.
    pub fn footnote(info: BlockInfo, text: impl Into<String>) -> Self {
        Self {
            info,
            kind: BlockKind::Footnote { text: text.into() },
        }
    }

    /// The serialized type tag.
    pub fn type_name(&self) -> &'static str {
        match self.kind {
            BlockKind::Paragraph { .. } => "paragraph",
            BlockKind::Table { .. } => "table",
            BlockKind::Chart { .. } => "chart",
            BlockKind::Footnote { .. } => "footnote",
        }
    }

    /// Page number (1-indexed).
    pub fn page_number(&self) -> u32 {
        self.info.page_number
    }

    /// Current section heading.
    pub fn section(&self) -> Option<&str> {
        self.info.section.as_deref()
    }

    /// Current sub-section heading.
    pub fn sub_section(&self) -> Option<&str> {
        self.info.sub_section.as_deref()
    }

    /// Text of a paragraph or footnote.
    pub fn text(&self) -> Option<&str> {
        match &self.kind {
            BlockKind::Paragraph { text } | BlockKind::Footnote { text } => Some(text),
            _ => None,
        }
    }

    /// Mutable text of a paragraph or footnote.
    pub fn text_mut(&mut self) -> Option<&mut String> {
        match &mut self.kind {
            BlockKind::Paragraph { text } | BlockKind::Footnote { text } => Some(text),
            _ => None,
        }
    }

    /// Check if this block is a paragraph.
    pub fn is_paragraph(&self) -> bool {
        matches!(self.kind, BlockKind::Paragraph { .. })
    }

    /// Check if this block is a table.
    pub fn is_table(&self) -> bool {
        matches!(self.kind, BlockKind::Table { .. })
    }

    /// Check if this block is a chart placeholder.
    pub fn is_chart(&self) -> bool {
        matches!(self.kind, BlockKind::Chart { .. })
    }

    /// Check if this block is a footnote.
    pub fn is_footnote(&self) -> bool {
        matches!(self.kind, BlockKind::Footnote { .. })
    }
}

/// Serialized layout: `type`, `section`, `sub_section`, the variant payload,
/// then `confidence` and `metadata` when present. The page number lives on
/// the enclosing page and is not repeated here.
impl Serialize for ContentBlock {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("type", self.type_name())?;
        map.serialize_entry("section", &self.info.section)?;
        map.serialize_entry("sub_section", &self.info.sub_section)?;

        match &self.kind {
            BlockKind::Paragraph { text } | BlockKind::Footnote { text } => {
                map.serialize_entry("text", text)?;
            }
            BlockKind::Table {
                table_data,
                description,
            } => {
                map.serialize_entry("table_data", table_data)?;
                map.serialize_entry("description", description)?;
            }
            BlockKind::Chart {
                description,
                extracted_data,
            } => {
                map.serialize_entry("description", description)?;
                map.serialize_entry("extracted_data", extracted_data)?;
            }
        }

        if let Some(confidence) = self.info.confidence {
            map.serialize_entry("confidence", &confidence)?;
        }
        if !self.info.metadata.is_empty() {
            map.serialize_entry("metadata", &self.info.metadata)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_paragraph_serialization() {
        let info = BlockInfo::new(1).with_sections(Some("1 Intro".into()), None);
        let block = ContentBlock::paragraph(info, "Hello world");
        let value = serde_json::to_value(&block).unwrap();

        assert_eq!(
            value,
            json!({
                "type": "paragraph",
                "section": "1 Intro",
                "sub_section": null,
                "text": "Hello world"
            })
        );
    }

    #[test]
    fn test_footnote_serialization_includes_confidence_and_metadata() {
        let mut info = BlockInfo::new(3);
        info.confidence = Some(0.5);
        info.metadata.insert("source".into(), json!("heuristic"));
        let block = ContentBlock::footnote(info, "1. See appendix.");
        let value = serde_json::to_value(&block).unwrap();

        assert_eq!(value["type"], "footnote");
        assert_eq!(value["confidence"], 0.5);
        assert_eq!(value["metadata"]["source"], "heuristic");
        assert!(value.get("page_number").is_none());
        assert!(value.get("bbox").is_none());
    }

    #[test]
    fn test_table_and_chart_payloads() {
        let table = ContentBlock::table(
            BlockInfo::new(1),
            vec![vec!["a".into(), "b".into()], vec!["1".into(), "".into()]],
        );
        let value = serde_json::to_value(&table).unwrap();
        assert_eq!(value["table_data"][1][1], "");
        assert!(value["description"].is_null());

        let chart = ContentBlock::chart(BlockInfo::new(1), Some("Image/Chart detected".into()));
        let value = serde_json::to_value(&chart).unwrap();
        assert_eq!(value["type"], "chart");
        assert_eq!(value["description"], "Image/Chart detected");
        assert!(value["extracted_data"].is_null());
    }

    #[test]
    fn test_text_accessors() {
        let mut block = ContentBlock::paragraph(BlockInfo::new(1), "inter-");
        block.text_mut().unwrap().push_str("national");
        assert_eq!(block.text(), Some("inter-national"));
        assert!(block.is_paragraph());

        let table = ContentBlock::table(BlockInfo::new(1), vec![]);
        assert_eq!(table.text(), None);
        assert!(table.is_table());
    }
}
