//! Layout source backed by a renderer's JSON dump.
//!
//! The dump mirrors the block/line/span dictionary most PDF renderers can
//! export:
//!
//! ```json
//! {"pages": [{"width": 612, "height": 792,
//!             "blocks": [{"type": 0, "lines": [{"spans": [
//!                 {"text": "1 Introduction", "size": 16, "bbox": [72, 60, 250, 78]}]}]},
//!                        {"type": 1, "bbox": [72, 400, 300, 600]}],
//!             "tables": [[["Name", "Qty"], ["Bolt", "4"]]]}]}
//! ```
//!
//! Pages are numbered by position. `tables` is optional and feeds the
//! [`TableSource`] implementation.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::model::TableGrid;

use super::source::{LayoutSource, MemoryLayout, TableSource};
use super::types::{LayoutBlock, PageLayout};

#[derive(Deserialize)]
struct RawDocument {
    pages: Vec<RawPage>,
}

#[derive(Deserialize)]
struct RawPage {
    #[serde(default = "default_width")]
    width: f32,
    #[serde(default = "default_height")]
    height: f32,
    #[serde(default)]
    blocks: Vec<LayoutBlock>,
    #[serde(default)]
    tables: Vec<TableGrid>,
}

fn default_width() -> f32 {
    612.0
}

fn default_height() -> f32 {
    792.0
}

/// A document loaded from a layout dump.
#[derive(Debug, Clone)]
pub struct JsonLayoutDocument {
    inner: MemoryLayout,
}

impl JsonLayoutDocument {
    /// Read a dump from a file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    /// Read a dump from any reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let raw: RawDocument =
            serde_json::from_reader(reader).map_err(|e| Error::Layout(e.to_string()))?;
        Ok(Self::from_raw(raw))
    }

    /// Parse a dump held in memory.
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: RawDocument =
            serde_json::from_str(json).map_err(|e| Error::Layout(e.to_string()))?;
        Ok(Self::from_raw(raw))
    }

    fn from_raw(raw: RawDocument) -> Self {
        let mut tables = Vec::new();
        let pages = raw
            .pages
            .into_iter()
            .enumerate()
            .map(|(i, page)| {
                let number = i as u32 + 1;
                if !page.tables.is_empty() {
                    tables.push((number, page.tables));
                }
                PageLayout {
                    number,
                    width: page.width,
                    height: page.height,
                    blocks: page.blocks,
                }
            })
            .collect();

        let inner = tables
            .into_iter()
            .fold(MemoryLayout::new(pages), |layout, (number, grids)| {
                layout.with_tables(number, grids)
            });
        Self { inner }
    }
}

impl LayoutSource for JsonLayoutDocument {
    fn page_count(&self) -> u32 {
        self.inner.page_count()
    }

    fn page_layout(&self, page_number: u32) -> Result<PageLayout> {
        self.inner.page_layout(page_number)
    }
}

impl TableSource for JsonLayoutDocument {
    fn page_tables(&self, page_number: u32) -> Result<Vec<TableGrid>> {
        self.inner.page_tables(page_number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const DUMP: &str = r#"{
        "pages": [
            {"width": 600, "height": 800, "blocks": [
                {"type": 0, "lines": [{"spans": [
                    {"text": "1 Intro", "size": 16, "bbox": [72, 60, 200, 78]}]}]},
                {"type": 1, "bbox": [72, 400, 300, 600]}
            ], "tables": [[["a", "b"], ["1", "2"]]]},
            {"blocks": []}
        ]
    }"#;

    #[test]
    fn test_parse_dump() {
        let doc = JsonLayoutDocument::from_json(DUMP).unwrap();
        assert_eq!(doc.page_count(), 2);

        let first = doc.page_layout(1).unwrap();
        assert_eq!(first.number, 1);
        assert_eq!(first.height, 800.0);
        assert_eq!(first.blocks.len(), 2);
        assert!(matches!(first.blocks[1], LayoutBlock::Image { .. }));

        let second = doc.page_layout(2).unwrap();
        assert_eq!(second.width, 612.0);
        assert!(second.blocks.is_empty());

        assert_eq!(doc.page_tables(1).unwrap().len(), 1);
        assert!(doc.page_tables(2).unwrap().is_empty());
    }

    #[test]
    fn test_invalid_dump_is_layout_error() {
        let err = JsonLayoutDocument::from_json(r#"{"pages": 3}"#).unwrap_err();
        assert!(matches!(err, Error::Layout(_)));
        assert!(err.is_input_error());
    }

    #[test]
    fn test_open_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(DUMP.as_bytes()).unwrap();
        let doc = JsonLayoutDocument::open(file.path()).unwrap();
        assert_eq!(doc.page_count(), 2);

        assert!(matches!(
            JsonLayoutDocument::open("/nonexistent/layout.json"),
            Err(Error::Io(_))
        ));
    }
}
