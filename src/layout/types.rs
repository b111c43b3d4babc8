//! Layout primitives produced by a renderer.

use serde::Deserialize;

use crate::model::BBox;

/// A run of text with a single font size.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Span {
    /// Literal text
    pub text: String,
    /// Font size in points
    #[serde(alias = "font_size")]
    pub size: f32,
    /// Bounding box in page coordinates
    pub bbox: BBox,
}

impl Span {
    /// Create a new span.
    pub fn new(text: impl Into<String>, size: f32, bbox: BBox) -> Self {
        Self {
            text: text.into(),
            size,
            bbox,
        }
    }

    /// Whether the span carries visible text.
    pub fn has_text(&self) -> bool {
        !self.text.trim().is_empty()
    }
}

/// Spans sharing a visual row, in renderer order.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Line {
    /// Spans of the line
    #[serde(default)]
    pub spans: Vec<Span>,
}

impl Line {
    /// Create a line from spans.
    pub fn new(spans: Vec<Span>) -> Self {
        Self { spans }
    }
}

/// Encoding of embedded image bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    /// Baseline/progressive JPEG (`DCTDecode`)
    Jpeg,
    /// JPEG 2000 (`JPXDecode`)
    Jpeg2000,
    /// PNG file bytes
    Png,
}

/// Encoded image bytes, ready to hand to an OCR engine.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageData {
    /// File-format bytes
    pub bytes: Vec<u8>,
    /// Encoding of `bytes`
    pub format: ImageFormat,
}

/// A block of page content.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "RawBlock")]
pub enum LayoutBlock {
    /// Text lines
    Text {
        /// Lines of the block
        lines: Vec<Line>,
    },
    /// A placed image
    Image {
        /// Placement on the page
        bbox: BBox,
        /// Encoded image, when the source can provide it
        data: Option<ImageData>,
    },
}

/// Wire shape of a block in a layout dump: `type` 0 is text, 1 is image.
#[derive(Deserialize)]
struct RawBlock {
    #[serde(rename = "type", default)]
    kind: u8,
    #[serde(default)]
    bbox: Option<BBox>,
    #[serde(default)]
    lines: Vec<Line>,
}

impl From<RawBlock> for LayoutBlock {
    fn from(raw: RawBlock) -> Self {
        match raw.kind {
            1 => LayoutBlock::Image {
                bbox: raw.bbox.unwrap_or_default(),
                data: None,
            },
            _ => LayoutBlock::Text { lines: raw.lines },
        }
    }
}

/// Layout of a single page.
#[derive(Debug, Clone, PartialEq)]
pub struct PageLayout {
    /// Page number (1-indexed)
    pub number: u32,
    /// Page width in points
    pub width: f32,
    /// Page height in points
    pub height: f32,
    /// Blocks in renderer emission order
    pub blocks: Vec<LayoutBlock>,
}

impl PageLayout {
    /// Create an empty page layout.
    pub fn new(number: u32, width: f32, height: f32) -> Self {
        Self {
            number,
            width,
            height,
            blocks: Vec::new(),
        }
    }

    /// Create an empty Letter-size page (8.5 x 11 inches).
    pub fn letter(number: u32) -> Self {
        Self::new(number, 612.0, 792.0)
    }

    /// Add a text block made of the given lines.
    pub fn push_text(&mut self, lines: Vec<Line>) {
        self.blocks.push(LayoutBlock::Text { lines });
    }

    /// Add an image block.
    pub fn push_image(&mut self, bbox: BBox, data: Option<ImageData>) {
        self.blocks.push(LayoutBlock::Image { bbox, data });
    }

    /// All spans on the page in emission order.
    pub fn spans(&self) -> impl Iterator<Item = &Span> {
        self.blocks
            .iter()
            .filter_map(|block| match block {
                LayoutBlock::Text { lines } => Some(lines),
                LayoutBlock::Image { .. } => None,
            })
            .flatten()
            .flat_map(|line| line.spans.iter())
    }
}
