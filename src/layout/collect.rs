//! Reduction of a page layout to the lines and images the structure passes
//! work on.

use unicode_normalization::UnicodeNormalization;

use crate::model::BBox;

use super::types::{ImageData, LayoutBlock, Line, PageLayout};

/// A text line reduced to what heading detection and merging need.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    /// Concatenated span texts, trimmed
    pub text: String,
    /// Trimmed texts of the non-empty spans
    pub parts: Vec<String>,
    /// Box of the first non-empty span
    pub bbox: BBox,
    /// Largest font size among non-empty spans
    pub max_size: f32,
}

impl TextLine {
    /// Reduce a line; `None` when no span carries visible text.
    pub fn from_line(line: &Line) -> Option<Self> {
        let mut text = String::new();
        let mut parts = Vec::new();
        let mut bbox = None;
        let mut max_size: f32 = 0.0;

        for span in &line.spans {
            let normalized: String = span.text.nfc().collect();
            text.push_str(&normalized);

            let trimmed = normalized.trim();
            if trimmed.is_empty() {
                continue;
            }
            max_size = max_size.max(span.size);
            bbox.get_or_insert(span.bbox);
            parts.push(trimmed.to_string());
        }

        Some(Self {
            text: text.trim().to_string(),
            parts,
            bbox: bbox?,
            max_size,
        })
    }

    /// Span texts joined by single spaces, the way headings are reported.
    pub fn heading_text(&self) -> String {
        self.parts.join(" ")
    }
}

/// An image placed on the page.
#[derive(Debug, Clone, PartialEq)]
pub struct PageImage {
    /// Placement on the page
    pub bbox: BBox,
    /// Encoded image, if the source provided it
    pub data: Option<ImageData>,
}

/// A line or an image, in renderer emission order.
#[derive(Debug, Clone, PartialEq)]
pub enum PageElement {
    /// A text line with visible text
    Line(TextLine),
    /// An image placement
    Image(PageImage),
}

impl PageElement {
    /// Box used for ordering and section lookup.
    pub fn bbox(&self) -> BBox {
        match self {
            PageElement::Line(line) => line.bbox,
            PageElement::Image(image) => image.bbox,
        }
    }
}

/// A page reduced to elements plus the font sizes of its visible spans.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectedPage {
    /// Page number (1-indexed)
    pub number: u32,
    /// Page width in points
    pub width: f32,
    /// Page height in points
    pub height: f32,
    /// Lines and images in emission order
    pub elements: Vec<PageElement>,
    /// Font size of every span with visible text, in emission order
    pub sizes: Vec<f32>,
}

impl CollectedPage {
    /// A page with no content.
    pub fn empty(number: u32, width: f32, height: f32) -> Self {
        Self {
            number,
            width,
            height,
            elements: Vec::new(),
            sizes: Vec::new(),
        }
    }

    /// Reduce a page layout.
    pub fn collect(layout: PageLayout) -> Self {
        let mut page = Self::empty(layout.number, layout.width, layout.height);
        page.sizes = layout
            .spans()
            .filter(|s| s.has_text())
            .map(|s| s.size)
            .collect();

        for block in layout.blocks {
            match block {
                LayoutBlock::Text { lines } => {
                    page.elements.extend(
                        lines
                            .iter()
                            .filter_map(TextLine::from_line)
                            .map(PageElement::Line),
                    );
                }
                LayoutBlock::Image { bbox, data } => {
                    page.elements
                        .push(PageElement::Image(PageImage { bbox, data }));
                }
            }
        }
        page
    }

    /// Text lines with their element index.
    pub fn lines(&self) -> impl Iterator<Item = (usize, &TextLine)> {
        self.elements.iter().enumerate().filter_map(|(i, e)| match e {
            PageElement::Line(line) => Some((i, line)),
            PageElement::Image(_) => None,
        })
    }

    /// Whether the page has no visible text.
    pub fn has_text(&self) -> bool {
        !self.sizes.is_empty()
    }
}
