//! Coalescing of consecutive lines into paragraphs.

use crate::model::{BBox, ContentBlock};

/// A block together with its position on the page.
///
/// Positions only drive ordering and merging; they are dropped before
/// output.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedBlock {
    /// Position on the page
    pub bbox: BBox,
    /// The block itself
    pub block: ContentBlock,
}

impl PlacedBlock {
    /// Pair a block with its position.
    pub fn new(bbox: BBox, block: ContentBlock) -> Self {
        Self { bbox, block }
    }
}

/// Sort placed blocks into reading order, keeping ties in insertion order.
pub fn sort_reading_order(blocks: &mut [PlacedBlock]) {
    blocks.sort_by(|a, b| a.bbox.reading_cmp(&b.bbox));
}

/// Merges vertically adjacent paragraph lines of the same section.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParagraphMerger {
    gap_ratio: f64,
}

impl Default for ParagraphMerger {
    fn default() -> Self {
        Self::new(0.6)
    }
}

impl ParagraphMerger {
    /// Create a merger with the given gap ratio.
    pub fn new(gap_ratio: f64) -> Self {
        Self { gap_ratio }
    }

    /// Merge the paragraph lines of one page.
    ///
    /// A line joins the paragraph above it when the vertical gap to the
    /// previous line is at most `gap_ratio` times its own height and both
    /// carry the same section and sub-section. Blocks without text are
    /// passed through unmerged.
    pub fn merge(&self, mut lines: Vec<PlacedBlock>) -> Vec<PlacedBlock> {
        sort_reading_order(&mut lines);

        let mut merged: Vec<PlacedBlock> = Vec::with_capacity(lines.len());
        let mut last_bottom = 0.0f32;

        for line in lines {
            let joins = match merged.last() {
                Some(current) => self.continues(current, last_bottom, &line),
                None => false,
            };
            last_bottom = line.bbox.bottom();

            match merged.last_mut() {
                Some(current) if joins => {
                    if let (Some(text), Some(next)) = (current.block.text_mut(), line.block.text()) {
                        append_line(text, next);
                    }
                    current.bbox = current.bbox.union(&line.bbox);
                }
                _ => merged.push(line),
            }
        }

        log::trace!("Merged into {} paragraph(s)", merged.len());
        merged
    }

    fn continues(&self, current: &PlacedBlock, last_bottom: f32, next: &PlacedBlock) -> bool {
        if current.block.text().is_none() || next.block.text().is_none() {
            return false;
        }
        if current.block.section() != next.block.section()
            || current.block.sub_section() != next.block.sub_section()
        {
            return false;
        }

        let gap = f64::from(next.bbox.top() - last_bottom);
        let line_height = f64::from(next.bbox.height()).max(1.0);
        gap <= line_height * self.gap_ratio
    }
}

/// Append a line to paragraph text, re-joining words hyphenated at the
/// line break.
fn append_line(text: &mut String, next: &str) {
    if text.ends_with('-') {
        text.pop();
        text.push_str(next.trim_start());
    } else {
        text.push(' ');
        text.push_str(next);
    }
}
