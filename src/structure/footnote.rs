//! Footnote classification by vertical position.

use serde_json::Value;

use crate::model::{BlockKind, ContentBlock};

use super::merge::PlacedBlock;

/// Fraction of the page height below which text counts as a footnote.
pub const FOOTNOTE_BAND: f32 = 0.9;

/// Confidence attached to every heuristic footnote.
pub const FOOTNOTE_CONFIDENCE: f64 = 0.5;

/// Reclassifies paragraphs in the bottom band of a page as footnotes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FootnoteClassifier {
    threshold: f32,
}

impl FootnoteClassifier {
    /// Classifier for a page of the given height.
    pub fn for_page_height(height: f32) -> Self {
        Self {
            threshold: height * FOOTNOTE_BAND,
        }
    }

    /// Whether a block starting at `top` lies in the footnote band.
    pub fn in_band(&self, top: f32) -> bool {
        top >= self.threshold
    }

    /// Turn qualifying paragraphs into footnotes, in place.
    ///
    /// Section context and text are kept; other block kinds are untouched.
    pub fn classify(&self, blocks: &mut [PlacedBlock]) {
        for placed in blocks.iter_mut() {
            if !self.in_band(placed.bbox.top()) {
                continue;
            }
            if let BlockKind::Paragraph { text } = &mut placed.block.kind {
                let text = std::mem::take(text);
                let mut info = placed.block.info.clone();
                info.confidence = Some(FOOTNOTE_CONFIDENCE);
                info.metadata
                    .insert("source".to_string(), Value::from("heuristic"));
                placed.block = ContentBlock::footnote(info, text);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BBox, BlockInfo};

    fn paragraph(text: &str, top: f32) -> PlacedBlock {
        let info = BlockInfo::new(2).with_sections(Some("3 Results".into()), Some("3.1 Data".into()));
        PlacedBlock::new(
            BBox::new(72.0, top, 500.0, top + 10.0),
            ContentBlock::paragraph(info, text),
        )
    }

    #[test]
    fn test_bottom_band_becomes_footnote() {
        let mut blocks = vec![paragraph("body", 700.0), paragraph("1 See appendix.", 720.0)];
        FootnoteClassifier::for_page_height(800.0).classify(&mut blocks);

        assert!(blocks[0].block.is_paragraph());
        let note = &blocks[1].block;
        assert!(note.is_footnote());
        assert_eq!(note.text(), Some("1 See appendix."));
        assert_eq!(note.section(), Some("3 Results"));
        assert_eq!(note.sub_section(), Some("3.1 Data"));
        assert_eq!(note.info.page_number, 2);
        assert_eq!(note.info.confidence, Some(0.5));
        assert_eq!(note.info.metadata["source"], "heuristic");
    }

    #[test]
    fn test_band_boundary_is_inclusive() {
        let classifier = FootnoteClassifier::for_page_height(800.0);
        assert!(classifier.in_band(720.0));
        assert!(!classifier.in_band(719.9));
    }

    #[test]
    fn test_charts_in_band_are_kept() {
        let mut blocks = vec![PlacedBlock::new(
            BBox::new(0.0, 780.0, 100.0, 790.0),
            ContentBlock::chart(BlockInfo::new(1), None),
        )];
        FootnoteClassifier::for_page_height(800.0).classify(&mut blocks);
        assert!(blocks[0].block.is_chart());
    }
}
