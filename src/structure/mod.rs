//! Structure reconstruction: from positioned lines to sections, paragraphs,
//! footnotes, tables and charts.
//!
//! [`Extractor`] drives the passes in order:
//!
//! 1. [`HeadingDetector`] marks lines set larger than the page's body text.
//! 2. [`assign_sections`] folds headings into a (section, sub_section)
//!    pair for every remaining line and image.
//! 3. [`ParagraphMerger`] coalesces adjacent lines of the same section.
//! 4. [`FootnoteClassifier`] turns text in the bottom band into footnotes.
//! 5. [`LayoutComposer`] interleaves tables, text and charts per page.

mod compose;
mod extractor;
mod footnote;
mod heading;
mod merge;
mod options;
mod section;

pub use compose::{table_positions, LayoutComposer};
pub use extractor::Extractor;
pub use footnote::{FootnoteClassifier, FOOTNOTE_BAND, FOOTNOTE_CONFIDENCE};
pub use heading::{body_font_size, HeadingCandidate, HeadingDetector};
pub use merge::{sort_reading_order, ParagraphMerger, PlacedBlock};
pub use options::ExtractOptions;
pub use section::{assign_sections, heading_level, SectionState};
