//! Final per-page ordering of tables, paragraphs, footnotes and charts.
//!
//! Table sources report no position, so each table gets a synthetic one
//! spread evenly across the vertical range the page's text occupies.

use crate::model::{BBox, ContentBlock};

use super::merge::{sort_reading_order, PlacedBlock};

/// Synthetic top edges for `count` tables on a page with the given text.
///
/// With `n` tables the text range `[min_y, max_y]` is cut into `n + 1`
/// equal steps and table `i` (1-based) sits at step `i`. When the text
/// spans at most one point (or there is no text) every table is pushed
/// past the end of the page.
pub fn table_positions(text: &[PlacedBlock], count: usize) -> Vec<f32> {
    let min_y = text
        .iter()
        .map(|b| b.bbox.top())
        .reduce(f32::min)
        .unwrap_or(0.0);
    let max_y = text
        .iter()
        .map(|b| b.bbox.bottom())
        .reduce(f32::max)
        .unwrap_or(0.0);

    let spread = (max_y - min_y).max(1.0);
    let step = spread / (count as f32 + 1.0);

    (1..=count)
        .map(|i| {
            if spread > 1.0 {
                min_y + step * i as f32
            } else {
                f32::INFINITY
            }
        })
        .collect()
}

/// Interleaves the blocks of one page into reading order.
#[derive(Debug, Default)]
pub struct LayoutComposer {
    tables: Vec<ContentBlock>,
    text: Vec<PlacedBlock>,
    charts: Vec<PlacedBlock>,
}

impl LayoutComposer {
    /// Create an empty composer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add table blocks, in extraction order.
    pub fn tables(mut self, tables: Vec<ContentBlock>) -> Self {
        self.tables = tables;
        self
    }

    /// Add paragraph and footnote blocks.
    pub fn text(mut self, text: Vec<PlacedBlock>) -> Self {
        self.text = text;
        self
    }

    /// Add chart placeholders.
    pub fn charts(mut self, charts: Vec<PlacedBlock>) -> Self {
        self.charts = charts;
        self
    }

    /// Blocks sorted by (top, left); ties keep tables, then text, then charts.
    pub fn compose(self) -> Vec<ContentBlock> {
        let positions = table_positions(&self.text, self.tables.len());

        let mut placed: Vec<PlacedBlock> =
            Vec::with_capacity(self.tables.len() + self.text.len() + self.charts.len());
        placed.extend(
            self.tables
                .into_iter()
                .zip(positions)
                .map(|(table, y)| PlacedBlock::new(BBox::marker(y), table)),
        );
        placed.extend(self.text);
        placed.extend(self.charts);

        sort_reading_order(&mut placed);
        placed.into_iter().map(|p| p.block).collect()
    }
}
