//! Heading detection from font-size statistics.
//!
//! Each page gets its own body-text baseline: the most frequent font size
//! among spans with visible text. Lines whose largest span reaches
//! `body × heading_ratio` are heading candidates.

use crate::layout::CollectedPage;
use crate::model::BBox;

/// A line recognized as a heading.
#[derive(Debug, Clone, PartialEq)]
pub struct HeadingCandidate {
    /// Span texts joined by spaces
    pub text: String,
    /// Box of the first non-empty span
    pub bbox: BBox,
    /// Largest span size over body size, to 3 decimals
    pub confidence: f64,
    /// Index of the line in [`CollectedPage::elements`]
    pub element: usize,
}

/// Body-text font size of a page.
///
/// The most frequent size wins, the first seen on a tie. When no size
/// repeats, the upper median of the sorted sizes is used instead. `None`
/// for a page without text.
pub fn body_font_size(sizes: &[f32]) -> Option<f32> {
    let mut counts: Vec<(f32, usize)> = Vec::new();
    for &size in sizes {
        match counts.iter_mut().find(|(s, _)| s.to_bits() == size.to_bits()) {
            Some((_, count)) => *count += 1,
            None => counts.push((size, 1)),
        }
    }

    let mut best: Option<(f32, usize)> = None;
    for &(size, count) in &counts {
        if best.map_or(true, |(_, c)| count > c) {
            best = Some((size, count));
        }
    }

    match best? {
        (_, 1) => {
            let mut sorted = sizes.to_vec();
            sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
            sorted.get(sorted.len() / 2).copied()
        }
        (size, _) => Some(size),
    }
}

/// Detects headings on a page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeadingDetector {
    heading_ratio: f64,
}

impl Default for HeadingDetector {
    fn default() -> Self {
        Self::new(1.15)
    }
}

impl HeadingDetector {
    /// Create a detector with the given heading ratio.
    pub fn new(heading_ratio: f64) -> Self {
        Self { heading_ratio }
    }

    /// Heading candidates of a page in emission order.
    pub fn detect(&self, page: &CollectedPage) -> Vec<HeadingCandidate> {
        let Some(body) = body_font_size(&page.sizes) else {
            return Vec::new();
        };
        let body = f64::from(body);
        let threshold = body * self.heading_ratio;

        let headings: Vec<HeadingCandidate> = page
            .lines()
            .filter(|(_, line)| f64::from(line.max_size) >= threshold)
            .map(|(element, line)| {
                let confidence = if body != 0.0 {
                    (f64::from(line.max_size) / body * 1000.0).round() / 1000.0
                } else {
                    1.0
                };
                HeadingCandidate {
                    text: line.heading_text(),
                    bbox: line.bbox,
                    confidence,
                    element,
                }
            })
            .collect();

        log::debug!(
            "Page {}: body size {:.1}, threshold {:.2}, {} heading(s)",
            page.number,
            body,
            threshold,
            headings.len()
        );
        headings
    }
}
