//! Table detection from text alignment ("stream" mode).
//!
//! Tables are found without ruling lines: spans are grouped into rows, left
//! edges that recur across rows become column anchors, and runs of rows that
//! align with the anchors become tables. Each table is returned as a raw grid
//! of strings.

use std::collections::{HashMap, HashSet};

use crate::error::Result;
use crate::model::TableGrid;

use super::source::{LayoutSource, TableSource};
use super::types::Span;

/// Width of the buckets left edges are snapped to when counting alignment.
const EDGE_BUCKET: f32 = 5.0;

/// Distance within which a span counts as aligned with a column anchor.
const ALIGN_TOLERANCE: f32 = 5.0;

/// Slack allowed for spans starting slightly left of their column.
const COLUMN_SLACK: f32 = 10.0;

/// Table detector configuration.
#[derive(Debug, Clone)]
pub struct TableDetectorConfig {
    /// Minimum number of rows to consider as table
    pub min_rows: usize,
    /// Minimum number of columns to consider as table
    pub min_columns: usize,
    /// Maximum number of columns (above this, likely word-level splitting)
    pub max_columns: usize,
    /// Y tolerance for grouping spans into rows (fraction of font size)
    pub y_tolerance_factor: f32,
    /// Minimum column alignment ratio (0.0-1.0)
    pub min_alignment_ratio: f32,
    /// Minimum gap between columns (points)
    pub min_column_gap: f32,
}

impl Default for TableDetectorConfig {
    fn default() -> Self {
        Self {
            min_rows: 2,
            min_columns: 2,
            max_columns: 6,
            y_tolerance_factor: 0.4,
            min_alignment_ratio: 0.3,
            min_column_gap: 15.0,
        }
    }
}

/// A row of spans sharing a vertical position, sorted by x.
#[derive(Debug, Clone)]
struct Row<'a> {
    spans: Vec<&'a Span>,
}

impl<'a> Row<'a> {
    fn new(mut spans: Vec<&'a Span>) -> Self {
        spans.sort_by(|a, b| {
            a.bbox
                .left()
                .partial_cmp(&b.bbox.left())
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        Self { spans }
    }
}

/// Detects tables in the spans of a page.
#[derive(Debug, Clone, Default)]
pub struct StreamTableDetector {
    config: TableDetectorConfig,
}

impl StreamTableDetector {
    /// Create a detector with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a detector with custom configuration.
    pub fn with_config(config: TableDetectorConfig) -> Self {
        Self { config }
    }

    /// Detect tables among `spans`, top to bottom.
    pub fn detect(&self, spans: &[Span]) -> Vec<TableGrid> {
        let spans: Vec<&Span> = spans.iter().filter(|s| s.has_text()).collect();
        if spans.len() < self.config.min_rows * self.config.min_columns {
            return Vec::new();
        }

        let rows = self.group_into_rows(spans);
        if rows.len() < self.config.min_rows {
            return Vec::new();
        }

        let columns = self.detect_columns(&rows);
        log::debug!(
            "TableDetector: {} rows, column anchors at {:?}",
            rows.len(),
            columns
        );
        if columns.len() < self.config.min_columns {
            return Vec::new();
        }

        let mut tables = Vec::new();
        for (start, end) in self.find_table_regions(&rows, &columns) {
            let region = &rows[start..=end];
            let region_columns = self.detect_columns(region);

            if region_columns.len() < self.config.min_columns {
                continue;
            }
            if region_columns.len() > self.config.max_columns {
                log::debug!(
                    "TableDetector: skipping region, too many columns ({} > {})",
                    region_columns.len(),
                    self.config.max_columns
                );
                continue;
            }
            if is_list_pattern(region, &region_columns) {
                log::debug!("TableDetector: skipping region, looks like a list");
                continue;
            }

            tables.push(to_grid(region, &region_columns));
        }
        tables
    }

    /// Group spans into rows by the bottom of their boxes.
    fn group_into_rows<'a>(&self, mut spans: Vec<&'a Span>) -> Vec<Row<'a>> {
        spans.sort_by(|a, b| {
            a.bbox
                .bottom()
                .partial_cmp(&b.bbox.bottom())
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| {
                    a.bbox
                        .left()
                        .partial_cmp(&b.bbox.left())
                        .unwrap_or(std::cmp::Ordering::Equal)
                })
        });

        let mut rows = Vec::new();
        let mut current: Vec<&Span> = Vec::new();
        let mut current_y: Option<f32> = None;

        for span in spans {
            let tolerance = span.size * self.config.y_tolerance_factor;
            match current_y {
                Some(y) if (span.bbox.bottom() - y).abs() <= tolerance => {}
                _ => {
                    if !current.is_empty() {
                        rows.push(Row::new(std::mem::take(&mut current)));
                    }
                    current_y = Some(span.bbox.bottom());
                }
            }
            current.push(span);
        }
        if !current.is_empty() {
            rows.push(Row::new(current));
        }
        rows
    }

    /// Column anchors: left edges recurring in enough rows.
    ///
    /// Rows with several spans are the likely table rows; when too few of
    /// them exist, every span of every row votes instead.
    fn detect_columns(&self, rows: &[Row<'_>]) -> Vec<f32> {
        let multi_span: Vec<&Row<'_>> = rows.iter().filter(|r| r.spans.len() >= 2).collect();
        let (voters, once_per_row): (Vec<&Row<'_>>, bool) =
            if multi_span.len() >= self.config.min_rows {
                (multi_span, true)
            } else {
                (rows.iter().collect(), false)
            };
        if voters.is_empty() {
            return Vec::new();
        }

        let mut edge_counts: HashMap<i32, usize> = HashMap::new();
        for row in &voters {
            let buckets = row
                .spans
                .iter()
                .map(|s| (s.bbox.left() / EDGE_BUCKET).round() as i32);
            if once_per_row {
                for bucket in buckets.collect::<HashSet<_>>() {
                    *edge_counts.entry(bucket).or_insert(0) += 1;
                }
            } else {
                for bucket in buckets {
                    *edge_counts.entry(bucket).or_insert(0) += 1;
                }
            }
        }

        let min_occurrences =
            ((voters.len() as f32 * self.config.min_alignment_ratio) as usize).max(2);

        let mut edges: Vec<f32> = edge_counts
            .into_iter()
            .filter(|(_, count)| *count >= min_occurrences)
            .map(|(bucket, _)| bucket as f32 * EDGE_BUCKET)
            .collect();
        edges.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let mut merged: Vec<f32> = Vec::new();
        for edge in edges {
            match merged.last() {
                Some(last) if edge - last < self.config.min_column_gap => {}
                _ => merged.push(edge),
            }
        }
        merged
    }

    /// Contiguous runs of aligned rows, as inclusive index ranges.
    fn find_table_regions(&self, rows: &[Row<'_>], columns: &[f32]) -> Vec<(usize, usize)> {
        let mut regions = Vec::new();
        let mut start: Option<usize> = None;

        for (i, row) in rows.iter().enumerate() {
            if alignment_score(row, columns) >= self.config.min_alignment_ratio {
                start.get_or_insert(i);
            } else if let Some(s) = start.take() {
                if i - s >= self.config.min_rows {
                    regions.push((s, i - 1));
                }
            }
        }
        if let Some(s) = start {
            if rows.len() - s >= self.config.min_rows {
                regions.push((s, rows.len() - 1));
            }
        }
        regions
    }
}

/// Fraction of a row's spans that start on a column anchor.
fn alignment_score(row: &Row<'_>, columns: &[f32]) -> f32 {
    if row.spans.is_empty() || columns.is_empty() {
        return 0.0;
    }
    let aligned = row
        .spans
        .iter()
        .filter(|s| {
            columns
                .iter()
                .any(|c| (s.bbox.left() - c).abs() <= ALIGN_TOLERANCE)
        })
        .count();
    aligned as f32 / row.spans.len() as f32
}

/// Build the grid; spans sharing a cell are joined with a space.
fn to_grid(rows: &[Row<'_>], columns: &[f32]) -> TableGrid {
    let right = rows
        .iter()
        .flat_map(|r| r.spans.iter())
        .map(|s| s.bbox.x1)
        .fold(f32::NEG_INFINITY, f32::max);

    rows.iter()
        .map(|row| {
            let mut cells: Vec<Vec<&str>> = vec![Vec::new(); columns.len()];
            for span in &row.spans {
                let col = find_column(span.bbox.left(), columns, right);
                cells[col].push(span.text.trim());
            }
            cells.into_iter().map(|parts| parts.join(" ")).collect()
        })
        .collect()
}

/// Index of the column a left edge falls into, else the nearest anchor.
fn find_column(x: f32, columns: &[f32], right: f32) -> usize {
    for (i, &start) in columns.iter().enumerate() {
        let end = columns.get(i + 1).copied().unwrap_or(right + 100.0);
        if x >= start - COLUMN_SLACK && x < end - COLUMN_SLACK {
            return i;
        }
    }
    columns
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| {
            (x - *a)
                .abs()
                .partial_cmp(&(x - *b).abs())
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .map(|(i, _)| i)
        .unwrap_or(0)
}

/// Whether aligned rows are really a bulleted or numbered list whose
/// markers landed in their own column.
fn is_list_pattern(rows: &[Row<'_>], columns: &[f32]) -> bool {
    if columns.len() < 2 || rows.is_empty() {
        return false;
    }

    let mut bullets = 0;
    let mut numbers = 0;
    for row in rows {
        // Rows are sorted by x, so the first span is the leftmost.
        if let Some(first) = row.spans.first() {
            let text = first.text.trim();
            if is_bullet_marker(text) {
                bullets += 1;
            } else if is_number_marker(text) {
                numbers += 1;
            }
        }
    }

    let bullet_ratio = bullets as f32 / rows.len() as f32;
    let marker_ratio = (bullets + numbers) as f32 / rows.len() as f32;

    // Numbered first columns are common in real tables; only reject
    // two-column regions for them.
    bullet_ratio >= 0.5 || (columns.len() == 2 && marker_ratio >= 0.5)
}

fn is_bullet_marker(text: &str) -> bool {
    matches!(
        text.trim(),
        "-" | "–" | "—" | "•" | "·" | "*" | "○" | "▪" | "◦" | "▸" | "▹" | "►" | "■" | "●" | "□" | "◆" | "◇" | "▶" | "▷" | "➤"
    )
}

/// "1.", "12)", "3", "a.", "B)" and the like.
fn is_number_marker(text: &str) -> bool {
    let cleaned: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    if cleaned.is_empty() {
        return false;
    }
    if cleaned.parse::<u32>().is_ok() {
        return true;
    }

    let digits = cleaned.chars().take_while(|c| c.is_ascii_digit()).count();
    let suffix = &cleaned[digits..];
    if digits > 0 && (suffix == "." || suffix == ")") {
        return true;
    }

    let mut chars = cleaned.chars();
    matches!(
        (chars.next(), chars.next(), chars.next()),
        (Some(c), Some('.' | ')'), None) if c.is_alphabetic()
    )
}

/// A [`TableSource`] that runs the stream detector over a layout source's pages.
pub struct LayoutTableSource<'a, S: LayoutSource + ?Sized> {
    source: &'a S,
    detector: StreamTableDetector,
}

impl<'a, S: LayoutSource + ?Sized> LayoutTableSource<'a, S> {
    /// Detect tables in `source` with the default detector.
    pub fn new(source: &'a S) -> Self {
        Self {
            source,
            detector: StreamTableDetector::new(),
        }
    }

    /// Use a custom detector.
    pub fn with_detector(mut self, detector: StreamTableDetector) -> Self {
        self.detector = detector;
        self
    }
}

impl<S: LayoutSource + ?Sized> TableSource for LayoutTableSource<'_, S> {
    fn page_tables(&self, page_number: u32) -> Result<Vec<TableGrid>> {
        let layout = self.source.page_layout(page_number)?;
        let spans: Vec<Span> = layout.spans().cloned().collect();
        Ok(self.detector.detect(&spans))
    }
}
