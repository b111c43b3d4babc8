//! Extraction options.

use crate::error::{Error, Result};

/// Options controlling structure reconstruction.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractOptions {
    /// Font-size multiple of the body size at which a line becomes a heading
    pub heading_ratio: f64,

    /// Whether consecutive lines are coalesced into paragraphs
    pub merge_lines: bool,

    /// Largest line gap, relative to line height, that still merges
    pub merge_gap_ratio: f64,

    /// Whether image blocks are sent through OCR
    pub enable_ocr: bool,

    /// Whether pages are read on the rayon pool
    pub parallel: bool,

    /// Whether tables are extracted at all
    pub extract_tables: bool,
}

impl ExtractOptions {
    /// Create options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the heading ratio.
    pub fn with_heading_ratio(mut self, ratio: f64) -> Self {
        self.heading_ratio = ratio;
        self
    }

    /// Enable or disable line merging.
    pub fn with_merge_lines(mut self, merge: bool) -> Self {
        self.merge_lines = merge;
        self
    }

    /// Set the merge gap ratio.
    pub fn with_merge_gap_ratio(mut self, ratio: f64) -> Self {
        self.merge_gap_ratio = ratio;
        self
    }

    /// Enable or disable OCR of images.
    pub fn with_ocr(mut self, enable: bool) -> Self {
        self.enable_ocr = enable;
        self
    }

    /// Enable or disable parallel page processing.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Disable parallel processing.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Enable or disable table extraction.
    pub fn with_tables(mut self, extract: bool) -> Self {
        self.extract_tables = extract;
        self
    }

    /// Check that ratios are usable.
    pub fn validate(&self) -> Result<()> {
        if !(self.heading_ratio.is_finite() && self.heading_ratio > 0.0) {
            return Err(Error::InvalidOption {
                name: "heading_ratio",
                reason: format!("must be a positive number, got {}", self.heading_ratio),
            });
        }
        if !(self.merge_gap_ratio.is_finite() && self.merge_gap_ratio >= 0.0) {
            return Err(Error::InvalidOption {
                name: "merge_gap_ratio",
                reason: format!(
                    "must be a non-negative number, got {}",
                    self.merge_gap_ratio
                ),
            });
        }
        Ok(())
    }
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            heading_ratio: 1.15,
            merge_lines: true,
            merge_gap_ratio: 0.6,
            enable_ocr: false,
            parallel: false,
            extract_tables: true,
        }
    }
}
