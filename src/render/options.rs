//! Rendering options.

/// Options for Markdown rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkdownOptions {
    /// List each page's footnotes after its content
    pub include_footnotes: bool,
}

impl MarkdownOptions {
    /// Create new options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable the per-page footnote list.
    pub fn with_footnotes(mut self, include: bool) -> Self {
        self.include_footnotes = include;
        self
    }
}

impl Default for MarkdownOptions {
    fn default() -> Self {
        Self {
            include_footnotes: true,
        }
    }
}
