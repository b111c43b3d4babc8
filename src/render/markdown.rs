//! Markdown rendering of extraction results.

use crate::error::Result;
use crate::model::{BlockKind, ContentBlock, ExtractionResult, PageResult};

use super::MarkdownOptions;

/// Description used for charts that have none.
const CHART_FALLBACK: &str = "Chart";

/// Convert an extraction result to Markdown.
pub fn to_markdown(result: &ExtractionResult, options: &MarkdownOptions) -> Result<String> {
    MarkdownRenderer::new(options.clone()).render(result)
}

/// Markdown renderer.
///
/// Section changes become `##` headings and sub-section changes `###`
/// headings; the section memory runs across page boundaries. Footnotes are
/// gathered per page and listed after the page's other blocks.
pub struct MarkdownRenderer {
    options: MarkdownOptions,
    section: Option<String>,
    sub_section: Option<String>,
}

impl MarkdownRenderer {
    /// Create a new Markdown renderer.
    pub fn new(options: MarkdownOptions) -> Self {
        Self {
            options,
            section: None,
            sub_section: None,
        }
    }

    /// Render a result to Markdown.
    pub fn render(mut self, result: &ExtractionResult) -> Result<String> {
        let mut output = String::new();
        for page in &result.pages {
            self.render_page(&mut output, page);
        }

        let mut output = output.trim().to_string();
        output.push('\n');
        Ok(output)
    }

    fn render_page(&mut self, output: &mut String, page: &PageResult) {
        for block in &page.content {
            self.render_block(output, block);
        }

        if !self.options.include_footnotes {
            return;
        }
        let footnotes: Vec<&str> = page.footnotes().filter_map(|b| b.text()).collect();
        if footnotes.is_empty() {
            return;
        }
        output.push_str("#### Footnotes\n");
        for (i, text) in footnotes.iter().enumerate() {
            output.push_str(&format!("[{}] {}\n", i + 1, text));
        }
        output.push('\n');
    }

    fn render_block(&mut self, output: &mut String, block: &ContentBlock) {
        if block.is_footnote() {
            return;
        }
        self.render_headings(output, block);

        match &block.kind {
            BlockKind::Paragraph { text } => {
                output.push_str(text);
                output.push_str("\n\n");
            }
            BlockKind::Table {
                table_data,
                description,
            } => {
                if let Some(desc) = description.as_deref().filter(|d| !d.is_empty()) {
                    output.push_str(&format!("_Table: {}_\n", desc));
                }
                render_table(output, table_data);
                output.push('\n');
            }
            BlockKind::Chart { description, .. } => {
                let desc = description
                    .as_deref()
                    .filter(|d| !d.is_empty())
                    .unwrap_or(CHART_FALLBACK);
                output.push_str(&format!("> {}\n\n", desc));
            }
            BlockKind::Footnote { .. } => {}
        }
    }

    fn render_headings(&mut self, output: &mut String, block: &ContentBlock) {
        if let Some(section) = block.section().filter(|s| !s.is_empty()) {
            if self.section.as_deref() != Some(section) {
                output.push_str(&format!("## {}\n", section));
                self.section = Some(section.to_string());
                self.sub_section = None;
            }
        }
        if let Some(sub) = block.sub_section().filter(|s| !s.is_empty()) {
            if self.sub_section.as_deref() != Some(sub) {
                output.push_str(&format!("### {}\n", sub));
                self.sub_section = Some(sub.to_string());
            }
        }
    }
}

/// Pipe table with the first row as header. Writes a single empty line for
/// a table without rows.
fn render_table(output: &mut String, rows: &[Vec<String>]) {
    let Some((header, body)) = rows.split_first() else {
        output.push('\n');
        return;
    };

    render_row(output, header);
    output.push('|');
    for _ in header {
        output.push_str(" --- |");
    }
    if header.is_empty() {
        output.push_str("  |");
    }
    output.push('\n');
    for row in body {
        render_row(output, row);
    }
}

fn render_row(output: &mut String, cells: &[String]) {
    let cells: Vec<String> = cells
        .iter()
        .map(|c| c.replace('\n', " ").trim().to_string())
        .collect();
    output.push_str(&format!("| {} |\n", cells.join(" | ")));
}
