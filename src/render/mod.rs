//! Rendering of extraction results to JSON and Markdown.

mod json;
mod markdown;
mod options;

pub use json::{to_json, to_writer, JsonFormat};
pub use markdown::{to_markdown, MarkdownRenderer};
pub use options::MarkdownOptions;
