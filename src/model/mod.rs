//! Output model for reconstructed document structure.
//!
//! An [`ExtractionResult`] holds one [`PageResult`] per source page; each page
//! holds [`ContentBlock`]s in reading order. Blocks share a common
//! [`BlockInfo`] record and carry a [`BlockKind`] payload.

mod block;
mod document;
mod geometry;
mod page;

pub use block::{BlockInfo, BlockKind, BlockMetadata, ContentBlock, TableGrid};
pub use document::ExtractionResult;
pub use geometry::BBox;
pub use page::PageResult;
