//! Error types for pdfstruct.

use std::io;
use thiserror::Error;

/// Result type alias for pdfstruct operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while reconstructing document structure.
///
/// Only input errors are fatal for a whole extraction. Page-level problems
/// (empty pages, tables that fail to extract, OCR failures) are absorbed by
/// the pipeline and never surface as an `Error`.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The file format is not recognized as PDF.
    #[error("Unknown file format: not a valid PDF")]
    UnknownFormat,

    /// The PDF version is not supported.
    #[error("Unsupported PDF version: {0}")]
    UnsupportedVersion(String),

    /// Error parsing PDF structure.
    #[error("PDF parsing error: {0}")]
    PdfParse(String),

    /// The PDF document is encrypted.
    #[error("Document is encrypted")]
    Encrypted,

    /// A layout dump could not be read.
    #[error("Invalid layout data: {0}")]
    Layout(String),

    /// Page number is out of range.
    #[error("Page {0} is out of range (document has {1} pages)")]
    PageOutOfRange(u32, u32),

    /// An extraction option has an unusable value.
    #[error("Invalid option {name}: {reason}")]
    InvalidOption {
        /// Option name
        name: &'static str,
        /// Why the value was rejected
        reason: String,
    },

    /// Table extraction failed for a page.
    #[error("Table extraction failed on page {page}: {reason}")]
    TableExtract {
        /// Page number (1-indexed)
        page: u32,
        /// Failure description
        reason: String,
    },

    /// OCR engine failure.
    #[error("OCR error: {0}")]
    Ocr(String),

    /// Error during rendering (Markdown, JSON).
    #[error("Rendering error: {0}")]
    Render(String),
}

impl Error {
    /// Whether this error means the input could not be used at all.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Error::Io(_)
                | Error::UnknownFormat
                | Error::UnsupportedVersion(_)
                | Error::PdfParse(_)
                | Error::Encrypted
                | Error::Layout(_)
        )
    }
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::PdfParse(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::Encrypted;
        assert_eq!(err.to_string(), "Document is encrypted");

        let err = Error::PageOutOfRange(10, 5);
        assert_eq!(
            err.to_string(),
            "Page 10 is out of range (document has 5 pages)"
        );

        let err = Error::InvalidOption {
            name: "heading_ratio",
            reason: "must be positive".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid option heading_ratio: must be positive"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
        assert!(err.is_input_error());
    }

    #[test]
    fn test_page_level_errors_are_not_input_errors() {
        let err = Error::TableExtract {
            page: 2,
            reason: "no spans".to_string(),
        };
        assert!(!err.is_input_error());
        assert!(!Error::Ocr("tesseract missing".to_string()).is_input_error());
    }
}
