//! Input validation: is this file a PDF we can hand to the layout source?

use crate::error::{Error, Result};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// PDF header information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfHeader {
    /// PDF version (e.g., "1.7", "2.0")
    pub version: String,
}

impl std::fmt::Display for PdfHeader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PDF {}", self.version)
    }
}

const PDF_MAGIC: &[u8] = b"%PDF-";
const VERSION_LEN: usize = 3; // "1.7"

/// Number of leading bytes searched for the header. Some producers emit
/// junk (BOMs, whitespace) before `%PDF-`.
const HEADER_SEARCH_WINDOW: usize = 1024;

/// Read the header of a file and check that it is a PDF.
///
/// Fails with [`Error::Io`] if the file cannot be read and with
/// [`Error::UnknownFormat`] if the header is missing.
pub fn check_pdf_path<P: AsRef<Path>>(path: P) -> Result<PdfHeader> {
    let mut file = File::open(path)?;
    let mut head = Vec::with_capacity(HEADER_SEARCH_WINDOW);
    file.by_ref()
        .take(HEADER_SEARCH_WINDOW as u64)
        .read_to_end(&mut head)?;
    check_pdf_bytes(&head)
}

/// Check that a byte buffer starts (within the search window) with a PDF header.
pub fn check_pdf_bytes(data: &[u8]) -> Result<PdfHeader> {
    let window = &data[..data.len().min(HEADER_SEARCH_WINDOW)];
    let start = window
        .windows(PDF_MAGIC.len())
        .position(|w| w == PDF_MAGIC)
        .ok_or(Error::UnknownFormat)?;

    let version_start = start + PDF_MAGIC.len();
    let version_bytes = data
        .get(version_start..version_start + VERSION_LEN)
        .ok_or(Error::UnknownFormat)?;
    let version = String::from_utf8_lossy(version_bytes).to_string();

    if !is_valid_version(&version) {
        return Err(Error::UnsupportedVersion(version));
    }

    Ok(PdfHeader { version })
}

/// Check if a file is a PDF.
pub fn is_pdf<P: AsRef<Path>>(path: P) -> bool {
    check_pdf_path(path).is_ok()
}

fn is_valid_version(version: &str) -> bool {
    let bytes = version.as_bytes();
    bytes.len() == 3 && bytes[0].is_ascii_digit() && bytes[1] == b'.' && bytes[2].is_ascii_digit()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_valid_header() {
        let header = check_pdf_bytes(b"%PDF-1.7\n%\xe2\xe3\xcf\xd3").unwrap();
        assert_eq!(header.version, "1.7");
        assert_eq!(header.to_string(), "PDF 1.7");
    }

    #[test]
    fn test_header_after_leading_junk() {
        let header = check_pdf_bytes(b"\xef\xbb\xbf\n%PDF-2.0\n").unwrap();
        assert_eq!(header.version, "2.0");
    }

    #[test]
    fn test_not_a_pdf() {
        assert!(matches!(
            check_pdf_bytes(b"<!DOCTYPE html>"),
            Err(Error::UnknownFormat)
        ));
        assert!(matches!(check_pdf_bytes(b""), Err(Error::UnknownFormat)));
        assert!(matches!(check_pdf_bytes(b"%PDF-1"), Err(Error::UnknownFormat)));
    }

    #[test]
    fn test_bad_version() {
        assert!(matches!(
            check_pdf_bytes(b"%PDF-x.y\n"),
            Err(Error::UnsupportedVersion(_))
        ));
    }

    #[test]
    fn test_check_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"%PDF-1.4\n1 0 obj\n").unwrap();
        assert!(is_pdf(file.path()));

        let mut other = tempfile::NamedTempFile::new().unwrap();
        other.write_all(b"plain text").unwrap();
        assert!(!is_pdf(other.path()));
        assert!(!is_pdf("/definitely/not/here.pdf"));
    }
}
