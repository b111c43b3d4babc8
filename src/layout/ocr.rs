//! OCR of embedded images, used to enrich chart placeholders.

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::{Command, ExitStatus, Stdio};
use std::thread;

use crate::error::{Error, Result};

use super::types::ImageData;

/// Description given to every image block.
pub const CHART_PLACEHOLDER: &str = "Image/Chart detected";

/// Characters of recognized text quoted in a chart description.
const OCR_EXCERPT_CHARS: usize = 60;

/// A text recognition capability.
pub trait OcrEngine: Sync {
    /// Recognize the text in an image.
    fn recognize(&self, image: &ImageData) -> Result<String>;
}

/// OCR through the `tesseract` command line tool.
///
/// The image is piped to `tesseract stdin stdout`, so any format the local
/// build of Leptonica reads (JPEG, PNG, JPEG 2000) works.
#[derive(Debug, Clone)]
pub struct TesseractOcr {
    binary: PathBuf,
    language: Option<String>,
}

impl Default for TesseractOcr {
    fn default() -> Self {
        Self {
            binary: PathBuf::from("tesseract"),
            language: None,
        }
    }
}

impl TesseractOcr {
    /// Use `tesseract` from `PATH`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a specific tesseract binary.
    pub fn with_binary(mut self, binary: impl Into<PathBuf>) -> Self {
        self.binary = binary.into();
        self
    }

    /// Recognition language(s), e.g. `eng+deu`.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }
}

impl OcrEngine for TesseractOcr {
    fn recognize(&self, image: &ImageData) -> Result<String> {
        let mut command = Command::new(&self.binary);
        command.arg("stdin").arg("stdout");
        if let Some(language) = &self.language {
            command.arg("-l").arg(language);
        }

        let mut child = command
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| Error::Ocr(format!("failed to start {}: {}", self.binary.display(), e)))?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| Error::Ocr("tesseract stdin unavailable".to_string()))?;
        let bytes = image.bytes.clone();
        let writer = std::thread::spawn(move || stdin.write_all(&bytes));

        let output = child
            .wait_with_output()
            .map_err(|e| Error::Ocr(e.to_string()))?;
        let written = writer.join();

        if !output.status.success() {
            return Err(Error::Ocr(exit_failure(
                output.status,
                &output.stderr,
                written,
            )));
        }
        if let Some(problem) = write_problem(written) {
            log::debug!("tesseract succeeded but {}", problem);
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Error message for a failed tesseract run, including any failure while
/// feeding it the image.
fn exit_failure(
    status: ExitStatus,
    stderr: &[u8],
    written: thread::Result<io::Result<()>>,
) -> String {
    let mut message = format!(
        "tesseract exited with {}: {}",
        status,
        String::from_utf8_lossy(stderr).trim()
    );
    if let Some(problem) = write_problem(written) {
        message.push_str(&format!(" ({})", problem));
    }
    message
}

fn write_problem(written: thread::Result<io::Result<()>>) -> Option<String> {
    match written {
        Ok(Ok(())) => None,
        Ok(Err(e)) => Some(format!("writing the image failed: {}", e)),
        Err(_) => Some("the image writer panicked".to_string()),
    }
}

/// Description for an image block, with an OCR excerpt when one is available.
///
/// OCR failures are logged and leave the plain placeholder in place.
pub fn chart_description(engine: Option<&dyn OcrEngine>, image: Option<&ImageData>) -> String {
    let (Some(engine), Some(image)) = (engine, image) else {
        return CHART_PLACEHOLDER.to_string();
    };

    match engine.recognize(image) {
        Ok(text) => {
            let text = text.trim();
            if text.is_empty() {
                CHART_PLACEHOLDER.to_string()
            } else {
                let excerpt: String = text.chars().take(OCR_EXCERPT_CHARS).collect();
                format!("{} (OCR excerpt: {}...)", CHART_PLACEHOLDER, excerpt)
            }
        }
        Err(e) => {
            log::debug!("OCR failed: {}", e);
            CHART_PLACEHOLDER.to_string()
        }
    }
}
