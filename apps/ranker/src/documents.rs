//! Text extractor — turns an uploaded resume blob into raw text.
//!
//! PDF goes through pdf-extract; plain text and markdown are decoded as UTF-8.
//! Extraction is blocking; callers run it inside `tokio::task::spawn_blocking`.

use std::path::Path;

use thiserror::Error;

const TEXT_EXTENSIONS: &[&str] = &["txt", "text", "md"];

/// The document could not be turned into text: not a supported type,
/// corrupted, encrypted, or not valid UTF-8.
#[derive(Debug, Clone, Error)]
#[error("could not read document '{identifier}': {reason}")]
pub struct DocumentParseError {
    pub identifier: String,
    pub reason: String,
}

impl DocumentParseError {
    pub fn new(identifier: &str, reason: impl Into<String>) -> Self {
        Self {
            identifier: identifier.to_string(),
            reason: reason.into(),
        }
    }
}

/// Extracts raw text from `bytes`. The type is taken from the extension of
/// `identifier`, falling back to the `%PDF-` magic for extension-less uploads.
pub fn extract_text(identifier: &str, bytes: &[u8]) -> Result<String, DocumentParseError> {
    let extension = Path::new(identifier)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase());

    match extension.as_deref() {
        Some("pdf") => extract_pdf(identifier, bytes),
        Some(ext) if TEXT_EXTENSIONS.contains(&ext) => decode_utf8(identifier, bytes),
        None if bytes.starts_with(b"%PDF-") => extract_pdf(identifier, bytes),
        None => decode_utf8(identifier, bytes),
        Some(ext) => Err(DocumentParseError::new(
            identifier,
            format!("unsupported document type '.{ext}'"),
        )),
    }
}

fn extract_pdf(identifier: &str, bytes: &[u8]) -> Result<String, DocumentParseError> {
    pdf_extract::extract_text_from_mem(bytes)
        .map_err(|e| DocumentParseError::new(identifier, format!("PDF extraction failed: {e}")))
}

fn decode_utf8(identifier: &str, bytes: &[u8]) -> Result<String, DocumentParseError> {
    String::from_utf8(bytes.to_vec())
        .map_err(|e| DocumentParseError::new(identifier, format!("not valid UTF-8 text: {e}")))
}
