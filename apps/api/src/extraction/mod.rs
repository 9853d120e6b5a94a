//! Resume text extraction from uploaded PDF and DOCX documents.
//!
//! The uploaded bytes are staged in a `NamedTempFile` owned by `StagedDocument`.
//! The temp file is removed when the document is dropped, so every exit path of
//! the caller releases it.

mod docx;

#[cfg(test)]
pub(crate) use docx::tests::build_docx;

use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::debug;

pub const PDF_MEDIA_TYPE: &str = "application/pdf";
pub const DOCX_MEDIA_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("unsupported media type: {0}")]
    UnsupportedFormat(String),

    #[error("document could not be read: {0}")]
    Unreadable(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Container formats the extractor understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Docx,
}

impl DocumentKind {
    /// Resolves a declared media type, ignoring case and `;` parameters.
    pub fn from_media_type(media_type: &str) -> Option<Self> {
        let essence = media_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        match essence.as_str() {
            PDF_MEDIA_TYPE => Some(DocumentKind::Pdf),
            DOCX_MEDIA_TYPE => Some(DocumentKind::Docx),
            _ => None,
        }
    }
}

/// An uploaded document staged on disk, tagged with its declared media type.
#[derive(Debug)]
pub struct StagedDocument {
    media_type: String,
    file: NamedTempFile,
}

impl StagedDocument {
    pub fn create(media_type: impl Into<String>) -> std::io::Result<Self> {
        Ok(Self {
            media_type: media_type.into(),
            file: NamedTempFile::new()?,
        })
    }

    /// Appends a chunk of the upload to the staged file.
    pub fn write_chunk(&mut self, chunk: &[u8]) -> std::io::Result<()> {
        self.file.as_file_mut().write_all(chunk)
    }

    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }
}

/// Extracts plain text from a staged document.
///
/// The media type is checked before the payload is touched, so an unsupported
/// upload never yields partial text. Parsing runs on the blocking pool; a panic
/// inside a parser surfaces as `Unreadable`.
pub async fn extract(document: &StagedDocument) -> Result<String, ExtractError> {
    let kind = DocumentKind::from_media_type(document.media_type())
        .ok_or_else(|| ExtractError::UnsupportedFormat(document.media_type().to_string()))?;

    let bytes = tokio::fs::read(document.path()).await?;
    debug!("Extracting {:?} resume ({} bytes)", kind, bytes.len());

    let text = tokio::task::spawn_blocking(move || match kind {
        DocumentKind::Pdf => extract_pdf(&bytes),
        DocumentKind::Docx => docx::extract_raw_text(&bytes),
    })
    .await
    .map_err(|e| ExtractError::Unreadable(format!("parser aborted: {e}")))??;

    Ok(text)
}

/// A PDF with no text layer (e.g. a scan) yields an empty string.
fn extract_pdf(bytes: &[u8]) -> Result<String, ExtractError> {
    let text = pdf_extract::extract_text_from_mem(bytes)
        .map_err(|e| ExtractError::Unreadable(format!("PDF parsing failed: {e}")))?;
    if text.trim().is_empty() {
        return Ok(String::new());
    }
    Ok(text)
}
