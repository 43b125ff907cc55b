//! PDF text extraction
//!
//! Page texts are concatenated in page order with nothing inserted between
//! them, so the last word of one page can run into the first word of the next.

use std::path::Path;

use lopdf::Document;
use thiserror::Error;
use tracing::debug;

/// Errors raised while turning a document into text
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Failed to load PDF: {0}")]
    Load(String),

    #[error("Failed to extract text from page {page}: {message}")]
    Page { page: u32, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Text of a single page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageText {
    /// Page number (1-indexed)
    pub page_number: u32,
    /// Raw extracted text
    pub text: String,
}

/// Extract the text of every page, in page order
pub fn extract_pages(bytes: &[u8]) -> Result<Vec<PageText>, ExtractionError> {
    debug!(len = bytes.len(), "extract_pages: called");
    let doc = Document::load_mem(bytes).map_err(|e| ExtractionError::Load(e.to_string()))?;

    // get_pages is a BTreeMap keyed by page number, so iteration is in page order
    let mut pages = Vec::new();
    for page_number in doc.get_pages().into_keys() {
        let text = doc.extract_text(&[page_number]).map_err(|e| ExtractionError::Page {
            page: page_number,
            message: e.to_string(),
        })?;
        debug!(page_number, chars = text.len(), "extract_pages: page extracted");
        pages.push(PageText { page_number, text });
    }

    Ok(pages)
}

/// Extract a document into one string: all page texts joined with no separator
pub fn extract_text(bytes: &[u8]) -> Result<String, ExtractionError> {
    let pages = extract_pages(bytes)?;
    let text: String = pages.into_iter().map(|p| p.text).collect();
    debug!(chars = text.len(), "extract_text: done");
    Ok(text)
}

/// Read a file from disk and extract it
pub fn extract_file(path: impl AsRef<Path>) -> Result<String, ExtractionError> {
    let path = path.as_ref();
    debug!(?path, "extract_file: called");
    let bytes = std::fs::read(path)?;
    extract_text(&bytes)
}
