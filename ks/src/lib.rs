//! KnowledgeStore - single-record knowledge store
//!
//! Turns an uploaded PDF into plain text and keeps exactly one copy of that
//! text on disk, where every dialogue turn can read it back.
//!
//! # Layout
//!
//! ```text
//! knowledge_store.json     # {"general_info": "<extracted text>"}
//! ```
//!
//! # Example
//!
//! ```ignore
//! use knowledgestore::{KnowledgeStore, ingest};
//!
//! let store = KnowledgeStore::open("knowledge_store.json")?;
//! let text = ingest(&store, &std::fs::read("profile.pdf")?)?;
//! assert_eq!(store.load()?.general_info, text);
//! ```

pub mod cli;
pub mod config;
mod extract;
mod store;

pub use extract::{ExtractionError, PageText, extract_file, extract_pages, extract_text};
pub use store::{KnowledgeRecord, KnowledgeStore, StoreError};

/// Default location of the knowledge file, relative to the working directory
pub const DEFAULT_STORE_FILE: &str = "knowledge_store.json";

/// Errors from the upload pipeline (extract, then save)
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Extract a PDF and replace the stored record with its text
///
/// Returns the extracted text. Nothing is written when extraction fails.
pub fn ingest(store: &KnowledgeStore, bytes: &[u8]) -> Result<String, IngestError> {
    let text = extract_text(bytes)?;
    store.save(&text)?;
    tracing::info!(chars = text.len(), path = %store.path().display(), "Knowledge ingested");
    Ok(text)
}

/// Build a small PDF in memory, one page per entry in `pages`
///
/// Used by tests in this crate and by the `intake` crate's tests.
#[doc(hidden)]
pub fn build_test_pdf(pages: &[&str]) -> Vec<u8> {
    use lopdf::content::{Content, Operation};
    use lopdf::{Document, Object, Stream, dictionary};

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let mut kids = Vec::new();
    for text in pages {
        let mut operations = Vec::new();
        if !text.is_empty() {
            operations = vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 24.into()]),
                Operation::new("Td", vec![72.into(), 700.into()]),
                Operation::new("Tj", vec![Object::string_literal(*text)]),
                Operation::new("ET", vec![]),
            ];
        }
        let content = Content { operations };
        let encoded = content.encode().unwrap_or_default();
        let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    let pages_dict = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => count,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap_or_default();
    bytes
}
