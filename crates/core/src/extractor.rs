use crate::error::IngestError;
use crate::models::PdfDocument;
use lopdf::Document;
use std::path::Path;

/// Substituted for the extracted text when a PDF cannot be parsed, so
/// downstream batch submission never sees an empty document.
pub const PARSE_FAILURE_TEXT: &str = "[Error: Failed to parse PDF]";

pub trait PdfExtractor: Send + Sync {
    fn extract_text(&self, path: &Path) -> Result<String, IngestError>;
}

#[derive(Default)]
pub struct LopdfExtractor;

impl PdfExtractor for LopdfExtractor {
    fn extract_text(&self, path: &Path) -> Result<String, IngestError> {
        let document =
            Document::load(path).map_err(|error| IngestError::PdfParse(error.to_string()))?;

        let mut text = String::new();
        for (page_no, _page_id) in document.get_pages() {
            let page_text = document
                .extract_text(&[page_no])
                .map_err(|error| IngestError::PdfParse(error.to_string()))?;

            if !page_text.trim().is_empty() {
                text.push_str(&page_text);
                text.push('\n');
            }
        }

        if text.trim().is_empty() {
            return Err(IngestError::PdfParse(format!(
                "pdf had no readable text: {}",
                path.display()
            )));
        }

        Ok(text)
    }
}

/// Outcome of extracting one file. The document is always present;
/// `failure` carries the reason when the content is the parse sentinel.
pub struct ExtractedDocument {
    pub document: PdfDocument,
    pub failure: Option<String>,
}

/// Converts one PDF into a storable document. Extraction failures are
/// data, not errors: the returned document carries [`PARSE_FAILURE_TEXT`]
/// and the failure reason instead of propagating.
pub fn extract_document(
    extractor: &dyn PdfExtractor,
    path: &Path,
    max_text_length: usize,
) -> ExtractedDocument {
    match extractor.extract_text(path) {
        Ok(text) => ExtractedDocument {
            document: PdfDocument::new(path, truncate_chars(&text, max_text_length)),
            failure: None,
        },
        Err(error) => ExtractedDocument {
            document: PdfDocument::new(path, PARSE_FAILURE_TEXT.to_string()),
            failure: Some(error.to_string()),
        },
    }
}

pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => text[..cut].to_string(),
        None => text.to_string(),
    }
}
