use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A PDF document as stored in the Weaviate collection.
///
/// Created once during ingestion and never mutated afterwards. `content`
/// is never empty: extraction failures substitute a fixed sentinel so the
/// batch insert path never sees a document without text.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PdfDocument {
    pub path: String,
    pub filename: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl PdfDocument {
    pub fn new(path: &Path, content: String) -> Self {
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| path.to_string_lossy().to_string());

        Self {
            path: path.to_string_lossy().to_string(),
            filename,
            content,
            created_at: Utc::now(),
        }
    }
}

/// One ranked answer from a near-text query. Query-scoped; the certainty
/// is the similarity score reported by Weaviate, 0.0 when absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    pub document: PdfDocument,
    pub certainty: f64,
}
