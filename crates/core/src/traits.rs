use crate::error::StoreError;
use crate::models::{PdfDocument, SearchHit};
use async_trait::async_trait;

/// The vector store seam: indexing on the write path, nearest-neighbor
/// text queries on the read path. Embedding computation and ranking live
/// behind this boundary.
#[async_trait]
pub trait VectorIndex {
    /// No-op when the collection already exists, otherwise creates it.
    async fn ensure_collection(&self) -> Result<(), StoreError>;

    /// Inserts one ordered batch of documents.
    async fn insert_documents(&self, documents: &[PdfDocument]) -> Result<(), StoreError>;

    /// Runs a nearest-neighbor text query and returns hits in the
    /// store's relevance order.
    async fn near_text(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>, StoreError>;
}
