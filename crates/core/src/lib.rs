pub mod config;
pub mod error;
pub mod extractor;
pub mod format;
pub mod ingest;
pub mod models;
pub mod snippet;
pub mod stores;
pub mod traits;

pub use config::{IngestionOptions, WeaviateConfig};
pub use error::{IngestError, StoreError};
pub use extractor::{
    extract_document, ExtractedDocument, LopdfExtractor, PdfExtractor, PARSE_FAILURE_TEXT,
};
pub use format::{format_results, highlight_terms, relevance_bar, RelevanceTier, BAR_WIDTH};
pub use ingest::{discover_pdf_files, ingest_folder, FailedExtraction, IngestionReport};
pub use models::{PdfDocument, SearchHit};
pub use snippet::{query_terms, select_snippet};
pub use stores::WeaviateStore;
pub use traits::VectorIndex;
