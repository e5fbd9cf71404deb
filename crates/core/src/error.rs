use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("pdf parse error: {0}")]
    PdfParse(String),

    #[error("not a directory: {0}")]
    NotADirectory(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("weaviate unreachable at {endpoint}: {details}")]
    Connection { endpoint: String, details: String },

    #[error("schema setup failed for class {class}: {details}")]
    Schema { class: String, details: String },

    #[error("batch insert failed: {0}")]
    Submission(String),

    #[error("invalid response from weaviate: {0}")]
    BackendResponse(String),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("url parse error: {0}")]
    Url(#[from] url::ParseError),

    #[error("serialize error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T, E = IngestError> = std::result::Result<T, E>;
