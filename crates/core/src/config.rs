/// Connection settings for the Weaviate instance.
///
/// Built once at process start (CLI flags with environment fallbacks) and
/// passed by reference into every component that needs it.
#[derive(Debug, Clone)]
pub struct WeaviateConfig {
    pub scheme: String,
    pub host: String,
    pub port: u16,
    /// Forwarded as `X-OpenAI-Api-Key` for the text2vec-openai vectorizer.
    pub api_key: Option<String>,
    /// Weaviate Cloud URL; overrides scheme/host/port when set.
    pub cloud_url: Option<String>,
    pub class_name: String,
}

impl Default for WeaviateConfig {
    fn default() -> Self {
        Self {
            scheme: "http".to_string(),
            host: "localhost".to_string(),
            port: 8080,
            api_key: None,
            cloud_url: None,
            class_name: "PDFDocuments".to_string(),
        }
    }
}

impl WeaviateConfig {
    pub fn endpoint(&self) -> String {
        match &self.cloud_url {
            Some(cloud) => cloud.trim_end_matches('/').to_string(),
            None => format!("{}://{}:{}", self.scheme, self.host, self.port),
        }
    }
}

/// Text-processing limits for the ingestion pipeline.
#[derive(Debug, Clone, Copy)]
pub struct IngestionOptions {
    /// Extracted text is truncated to this many characters per document.
    pub max_text_length: usize,
    /// Documents per batch insert.
    pub batch_size: usize,
    /// Reserved for chunked ingestion; the pipeline stores whole documents.
    pub chunk_size: usize,
    /// Reserved for chunked ingestion.
    pub chunk_overlap: usize,
}

impl Default for IngestionOptions {
    fn default() -> Self {
        Self {
            max_text_length: 5_000,
            batch_size: 10,
            chunk_size: 2_000,
            chunk_overlap: 200,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::WeaviateConfig;

    #[test]
    fn endpoint_is_built_from_scheme_host_port() {
        let config = WeaviateConfig::default();
        assert_eq!(config.endpoint(), "http://localhost:8080");
    }

    #[test]
    fn cloud_url_overrides_local_endpoint() {
        let config = WeaviateConfig {
            cloud_url: Some("https://demo.weaviate.network/".to_string()),
            ..WeaviateConfig::default()
        };
        assert_eq!(config.endpoint(), "https://demo.weaviate.network");
    }
}
