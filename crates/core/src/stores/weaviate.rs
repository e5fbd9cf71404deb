use crate::config::WeaviateConfig;
use crate::error::StoreError;
use crate::models::{PdfDocument, SearchHit};
use crate::traits::VectorIndex;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, Method, StatusCode};
use serde_json::{json, Value};
use url::Url;

/// Weaviate over its REST and GraphQL APIs: schema management and batch
/// inserts on the write path, `nearText` queries on the read path.
pub struct WeaviateStore {
    client: Client,
    endpoint: String,
    class_name: String,
    api_key: Option<String>,
}

impl WeaviateStore {
    pub fn new(config: &WeaviateConfig) -> Result<Self, StoreError> {
        let endpoint = Url::parse(&config.endpoint())?;

        Ok(Self {
            client: Client::new(),
            endpoint: endpoint.as_str().trim_end_matches('/').to_string(),
            class_name: config.class_name.clone(),
            api_key: config.api_key.clone(),
        })
    }

    /// Builds a store handle and verifies the instance is reachable.
    pub async fn connect(config: &WeaviateConfig) -> Result<Self, StoreError> {
        let store = Self::new(config)?;
        store.check_ready().await?;
        Ok(store)
    }

    async fn check_ready(&self) -> Result<(), StoreError> {
        let response = self
            .request(Method::GET, "/v1/.well-known/ready")
            .send()
            .await
            .map_err(|error| StoreError::Connection {
                endpoint: self.endpoint.clone(),
                details: error.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(StoreError::Connection {
                endpoint: self.endpoint.clone(),
                details: response.status().to_string(),
            });
        }

        Ok(())
    }

    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let mut builder = self
            .client
            .request(method, format!("{}{}", self.endpoint, path));

        if let Some(api_key) = &self.api_key {
            builder = builder.header("X-OpenAI-Api-Key", api_key);
        }

        builder
    }
}

#[async_trait]
impl VectorIndex for WeaviateStore {
    async fn ensure_collection(&self) -> Result<(), StoreError> {
        let response = self
            .request(Method::GET, &format!("/v1/schema/{}", self.class_name))
            .send()
            .await?;

        if response.status().is_success() {
            return Ok(());
        }

        if response.status() != StatusCode::NOT_FOUND {
            return Err(StoreError::Schema {
                class: self.class_name.clone(),
                details: response.status().to_string(),
            });
        }

        let response = self
            .request(Method::POST, "/v1/schema")
            .json(&collection_definition(&self.class_name))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(StoreError::Schema {
                class: self.class_name.clone(),
                details: response.status().to_string(),
            });
        }

        Ok(())
    }

    async fn insert_documents(&self, documents: &[PdfDocument]) -> Result<(), StoreError> {
        if documents.is_empty() {
            return Ok(());
        }

        let objects = documents
            .iter()
            .map(|document| {
                Ok(json!({
                    "class": self.class_name,
                    "properties": serde_json::to_value(document)?,
                }))
            })
            .collect::<Result<Vec<_>, serde_json::Error>>()?;

        let response = self
            .request(Method::POST, "/v1/batch/objects")
            .json(&json!({ "objects": objects }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(StoreError::Submission(response.status().to_string()));
        }

        // The batch endpoint reports per-object failures in a 200 body.
        let results: Value = response.json().await?;
        if let Some(failure) = first_batch_error(&results) {
            return Err(StoreError::Submission(failure));
        }

        Ok(())
    }

    async fn near_text(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>, StoreError> {
        let graphql = near_text_query(&self.class_name, query, limit)?;

        let response = self
            .request(Method::POST, "/v1/graphql")
            .json(&json!({ "query": graphql }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(StoreError::BackendResponse(response.status().to_string()));
        }

        let payload: Value = response.json().await?;

        if let Some(first) = payload
            .pointer("/errors")
            .and_then(Value::as_array)
            .and_then(|errors| errors.first())
        {
            return Err(StoreError::BackendResponse(
                first
                    .pointer("/message")
                    .and_then(Value::as_str)
                    .unwrap_or("graphql error")
                    .to_string(),
            ));
        }

        Ok(parse_near_text_response(&payload, &self.class_name))
    }
}

fn collection_definition(class_name: &str) -> Value {
    json!({
        "class": class_name,
        "vectorizer": "text2vec-openai",
        "properties": [
            {
                "name": "path",
                "dataType": ["text"],
                "description": "The file path of the PDF document",
            },
            {
                "name": "filename",
                "dataType": ["text"],
                "description": "The name of the PDF file",
                "indexFilterable": true,
                "indexSearchable": true,
            },
            {
                "name": "content",
                "dataType": ["text"],
                "description": "The extracted text content from the PDF",
                "indexFilterable": true,
                "indexSearchable": true,
                "tokenization": "word",
            },
            {
                "name": "createdAt",
                "dataType": ["date"],
                "description": "When the document was ingested",
                "indexFilterable": true,
            },
        ],
    })
}

fn near_text_query(class_name: &str, query: &str, limit: usize) -> Result<String, StoreError> {
    // JSON string encoding doubles as GraphQL string escaping here.
    let concept = serde_json::to_string(query)?;
    Ok(format!(
        "{{ Get {{ {class_name}(nearText: {{concepts: [{concept}]}}, limit: {limit}) \
         {{ path filename content createdAt _additional {{ certainty }} }} }} }}"
    ))
}

fn first_batch_error(results: &Value) -> Option<String> {
    results
        .as_array()
        .into_iter()
        .flatten()
        .find_map(|object| {
            object
                .pointer("/result/errors/error/0/message")
                .and_then(Value::as_str)
                .map(ToString::to_string)
        })
}

fn parse_near_text_response(payload: &Value, class_name: &str) -> Vec<SearchHit> {
    let hits = payload
        .pointer(&format!("/data/Get/{class_name}"))
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();

    let mut results = Vec::with_capacity(hits.len());
    for hit in hits {
        let path = hit
            .pointer("/path")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let filename = hit
            .pointer("/filename")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let content = hit
            .pointer("/content")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let created_at = hit
            .pointer("/createdAt")
            .and_then(Value::as_str)
            .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
            .map(|parsed| parsed.with_timezone(&Utc))
            .unwrap_or_else(Utc::now);
        let certainty = hit
            .pointer("/_additional/certainty")
            .and_then(Value::as_f64)
            .unwrap_or(0.0);

        results.push(SearchHit {
            document: PdfDocument {
                path,
                filename,
                content,
                created_at,
            },
            certainty,
        });
    }

    results
}
