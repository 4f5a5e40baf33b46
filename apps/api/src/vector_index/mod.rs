//! Vector index client — Pinecone data-plane upserts.
//!
//! Only upsert is exercised; profiles are written but never queried.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

use crate::config::{MissingEnv, PineconeConfig};

const CONTROL_PLANE_URL: &str = "https://api.pinecone.io";
const PINECONE_API_VERSION: &str = "2024-07";

#[derive(Debug, Error)]
pub enum VectorIndexError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Pinecone API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("vector index is not configured ({0})")]
    NotConfigured(MissingEnv),
}

/// One record written to the index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorRecord {
    pub id: String,
    pub values: Vec<f32>,
    pub metadata: Map<String, Value>,
}

#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Inserts or overwrites the records, keyed by id. Returns the upserted count.
    async fn upsert(&self, records: Vec<VectorRecord>) -> Result<u32, VectorIndexError>;
}

#[derive(Debug, Serialize)]
struct UpsertRequest {
    vectors: Vec<VectorRecord>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpsertResponse {
    #[serde(default)]
    upserted_count: u32,
}

#[derive(Debug, Deserialize)]
struct DescribeIndexResponse {
    host: String,
}

/// Pinecone index addressed by name. The data-plane host is taken from
/// config or resolved once from the control plane on first use.
pub struct PineconeIndex {
    client: Client,
    config: PineconeConfig,
    host: OnceCell<String>,
}

impl PineconeIndex {
    pub fn new(config: PineconeConfig) -> Self {
        let host = match &config.index_host {
            Some(h) => OnceCell::new_with(Some(normalize_host(h))),
            None => OnceCell::new(),
        };
        Self {
            client: Client::new(),
            config,
            host,
        }
    }

    async fn host(&self) -> Result<&str, VectorIndexError> {
        let host = self
            .host
            .get_or_try_init(|| async {
                let url = format!("{CONTROL_PLANE_URL}/indexes/{}", self.config.index_name);
                let response = self
                    .client
                    .get(url)
                    .header("Api-Key", &self.config.api_key)
                    .header("X-Pinecone-API-Version", PINECONE_API_VERSION)
                    .send()
                    .await?;
                let response = check_status(response).await?;
                let described: DescribeIndexResponse = response.json().await?;
                info!(
                    "Resolved Pinecone index '{}' to host {}",
                    self.config.index_name, described.host
                );
                Ok::<_, VectorIndexError>(normalize_host(&described.host))
            })
            .await?;
        Ok(host.as_str())
    }
}

#[async_trait]
impl VectorIndex for PineconeIndex {
    async fn upsert(&self, records: Vec<VectorRecord>) -> Result<u32, VectorIndexError> {
        let url = format!("{}/vectors/upsert", self.host().await?);
        let response = self
            .client
            .post(url)
            .header("Api-Key", &self.config.api_key)
            .header("X-Pinecone-API-Version", PINECONE_API_VERSION)
            .json(&UpsertRequest { vectors: records })
            .send()
            .await?;
        let response = check_status(response).await?;
        let body: UpsertResponse = response.json().await?;
        debug!("Pinecone upserted {} vectors", body.upserted_count);
        Ok(body.upserted_count)
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, VectorIndexError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response.text().await.unwrap_or_default();
    warn!("Pinecone returned {}: {}", status, message);
    Err(VectorIndexError::Api {
        status: status.as_u16(),
        message,
    })
}

/// Pinecone reports hosts without a scheme.
fn normalize_host(host: &str) -> String {
    let host = host.trim().trim_end_matches('/');
    if host.starts_with("http://") || host.starts_with("https://") {
        host.to_string()
    } else {
        format!("https://{host}")
    }
}

/// Stand-in used when the Pinecone settings are incomplete.
pub struct UnconfiguredIndex(pub MissingEnv);

#[async_trait]
impl VectorIndex for UnconfiguredIndex {
    async fn upsert(&self, _records: Vec<VectorRecord>) -> Result<u32, VectorIndexError> {
        Err(VectorIndexError::NotConfigured(self.0.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_host_adds_scheme() {
        assert_eq!(
            normalize_host("careers-abc123.svc.us-east1-gcp.pinecone.io"),
            "https://careers-abc123.svc.us-east1-gcp.pinecone.io"
        );
    }

    #[test]
    fn test_normalize_host_keeps_existing_scheme() {
        assert_eq!(normalize_host("http://localhost:5080/"), "http://localhost:5080");
    }

    #[test]
    fn test_upsert_request_shape() {
        let mut metadata = Map::new();
        metadata.insert("type".to_string(), Value::from("user_profile"));
        let body = UpsertRequest {
            vectors: vec![VectorRecord {
                id: "user_abc".to_string(),
                values: vec![0.5, 0.25],
                metadata,
            }],
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["vectors"][0]["id"], "user_abc");
        assert_eq!(json["vectors"][0]["values"][1], 0.25);
        assert_eq!(json["vectors"][0]["metadata"]["type"], "user_profile");
    }

    #[test]
    fn test_upsert_response_camel_case() {
        let body: UpsertResponse = serde_json::from_str(r#"{"upsertedCount": 1}"#).unwrap();
        assert_eq!(body.upserted_count, 1);
    }

    #[tokio::test]
    async fn test_configured_host_skips_resolution() {
        let index = PineconeIndex::new(PineconeConfig {
            api_key: "k".to_string(),
            index_name: "careers".to_string(),
            index_host: Some("careers.pinecone.io".to_string()),
        });
        assert_eq!(index.host().await.unwrap(), "https://careers.pinecone.io");
    }
}
