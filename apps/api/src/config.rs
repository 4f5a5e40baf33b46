use std::fmt;

use anyhow::{bail, Context, Result};

pub const DEFAULT_API_VERSION: &str = "2024-02-15-preview";
pub const DEFAULT_EMBEDDING_DEPLOYMENT: &str = "text-embedding-ada-002";
/// Dimensionality of the Pinecone index profiles are written to.
pub const DEFAULT_INDEX_DIMENSION: usize = 1536;
const DEFAULT_SESSION_TTL_SECS: u64 = 60 * 60 * 24;

/// Application configuration loaded from environment variables.
///
/// Missing service credentials do not fail startup: the affected section is
/// recorded as `Err(MissingEnv)` and every call through that service reports
/// the gap instead. Malformed numeric values are still a startup error.
#[derive(Debug, Clone)]
pub struct Config {
    pub azure_openai: Result<AzureOpenAiConfig, MissingEnv>,
    pub pinecone: Result<PineconeConfig, MissingEnv>,
    pub index_dimension: usize,
    pub redis_url: Option<String>,
    pub session_ttl_secs: u64,
    pub port: u16,
    pub rust_log: String,
}

#[derive(Debug, Clone)]
pub struct AzureOpenAiConfig {
    pub api_key: String,
    pub endpoint: String,
    pub api_version: String,
    pub chat_deployment: String,
    pub embedding_deployment: String,
}

#[derive(Debug, Clone)]
pub struct PineconeConfig {
    pub api_key: String,
    pub index_name: String,
    /// Data-plane host. Resolved from the control plane when unset.
    pub index_host: Option<String>,
}

/// The environment variables a service section needed but did not find.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingEnv(pub Vec<&'static str>);

impl fmt::Display for MissingEnv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "missing environment variables: {}", self.0.join(", "))
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let azure_openai = {
            let mut missing = Vec::new();
            let mut require = |key: &'static str| {
                let value = get(key);
                if value.is_none() {
                    missing.push(key);
                }
                value.unwrap_or_default()
            };
            let api_key = require("AZURE_OPENAI_API_KEY");
            let endpoint = require("AZURE_OPENAI_ENDPOINT");
            let chat_deployment = require("AZURE_OPENAI_DEPLOYMENT");
            if missing.is_empty() {
                Ok(AzureOpenAiConfig {
                    api_key,
                    endpoint: endpoint.trim_end_matches('/').to_string(),
                    api_version: get("AZURE_OPENAI_API_VERSION")
                        .unwrap_or_else(|| DEFAULT_API_VERSION.to_string()),
                    chat_deployment,
                    embedding_deployment: get("AZURE_OPENAI_EMBEDDING_DEPLOYMENT")
                        .unwrap_or_else(|| DEFAULT_EMBEDDING_DEPLOYMENT.to_string()),
                })
            } else {
                Err(MissingEnv(missing))
            }
        };

        let pinecone = {
            let mut missing = Vec::new();
            let mut require = |key: &'static str| {
                let value = get(key);
                if value.is_none() {
                    missing.push(key);
                }
                value.unwrap_or_default()
            };
            let api_key = require("PINECONE_API_KEY");
            let index_name = require("PINECONE_INDEX_NAME");
            if missing.is_empty() {
                Ok(PineconeConfig {
                    api_key,
                    index_name,
                    index_host: get("PINECONE_INDEX_HOST"),
                })
            } else {
                Err(MissingEnv(missing))
            }
        };

        Ok(Config {
            azure_openai,
            pinecone,
            index_dimension: match get("PINECONE_DIMENSION") {
                Some(v) => parse_dimension(&v)?,
                None => DEFAULT_INDEX_DIMENSION,
            },
            redis_url: get("REDIS_URL"),
            session_ttl_secs: match get("SESSION_TTL_SECS") {
                Some(v) => v
                    .parse::<u64>()
                    .context("SESSION_TTL_SECS must be a number of seconds")?,
                None => DEFAULT_SESSION_TTL_SECS,
            },
            port: get("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: get("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

fn parse_dimension(value: &str) -> Result<usize> {
    match value.parse::<usize>() {
        Ok(0) => bail!("PINECONE_DIMENSION must be a positive integer, got 0"),
        parsed => parsed.context("PINECONE_DIMENSION must be a positive integer"),
    }
}
