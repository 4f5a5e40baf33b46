mod advisor;
mod config;
mod errors;
mod jobs;
mod llm_client;
mod profile;
mod routes;
mod session;
mod state;
mod vector_index;

#[cfg(test)]
mod test_support;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::{CompletionService, LlmClient, UnconfiguredLlm};
use crate::routes::build_router;
use crate::session::{InMemorySessionStore, RedisSessionStore, SessionStore};
use crate::state::AppState;
use crate::vector_index::{PineconeIndex, UnconfiguredIndex, VectorIndex};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Career AI API v{}", env!("CARGO_PKG_VERSION"));

    // Missing credentials degrade to per-call errors rather than a startup failure
    let llm: Arc<dyn CompletionService> = match &config.azure_openai {
        Ok(azure) => {
            let client = LlmClient::new(azure.clone());
            info!("LLM client initialized (deployment: {})", client.chat_deployment());
            Arc::new(client)
        }
        Err(missing) => {
            warn!("Azure OpenAI client not configured: {missing}");
            Arc::new(UnconfiguredLlm(missing.clone()))
        }
    };

    let index: Arc<dyn VectorIndex> = match &config.pinecone {
        Ok(pinecone) => {
            info!("Pinecone index '{}' configured", pinecone.index_name);
            Arc::new(PineconeIndex::new(pinecone.clone()))
        }
        Err(missing) => {
            warn!("Pinecone client not configured: {missing}");
            Arc::new(UnconfiguredIndex(missing.clone()))
        }
    };

    let sessions: Arc<dyn SessionStore> = match &config.redis_url {
        Some(url) => Arc::new(RedisSessionStore::connect(url, config.session_ttl_secs).await?),
        None => {
            info!("REDIS_URL not set, sessions are kept in memory");
            Arc::new(InMemorySessionStore::new(config.session_ttl_secs))
        }
    };

    let state = AppState {
        llm,
        index,
        sessions,
        index_dimension: config.index_dimension,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
