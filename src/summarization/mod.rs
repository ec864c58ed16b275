//! Abstractions for turning text into summaries.
//!
//! Handlers depend only on [`SummarizationClient`]. Three backends implement it: the hosted
//! Hugging Face inference API, a local Ollama runtime, and an in-process extractive pipeline.
//! The backend is chosen once at startup by [`build_summarization_client`] and shared for the
//! process lifetime.

mod huggingface;
mod local;
mod ollama;

pub use huggingface::HuggingFaceClient;
pub use local::LocalPipeline;
pub use ollama::OllamaClient;

use crate::config::{Config, SummarizerBackend};
use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;
use thiserror::Error;

/// Errors surfaced while attempting summarization.
#[derive(Debug, Error)]
pub enum SummarizationError {
    /// Backend could not be reached, is missing credentials, or failed during inference.
    #[error("Summarization backend unavailable: {0}")]
    Unavailable(String),
    /// Backend answered with an explicit error.
    #[error("Summarization backend rejected the request: {0}")]
    Rejected(String),
    /// Backend answered with a body whose shape was not recognised; carries the raw body.
    #[error("Malformed summarization response: {0}")]
    MalformedResponse(String),
}

/// Interface implemented by summarization backends.
///
/// Implementations borrow the input and never modify it. No guarantee is made about summary
/// length, determinism, or quality.
#[async_trait]
pub trait SummarizationClient: Send + Sync {
    /// Produce a summary of `text`.
    async fn summarize(&self, text: &str) -> Result<String, SummarizationError>;

    /// Short backend identifier used in logs and metrics.
    fn name(&self) -> &'static str;
}

/// Build the summarization client selected by configuration.
pub fn build_summarization_client(
    config: &Config,
) -> Result<Arc<dyn SummarizationClient>, SummarizationError> {
    let client: Arc<dyn SummarizationClient> = match config.summarizer_backend {
        SummarizerBackend::HuggingFace => {
            if config.hf_api_token.is_none() {
                tracing::warn!("HF_API_TOKEN is not set; summarization requests will fail");
            }
            Arc::new(HuggingFaceClient::new(
                http_client(config, "rustysum/huggingface")?,
                &config.hf_api_url,
                &config.hf_model,
                config.hf_api_token.clone(),
            ))
        }
        SummarizerBackend::Ollama => Arc::new(OllamaClient::new(
            http_client(config, "rustysum/ollama")?,
            config.ollama_url.clone(),
            config.ollama_model.clone(),
        )),
        SummarizerBackend::Local => Arc::new(LocalPipeline::new(config.local_summary_sentences)),
    };
    tracing::info!(backend = client.name(), "Summarization backend initialized");
    Ok(client)
}

fn http_client(config: &Config, user_agent: &str) -> Result<Client, SummarizationError> {
    let mut builder = Client::builder().user_agent(user_agent);
    if let Some(timeout) = config.request_timeout {
        builder = builder.timeout(timeout);
    }
    builder.build().map_err(|error| {
        SummarizationError::Unavailable(format!("failed to construct HTTP client: {error}"))
    })
}
