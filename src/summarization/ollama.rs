use super::{SummarizationClient, SummarizationError};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::json;

/// Client for a local Ollama runtime, prompting a general model for a summary.
pub struct OllamaClient {
    http: Client,
    base_url: String,
    model: String,
}

impl OllamaClient {
    /// Create a client for the runtime at `base_url` using `model`.
    pub fn new(http: Client, base_url: String, model: String) -> Self {
        Self {
            http,
            base_url,
            model,
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/api/generate", self.base_url.trim_end_matches('/'))
    }
}

#[derive(Debug, Deserialize)]
struct OllamaResponse {
    response: String,
    done: bool,
}

fn build_prompt(text: &str) -> String {
    format!(
        "Summarize the following document in a short, factual paragraph. \
         Do not add information that is not in the text.\n\n{text}"
    )
}

#[async_trait]
impl SummarizationClient for OllamaClient {
    async fn summarize(&self, text: &str) -> Result<String, SummarizationError> {
        let payload = json!({
            "model": self.model,
            "prompt": build_prompt(text),
            "stream": false,
            "options": {
                // Lower temperature for deterministic summaries.
                "temperature": 0.1,
            }
        });

        let response = self
            .http
            .post(self.endpoint())
            .json(&payload)
            .send()
            .await
            .map_err(|error| {
                SummarizationError::Unavailable(format!(
                    "failed to reach Ollama at {}: {error}",
                    self.base_url
                ))
            })?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(SummarizationError::Unavailable(format!(
                "Ollama endpoint {} returned 404",
                self.endpoint()
            )));
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(SummarizationError::Rejected(format!(
                "Ollama returned {status}: {body}"
            )));
        }

        let raw = response.text().await.map_err(|error| {
            SummarizationError::Unavailable(format!("failed to read Ollama response: {error}"))
        })?;
        let body: OllamaResponse = match serde_json::from_str(&raw) {
            Ok(body) => body,
            Err(_) => return Err(SummarizationError::MalformedResponse(raw)),
        };

        if !body.done {
            return Err(SummarizationError::MalformedResponse(raw));
        }

        Ok(body.response.trim().to_string())
    }

    fn name(&self) -> &'static str {
        "ollama"
    }
}
