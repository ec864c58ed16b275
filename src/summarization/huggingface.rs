use super::{SummarizationClient, SummarizationError};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};

/// Client for the hosted Hugging Face inference API.
pub struct HuggingFaceClient {
    http: Client,
    endpoint: String,
    token: Option<String>,
}

impl HuggingFaceClient {
    /// Create a client that posts to `{base_url}/{model}`.
    pub fn new(http: Client, base_url: &str, model: &str, token: Option<String>) -> Self {
        Self {
            http,
            endpoint: format!(
                "{}/{}",
                base_url.trim_end_matches('/'),
                model.trim_start_matches('/')
            ),
            token,
        }
    }

    /// Fully qualified inference endpoint.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl SummarizationClient for HuggingFaceClient {
    async fn summarize(&self, text: &str) -> Result<String, SummarizationError> {
        let Some(token) = self.token.as_deref() else {
            return Err(SummarizationError::Unavailable(
                "HF_API_TOKEN is not configured".into(),
            ));
        };

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(token)
            .json(&json!({ "inputs": text }))
            .send()
            .await
            .map_err(|error| {
                SummarizationError::Unavailable(format!(
                    "failed to reach inference API at {}: {error}",
                    self.endpoint
                ))
            })?;

        let status = response.status();
        let raw = response.text().await.map_err(|error| {
            SummarizationError::Unavailable(format!("failed to read inference response: {error}"))
        })?;

        let parsed = serde_json::from_str::<Value>(&raw).ok();
        if let Some(message) = parsed.as_ref().and_then(error_message) {
            return Err(SummarizationError::Rejected(message));
        }
        if !status.is_success() {
            return Err(SummarizationError::Rejected(format!(
                "inference API returned {status}: {raw}"
            )));
        }

        parsed
            .as_ref()
            .and_then(summary_text)
            .ok_or(SummarizationError::MalformedResponse(raw))
    }

    fn name(&self) -> &'static str {
        "huggingface"
    }
}

/// `[{"summary_text": "..."}, ...]` → first summary.
fn summary_text(body: &Value) -> Option<String> {
    body.as_array()?
        .first()?
        .get("summary_text")?
        .as_str()
        .map(str::to_string)
}

/// `{"error": "..."}` → error message.
fn error_message(body: &Value) -> Option<String> {
    match body.get("error")? {
        Value::String(message) => Some(message.clone()),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::{Method::POST, MockServer};

    const MODEL: &str = "sshleifer/distilbart-cnn-12-6";

    fn client(server: &MockServer, token: Option<&str>) -> HuggingFaceClient {
        HuggingFaceClient::new(
            Client::builder()
                .user_agent("rustysum-test")
                .build()
                .expect("client"),
            &server.url("/models"),
            MODEL,
            token.map(str::to_string),
        )
    }

    #[tokio::test]
    async fn returns_first_summary_text() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path(format!("/models/{MODEL}"))
                    .header("authorization", "Bearer secret")
                    .json_body(json!({ "inputs": "The quick brown fox jumps over the lazy dog." }));
                then.status(200)
                    .json_body(json!([{ "summary_text": "A fox jumps." }]));
            })
            .await;

        let input = String::from("The quick brown fox jumps over the lazy dog.");
        let summary = client(&server, Some("secret"))
            .summarize(&input)
            .await
            .expect("summary");

        mock.assert();
        assert_eq!(summary, "A fox jumps.");
        assert_eq!(input, "The quick brown fox jumps over the lazy dog.");
    }

    #[tokio::test]
    async fn error_object_is_rejected() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path(format!("/models/{MODEL}"));
                then.status(503)
                    .json_body(json!({ "error": "Model is currently loading" }));
            })
            .await;

        let error = client(&server, Some("secret"))
            .summarize("text")
            .await
            .expect_err("rejected");
        assert!(
            matches!(error, SummarizationError::Rejected(ref message) if message.contains("loading"))
        );
    }

    #[tokio::test]
    async fn unexpected_shape_carries_raw_body() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path(format!("/models/{MODEL}"));
                then.status(200)
                    .json_body(json!([{ "generated_text": "not a summary" }]));
            })
            .await;

        let error = client(&server, Some("secret"))
            .summarize("text")
            .await
            .expect_err("malformed");
        match error {
            SummarizationError::MalformedResponse(raw) => {
                assert!(raw.contains("generated_text"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_token_skips_network_call() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST);
                then.status(200);
            })
            .await;

        let error = client(&server, None)
            .summarize("text")
            .await
            .expect_err("unavailable");

        assert!(matches!(error, SummarizationError::Unavailable(_)));
        mock.assert_hits(0);
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_unavailable() {
        let client = HuggingFaceClient::new(
            Client::new(),
            "http://127.0.0.1:9/models",
            MODEL,
            Some("secret".into()),
        );
        let error = client.summarize("text").await.expect_err("unavailable");
        assert!(matches!(error, SummarizationError::Unavailable(_)));
    }

    #[test]
    fn endpoint_joins_base_and_model() {
        let client = HuggingFaceClient::new(
            Client::new(),
            "https://api-inference.huggingface.co/models/",
            MODEL,
            None,
        );
        assert_eq!(
            client.endpoint(),
            "https://api-inference.huggingface.co/models/sshleifer/distilbart-cnn-12-6"
        );
    }
}
