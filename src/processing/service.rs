//! Summary service coordinating upload staging, extraction, and the summarization backend.

use crate::{
    extraction::extract_text_from_path,
    metrics::{MetricsSnapshot, SummaryMetrics},
    processing::types::{
        NO_FILE_UPLOADED, NO_TEXT_PROVIDED, ServiceError, SummarizationResult, UploadedDocument,
    },
    summarization::{SummarizationClient, SummarizationError},
    uploads::UploadStore,
};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::Instrument;
use uuid::Uuid;

/// Coordinates the request pipeline: stage upload, extract text, summarize.
///
/// The service owns the process-wide summarization client, which is shared read-only across
/// requests. Construct it once near process start and share it through an `Arc`.
pub struct SummaryService {
    summarizer: Arc<dyn SummarizationClient>,
    uploads: UploadStore,
    metrics: Arc<SummaryMetrics>,
}

/// Abstraction over the request pipeline used by the HTTP surface.
#[async_trait]
pub trait SummaryApi: Send + Sync {
    /// Summarize a raw text payload.
    async fn summarize_text(&self, text: String) -> Result<SummarizationResult, ServiceError>;

    /// Extract text from an uploaded PDF and summarize it.
    async fn summarize_document(
        &self,
        document: UploadedDocument,
    ) -> Result<SummarizationResult, ServiceError>;

    /// Retrieve the current metrics snapshot for diagnostics.
    fn metrics_snapshot(&self) -> MetricsSnapshot;
}

impl SummaryService {
    /// Build a service around an already initialized summarization client.
    pub fn new(summarizer: Arc<dyn SummarizationClient>, uploads: UploadStore) -> Self {
        Self {
            summarizer,
            uploads,
            metrics: Arc::new(SummaryMetrics::new()),
        }
    }

    /// Name of the configured backend.
    pub fn backend_name(&self) -> &'static str {
        self.summarizer.name()
    }

    async fn run_text(&self, text: String) -> Result<SummarizationResult, ServiceError> {
        if text.trim().is_empty() {
            return Err(ServiceError::InputMissing(NO_TEXT_PROVIDED));
        }
        tracing::info!(
            backend = self.summarizer.name(),
            chars = text.len(),
            "Summarizing text"
        );
        let summary = self.summarizer.summarize(&text).await?;
        Ok(SummarizationResult {
            extracted_text: None,
            summary,
        })
    }

    async fn run_document(
        &self,
        document: UploadedDocument,
    ) -> Result<SummarizationResult, ServiceError> {
        if document.bytes.is_empty() {
            return Err(ServiceError::InputMissing(NO_FILE_UPLOADED));
        }
        let upload = self
            .uploads
            .store(document.filename.as_deref(), &document.bytes)
            .await?;
        let extracted_text = extract_text_from_path(upload.path()).await?;
        drop(upload);

        tracing::info!(
            backend = self.summarizer.name(),
            bytes = document.bytes.len(),
            chars = extracted_text.len(),
            "Extracted document text"
        );

        if extracted_text.trim().is_empty() {
            tracing::warn!("Document contained no extractable text; skipping summarization");
            return Ok(SummarizationResult {
                extracted_text: Some(extracted_text),
                summary: String::new(),
            });
        }

        let summary = self.summarizer.summarize(&extracted_text).await?;
        Ok(SummarizationResult {
            extracted_text: Some(extracted_text),
            summary,
        })
    }

    /// Update metrics and log the result; called inside the request span.
    fn record_outcome(&self, outcome: &Result<SummarizationResult, ServiceError>, document: bool) {
        let kind = if document { "document" } else { "text" };
        match outcome {
            Ok(result) => {
                if document {
                    self.metrics.record_document();
                } else {
                    self.metrics.record_text();
                }
                tracing::info!(
                    outcome = "ok",
                    kind,
                    summary_chars = result.summary.len(),
                    "Summarization request completed"
                );
            }
            Err(ServiceError::InputMissing(message)) => {
                tracing::info!(outcome = "rejected", kind, reason = *message, "Missing input");
            }
            Err(error) => {
                let malformed = matches!(
                    error,
                    ServiceError::Summarization(SummarizationError::MalformedResponse(_))
                );
                tracing::warn!(
                    outcome = "error",
                    kind,
                    %error,
                    malformed,
                    "Summarization request failed"
                );
                self.metrics.record_failure(malformed);
            }
        }
    }
}

#[async_trait]
impl SummaryApi for SummaryService {
    async fn summarize_text(&self, text: String) -> Result<SummarizationResult, ServiceError> {
        let span = tracing::info_span!("summarize_text", request_id = %Uuid::new_v4());
        async {
            let outcome = self.run_text(text).await;
            self.record_outcome(&outcome, false);
            outcome
        }
        .instrument(span)
        .await
    }

    async fn summarize_document(
        &self,
        document: UploadedDocument,
    ) -> Result<SummarizationResult, ServiceError> {
        let span = tracing::info_span!("summarize_document", request_id = %Uuid::new_v4());
        async {
            let outcome = self.run_document(document).await;
            self.record_outcome(&outcome, true);
            outcome
        }
        .instrument(span)
        .await
    }

    fn metrics_snapshot(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }
}
